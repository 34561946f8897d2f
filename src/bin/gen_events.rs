use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;
use noisy_float::prelude::*;
use particle_id::ParticleID;
use rand::Rng;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use trigana::event::{
    Cluster, EventBuilder, EventRecord, McEvent, McParticle, RecSummary, Track,
};
use trigana::triggers::TriggerDecision;

/// Generate a toy event file for exercising the analysis pipeline
#[derive(Debug, Parser)]
#[command(name = "trigana-gen-events", version)]
struct Opt {
    /// Output file
    #[arg(long, short)]
    outfile: PathBuf,

    /// Number of events
    #[arg(long, short, default_value = "1000")]
    nevents: usize,

    /// Maximum number of tracks per event
    #[arg(long, default_value = "10")]
    ntracks: usize,

    /// Attach generator-level information to each event
    #[arg(long)]
    mc: bool,

    /// Random number generator seed
    #[arg(long, short, default_value = "0")]
    seed: u64,

    /// Verbosity level
    #[arg(short, long, default_value = "Info")]
    loglevel: String,
}

fn main() -> Result<()> {
    let opt = Opt::parse();
    let env = Env::default().filter_or("TRIGANA_LOG", &opt.loglevel);
    env_logger::init_from_env(env);

    let mut rng = Xoshiro256Plus::seed_from_u64(opt.seed);
    let events: Vec<_> = (0..opt.nevents)
        .map(|id| gen_event(id, &opt, &mut rng))
        .collect();

    let yaml = serde_yaml::to_string(&events)?;
    std::fs::write(&opt.outfile, yaml)
        .with_context(|| format!("Failed to write {:?}", opt.outfile))?;
    info!("Wrote {} events to {:?}", events.len(), opt.outfile);
    Ok(())
}

fn gen_event(id: usize, opt: &Opt, rng: &mut impl Rng) -> EventRecord {
    let mut builder = EventBuilder::new(id);

    let nclusters = rng.gen_range(0..=3);
    for _ in 0..nclusters {
        builder.add_cluster(Cluster {
            energy: gen_pt(rng),
            eta: n64(rng.gen_range(-0.7..0.7)),
            phi: n64(rng.gen_range(1.4..3.3)),
        });
    }

    let ntracks = rng.gen_range(0..=opt.ntracks);
    let mut particles = Vec::with_capacity(ntracks);
    for label in 0..ntracks {
        let pt = gen_pt(rng);
        let eta = n64(rng.gen_range(-0.9..0.9));
        let phi = n64(rng.gen_range(0.0..2. * std::f64::consts::PI));
        let mc_label = if opt.mc {
            particles.push(McParticle {
                pt: pt * rng.gen_range(0.9..1.1),
                eta,
                phi,
                pdg_id: ParticleID::new(211),
                physical_primary: rng.gen_bool(0.9),
            });
            Some(label)
        } else {
            None
        };
        builder.add_track(Track {
            pt,
            eta,
            phi,
            filter_bits: 1 << rng.gen_range(0..4),
            cluster: rng.gen_bool(0.3).then(|| rng.gen_range(0..4_usize)),
            mc_label,
        });
    }
    if opt.mc {
        builder.mc_event(McEvent {
            particles,
            weight: n64(rng.gen_range(0.5..1.5)),
        });
    }

    builder
        .rec_summary(RecSummary {
            vertex_z: n64(rng.gen_range(-10.0..10.0)),
        })
        .triggers(TriggerDecision {
            min_bias: rng.gen_bool(0.9),
            jet_high: rng.gen_bool(0.2),
            jet_low: rng.gen_bool(0.3),
            gamma_high: rng.gen_bool(0.2),
            gamma_low: rng.gen_bool(0.3),
        });
    builder.build()
}

/// Transverse momenta from a falling spectrum
fn gen_pt(rng: &mut impl Rng) -> N64 {
    n64(0.15 - 3. * (-rng.gen_range(0.0_f64..1.)).ln_1p())
}
