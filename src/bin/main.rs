mod opt;

use std::rc::Rc;

use crate::opt::Opt;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{debug, info};
use noisy_float::prelude::*;
use trigana::prelude::*;
use trigana::selection::{CutRange, KineCuts};
use trigana::VERSION;

fn main() -> Result<()> {
    let args = argfile::expand_args_from(
        std::env::args_os(),
        argfile::parse_fromfile,
        argfile::PREFIX,
    )
    .with_context(|| "Failed to read argument file")?;
    let opt = Opt::parse_from(args).validate()?;

    let env = Env::default().filter_or("TRIGANA_LOG", &opt.loglevel);
    env_logger::init_from_env(env);

    info!("trigana {VERSION}");
    debug!("settings: {:#?}", opt);

    let binning = match &opt.binning {
        Some(path) => {
            let config = std::fs::read_to_string(path).with_context(|| {
                format!("Failed to read binning configuration {path:?}")
            })?;
            serde_yaml::from_str(&config)
                .with_context(|| "Failed to parse binning configuration")?
        }
        None => BinningConfig::default(),
    };

    let kine_cuts = KineCuts::new(
        CutRange::new(n64(opt.kine.minpt), n64(opt.kine.maxpt)),
        CutRange::new(n64(-opt.kine.maxeta), n64(opt.kine.maxeta)),
        CutRange::open(),
    );
    let mut track_component = TrackComponent::builder();
    track_component
        .kine_cuts(kine_cuts)
        .trigger_method(opt.trigger_method.into())
        .swap_eta(opt.swap_eta)
        .require_mc_true(opt.require_mc);
    if opt.mc_weights {
        track_component.weighter(Rc::new(GENERATOR_WEIGHT));
    }
    let mut components: Vec<Box<dyn AnalysisComponent>> =
        vec![Box::new(track_component.build()?)];
    if opt.clusters {
        let cluster_component = ClusterComponent::builder()
            .energy_range(CutRange::new(
                n64(opt.min_cluster_energy),
                n64(f64::MAX),
            ))
            .trigger_method(opt.trigger_method.into())
            .build();
        components.push(Box::new(cluster_component));
    }

    let reader = CombinedReader::from_files(opt.infiles)?;

    let mut analysis = AnalysisBuilder {
        reader,
        binning,
        components,
    }
    .build();
    analysis.run()?;

    let components = analysis.into_components();
    let writer = HistogramWriter::builder()
        .filename(opt.outfile.clone())
        .build();
    writer.write(components.iter().map(|c| (c.name(), c.sink())))?;

    info!("done");
    Ok(())
}
