use std::path::PathBuf;

use anyhow::{ensure, Result};
use clap::{Args, Parser, ValueEnum};
use trigana::triggers::TriggerMethod;

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
pub(crate) enum TriggerResolution {
    /// One trigger class per active trigger flag
    Direct,
    /// Pairwise combinations of jet and gamma triggers per threshold
    Combinatorial,
}

impl From<TriggerResolution> for TriggerMethod {
    fn from(r: TriggerResolution) -> Self {
        match r {
            TriggerResolution::Direct => Self::Direct,
            TriggerResolution::Combinatorial => Self::Combinatorial,
        }
    }
}

#[derive(Debug, Copy, Clone, Args)]
pub(crate) struct KineOpt {
    /// Minimum track transverse momentum
    #[arg(long, default_value = "0.15")]
    pub(crate) minpt: f64,

    /// Maximum track transverse momentum
    #[arg(long, default_value = "100.")]
    pub(crate) maxpt: f64,

    /// Maximum absolute track pseudorapidity
    #[arg(long, default_value = "0.8")]
    pub(crate) maxeta: f64,
}

#[derive(Debug, Parser)]
#[command(
    name = "trigana",
    version,
    about = "Accumulate trigger-class resolved histograms from collider events"
)]
pub(crate) struct Opt {
    /// Output file
    #[arg(long, short)]
    pub(crate) outfile: PathBuf,

    /// Binning configuration file
    ///
    /// A YAML map from variable name to axis definition. The standard
    /// binnings are used if no file is given.
    #[arg(long, short)]
    pub(crate) binning: Option<PathBuf>,

    #[command(flatten)]
    pub(crate) kine: KineOpt,

    /// Method used to resolve trigger classes
    #[arg(long, value_enum, default_value = "direct")]
    pub(crate) trigger_method: TriggerResolution,

    /// Flip the sign of eta in all fill tuples
    #[arg(long)]
    pub(crate) swap_eta: bool,

    /// Only record tracks matched to a physical primary MC particle
    #[arg(long)]
    pub(crate) require_mc: bool,

    /// Weight fills with the generator weight of MC events
    #[arg(long)]
    pub(crate) mc_weights: bool,

    /// Analyse calorimeter clusters in addition to tracks
    #[arg(long)]
    pub(crate) clusters: bool,

    /// Minimum cluster energy
    #[arg(long, default_value = "0.")]
    pub(crate) min_cluster_energy: f64,

    /// Verbosity level
    #[arg(
        short,
        long,
        default_value = "Info",
        help = "Verbosity level.\nPossible values with increasing amount of output are\n'off', 'error', 'warn', 'info', 'debug', 'trace'."
    )]
    pub(crate) loglevel: String,

    /// Input event files
    #[arg(value_name = "INFILES", required = true)]
    pub(crate) infiles: Vec<PathBuf>,
}

impl Opt {
    pub(crate) fn validate(self) -> Result<Self> {
        ensure!(
            self.kine.minpt < self.kine.maxpt,
            "--minpt has to be smaller than --maxpt"
        );
        ensure!(self.kine.maxeta > 0., "--maxeta has to be positive");
        Ok(self)
    }
}
