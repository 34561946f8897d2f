//! `trigana` accumulates trigger-class resolved histograms from per-event
//! track and cluster collections of a collider experiment.
//!
//! An external driver feeds one [EventRecord](event::EventRecord) at a time
//! to a set of [analysis components](traits::AnalysisComponent). Each
//! component resolves the trigger classes that selected the event, applies
//! its selection cuts to the candidate collection, and fills sparse
//! multi-dimensional histograms in its own
//! [HistogramSink](sink::HistogramSink), one set per trigger class.
//!
//! # How to use
//!
//! Probably the best way to get started is to look at the demos, starting
//! with `demos/minimal.rs`.
//!
//! ## Most relevant modules
//!
//! - [prelude] exports a list of the most relevant classes and objects
//! - [analysis] contains the main class driving the event loop
//! - [event] for the internal event format
//! - [triggers] for trigger decisions and trigger-class resolution
//! - [selection] for kinematic and track-quality cuts
//! - [histogram] and [sink] for sparse histogram accumulation
//!

/// Event loop driver
pub mod analysis;
/// Named axis binning configuration
pub mod binning;
/// Cluster analysis component
pub mod cluster_component;
/// Per-event data model
pub mod event;
/// Sparse multi-dimensional histograms
pub mod histogram;
/// Most important exports
pub mod prelude;
/// Progress bar
pub mod progress_bar;
/// Event file readers
pub mod reader;
/// Kinematic and track-quality selection
pub mod selection;
/// Named histogram collections
pub mod sink;
/// Track analysis component
pub mod track_component;
/// Common traits
pub mod traits;
/// Trigger decisions and trigger-class resolution
pub mod triggers;
/// Event weighting policies
pub mod weights;
/// Histogram output
pub mod writer;

use lazy_static::lazy_static;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
lazy_static! {
    pub static ref VERSION_MAJOR: u32 =
        env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap();
    pub static ref VERSION_MINOR: u32 =
        env!("CARGO_PKG_VERSION_MINOR").parse().unwrap();
    pub static ref VERSION_PATCH: u32 =
        env!("CARGO_PKG_VERSION_PATCH").parse().unwrap();
}
