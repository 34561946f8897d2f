use noisy_float::prelude::*;
use thiserror::Error;

use crate::binning::{BinningConfig, BinningError};
use crate::event::{EventRecord, McEvent, Track};
use crate::sink::{HistogramSink, SinkError};

/// An analysis component accumulating histograms from the events passed
/// to it
///
/// Components own their histogram sink exclusively; it is only mutated
/// through fills issued from [process](Self::process).
pub trait AnalysisComponent {
    /// Component name, used to group histograms in the output
    fn name(&self) -> &str;

    /// Register all histograms
    ///
    /// Called exactly once, before the first call to
    /// [process](Self::process). Axis definitions are resolved from
    /// `binning`; an unknown dimension name is reported here, never at
    /// fill time.
    fn create_histos(&mut self, binning: &BinningConfig) -> Result<(), ComponentError>;

    /// Analyse one event
    fn process(&mut self, event: &EventRecord) -> Result<(), ComponentError>;

    /// The histograms accumulated so far
    fn sink(&self) -> &HistogramSink;

    /// Extract the accumulated histograms, leaving an empty sink behind
    fn take_sink(&mut self) -> HistogramSink;
}

/// Errors from analysis component initialization or per-event processing
#[derive(Debug, Error)]
pub enum ComponentError {
    #[error(transparent)]
    Binning(#[from] BinningError),
    #[error(transparent)]
    Sink(#[from] SinkError),
    #[error("Event has no matched-track collection")]
    MissingTracks,
    #[error("Event has no reconstructed-event summary")]
    MissingRecSummary,
}

/// Track-quality selection
pub trait TrackSelection {
    /// Decide whether a track passes the quality selection
    fn is_accepted(&self, track: &Track) -> bool;
}

/// Per-event weighting policy
pub trait EventWeighter {
    /// Weight applied to every histogram fill for this event
    ///
    /// Called at most once per event, and only for events carrying
    /// generator-level information.
    fn event_weight(&self, mc: &McEvent) -> N64;
}

/// Progress indicator
pub trait Progress {
    fn inc(&self, i: u64);
    fn finish(&self);
}
