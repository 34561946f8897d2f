pub use crate::{
    analysis::{Analysis, AnalysisBuilder},
    binning::BinningConfig,
    cluster_component::ClusterComponent,
    event::{EventBuilder, EventRecord},
    reader::{CombinedReader, EventFileReader},
    sink::HistogramSink,
    track_component::TrackComponent,
    traits::AnalysisComponent,
    triggers::{TriggerDecision, TriggerMethod},
    weights::{GENERATOR_WEIGHT, UNIT_WEIGHT},
    writer::HistogramWriter,
};
