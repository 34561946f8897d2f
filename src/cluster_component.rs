use log::debug;
use noisy_float::prelude::*;
use strum::IntoEnumIterator;
use typed_builder::TypedBuilder;

use crate::binning::BinningConfig;
use crate::event::EventRecord;
use crate::histogram::Axis;
use crate::selection::CutRange;
use crate::sink::HistogramSink;
use crate::traits::{AnalysisComponent, ComponentError};
use crate::triggers::{resolve_classes, TriggerClass, TriggerMethod};

/// Analysis component for calorimeter clusters
///
/// Records cluster energy and position for each trigger class the event
/// is selected by.
#[derive(TypedBuilder)]
pub struct ClusterComponent {
    /// Component name, used to group histograms in the output
    #[builder(default = "clusters".to_owned(), setter(into))]
    name: String,
    /// Allowed energy range for the cluster
    #[builder(default = CutRange::open())]
    energy_range: CutRange<N64>,
    /// How trigger classes are resolved
    #[builder(default)]
    trigger_method: TriggerMethod,
    #[builder(default, setter(skip))]
    sink: HistogramSink,
}

impl AnalysisComponent for ClusterComponent {
    fn name(&self) -> &str {
        &self.name
    }

    fn create_histos(&mut self, binning: &BinningConfig) -> Result<(), ComponentError> {
        let cluster_axes = vec![
            Axis::new("energy", binning.get("energy")?),
            Axis::new("eta", binning.get("eta")?),
            Axis::new("phi", binning.get("phi")?),
            Axis::new("zvertex", binning.get("zvertex")?),
            Axis::with_edges("mbtrigger", vec![n64(-0.5), n64(0.5), n64(1.5)]),
        ];
        for class in TriggerClass::iter() {
            self.sink.create(
                &format!("hClusterHist{class}"),
                &format!("Cluster-based data for {}", class.title()),
                cluster_axes.clone(),
            )?;
        }
        Ok(())
    }

    fn process(&mut self, event: &EventRecord) -> Result<(), ComponentError> {
        let classes = resolve_classes(event.triggers(), self.trigger_method);
        let vertex_z = event
            .rec_summary()
            .ok_or(ComponentError::MissingRecSummary)?
            .vertex_z;
        let min_bias = if event.triggers().min_bias {
            n64(1.)
        } else {
            n64(0.)
        };
        debug!("Number of clusters: {}", event.clusters().len());

        for cluster in event.clusters() {
            if !self.energy_range.contains(cluster.energy) {
                continue;
            }
            let values = [cluster.energy, cluster.eta, cluster.phi, vertex_z, min_bias];
            for class in &classes {
                self.sink
                    .fill(&format!("hClusterHist{class}"), &values, n64(1.))?;
            }
        }
        Ok(())
    }

    fn sink(&self) -> &HistogramSink {
        &self.sink
    }

    fn take_sink(&mut self) -> HistogramSink {
        std::mem::take(&mut self.sink)
    }
}
