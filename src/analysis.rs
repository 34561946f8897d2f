use log::{error, info};
use thiserror::Error;

use crate::binning::BinningConfig;
use crate::event::EventRecord;
use crate::progress_bar::ProgressBar;
use crate::traits::{AnalysisComponent, ComponentError, Progress};

/// Builder for an [Analysis]
pub struct AnalysisBuilder<R> {
    /// Source of event records
    pub reader: R,
    /// Axis definitions handed to every component
    pub binning: BinningConfig,
    /// The analysis components fed with each event
    pub components: Vec<Box<dyn AnalysisComponent>>,
}

impl<R> AnalysisBuilder<R> {
    pub fn build(self) -> Analysis<R> {
        Analysis {
            reader: self.reader,
            binning: self.binning,
            components: self.components,
        }
    }
}

impl<R> From<AnalysisBuilder<R>> for Analysis<R> {
    fn from(b: AnalysisBuilder<R>) -> Self {
        b.build()
    }
}

/// The main analysis driving a set of components over all events
pub struct Analysis<R> {
    reader: R,
    binning: BinningConfig,
    components: Vec<Box<dyn AnalysisComponent>>,
}

impl<R> From<Analysis<R>> for AnalysisBuilder<R> {
    fn from(a: Analysis<R>) -> Self {
        AnalysisBuilder {
            reader: a.reader,
            binning: a.binning,
            components: a.components,
        }
    }
}

#[derive(Debug, Error)]
pub enum AnalysisError<E> {
    #[error("Failed to read event: {0}")]
    ReadErr(E),
    #[error("Failed to create histograms: {0}")]
    InitErr(ComponentError),
}

impl<R, E> Analysis<R>
where
    R: Iterator<Item = Result<EventRecord, E>>,
{
    /// Run the analysis
    ///
    /// Every component first registers its histograms, then each event
    /// is passed to each component in reading order. An initialization
    /// error aborts the run. A component failing on an event abandons
    /// that event for this component only; the error is logged and the
    /// run continues.
    pub fn run(&mut self) -> Result<(), AnalysisError<E>> {
        use AnalysisError::*;

        for component in &mut self.components {
            component.create_histos(&self.binning).map_err(InitErr)?;
            info!(
                "Created {} histograms for component `{}`",
                component.sink().len(),
                component.name()
            );
        }

        let (nevents_min, nevents_max) = self.reader.size_hint();
        let progress = ProgressBar::new(
            nevents_max.unwrap_or(nevents_min) as u64,
            "events analysed:",
        );
        let mut nevents = 0u64;
        let components = &mut self.components;
        for event in self.reader.by_ref() {
            let event = event.map_err(ReadErr)?;
            for component in components.iter_mut() {
                if let Err(err) = component.process(&event) {
                    error!(
                        "Component `{}` failed on event {}: {err}",
                        component.name(),
                        event.id()
                    );
                }
            }
            nevents += 1;
            progress.inc(1);
        }
        progress.finish();
        info!("Analysed {nevents} events");
        Ok(())
    }

    /// Hand back the components with their accumulated histogram sinks
    pub fn into_components(self) -> Vec<Box<dyn AnalysisComponent>> {
        self.components
    }
}
