use std::collections::hash_map::{Entry, HashMap};

use noisy_float::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::histogram::{Axis, SparseHistogram};

#[derive(Clone, Debug, Error)]
pub enum SinkError {
    #[error("Histogram `{0}` is already registered")]
    DuplicateName(String),
    #[error("No histogram with name `{0}`")]
    UnknownHistogram(String),
    #[error("Incompatible axes for histogram `{0}`")]
    IncompatibleAxes(String),
}

/// A named collection of sparse histograms
///
/// Each analysis component owns one sink exclusively for the whole run
/// and mutates it only through [fill](Self::fill).
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct HistogramSink {
    histos: HashMap<String, SparseHistogram>,
}

impl HistogramSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a histogram under a new name
    pub fn create(&mut self, name: &str, title: &str, axes: Vec<Axis>) -> Result<(), SinkError> {
        match self.histos.entry(name.to_owned()) {
            Entry::Occupied(entry) => Err(SinkError::DuplicateName(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(SparseHistogram::new(title, axes));
                Ok(())
            }
        }
    }

    /// Fill the named histogram
    ///
    /// Names are fixed at creation, so an unknown name is a programming
    /// error in the calling component and reported as such.
    pub fn fill(&mut self, name: &str, values: &[N64], weight: N64) -> Result<(), SinkError> {
        let histo = self
            .histos
            .get_mut(name)
            .ok_or_else(|| SinkError::UnknownHistogram(name.to_owned()))?;
        histo.fill(values, weight);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&SparseHistogram> {
        self.histos.get(name)
    }

    pub fn len(&self) -> usize {
        self.histos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histos.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.histos.keys().map(|name| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SparseHistogram)> {
        self.histos
            .iter()
            .map(|(name, histo)| (name.as_str(), histo))
    }

    /// Merge the histograms of `other` into this sink, bin-wise
    ///
    /// Histograms unknown to this sink are adopted as they are.
    pub fn merge(&mut self, other: HistogramSink) -> Result<(), SinkError> {
        for (name, histo) in other.histos {
            match self.histos.entry(name) {
                Entry::Occupied(mut entry) => {
                    if entry.get_mut().merge(&histo).is_err() {
                        return Err(SinkError::IncompatibleAxes(entry.key().clone()));
                    }
                }
                Entry::Vacant(entry) => {
                    entry.insert(histo);
                }
            }
        }
        Ok(())
    }
}

/// Merge the sinks of independent workers into one
///
/// Merging is bin-wise addition, commutative and associative, so the
/// reduction order is irrelevant.
pub fn merge_sinks(sinks: Vec<HistogramSink>) -> Result<HistogramSink, SinkError> {
    sinks
        .into_par_iter()
        .map(Ok)
        .try_reduce(HistogramSink::new, |mut acc, sink| {
            acc.merge(sink)?;
            Ok(acc)
        })
}
