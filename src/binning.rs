use std::collections::HashMap;

use noisy_float::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Binning of one histogram axis
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AxisSpec {
    /// Explicit ascending bin edges
    Variable(Vec<N64>),
    /// `nbins` equal-width bins between `min` and `max`
    Uniform { nbins: usize, min: N64, max: N64 },
}

impl AxisSpec {
    pub fn nbins(&self) -> usize {
        match self {
            Self::Variable(edges) => edges.len().saturating_sub(1),
            Self::Uniform { nbins, .. } => *nbins,
        }
    }

    /// The bin edges, `nbins() + 1` ascending values
    pub fn edges(&self) -> Vec<N64> {
        match self {
            Self::Variable(edges) => edges.clone(),
            Self::Uniform { nbins, min, max } => (0..=*nbins)
                .map(|i| *min + (*max - *min) * (i as f64 / *nbins as f64))
                .collect(),
        }
    }
}

#[derive(Clone, Debug, Error)]
pub enum BinningError {
    #[error("No binning defined for dimension `{0}`")]
    UnknownDimension(String),
}

/// Axis definitions keyed by the name of the binned variable
///
/// Components resolve their axes here during histogram creation, so a
/// missing dimension surfaces before any event is processed.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct BinningConfig {
    dimensions: HashMap<String, AxisSpec>,
}

impl BinningConfig {
    /// An empty configuration without any dimensions
    pub fn empty() -> Self {
        Self {
            dimensions: HashMap::new(),
        }
    }

    /// Define or replace the binning for a dimension
    pub fn set(&mut self, name: &str, spec: AxisSpec) -> &mut Self {
        self.dimensions.insert(name.to_owned(), spec);
        self
    }

    /// Look up the binning for a dimension
    pub fn get(&self, name: &str) -> Result<&AxisSpec, BinningError> {
        self.dimensions
            .get(name)
            .ok_or_else(|| BinningError::UnknownDimension(name.to_owned()))
    }

    pub fn dimensions(&self) -> impl Iterator<Item = &str> {
        self.dimensions.keys().map(|k| k.as_str())
    }
}

/// The conventional analysis binnings for `pt`, `eta`, `phi`, `zvertex`
/// and `energy`
impl Default for BinningConfig {
    fn default() -> Self {
        let momentum_edges: Vec<_> = [
            0., 0.5, 1., 1.5, 2., 2.5, 3., 3.5, 4., 5., 6., 8., 10., 12., 16., 20., 30., 40.,
            60., 80., 100.,
        ]
        .into_iter()
        .map(n64)
        .collect();
        let mut config = Self::empty();
        config
            .set("pt", AxisSpec::Variable(momentum_edges.clone()))
            .set("energy", AxisSpec::Variable(momentum_edges))
            .set(
                "eta",
                AxisSpec::Uniform {
                    nbins: 16,
                    min: n64(-0.8),
                    max: n64(0.8),
                },
            )
            .set(
                "phi",
                AxisSpec::Uniform {
                    nbins: 20,
                    min: n64(0.),
                    max: n64(2. * std::f64::consts::PI),
                },
            )
            .set(
                "zvertex",
                AxisSpec::Uniform {
                    nbins: 10,
                    min: n64(-10.),
                    max: n64(10.),
                },
            );
        config
    }
}
