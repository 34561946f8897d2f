use std::collections::HashMap;

use itertools::zip_eq;
use noisy_float::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::binning::AxisSpec;

/// A histogram axis with monotonically increasing bin edges
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
pub struct Axis {
    label: String,
    edges: Vec<N64>,
}

impl Axis {
    pub fn new(label: &str, spec: &AxisSpec) -> Self {
        Self::with_edges(label, spec.edges())
    }

    pub fn with_edges(label: &str, edges: Vec<N64>) -> Self {
        debug_assert!(edges.len() > 1);
        debug_assert!(edges.windows(2).all(|w| w[0] < w[1]));
        Self {
            label: label.to_owned(),
            edges,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn nbins(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn edges(&self) -> &[N64] {
        &self.edges
    }

    /// The number of the bin containing `value`
    ///
    /// Bin 0 is the underflow bin, bins 1 to `nbins()` cover the axis
    /// range with the lower edge included, and bin `nbins() + 1` is the
    /// overflow bin. The upper edge of the last bin is included in that
    /// bin.
    pub fn find_bin(&self, value: N64) -> usize {
        match self.edges.binary_search(&value) {
            Ok(idx) if idx == self.nbins() => idx,
            Ok(idx) => idx + 1,
            Err(idx) => idx,
        }
    }
}

/// The accumulated content of one histogram bin
///
/// Stores the sum of fill weights and the sum of their squares.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
pub struct BinContent {
    pub sum_w: N64,
    pub sum_w2: N64,
}

impl BinContent {
    fn add(&mut self, weight: N64) {
        self.sum_w += weight;
        self.sum_w2 += weight * weight;
    }

    fn add_content(&mut self, other: &BinContent) {
        self.sum_w += other.sum_w;
        self.sum_w2 += other.sum_w2;
    }
}

/// Axes of two merged histograms do not agree
#[derive(Clone, Debug, Error)]
#[error("Incompatible axes in histogram merge")]
pub struct IncompatibleAxes;

/// A multi-dimensional histogram storing only its populated bins
///
/// The number and order of axes are fixed at creation and never change
/// afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SparseHistogram {
    title: String,
    axes: Vec<Axis>,
    bins: HashMap<Vec<usize>, BinContent>,
}

impl SparseHistogram {
    pub fn new(title: &str, axes: Vec<Axis>) -> Self {
        Self {
            title: title.to_owned(),
            axes,
            bins: HashMap::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    pub fn ndim(&self) -> usize {
        self.axes.len()
    }

    /// Add `weight` to the bin containing `values`
    ///
    /// # Panics
    ///
    /// The dimension of `values` has to match the number of axes.
    /// Anything else is a programming error in the calling component, so
    /// a mismatch panics instead of truncating or padding the tuple.
    pub fn fill(&mut self, values: &[N64], weight: N64) {
        let bin: Vec<_> = zip_eq(&self.axes, values)
            .map(|(axis, value)| axis.find_bin(*value))
            .collect();
        self.bins.entry(bin).or_default().add(weight);
    }

    /// Content of the given bin, zero if never filled
    pub fn value(&self, bin: &[usize]) -> BinContent {
        self.bins.get(bin).copied().unwrap_or_default()
    }

    /// Number of populated bins
    pub fn n_filled_bins(&self) -> usize {
        self.bins.len()
    }

    /// Sum of weights over all bins, underflow and overflow included
    pub fn integral(&self) -> N64 {
        self.bins.values().map(|content| content.sum_w).sum()
    }

    /// Iterate over the populated bins
    pub fn iter(&self) -> impl Iterator<Item = (&[usize], &BinContent)> {
        self.bins.iter().map(|(bin, content)| (bin.as_slice(), content))
    }

    /// Add the bin contents of `other`
    ///
    /// Merging is commutative and associative, so histograms accumulated
    /// by independent workers can be combined in any order.
    pub fn merge(&mut self, other: &SparseHistogram) -> Result<(), IncompatibleAxes> {
        if self.axes != other.axes {
            return Err(IncompatibleAxes);
        }
        for (bin, content) in &other.bins {
            self.bins
                .entry(bin.clone())
                .or_default()
                .add_content(content);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt_axis() -> Axis {
        Axis::with_edges("pt", [0., 1., 2., 5.].into_iter().map(n64).collect())
    }

    #[test]
    fn bin_numbers_cover_underflow_range_and_overflow() {
        let axis = pt_axis();
        assert_eq!(axis.find_bin(n64(-1.)), 0);
        assert_eq!(axis.find_bin(n64(0.)), 1);
        assert_eq!(axis.find_bin(n64(0.5)), 1);
        assert_eq!(axis.find_bin(n64(1.)), 2);
        assert_eq!(axis.find_bin(n64(3.)), 3);
        assert_eq!(axis.find_bin(n64(5.)), 3);
        assert_eq!(axis.find_bin(n64(5.1)), 4);
    }

    #[test]
    fn fill_accumulates_weight_and_squared_weight() {
        let mut histo = SparseHistogram::new("test", vec![pt_axis()]);
        histo.fill(&[n64(0.5)], n64(2.));
        histo.fill(&[n64(0.7)], n64(3.));
        let content = histo.value(&[1]);
        assert_eq!(content.sum_w, n64(5.));
        assert_eq!(content.sum_w2, n64(13.));
        assert_eq!(histo.n_filled_bins(), 1);
        assert_eq!(histo.integral(), n64(5.));
    }

    #[test]
    #[should_panic]
    fn fill_dimension_mismatch_panics() {
        let mut histo = SparseHistogram::new("test", vec![pt_axis()]);
        histo.fill(&[n64(0.5), n64(1.)], n64(1.));
    }

    #[test]
    fn merge_equals_sequential_filling() {
        let values = [[0.5, 1.5], [1.5, 0.5], [4., 4.], [0.5, 1.5]];
        let axes = || vec![pt_axis(), pt_axis()];

        let mut sequential = SparseHistogram::new("test", axes());
        for v in &values {
            sequential.fill(&[n64(v[0]), n64(v[1])], n64(1.));
        }

        let mut first = SparseHistogram::new("test", axes());
        let mut second = SparseHistogram::new("test", axes());
        for v in &values[..2] {
            first.fill(&[n64(v[0]), n64(v[1])], n64(1.));
        }
        for v in &values[2..] {
            second.fill(&[n64(v[0]), n64(v[1])], n64(1.));
        }
        first.merge(&second).unwrap();
        assert_eq!(first, sequential);
    }

    #[test]
    fn merge_rejects_incompatible_axes() {
        let mut histo = SparseHistogram::new("test", vec![pt_axis()]);
        let other = SparseHistogram::new(
            "test",
            vec![Axis::with_edges("eta", vec![n64(-1.), n64(1.)])],
        );
        assert!(histo.merge(&other).is_err());
    }
}
