use noisy_float::prelude::*;
use serde::{Deserialize, Serialize};

use crate::event::Track;
use crate::traits::TrackSelection;

/// An inclusive range of allowed values for one cut variable
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
pub struct CutRange<T> {
    min: T,
    max: T,
}

impl<T: PartialOrd + Copy> CutRange<T> {
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    /// Whether `value` lies inside the range, bounds included
    pub fn contains(&self, value: T) -> bool {
        self.min <= value && value <= self.max
    }

    pub fn limits(&self) -> (T, T) {
        (self.min, self.max)
    }
}

impl CutRange<N64> {
    /// A range accepting every value
    pub fn open() -> Self {
        Self::new(n64(f64::MIN), n64(f64::MAX))
    }
}

impl Default for CutRange<N64> {
    fn default() -> Self {
        Self::open()
    }
}

/// Kinematic ranges applied to each track candidate
///
/// All ranges are checked in order and the first failing one rejects the
/// candidate.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct KineCuts {
    #[serde(default)]
    pub pt: CutRange<N64>,
    #[serde(default)]
    pub eta: CutRange<N64>,
    #[serde(default)]
    pub phi: CutRange<N64>,
}

impl KineCuts {
    pub fn new(pt: CutRange<N64>, eta: CutRange<N64>, phi: CutRange<N64>) -> Self {
        Self { pt, eta, phi }
    }

    /// Whether a candidate with the given kinematics passes all ranges
    pub fn is_selected(&self, pt: N64, eta: N64, phi: N64) -> bool {
        self.pt.contains(pt) && self.eta.contains(eta) && self.phi.contains(phi)
    }
}

/// Track-quality selection accepting every track
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd)]
pub struct AcceptAll {}

impl TrackSelection for AcceptAll {
    fn is_accepted(&self, _track: &Track) -> bool {
        true
    }
}

/// Accept all tracks
pub const ACCEPT_ALL: AcceptAll = AcceptAll {};

/// Track-quality selection requiring membership in a set of
/// reconstruction filter classes
///
/// A track is accepted if any of its quality bits is contained in the
/// configured mask.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Deserialize, Serialize)]
pub struct FilterBitSelection {
    mask: u32,
}

impl FilterBitSelection {
    pub fn new(mask: u32) -> Self {
        Self { mask }
    }
}

impl TrackSelection for FilterBitSelection {
    fn is_accepted(&self, track: &Track) -> bool {
        track.filter_bits & self.mask != 0
    }
}
