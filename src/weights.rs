use noisy_float::prelude::*;

use crate::event::McEvent;
use crate::traits::EventWeighter;

/// Weighting policy assigning unit weight to every event
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd)]
pub struct UnitWeighter {}

impl EventWeighter for UnitWeighter {
    fn event_weight(&self, _mc: &McEvent) -> N64 {
        n64(1.)
    }
}

/// Weight every fill with 1
pub const UNIT_WEIGHT: UnitWeighter = UnitWeighter {};

/// Weighting policy using the generator weight of the underlying
/// Monte-Carlo event
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd)]
pub struct GeneratorWeighter {}

impl EventWeighter for GeneratorWeighter {
    fn event_weight(&self, mc: &McEvent) -> N64 {
        mc.weight
    }
}

/// Weight every fill with the generator weight
pub const GENERATOR_WEIGHT: GeneratorWeighter = GeneratorWeighter {};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighters() {
        let mc = McEvent {
            particles: Vec::new(),
            weight: n64(0.25),
        };
        assert_eq!(UNIT_WEIGHT.event_weight(&mc), n64(1.));
        assert_eq!(GENERATOR_WEIGHT.event_weight(&mc), n64(0.25));
    }
}
