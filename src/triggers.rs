use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// The trigger classes for which histograms are recorded
///
/// `Display` renders the name used as histogram key suffix.
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
pub enum TriggerClass {
    /// Minimum bias events
    MinBias,
    /// Jet-triggered events, high threshold
    EMCJHigh,
    /// Jet-triggered events, low threshold
    EMCJLow,
    /// Gamma-triggered events, high threshold
    EMCGHigh,
    /// Gamma-triggered events, low threshold
    EMCGLow,
    /// Events firing both jet and gamma triggers at high threshold
    EMCHighBoth,
    /// Events firing only the gamma trigger at high threshold
    EMCHighGammaOnly,
    /// Events firing only the jet trigger at high threshold
    EMCHighJetOnly,
    /// Events firing both jet and gamma triggers at low threshold
    EMCLowBoth,
    /// Events firing only the gamma trigger at low threshold
    EMCLowGammaOnly,
    /// Events firing only the jet trigger at low threshold
    EMCLowJetOnly,
}

impl TriggerClass {
    /// Human-readable description used in histogram titles
    pub fn title(&self) -> &'static str {
        use TriggerClass::*;
        match self {
            MinBias => "min. bias events",
            EMCJHigh => "jet-triggered events (high threshold)",
            EMCJLow => "jet-triggered events (low threshold)",
            EMCGHigh => "gamma-triggered events (high threshold)",
            EMCGLow => "gamma-triggered events (low threshold)",
            EMCHighBoth => "jet and gamma triggered events (high threshold)",
            EMCHighGammaOnly => "exclusively gamma-triggered events (high threshold)",
            EMCHighJetOnly => "exclusively jet-triggered events (high threshold)",
            EMCLowBoth => "jet and gamma triggered events (low threshold)",
            EMCLowGammaOnly => "exclusively gamma-triggered events (low threshold)",
            EMCLowJetOnly => "exclusively jet-triggered events (low threshold)",
        }
    }
}

/// The trigger flags that selected one event
///
/// Immutable once attached to an event record.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize)]
pub struct TriggerDecision {
    /// Minimum bias trigger
    pub min_bias: bool,
    /// Jet trigger, high threshold
    #[serde(default)]
    pub jet_high: bool,
    /// Jet trigger, low threshold
    #[serde(default)]
    pub jet_low: bool,
    /// Gamma trigger, high threshold
    #[serde(default)]
    pub gamma_high: bool,
    /// Gamma trigger, low threshold
    #[serde(default)]
    pub gamma_low: bool,
}

impl TriggerDecision {
    /// Construct a decision from the detector's fired-trigger-classes
    /// string
    ///
    /// Class tokens are matched anywhere in the string, e.g.
    /// `"CINT7-B-NOPF-ALLNOTRD CEMC7EJ1-B-NOPF-CENTNOTRD"` sets the
    /// minimum-bias and high-threshold jet flags.
    pub fn from_fired_classes(classes: &str) -> Self {
        lazy_static! {
            static ref MIN_BIAS: Regex = Regex::new(r"INT7|CPBI").unwrap();
            static ref JET_HIGH: Regex = Regex::new(r"EJ1|EJE").unwrap();
            static ref JET_LOW: Regex = Regex::new(r"EJ2").unwrap();
            static ref GAMMA_HIGH: Regex = Regex::new(r"EG1|EGA").unwrap();
            static ref GAMMA_LOW: Regex = Regex::new(r"EG2").unwrap();
        }
        Self {
            min_bias: MIN_BIAS.is_match(classes),
            jet_high: JET_HIGH.is_match(classes),
            jet_low: JET_LOW.is_match(classes),
            gamma_high: GAMMA_HIGH.is_match(classes),
            gamma_low: GAMMA_LOW.is_match(classes),
        }
    }

    /// Whether any trigger selected the event
    pub fn any(&self) -> bool {
        self.min_bias || self.jet_high || self.jet_low || self.gamma_high || self.gamma_low
    }
}

/// How trigger classes are resolved from a decision
#[derive(
    Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Display, EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum TriggerMethod {
    /// One class per active trigger flag
    #[default]
    Direct,
    /// Pairwise combinations of the jet and gamma triggers, separately
    /// for each threshold
    Combinatorial,
}

/// Resolve the trigger classes a candidate is recorded under
///
/// The minimum-bias designation is always included when the flag is set,
/// independent of other trigger activity. A candidate is recorded once per
/// returned class; overlap between classes is by design.
pub fn resolve_classes(decision: &TriggerDecision, method: TriggerMethod) -> Vec<TriggerClass> {
    use TriggerClass::*;
    let mut classes = Vec::new();
    if decision.min_bias {
        classes.push(MinBias);
    }
    match method {
        TriggerMethod::Direct => {
            if decision.jet_high {
                classes.push(EMCJHigh);
            }
            if decision.jet_low {
                classes.push(EMCJLow);
            }
            if decision.gamma_high {
                classes.push(EMCGHigh);
            }
            if decision.gamma_low {
                classes.push(EMCGLow);
            }
        }
        TriggerMethod::Combinatorial => {
            match (decision.jet_high, decision.gamma_high) {
                (true, true) => classes.push(EMCHighBoth),
                (true, false) => classes.push(EMCHighJetOnly),
                (false, true) => classes.push(EMCHighGammaOnly),
                (false, false) => {}
            }
            match (decision.jet_low, decision.gamma_low) {
                (true, true) => classes.push(EMCLowBoth),
                (true, false) => classes.push(EMCLowJetOnly),
                (false, true) => classes.push(EMCLowGammaOnly),
                (false, false) => {}
            }
        }
    }
    classes
}
