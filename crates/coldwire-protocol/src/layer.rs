//! Intrusion layers and skill-check grades.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The three intrusion layers, in breach order.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum BreachLayer {
    /// Layer 1: reach the system and hold a raw session.
    Access,
    /// Layer 2: defeat credential checks.
    Authentication,
    /// Layer 3: navigate the internals to the objective.
    Navigation,
}

impl BreachLayer {
    /// 1-based layer number for display and persistence.
    pub fn number(&self) -> u8 {
        match self {
            BreachLayer::Access => 1,
            BreachLayer::Authentication => 2,
            BreachLayer::Navigation => 3,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(BreachLayer::Access),
            2 => Some(BreachLayer::Authentication),
            3 => Some(BreachLayer::Navigation),
            _ => None,
        }
    }

    /// The layer after this one, if any.
    pub fn next(&self) -> Option<Self> {
        match self {
            BreachLayer::Access => Some(BreachLayer::Authentication),
            BreachLayer::Authentication => Some(BreachLayer::Navigation),
            BreachLayer::Navigation => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BreachLayer::Access => "Access",
            BreachLayer::Authentication => "Authentication",
            BreachLayer::Navigation => "Navigation",
        }
    }
}

impl fmt::Display for BreachLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grade of an already-resolved skill check.
///
/// Dice, DCs, and modifiers live upstream in the resolver; the state
/// machine only consumes the grade.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CheckOutcome {
    CriticalSuccess,
    Success,
    /// Got something, but not a clean advance. The layer ladder treats it
    /// as a failure grade.
    PartialSuccess,
    Failure,
    /// Catastrophic botch. Burns the whole run.
    Fumble,
}

impl CheckOutcome {
    /// Grades that advance a layer.
    pub fn is_success(&self) -> bool {
        matches!(self, CheckOutcome::Success | CheckOutcome::CriticalSuccess)
    }

    pub fn is_critical(&self) -> bool {
        matches!(self, CheckOutcome::CriticalSuccess)
    }

    pub fn is_fumble(&self) -> bool {
        matches!(self, CheckOutcome::Fumble)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckOutcome::CriticalSuccess => "CriticalSuccess",
            CheckOutcome::Success => "Success",
            CheckOutcome::PartialSuccess => "PartialSuccess",
            CheckOutcome::Failure => "Failure",
            CheckOutcome::Fumble => "Fumble",
        }
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one layer attempt, as recorded on the infiltration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LayerResult {
    pub layer: BreachLayer,
    pub outcome: CheckOutcome,
    /// Narration attached by the resolver; empty when none was produced.
    #[serde(default)]
    pub narrative: String,
}

impl LayerResult {
    pub fn new(layer: BreachLayer, outcome: CheckOutcome, narrative: impl Into<String>) -> Self {
        Self {
            layer,
            outcome,
            narrative: narrative.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }

    pub fn is_critical(&self) -> bool {
        self.outcome.is_critical()
    }

    pub fn is_fumble(&self) -> bool {
        self.outcome.is_fumble()
    }
}
