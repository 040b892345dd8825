//! ICE countermeasures and encounter records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::IceEncounterId;

/// Family of intrusion countermeasure guarding a terminal.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IceType {
    /// Watches and traces; never pushes back.
    Passive,
    /// Fights for the session and severs it on a win.
    Active,
    /// Feedback constructs that reach through the jack for the mind behind it.
    Lethal,
}

impl IceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IceType::Passive => "Passive",
            IceType::Active => "Active",
            IceType::Lethal => "Lethal",
        }
    }

    /// One-line description for narration.
    pub fn description(&self) -> &'static str {
        match self {
            IceType::Passive => "A tracer construct, patient and silent, mapping you back to your body",
            IceType::Active => "A hunter-killer that wants your session, not your life",
            IceType::Lethal => "Black code, old and awake, that burns along the jack toward the mind",
        }
    }
}

impl fmt::Display for IceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an ICE engagement ended.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IceOutcome {
    /// Triggered but not yet adjudicated.
    Pending,
    /// The intruder broke the construct.
    CharacterWon,
    /// The construct got what it wanted.
    IceWon,
    /// Slipped past without a fight (passive ICE only).
    Evaded,
}

impl IceOutcome {
    pub fn is_pending(&self) -> bool {
        matches!(self, IceOutcome::Pending)
    }

    /// The intruder came out ahead, by force or by stealth.
    pub fn character_prevailed(&self) -> bool {
        matches!(self, IceOutcome::CharacterWon | IceOutcome::Evaded)
    }

    pub fn ice_won(&self) -> bool {
        matches!(self, IceOutcome::IceWon)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IceOutcome::Pending => "Pending",
            IceOutcome::CharacterWon => "CharacterWon",
            IceOutcome::IceWon => "IceWon",
            IceOutcome::Evaded => "Evaded",
        }
    }
}

impl fmt::Display for IceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One triggered countermeasure on an infiltration.
///
/// Immutable once created; adjudication produces an updated copy via
/// [`IceEncounter::with_outcome`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct IceEncounter {
    pub id: IceEncounterId,
    pub ice_type: IceType,
    /// Construct strength, on the same scale as terminal security ratings.
    pub rating: i32,
    /// Whether the construct noticed the intruder at all.
    pub triggered: bool,
    pub outcome: IceOutcome,
}

impl IceEncounter {
    /// A freshly triggered, unresolved encounter with a generated id.
    pub fn triggered(ice_type: IceType, rating: i32) -> Self {
        Self {
            id: IceEncounterId::generate(),
            ice_type,
            rating,
            triggered: true,
            outcome: IceOutcome::Pending,
        }
    }

    /// Copy of this encounter with the adjudicated outcome. Identity, type,
    /// and rating carry over unchanged.
    pub fn with_outcome(&self, outcome: IceOutcome) -> Self {
        Self {
            outcome,
            ..self.clone()
        }
    }

    /// Difficulty to shake the construct: ceiling of rating over six,
    /// never below 1.
    pub fn dc(&self) -> i32 {
        ((self.rating + 5) / 6).max(1)
    }

    pub fn is_pending(&self) -> bool {
        self.outcome.is_pending()
    }

    pub fn character_prevailed(&self) -> bool {
        self.outcome.character_prevailed()
    }

    pub fn ice_won(&self) -> bool {
        self.outcome.ice_won()
    }
}

impl fmt::Display for IceEncounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ICE (Rating {}, DC {}) [{}]",
            self.ice_type,
            self.rating,
            self.dc(),
            self.outcome
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dc_scales_with_rating_and_floors_at_one() {
        let cases = [(12, 2), (16, 3), (20, 4), (24, 4), (6, 1), (1, 1), (0, 1)];
        for (rating, dc) in cases {
            let enc = IceEncounter::triggered(IceType::Active, rating);
            assert_eq!(enc.dc(), dc, "rating {rating}");
        }
    }

    #[test]
    fn triggered_encounters_start_pending() {
        let enc = IceEncounter::triggered(IceType::Passive, 12);
        assert!(enc.triggered);
        assert!(enc.is_pending());
        assert!(enc.id.as_str().starts_with("ice-"));
    }

    #[test]
    fn with_outcome_preserves_identity() {
        let enc = IceEncounter::triggered(IceType::Lethal, 24);
        let resolved = enc.with_outcome(IceOutcome::IceWon);

        assert_eq!(resolved.id, enc.id);
        assert_eq!(resolved.ice_type, IceType::Lethal);
        assert_eq!(resolved.rating, 24);
        assert!(resolved.triggered);
        assert!(resolved.ice_won());
        // The original record is untouched.
        assert!(enc.is_pending());
    }

    #[test]
    fn evaded_counts_as_prevailing_but_not_as_a_win() {
        assert!(IceOutcome::Evaded.character_prevailed());
        assert!(IceOutcome::CharacterWon.character_prevailed());
        assert!(!IceOutcome::IceWon.character_prevailed());
        assert!(!IceOutcome::Pending.character_prevailed());
        assert_ne!(IceOutcome::Evaded, IceOutcome::CharacterWon);
    }

    #[test]
    fn display_names_type_rating_and_outcome() {
        let enc = IceEncounter::triggered(IceType::Active, 16);
        let line = enc.to_string();
        assert_eq!(line, "Active ICE (Rating 16, DC 3) [Pending]");
    }
}
