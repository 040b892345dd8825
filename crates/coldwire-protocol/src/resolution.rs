//! Consequence directives produced when an ICE engagement is adjudicated.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{IceEncounter, IceOutcome};

/// Save threshold against lethal ICE once it has won the engagement.
pub const LETHAL_SAVE_DC: i32 = 16;

/// What an adjudicated ICE engagement does to the infiltration.
///
/// Pure data. The engagement layer in `coldwire-core` applies the
/// state-side consequences; psychic damage and stress are numbers for the
/// caller to put on the character sheet. Each directive carries the
/// resolved encounter record so the pairing can never drift.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct IceResolution {
    /// The encounter, already stamped with this directive's outcome.
    pub encounter: IceEncounter,
    pub outcome: IceOutcome,
    pub character_roll: i32,
    pub ice_dc: i32,
    /// Neural feedback damage to the intruder (lethal ICE only).
    pub psychic_damage: i32,
    pub stress_gained: i32,
    /// A passive trace completed: the intruder's meat location is known.
    pub location_revealed: bool,
    pub forced_disconnect: bool,
    /// Lockout imposed alongside a forced disconnect: negative is
    /// permanent, zero is none, `n` is minutes.
    pub lockout_minutes: i32,
    pub alert_increase: i32,
    /// Extra dice earned for later checks in this run.
    pub bonus_dice: i32,
    pub narrative: String,
}

impl IceResolution {
    /// Slipped past passive ICE without engaging it. No consequences.
    pub fn passive_evaded(encounter: &IceEncounter, roll: i32) -> Self {
        Self {
            encounter: encounter.with_outcome(IceOutcome::Evaded),
            outcome: IceOutcome::Evaded,
            character_roll: roll,
            ice_dc: encounter.dc(),
            psychic_damage: 0,
            stress_gained: 0,
            location_revealed: false,
            forced_disconnect: false,
            lockout_minutes: 0,
            alert_increase: 0,
            bonus_dice: 0,
            narrative: "You thin your signal to nothing and drift past. The tracer circles \
                        the place you were, finds only cold water."
                .into(),
        }
    }

    /// The passive trace completed: position burned, alarms warmer.
    pub fn passive_failed(encounter: &IceEncounter, roll: i32) -> Self {
        Self {
            encounter: encounter.with_outcome(IceOutcome::IceWon),
            outcome: IceOutcome::IceWon,
            character_roll: roll,
            ice_dc: encounter.dc(),
            psychic_damage: 0,
            stress_gained: 0,
            location_revealed: true,
            forced_disconnect: false,
            lockout_minutes: 0,
            alert_increase: 2,
            bonus_dice: 0,
            narrative: "The tracer settles over your signal and drinks it in. Somewhere above, \
                        a map lights up with exactly where your body is."
                .into(),
        }
    }

    /// Broke an active construct; the opened ground pays out as a bonus die.
    pub fn active_defeated(encounter: &IceEncounter, roll: i32) -> Self {
        Self {
            encounter: encounter.with_outcome(IceOutcome::CharacterWon),
            outcome: IceOutcome::CharacterWon,
            character_roll: roll,
            ice_dc: encounter.dc(),
            psychic_damage: 0,
            stress_gained: 0,
            location_revealed: false,
            forced_disconnect: false,
            lockout_minutes: 0,
            alert_increase: 0,
            bonus_dice: 1,
            narrative: "The hunter-killer comes apart into drifting code. The lattice feels \
                        softer where it died."
                .into(),
        }
    }

    /// Lost the fight for the line: thrown out and briefly barred.
    pub fn active_failed(encounter: &IceEncounter, roll: i32) -> Self {
        Self {
            encounter: encounter.with_outcome(IceOutcome::IceWon),
            outcome: IceOutcome::IceWon,
            character_roll: roll,
            ice_dc: encounter.dc(),
            psychic_damage: 0,
            stress_gained: 0,
            location_revealed: false,
            forced_disconnect: true,
            lockout_minutes: 1,
            alert_increase: 1,
            bonus_dice: 0,
            narrative: "The construct wrests the session out of your hands and slams the port \
                        behind you. Your interface howls with the severance."
                .into(),
        }
    }

    /// Lethal ICE won the engagement but the save held: ejected, shaken,
    /// alive. `stress` comes from the resolver's roll.
    pub fn lethal_saved(encounter: &IceEncounter, save_roll: i32, stress: i32) -> Self {
        Self {
            encounter: encounter.with_outcome(IceOutcome::CharacterWon),
            outcome: IceOutcome::CharacterWon,
            character_roll: save_roll,
            ice_dc: LETHAL_SAVE_DC,
            psychic_damage: 0,
            stress_gained: stress,
            location_revealed: false,
            forced_disconnect: true,
            lockout_minutes: 1,
            alert_increase: 0,
            bonus_dice: 0,
            narrative: "Black code reaches through the jack for your mind. You tear the \
                        connection loose a heartbeat ahead of it and surface gasping."
                .into(),
        }
    }

    /// The save failed: full neural strike, permanent lockout. `damage` and
    /// `stress` come from the resolver's rolls.
    pub fn lethal_failed(
        encounter: &IceEncounter,
        save_roll: i32,
        damage: i32,
        stress: i32,
    ) -> Self {
        Self {
            encounter: encounter.with_outcome(IceOutcome::IceWon),
            outcome: IceOutcome::IceWon,
            character_roll: save_roll,
            ice_dc: LETHAL_SAVE_DC,
            psychic_damage: damage,
            stress_gained: stress,
            location_revealed: false,
            forced_disconnect: true,
            lockout_minutes: -1,
            alert_increase: 2,
            bonus_dice: 0,
            narrative: "The old code gets through every ward you own and burns down the jack \
                        into you. The world goes to static and copper."
                .into(),
        }
    }

    pub fn character_won(&self) -> bool {
        self.outcome.character_prevailed()
    }

    pub fn has_damage(&self) -> bool {
        self.psychic_damage > 0
    }

    pub fn has_stress(&self) -> bool {
        self.stress_gained > 0
    }

    pub fn is_permanent_lockout(&self) -> bool {
        self.forced_disconnect && self.lockout_minutes < 0
    }

    pub fn has_temporary_lockout(&self) -> bool {
        self.forced_disconnect && self.lockout_minutes > 0
    }

    /// Compact field dump for diagnostic logs.
    pub fn log_line(&self) -> String {
        format!(
            "IceResult[{}] Outcome={} Roll={} DC={} Dmg={} Stress={} Lockout={} Alert={}",
            self.encounter.id,
            self.outcome,
            self.character_roll,
            self.ice_dc,
            self.psychic_damage,
            self.stress_gained,
            self.lockout_minutes,
            self.alert_increase
        )
    }
}

impl fmt::Display for IceResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.character_won() {
            "SUCCESS"
        } else {
            "FAILURE"
        };

        let mut consequences = Vec::new();
        if self.has_damage() {
            consequences.push(format!("{} psychic damage", self.psychic_damage));
        }
        if self.has_stress() {
            consequences.push(format!("{} stress", self.stress_gained));
        }
        if self.location_revealed {
            consequences.push("location revealed".to_string());
        }
        if self.forced_disconnect {
            consequences.push("disconnected".to_string());
        }
        if self.is_permanent_lockout() {
            consequences.push("permanent lockout".to_string());
        } else if self.has_temporary_lockout() {
            consequences.push(format!("{} min lockout", self.lockout_minutes));
        }
        if self.alert_increase > 0 {
            consequences.push(format!("alert +{}", self.alert_increase));
        }
        if self.bonus_dice > 0 {
            consequences.push(format!("+{} bonus dice", self.bonus_dice));
        }

        write!(
            f,
            "ICE Resolution: {} (Roll {} vs DC {})",
            verdict, self.character_roll, self.ice_dc
        )?;
        if !consequences.is_empty() {
            write!(f, " [{}]", consequences.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IceType;

    fn passive() -> IceEncounter {
        IceEncounter::triggered(IceType::Passive, 12)
    }

    fn active() -> IceEncounter {
        IceEncounter::triggered(IceType::Active, 16)
    }

    fn lethal() -> IceEncounter {
        IceEncounter::triggered(IceType::Lethal, 24)
    }

    #[test]
    fn passive_evasion_has_no_consequences() {
        let res = IceResolution::passive_evaded(&passive(), 3);
        assert_eq!(res.outcome, IceOutcome::Evaded);
        assert!(res.character_won());
        assert!(!res.forced_disconnect);
        assert!(!res.location_revealed);
        assert_eq!(res.alert_increase, 0);
        assert_eq!(res.bonus_dice, 0);
    }

    #[test]
    fn failed_passive_trace_burns_the_location() {
        let res = IceResolution::passive_failed(&passive(), 1);
        assert_eq!(res.outcome, IceOutcome::IceWon);
        assert!(res.location_revealed);
        assert_eq!(res.alert_increase, 2);
        assert!(!res.forced_disconnect);
        assert_eq!(res.encounter.outcome, IceOutcome::IceWon);
    }

    #[test]
    fn defeating_active_ice_grants_one_bonus_die() {
        let res = IceResolution::active_defeated(&active(), 4);
        assert_eq!(res.outcome, IceOutcome::CharacterWon);
        assert_eq!(res.bonus_dice, 1);
        assert!(!res.forced_disconnect);
    }

    #[test]
    fn losing_to_active_ice_severs_and_bars_briefly() {
        let res = IceResolution::active_failed(&active(), 1);
        assert!(res.forced_disconnect);
        assert!(res.has_temporary_lockout());
        assert!(!res.is_permanent_lockout());
        assert_eq!(res.lockout_minutes, 1);
        assert_eq!(res.alert_increase, 1);
    }

    #[test]
    fn lethal_save_escapes_with_stress() {
        let enc = lethal();
        let res = IceResolution::lethal_saved(&enc, 18, 4);
        assert_eq!(res.outcome, IceOutcome::CharacterWon);
        assert_eq!(res.ice_dc, LETHAL_SAVE_DC);
        assert!(res.forced_disconnect);
        assert!(res.has_temporary_lockout());
        assert_eq!(res.stress_gained, 4);
        assert!(!res.has_damage());
        assert_eq!(res.encounter.id, enc.id);
    }

    #[test]
    fn failed_lethal_save_is_a_permanent_burn() {
        let res = IceResolution::lethal_failed(&lethal(), 9, 17, 7);
        assert_eq!(res.outcome, IceOutcome::IceWon);
        assert!(res.is_permanent_lockout());
        assert_eq!(res.psychic_damage, 17);
        assert_eq!(res.stress_gained, 7);
        assert_eq!(res.alert_increase, 2);
    }

    #[test]
    fn display_lists_the_consequences() {
        let res = IceResolution::active_failed(&active(), 2);
        let line = res.to_string();
        assert!(line.starts_with("ICE Resolution: FAILURE (Roll 2 vs DC 3)"));
        assert!(line.contains("disconnected"));
        assert!(line.contains("1 min lockout"));
        assert!(line.contains("alert +1"));

        let quiet = IceResolution::passive_evaded(&passive(), 5);
        assert_eq!(quiet.to_string(), "ICE Resolution: SUCCESS (Roll 5 vs DC 2)");
    }

    #[test]
    fn log_line_carries_the_encounter_id() {
        let enc = active();
        let res = IceResolution::active_defeated(&enc, 4);
        let line = res.log_line();
        assert!(line.contains(enc.id.as_str()));
        assert!(line.contains("Outcome=CharacterWon"));
    }
}
