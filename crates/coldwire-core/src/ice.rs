//! ICE engagement: triggering constructs and landing resolved consequences.
//!
//! The adjudication itself (rolls, saves) happens upstream and arrives as an
//! [`IceResolution`]; this module owns the plumbing between the profile
//! sheet, the triggered encounters, and the infiltration state.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use coldwire_protocol::{IceEncounter, IceResolution, IceType, TerminalType};

use crate::infiltration::InfiltrationState;
use crate::profiles::SecurityProfiles;

/// Triggers a single construct of the given type and rating.
pub fn trigger_ice(ice_type: IceType, rating: i32) -> IceEncounter {
    let encounter = IceEncounter::triggered(ice_type, rating);
    info!(
        encounter = %encounter.id,
        ice_type = %ice_type,
        rating,
        dc = encounter.dc(),
        "ICE triggered"
    );
    encounter
}

/// Triggers one pending encounter per construct guarding the terminal, at
/// the terminal's rating. Unguarded terminals yield nothing.
pub fn trigger_for_terminal(
    profiles: &SecurityProfiles,
    terminal_type: TerminalType,
) -> Vec<IceEncounter> {
    let profile = profiles.profile(terminal_type);
    profile
        .ice
        .iter()
        .map(|&ice_type| trigger_ice(ice_type, profile.ice_rating))
        .collect()
}

/// Lands a resolved engagement on an infiltration: records the encounter,
/// then any forced disconnect or burn-out, then any alert increase.
///
/// The alert bump comes last so it still lands when the disconnect has
/// already moved the run to a terminal status.
pub fn apply_ice_resolution(
    state: &mut InfiltrationState,
    resolution: &IceResolution,
    now: DateTime<Utc>,
) {
    state.add_ice_encounter(resolution.encounter.clone());

    if resolution.forced_disconnect {
        if resolution.lockout_minutes < 0 {
            warn!(
                infiltration = %state.id(),
                encounter = %resolution.encounter.id,
                "ICE burned the connection for good"
            );
            state.mark_locked_out();
        } else {
            warn!(
                infiltration = %state.id(),
                encounter = %resolution.encounter.id,
                lockout_minutes = resolution.lockout_minutes,
                "ICE severed the connection"
            );
            state.set_disconnected(resolution.lockout_minutes, now);
        }
    }

    if resolution.alert_increase > 0 {
        state.increase_alert_level(resolution.alert_increase);
    }

    info!(
        infiltration = %state.id(),
        ice_type = %resolution.encounter.ice_type,
        outcome = %resolution.outcome,
        status = %state.status(),
        alert = state.alert_level(),
        "ICE resolution applied"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::{load_profiles, ProfileSource};
    use coldwire_protocol::{
        AccessLevel, CharacterId, IceOutcome, IceResolution, InfiltrationId, InfiltrationStatus,
        Lockout, TerminalId,
    };

    fn t0() -> DateTime<Utc> {
        "2118-03-09T04:30:00Z".parse().unwrap()
    }

    fn state_on(terminal_type: TerminalType) -> InfiltrationState {
        InfiltrationState::new(
            InfiltrationId::new("inf-ice-test"),
            CharacterId::new("char-veda"),
            terminal_type,
            TerminalId::new("term-spire-12"),
        )
        .unwrap()
    }

    #[test]
    fn triggered_ice_is_pending_at_the_requested_rating() {
        let encounter = trigger_ice(IceType::Active, 16);
        assert_eq!(encounter.ice_type, IceType::Active);
        assert_eq!(encounter.rating, 16);
        assert!(encounter.triggered);
        assert!(encounter.is_pending());
    }

    #[test]
    fn terminals_trigger_their_full_guard_detail() {
        let profiles = load_profiles(ProfileSource::Embedded).unwrap();

        let garrison = trigger_for_terminal(&profiles, TerminalType::GarrisonCore);
        assert_eq!(garrison.len(), 2);
        assert_eq!(garrison[0].ice_type, IceType::Active);
        assert_eq!(garrison[1].ice_type, IceType::Lethal);
        assert!(garrison.iter().all(|e| e.rating == 20 && e.is_pending()));

        let beacon = trigger_for_terminal(&profiles, TerminalType::SalvageBeacon);
        assert!(beacon.is_empty());
    }

    #[test]
    fn failed_active_engagement_severs_and_bars_the_line() {
        let mut state = state_on(TerminalType::SecurityLattice);
        let encounter = trigger_ice(IceType::Active, 16);
        let resolution = IceResolution::active_failed(&encounter, 1);

        apply_ice_resolution(&mut state, &resolution, t0());

        assert_eq!(state.status(), InfiltrationStatus::Disconnected);
        assert!(state.is_in_lockout(t0()));
        assert!(!state.is_permanently_locked_out());
        assert_eq!(state.alert_level(), 1);
        assert_eq!(state.ice_encounters().len(), 1);
        assert_eq!(state.ice_encounters()[0].id, encounter.id);
        assert_eq!(state.ice_encounters()[0].outcome, IceOutcome::IceWon);
        assert!(state.was_disconnected_by_ice());
    }

    #[test]
    fn failed_lethal_engagement_burns_the_line_for_good() {
        let mut state = state_on(TerminalType::DeepArchive);
        let encounter = trigger_ice(IceType::Lethal, 24);
        let resolution = IceResolution::lethal_failed(&encounter, 3, 9, 2);

        apply_ice_resolution(&mut state, &resolution, t0());

        assert_eq!(state.status(), InfiltrationStatus::LockedOut);
        assert_eq!(state.access_level(), AccessLevel::Lockout);
        assert!(state.is_permanently_locked_out());
        // The alarm still climbs after the terminal transition.
        assert_eq!(state.alert_level(), 2);
    }

    #[test]
    fn surviving_a_lethal_save_still_costs_the_connection() {
        let mut state = state_on(TerminalType::DeepArchive);
        let encounter = trigger_ice(IceType::Lethal, 24);
        let resolution = IceResolution::lethal_saved(&encounter, 18, 1);

        apply_ice_resolution(&mut state, &resolution, t0());

        assert_eq!(state.status(), InfiltrationStatus::Disconnected);
        assert!(!state.is_permanently_locked_out());
        assert!(state.is_in_lockout(t0()));
        assert_eq!(state.alert_level(), 0);
        assert!(state.has_defeated_ice());
        // Survived constructs are not the kind that grant dice.
        assert_eq!(state.ice_bonus_dice(), 0);
    }

    #[test]
    fn failed_passive_trace_marks_the_location_without_severing() {
        let mut state = state_on(TerminalType::HabitatController);
        let encounter = trigger_ice(IceType::Passive, 12);
        let resolution = IceResolution::passive_failed(&encounter, 1);

        apply_ice_resolution(&mut state, &resolution, t0());

        assert_eq!(state.status(), InfiltrationStatus::InProgress);
        assert_eq!(state.lockout(), Lockout::None);
        assert_eq!(state.alert_level(), 2);
        assert!(state.is_location_revealed());
        assert!(!state.was_disconnected_by_ice());
    }

    #[test]
    fn defeating_active_ice_banks_a_bonus_die_quietly() {
        let mut state = state_on(TerminalType::SecurityLattice);
        let encounter = trigger_ice(IceType::Active, 16);
        let resolution = IceResolution::active_defeated(&encounter, 5);

        apply_ice_resolution(&mut state, &resolution, t0());

        assert_eq!(state.status(), InfiltrationStatus::InProgress);
        assert_eq!(state.alert_level(), 0);
        assert_eq!(state.ice_bonus_dice(), 1);
        assert!(state.has_defeated_ice());
    }

    #[test]
    fn evading_passive_ice_leaves_no_mark_at_all() {
        let mut state = state_on(TerminalType::HabitatController);
        let encounter = trigger_ice(IceType::Passive, 12);
        let resolution = IceResolution::passive_evaded(&encounter, 4);

        apply_ice_resolution(&mut state, &resolution, t0());

        assert_eq!(state.status(), InfiltrationStatus::InProgress);
        assert_eq!(state.alert_level(), 0);
        assert!(!state.is_location_revealed());
        assert!(!state.has_defeated_ice());
        // The encounter itself is still on the record.
        assert_eq!(state.ice_encounters().len(), 1);
    }

    #[test]
    fn lethal_burn_overrides_an_earlier_timed_disconnect() {
        let mut state = state_on(TerminalType::GarrisonCore);

        let hunter = trigger_ice(IceType::Active, 20);
        apply_ice_resolution(&mut state, &IceResolution::active_failed(&hunter, 2), t0());
        assert_eq!(state.status(), InfiltrationStatus::Disconnected);

        let burner = trigger_ice(IceType::Lethal, 20);
        apply_ice_resolution(&mut state, &IceResolution::lethal_failed(&burner, 2, 7, 1), t0());

        assert_eq!(state.status(), InfiltrationStatus::LockedOut);
        assert!(state.is_permanently_locked_out());
        assert_eq!(state.ice_encounters().len(), 2);
        assert_eq!(state.alert_level(), 3);
    }
}
