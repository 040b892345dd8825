//! The infiltration state machine.
//!
//! One [`InfiltrationState`] tracks a single character's run against a
//! single terminal: three breach layers, earned access, accumulated alert,
//! ICE encounters, and any lockout on the line. It is a pure state holder:
//! the resolver feeds it adjudicated results and explicit timestamps, it
//! enforces the transition rules and answers queries. Errors here are
//! contract violations by the orchestrator, never in-fiction failures;
//! a failed hack records just fine.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use coldwire_protocol::{
    AccessLevel, BreachLayer, CharacterId, CheckOutcome, IceEncounter, IceOutcome, IceType,
    InfiltrationId, InfiltrationStatus, LayerResult, Lockout, TerminalId, TerminalType,
};

/// Orchestrator misuse, surfaced fail-fast.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InfiltrationError {
    /// An id was empty or whitespace at construction.
    #[error("identifier '{field}' must not be empty")]
    EmptyIdentifier { field: &'static str },

    /// The operation is illegal while the attempt is in this status.
    #[error("operation not valid while infiltration is {status}")]
    InvalidState { status: InfiltrationStatus },

    /// A layer result arrived for a layer other than the current one.
    #[error("expected a result for the {expected} layer, got {got}")]
    LayerMismatch {
        expected: BreachLayer,
        got: BreachLayer,
    },
}

/// State of one infiltration attempt.
///
/// Fields are private; every mutation goes through a method that enforces
/// the transition rules, so append-only histories and the monotonic alert
/// counter are structural rather than conventions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InfiltrationState {
    id: InfiltrationId,
    character: CharacterId,
    terminal: TerminalId,
    terminal_type: TerminalType,
    current_layer: BreachLayer,
    layer_results: Vec<LayerResult>,
    access_level: AccessLevel,
    alert_level: u32,
    locked_out: bool,
    status: InfiltrationStatus,
    tracks_covered: bool,
    ice_encounters: Vec<IceEncounter>,
    lockout: Lockout,
}

fn require_id(value: &str, field: &'static str) -> Result<(), InfiltrationError> {
    if value.trim().is_empty() {
        return Err(InfiltrationError::EmptyIdentifier { field });
    }
    Ok(())
}

impl InfiltrationState {
    /// Starts a new attempt at the access layer. All ids must be non-empty.
    pub fn new(
        id: InfiltrationId,
        character: CharacterId,
        terminal_type: TerminalType,
        terminal: TerminalId,
    ) -> Result<Self, InfiltrationError> {
        require_id(id.as_str(), "infiltration_id")?;
        require_id(character.as_str(), "character_id")?;
        require_id(terminal.as_str(), "terminal_id")?;

        Ok(Self {
            id,
            character,
            terminal,
            terminal_type,
            current_layer: BreachLayer::Access,
            layer_results: Vec::new(),
            access_level: AccessLevel::None,
            alert_level: 0,
            locked_out: false,
            status: InfiltrationStatus::InProgress,
            tracks_covered: false,
            ice_encounters: Vec::new(),
            lockout: Lockout::None,
        })
    }

    pub fn id(&self) -> &InfiltrationId {
        &self.id
    }

    pub fn character(&self) -> &CharacterId {
        &self.character
    }

    pub fn terminal(&self) -> &TerminalId {
        &self.terminal
    }

    pub fn terminal_type(&self) -> TerminalType {
        self.terminal_type
    }

    pub fn current_layer(&self) -> BreachLayer {
        self.current_layer
    }

    pub fn layer_results(&self) -> &[LayerResult] {
        &self.layer_results
    }

    pub fn access_level(&self) -> AccessLevel {
        self.access_level
    }

    pub fn alert_level(&self) -> u32 {
        self.alert_level
    }

    pub fn is_locked_out(&self) -> bool {
        self.locked_out
    }

    pub fn status(&self) -> InfiltrationStatus {
        self.status
    }

    pub fn tracks_covered(&self) -> bool {
        self.tracks_covered
    }

    pub fn ice_encounters(&self) -> &[IceEncounter] {
        &self.ice_encounters
    }

    pub fn lockout(&self) -> Lockout {
        self.lockout
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Records one adjudicated layer attempt and applies its transition.
    ///
    /// Fails with `InvalidState` once the attempt is terminal and with
    /// `LayerMismatch` when the result targets the wrong layer. Failure
    /// grades record successfully; only misuse errors.
    pub fn record_layer_result(&mut self, result: LayerResult) -> Result<(), InfiltrationError> {
        if self.status.is_terminal() {
            return Err(InfiltrationError::InvalidState {
                status: self.status,
            });
        }
        if result.layer != self.current_layer {
            return Err(InfiltrationError::LayerMismatch {
                expected: self.current_layer,
                got: result.layer,
            });
        }

        let outcome = result.outcome;
        self.layer_results.push(result);

        match outcome {
            CheckOutcome::Fumble => self.burn_out(),
            CheckOutcome::Success | CheckOutcome::CriticalSuccess => {
                self.advance_layer(outcome.is_critical());
            }
            CheckOutcome::Failure | CheckOutcome::PartialSuccess => self.record_setback(),
        }
        Ok(())
    }

    /// A fumble burns the run on the spot. The lockout window stays
    /// untouched: a burn is not a timed bar, and `try_clear_expired_lockout`
    /// keeps reporting nothing to clear.
    fn burn_out(&mut self) {
        self.locked_out = true;
        self.access_level = AccessLevel::Lockout;
        self.status = InfiltrationStatus::LockedOut;
        self.alert_level += 5;
    }

    fn advance_layer(&mut self, critical: bool) {
        match self.current_layer {
            BreachLayer::Access => {
                self.current_layer = BreachLayer::Authentication;
                if critical {
                    self.access_level = AccessLevel::AdminLevel;
                }
            }
            BreachLayer::Authentication => {
                self.current_layer = BreachLayer::Navigation;
                self.access_level = if critical || self.access_level == AccessLevel::AdminLevel {
                    AccessLevel::AdminLevel
                } else {
                    AccessLevel::UserLevel
                };
            }
            // Clearing navigation completes the run with whatever access
            // was earned. An advisory status from an earlier setback is
            // overwritten here, not at the moment of the retry.
            BreachLayer::Navigation => self.status = InfiltrationStatus::Completed,
        }
    }

    /// Failure and partial success raise the alarm without advancing. On
    /// the navigation layer the run still completes, degraded results and
    /// all.
    fn record_setback(&mut self) {
        self.alert_level += 1;
        match self.current_layer {
            BreachLayer::Access => self.status = InfiltrationStatus::TemporaryLockout,
            BreachLayer::Authentication => {
                self.alert_level += 2;
                self.status = InfiltrationStatus::AlertTriggered;
            }
            BreachLayer::Navigation => self.status = InfiltrationStatus::Completed,
        }
    }

    /// Appends a triggered or resolved encounter. Legal in any status,
    /// including terminal ones: consequences can land after the breach
    /// ends. No dedup; repeat engagements are separate entries.
    pub fn add_ice_encounter(&mut self, encounter: IceEncounter) {
        self.ice_encounters.push(encounter);
    }

    /// Severs the connection and bars the terminal per the minutes
    /// convention (negative permanent, zero none, `n` minutes from `now`).
    /// A run that is already burned out stays `LockedOut`; a disconnect
    /// does not downgrade it.
    pub fn set_disconnected(&mut self, lockout_minutes: i32, now: DateTime<Utc>) {
        if self.status == InfiltrationStatus::LockedOut {
            return;
        }
        self.status = InfiltrationStatus::Disconnected;
        self.lockout = Lockout::from_minutes(lockout_minutes, now);
    }

    /// Voluntary logoff: severs the connection without touching any
    /// lockout. No-op when the run is burned out.
    pub fn mark_disconnected(&mut self) {
        if self.status == InfiltrationStatus::LockedOut {
            return;
        }
        self.status = InfiltrationStatus::Disconnected;
    }

    /// Permanently burns the intruder out of this terminal. Unconditional;
    /// overrides an earlier disconnect. This is the lethal-ICE path, kept
    /// distinct from the in-check fumble but terminally equivalent.
    pub fn mark_locked_out(&mut self) {
        self.locked_out = true;
        self.access_level = AccessLevel::Lockout;
        self.status = InfiltrationStatus::LockedOut;
        self.lockout = Lockout::Permanent;
    }

    /// Clears a timed lockout whose window has passed, putting the attempt
    /// back `InProgress` at the same layer and alert level.
    ///
    /// Returns `true` when the line is usable afterwards (cleared just now,
    /// or nothing was barring it), `false` while a window is still running
    /// or the bar is permanent.
    pub fn try_clear_expired_lockout(&mut self, now: DateTime<Utc>) -> bool {
        match self.lockout {
            Lockout::None => true,
            Lockout::Permanent => false,
            Lockout::Until { expires } => {
                if now >= expires {
                    self.lockout = Lockout::None;
                    self.status = InfiltrationStatus::InProgress;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Raises the alarm by `amount`, clamped below at zero. The alert
    /// level never goes down.
    pub fn increase_alert_level(&mut self, amount: i32) {
        self.alert_level += amount.max(0) as u32;
    }

    /// Marks the exit scrubbed. Only a successful completion leaves logs
    /// worth scrubbing; anything else is orchestrator misuse. Idempotent.
    pub fn mark_tracks_covered(&mut self) -> Result<(), InfiltrationError> {
        if !self.is_successful() {
            return Err(InfiltrationError::InvalidState {
                status: self.status,
            });
        }
        self.tracks_covered = true;
        Ok(())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// The attempt has ended, one way or another.
    pub fn is_complete(&self) -> bool {
        self.status.is_terminal()
    }

    /// Completed with at least user-level access.
    pub fn is_successful(&self) -> bool {
        self.status == InfiltrationStatus::Completed && self.access_level >= AccessLevel::UserLevel
    }

    pub fn has_admin_access(&self) -> bool {
        self.access_level == AccessLevel::AdminLevel
    }

    /// A passive trace completed somewhere in this run.
    pub fn is_location_revealed(&self) -> bool {
        self.ice_encounters
            .iter()
            .any(|e| e.ice_type == IceType::Passive && e.outcome == IceOutcome::IceWon)
    }

    /// Active or lethal ICE severed the connection at some point.
    pub fn was_disconnected_by_ice(&self) -> bool {
        self.ice_encounters.iter().any(|e| {
            matches!(e.ice_type, IceType::Active | IceType::Lethal)
                && e.outcome == IceOutcome::IceWon
        })
    }

    /// At least one construct was broken outright. Evading one does not
    /// count.
    pub fn has_defeated_ice(&self) -> bool {
        self.ice_encounters
            .iter()
            .any(|e| e.outcome == IceOutcome::CharacterWon)
    }

    /// Bonus dice banked from breaking active constructs this run,
    /// consumed externally by the resolver.
    pub fn ice_bonus_dice(&self) -> u32 {
        self.ice_encounters
            .iter()
            .filter(|e| e.ice_type == IceType::Active && e.outcome == IceOutcome::CharacterWon)
            .count() as u32
    }

    /// Whether the terminal is barring connections at `now`.
    pub fn is_in_lockout(&self, now: DateTime<Utc>) -> bool {
        self.lockout.is_active(now)
    }

    pub fn is_permanently_locked_out(&self) -> bool {
        self.lockout.is_permanent()
    }

    /// Verbose single line for diagnostic logs.
    pub fn log_line(&self) -> String {
        format!(
            "Infiltration[{}] Terminal={} Layer={} Access={} Status={} Alert={}",
            self.id,
            self.terminal,
            self.current_layer.number(),
            self.access_level,
            self.status,
            self.alert_level
        )
    }
}

impl fmt::Display for InfiltrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Infiltration {}: {} Layer {}, Access: {}, Status: {}, Alert: {}",
            self.id,
            self.terminal_type,
            self.current_layer.number(),
            self.access_level,
            self.status,
            self.alert_level
        )
    }
}

/// Opens a fresh infiltration against a terminal under a generated id.
pub fn begin_infiltration(
    character: CharacterId,
    terminal_type: TerminalType,
    terminal: TerminalId,
) -> Result<InfiltrationState, InfiltrationError> {
    let state = InfiltrationState::new(
        InfiltrationId::generate(),
        character,
        terminal_type,
        terminal,
    )?;
    info!(
        infiltration = %state.id(),
        character = %state.character(),
        terminal = %state.terminal(),
        terminal_type = %state.terminal_type(),
        "Infiltration started"
    );
    Ok(state)
}
