//! Scripted breach playback.
//!
//! Replays a script of already-adjudicated outcomes through the state
//! machine under a virtual clock and emits a report. No randomness: rolls
//! in the synthesized ICE directives are display stand-ins derived from
//! the DC, so a script always lands the same way.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use coldwire_protocol::{
    AccessLevel, BreachLayer, CharacterId, CheckOutcome, IceEncounter, IceResolution, IceType,
    InfiltrationStatus, LayerResult, TerminalId, TerminalType, LETHAL_SAVE_DC,
};

use crate::ice::{apply_ice_resolution, trigger_ice};
use crate::infiltration::{begin_infiltration, InfiltrationError};
use crate::profiles::SecurityProfiles;

#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The script tripped a state machine contract; the script is broken.
    #[error(transparent)]
    Infiltration(#[from] InfiltrationError),

    #[error("scripted result '{result}' is not legal against {ice} ICE")]
    InvalidIceStep {
        ice: IceType,
        result: ScriptedIceResult,
    },
}

/// One scripted infiltration: who, where, and the steps in order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InfiltrationScript {
    pub name: String,
    pub character: String,
    pub terminal_type: TerminalType,
    pub terminal: String,
    pub steps: Vec<ScriptStep>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptStep {
    /// An adjudicated layer attempt.
    Layer {
        layer: BreachLayer,
        outcome: CheckOutcome,
        #[serde(default)]
        narrative: String,
    },
    /// An ICE engagement at the terminal's rating.
    Ice {
        ice: IceType,
        result: ScriptedIceResult,
    },
    /// Advance the virtual clock.
    Wait { minutes: i64 },
    /// Attempt to clear an expired lockout at the current clock.
    ClearLockout,
    /// Scrub the exit logs.
    CoverTracks,
    /// Log off voluntarily.
    LogOff,
}

impl ScriptStep {
    /// Short label for transition records and logs.
    pub fn label(&self) -> String {
        match self {
            ScriptStep::Layer { layer, outcome, .. } => format!("layer {layer} {outcome}"),
            ScriptStep::Ice { ice, result } => format!("ice {ice} {result}"),
            ScriptStep::Wait { minutes } => format!("wait {minutes}m"),
            ScriptStep::ClearLockout => "clear_lockout".to_string(),
            ScriptStep::CoverTracks => "cover_tracks".to_string(),
            ScriptStep::LogOff => "log_off".to_string(),
        }
    }
}

/// How a scripted engagement is supposed to end. Which results are legal
/// depends on the construct: passive ICE is evaded, active ICE is
/// defeated, lethal ICE is saved against, and anything can be failed.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScriptedIceResult {
    Evaded,
    Defeated,
    Failed,
    Saved,
}

impl ScriptedIceResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptedIceResult::Evaded => "evaded",
            ScriptedIceResult::Defeated => "defeated",
            ScriptedIceResult::Failed => "failed",
            ScriptedIceResult::Saved => "saved",
        }
    }
}

impl fmt::Display for ScriptedIceResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the run after one step.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub step: String,
    pub status: InfiltrationStatus,
    pub layer: u8,
    pub access: AccessLevel,
    pub alert: u32,
}

/// What a finished playback looked like.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlaybackReport {
    pub script: String,
    pub transitions: Vec<TransitionRecord>,
    pub final_status: InfiltrationStatus,
    pub final_access: AccessLevel,
    pub alert_level: u32,
    pub encounters: usize,
    pub successful: bool,
    pub tracks_covered: bool,
}

/// Replays a script from `start`, one step at a time.
pub fn run_script(
    script: &InfiltrationScript,
    profiles: &SecurityProfiles,
    start: DateTime<Utc>,
) -> Result<PlaybackReport, PlaybackError> {
    let mut state = begin_infiltration(
        CharacterId::new(script.character.clone()),
        script.terminal_type,
        TerminalId::new(script.terminal.clone()),
    )?;

    let mut clock = start;
    let mut transitions = Vec::with_capacity(script.steps.len());

    for step in &script.steps {
        match step {
            ScriptStep::Layer {
                layer,
                outcome,
                narrative,
            } => {
                state.record_layer_result(LayerResult::new(*layer, *outcome, narrative.clone()))?;
            }
            ScriptStep::Ice { ice, result } => {
                let encounter = trigger_ice(*ice, profiles.ice_rating(script.terminal_type));
                let resolution = synthesize_resolution(&encounter, *result)?;
                apply_ice_resolution(&mut state, &resolution, clock);
            }
            ScriptStep::Wait { minutes } => {
                clock += Duration::minutes(*minutes);
            }
            ScriptStep::ClearLockout => {
                state.try_clear_expired_lockout(clock);
            }
            ScriptStep::CoverTracks => {
                state.mark_tracks_covered()?;
            }
            ScriptStep::LogOff => {
                state.mark_disconnected();
            }
        }

        let record = TransitionRecord {
            step: step.label(),
            status: state.status(),
            layer: state.current_layer().number(),
            access: state.access_level(),
            alert: state.alert_level(),
        };
        info!(
            step = %record.step,
            status = %record.status,
            layer = record.layer,
            access = %record.access,
            alert = record.alert,
            "Step applied"
        );
        transitions.push(record);
    }

    Ok(PlaybackReport {
        script: script.name.clone(),
        transitions,
        final_status: state.status(),
        final_access: state.access_level(),
        alert_level: state.alert_level(),
        encounters: state.ice_encounters().len(),
        successful: state.is_successful(),
        tracks_covered: state.tracks_covered(),
    })
}

/// Builds the resolver directive a scripted engagement stands for. Rolls
/// are stand-ins two points off the DC; lethal engagements use fixed
/// stand-in stress and damage.
fn synthesize_resolution(
    encounter: &IceEncounter,
    result: ScriptedIceResult,
) -> Result<IceResolution, PlaybackError> {
    let dc = encounter.dc();
    let resolution = match (encounter.ice_type, result) {
        (IceType::Passive, ScriptedIceResult::Evaded) => {
            IceResolution::passive_evaded(encounter, dc + 2)
        }
        (IceType::Passive, ScriptedIceResult::Failed) => {
            IceResolution::passive_failed(encounter, (dc - 2).max(1))
        }
        (IceType::Active, ScriptedIceResult::Defeated) => {
            IceResolution::active_defeated(encounter, dc + 2)
        }
        (IceType::Active, ScriptedIceResult::Failed) => {
            IceResolution::active_failed(encounter, (dc - 2).max(1))
        }
        (IceType::Lethal, ScriptedIceResult::Saved) => {
            IceResolution::lethal_saved(encounter, LETHAL_SAVE_DC + 2, 1)
        }
        (IceType::Lethal, ScriptedIceResult::Failed) => {
            IceResolution::lethal_failed(encounter, (LETHAL_SAVE_DC - 2).max(1), 3, 2)
        }
        (ice, result) => return Err(PlaybackError::InvalidIceStep { ice, result }),
    };
    Ok(resolution)
}
