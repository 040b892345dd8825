//! Terminal infiltration rules engine.
//!
//! The authoritative state machine for three-layer breaches, the ICE
//! engagement layer that lands adjudicated consequences on it, the
//! per-terminal security sheet, and a deterministic scripted-playback
//! harness. Dice and difficulty math live upstream; this crate consumes
//! classified outcomes and explicit timestamps only.

mod ice;
mod infiltration;
mod playback;
mod profiles;

pub use crate::ice::*;
pub use crate::infiltration::*;
pub use crate::playback::{
    run_script, InfiltrationScript, PlaybackError, PlaybackReport, ScriptStep, ScriptedIceResult,
    TransitionRecord,
};
pub use crate::profiles::*;
