//! Terminal classification.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of a breachable terminal.
///
/// The tier decides which ICE guards the system (via the security sheet in
/// `coldwire-core`) and how the breach is narrated. The layer state machine
/// itself never branches on it.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TerminalType {
    /// Drifting salvage marker with an open maintenance port.
    SalvageBeacon,
    /// Door, air, and water controller for a hab block.
    HabitatController,
    /// District surveillance and access-control mesh.
    SecurityLattice,
    /// Hardened command node of a standing garrison.
    GarrisonCore,
    /// Pre-collapse archive vault, still jealously guarded.
    DeepArchive,
    /// Half-dead node running corrupted firmware; defenses unknowable.
    FracturedNode,
}

impl TerminalType {
    pub const ALL: [TerminalType; 6] = [
        TerminalType::SalvageBeacon,
        TerminalType::HabitatController,
        TerminalType::SecurityLattice,
        TerminalType::GarrisonCore,
        TerminalType::DeepArchive,
        TerminalType::FracturedNode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TerminalType::SalvageBeacon => "SalvageBeacon",
            TerminalType::HabitatController => "HabitatController",
            TerminalType::SecurityLattice => "SecurityLattice",
            TerminalType::GarrisonCore => "GarrisonCore",
            TerminalType::DeepArchive => "DeepArchive",
            TerminalType::FracturedNode => "FracturedNode",
        }
    }

    /// One-line description for narration.
    pub fn description(&self) -> &'static str {
        match self {
            TerminalType::SalvageBeacon => {
                "A salvage beacon blinking into the murk, its maintenance port never locked"
            }
            TerminalType::HabitatController => {
                "A hab-block controller metering air and water for people who forgot it exists"
            }
            TerminalType::SecurityLattice => {
                "A district security lattice, thousands of cold eyes sharing one spine"
            }
            TerminalType::GarrisonCore => {
                "A garrison command core that still thinks the war is on"
            }
            TerminalType::DeepArchive => {
                "A deep archive from before the collapse, guarding answers nobody alive has asked"
            }
            TerminalType::FracturedNode => {
                "A fractured node muttering corrupted firmware; no telling what still works"
            }
        }
    }
}

impl fmt::Display for TerminalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
