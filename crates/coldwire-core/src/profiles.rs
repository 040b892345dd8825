//! Security profiles: which ICE guards each terminal class, at what rating.
//!
//! The shipped sheet lives in `data/terminals.yaml` and is embedded into
//! the binary; a scenario can swap in its own sheet from disk. Loading
//! validates the sheet down to a [`SecurityProfiles`] table that answers
//! infallibly for every terminal class.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use coldwire_protocol::{IceType, TerminalType};

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("yaml parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("no profile for terminal class {0}")]
    MissingTerminal(TerminalType),
    #[error("unknown terminal key '{0}'")]
    UnknownTerminal(String),
    #[error("profile for {terminal} has negative rating {rating}")]
    NegativeRating { terminal: TerminalType, rating: i32 },
}

/// Where the profile sheet comes from.
pub enum ProfileSource {
    /// The sheet compiled into the binary.
    Embedded,
    /// A sheet on disk, same format as the embedded one.
    Path(PathBuf),
}

#[derive(Debug, Deserialize)]
struct RawProfileSheet {
    terminals: BTreeMap<String, RawProfile>,
}

#[derive(Debug, Deserialize)]
struct RawProfile {
    name: String,
    #[serde(default)]
    ice: Vec<IceType>,
    #[serde(default)]
    ice_rating: i32,
    #[serde(default)]
    notes: String,
}

/// Security posture of one terminal class.
#[derive(Debug, Clone)]
pub struct TerminalProfile {
    pub terminal: TerminalType,
    pub name: String,
    pub ice: Vec<IceType>,
    pub ice_rating: i32,
    pub notes: String,
}

/// Compiled sheet with exactly one profile per terminal class.
#[derive(Debug, Clone)]
pub struct SecurityProfiles {
    // One entry per class, stored in slot order.
    profiles: Vec<TerminalProfile>,
}

fn slot(terminal: TerminalType) -> usize {
    match terminal {
        TerminalType::SalvageBeacon => 0,
        TerminalType::HabitatController => 1,
        TerminalType::SecurityLattice => 2,
        TerminalType::GarrisonCore => 3,
        TerminalType::DeepArchive => 4,
        TerminalType::FracturedNode => 5,
    }
}

fn terminal_for_key(key: &str) -> Option<TerminalType> {
    match key {
        "salvage_beacon" => Some(TerminalType::SalvageBeacon),
        "habitat_controller" => Some(TerminalType::HabitatController),
        "security_lattice" => Some(TerminalType::SecurityLattice),
        "garrison_core" => Some(TerminalType::GarrisonCore),
        "deep_archive" => Some(TerminalType::DeepArchive),
        "fractured_node" => Some(TerminalType::FracturedNode),
        _ => None,
    }
}

impl SecurityProfiles {
    pub fn profile(&self, terminal: TerminalType) -> &TerminalProfile {
        // Compilation guarantees a filled slot per class.
        &self.profiles[slot(terminal)]
    }

    pub fn ice_for(&self, terminal: TerminalType) -> &[IceType] {
        &self.profile(terminal).ice
    }

    pub fn ice_rating(&self, terminal: TerminalType) -> i32 {
        self.profile(terminal).ice_rating
    }

    pub fn has_ice(&self, terminal: TerminalType) -> bool {
        !self.profile(terminal).ice.is_empty()
    }

    pub fn profiles(&self) -> &[TerminalProfile] {
        &self.profiles
    }
}

/// Loads and validates a profile sheet.
pub fn load_profiles(source: ProfileSource) -> Result<SecurityProfiles, ProfileError> {
    match source {
        ProfileSource::Embedded => parse_and_compile(include_str!("../data/terminals.yaml")),
        ProfileSource::Path(path) => {
            let text = std::fs::read_to_string(path)?;
            parse_and_compile(&text)
        }
    }
}

fn parse_and_compile(text: &str) -> Result<SecurityProfiles, ProfileError> {
    let raw: RawProfileSheet = serde_yaml::from_str(text)?;
    compile(raw)
}

fn compile(raw: RawProfileSheet) -> Result<SecurityProfiles, ProfileError> {
    let mut by_slot = BTreeMap::new();
    for (key, profile) in raw.terminals {
        let terminal =
            terminal_for_key(&key).ok_or_else(|| ProfileError::UnknownTerminal(key.clone()))?;
        if profile.ice_rating < 0 {
            return Err(ProfileError::NegativeRating {
                terminal,
                rating: profile.ice_rating,
            });
        }
        by_slot.insert(slot(terminal), profile);
    }

    let mut profiles = Vec::with_capacity(TerminalType::ALL.len());
    for terminal in TerminalType::ALL {
        let profile = by_slot
            .remove(&slot(terminal))
            .ok_or(ProfileError::MissingTerminal(terminal))?;
        profiles.push(TerminalProfile {
            terminal,
            name: profile.name,
            ice: profile.ice,
            ice_rating: profile.ice_rating,
            notes: profile.notes,
        });
    }

    Ok(SecurityProfiles { profiles })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn embedded_sheet_covers_every_terminal_class() {
        let profiles = load_profiles(ProfileSource::Embedded).unwrap();

        for terminal in TerminalType::ALL {
            let profile = profiles.profile(terminal);
            assert_eq!(profile.terminal, terminal);
            assert!(!profile.name.is_empty());
            assert!(profile.ice_rating >= 0);
        }
    }

    #[test]
    fn embedded_sheet_matches_the_published_postures() {
        let profiles = load_profiles(ProfileSource::Embedded).unwrap();

        assert!(!profiles.has_ice(TerminalType::SalvageBeacon));
        assert_eq!(profiles.ice_rating(TerminalType::SalvageBeacon), 0);

        assert_eq!(
            profiles.ice_for(TerminalType::HabitatController),
            [IceType::Passive]
        );
        assert_eq!(profiles.ice_rating(TerminalType::HabitatController), 12);

        assert_eq!(
            profiles.ice_for(TerminalType::SecurityLattice),
            [IceType::Active]
        );
        assert_eq!(profiles.ice_rating(TerminalType::SecurityLattice), 16);

        assert_eq!(
            profiles.ice_for(TerminalType::GarrisonCore),
            [IceType::Active, IceType::Lethal]
        );
        assert_eq!(profiles.ice_rating(TerminalType::GarrisonCore), 20);

        assert_eq!(profiles.ice_for(TerminalType::DeepArchive), [IceType::Lethal]);
        assert_eq!(profiles.ice_rating(TerminalType::DeepArchive), 24);

        // Nothing on the sheet for a fractured node; its defenses are
        // decided at the table.
        assert!(!profiles.has_ice(TerminalType::FracturedNode));
    }

    #[test]
    fn sheet_loads_from_a_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(include_str!("../data/terminals.yaml").as_bytes())
            .unwrap();

        let profiles = load_profiles(ProfileSource::Path(file.path().to_path_buf())).unwrap();
        assert_eq!(profiles.profiles().len(), TerminalType::ALL.len());
    }

    #[test]
    fn unknown_terminal_key_is_rejected() {
        let yaml = "terminals:\n  orbital_uplink:\n    name: Orbital Uplink\n";
        let err = parse_and_compile(yaml).unwrap_err();
        assert!(matches!(err, ProfileError::UnknownTerminal(key) if key == "orbital_uplink"));
    }

    #[test]
    fn missing_terminal_class_is_rejected() {
        let yaml = "\
terminals:
  salvage_beacon: { name: Salvage Beacon }
  habitat_controller: { name: Habitat Controller, ice: [passive], ice_rating: 12 }
  security_lattice: { name: Security Lattice, ice: [active], ice_rating: 16 }
  garrison_core: { name: Garrison Core, ice: [active, lethal], ice_rating: 20 }
  fractured_node: { name: Fractured Node }
";
        let err = parse_and_compile(yaml).unwrap_err();
        assert!(matches!(
            err,
            ProfileError::MissingTerminal(TerminalType::DeepArchive)
        ));
    }

    #[test]
    fn negative_rating_is_rejected() {
        let yaml = "\
terminals:
  deep_archive: { name: Deep Archive, ice: [lethal], ice_rating: -24 }
";
        let err = parse_and_compile(yaml).unwrap_err();
        assert!(matches!(
            err,
            ProfileError::NegativeRating {
                terminal: TerminalType::DeepArchive,
                rating: -24
            }
        ));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let err = parse_and_compile("terminals: [not, a, map]").unwrap_err();
        assert!(matches!(err, ProfileError::Parse(_)));
    }
}
