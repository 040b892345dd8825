//! Access privilege and run status.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Privilege earned on the target system.
///
/// Declaration order is the privilege order; comparisons like
/// `access >= AccessLevel::UserLevel` decide whether a completed run counts
/// as successful.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    /// No foothold yet.
    None,
    /// Burned: the system knows the intruder and holds the door.
    Lockout,
    /// Ordinary account privileges.
    UserLevel,
    /// Root of the machine.
    AdminLevel,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::None => "None",
            AccessLevel::Lockout => "Lockout",
            AccessLevel::UserLevel => "UserLevel",
            AccessLevel::AdminLevel => "AdminLevel",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an infiltration attempt currently stands.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InfiltrationStatus {
    InProgress,
    /// Advisory setback after a failed entry attempt; retrying is legal.
    TemporaryLockout,
    /// Advisory setback after a noisy credential failure; retrying is legal.
    AlertTriggered,
    /// Connection severed, voluntarily or by ICE.
    Disconnected,
    /// Reached the end of the navigation layer, with whatever access was earned.
    Completed,
    /// Burned out of the system for good.
    LockedOut,
}

impl InfiltrationStatus {
    /// Terminal statuses end the attempt; advisory ones do not.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            InfiltrationStatus::Completed
                | InfiltrationStatus::LockedOut
                | InfiltrationStatus::Disconnected
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InfiltrationStatus::InProgress => "InProgress",
            InfiltrationStatus::TemporaryLockout => "TemporaryLockout",
            InfiltrationStatus::AlertTriggered => "AlertTriggered",
            InfiltrationStatus::Disconnected => "Disconnected",
            InfiltrationStatus::Completed => "Completed",
            InfiltrationStatus::LockedOut => "LockedOut",
        }
    }
}

impl fmt::Display for InfiltrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
