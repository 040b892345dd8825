//! Lockout windows imposed on a terminal after a burned or severed run.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Restriction on further connection attempts against a terminal.
///
/// Callers pass the current time into every query; the engine never reads a
/// clock of its own, so expiry is checked on demand rather than by timer.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Lockout {
    /// No restriction.
    None,
    /// Barred until the given instant.
    Until { expires: DateTime<Utc> },
    /// Barred for good.
    Permanent,
}

impl Lockout {
    /// Maps the minutes convention used by disconnect directives: any
    /// negative value is permanent, zero is none, `n` is `n` minutes
    /// from `now`.
    pub fn from_minutes(minutes: i32, now: DateTime<Utc>) -> Self {
        if minutes < 0 {
            Lockout::Permanent
        } else if minutes == 0 {
            Lockout::None
        } else {
            Lockout::Until {
                expires: now + Duration::minutes(i64::from(minutes)),
            }
        }
    }

    /// Whether the lockout still bars connection at `now`. A window expires
    /// exactly at its boundary instant.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        match self {
            Lockout::None => false,
            Lockout::Until { expires } => now < *expires,
            Lockout::Permanent => true,
        }
    }

    pub fn is_permanent(&self) -> bool {
        matches!(self, Lockout::Permanent)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Lockout::Until { expires } => Some(*expires),
            _ => None,
        }
    }
}
