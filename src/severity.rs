//! Syslog severity vocabulary and the process-wide severity gate.

use serde::{Deserialize, Deserializer};
use std::{
    fmt,
    str::FromStr,
    sync::atomic::{AtomicU8, Ordering},
};

use crate::error::LevelParseError;

/// Environment variable holding the initial minimum severity.
pub const LEVEL_ENV: &str = "LOG_LEVEL";

/// Syslog severities, ordered from least to most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum Severity {
    Debug = 0,
    Info = 1,
    #[default]
    Notice = 2,
    Warning = 3,
    Error = 4,
    Crit = 5,
    Alert = 6,
    Emerg = 7,
}

impl Severity {
    pub const ALL: [Severity; 8] = [
        Severity::Debug,
        Severity::Info,
        Severity::Notice,
        Severity::Warning,
        Severity::Error,
        Severity::Crit,
        Severity::Alert,
        Severity::Emerg,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Notice => "notice",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Crit => "crit",
            Severity::Alert => "alert",
            Severity::Emerg => "emerg",
        }
    }

    fn from_u8(raw: u8) -> Severity {
        Self::ALL
            .get(raw as usize)
            .copied()
            .unwrap_or(Severity::Emerg)
    }

    /// Reads `LOG_LEVEL`, falling back to `notice` when unset or unrecognized.
    pub fn from_env() -> Severity {
        match std::env::var(LEVEL_ENV) {
            Ok(raw) => raw.parse().unwrap_or_else(|err: LevelParseError| {
                tracing::warn!("{err}; falling back to '{}'", Severity::Notice);
                Severity::Notice
            }),
            Err(_) => Severity::Notice,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = LevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| LevelParseError {
                value: s.to_string(),
            })
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Current minimum severity shared by every emission path.
///
/// The level lives in a single atomic, so a change is one swap and every
/// sink observes it on its next event.
#[derive(Debug)]
pub struct SeverityGate {
    minimum: AtomicU8,
}

impl SeverityGate {
    pub fn new(minimum: Severity) -> Self {
        Self {
            minimum: AtomicU8::new(minimum as u8),
        }
    }

    pub fn minimum(&self) -> Severity {
        Severity::from_u8(self.minimum.load(Ordering::Acquire))
    }

    /// Whether an event at `severity` passes the gate.
    pub fn allows(&self, severity: Severity) -> bool {
        severity >= self.minimum()
    }

    /// Swaps in `level`, returning the previous level only if it differed.
    pub fn replace(&self, level: Severity) -> Option<Severity> {
        let previous = Severity::from_u8(self.minimum.swap(level as u8, Ordering::AcqRel));
        (previous != level).then_some(previous)
    }
}

impl Default for SeverityGate {
    fn default() -> Self {
        Self::new(Severity::Notice)
    }
}
