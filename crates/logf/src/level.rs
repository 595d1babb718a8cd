//! Severity levels and level checking.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use logf_error::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum_macros::{Display, EnumIter, FromRepr, IntoStaticStr};

use crate::encoder::TypeEncoder;

/// Severity level of a log message.
///
/// Levels are ordered by verbosity: `Error < Warn < Info < Debug`. A threshold enables
/// every level that is at most as verbose as itself.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Display,
    EnumIter,
    FromRepr,
    IntoStaticStr,
)]
#[repr(u32)]
pub enum Level {
    /// Logs errors only.
    #[strum(serialize = "error")]
    Error = 0,
    /// Logs errors and warnings.
    #[strum(serialize = "warning")]
    Warn = 1,
    /// The default level. Logs errors, warnings and infos.
    #[default]
    #[strum(serialize = "info")]
    Info = 2,
    /// Logs everything.
    #[strum(serialize = "debug")]
    Debug = 3,
}

impl Level {
    /// Canonical lowercase name; `warning` for [`Level::Warn`].
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }

    /// Returns true if a message at `other` passes a threshold of `self`.
    pub fn enabled(self, other: Level) -> bool {
        self >= other
    }

    /// A checker with this level as a fixed threshold.
    pub fn checker(self) -> LevelChecker {
        Arc::new(move |other: Level| self.enabled(other))
    }

    /// Parses a level name, falling back to `(Level::Error, false)` on unknown input.
    ///
    /// Matching ignores ASCII case and accepts `warn` as well as `warning`.
    pub fn with_string(name: &str) -> (Level, bool) {
        match name.parse() {
            Ok(level) => (level, true),
            Err(_) => (Level::Error, false),
        }
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            _ => Err(Error::invalid_level(s).with_operation("level::from_str")),
        }
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Writes a level as a single keyless value.
pub type LevelEncoder = fn(Level, &mut dyn TypeEncoder);

/// Encodes the level's canonical name.
pub fn default_level_encoder(level: Level, encoder: &mut dyn TypeEncoder) {
    encoder.encode_type_string(level.as_str());
}

/// Predicate deciding whether a message at the given level is emitted.
pub type LevelChecker = Arc<dyn Fn(Level) -> bool + Send + Sync>;

/// Anything that can act as the level threshold of a logger.
pub trait LevelCheckerGetter {
    fn level_checker(&self) -> LevelChecker;
}

impl LevelCheckerGetter for Level {
    fn level_checker(&self) -> LevelChecker {
        self.checker()
    }
}

/// Adapts a closure producing checkers into a [`LevelCheckerGetter`].
pub struct LevelCheckerGetterFn<F>(pub F);

impl<F> LevelCheckerGetter for LevelCheckerGetterFn<F>
where
    F: Fn() -> LevelChecker,
{
    fn level_checker(&self) -> LevelChecker {
        (self.0)()
    }
}

/// A level threshold that can be changed while loggers are using it.
///
/// Clones share the same threshold, and checkers handed out earlier observe later
/// changes.
#[derive(Clone)]
pub struct MutableLevel {
    level: Arc<AtomicU32>,
}

impl MutableLevel {
    pub fn new(level: Level) -> Self {
        Self {
            level: Arc::new(AtomicU32::new(level as u32)),
        }
    }

    pub fn level(&self) -> Level {
        load(&self.level)
    }

    pub fn set_level(&self, level: Level) {
        self.level.store(level as u32, Ordering::Release);
    }
}

fn load(level: &AtomicU32) -> Level {
    // Only `set_level` stores, and it stores valid discriminants.
    Level::from_repr(level.load(Ordering::Acquire)).unwrap_or(Level::Error)
}

impl Default for MutableLevel {
    fn default() -> Self {
        Self::new(Level::default())
    }
}

impl fmt::Debug for MutableLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MutableLevel").field(&self.level()).finish()
    }
}

impl LevelCheckerGetter for MutableLevel {
    fn level_checker(&self) -> LevelChecker {
        let level = Arc::clone(&self.level);
        Arc::new(move |other: Level| load(&level).enabled(other))
    }
}
