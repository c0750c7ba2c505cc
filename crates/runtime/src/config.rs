//! Guard configuration.
use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::fault::SAMPLE_INTERVAL;

/// Default per-actor deny-message suppression window.
pub const DEFAULT_DEDUP_WINDOW_MS: u64 = 500;

/// Whether this guard owns every interception point or shares the server with
/// another protection layer.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum OperatingMode {
    #[default]
    Standalone,
    /// Only the interception points no other layer covers are active.
    Compatible,
}

/// Runtime knobs for the guard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Window in which repeated deny messages to one actor are collapsed.
    pub dedup_window_ms: u64,

    /// Log the first fault per interceptor and then every n-th.
    pub fault_sample_interval: u64,

    /// Wall-clock budget for one hook call. Results of calls that overrun it
    /// are discarded and the gate fails open. `None` disables the check.
    pub decision_budget_ms: Option<u64>,

    pub mode: OperatingMode,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            dedup_window_ms: DEFAULT_DEDUP_WINDOW_MS,
            fault_sample_interval: SAMPLE_INTERVAL,
            decision_budget_ms: None,
            mode: OperatingMode::Standalone,
        }
    }
}

impl GuardConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `GUARD_DEDUP_WINDOW_MS` - Deny message suppression window (default: 500)
    /// - `GUARD_FAULT_SAMPLE_INTERVAL` - Fault log sampling interval (default: 100)
    /// - `GUARD_DECISION_BUDGET_MS` - Hook call budget, `0` disables (default: none)
    /// - `GUARD_MODE` - `standalone` or `compatible` (default: standalone)
    ///
    /// Malformed values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(window) = read_env::<u64>("GUARD_DEDUP_WINDOW_MS") {
            config.dedup_window_ms = window;
        }
        if let Some(interval) = read_env::<u64>("GUARD_FAULT_SAMPLE_INTERVAL") {
            config.fault_sample_interval = interval.max(1);
        }
        if let Some(budget) = read_env::<u64>("GUARD_DECISION_BUDGET_MS") {
            config.decision_budget_ms = (budget > 0).then_some(budget);
        }
        if let Some(mode) = read_env::<OperatingMode>("GUARD_MODE") {
            config.mode = mode;
        }

        config
    }

    /// Parses a TOML table; missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn dedup_window(&self) -> Duration {
        Duration::from_millis(self.dedup_window_ms)
    }

    pub fn decision_budget(&self) -> Option<Duration> {
        self.decision_budget_ms.map(Duration::from_millis)
    }

    pub fn with_mode(mut self, mode: OperatingMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_decision_budget(mut self, budget: Duration) -> Self {
        self.decision_budget_ms = Some(u64::try_from(budget.as_millis()).unwrap_or(u64::MAX));
        self
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
