use std::{fmt, str::FromStr};

use crate::error::ParseError;

/// What the report shows for each policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Per-tick CPU allocation chart.
    #[default]
    Trace,
    /// Finish, turnaround and normalized turnaround table.
    Stats,
}

impl FromStr for Mode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "trace" => Ok(Self::Trace),
            "stats" => Ok(Self::Stats),
            other => Err(ParseError::UnknownMode(other.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Stats => write!(f, "stats"),
        }
    }
}

/// What to do when a run needs more ticks than the scenario's horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizonMode {
    /// Fail the run with `SimError::HorizonTooShort`.
    #[default]
    Strict,
    /// Widen the reported timeline to the last finish tick.
    Extend,
}

#[derive(Debug, Clone)]
pub struct SimConfig {
    pub horizon_mode: HorizonMode,
    /// Check every finished run with `core::audit` before returning it.
    pub audit: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            horizon_mode: HorizonMode::Strict,
            audit: true,
        }
    }
}

impl SimConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_horizon_mode(mut self, horizon_mode: HorizonMode) -> Self {
        self.horizon_mode = horizon_mode;
        self
    }

    pub fn with_audit(mut self, audit: bool) -> Self {
        self.audit = audit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mode() {
        assert_eq!(" stats\r".parse::<Mode>(), Ok(Mode::Stats));
        assert_eq!("trace".parse::<Mode>(), Ok(Mode::Trace));
        assert_eq!(
            "graph".parse::<Mode>(),
            Err(ParseError::UnknownMode("graph".into()))
        );
    }

    #[test]
    fn builder_overrides_defaults() {
        let config = SimConfig::new()
            .with_horizon_mode(HorizonMode::Extend)
            .with_audit(false);
        assert_eq!(config.horizon_mode, HorizonMode::Extend);
        assert!(!config.audit);
        assert_eq!(SimConfig::default().horizon_mode, HorizonMode::Strict);
    }
}
