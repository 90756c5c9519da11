use std::fmt;
use std::sync::Arc;

use crate::domain::{Rule, Topology, default_rule, rule_by_name};
use crate::error::{LifeError, Result};

/// Lifecycle hook invoked by the scheduler on start/stop
pub type Callback = Arc<dyn Fn() + Send + Sync>;

pub const DEFAULT_STEPS_PER_SECOND: f64 = 4.0;
pub const DEFAULT_CELL_SIZE: f32 = 10.0;

/// Fastest accepted cadence: one step per millisecond
pub const MAX_STEPS_PER_SECOND: f64 = 1000.0;
/// Slowest accepted cadence: one step every 100 seconds
pub const MIN_STEPS_PER_SECOND: f64 = 0.01;

pub const ENV_STEPS_PER_SECOND: &str = "LIFE_STEPS_PER_SECOND";
pub const ENV_CELL_SIZE: &str = "LIFE_CELL_SIZE";
pub const ENV_TOPOLOGY: &str = "LIFE_TOPOLOGY";
pub const ENV_RULE: &str = "LIFE_RULE";

/// Session configuration: cadence, cell size, topology, rule and lifecycle hooks
#[derive(Clone)]
pub struct Config {
    pub steps_per_second: f64,
    pub cell_size: f32,
    pub topology: Topology,
    pub rule: Arc<dyn Rule>,
    pub on_start: Option<Callback>,
    pub on_stop: Option<Callback>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            steps_per_second: DEFAULT_STEPS_PER_SECOND,
            cell_size: DEFAULT_CELL_SIZE,
            topology: Topology::default(),
            rule: default_rule(),
            on_start: None,
            on_stop: None,
        }
    }
}

impl Config {
    pub fn with_steps_per_second(mut self, steps_per_second: f64) -> Self {
        self.steps_per_second = steps_per_second;
        self
    }

    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub fn with_topology(mut self, topology: Topology) -> Self {
        self.topology = topology;
        self
    }

    pub fn with_rule(mut self, rule: Arc<dyn Rule>) -> Self {
        self.rule = rule;
        self
    }

    pub fn on_start(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_start = Some(Arc::new(callback));
        self
    }

    pub fn on_stop(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_stop = Some(Arc::new(callback));
        self
    }

    /// Reject values that would produce an empty grid or a runaway timer
    pub fn validate(&self) -> Result<()> {
        validate_steps_per_second(self.steps_per_second)?;
        validate_cell_size(self.cell_size)
    }

    /// Defaults overlaid with `LIFE_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with whatever `lookup` returns for the `LIFE_*` keys
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_STEPS_PER_SECOND) {
            config.steps_per_second = raw.trim().parse().map_err(|_| {
                LifeError::InvalidConfig(format!("{ENV_STEPS_PER_SECOND}={raw:?} is not a number"))
            })?;
        }
        if let Some(raw) = lookup(ENV_CELL_SIZE) {
            config.cell_size = raw.trim().parse().map_err(|_| {
                LifeError::InvalidConfig(format!("{ENV_CELL_SIZE}={raw:?} is not a number"))
            })?;
        }
        if let Some(raw) = lookup(ENV_TOPOLOGY) {
            config.topology = Topology::from_name(&raw).ok_or_else(|| {
                LifeError::InvalidConfig(format!(
                    "{ENV_TOPOLOGY}={raw:?} is not a topology (periodic, bounded)"
                ))
            })?;
        }
        if let Some(raw) = lookup(ENV_RULE) {
            config.rule = rule_by_name(&raw).ok_or_else(|| {
                LifeError::InvalidConfig(format!("{ENV_RULE}={raw:?} is not a known rule"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("steps_per_second", &self.steps_per_second)
            .field("cell_size", &self.cell_size)
            .field("topology", &self.topology)
            .field("rule", &self.rule.notation())
            .field("on_start", &self.on_start.is_some())
            .field("on_stop", &self.on_stop.is_some())
            .finish()
    }
}

pub(crate) fn validate_steps_per_second(steps_per_second: f64) -> Result<()> {
    if (MIN_STEPS_PER_SECOND..=MAX_STEPS_PER_SECOND).contains(&steps_per_second) {
        Ok(())
    } else {
        Err(LifeError::InvalidConfig(format!(
            "steps per second must be between {MIN_STEPS_PER_SECOND} and {MAX_STEPS_PER_SECOND}, got {steps_per_second}"
        )))
    }
}

pub(crate) fn validate_cell_size(cell_size: f32) -> Result<()> {
    if cell_size.is_finite() && cell_size > 0.0 {
        Ok(())
    } else {
        Err(LifeError::InvalidConfig(format!(
            "cell size must be a positive number, got {cell_size}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.steps_per_second, 4.0);
        assert_eq!(config.topology, Topology::Periodic);
        assert_eq!(config.rule.name(), "Conway");
    }

    #[test]
    fn test_out_of_range_rates_are_rejected() {
        for rate in [0.0, -1.0, f64::NAN, f64::INFINITY, 1e10, 1e-20, 1000.5] {
            let config = Config::default().with_steps_per_second(rate);
            assert!(matches!(config.validate(), Err(LifeError::InvalidConfig(_))), "{rate}");
        }
    }

    #[test]
    fn test_rate_bounds_are_inclusive() {
        assert!(validate_steps_per_second(MAX_STEPS_PER_SECOND).is_ok());
        assert!(validate_steps_per_second(MIN_STEPS_PER_SECOND).is_ok());
        assert!(validate_steps_per_second(MAX_STEPS_PER_SECOND * 2.0).is_err());
        assert!(validate_steps_per_second(MIN_STEPS_PER_SECOND / 2.0).is_err());
    }

    #[test]
    fn test_non_positive_cell_size_is_rejected() {
        assert!(Config::default().with_cell_size(0.0).validate().is_err());
        assert!(Config::default().with_cell_size(-4.0).validate().is_err());
        assert!(Config::default().with_cell_size(0.5).validate().is_ok());
    }

    #[test]
    fn test_lookup_overlay() {
        let config = Config::from_lookup(lookup_from(&[
            (ENV_STEPS_PER_SECOND, "12.5"),
            (ENV_CELL_SIZE, " 6 "),
            (ENV_TOPOLOGY, "bounded"),
            (ENV_RULE, "HighLife"),
        ]))
        .unwrap();

        assert_eq!(config.steps_per_second, 12.5);
        assert_eq!(config.cell_size, 6.0);
        assert_eq!(config.topology, Topology::Bounded);
        assert_eq!(config.rule.notation(), "B36/S23");
    }

    #[test]
    fn test_lookup_rejects_bad_values() {
        assert!(Config::from_lookup(lookup_from(&[(ENV_STEPS_PER_SECOND, "fast")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[(ENV_STEPS_PER_SECOND, "0")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[(ENV_STEPS_PER_SECOND, "1e10")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[(ENV_TOPOLOGY, "mobius")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[(ENV_RULE, "seeds")])).is_err());
    }

    #[test]
    fn test_empty_lookup_gives_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.cell_size, DEFAULT_CELL_SIZE);
    }
}
