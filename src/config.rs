use std::{env, path::PathBuf, time::Duration};

use log::LevelFilter;

const DEFAULT_TICK_MS: u64 = 100;
const DEFAULT_END_DELAY_MS: u64 = 3000;

/// Runtime settings, read once from the environment at start-up.
///
/// `SNAKE_TICK_MS`, `SNAKE_END_DELAY_MS`, `SNAKE_LOG` (log file, logging is
/// off without it) and `SNAKE_LOG_LEVEL`. Bad values fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub tick: Duration,
    pub end_delay: Duration,
    pub log_file: Option<PathBuf>,
    pub log_level: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tick: Duration::from_millis(DEFAULT_TICK_MS),
            end_delay: Duration::from_millis(DEFAULT_END_DELAY_MS),
            log_file: None,
            log_level: LevelFilter::Info,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let millis = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        let tick = millis("SNAKE_TICK_MS")
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(defaults.tick);

        let end_delay = millis("SNAKE_END_DELAY_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.end_delay);

        let log_file = lookup("SNAKE_LOG")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let log_level = lookup("SNAKE_LOG_LEVEL")
            .and_then(|v| v.trim().parse::<LevelFilter>().ok())
            .unwrap_or(defaults.log_level);

        Config { tick, end_delay, log_file, log_level }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(config_from(&[]), Config::default());
        assert_eq!(Config::default().tick, Duration::from_millis(100));
        assert_eq!(Config::default().end_delay, Duration::from_secs(3));
    }

    #[test]
    fn reads_every_variable() {
        let config = config_from(&[
            ("SNAKE_TICK_MS", "60"),
            ("SNAKE_END_DELAY_MS", "0"),
            ("SNAKE_LOG", "/tmp/snake.log"),
            ("SNAKE_LOG_LEVEL", "debug"),
        ]);

        assert_eq!(config.tick, Duration::from_millis(60));
        assert_eq!(config.end_delay, Duration::ZERO);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/snake.log")));
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn bad_values_fall_back() {
        let config = config_from(&[
            ("SNAKE_TICK_MS", "0"),
            ("SNAKE_END_DELAY_MS", "soon"),
            ("SNAKE_LOG", "  "),
            ("SNAKE_LOG_LEVEL", "loud"),
        ]);
        assert_eq!(config, Config::default());

        let config = config_from(&[("SNAKE_TICK_MS", "-5")]);
        assert_eq!(config.tick, Duration::from_millis(100));
    }
}
