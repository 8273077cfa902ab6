use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TICK_MS: u64 = 120;

/// Runtime settings, read from `MAZE_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub tick: Duration,
    pub save_dir: PathBuf,
    pub seed: Option<u64>,
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(DEFAULT_TICK_MS),
            save_dir: PathBuf::from("."),
            seed: None,
            log_file: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unparseable or empty values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let tick_ms = lookup("MAZE_TICK_MS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_TICK_MS);
        let save_dir = lookup("MAZE_SAVE_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.save_dir);
        let seed = lookup("MAZE_SEED").and_then(|v| v.trim().parse::<u64>().ok());
        let log_file = lookup("MAZE_LOG")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        Self {
            tick: Duration::from_millis(tick_ms),
            save_dir,
            seed,
            log_file,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Settings {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        assert_eq!(settings(&[]), Settings::default());
    }

    #[test]
    fn values_are_read() {
        let s = settings(&[
            ("MAZE_TICK_MS", "50"),
            ("MAZE_SAVE_DIR", "/tmp/maze"),
            ("MAZE_SEED", "42"),
            ("MAZE_LOG", "maze.log"),
        ]);
        assert_eq!(s.tick, Duration::from_millis(50));
        assert_eq!(s.save_dir, PathBuf::from("/tmp/maze"));
        assert_eq!(s.seed, Some(42));
        assert_eq!(s.log_file, Some(PathBuf::from("maze.log")));
    }

    #[test]
    fn bad_values_fall_back() {
        let s = settings(&[("MAZE_TICK_MS", "0"), ("MAZE_SEED", "abc"), ("MAZE_SAVE_DIR", " ")]);
        assert_eq!(s.tick, Duration::from_millis(DEFAULT_TICK_MS));
        assert_eq!(s.seed, None);
        assert_eq!(s.save_dir, PathBuf::from("."));
    }
}
