use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Graph engine configuration
///
/// Ceilings and caps are passed into the engine entry points explicitly so
/// the engine stays a pure function of its inputs; this struct only gathers
/// them in one deserializable place.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphConfig {
    /// Hard ceiling on discovery depth. Requests above it are clamped, not
    /// rejected.
    #[serde(default = "default_max_depth_ceiling")]
    pub max_depth_ceiling: u32,
    /// Maximum number of relatives returned by a discovery query.
    #[serde(default = "default_result_cap")]
    pub result_cap: usize,
    /// Ceiling on total path length for the path finder. Longer connections
    /// are reported as "no connection".
    #[serde(default = "default_max_path_hops")]
    pub max_path_hops: u32,
}

fn default_max_depth_ceiling() -> u32 {
    20
}

fn default_result_cap() -> usize {
    100
}

fn default_max_path_hops() -> u32 {
    20
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_depth_ceiling: default_max_depth_ceiling(),
            result_cap: default_result_cap(),
            max_path_hops: default_max_path_hops(),
        }
    }
}

impl GraphConfig {
    /// Load configuration from file
    ///
    /// Looks for the config file in this order:
    /// 1. Path specified in KINGRAPH_CONFIG environment variable
    /// 2. ./kingraph.toml in current directory
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("KINGRAPH_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("kingraph.toml"));

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: GraphConfig =
            toml::from_str(&config_str).context("Failed to parse kingraph.toml")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.max_depth_ceiling == 0 {
            anyhow::bail!("max_depth_ceiling must be greater than 0");
        }

        if self.result_cap == 0 {
            anyhow::bail!("result_cap must be greater than 0");
        }

        if self.max_path_hops == 0 {
            anyhow::bail!("max_path_hops must be greater than 0");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serialize config tests that mutate process-wide env so they don't race.
    static CONFIG_TEST_LOCK: Mutex<()> = Mutex::new(());

    fn with_config_env(config_path: &std::path::Path, f: impl FnOnce()) {
        let original = std::env::var("KINGRAPH_CONFIG").ok();
        std::env::set_var("KINGRAPH_CONFIG", config_path.to_str().unwrap());
        f();
        std::env::remove_var("KINGRAPH_CONFIG");
        if let Some(val) = original {
            std::env::set_var("KINGRAPH_CONFIG", val);
        }
    }

    #[test]
    fn test_defaults() {
        let config = GraphConfig::default();
        assert_eq!(config.max_depth_ceiling, 20);
        assert_eq!(config.result_cap, 100);
        assert_eq!(config.max_path_hops, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_load_success() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("kingraph.toml");
        fs::write(
            &config_path,
            "max_depth_ceiling = 10\nresult_cap = 50\nmax_path_hops = 12\n",
        )
        .unwrap();
        with_config_env(&config_path, || {
            let config = GraphConfig::load();
            assert!(config.is_ok(), "GraphConfig::load() failed: {:?}", config.err());
            let config = config.unwrap();
            assert_eq!(config.max_depth_ceiling, 10);
            assert_eq!(config.result_cap, 50);
            assert_eq!(config.max_path_hops, 12);
        });
    }

    #[test]
    fn test_config_partial_file_uses_defaults() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("kingraph.toml");
        fs::write(&config_path, "max_depth_ceiling = 5\n").unwrap();
        with_config_env(&config_path, || {
            let config = GraphConfig::load().unwrap();
            assert_eq!(config.max_depth_ceiling, 5);
            assert_eq!(config.result_cap, 100);
            assert_eq!(config.max_path_hops, 20);
        });
    }

    #[test]
    fn test_config_rejects_zero_ceiling() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("kingraph.toml");
        fs::write(&config_path, "max_depth_ceiling = 0\n").unwrap();
        with_config_env(&config_path, || {
            let config = GraphConfig::load();
            assert!(config.is_err());
            assert!(config
                .unwrap_err()
                .to_string()
                .contains("max_depth_ceiling"));
        });
    }

    #[test]
    fn test_config_invalid_path() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        with_config_env(std::path::Path::new("nonexistent.toml"), || {
            let config = GraphConfig::load();
            assert!(config.is_err());
        });
    }
}
