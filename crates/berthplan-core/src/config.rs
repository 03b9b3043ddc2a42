//! berthplan.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default file name looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "berthplan.toml";

/// Priority ceiling of the harbor choice form (choices are ranked 1..=10).
pub const DEFAULT_MAX_PRIORITY: u16 = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BerthplanConfig {
    pub store: StoreConfig,
    pub planner: PlannerConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// redb database file. Relative paths resolve against the data directory.
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("berthplan.redb"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Lowest preference an applicant can express. Costs are scaled against
    /// the larger of this value and the largest priority seen in a run.
    pub max_priority: u16,
    /// Re-check berth and application availability inside the write
    /// transaction instead of trusting the snapshot read at gather time.
    pub revalidate_availability: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_priority: DEFAULT_MAX_PRIORITY,
            revalidate_availability: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "berthplan=info".to_string(),
        }
    }
}

impl BerthplanConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: BerthplanConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.planner.max_priority == 0 {
            anyhow::bail!("planner.max_priority must be at least 1");
        }
        if self.store.path.as_os_str().is_empty() {
            anyhow::bail!("store.path must not be empty");
        }
        Ok(())
    }

    /// Resolve the store path against `data_dir` unless it is absolute.
    pub fn store_path(&self, data_dir: &Path) -> PathBuf {
        if self.store.path.is_absolute() {
            self.store.path.clone()
        } else {
            data_dir.join(&self.store.path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_empty_uses_defaults() {
        let config = BerthplanConfig::from_toml_str("").unwrap();
        assert_eq!(config, BerthplanConfig::default());
        assert_eq!(config.planner.max_priority, 10);
        assert!(!config.planner.revalidate_availability);
        assert_eq!(config.log.filter, "berthplan=info");
    }

    #[test]
    fn test_parse_partial() {
        let toml_str = r#"
[planner]
revalidate_availability = true
"#;
        let config = BerthplanConfig::from_toml_str(toml_str).unwrap();
        assert!(config.planner.revalidate_availability);
        assert_eq!(config.planner.max_priority, DEFAULT_MAX_PRIORITY);
        assert_eq!(config.store.path, PathBuf::from("berthplan.redb"));
    }

    #[test]
    fn test_zero_max_priority_rejected() {
        let toml_str = r#"
[planner]
max_priority = 0
"#;
        let err = BerthplanConfig::from_toml_str(toml_str).unwrap_err();
        assert!(err.to_string().contains("max_priority"));
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let mut config = BerthplanConfig::default();
        config.planner.max_priority = 5;
        let toml_str = config.to_toml_string().unwrap();
        assert!(toml_str.contains("max_priority = 5"));
        assert_eq!(BerthplanConfig::from_toml_str(&toml_str).unwrap(), config);
    }

    #[test]
    fn test_store_path_resolution() {
        let config = BerthplanConfig::default();
        assert_eq!(
            config.store_path(Path::new("/var/lib/berthplan")),
            PathBuf::from("/var/lib/berthplan/berthplan.redb")
        );

        let mut absolute = BerthplanConfig::default();
        absolute.store.path = PathBuf::from("/tmp/plan.redb");
        assert_eq!(
            absolute.store_path(Path::new("/ignored")),
            PathBuf::from("/tmp/plan.redb")
        );
    }

    #[test]
    fn test_load_or_default() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("berthplan.toml");
        assert_eq!(
            BerthplanConfig::load_or_default(&missing).unwrap(),
            BerthplanConfig::default()
        );

        let mut file = std::fs::File::create(&missing).unwrap();
        writeln!(file, "[log]\nfilter = \"berthplan=debug\"").unwrap();
        let config = BerthplanConfig::load_or_default(&missing).unwrap();
        assert_eq!(config.log.filter, "berthplan=debug");
    }
}
