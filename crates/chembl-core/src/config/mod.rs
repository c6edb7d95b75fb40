//! Configuration management with file persistence

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Overrides `database.chembl_path`
pub const CHEMBL_DB_ENV: &str = "CHEMBL_DB";
/// Overrides `database.xref_path`
pub const XREF_DB_ENV: &str = "CHEMBL_XREF_DB";

const KEYS: &[&str] = &[
    "database.chembl_path",
    "database.xref_path",
    "database.max_connections",
];

/// ChEMBL transformer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// ChEMBL SQLite dump
    pub chembl_path: String,
    /// Database holding `component_xref`
    pub xref_path: String,
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            chembl_path: "data/ChEMBL.sqlite".to_string(),
            xref_path: "data/ChEMBL.target.xref.sqlite".to_string(),
            max_connections: 5,
        }
    }
}

impl DatabaseSettings {
    /// ChEMBL database path, after environment overrides
    pub fn resolved_chembl_path(&self) -> PathBuf {
        env::var(CHEMBL_DB_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(&self.chembl_path))
    }

    /// Cross-reference database path, after environment overrides
    pub fn resolved_xref_path(&self) -> PathBuf {
        env::var(XREF_DB_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(&self.xref_path))
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var("CHEMBL_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("chembl")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, or defaults if it doesn't exist
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config = Self::from_toml(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> anyhow::Result<()> {
        self.validate()?;

        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

        let path = Self::config_path()?;
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.database.chembl_path.trim().is_empty() {
            return Err(anyhow!("database.chembl_path must not be empty"));
        }
        if self.database.xref_path.trim().is_empty() {
            return Err(anyhow!("database.xref_path must not be empty"));
        }
        if self.database.max_connections == 0 {
            return Err(anyhow!("database.max_connections must be at least 1"));
        }
        Ok(())
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> anyhow::Result<String> {
        match key {
            "database.chembl_path" => Ok(self.database.chembl_path.clone()),
            "database.xref_path" => Ok(self.database.xref_path.clone()),
            "database.max_connections" => Ok(self.database.max_connections.to_string()),
            _ => Err(anyhow!(
                "Unknown configuration key: {}. Use `chembl config list` to see available keys.",
                key
            )),
        }
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "database.chembl_path" => {
                if value.trim().is_empty() {
                    return Err(anyhow!("database.chembl_path must not be empty"));
                }
                self.database.chembl_path = value.to_string();
            }
            "database.xref_path" => {
                if value.trim().is_empty() {
                    return Err(anyhow!("database.xref_path must not be empty"));
                }
                self.database.xref_path = value.to_string();
            }
            "database.max_connections" => {
                let max: u32 = value
                    .parse()
                    .with_context(|| format!("Invalid max_connections value: {}", value))?;
                if max == 0 {
                    return Err(anyhow!("database.max_connections must be at least 1"));
                }
                self.database.max_connections = max;
            }
            _ => {
                return Err(anyhow!(
                    "Unknown configuration key: {}. Use `chembl config list` to see available keys.",
                    key
                ));
            }
        }
        Ok(())
    }

    /// List all configuration keys and their values
    pub fn list(&self) -> anyhow::Result<Vec<(String, String)>> {
        KEYS.iter()
            .map(|key| Ok((key.to_string(), self.get(key)?)))
            .collect()
    }

    /// Reset configuration to defaults
    pub fn reset() -> anyhow::Result<()> {
        let path = Self::config_path()?;
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove config file: {}", path.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.get("database.chembl_path").unwrap(), "data/ChEMBL.sqlite");
        assert_eq!(config.list().unwrap().len(), 3);
    }

    #[test]
    fn test_set_and_get() {
        let mut config = Config::default();

        config.set("database.max_connections", "2").unwrap();
        config.set("database.xref_path", "/srv/xref.sqlite").unwrap();

        assert_eq!(config.database.max_connections, 2);
        assert_eq!(config.get("database.xref_path").unwrap(), "/srv/xref.sqlite");
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();

        assert!(config.set("database.max_connections", "0").is_err());
        assert!(config.set("database.max_connections", "many").is_err());
        assert!(config.set("database.chembl_path", " ").is_err());
        assert!(config.set("llm.model", "x").is_err());
        assert!(config.get("llm.model").is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml("[database]\nchembl_path = \"/srv/chembl.sqlite\"\n").unwrap();

        assert_eq!(config.database.chembl_path, "/srv/chembl.sqlite");
        assert_eq!(config.database.xref_path, "data/ChEMBL.target.xref.sqlite");
        assert!(Config::from_toml("[database]\nmax_connections = 0\n").is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.set("database.max_connections", "8").unwrap();

        let text = toml::to_string_pretty(&config).unwrap();

        assert_eq!(Config::from_toml(&text).unwrap(), config);
    }
}
