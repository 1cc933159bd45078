use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

const CONFIG_DIR_PREFIX: &str = "taxi-petzi";

/// Host configuration: named backends and the connection URI of each.
///
/// ```toml
/// [backends]
/// petzi = "petzi:///home/me/credentials.json?sheet_id=1AbC"
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub backends: BTreeMap<String, String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file()?;

        if !config_path.exists() {
            return Err(AppError::Config(format!(
                "Config file not found at {:?}. Please create one.",
                config_path
            )));
        }

        let contents = fs::read_to_string(&config_path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {}", e)))?;

        if config.backends.is_empty() {
            return Err(AppError::Config(
                "At least one backend must be set in the [backends] table".to_string(),
            ));
        }

        Ok(config)
    }

    /// Resolve the connection URI of a backend by name.
    ///
    /// Without a name, the only configured backend is used.
    pub fn backend_uri(&self, name: Option<&str>) -> Result<&str> {
        match name {
            Some(name) => self
                .backends
                .get(name)
                .map(String::as_str)
                .ok_or_else(|| AppError::Config(format!("Unknown backend '{}'", name))),
            None => match self.backends.len() {
                1 => Ok(self.backends.values().next().map(String::as_str).unwrap_or_default()),
                _ => Err(AppError::Config(
                    "Several backends configured, pick one with --backend".to_string(),
                )),
            },
        }
    }

    fn xdg_dirs() -> xdg::BaseDirectories {
        xdg::BaseDirectories::with_prefix(CONFIG_DIR_PREFIX)
    }

    /// Get the config file path
    pub fn config_file() -> Result<PathBuf> {
        let xdg_dirs = Self::xdg_dirs();
        xdg_dirs
            .place_config_file("config.toml")
            .map_err(|e| AppError::Config(format!("Failed to create config directory: {}", e)))
    }

    /// Get the data directory path
    pub fn data_dir() -> Result<PathBuf> {
        let xdg = Self::xdg_dirs();
        xdg.get_data_home()
            .ok_or_else(|| AppError::Config("Failed to determine data directory".to_string()))
    }

    /// Get a data file path
    pub fn data_file(filename: &str) -> Result<PathBuf> {
        let xdg = Self::xdg_dirs();
        xdg.place_data_file(filename)
            .map_err(|e| AppError::Config(format!("Failed to create data file path: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization() {
        let mut backends = BTreeMap::new();
        backends.insert(
            "petzi".to_string(),
            "petzi:///tmp/credentials.json?sheet_id=abc".to_string(),
        );
        let config = Config { backends };

        let serialized = toml::to_string(&config).unwrap();
        let deserialized = Config::from_toml(&serialized).unwrap();

        assert_eq!(config.backends, deserialized.backends);
    }

    #[test]
    fn test_empty_backends_rejected() {
        let err = Config::from_toml("").unwrap_err();
        assert!(matches!(err, AppError::Config(_)), "got {:?}", err);
    }

    #[test]
    fn test_backend_uri_single_default() {
        let config = Config::from_toml(
            r#"
            [backends]
            petzi = "petzi:///creds.json?sheet_id=1"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.backend_uri(None).unwrap(),
            "petzi:///creds.json?sheet_id=1"
        );
        assert!(config.backend_uri(Some("other")).is_err());
    }

    #[test]
    fn test_backend_uri_ambiguous() {
        let config = Config::from_toml(
            r#"
            [backends]
            work = "petzi:///work.json?sheet_id=1"
            side = "petzi:///side.json?sheet_id=2"
            "#,
        )
        .unwrap();

        assert!(matches!(config.backend_uri(None), Err(AppError::Config(_))));
        assert_eq!(
            config.backend_uri(Some("side")).unwrap(),
            "petzi:///side.json?sheet_id=2"
        );
    }
}
