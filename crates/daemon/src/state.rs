use std::{fs, path::PathBuf};

use common::prelude::SecretKey;
use serde::{Deserialize, Serialize};

use crate::service::ServiceConfig;

pub const APP_NAME: &str = "calypso";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DB_FILE_NAME: &str = "db.sqlite";
pub const KEY_FILE_NAME: &str = "authority.pem";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port for the API server
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    /// Require every record to seal its reader key, and check it on read
    #[serde(default = "default_bind_reader_identity")]
    pub bind_reader_identity: bool,
    /// Hand the stored ciphertext back with each read
    #[serde(default)]
    pub return_ciphertext: bool,
    /// Default log level for the daemon
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_api_port() -> u16 {
    3000
}

fn default_bind_reader_identity() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            bind_reader_identity: default_bind_reader_identity(),
            return_ciphertext: false,
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    pub fn protocol(&self) -> ServiceConfig {
        ServiceConfig {
            bind_reader_identity: self.bind_reader_identity,
            return_ciphertext: self.return_ciphertext,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the calypso directory (~/.calypso)
    pub calypso_dir: PathBuf,
    /// Path to the SQLite database
    pub db_path: PathBuf,
    /// Path to the authority key PEM file
    pub key_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the calypso directory path (custom or default ~/.calypso)
    pub fn calypso_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new calypso state directory
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let calypso_dir = Self::calypso_dir(custom_path)?;

        if calypso_dir.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&calypso_dir)?;

        // Generate and save the authority key
        let key = SecretKey::generate().map_err(|e| StateError::InvalidKey(e.to_string()))?;
        let key_path = calypso_dir.join(KEY_FILE_NAME);
        fs::write(&key_path, key.to_pem().as_bytes())?;

        // Create config (use provided or default)
        let config = config.unwrap_or_default();
        let config_path = calypso_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        // Create empty database (just touch the file, it will be initialized by the service)
        let db_path = calypso_dir.join(DB_FILE_NAME);
        fs::write(&db_path, "")?;

        Ok(Self {
            calypso_dir,
            db_path,
            key_path,
            config_path,
            config,
        })
    }

    /// Load existing state from the calypso directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let calypso_dir = Self::calypso_dir(custom_path)?;

        if !calypso_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let db_path = calypso_dir.join(DB_FILE_NAME);
        let key_path = calypso_dir.join(KEY_FILE_NAME);
        let config_path = calypso_dir.join(CONFIG_FILE_NAME);

        // Verify all required files exist
        if !db_path.exists() {
            return Err(StateError::MissingFile(DB_FILE_NAME.to_string()));
        }
        if !key_path.exists() {
            return Err(StateError::MissingFile(KEY_FILE_NAME.to_string()));
        }
        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            calypso_dir,
            db_path,
            key_path,
            config_path,
            config,
        })
    }

    /// Load the authority secret key from the key file
    pub fn load_key(&self) -> Result<SecretKey, StateError> {
        let pem = fs::read_to_string(&self.key_path)?;
        let key = SecretKey::from_pem(&pem).map_err(|e| StateError::InvalidKey(e.to_string()))?;
        Ok(key)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("calypso directory not initialized. Run 'calypso init' first")]
    NotInitialized,

    #[error("calypso directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_then_load() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("calypso");

        let state = AppState::init(Some(dir.clone()), None).unwrap();
        assert_eq!(state.config, AppConfig::default());
        assert!(state.key_path.ends_with(KEY_FILE_NAME));

        let loaded = AppState::load(Some(dir.clone())).unwrap();
        assert_eq!(loaded.config, state.config);
        assert_eq!(
            loaded.load_key().unwrap().public(),
            state.load_key().unwrap().public()
        );

        assert!(matches!(
            AppState::init(Some(dir), None),
            Err(StateError::AlreadyInitialized)
        ));
    }

    #[test]
    fn test_load_uninitialized() {
        let temp = tempfile::tempdir().unwrap();
        assert!(matches!(
            AppState::load(Some(temp.path().join("missing"))),
            Err(StateError::NotInitialized)
        ));
    }

    #[test]
    fn test_load_missing_key() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("calypso");
        let state = AppState::init(Some(dir.clone()), None).unwrap();
        fs::remove_file(&state.key_path).unwrap();

        assert!(matches!(
            AppState::load(Some(dir)),
            Err(StateError::MissingFile(file)) if file == KEY_FILE_NAME
        ));
    }

    #[test]
    fn test_config_defaults_fill_missing_fields() {
        let config: AppConfig = toml::from_str("api_port = 4000\n").unwrap();
        assert_eq!(config.api_port, 4000);
        assert!(config.bind_reader_identity);
        assert!(!config.return_ciphertext);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.protocol(), ServiceConfig::default());
    }
}
