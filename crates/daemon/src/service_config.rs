use std::path::PathBuf;

use common::prelude::SecretKey;

use crate::service::ServiceConfig;

#[derive(Debug)]
pub struct Config {
    // custodian configuration
    /// the authority secret write records are wrapped to,
    ///  if not set then a new secret will be generated
    pub authority_secret: Option<SecretKey>,
    /// protocol switches for the write and read paths
    pub protocol: ServiceConfig,

    // http server configuration
    /// Port for the API HTTP server.
    pub api_port: u16,

    // data store configuration
    /// a path to a sqlite database, if not set then an
    ///  in-memory database will be used
    pub sqlite_path: Option<PathBuf>,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            authority_secret: None,
            protocol: ServiceConfig::default(),
            api_port: 3000,
            sqlite_path: None,
            log_level: tracing::Level::INFO,
            log_dir: None,
        }
    }
}
