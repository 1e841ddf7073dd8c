// Custodian service modules
pub mod custodian;
pub mod http_server;
pub mod process;
pub mod service;
pub mod service_config;
pub mod service_state;

// App state (configuration, paths)
pub mod state;

// Re-exports for consumers
pub use custodian::{Authority, Custodian, CustodianError};
pub use process::{spawn_service, start_service, ShutdownHandle, StartError};
pub use service::{CalypsoService, ServiceConfig, ServiceError};
pub use service_config::Config as DaemonConfig;
pub use service_state::State as ServiceState;
pub use state::{AppConfig, AppState, StateError};
