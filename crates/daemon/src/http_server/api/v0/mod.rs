use axum::routing::{get, post};
use axum::Router;

pub mod authority;
mod error;
pub mod read;
pub mod write;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/write", post(write::handler))
        .route("/read", post(read::handler))
        .route("/authority", get(authority::handler))
        .with_state(state)
}
