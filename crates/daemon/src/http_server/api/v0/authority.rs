use axum::extract::{Json, State};
use reqwest::{Client, RequestBuilder, Url};

use common::messages::AuthorityInfo;

use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::ServiceState;

/// Fetch the key clients wrap write keys to
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorityRequest;

pub async fn handler(State(state): State<ServiceState>) -> Json<AuthorityInfo> {
    Json(AuthorityInfo {
        public_key: state.service().authority(),
    })
}

impl ApiRequest for AuthorityRequest {
    type Response = AuthorityInfo;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/authority")?;
        Ok(client.get(full_url))
    }
}
