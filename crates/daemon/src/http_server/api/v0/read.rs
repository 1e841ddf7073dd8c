use axum::extract::{Json, State};
use reqwest::{Client, RequestBuilder, Url};

use common::messages::{ReadReply, ReadRequest};

use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::service::ServiceError;
use crate::ServiceState;

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<ReadRequest>,
) -> Result<Json<ReadReply>, ServiceError> {
    let reply = state.service().read(req).await?;
    Ok(Json(reply))
}

impl ApiRequest for ReadRequest {
    type Response = ReadReply;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/read")?;
        Ok(client.post(full_url).json(&self))
    }
}
