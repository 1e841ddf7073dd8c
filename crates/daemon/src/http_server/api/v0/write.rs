use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};

use common::messages::{WriteReply, WriteRequest};

use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::service::ServiceError;
use crate::ServiceState;

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<WriteRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let reply = state.service().write(req).await?;
    Ok((http::StatusCode::CREATED, Json(reply)))
}

impl ApiRequest for WriteRequest {
    type Response = WriteReply;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/write")?;
        Ok(client.post(full_url).json(&self))
    }
}
