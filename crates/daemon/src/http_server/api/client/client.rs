use reqwest::{header::HeaderMap, header::HeaderValue, Client};
use url::Url;

use common::client::sign_read;
use common::crypto::SecretKey;
use common::messages::ReadReply;
use common::record::WriteId;

use super::error::ApiError;
use super::ApiRequest;

#[derive(Debug, Clone)]
pub struct ApiClient {
    pub remote: Url,
    client: Client,
}

impl ApiClient {
    pub fn new(remote: &Url) -> Result<Self, ApiError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder().default_headers(default_headers).build()?;

        Ok(Self {
            remote: remote.clone(),
            client,
        })
    }

    pub async fn call<T: ApiRequest>(&mut self, request: T) -> Result<T::Response, ApiError> {
        let request_builder = request.build_request(&self.remote, &self.client)?;
        let response = request_builder.send().await?;

        if response.status().is_success() {
            Ok(response.json::<T::Response>().await?)
        } else {
            Err(ApiError::HttpStatus(
                response.status(),
                response.text().await?,
            ))
        }
    }

    /// Get the base URL for API requests
    pub fn base_url(&self) -> &Url {
        &self.remote
    }

    /// Get the underlying HTTP client for custom requests
    pub fn http_client(&self) -> &Client {
        &self.client
    }
}

/// Sign a read request for `write_id` and ask the custodian to re-encrypt
/// its key to `reader`.
pub async fn request_read(
    client: &mut ApiClient,
    write_id: &WriteId,
    reader: &SecretKey,
) -> Result<ReadReply, ApiError> {
    let request = sign_read(write_id, reader);
    tracing::debug!(write_id = %write_id, "requesting read");
    client.call(request).await
}
