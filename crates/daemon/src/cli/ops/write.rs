use std::path::PathBuf;

use clap::Args;

use calypso_daemon::http_server::api::client::ApiError;
use calypso_daemon::http_server::api::v0::authority::AuthorityRequest;
use common::client::{create_write_record, ClientError};
use common::crypto::{KeyError, PublicKey};

/// Encrypt a file for a reader and store it with the custodian
#[derive(Args, Debug, Clone)]
pub struct Write {
    /// File to encrypt
    #[arg(long)]
    pub input: PathBuf,

    /// Public key of the only reader allowed to read it back (hex)
    #[arg(long)]
    pub reader: String,

    /// Also save the ciphertext locally
    #[arg(long)]
    pub ciphertext_out: Option<PathBuf>,

    /// Leave the reader key out of the record
    #[arg(long)]
    pub no_binding: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("invalid reader key: {0}")]
    Reader(#[from] KeyError),
    #[error("failed to build record: {0}")]
    Client(#[from] ClientError),
    #[error("api error: {0}")]
    Api(#[from] ApiError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Write {
    type Error = WriteError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let reader = PublicKey::from_hex(&self.reader)?;
        let payload = std::fs::read(&self.input)?;

        let mut client = ctx.client.clone();
        let authority = client.call(AuthorityRequest).await?.public_key;

        let record = create_write_record(&payload, &reader, &authority, !self.no_binding)?;
        if let Some(path) = &self.ciphertext_out {
            std::fs::write(path, &record.ciphertext)?;
        }

        let reply = client.call(record).await?;
        Ok(reply.write_id.to_string())
    }
}
