use std::path::PathBuf;

use clap::Args;

use calypso_daemon::http_server::api::client::{request_read, ApiError};
use common::client::{recover, RecoveryError};
use common::crypto::{KeyError, SecretKey};
use common::record::{RecordError, WriteId};

/// Request a stored write's key and decrypt it
#[derive(Args, Debug, Clone)]
pub struct Read {
    /// Write id returned by `calypso write`
    #[arg(long)]
    pub write_id: String,

    /// Reader secret key PEM file
    #[arg(long)]
    pub key: PathBuf,

    /// Local copy of the ciphertext (required unless the daemon returns it)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Where to write the plaintext (printed if not set)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error(transparent)]
    WriteId(#[from] RecordError),
    #[error("invalid reader key: {0}")]
    Key(#[from] KeyError),
    #[error("api error: {0}")]
    Api(#[from] ApiError),
    #[error("no ciphertext: pass --input or enable return_ciphertext on the daemon")]
    MissingCiphertext,
    #[error(transparent)]
    Recovery(#[from] RecoveryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Read {
    type Error = ReadError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let write_id: WriteId = self.write_id.parse()?;
        let pem = std::fs::read_to_string(&self.key)?;
        let reader = SecretKey::from_pem(&pem)?;

        let mut client = ctx.client.clone();
        let reply = request_read(&mut client, &write_id, &reader).await?;

        let ciphertext = match (&self.input, reply.ciphertext.as_ref()) {
            (Some(path), _) => std::fs::read(path)?,
            (None, Some(ciphertext)) => ciphertext.clone(),
            (None, None) => return Err(ReadError::MissingCiphertext),
        };

        let plaintext = recover(&ciphertext, &reader, &reply.reencrypted_key())?;
        match &self.output {
            Some(path) => {
                std::fs::write(path, &plaintext)?;
                Ok(format!("wrote {} bytes to {}", plaintext.len(), path.display()))
            }
            None => Ok(String::from_utf8_lossy(&plaintext).into_owned()),
        }
    }
}
