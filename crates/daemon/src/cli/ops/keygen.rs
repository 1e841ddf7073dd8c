use std::path::PathBuf;

use clap::Args;

use common::crypto::{KeyError, SecretKey};

/// Generate a reader keypair
#[derive(Args, Debug, Clone)]
pub struct Keygen {
    /// Write the secret key PEM here instead of printing it
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum KeygenError {
    #[error("key generation failed: {0}")]
    Key(#[from] KeyError),
    #[error("failed to write key file: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Keygen {
    type Error = KeygenError;
    type Output = String;

    async fn execute(&self, _ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let secret = SecretKey::generate()?;
        let public = secret.public();

        match &self.out {
            Some(path) => {
                if path.exists() {
                    return Err(std::io::Error::new(
                        std::io::ErrorKind::AlreadyExists,
                        format!("{} already exists", path.display()),
                    )
                    .into());
                }
                std::fs::write(path, secret.to_pem().as_bytes())?;
                Ok(format!("wrote {}\npublic key: {}", path.display(), public))
            }
            None => Ok(format!("{}\npublic key: {}", secret.to_pem().as_str(), public)),
        }
    }
}
