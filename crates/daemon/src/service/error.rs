use common::record::WriteId;
use record_store::StoreError;

use crate::custodian::CustodianError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("write id {0} does not match the stored digest")]
    DigestMismatch(WriteId),
    #[error("write is missing the reader binding")]
    MissingReaderBinding,
    #[error("read request is not signed by the record's reader")]
    Unauthorized,
    #[error("reader binding does not match the record's reader")]
    ReaderMismatch,
    #[error("custodian error: {0}")]
    Custodian(CustodianError),
}

impl From<CustodianError> for ServiceError {
    fn from(err: CustodianError) -> Self {
        match err {
            CustodianError::ReaderMismatch => ServiceError::ReaderMismatch,
            err => ServiceError::Custodian(err),
        }
    }
}

/// How a failure should be reported to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    Forbidden,
    NotFound,
    Conflict,
    Internal,
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Store(StoreError::DigestMismatch { .. })
            | ServiceError::Store(StoreError::MalformedID(_))
            | ServiceError::DigestMismatch(_)
            | ServiceError::MissingReaderBinding => ErrorKind::InvalidInput,
            ServiceError::Unauthorized | ServiceError::ReaderMismatch => ErrorKind::Forbidden,
            ServiceError::Store(StoreError::NotFound(_)) => ErrorKind::NotFound,
            ServiceError::Store(StoreError::AlreadyExists(_)) => ErrorKind::Conflict,
            _ => ErrorKind::Internal,
        }
    }
}
