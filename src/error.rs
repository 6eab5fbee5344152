//! Error types returned across the library boundary.

use crate::model::DonationId;
use crate::validate::Invalid;
use thiserror::Error;

/// Everything that can go wrong when working with the donation ledger. None of these are fatal;
/// each one carries a message that can be shown to the user as-is.
#[derive(Debug, Error)]
pub enum Error {
    /// The draft did not satisfy the validation rules. The user must correct it and resubmit.
    #[error("{0}")]
    ValidationFailed(Invalid),

    /// No donation exists with the given id.
    #[error("Donation not found: {0}")]
    NotFound(DonationId),

    /// The database could not complete the operation. Nothing was committed.
    #[error("Storage failure: {0}")]
    StorageFailure(String),

    /// The home directory or its configuration file is missing or unusable.
    #[error("Configuration error: {0:#}")]
    Config(anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        Error::StorageFailure(e.to_string())
    }
}

impl From<Invalid> for Error {
    fn from(invalid: Invalid) -> Self {
        Error::ValidationFailed(invalid)
    }
}

/// Lifts `anyhow` errors from file and setup helpers into a public `Error` of the given kind.
pub(crate) trait IntoResult<T> {
    fn config_result(self) -> Result<T>;
    fn storage_result(self) -> Result<T>;
}

impl<T> IntoResult<T> for anyhow::Result<T> {
    fn config_result(self) -> Result<T> {
        self.map_err(Error::Config)
    }

    fn storage_result(self) -> Result<T> {
        self.map_err(|e| Error::StorageFailure(format!("{e:#}")))
    }
}
