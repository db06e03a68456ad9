use std::io::Error as IoError;

use figment::Error as ConfigError;
use serde_json::Error as JsonError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can escape the library. Domain-level rejections (bad votes,
/// ineligible voters) are not errors at this level; see
/// [`crate::model::election::VoteError`] and
/// [`crate::model::voter::RegistrationError`].
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] IoError),
    #[error(transparent)]
    Json(#[from] JsonError),
    #[error(transparent)]
    Config(#[from] Box<ConfigError>),
    #[error("Region tree exceeds the maximum depth of {max_depth}")]
    RegionTooDeep { max_depth: usize },
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(Box::new(err))
    }
}
