use thiserror::Error;

use crate::config::ConfigError;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum WinlinkError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Window is not attached to a group")]
    NotAttached,

    #[error("Window is already attached as member {0}")]
    AlreadyAttached(crate::registry::MemberId),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type WinlinkResult<T> = Result<T, WinlinkError>;

impl WinlinkError {
    pub fn internal<S: Into<String>>(message: S) -> Self {
        WinlinkError::Internal(message.into())
    }
}
