use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryError {
    #[error("Customer id '{0}' must be exactly 2 characters")]
    InvalidId(String),

    #[error("Contact number {0} must have exactly 10 digits")]
    InvalidContactNo(i64),

    #[error("Customer[{0}] already exists")]
    CustomerExists(String),

    #[error("Customer[{0}] not found")]
    CustomerNotFound(String),

    #[error("Failed to deliver snapshot to subscriber[{0}]: {1}")]
    DeliveryFailed(String, String),

    #[error("{0}")]
    ExternalStorageError(String),
}
