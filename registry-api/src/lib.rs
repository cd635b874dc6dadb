mod api_models;
mod api_provider;
mod error;
mod service;

pub use api_models::*;
pub use api_provider::*;
pub use error::*;
pub use service::*;
