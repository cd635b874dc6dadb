mod error;
mod models;
mod store;
mod subscriber;
mod validation;

pub use error::RegistryError;
pub use models::*;
pub use store::*;
pub use subscriber::*;
pub use validation::*;
