use async_trait::async_trait;

use crate::{Customer, RegistryError};

/**
 * Anything that can receive a full snapshot of the registry.
 * `subscriber_id` must stay stable for the lifetime of the subscriber.
 */
#[async_trait]
pub trait Subscriber: Send + Sync {
    fn subscriber_id(&self) -> &str;

    async fn receive(&self, customers: &[Customer]) -> Result<(), RegistryError>;
}
