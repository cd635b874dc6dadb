use std::fmt::Debug;

use async_trait::async_trait;

use crate::{Customer, RegistryError};

/**
 * The storage backend behind the customer registry.
 * Implementations are shared between concurrent requests and must make each
 * operation atomic with respect to the others on the same id.
 */
#[async_trait]
pub trait CustomerStore: Send + Sync + Debug {
    /**
     * Insert a new customer, fails with `CustomerExists` if the id is taken
     */
    async fn create(&self, customer: &Customer) -> Result<(), RegistryError>;

    /**
     * Get all customers, in the order the backend returns them
     */
    async fn get_all(&self) -> Result<Vec<Customer>, RegistryError>;

    /**
     * Get one customer by its id
     */
    async fn get_by_id(&self, id: &str) -> Result<Customer, RegistryError>;

    /**
     * Replace the stored customer with the given id
     */
    async fn update(&self, id: &str, customer: &Customer) -> Result<(), RegistryError>;

    async fn delete(&self, id: &str) -> Result<(), RegistryError>;
}
