use async_trait::async_trait;
use log::debug;
use registry_provider::{Customer, CustomerStore, RegistryError};
use tokio::sync::RwLock;

/**
 * In-process customer store, keeps customers in insertion order.
 * Every operation runs under a single lock so it's atomic.
 */
#[derive(Debug, Default)]
pub struct MemoryStore {
    customers: RwLock<Vec<Customer>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Default::default()
    }

    /**
     * Seed the store, later duplicates of the same id are dropped
     */
    pub fn with_customers<T>(customers: T) -> Self
    where
        T: IntoIterator<Item = Customer>,
    {
        let mut seeded: Vec<Customer> = vec![];
        for customer in customers {
            if !seeded.iter().any(|c| c.id == customer.id) {
                seeded.push(customer);
            }
        }
        Self {
            customers: RwLock::new(seeded),
        }
    }
}

#[async_trait]
impl CustomerStore for MemoryStore {
    async fn create(&self, customer: &Customer) -> Result<(), RegistryError> {
        let mut customers = self.customers.write().await;
        if customers.iter().any(|c| c.id == customer.id) {
            return Err(RegistryError::CustomerExists(customer.id.clone()));
        }
        customers.push(customer.clone());
        debug!("Customer[{}] created, {} in store", customer.id, customers.len());
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<Customer>, RegistryError> {
        Ok(self.customers.read().await.clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<Customer, RegistryError> {
        self.customers
            .read()
            .await
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| RegistryError::CustomerNotFound(id.to_string()))
    }

    async fn update(&self, id: &str, customer: &Customer) -> Result<(), RegistryError> {
        let mut customers = self.customers.write().await;
        match customers.iter_mut().find(|c| c.id == id) {
            Some(existing) => {
                *existing = customer.clone();
                Ok(())
            }
            None => Err(RegistryError::CustomerNotFound(id.to_string())),
        }
    }

    async fn delete(&self, id: &str) -> Result<(), RegistryError> {
        let mut customers = self.customers.write().await;
        match customers.iter().position(|c| c.id == id) {
            Some(idx) => {
                customers.remove(idx);
                Ok(())
            }
            None => Err(RegistryError::CustomerNotFound(id.to_string())),
        }
    }
}
