use std::{sync::Arc, time::Duration};

use futures::future::join_all;
use log::{debug, warn};
use registry_provider::{
    validate_customer, validate_id, Customer, CustomerStore, RegistryError, Subscriber,
};
use tokio::sync::{Mutex, RwLock};

pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(5);

/**
 * The customer registry: validates writes, applies them to the store and
 * pushes the full customer list to every subscriber after each change.
 */
pub struct CustomerService {
    store: Arc<dyn CustomerStore>,

    // Only held to add, remove or copy handles, never across a delivery
    subscribers: RwLock<Vec<Arc<dyn Subscriber>>>,

    // Serializes snapshot + delivery so subscribers see changes in commit order
    fan_out: Mutex<()>,

    delivery_timeout: Option<Duration>,
}

impl CustomerService {
    pub fn new(store: Arc<dyn CustomerStore>) -> Self {
        Self {
            store,
            subscribers: Default::default(),
            fan_out: Default::default(),
            delivery_timeout: Some(DEFAULT_DELIVERY_TIMEOUT),
        }
    }

    /**
     * Bound every single delivery, defaults to `DEFAULT_DELIVERY_TIMEOUT`.
     * Deliveries are serialized across mutations, so with `None` one stalled
     * subscriber holds up every later mutation, not only its own.
     */
    pub fn with_delivery_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.delivery_timeout = timeout;
        self
    }

    pub async fn add_customer(&self, customer: &Customer) -> Result<(), RegistryError> {
        validate_customer(customer)?;
        self.store.create(customer).await?;
        debug!("Customer[{}] added", customer.id);
        self.notify().await;
        Ok(())
    }

    pub async fn update_customer(&self, customer: &Customer) -> Result<(), RegistryError> {
        validate_customer(customer)?;
        self.store.update(&customer.id, customer).await?;
        debug!("Customer[{}] updated", customer.id);
        self.notify().await;
        Ok(())
    }

    pub async fn get_all_customers(&self) -> Result<Vec<Customer>, RegistryError> {
        self.store.get_all().await
    }

    pub async fn get_customer_by_id(&self, id: &str) -> Result<Customer, RegistryError> {
        validate_id(id)?;
        self.store.get_by_id(id).await
    }

    pub async fn delete_customer(&self, id: &str) -> Result<(), RegistryError> {
        validate_id(id)?;
        self.store.delete(id).await?;
        debug!("Customer[{}] deleted", id);
        self.notify().await;
        Ok(())
    }

    /**
     * Subscribing an id that is already present replaces the old entry in place
     */
    pub async fn subscribe(&self, subscriber: Arc<dyn Subscriber>) {
        let mut subscribers = self.subscribers.write().await;
        match subscribers
            .iter_mut()
            .find(|s| s.subscriber_id() == subscriber.subscriber_id())
        {
            Some(existing) => {
                debug!("Subscriber[{}] replaced", subscriber.subscriber_id());
                *existing = subscriber;
            }
            None => {
                debug!("Subscriber[{}] attached", subscriber.subscriber_id());
                subscribers.push(subscriber);
            }
        }
    }

    pub async fn unsubscribe(&self, subscriber: &dyn Subscriber) {
        let id = subscriber.subscriber_id();
        let mut subscribers = self.subscribers.write().await;
        let before = subscribers.len();
        subscribers.retain(|s| s.subscriber_id() != id);
        if subscribers.len() != before {
            debug!("Subscriber[{}] detached", id);
        }
    }

    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.read().await.len()
    }

    /**
     * Deliver the current customer list to every subscriber.
     * Failures are logged per subscriber and never reach the caller.
     */
    async fn notify(&self) {
        let _guard = self.fan_out.lock().await;

        let customers = match self.store.get_all().await {
            Ok(customers) => customers,
            Err(e) => {
                warn!("Failed to fetch customers for subscribers: {}", e);
                return;
            }
        };

        let subscribers: Vec<Arc<dyn Subscriber>> =
            self.subscribers.read().await.iter().cloned().collect();
        if subscribers.is_empty() {
            return;
        }

        let results = join_all(
            subscribers
                .iter()
                .map(|s| self.deliver(s.as_ref(), &customers)),
        )
        .await;
        let failed = results
            .into_iter()
            .filter_map(|r| r.err())
            .inspect(|e| warn!("{}", e))
            .count();
        debug!(
            "Snapshot of {} customers delivered to {} of {} subscribers",
            customers.len(),
            subscribers.len() - failed,
            subscribers.len()
        );
    }

    async fn deliver(
        &self,
        subscriber: &dyn Subscriber,
        customers: &[Customer],
    ) -> Result<(), RegistryError> {
        match self.delivery_timeout {
            Some(timeout) => tokio::time::timeout(timeout, subscriber.receive(customers))
                .await
                .unwrap_or_else(|_| {
                    Err(RegistryError::DeliveryFailed(
                        subscriber.subscriber_id().to_string(),
                        format!("timed out after {:?}", timeout),
                    ))
                }),
            None => subscriber.receive(customers).await,
        }
    }
}
