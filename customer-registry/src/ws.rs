use std::{fmt::Display, sync::Arc};

use async_trait::async_trait;
use futures::{Sink, SinkExt, StreamExt};
use log::debug;
use poem::{
    handler,
    web::{
        websocket::{Message, WebSocket},
        Data, RemoteAddr,
    },
    IntoResponse,
};
use registry_api::{CustomerDef, CustomerService};
use registry_provider::{Customer, RegistryError, Subscriber};
use tokio::sync::Mutex;

/**
 * Pushes every snapshot to a WebSocket peer as one JSON text frame
 */
pub struct WebSocketSubscriber<S> {
    id: String,
    sink: Mutex<S>,
}

impl<S> WebSocketSubscriber<S> {
    pub fn new(id: impl ToString, sink: S) -> Self {
        Self {
            id: id.to_string(),
            sink: Mutex::new(sink),
        }
    }
}

#[async_trait]
impl<S> Subscriber for WebSocketSubscriber<S>
where
    S: Sink<Message> + Unpin + Send + 'static,
    S::Error: Display,
{
    fn subscriber_id(&self) -> &str {
        &self.id
    }

    async fn receive(&self, customers: &[Customer]) -> Result<(), RegistryError> {
        let payload: Vec<CustomerDef> = customers.iter().cloned().map(CustomerDef::from).collect();
        let text = serde_json::to_string(&payload)
            .map_err(|e| RegistryError::DeliveryFailed(self.id.clone(), e.to_string()))?;
        self.sink
            .lock()
            .await
            .send(Message::Text(text))
            .await
            .map_err(|e| RegistryError::DeliveryFailed(self.id.clone(), e.to_string()))
    }
}

/**
 * Live customer list, the peer address identifies the subscriber
 */
#[handler]
pub fn customer_feed(
    ws: WebSocket,
    remote_addr: &RemoteAddr,
    data: Data<&Arc<CustomerService>>,
) -> impl IntoResponse {
    let service = data.0.clone();
    let subscriber_id = remote_addr.to_string();
    ws.on_upgrade(move |socket| async move {
        let (sink, mut stream) = socket.split();
        let subscriber = Arc::new(WebSocketSubscriber::new(subscriber_id, sink));
        service.subscribe(subscriber.clone()).await;

        while let Some(msg) = stream.next().await {
            match msg {
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    debug!(
                        "Failed to read from subscriber[{}]: {}",
                        subscriber.subscriber_id(),
                        e
                    );
                    break;
                }
            }
        }

        service.unsubscribe(subscriber.as_ref()).await;
    })
}
