//! Redis pub/sub routing.
//!
//! Handlers are registered per channel name and dispatched by exact match.
//! The listener runs on a dedicated pub/sub connection, separate from the
//! managed connection the cache operations share.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::StreamExt;
use redis::Client;

use crate::errors::AppResult;

/// Boxed async handler receiving the raw message payload for its channel.
pub type PubSubHandler = Arc<dyn Fn(String) -> BoxFuture<'static, ()> + Send + Sync>;

/// A router for Redis subscriptions.
#[derive(Clone, Default)]
pub struct PubSubRouter {
    routes: HashMap<String, PubSubHandler>,
    prefix: String,
}

impl PubSubRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A router whose registered channels are all prefixed.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            routes: HashMap::new(),
            prefix: prefix.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Register a handler for a channel.
    pub fn register<H, Fut>(&mut self, channel: impl Into<String>, handler: H)
    where
        H: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let name = format!("{}{}", self.prefix, channel.into());
        self.routes
            .insert(name, Arc::new(move |payload| Box::pin(handler(payload))));
    }

    /// Merge the routes of another router into this one.
    pub fn merge(&mut self, other: PubSubRouter) {
        for (channel, handler) in other.routes {
            if self.routes.contains_key(&channel) {
                tracing::warn!(channel = %channel, "Overwritten route when merging pub/sub routers");
            }
            self.routes.insert(channel, handler);
        }
    }

    /// All registered channel names.
    pub fn channels(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    fn handler_for(&self, channel: &str) -> Option<PubSubHandler> {
        self.routes.get(channel).cloned()
    }
}

/// Subscribe to every registered channel and dispatch messages until the
/// connection closes. Each delivery runs in its own task so a slow handler
/// cannot stall the stream.
pub async fn listen(client: Client, router: PubSubRouter) -> AppResult<()> {
    let mut pubsub = client.get_async_pubsub().await?;
    for channel in router.channels() {
        pubsub.subscribe(channel).await?;
        tracing::debug!(channel = %channel, "Subscribed to pub/sub channel");
    }

    let mut stream = pubsub.on_message();
    while let Some(message) = stream.next().await {
        let channel = message.get_channel_name().to_string();
        let payload: String = match message.get_payload() {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(channel = %channel, error = %e, "Undecodable pub/sub payload");
                continue;
            }
        };

        match router.handler_for(&channel) {
            Some(handler) => {
                tokio::spawn(handler(payload));
            }
            None => {
                tracing::warn!(channel = %channel, "No handler for subscribed channel");
            }
        }
    }

    Ok(())
}

/// Spawn the listener task, logging if it ever terminates with an error.
pub fn spawn_listener(client: Client, router: PubSubRouter) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = listen(client, router).await {
            tracing::error!(error = %e, "Pub/sub listener terminated");
        }
    })
}
