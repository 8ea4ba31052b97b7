//! Shared application state.

use std::sync::Arc;

use quickcar_core::DomainEvent;
use sqlx::PgPool;
use tokio::sync::broadcast;

use crate::config::SiteConfig;
use crate::razorpay::RazorpayClient;

/// Shared application state, cheap to clone.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    pool: PgPool,
    razorpay: RazorpayClient,
    events: broadcast::Sender<DomainEvent>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: SiteConfig, pool: PgPool, razorpay: RazorpayClient) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                razorpay,
                events,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn razorpay(&self) -> &RazorpayClient {
        &self.inner.razorpay
    }

    /// Publish a domain event. Dropped silently when nobody is listening.
    pub fn publish(&self, event: DomainEvent) {
        let _ = self.inner.events.send(event);
    }

    /// Subscribe to domain events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.inner.events.subscribe()
    }
}
