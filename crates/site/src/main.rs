//! QuickCar Site - Customer-facing car service booking site.
//!
//! This binary serves the booking site on port 3000.
//!
//! # Architecture
//!
//! - Axum web framework exposing a JSON API
//! - `PostgreSQL` for accounts, profiles, garages, drafts, and history
//! - Tower-sessions for the login session and booking lifecycle flags
//! - Razorpay for payment orders and confirmation verification
//!
//! The booking lifecycle itself is a pure state machine in `quickcar-core`;
//! this binary persists its parts and wires it to HTTP, storage, and the
//! gateway.

#![cfg_attr(not(test), forbid(unsafe_code))]

mod config;
mod db;
mod error;
mod middleware;
mod models;
mod razorpay;
mod routes;
mod services;
mod state;

use axum::Router;
use config::SiteConfig;
use razorpay::RazorpayClient;
use sentry::integrations::tracing as sentry_tracing;
use state::AppState;
use tower::ServiceBuilder;
use tower_sessions_sqlx_store::PostgresStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &SiteConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let config = SiteConfig::from_env().expect("Failed to load configuration");

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "quickcar_site=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");
    tracing::info!("Database pool created");

    db::MIGRATOR
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    // The session store keeps its own schema
    let session_store = PostgresStore::new(pool.clone());
    session_store
        .migrate()
        .await
        .expect("Failed to migrate session store");

    let razorpay_client = RazorpayClient::new(config.razorpay.clone());
    let state = AppState::new(config.clone(), pool, razorpay_client);

    spawn_event_logger(&state);

    let session_layer = middleware::create_session_layer(state.pool(), state.config());

    let api = Router::new()
        .nest("/auth", routes::auth_routes().layer(middleware::auth_rate_limiter()))
        .nest("/profile", routes::profile_routes())
        .nest("/vehicles", routes::vehicle_routes())
        .nest("/booking", routes::booking_routes())
        .nest("/payments", routes::payment_routes())
        .nest("/services", routes::service_routes())
        .route("/chat", axum::routing::post(routes::chat::respond))
        .layer(middleware::api_rate_limiter());

    // Sentry layers outermost for full request coverage
    let app = Router::new()
        .nest("/health", routes::health_routes())
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
                .layer(sentry_tower::NewSentryLayer::new_from_top())
                .layer(tower_http::trace::TraceLayer::new_for_http())
                .layer(session_layer),
        )
        .with_state(state);

    let addr = config.socket_addr();
    tracing::info!("site listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Log every domain event as a structured audit line.
fn spawn_event_logger(state: &AppState) {
    let mut events = state.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => tracing::info!(?event, "domain event"),
                Err(tokio::sync::broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "event logger lagged");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
