//! restock-ops binary: the reorder and inventory-health API.
//!
//! A JSON-only axum service over `PostgreSQL` holding the Square catalog
//! mirror (`catalog` schema, written by the external sync) and the locally
//! owned ops tables (`ops` schema: vendors, purchase orders, merchant
//! settings). All reorder math and status classification lives in
//! `restock-core`; this binary wires config, the pool, and the routers
//! together.
//!
//! Every tenant-scoped route carries the merchant ID in its path, and every
//! query repeats it as an explicit predicate.

#![cfg_attr(not(test), forbid(unsafe_code))]

use sentry::integrations::tracing as sentry_tracing;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use restock_ops::config::OpsConfig;
use restock_ops::state::AppState;
use restock_ops::{db, routes};

/// Start Sentry when a DSN is configured. The guard flushes pending events
/// on drop and must outlive the server.
fn init_sentry(config: &OpsConfig) -> Option<sentry::ClientInitGuard> {
    config.sentry_dsn.as_deref().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                environment: config.sentry_environment.clone().map(Into::into),
                sample_rate: config.sentry_sample_rate,
                traces_sample_rate: config.sentry_traces_sample_rate,
                attach_stacktrace: true,
                ..Default::default()
            },
        ))
    })
}

/// warn/error become Sentry events, info/debug become breadcrumbs.
fn sentry_event_filter(meta: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *meta.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let config = OpsConfig::from_env().expect("configuration error");

    // Sentry comes up before the subscriber so its tracing layer has a hub.
    let _sentry = init_sentry(&config);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "restock_ops=info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let pool = db::create_pool(&config.database_url)
        .await
        .expect("database pool");
    tracing::info!("database pool ready");

    // Schema changes are applied out of band: `restock-cli migrate ops`.

    let addr = config.socket_addr();
    let state = AppState::new(config, pool);

    let app = routes::routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        // Sentry layers sit outermost so every request is covered.
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    tracing::info!(%addr, "restock-ops listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("bind listener");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

/// Resolve when the process receives Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received, draining");
}
