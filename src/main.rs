mod auth;
mod config;
mod dtos;
mod error;
mod models;
mod session;
mod store;
mod tweet_controller;
mod user_controller;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::{config::Config, store::Store};

fn app(store: Store) -> Router {
    Router::new()
        .route("/register", post(user_controller::register))
        .route("/login", post(user_controller::login))
        .route("/tweets", post(tweet_controller::create))
        .route(
            "/tweets/:id",
            get(tweet_controller::get)
                .patch(tweet_controller::update)
                .delete(tweet_controller::delete),
        )
        .route("/tweets/:id/like", post(tweet_controller::like))
        .route("/tweets/:id/retweet", post(tweet_controller::retweet))
        .route("/tweets/:id/thread", get(tweet_controller::thread))
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let store = Store::open(&config.store())
        .with_context(|| format!("failed to open database at {}", config.db_path.display()))?;
    if config.temporary {
        tracing::warn!("using a temporary database, all data is lost on shutdown");
    }

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    tracing::info!("listening on {}", config.addr);

    axum::serve(listener, app(store.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("shutting down");
    store.flush().context("failed to flush database")?;
    Ok(())
}
