use axum::{Router, routing::post};

use crate::splits;
use engine::Currency;

/// Shared, read-only handler state.
#[derive(Clone, Debug)]
pub struct ServerState {
    /// Currency used when a request does not name one.
    pub default_currency: Currency,
    /// Upper bound on participants accepted in one request.
    pub max_participants: usize,
}

impl Default for ServerState {
    fn default() -> Self {
        Self {
            default_currency: Currency::default(),
            max_participants: 100,
        }
    }
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/splits", post(splits::preview))
        .with_state(state)
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(
        "Server listening on {} (default currency {})",
        addr,
        state.default_currency
    );

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(state, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
