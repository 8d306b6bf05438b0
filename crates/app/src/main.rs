use engine::Currency;
use server::ServerState;

use crate::error::Result;

mod error;
mod settings;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "tripsplit={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let default_currency: Currency = settings.server.default_currency.parse()?;
    let state = ServerState {
        default_currency,
        max_participants: settings.server.max_participants,
    };

    let bind = settings
        .server
        .bind
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, settings.server.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener on {addr}: {err}");
            return Err(err.into());
        }
    };

    server::run_with_listener(state, listener).await?;
    Ok(())
}
