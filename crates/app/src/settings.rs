//! Handles settings for the application.
//!
//! Values are read, in increasing priority, from built-in defaults, an
//! optional TOML file (`settings.toml` unless `--config` says otherwise),
//! `TRIPSPLIT_*` environment variables (`TRIPSPLIT_SERVER__PORT=8080`) and
//! command line overrides.
use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "settings";

#[derive(Debug, Deserialize)]
pub struct App {
    /// Log level applied to the workspace crates.
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    /// ISO 4217 code used when a request omits its currency.
    pub default_currency: String,
    pub max_participants: usize,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

#[derive(Debug, Parser)]
#[command(name = "tripsplit", version)]
struct Args {
    /// Optional config file path (TOML, extension optional).
    #[arg(long)]
    config: Option<String>,
    /// Override bind address (e.g. 0.0.0.0).
    #[arg(long)]
    bind: Option<String>,
    /// Override listening port.
    #[arg(long)]
    port: Option<u16>,
}

impl Settings {
    pub fn new() -> Result<Self> {
        let args = Args::parse();
        Self::load(args)
    }

    fn load(args: Args) -> Result<Self> {
        let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        let builder = Config::builder()
            .set_default("app.level", "info")?
            .set_default("server.port", 3000)?
            .set_default("server.default_currency", "EUR")?
            .set_default("server.max_participants", 100)?
            .add_source(File::with_name(config_path).required(args.config.is_some()))
            .add_source(Environment::with_prefix("TRIPSPLIT").separator("__"));

        let mut settings: Settings = builder.build()?.try_deserialize()?;

        if let Some(bind) = args.bind {
            settings.server.bind = Some(bind);
        }
        if let Some(port) = args.port {
            settings.server.port = port;
        }

        Ok(settings)
    }
}
