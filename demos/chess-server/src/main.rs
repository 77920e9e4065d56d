//! Standalone chess server.
//!
//! Configured from the environment:
//!
//! | Variable               | Default          |
//! |------------------------|------------------|
//! | `ROOKERY_BIND`         | `127.0.0.1:8080` |
//! | `ROOKERY_ACCOUNTS`     | in-memory only   |
//! | `ROOKERY_MAX_SESSIONS` | `100`            |
//! | `ROOKERY_MAX_MATCHES`  | `50`             |
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::path::PathBuf;

use rookery::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Debug, PartialEq)]
struct Settings {
    bind: String,
    accounts: Option<PathBuf>,
    max_sessions: usize,
    max_matches: usize,
}

impl Settings {
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let number = |key: &str, default: usize| match lookup(key) {
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|e| format!("{key}={raw:?} is not a count: {e}")),
            None => Ok(default),
        };
        Ok(Self {
            bind: lookup("ROOKERY_BIND").unwrap_or_else(|| "127.0.0.1:8080".into()),
            accounts: lookup("ROOKERY_ACCOUNTS").map(PathBuf::from),
            max_sessions: number(
                "ROOKERY_MAX_SESSIONS",
                RegistryConfig::default().max_sessions,
            )?,
            max_matches: number("ROOKERY_MAX_MATCHES", MatchConfig::default().max_matches)?,
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::from_lookup(|key| std::env::var(key).ok())?;

    let mut builder = RookeryServer::builder()
        .bind(&settings.bind)
        .registry_config(RegistryConfig {
            max_sessions: settings.max_sessions,
            ..Default::default()
        })
        .match_config(MatchConfig {
            max_matches: settings.max_matches,
        });
    match &settings.accounts {
        Some(path) => {
            tracing::info!(path = %path.display(), "persisting accounts");
            builder = builder.account_store(JsonFileStore::new(path));
        }
        None => tracing::warn!("no ROOKERY_ACCOUNTS set, accounts are lost on exit"),
    }

    let server = builder.build().await?;
    tracing::info!(addr = %server.local_addr()?, "chess server listening");
    server.run().await?;
    Ok(())
}
