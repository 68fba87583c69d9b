//! `ncxbmc`: a terminal remote for XBMC/Kodi.
//!
//! Two tabs share the screen:
//! - Playlist: the active playlist, now playing, transport and volume
//! - Library: browse media sources and queue files or directories
//!
//! The media center is driven over its JSON-RPC web interface.

mod backend;
mod cli;
mod config;
mod kodi_api;
mod logging;
mod ui;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use crate::backend::{BackendError, MediaBackend};
use crate::cli::Args;
use crate::config::{AppConfig, Settings};
use crate::kodi_api::KodiClient;

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {}", describe(&err));
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let cfg = AppConfig::discover(args.config.as_deref())?;
    let settings = Settings::resolve(args, cfg)?;
    let log_rx = logging::init(settings.log_file.as_deref())?;

    let client = KodiClient::new(
        &settings.host,
        settings.port,
        settings.user.as_deref(),
        settings.password.as_deref(),
    );
    match client.system_info() {
        Ok(info) => {
            tracing::info!(name = %info.name, version = %info.version, "connected to {}", settings.host);
        }
        Err(e) if e.is_fatal_at_startup() => {
            return Err(e).with_context(|| format!("connect to {}", client.url()));
        }
        Err(e) => tracing::warn!(error = %e, "could not read media center version"),
    }

    ui::run_tui(settings, Box::new(client), log_rx)
}

/// One-line diagnostic for a failed start.
fn describe(err: &anyhow::Error) -> String {
    match err.downcast_ref::<BackendError>() {
        Some(BackendError::Connectivity(_)) => {
            "Connection error\nPlease check given hostname (and/or port)".to_string()
        }
        Some(e) => e.to_string(),
        None => format!("{err:#}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connectivity_errors_get_a_hint() {
        let err = anyhow::Error::new(BackendError::Connectivity("refused".into()))
            .context("connect to http://mediabox:8080/jsonrpc");
        assert_eq!(
            describe(&err),
            "Connection error\nPlease check given hostname (and/or port)"
        );
    }

    #[test]
    fn other_errors_keep_their_chain() {
        let auth = anyhow::Error::new(BackendError::Authentication).context("connect");
        assert_eq!(describe(&auth), "authentication rejected by media center");

        let plain = anyhow::anyhow!("bad toml").context("parse config");
        assert_eq!(describe(&plain), "parse config: bad toml");
    }
}
