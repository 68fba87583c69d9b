//! Configuration loading and resolution.
//!
//! Every key of the TOML file is optional; command-line flags win over the file,
//! the file wins over built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use xbmc_types::MediaKind;

use crate::cli::Args;
use crate::ui::{KeyMap, LetterBindings, RefreshTiming};

pub(crate) const DEFAULT_PORT: u16 = 8080;

/// Top-level configuration file.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct AppConfig {
    /// JSON-RPC web server port.
    pub(crate) port: Option<u16>,
    pub(crate) user: Option<String>,
    pub(crate) password: Option<String>,
    /// Append logs to this file.
    pub(crate) log_file: Option<PathBuf>,
    pub(crate) refresh: Option<RefreshConfig>,
    pub(crate) library: Option<LibraryConfig>,
    pub(crate) keys: Option<KeysConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RefreshConfig {
    /// Sleep between two loop iterations (default: 10).
    pub(crate) poll_quantum_ms: Option<u64>,
    /// Interval between two state polls (default: 1000).
    pub(crate) period_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LibraryConfig {
    /// Library section to browse: "music" or "video".
    pub(crate) media: Option<MediaKind>,
}

/// Letter overrides for the rebindable commands.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct KeysConfig {
    pub(crate) help: Option<char>,
    pub(crate) remove: Option<char>,
    pub(crate) clear: Option<char>,
    pub(crate) fast_forward: Option<char>,
    pub(crate) rewind: Option<char>,
    pub(crate) mute: Option<char>,
    pub(crate) pause: Option<char>,
}

impl AppConfig {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).with_context(|| format!("read config {path:?}"))?;
        let cfg =
            toml::from_str::<AppConfig>(&raw).with_context(|| format!("parse config {path:?}"))?;
        Ok(cfg)
    }

    /// Load `explicit`, or the default file when it exists, or nothing.
    pub(crate) fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

pub(crate) fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ncxbmc").join("config.toml"))
}

/// Everything the program needs once flags and file are merged.
#[derive(Debug)]
pub(crate) struct Settings {
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) user: Option<String>,
    pub(crate) password: Option<String>,
    pub(crate) log_file: Option<PathBuf>,
    pub(crate) timing: RefreshTiming,
    pub(crate) media: MediaKind,
    pub(crate) keymap: KeyMap,
}

impl Settings {
    pub(crate) fn resolve(args: Args, cfg: AppConfig) -> Result<Self> {
        let defaults = RefreshTiming::default();
        let refresh = cfg.refresh.unwrap_or_default();
        let timing = RefreshTiming {
            quantum: refresh
                .poll_quantum_ms
                .map_or(defaults.quantum, Duration::from_millis),
            period: refresh
                .period_ms
                .map_or(defaults.period, Duration::from_millis),
        };
        ensure!(
            !timing.quantum.is_zero(),
            "refresh.poll_quantum_ms must be greater than zero"
        );
        ensure!(
            timing.period >= timing.quantum,
            "refresh.period_ms must not be shorter than refresh.poll_quantum_ms"
        );

        let keys = cfg.keys.unwrap_or_default();
        let base = LetterBindings::default();
        let bindings = LetterBindings {
            help: keys.help.unwrap_or(base.help),
            remove: keys.remove.unwrap_or(base.remove),
            clear: keys.clear.unwrap_or(base.clear),
            fast_forward: keys.fast_forward.unwrap_or(base.fast_forward),
            rewind: keys.rewind.unwrap_or(base.rewind),
            mute: keys.mute.unwrap_or(base.mute),
            pause: keys.pause.unwrap_or(base.pause),
        };
        let keymap = KeyMap::new(bindings).context("invalid [keys] section")?;

        Ok(Self {
            host: args.host,
            port: args.port.or(cfg.port).unwrap_or(DEFAULT_PORT),
            user: args.user.or(cfg.user),
            password: args.password.or(cfg.password),
            log_file: args.log_file.or(cfg.log_file),
            timing,
            media: cfg.library.and_then(|l| l.media).unwrap_or_default(),
            keymap,
        })
    }
}
