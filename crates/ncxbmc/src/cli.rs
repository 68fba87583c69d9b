use std::path::PathBuf;

use clap::{ArgAction, Parser};

#[derive(Parser, Debug)]
#[command(
    name = "ncxbmc",
    version,
    disable_version_flag = true,
    about = "Terminal remote for XBMC/Kodi media centers"
)]
pub(crate) struct Args {
    /// Host name or address of the media center.
    #[arg(value_name = "HOSTNAME")]
    pub(crate) host: String,

    /// JSON-RPC web server port [default: 8080].
    #[arg(short, long)]
    pub(crate) port: Option<u16>,

    /// Web server user name.
    #[arg(short = 'U', long)]
    pub(crate) user: Option<String>,

    /// Web server password.
    #[arg(short = 'P', long)]
    pub(crate) password: Option<String>,

    /// Config file (defaults to <config dir>/ncxbmc/config.toml when present).
    #[arg(short, long, value_name = "FILE")]
    pub(crate) config: Option<PathBuf>,

    /// Append logs to this file.
    #[arg(long, value_name = "FILE")]
    pub(crate) log_file: Option<PathBuf>,

    /// Print version.
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    #[allow(dead_code)]
    version: (),
}
