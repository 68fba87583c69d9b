//! Tracing setup.
//!
//! The terminal UI owns stdout, so events are forwarded as single lines over a
//! channel to the status line, and optionally appended to a log file.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, Sender, unbounded};
use tracing::Subscriber;
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context as LayerContext, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Install the global subscriber. Returns the receiving end of the status
/// line feed.
pub(crate) fn init(log_file: Option<&Path>) -> Result<Receiver<String>> {
    let (tx, rx) = unbounded();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,ureq=warn,ureq_proto=warn"));
    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("open log file {path:?}"))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false),
            )
        }
        None => None,
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(ChannelLayer::new(tx))
        .with(file_layer)
        .try_init()
        .context("install tracing subscriber")?;
    Ok(rx)
}

/// Sends every event as "LEVEL message key=value ..." over a channel.
pub(crate) struct ChannelLayer {
    tx: Sender<String>,
}

impl ChannelLayer {
    pub(crate) fn new(tx: Sender<String>) -> Self {
        Self { tx }
    }
}

impl<S> Layer<S> for ChannelLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: LayerContext<'_, S>) {
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);
        let mut line = format!(
            "{} {}",
            event.metadata().level(),
            visitor.message.unwrap_or_default()
        );
        for field in visitor.fields {
            line.push(' ');
            line.push_str(&field);
        }
        // Nobody listens once the UI is gone.
        let _ = self.tx.send(line);
    }
}

#[derive(Default)]
struct LineVisitor {
    message: Option<String>,
    fields: Vec<String>,
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields.push(format!("{}={value}", field.name()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        } else {
            self.fields.push(format!("{}={value:?}", field.name()));
        }
    }
}
