//! Terminal UI: two tabs over one screen, refreshed by a cooperative loop.
//!
//! Keys:
//! - Tab: switch between the playlist and library tabs
//! - Esc: quit (or close the help window)
//! - Up/Down: move selection
//! - Enter: play selected entry / open directory
//! - Backspace: back to the previous directory
//! - Space: add selected file or directory to the playlist
//! - Left/Right: volume down/up
//! - h: help, d: remove, c: clear, f: fast forward, b: rewind, m: mute,
//!   p: pause (letters can be rebound in the config file)

mod engine;
mod history;
mod keys;
mod library;
mod list;
mod playlist;
mod render;
mod surface;
mod tabs;
#[cfg(test)]
mod testing;
mod view;

use anyhow::Result;
use crossbeam_channel::Receiver;

use crate::backend::MediaBackend;
use crate::config::Settings;

pub(crate) use engine::RefreshTiming;
#[cfg(test)]
pub(crate) use keys::Command;
pub(crate) use keys::{KeyMap, LetterBindings};

use engine::Engine;
use library::LibraryView;
use playlist::PlaylistView;
use surface::CrosstermSurface;
use tabs::TabController;
use view::View;

/// Take over the terminal and run until the user quits.
pub(crate) fn run_tui(
    settings: Settings,
    backend: Box<dyn MediaBackend>,
    log_rx: Receiver<String>,
) -> Result<()> {
    let views: Vec<Box<dyn View>> = vec![
        Box::new(PlaylistView::new(settings.media)),
        Box::new(LibraryView::new(settings.media)),
    ];
    let surface = CrosstermSurface::acquire()?;
    let mut engine = Engine::new(
        surface,
        backend,
        TabController::new(views),
        settings.keymap,
        settings.timing,
        log_rx,
    )?;
    let result = engine.run();

    engine.surface_mut().restore()?;
    result
}
