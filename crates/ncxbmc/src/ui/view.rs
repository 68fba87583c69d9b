//! The view capability set shared by the playlist and library tabs.

use std::ops::{BitOr, BitOrAssign};

use ratatui::style::{Modifier, Style};

use crate::backend::{BackendResult, MediaBackend};

use super::keys::Command;
use super::surface::Pane;

/// Set of panes a view asks to have redrawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Regions(u8);

impl Regions {
    pub(crate) const NONE: Self = Self(0);
    pub(crate) const HEADER: Self = Self(1);
    pub(crate) const MAIN: Self = Self(1 << 1);
    pub(crate) const FOOTER: Self = Self(1 << 2);
    pub(crate) const ALL: Self = Self(0b111);

    pub(crate) fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub(crate) fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Regions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Regions {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// One tab of the dashboard.
///
/// Draw methods assume the pane was erased beforehand. Key handling and ticks
/// report which panes need a redraw; the caller performs it.
pub(crate) trait View {
    fn title(&self) -> &'static str;

    /// Commands this view reacts to, with their help text.
    fn help(&self) -> &'static [(Command, &'static str)];

    fn draw_header(&mut self, pane: &mut Pane, backend: &dyn MediaBackend) -> BackendResult<()>;
    fn draw_main(&mut self, pane: &mut Pane, backend: &dyn MediaBackend) -> BackendResult<()>;
    fn draw_footer(&mut self, pane: &mut Pane, backend: &dyn MediaBackend) -> BackendResult<()>;

    fn handle_key(&mut self, command: Command, backend: &dyn MediaBackend) -> BackendResult<Regions>;

    /// Called when the tab becomes active, before its full redraw.
    fn activate(&mut self, _backend: &dyn MediaBackend) -> BackendResult<()> {
        Ok(())
    }

    /// Periodic refresh of backend state.
    fn tick(&mut self, backend: &dyn MediaBackend) -> BackendResult<Regions>;
}

/// Bold "ncXBMC vX -- Title" line with a rule underneath.
pub(crate) fn draw_title_bar(pane: &mut Pane, title: &str) {
    let text = format!("ncXBMC v{} -- {title}", env!("CARGO_PKG_VERSION"));
    pane.put_str(0, 0, &text, Style::default().add_modifier(Modifier::BOLD));
    pane.hline(1);
}
