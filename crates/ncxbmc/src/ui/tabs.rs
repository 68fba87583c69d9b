//! Tab rotation and command routing.

use crate::backend::{BackendResult, MediaBackend};

use super::keys::{Command, KeyMap};
use super::surface::{HelpOverlay, Screen};
use super::view::{Regions, View};

/// Commands handled here rather than by the views.
const COMMON_HELP: &[(Command, &str)] = &[
    (Command::NextTab, "switch to the next tab"),
    (Command::Help, "show this help"),
    (Command::Quit, "quit"),
];

pub(crate) struct TabController {
    views: Vec<Box<dyn View>>,
    active: usize,
}

impl TabController {
    pub(crate) fn new(views: Vec<Box<dyn View>>) -> Self {
        Self { views, active: 0 }
    }

    #[cfg(test)]
    pub(crate) fn active(&self) -> usize {
        self.active
    }

    pub(crate) fn active_title(&self) -> &'static str {
        self.views.get(self.active).map_or("", |view| view.title())
    }

    /// Switch to the next view and draw it from scratch.
    pub(crate) fn rotate(&mut self, backend: &dyn MediaBackend, screen: &mut Screen) -> BackendResult<()> {
        if self.views.is_empty() {
            return Ok(());
        }
        self.active = (self.active + 1) % self.views.len();
        tracing::debug!(tab = self.active_title(), "switch tab");
        if let Some(view) = self.views.get_mut(self.active) {
            view.activate(backend)?;
        }
        self.redraw(Regions::ALL, backend, screen)
    }

    /// Route one command and redraw what it touched. Returns the redrawn regions.
    pub(crate) fn dispatch(
        &mut self,
        command: Command,
        backend: &dyn MediaBackend,
        screen: &mut Screen,
        keymap: &KeyMap,
    ) -> BackendResult<Regions> {
        match command {
            Command::NextTab => {
                self.rotate(backend, screen)?;
                Ok(Regions::ALL)
            }
            Command::Help => {
                screen.help = Some(self.help_overlay(keymap));
                Ok(Regions::NONE)
            }
            command => {
                let Some(view) = self.views.get_mut(self.active) else {
                    return Ok(Regions::NONE);
                };
                let regions = view.handle_key(command, backend)?;
                self.redraw(regions, backend, screen)?;
                Ok(regions)
            }
        }
    }

    /// Erase and redraw the given panes of the active view.
    pub(crate) fn redraw(
        &mut self,
        regions: Regions,
        backend: &dyn MediaBackend,
        screen: &mut Screen,
    ) -> BackendResult<()> {
        let Some(view) = self.views.get_mut(self.active) else {
            return Ok(());
        };
        if regions.contains(Regions::HEADER) {
            screen.header.erase();
            view.draw_header(&mut screen.header, backend)?;
        }
        if regions.contains(Regions::MAIN) {
            screen.main.erase();
            view.draw_main(&mut screen.main, backend)?;
        }
        if regions.contains(Regions::FOOTER) {
            screen.footer.erase();
            view.draw_footer(&mut screen.footer, backend)?;
        }
        Ok(())
    }

    /// Periodic refresh of the active view. Returns the redrawn regions.
    pub(crate) fn tick(&mut self, backend: &dyn MediaBackend, screen: &mut Screen) -> BackendResult<Regions> {
        let Some(view) = self.views.get_mut(self.active) else {
            return Ok(Regions::NONE);
        };
        let regions = view.tick(backend)?;
        self.redraw(regions, backend, screen)?;
        Ok(regions)
    }

    fn help_overlay(&self, keymap: &KeyMap) -> HelpOverlay {
        let view_help = self.views.get(self.active).map_or(&[][..], |view| view.help());
        let lines = view_help
            .iter()
            .chain(COMMON_HELP)
            .map(|(command, text)| (keymap.label(*command), (*text).to_string()))
            .collect();
        HelpOverlay {
            title: format!("Help: {}", self.active_title()),
            lines,
        }
    }
}
