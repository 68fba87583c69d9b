//! The cooperative refresh loop.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossbeam_channel::Receiver;

use crate::backend::{BackendError, MediaBackend};

use super::keys::{Command, KeyMap};
use super::surface::{Input, Screen, Surface};
use super::tabs::TabController;
use super::view::Regions;

/// How often the loop wakes up and how often the active view re-polls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RefreshTiming {
    pub(crate) quantum: Duration,
    pub(crate) period: Duration,
}

impl Default for RefreshTiming {
    fn default() -> Self {
        Self {
            quantum: Duration::from_millis(10),
            period: Duration::from_secs(1),
        }
    }
}

/// Accumulates loop time and fires once per refresh period.
#[derive(Debug)]
pub(crate) struct RefreshScheduler {
    period: Duration,
    elapsed: Duration,
}

impl RefreshScheduler {
    pub(crate) fn new(period: Duration) -> Self {
        Self {
            period,
            elapsed: Duration::ZERO,
        }
    }

    /// Add `dt` and report whether a tick is due; firing resets the accumulator.
    pub(crate) fn advance(&mut self, dt: Duration) -> bool {
        self.elapsed += dt;
        if self.elapsed >= self.period {
            self.elapsed = Duration::ZERO;
            true
        } else {
            false
        }
    }
}

pub(crate) struct Engine<S: Surface> {
    surface: S,
    backend: Box<dyn MediaBackend>,
    tabs: TabController,
    screen: Screen,
    scheduler: RefreshScheduler,
    quantum: Duration,
    keymap: KeyMap,
    log_rx: Receiver<String>,
}

impl<S: Surface> Engine<S> {
    pub(crate) fn new(
        surface: S,
        backend: Box<dyn MediaBackend>,
        tabs: TabController,
        keymap: KeyMap,
        timing: RefreshTiming,
        log_rx: Receiver<String>,
    ) -> Result<Self> {
        let (width, height) = surface.size()?;
        Ok(Self {
            surface,
            backend,
            tabs,
            screen: Screen::new(width, height),
            scheduler: RefreshScheduler::new(timing.period),
            quantum: timing.quantum,
            keymap,
            log_rx,
        })
    }

    pub(crate) fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Run until the quit key. Backend failures are reported on the status line;
    /// only terminal errors end the loop early.
    pub(crate) fn run(&mut self) -> Result<()> {
        self.redraw_all();
        self.surface.present(&self.screen)?;
        let mut last = Instant::now();

        loop {
            let mut dirty = self.drain_logs();

            match self.surface.poll_input()? {
                Some(Input::Resize(width, height)) => {
                    self.screen.resize(width, height);
                    self.redraw_all();
                    dirty = true;
                }
                Some(Input::Key(key)) => {
                    if self.screen.help.take().is_some() {
                        dirty = true;
                    } else {
                        match self.keymap.resolve(key) {
                            Some(Command::Quit) => break,
                            Some(command) => {
                                let result = self.tabs.dispatch(
                                    command,
                                    self.backend.as_ref(),
                                    &mut self.screen,
                                    &self.keymap,
                                );
                                if let Err(e) = result {
                                    self.report(e);
                                }
                                dirty = true;
                            }
                            None => {}
                        }
                    }
                }
                None => {}
            }

            let now = Instant::now();
            if self.scheduler.advance(now - last) {
                match self.tabs.tick(self.backend.as_ref(), &mut self.screen) {
                    Ok(regions) => dirty |= !regions.is_empty(),
                    Err(e) => {
                        self.report(e);
                        dirty = true;
                    }
                }
            }
            last = now;

            if dirty {
                self.surface.present(&self.screen)?;
            }
            std::thread::sleep(self.quantum);
        }
        Ok(())
    }

    fn redraw_all(&mut self) {
        if let Err(e) = self
            .tabs
            .redraw(Regions::ALL, self.backend.as_ref(), &mut self.screen)
        {
            self.report(e);
        }
    }

    fn report(&mut self, err: BackendError) {
        tracing::warn!(error = %err, tab = self.tabs.active_title(), "media center request failed");
        self.screen.status = format!("error: {err}");
    }

    fn drain_logs(&mut self) -> bool {
        let mut changed = false;
        while let Ok(line) = self.log_rx.try_recv() {
            self.screen.status = line;
            changed = true;
        }
        changed
    }
}
