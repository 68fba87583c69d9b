//! Playlist tab: the active playlist, transport controls and volume.

use ratatui::style::{Color, Modifier, Style};
use xbmc_types::{Entry, MediaKind, NowPlaying};

use crate::backend::{BackendResult, MediaBackend};

use super::keys::Command;
use super::list::ScrollableList;
use super::surface::Pane;
use super::view::{Regions, View, draw_title_bar};

/// Fastest forward or reverse play speed the media center accepts.
const SPEED_LIMIT: i32 = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SpeedStep {
    Faster,
    Slower,
}

/// Next play speed one step faster or slower, `None` at the limit or while
/// paused.
pub(crate) fn next_speed(current: i32, step: SpeedStep) -> Option<i32> {
    match step {
        SpeedStep::Faster if current != 0 && current < SPEED_LIMIT => {
            let next = if current < 0 { current / 2 } else { current * 2 };
            Some(if next == -1 || next == 0 { 1 } else { next })
        }
        SpeedStep::Slower if current != 0 && current > -SPEED_LIMIT => {
            let next = if current > 0 { current / 2 } else { current * 2 };
            Some(if next == 0 { -2 } else { next })
        }
        _ => None,
    }
}

const HELP: &[(Command, &str)] = &[
    (Command::Up, "select previous entry"),
    (Command::Down, "select next entry"),
    (Command::Enter, "play selected entry (back to normal speed first)"),
    (Command::Remove, "remove selected entry"),
    (Command::Clear, "stop and clear the playlist"),
    (Command::Pause, "pause / resume"),
    (Command::FastForward, "fast forward"),
    (Command::Rewind, "rewind"),
    (Command::Mute, "toggle mute"),
    (Command::VolumeUp, "volume up"),
    (Command::VolumeDown, "volume down"),
];

#[derive(Debug)]
pub(crate) struct PlaylistView {
    list: ScrollableList,
    entries: Vec<Entry>,
    /// Playlist paths the entries were built from; `None` until first fetched.
    snapshot: Option<Vec<String>>,
    now_playing: Option<NowPlaying>,
    polled: bool,
    /// Selection applied the next time the playlist changes.
    force_select: usize,
    /// Skip the playlist fetch on the next tick.
    fast_refresh: bool,
    media: MediaKind,
}

impl PlaylistView {
    pub(crate) fn new(media: MediaKind) -> Self {
        Self {
            list: ScrollableList::default(),
            entries: Vec::new(),
            snapshot: None,
            now_playing: None,
            polled: false,
            force_select: 0,
            fast_refresh: false,
            media,
        }
    }

    /// Entries worth drawing. A lone entry without artist is drawn as the
    /// media center's empty-playlist placeholder; keys still act on it.
    fn rows(&self) -> &[Entry] {
        match self.entries.as_slice() {
            [only] if only.artist.is_none() => &[],
            rows => rows,
        }
    }

    /// Refetch the playlist and rebuild entries when it differs from the cached
    /// snapshot. Returns whether it did.
    fn refresh_playlist(&mut self, backend: &dyn MediaBackend) -> BackendResult<bool> {
        let paths = backend.playlist_paths()?;
        if self.snapshot.as_ref() == Some(&paths) {
            return Ok(false);
        }
        let mut entries = Vec::with_capacity(paths.len());
        for path in &paths {
            let tags = backend.tags_for_path(path)?;
            entries.push(Entry::track(path.clone(), path.clone(), tags));
        }
        tracing::debug!(entries = entries.len(), "playlist changed");
        self.entries = entries;
        self.snapshot = Some(paths);
        self.list.reset_to(self.force_select, self.entries.len());
        self.force_select = 0;
        Ok(true)
    }

    fn poll_now_playing(&mut self, backend: &dyn MediaBackend) -> BackendResult<Regions> {
        let current = backend.now_playing()?;
        let mut regions = Regions::FOOTER;
        let stopped = self.now_playing.is_some() && current.is_none();
        if stopped || current.as_ref().is_some_and(|np| np.changed) {
            regions |= Regions::MAIN;
        }
        self.now_playing = current;
        self.polled = true;
        Ok(regions)
    }

    fn step_speed(&mut self, step: SpeedStep, backend: &dyn MediaBackend) -> BackendResult<Regions> {
        let current = backend.play_speed()?;
        let Some(next) = next_speed(current, step) else {
            return Ok(Regions::NONE);
        };
        backend.set_play_speed(next)?;
        if let Some(np) = self.now_playing.as_mut() {
            np.speed = next;
        }
        Ok(Regions::FOOTER)
    }

    fn change_volume(&mut self, up: bool, backend: &dyn MediaBackend) -> BackendResult<Regions> {
        let volume = backend.volume()?;
        let level = if up {
            volume.level.saturating_add(1).min(100)
        } else {
            volume.level.saturating_sub(1)
        };
        backend.set_volume(level)?;
        Ok(Regions::HEADER)
    }
}

impl View for PlaylistView {
    fn title(&self) -> &'static str {
        "Playlist"
    }

    fn help(&self) -> &'static [(Command, &'static str)] {
        HELP
    }

    fn draw_header(&mut self, pane: &mut Pane, backend: &dyn MediaBackend) -> BackendResult<()> {
        draw_title_bar(pane, self.title());
        let volume = backend.volume()?;
        let label = if volume.is_silent() {
            "Volume Muted".to_string()
        } else {
            format!("Volume {}%", volume.level)
        };
        pane.put_str_right(0, &label, Style::default());
        Ok(())
    }

    fn draw_main(&mut self, pane: &mut Pane, backend: &dyn MediaBackend) -> BackendResult<()> {
        if self.snapshot.is_none() {
            self.refresh_playlist(backend)?;
        }
        self.list.set_viewport(usize::from(pane.height()));
        self.list.reconcile_scroll();

        let playing = self.now_playing.as_ref().map(|np| np.path.as_str());
        let selected = self.list.selected();
        for (row, (index, entry)) in self.list.visible_slice(self.rows()).into_iter().enumerate() {
            let Ok(row) = u16::try_from(row) else {
                break;
            };
            let mut style = Style::default();
            if Some(entry.path.as_str()) == playing {
                style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
            }
            if index == selected {
                style = style.add_modifier(Modifier::REVERSED);
                pane.style_row(row, style);
            }
            let label = format!(
                "{} - {}",
                entry.artist.as_deref().unwrap_or_default(),
                entry.title.as_deref().unwrap_or_default()
            );
            pane.put_str(row, 0, &label, style);
        }
        Ok(())
    }

    fn draw_footer(&mut self, pane: &mut Pane, backend: &dyn MediaBackend) -> BackendResult<()> {
        if !self.polled {
            self.poll_now_playing(backend)?;
        }
        let Some(np) = self.now_playing.as_ref() else {
            pane.put_str(1, 0, "Stopped", Style::default());
            return Ok(());
        };

        let marker = speed_marker(np.speed);
        let room = usize::from(pane.width()).saturating_sub(marker.len());
        let filled = ((np.percentage / 100.0) * room as f64).round() as usize;
        let filled = filled.min(room);
        pane.put_str(0, 0, &"=".repeat(filled), Style::default());
        pane.put_str(
            0,
            u16::try_from(filled).unwrap_or(u16::MAX),
            marker,
            Style::default().add_modifier(Modifier::BOLD),
        );
        if np.speed != 1 {
            pane.put_str_right(0, &format!("({}X)", np.speed), Style::default());
        }

        let mut playing = format!(
            "Playing: {} - {}",
            np.artist.as_deref().unwrap_or_default(),
            np.title.as_deref().unwrap_or_default()
        );
        if np.paused {
            playing.push_str(" (Pause)");
        }
        pane.put_str(1, 0, &playing, Style::default());
        let time = format!(
            "[{}/{}]",
            format_duration_ms(np.elapsed_ms),
            format_duration_ms(np.duration_ms)
        );
        pane.put_str_right(1, &time, Style::default());
        Ok(())
    }

    fn handle_key(&mut self, command: Command, backend: &dyn MediaBackend) -> BackendResult<Regions> {
        match command {
            Command::Up | Command::Down => {
                let delta = if command == Command::Up { -1 } else { 1 };
                self.list.move_selection(delta, self.entries.len());
                self.fast_refresh = true;
                Ok(Regions::MAIN)
            }
            Command::Enter => {
                if backend.play_speed()? != 1 {
                    backend.set_play_speed(1)?;
                } else if !self.entries.is_empty() {
                    backend.play_entry_at(self.list.selected())?;
                }
                Ok(Regions::MAIN | Regions::FOOTER)
            }
            Command::Remove => {
                let count = self.entries.len();
                if count == 0 {
                    return Ok(Regions::NONE);
                }
                let selected = self.list.selected();
                backend.remove_entry_at(selected)?;
                self.force_select = if selected >= count - 1 {
                    selected.saturating_sub(1)
                } else {
                    selected
                };
                self.refresh_playlist(backend)?;
                Ok(Regions::MAIN)
            }
            Command::Clear => {
                backend.stop()?;
                backend.clear_playlist(self.media.playlist())?;
                self.list.reset_to(0, 0);
                self.refresh_playlist(backend)?;
                Ok(Regions::MAIN | Regions::FOOTER)
            }
            Command::FastForward => self.step_speed(SpeedStep::Faster, backend),
            Command::Rewind => self.step_speed(SpeedStep::Slower, backend),
            Command::VolumeUp => self.change_volume(true, backend),
            Command::VolumeDown => self.change_volume(false, backend),
            Command::Mute => {
                backend.toggle_mute()?;
                Ok(Regions::HEADER)
            }
            Command::Pause => {
                backend.toggle_pause()?;
                if let Some(np) = self.now_playing.as_mut() {
                    np.paused = !np.paused;
                }
                Ok(Regions::FOOTER)
            }
            _ => Ok(Regions::NONE),
        }
    }

    fn activate(&mut self, backend: &dyn MediaBackend) -> BackendResult<()> {
        self.refresh_playlist(backend)?;
        Ok(())
    }

    fn tick(&mut self, backend: &dyn MediaBackend) -> BackendResult<Regions> {
        let mut regions = self.poll_now_playing(backend)?;
        if std::mem::take(&mut self.fast_refresh) {
            return Ok(regions);
        }
        if self.refresh_playlist(backend)? {
            regions |= Regions::MAIN;
        }
        Ok(regions)
    }
}

fn speed_marker(speed: i32) -> &'static str {
    match speed {
        s if s > 1 => ">>",
        s if s < 0 => "<<",
        _ => "0",
    }
}

fn format_duration_ms(ms: u64) -> String {
    let total_secs = ms / 1000;
    let hours = total_secs / 3600;
    let mins = (total_secs / 60) % 60;
    let secs = total_secs % 60;
    if hours > 0 {
        format!("{hours}:{mins:02}:{secs:02}")
    } else {
        format!("{mins}:{secs:02}")
    }
}
