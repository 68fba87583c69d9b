//! In-memory media center and terminal for driving views and the engine.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use xbmc_types::{Entry, MediaKind, NowPlaying, PlaylistKind, SystemInfo, TrackTags, Volume};

use crate::backend::{BackendError, BackendResult, MediaBackend};

use super::surface::{Input, Screen, Surface};

#[derive(Debug)]
pub(crate) struct FakeState {
    pub(crate) playlist: Vec<String>,
    pub(crate) tags: HashMap<String, TrackTags>,
    pub(crate) now_playing: Option<NowPlaying>,
    pub(crate) volume: Volume,
    pub(crate) speed: i32,
    pub(crate) active_playlist: PlaylistKind,
    pub(crate) dirs: HashMap<Option<String>, Vec<Entry>>,
    pub(crate) added: Vec<(String, PlaylistKind)>,
    pub(crate) calls: Vec<String>,
    /// Next call fails with a connectivity error carrying this message.
    pub(crate) fail_next: Option<String>,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            playlist: Vec::new(),
            tags: HashMap::new(),
            now_playing: None,
            volume: Volume {
                level: 50,
                muted: false,
            },
            speed: 1,
            active_playlist: PlaylistKind::Music,
            dirs: HashMap::new(),
            added: Vec::new(),
            calls: Vec::new(),
            fail_next: None,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeBackend {
    pub(crate) state: RefCell<FakeState>,
}

impl FakeBackend {
    /// Playlist of `(path, artist, title)` rows, all tagged.
    pub(crate) fn with_playlist(rows: &[(&str, &str, &str)]) -> Self {
        let backend = Self::default();
        {
            let mut state = backend.state.borrow_mut();
            for (path, artist, title) in rows {
                state.playlist.push(path.to_string());
                state.tags.insert(
                    path.to_string(),
                    TrackTags {
                        artist: Some(artist.to_string()),
                        title: Some(title.to_string()),
                    },
                );
            }
        }
        backend
    }

    pub(crate) fn with_dir(self, location: Option<&str>, entries: Vec<Entry>) -> Self {
        self.state
            .borrow_mut()
            .dirs
            .insert(location.map(str::to_string), entries);
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    pub(crate) fn count(&self, call: &str) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|c| c.as_str() == call || c.starts_with(&format!("{call}(")))
            .count()
    }

    pub(crate) fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub(crate) fn fail_next(&self, message: &str) {
        self.state.borrow_mut().fail_next = Some(message.to_string());
    }

    pub(crate) fn play(&self, path: &str, changed: bool) {
        self.state.borrow_mut().now_playing = Some(NowPlaying {
            path: path.to_string(),
            artist: Some("Artist".to_string()),
            title: Some("Title".to_string()),
            elapsed_ms: 30_000,
            duration_ms: 120_000,
            percentage: 25.0,
            paused: false,
            speed: 1,
            changed,
        });
    }

    fn record(&self, call: String) -> BackendResult<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(call);
        match state.fail_next.take() {
            Some(message) => Err(BackendError::Connectivity(message)),
            None => Ok(()),
        }
    }
}

impl MediaBackend for FakeBackend {
    fn system_info(&self) -> BackendResult<SystemInfo> {
        self.record("system_info".into())?;
        Ok(SystemInfo {
            name: "Kodi".to_string(),
            version: "20.2".to_string(),
        })
    }

    fn now_playing(&self) -> BackendResult<Option<NowPlaying>> {
        self.record("now_playing".into())?;
        Ok(self.state.borrow().now_playing.clone())
    }

    fn playlist_paths(&self) -> BackendResult<Vec<String>> {
        self.record("playlist_paths".into())?;
        Ok(self.state.borrow().playlist.clone())
    }

    fn tags_for_path(&self, path: &str) -> BackendResult<TrackTags> {
        self.record(format!("tags_for_path({path})"))?;
        Ok(self.state.borrow().tags.get(path).cloned().unwrap_or_default())
    }

    fn volume(&self) -> BackendResult<Volume> {
        self.record("volume".into())?;
        Ok(self.state.borrow().volume)
    }

    fn set_volume(&self, level: u8) -> BackendResult<()> {
        self.record(format!("set_volume({level})"))?;
        self.state.borrow_mut().volume.level = level;
        Ok(())
    }

    fn toggle_mute(&self) -> BackendResult<()> {
        self.record("toggle_mute".into())?;
        let mut state = self.state.borrow_mut();
        state.volume.muted = !state.volume.muted;
        Ok(())
    }

    fn play_speed(&self) -> BackendResult<i32> {
        self.record("play_speed".into())?;
        Ok(self.state.borrow().speed)
    }

    fn set_play_speed(&self, speed: i32) -> BackendResult<()> {
        self.record(format!("set_play_speed({speed})"))?;
        self.state.borrow_mut().speed = speed;
        Ok(())
    }

    fn toggle_pause(&self) -> BackendResult<()> {
        self.record("toggle_pause".into())?;
        Ok(())
    }

    fn stop(&self) -> BackendResult<()> {
        self.record("stop".into())?;
        self.state.borrow_mut().now_playing = None;
        Ok(())
    }

    fn play_entry_at(&self, index: usize) -> BackendResult<()> {
        self.record(format!("play_entry_at({index})"))?;
        Ok(())
    }

    fn remove_entry_at(&self, index: usize) -> BackendResult<()> {
        self.record(format!("remove_entry_at({index})"))?;
        let mut state = self.state.borrow_mut();
        if index < state.playlist.len() {
            state.playlist.remove(index);
        }
        Ok(())
    }

    fn clear_playlist(&self, playlist: PlaylistKind) -> BackendResult<()> {
        self.record(format!("clear_playlist({playlist:?})"))?;
        self.state.borrow_mut().playlist.clear();
        Ok(())
    }

    fn add_to_playlist(&self, entry: &Entry, playlist: PlaylistKind) -> BackendResult<()> {
        self.record(format!("add_to_playlist({})", entry.path))?;
        self.state
            .borrow_mut()
            .added
            .push((entry.path.clone(), playlist));
        Ok(())
    }

    fn set_active_playlist(&self, playlist: PlaylistKind) -> BackendResult<()> {
        self.record(format!("set_active_playlist({playlist:?})"))?;
        self.state.borrow_mut().active_playlist = playlist;
        Ok(())
    }

    fn list_directory(&self, media: MediaKind, location: Option<&str>) -> BackendResult<Vec<Entry>> {
        self.record(format!(
            "list_directory({}, {})",
            media.as_str(),
            location.unwrap_or("<root>")
        ))?;
        let state = self.state.borrow();
        Ok(state
            .dirs
            .get(&location.map(str::to_string))
            .cloned()
            .unwrap_or_default())
    }
}

/// Terminal replaying a fixed input script; `Esc` once the script runs out.
pub(crate) struct ScriptedSurface {
    width: u16,
    height: u16,
    script: VecDeque<Option<Input>>,
    pub(crate) presented: usize,
    pub(crate) last_frame: Option<Screen>,
}

impl ScriptedSurface {
    pub(crate) fn new(width: u16, height: u16, script: Vec<Option<Input>>) -> Self {
        Self {
            width,
            height,
            script: script.into(),
            presented: 0,
            last_frame: None,
        }
    }
}

impl Surface for ScriptedSurface {
    fn size(&self) -> Result<(u16, u16)> {
        Ok((self.width, self.height))
    }

    fn poll_input(&mut self) -> Result<Option<Input>> {
        Ok(self
            .script
            .pop_front()
            .unwrap_or_else(|| Some(key(KeyCode::Esc))))
    }

    fn present(&mut self, screen: &Screen) -> Result<()> {
        self.presented += 1;
        self.last_frame = Some(screen.clone());
        Ok(())
    }
}

pub(crate) fn key(code: KeyCode) -> Input {
    Input::Key(KeyEvent::new(code, KeyModifiers::NONE))
}
