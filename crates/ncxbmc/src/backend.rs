//! Media backend abstraction.
//!
//! Views talk to the media center only through [`MediaBackend`]; the production
//! implementation lives in `kodi_api`, tests use a scripted fake.

use thiserror::Error;
use xbmc_types::{Entry, MediaKind, NowPlaying, PlaylistKind, SystemInfo, TrackTags, Volume};

pub(crate) type BackendResult<T> = Result<T, BackendError>;

#[derive(Debug, Error)]
pub(crate) enum BackendError {
    /// The media center could not be reached.
    #[error("connection error: {0}")]
    Connectivity(String),
    /// The media center rejected the configured credentials.
    #[error("authentication rejected by media center")]
    Authentication,
    /// The media center answered with an error or an unreadable payload.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl BackendError {
    /// Errors that make the session unusable when seen at connect time.
    pub(crate) fn is_fatal_at_startup(&self) -> bool {
        matches!(self, Self::Connectivity(_) | Self::Authentication)
    }
}

/// Synchronous control surface of a remote media center.
///
/// Every call blocks until the media center answers.
pub(crate) trait MediaBackend {
    fn system_info(&self) -> BackendResult<SystemInfo>;

    /// Currently playing item, `None` when nothing plays.
    fn now_playing(&self) -> BackendResult<Option<NowPlaying>>;
    /// Ordered paths of the active playlist.
    fn playlist_paths(&self) -> BackendResult<Vec<String>>;
    fn tags_for_path(&self, path: &str) -> BackendResult<TrackTags>;

    fn volume(&self) -> BackendResult<Volume>;
    fn set_volume(&self, level: u8) -> BackendResult<()>;
    fn toggle_mute(&self) -> BackendResult<()>;

    /// Signed play speed, `1` when nothing plays.
    fn play_speed(&self) -> BackendResult<i32>;
    fn set_play_speed(&self, speed: i32) -> BackendResult<()>;
    fn toggle_pause(&self) -> BackendResult<()>;
    fn stop(&self) -> BackendResult<()>;

    fn play_entry_at(&self, index: usize) -> BackendResult<()>;
    fn remove_entry_at(&self, index: usize) -> BackendResult<()>;
    fn clear_playlist(&self, playlist: PlaylistKind) -> BackendResult<()>;
    fn add_to_playlist(&self, entry: &Entry, playlist: PlaylistKind) -> BackendResult<()>;
    fn set_active_playlist(&self, playlist: PlaylistKind) -> BackendResult<()>;

    /// Entries below `location`; `None` lists the media sources.
    fn list_directory(&self, media: MediaKind, location: Option<&str>) -> BackendResult<Vec<Entry>>;
}
