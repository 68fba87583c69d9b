use serde::{Deserialize, Serialize};

/// Kind of a listable library item.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// A playable file.
    Track,
    /// A directory or media source that can be browsed into.
    Directory,
}

/// One item of a playlist or directory listing.
///
/// Entries are immutable once fetched; views replace their whole list on refresh.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entry {
    /// Backend identifier (file path, directory path or source URL).
    pub path: String,
    /// Display name as reported by the backend.
    pub name: String,
    /// Track artist, if the backend knows it.
    pub artist: Option<String>,
    /// Track title, if the backend knows it.
    pub title: Option<String>,
    pub kind: EntryKind,
}

impl Entry {
    /// Build a directory entry.
    pub fn directory(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            artist: None,
            title: None,
            kind: EntryKind::Directory,
        }
    }

    /// Build a track entry from a path and optional tags.
    pub fn track(path: impl Into<String>, name: impl Into<String>, tags: TrackTags) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            artist: tags.artist,
            title: tags.title,
            kind: EntryKind::Track,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Tags resolved for a single track path. Missing fields stay `None`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackTags {
    pub artist: Option<String>,
    pub title: Option<String>,
}

/// Snapshot of the item currently playing on the media center.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct NowPlaying {
    /// Path of the playing item; matched against playlist entry paths.
    pub path: String,
    pub artist: Option<String>,
    pub title: Option<String>,
    /// Elapsed playback time in milliseconds.
    pub elapsed_ms: u64,
    /// Total media duration in milliseconds.
    pub duration_ms: u64,
    /// Progress in percent, `0.0..=100.0`.
    pub percentage: f64,
    /// `true` when playback is paused.
    pub paused: bool,
    /// Signed play speed; `1` is normal, negative is reverse.
    pub speed: i32,
    /// `true` when the playing item differs from the previous poll.
    pub changed: bool,
}

/// Output volume of the media center.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Volume {
    /// Level in percent, `0..=100`.
    pub level: u8,
    pub muted: bool,
}

impl Volume {
    /// Muted or silent volumes are displayed as "muted".
    pub fn is_silent(&self) -> bool {
        self.muted || self.level == 0
    }
}

/// Playlist selector on the media center.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlaylistKind {
    #[default]
    Music,
    Video,
}

impl PlaylistKind {
    /// Numeric playlist id used by the JSON-RPC API.
    pub fn id(self) -> u8 {
        match self {
            Self::Music => 0,
            Self::Video => 1,
        }
    }
}

/// Library section a directory listing is requested for.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    #[default]
    Music,
    Video,
}

impl MediaKind {
    /// Media name used by the JSON-RPC API.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Music => "music",
            Self::Video => "video",
        }
    }

    /// Playlist that items of this media kind are queued on.
    pub fn playlist(self) -> PlaylistKind {
        match self {
            Self::Music => PlaylistKind::Music,
            Self::Video => PlaylistKind::Video,
        }
    }
}

/// Name and version reported by the media center at connect time.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SystemInfo {
    pub name: String,
    pub version: String,
}
