//! XBMC/Kodi JSON-RPC client.
//!
//! Every call is a blocking `POST /jsonrpc`; there is no request timeout, so a
//! hung media center blocks the caller until it answers.

use std::cell::{Cell, RefCell};

use base64::Engine as _;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};
use xbmc_types::{Entry, MediaKind, NowPlaying, PlaylistKind, SystemInfo, TrackTags, Volume};

use crate::backend::{BackendError, BackendResult, MediaBackend};

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

impl<T> RpcResponse<T> {
    fn into_result(self, method: &str) -> BackendResult<T> {
        if let Some(err) = self.error {
            return Err(BackendError::Protocol(format!(
                "{method}: {} (code {})",
                err.message, err.code
            )));
        }
        self.result
            .ok_or_else(|| BackendError::Protocol(format!("{method}: response has no result")))
    }
}

#[derive(Clone, Debug, Deserialize)]
struct ActivePlayer {
    playerid: u32,
    #[serde(rename = "type", default)]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct PlayerItemResponse {
    item: MediaItem,
}

/// Item shape shared by `Player.GetItem`, `Playlist.GetItems`,
/// `Files.GetFileDetails` and `Files.GetDirectory`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MediaItem {
    file: String,
    label: String,
    title: Option<String>,
    artist: Vec<String>,
    filetype: Option<String>,
}

impl MediaItem {
    fn tags(&self) -> TrackTags {
        let artist = self.artist.join(", ");
        TrackTags {
            artist: non_empty(Some(artist)),
            title: non_empty(self.title.clone()).or_else(|| non_empty(Some(self.label.clone()))),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PlayerProperties {
    time: RpcTime,
    totaltime: RpcTime,
    percentage: f64,
    speed: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RpcTime {
    hours: u64,
    minutes: u64,
    seconds: u64,
    milliseconds: u64,
}

impl RpcTime {
    fn as_ms(&self) -> u64 {
        ((self.hours * 60 + self.minutes) * 60 + self.seconds) * 1000 + self.milliseconds
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PlaylistItems {
    items: Vec<MediaItem>,
}

#[derive(Debug, Deserialize)]
struct FileDetailsResponse {
    filedetails: MediaItem,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SourcesResponse {
    sources: Vec<MediaItem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DirectoryResponse {
    files: Vec<MediaItem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApplicationProperties {
    volume: i64,
    muted: bool,
    name: String,
    version: AppVersion,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AppVersion {
    major: u32,
    minor: u32,
    tag: String,
}

/// [`MediaBackend`] speaking the XBMC/Kodi JSON-RPC API over HTTP.
pub(crate) struct KodiClient {
    agent: ureq::Agent,
    url: String,
    auth: Option<String>,
    next_id: Cell<u64>,
    active_playlist: Cell<PlaylistKind>,
    last_playing: RefCell<Option<String>>,
}

impl KodiClient {
    pub(crate) fn new(host: &str, port: u16, user: Option<&str>, password: Option<&str>) -> Self {
        let auth = user.map(|user| {
            let raw = format!("{user}:{}", password.unwrap_or_default());
            format!(
                "Basic {}",
                base64::engine::general_purpose::STANDARD.encode(raw)
            )
        });
        Self {
            agent: ureq::Agent::new_with_defaults(),
            url: format!("http://{host}:{port}/jsonrpc"),
            auth,
            next_id: Cell::new(1),
            active_playlist: Cell::new(PlaylistKind::Music),
            last_playing: RefCell::new(None),
        }
    }

    pub(crate) fn url(&self) -> &str {
        &self.url
    }

    fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> BackendResult<T> {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));
        let body = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": id,
        });
        tracing::debug!(method, id, "json-rpc call");

        let mut req = self.agent.post(&self.url);
        if let Some(auth) = self.auth.as_deref() {
            req = req.header("Authorization", auth);
        }
        let resp = req
            .send_json(&body)
            .map_err(|e| transport_error(method, e))?;
        let envelope: RpcResponse<T> = read_json(resp, method)?;
        envelope.into_result(method)
    }

    fn active_player(&self) -> BackendResult<Option<u32>> {
        let players: Vec<ActivePlayer> = self.call("Player.GetActivePlayers", json!({}))?;
        Ok(pick_player(&players))
    }

    fn player_properties(&self, player: u32) -> BackendResult<PlayerProperties> {
        self.call(
            "Player.GetProperties",
            json!({
                "playerid": player,
                "properties": ["time", "totaltime", "percentage", "speed"],
            }),
        )
    }

    fn application_properties(&self, properties: &[&str]) -> BackendResult<ApplicationProperties> {
        self.call("Application.GetProperties", json!({ "properties": properties }))
    }
}

impl MediaBackend for KodiClient {
    fn system_info(&self) -> BackendResult<SystemInfo> {
        let props = self.application_properties(&["name", "version"])?;
        Ok(system_info_from(props))
    }

    fn now_playing(&self) -> BackendResult<Option<NowPlaying>> {
        let Some(player) = self.active_player()? else {
            self.last_playing.replace(None);
            return Ok(None);
        };
        let item: PlayerItemResponse = self.call(
            "Player.GetItem",
            json!({ "playerid": player, "properties": ["title", "artist", "file"] }),
        )?;
        let props = self.player_properties(player)?;
        let changed = self.last_playing.borrow().as_deref() != Some(item.item.file.as_str());
        self.last_playing.replace(Some(item.item.file.clone()));
        Ok(Some(now_playing_from(item.item, props, changed)))
    }

    fn playlist_paths(&self) -> BackendResult<Vec<String>> {
        let items: PlaylistItems = self.call(
            "Playlist.GetItems",
            json!({
                "playlistid": self.active_playlist.get().id(),
                "properties": ["file"],
            }),
        )?;
        Ok(items.items.into_iter().map(|item| item.file).collect())
    }

    fn tags_for_path(&self, path: &str) -> BackendResult<TrackTags> {
        let resp: BackendResult<FileDetailsResponse> = self.call(
            "Files.GetFileDetails",
            json!({ "file": path, "media": "music", "properties": ["title", "artist"] }),
        );
        match resp {
            Ok(details) => Ok(details.filedetails.tags()),
            // Files outside the library have no details; show the file name instead.
            Err(BackendError::Protocol(reason)) => {
                tracing::debug!(path, %reason, "no tags for path");
                Ok(TrackTags {
                    artist: None,
                    title: non_empty(Some(file_name(path).to_string())),
                })
            }
            Err(e) => Err(e),
        }
    }

    fn volume(&self) -> BackendResult<Volume> {
        let props = self.application_properties(&["volume", "muted"])?;
        Ok(Volume {
            level: props.volume.clamp(0, 100) as u8,
            muted: props.muted,
        })
    }

    fn set_volume(&self, level: u8) -> BackendResult<()> {
        let _: Value = self.call("Application.SetVolume", json!({ "volume": level.min(100) }))?;
        Ok(())
    }

    fn toggle_mute(&self) -> BackendResult<()> {
        let _: Value = self.call("Application.SetMute", json!({ "mute": "toggle" }))?;
        Ok(())
    }

    fn play_speed(&self) -> BackendResult<i32> {
        match self.active_player()? {
            Some(player) => Ok(self.player_properties(player)?.speed),
            None => Ok(1),
        }
    }

    fn set_play_speed(&self, speed: i32) -> BackendResult<()> {
        let Some(player) = self.active_player()? else {
            return Ok(());
        };
        let _: Value = self.call(
            "Player.SetSpeed",
            json!({ "playerid": player, "speed": speed }),
        )?;
        Ok(())
    }

    fn toggle_pause(&self) -> BackendResult<()> {
        let Some(player) = self.active_player()? else {
            return Ok(());
        };
        let _: Value = self.call("Player.PlayPause", json!({ "playerid": player }))?;
        Ok(())
    }

    fn stop(&self) -> BackendResult<()> {
        let Some(player) = self.active_player()? else {
            return Ok(());
        };
        let _: Value = self.call("Player.Stop", json!({ "playerid": player }))?;
        Ok(())
    }

    fn play_entry_at(&self, index: usize) -> BackendResult<()> {
        let _: Value = self.call(
            "Player.Open",
            json!({
                "item": {
                    "playlistid": self.active_playlist.get().id(),
                    "position": index,
                }
            }),
        )?;
        Ok(())
    }

    fn remove_entry_at(&self, index: usize) -> BackendResult<()> {
        let _: Value = self.call(
            "Playlist.Remove",
            json!({
                "playlistid": self.active_playlist.get().id(),
                "position": index,
            }),
        )?;
        Ok(())
    }

    fn clear_playlist(&self, playlist: PlaylistKind) -> BackendResult<()> {
        let _: Value = self.call("Playlist.Clear", json!({ "playlistid": playlist.id() }))?;
        Ok(())
    }

    fn add_to_playlist(&self, entry: &Entry, playlist: PlaylistKind) -> BackendResult<()> {
        let _: Value = self.call(
            "Playlist.Add",
            json!({ "playlistid": playlist.id(), "item": playlist_item(entry) }),
        )?;
        Ok(())
    }

    fn set_active_playlist(&self, playlist: PlaylistKind) -> BackendResult<()> {
        self.active_playlist.set(playlist);
        Ok(())
    }

    fn list_directory(&self, media: MediaKind, location: Option<&str>) -> BackendResult<Vec<Entry>> {
        match location {
            None => {
                let resp: SourcesResponse =
                    self.call("Files.GetSources", json!({ "media": media.as_str() }))?;
                Ok(resp
                    .sources
                    .into_iter()
                    .map(|source| Entry::directory(source.file, source.label))
                    .collect())
            }
            Some(dir) => {
                let resp: DirectoryResponse = self.call(
                    "Files.GetDirectory",
                    json!({
                        "directory": dir,
                        "media": media.as_str(),
                        "properties": ["title", "artist"],
                    }),
                )?;
                Ok(entries_from_directory(resp.files))
            }
        }
    }
}

fn transport_error(method: &str, err: ureq::Error) -> BackendError {
    match err {
        ureq::Error::StatusCode(401 | 403) => BackendError::Authentication,
        ureq::Error::StatusCode(code) => BackendError::Protocol(format!("{method}: HTTP {code}")),
        other => BackendError::Connectivity(format!("{method}: {other}")),
    }
}

fn read_json<T: DeserializeOwned>(
    mut resp: ureq::http::Response<ureq::Body>,
    method: &str,
) -> BackendResult<T> {
    let body = resp
        .body_mut()
        .read_to_string()
        .map_err(|e| BackendError::Connectivity(format!("read {method} response body: {e}")))?;
    serde_json::from_str(&body)
        .map_err(|e| BackendError::Protocol(format!("decode {method} response: {e}")))
}

fn pick_player(players: &[ActivePlayer]) -> Option<u32> {
    players
        .iter()
        .find(|p| p.kind == "audio")
        .or_else(|| players.first())
        .map(|p| p.playerid)
}

fn now_playing_from(item: MediaItem, props: PlayerProperties, changed: bool) -> NowPlaying {
    let tags = item.tags();
    NowPlaying {
        path: item.file,
        artist: tags.artist,
        title: tags.title,
        elapsed_ms: props.time.as_ms(),
        duration_ms: props.totaltime.as_ms(),
        percentage: props.percentage.clamp(0.0, 100.0),
        paused: props.speed == 0,
        speed: props.speed,
        changed,
    }
}

fn entries_from_directory(files: Vec<MediaItem>) -> Vec<Entry> {
    files
        .into_iter()
        .map(|item| {
            if item.filetype.as_deref() == Some("directory") {
                Entry::directory(item.file, item.label)
            } else {
                let tags = item.tags();
                Entry::track(item.file, item.label, tags)
            }
        })
        .collect()
}

fn playlist_item(entry: &Entry) -> Value {
    if entry.is_dir() {
        json!({ "directory": entry.path })
    } else {
        json!({ "file": entry.path })
    }
}

fn system_info_from(props: ApplicationProperties) -> SystemInfo {
    let mut version = format!("{}.{}", props.version.major, props.version.minor);
    if !props.version.tag.is_empty() && props.version.tag != "stable" {
        version.push('-');
        version.push_str(&props.version.tag);
    }
    SystemInfo {
        name: props.name,
        version,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn file_name(path: &str) -> &str {
    path.trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(path)
}
