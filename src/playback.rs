//! Spotify playback-state snapshots.
//!
//! One authenticated GET of the currently-playing endpoint per refresh cycle.
//! "Nothing is playing" is a normal outcome (Spotify answers 204 with an
//! empty body, or without an `item`), never an error; only a malformed
//! success payload is.

use serde::Deserialize;
use thiserror::Error;

use crate::net::http_client;
use crate::timeline::SnapshotSource;

const CURRENTLY_PLAYING_URL: &str = "https://api.spotify.com/v1/me/player/currently-playing";

pub(crate) const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// One polled reading of current playback state. Never mutated; each refresh
/// cycle supersedes the previous snapshot wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackSnapshot {
    pub title: String,
    /// First listed artist; an absent artist list becomes "Unknown Artist".
    pub artist: String,
    pub elapsed_ms: u64,
    /// Unknown or zero durations are normalized to `None`.
    pub duration_ms: Option<u64>,
    /// Provider track identifier, used only for change detection.
    pub track_id: Option<String>,
    pub playing: bool,
}

#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// A success status carried a payload that does not match the provider
    /// contract. Distinct from "nothing playing", which is not an error.
    #[error("malformed playback payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct CurrentlyPlaying {
    #[serde(default)]
    progress_ms: Option<u64>,
    #[serde(default)]
    is_playing: bool,
    item: Option<PlayingItem>,
}

#[derive(Deserialize)]
struct PlayingItem {
    name: String,
    #[serde(default)]
    artists: Vec<ArtistRef>,
    #[serde(default)]
    duration_ms: Option<u64>,
    #[serde(default)]
    id: Option<String>,
    // Album art is part of the payload contract; nothing here renders it.
    #[allow(dead_code)]
    #[serde(default)]
    album: Option<AlbumRef>,
}

#[derive(Deserialize)]
struct ArtistRef {
    name: String,
}

#[derive(Deserialize)]
struct AlbumRef {
    #[allow(dead_code)]
    #[serde(default)]
    images: Vec<ImageRef>,
}

#[derive(Deserialize)]
struct ImageRef {
    #[allow(dead_code)]
    url: String,
}

pub struct SpotifyPlayback {
    token: String,
}

impl SpotifyPlayback {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Query the currently-playing endpoint once. `Ok(None)` means no active
    /// track.
    pub async fn fetch_snapshot(&self) -> Result<Option<TrackSnapshot>, PlaybackError> {
        let resp = http_client()
            .get(CURRENTLY_PLAYING_URL)
            .header("Authorization", format!("Bearer {}", self.token))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Ok(None);
        }
        let body = resp.text().await?;
        parse_currently_playing(&body)
    }
}

impl SnapshotSource for SpotifyPlayback {
    async fn fetch(&self) -> Result<Option<TrackSnapshot>, PlaybackError> {
        self.fetch_snapshot().await
    }
}

/// Decode one currently-playing payload into a snapshot.
pub fn parse_currently_playing(body: &str) -> Result<Option<TrackSnapshot>, PlaybackError> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    let info: CurrentlyPlaying = serde_json::from_str(body)?;
    let Some(item) = info.item else {
        return Ok(None);
    };
    let artist = item
        .artists
        .into_iter()
        .next()
        .map(|a| a.name)
        .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());
    Ok(Some(TrackSnapshot {
        title: item.name,
        artist,
        elapsed_ms: info.progress_ms.unwrap_or(0),
        duration_ms: item.duration_ms.filter(|d| *d > 0),
        track_id: item.id.filter(|id| !id.is_empty()),
        playing: info.is_playing,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "progress_ms": 30000,
        "is_playing": true,
        "item": {
            "id": "5ChkMS8OtdzJeqyybCc9R5",
            "name": "Billie Jean",
            "duration_ms": 294000,
            "artists": [{"name": "Michael Jackson"}, {"name": "Someone Else"}],
            "album": {"images": [{"url": "https://i.scdn.co/image/abc"}]}
        }
    }"#;

    #[test]
    fn decodes_full_payload() {
        let snap = parse_currently_playing(PAYLOAD).unwrap().unwrap();
        assert_eq!(snap.title, "Billie Jean");
        assert_eq!(snap.artist, "Michael Jackson");
        assert_eq!(snap.elapsed_ms, 30_000);
        assert_eq!(snap.duration_ms, Some(294_000));
        assert_eq!(snap.track_id.as_deref(), Some("5ChkMS8OtdzJeqyybCc9R5"));
        assert!(snap.playing);
    }

    #[test]
    fn empty_body_means_no_active_track() {
        assert_eq!(parse_currently_playing("").unwrap(), None);
        assert_eq!(parse_currently_playing("  \n").unwrap(), None);
    }

    #[test]
    fn missing_item_means_no_active_track() {
        let body = r#"{"progress_ms": 1000, "is_playing": false, "item": null}"#;
        assert_eq!(parse_currently_playing(body).unwrap(), None);
    }

    #[test]
    fn absent_artist_list_becomes_sentinel() {
        let body = r#"{"progress_ms": 0, "is_playing": true,
                       "item": {"name": "Untitled", "artists": []}}"#;
        let snap = parse_currently_playing(body).unwrap().unwrap();
        assert_eq!(snap.artist, UNKNOWN_ARTIST);
        assert_eq!(snap.duration_ms, None);
        assert_eq!(snap.track_id, None);
    }

    #[test]
    fn zero_duration_is_unknown() {
        let body = r#"{"progress_ms": 5, "is_playing": true,
                       "item": {"name": "Untitled", "duration_ms": 0,
                                "artists": [{"name": "X"}]}}"#;
        let snap = parse_currently_playing(body).unwrap().unwrap();
        assert_eq!(snap.duration_ms, None);
    }

    #[test]
    fn malformed_payload_is_an_error() {
        assert!(parse_currently_playing("{\"item\": 42}").is_err());
        assert!(parse_currently_playing("<html>rate limited</html>").is_err());
    }
}
