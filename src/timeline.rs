// timeline.rs: per-cycle orchestration of snapshot, lyrics and projection

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::lyrics::types::{LyricSet, LyricsError};
use crate::playback::{PlaybackError, TrackSnapshot};
use crate::position::map_to_line;

/// Projection step between consecutive display states.
pub const STEP: Duration = Duration::from_secs(5);
/// Number of projected display states per timeline.
pub const TIMELINE_ENTRIES: usize = 24;
/// How long a lyric timeline stays authoritative before a rebuild. Shorter
/// than the projected horizon so consumers re-pull well before entries run
/// out; this also bounds drift against paused or seeked playback.
pub const VALID_FOR: Duration = Duration::from_secs(30);
/// Horizon for placeholder timelines, kept short so recovery is quick.
pub const PLACEHOLDER_VALID_FOR: Duration = Duration::from_secs(10);

pub const NOT_PLAYING_TITLE: &str = "Not Playing";
pub const LOGIN_PROMPT: &str = "Login to Spotify";
pub const NO_TRACK_PROMPT: &str = "No track found";
pub const NO_SONG_LINE: &str = "No song currently playing";
pub const NO_TRACK_LINE: &str = "Make sure music is playing on Spotify";
pub const LOADING_LINE: &str = "Loading lyrics...";

/// Playback-state dependency of the builder. Injected rather than read from
/// ambient state so cycles are reproducible in tests.
pub trait SnapshotSource {
    async fn fetch(&self) -> Result<Option<TrackSnapshot>, PlaybackError>;
}

/// Lyrics dependency of the builder.
pub trait LyricsSource {
    async fn fetch(&self, title: &str, artist: &str) -> Result<LyricSet, LyricsError>;
}

/// One point on the output timeline.
#[derive(Debug, Clone)]
pub struct DisplayState {
    pub at: Instant,
    /// `None` when no lyric set backs this entry; `line` then carries a
    /// placeholder.
    pub line_index: Option<usize>,
    pub line: String,
    pub snapshot: Arc<TrackSnapshot>,
}

/// Precomputed sequence of future display states covering one refresh cycle.
#[derive(Debug, Clone)]
pub struct SessionTimeline {
    /// Entries in strictly increasing `at` order.
    pub entries: Vec<DisplayState>,
    /// Full line list backing the entries, for consumers that render context
    /// around the current line.
    pub lines: Arc<LyricSet>,
    /// After this instant the consumer must request a rebuild.
    pub valid_until: Instant,
}

impl SessionTimeline {
    /// Entry that should be on screen at `at`: the latest one not after it.
    pub fn state_at(&self, at: Instant) -> Option<&DisplayState> {
        self.entries.iter().rev().find(|e| e.at <= at)
    }
}

/// Builds a fresh `SessionTimeline` each refresh cycle, carrying exactly one
/// piece of state across cycles: the identity of the track the current lyric
/// set belongs to. Every failure below this point is absorbed into a
/// placeholder state; consumers never see an error.
pub struct TimelineBuilder<S, L> {
    sources: Option<Sources<S, L>>,
    last_key: Option<String>,
    lyrics: Arc<LyricSet>,
}

struct Sources<S, L> {
    playback: S,
    lyrics: L,
}

impl<S: SnapshotSource, L: LyricsSource> TimelineBuilder<S, L> {
    pub fn new(playback: S, lyrics: L) -> Self {
        Self {
            sources: Some(Sources { playback, lyrics }),
            last_key: None,
            lyrics: Arc::new(LyricSet::empty()),
        }
    }

    /// A builder with no credential. Absence of a token is a normal state:
    /// every cycle yields the "not playing" placeholder.
    pub fn without_credential() -> Self {
        Self {
            sources: None,
            last_key: None,
            lyrics: Arc::new(LyricSet::empty()),
        }
    }

    pub async fn build_timeline(&mut self, now: Instant) -> SessionTimeline {
        let Some(sources) = &self.sources else {
            self.reset();
            return placeholder(now, NOT_PLAYING_TITLE, LOGIN_PROMPT, NO_SONG_LINE);
        };

        let snapshot = match sources.playback.fetch().await {
            Ok(Some(snap)) => Arc::new(snap),
            Ok(None) => {
                self.reset();
                return placeholder(now, NOT_PLAYING_TITLE, NO_TRACK_PROMPT, NO_TRACK_LINE);
            }
            Err(err) => {
                tracing::warn!(error = %err, "playback snapshot failed");
                self.reset();
                return placeholder(now, NOT_PLAYING_TITLE, NO_TRACK_PROMPT, NO_TRACK_LINE);
            }
        };

        // Same track with lyrics in hand: reuse, no refetch. An empty set is
        // refetched every cycle; the refresh cadence is the retry mechanism.
        let key = track_key(&snapshot);
        if self.last_key.as_deref() != Some(key.as_str()) || self.lyrics.is_empty() {
            self.lyrics = match sources.lyrics.fetch(&snapshot.title, &snapshot.artist).await {
                Ok(set) => Arc::new(set),
                Err(err) => {
                    tracing::warn!(error = %err, title = %snapshot.title, "lyrics fetch failed");
                    Arc::new(LyricSet::empty())
                }
            };
            self.last_key = Some(key);
        }

        if self.lyrics.is_empty() {
            // Song identity is still worth showing without lyrics.
            return SessionTimeline {
                entries: vec![DisplayState {
                    at: now,
                    line_index: None,
                    line: LOADING_LINE.to_string(),
                    snapshot,
                }],
                lines: Arc::new(LyricSet::empty()),
                valid_until: now + PLACEHOLDER_VALID_FOR,
            };
        }

        let step_ms = STEP.as_millis() as u64;
        let entries = (0..TIMELINE_ENTRIES)
            .map(|i| {
                // The snapshot is already stale by the time an entry renders,
                // so project forward from its observed position.
                let projected = snapshot.elapsed_ms + step_ms * i as u64;
                let index = map_to_line(projected, snapshot.duration_ms, self.lyrics.len());
                let line = index
                    .and_then(|idx| self.lyrics.lines().get(idx))
                    .map(String::as_str)
                    .unwrap_or(LOADING_LINE)
                    .to_string();
                DisplayState {
                    at: now + STEP * i as u32,
                    line_index: index,
                    line,
                    snapshot: Arc::clone(&snapshot),
                }
            })
            .collect();

        SessionTimeline {
            entries,
            lines: Arc::clone(&self.lyrics),
            valid_until: now + VALID_FOR,
        }
    }

    fn reset(&mut self) {
        // Placeholder states never carry a stale lyric set forward.
        self.last_key = None;
        self.lyrics = Arc::new(LyricSet::empty());
    }
}

fn track_key(snapshot: &TrackSnapshot) -> String {
    snapshot
        .track_id
        .clone()
        .unwrap_or_else(|| format!("{}::{}", snapshot.title, snapshot.artist))
}

fn placeholder(now: Instant, title: &str, artist: &str, line: &str) -> SessionTimeline {
    let snapshot = Arc::new(TrackSnapshot {
        title: title.to_string(),
        artist: artist.to_string(),
        ..TrackSnapshot::default()
    });
    SessionTimeline {
        entries: vec![DisplayState {
            at: now,
            line_index: None,
            line: line.to_string(),
            snapshot,
        }],
        lines: Arc::new(LyricSet::empty()),
        valid_until: now + PLACEHOLDER_VALID_FOR,
    }
}
