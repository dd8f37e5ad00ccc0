mod lyrics;
mod net;
mod pipe;
mod playback;
mod position;
mod timeline;

use clap::Parser;

use crate::lyrics::GeniusClient;
use crate::playback::SpotifyPlayback;
use crate::timeline::TimelineBuilder;

/// Application configuration from CLI
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Config {
    /// Spotify bearer token (falls back to the SPOTIFY_TOKEN env var)
    #[arg(long)]
    spotify_token: Option<String>,
    /// Genius API token (falls back to the GENIUS_TOKEN env var)
    #[arg(long)]
    genius_token: Option<String>,
    /// Build a single timeline, print its schedule, and exit
    #[arg(long)]
    once: bool,
}

fn token_from_env_if_missing(slot: &mut Option<String>, var: &str) {
    if slot.is_none()
        && let Ok(s) = std::env::var(var)
        && !s.trim().is_empty()
    {
        *slot = Some(s);
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut cfg = Config::parse();
    token_from_env_if_missing(&mut cfg.spotify_token, "SPOTIFY_TOKEN");
    token_from_env_if_missing(&mut cfg.genius_token, "GENIUS_TOKEN");

    let mut builder = match cfg.spotify_token {
        Some(spotify_token) => TimelineBuilder::new(
            SpotifyPlayback::new(spotify_token),
            GeniusClient::new(cfg.genius_token.unwrap_or_default()),
        ),
        // Missing credential is a normal state, not an error: the builder
        // emits placeholder timelines until a token is supplied.
        None => TimelineBuilder::without_credential(),
    };

    if cfg.once {
        let now = std::time::Instant::now();
        let timeline = builder.build_timeline(now).await;
        pipe::print_schedule(&timeline, now);
        return;
    }

    pipe::run(builder).await;
}
