// pipe.rs: stdout consumer loop for session timelines

use std::time::Instant;

use crate::timeline::{LyricsSource, SessionTimeline, SnapshotSource, TimelineBuilder};

/// Follow timelines on stdout: print each new line at its scheduled instant,
/// a blank line between tracks, and rebuild at every valid-until.
pub async fn run<S, L>(mut builder: TimelineBuilder<S, L>)
where
    S: SnapshotSource,
    L: LyricsSource,
{
    let mut last_track: Option<String> = None;
    let mut last_line: Option<String> = None;

    loop {
        let now = Instant::now();
        let timeline = builder.build_timeline(now).await;

        if let Some(first) = timeline.entries.first() {
            let key = format!("{}::{}", first.snapshot.title, first.snapshot.artist);
            if last_track.as_deref() != Some(key.as_str()) {
                if last_track.is_some() {
                    println!();
                }
                last_track = Some(key);
                last_line = None;
            }
        }

        // Entries past valid_until belong to the next build.
        for entry in &timeline.entries {
            if entry.at > timeline.valid_until {
                break;
            }
            tokio::time::sleep(entry.at.saturating_duration_since(Instant::now())).await;
            if last_line.as_deref() != Some(entry.line.as_str()) {
                println!("{}", entry.line);
                last_line = Some(entry.line.clone());
            }
        }

        tokio::time::sleep(
            timeline
                .valid_until
                .saturating_duration_since(Instant::now()),
        )
        .await;
    }
}

/// Print one built timeline as an offset schedule. Debug surface for
/// inspecting what a consumer would display, without waiting for it.
pub fn print_schedule(timeline: &SessionTimeline, now: Instant) {
    if let Some(first) = timeline.entries.first() {
        let paused = !first.snapshot.playing && !timeline.lines.is_empty();
        println!(
            "{} - {}{}",
            first.snapshot.title,
            first.snapshot.artist,
            if paused { " (paused)" } else { "" }
        );
        println!(
            "{} lines, valid for {}s",
            timeline.lines.len(),
            timeline
                .valid_until
                .saturating_duration_since(now)
                .as_secs()
        );
    }
    let current_at = timeline.state_at(now).map(|e| e.at);
    for entry in &timeline.entries {
        let marker = if Some(entry.at) == current_at { '>' } else { ' ' };
        let offset = entry.at.saturating_duration_since(now).as_secs();
        match entry.line_index {
            Some(idx) => println!("{marker} {offset:>3}s  [{idx:>2}] {}", entry.line),
            None => println!("{marker} {offset:>3}s  {}", entry.line),
        }
    }
}
