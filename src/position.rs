// position.rs: playback-position to lyric-line mapping

/// Fixed offset subtracted from elapsed playback before mapping, approximating
/// intro silence before vocals begin.
pub const LEAD_IN_MS: u64 = 3_000;

/// Assumed time per lyric line when the track duration is unknown.
pub const FALLBACK_LINE_MS: u64 = 4_000;

/// Map elapsed playback time to a lyric line index.
///
/// Linear interpolation across the track, assuming lyric density is uniform.
/// That assumption fails for songs with long instrumental sections; it is the
/// accepted approximation for untimed lyrics, not a bug. Returns `None` only
/// when there are no lines at all.
pub fn map_to_line(elapsed_ms: u64, duration_ms: Option<u64>, line_count: usize) -> Option<usize> {
    if line_count == 0 {
        return None;
    }
    let adjusted = elapsed_ms.saturating_sub(LEAD_IN_MS);
    let index = match duration_ms {
        Some(duration) if duration > 0 => {
            ((adjusted as f64 / duration as f64) * line_count as f64).floor() as usize
        }
        _ => (adjusted / FALLBACK_LINE_MS) as usize,
    };
    Some(index.min(line_count - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotone_in_elapsed_time() {
        let mut last = 0;
        for elapsed in (0..400_000).step_by(1_375) {
            let idx = map_to_line(elapsed, Some(294_000), 40).unwrap();
            assert!(idx >= last, "index regressed at {elapsed}ms");
            last = idx;
        }
    }

    #[test]
    fn start_of_track_maps_to_first_line() {
        assert_eq!(map_to_line(0, Some(294_000), 40), Some(0));
        // Anything inside the lead-in window also clamps to the first line.
        assert_eq!(map_to_line(LEAD_IN_MS - 1, Some(294_000), 40), Some(0));
        assert_eq!(map_to_line(0, None, 7), Some(0));
    }

    #[test]
    fn far_past_the_end_clamps_to_last_line() {
        assert_eq!(map_to_line(u64::MAX, Some(294_000), 40), Some(39));
        assert_eq!(map_to_line(10_000_000, None, 7), Some(6));
    }

    #[test]
    fn zero_lines_is_the_sentinel() {
        assert_eq!(map_to_line(0, None, 0), None);
        assert_eq!(map_to_line(u64::MAX, Some(1), 0), None);
    }

    #[test]
    fn interpolates_billie_jean() {
        // 30s into a 294s track with 2 lines: 27s adjusted, ~9.18% progress,
        // floor(0.0918 * 2) = 0 -> still the first line.
        assert_eq!(map_to_line(30_000, Some(294_000), 2), Some(0));
    }

    #[test]
    fn unknown_duration_steps_every_four_seconds() {
        assert_eq!(map_to_line(LEAD_IN_MS, None, 10), Some(0));
        assert_eq!(map_to_line(LEAD_IN_MS + FALLBACK_LINE_MS, None, 10), Some(1));
        assert_eq!(
            map_to_line(LEAD_IN_MS + 3 * FALLBACK_LINE_MS, None, 10),
            Some(3)
        );
        // A zero duration is treated the same as an unknown one.
        assert_eq!(
            map_to_line(LEAD_IN_MS + FALLBACK_LINE_MS, Some(0), 10),
            Some(1)
        );
    }
}
