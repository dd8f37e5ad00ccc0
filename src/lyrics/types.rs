use thiserror::Error;

/// Ordered, cleaned lyric lines for exactly one (title, artist) pair.
///
/// Construction filters out empty and whitespace-only lines so the rest of
/// the pipeline can rely on every element being displayable as-is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LyricSet {
    lines: Vec<String>,
}

impl LyricSet {
    pub fn from_lines<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let lines = lines
            .into_iter()
            .filter(|l| !l.trim().is_empty())
            .collect();
        Self { lines }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[derive(Error, Debug)]
pub enum LyricsError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("API error: {0}")]
    Api(String),
    #[error("no search result for \"{0}\"")]
    NoSearchResult(String),
    #[error("no lyrics found at {0}")]
    NoLyricsFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_lines_drops_blank_entries() {
        let set = LyricSet::from_lines(vec![
            "Hello darkness my old friend".to_string(),
            "   ".to_string(),
            String::new(),
            "I've come to talk with you again".to_string(),
        ]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.lines()[1], "I've come to talk with you again");
    }
}
