//! Genius lyrics provider.
//!
//! Genius does not expose lyric text through its API, so this is a two-step
//! fetch: an authenticated search to locate the song page, then an
//! unauthenticated scrape of that page handed to the extractor.

use serde::Deserialize;

use crate::lyrics::extract::{GeniusExtractor, LyricExtractor};
use crate::lyrics::types::{LyricSet, LyricsError};
use crate::net::http_client;
use crate::timeline::LyricsSource;

const SEARCH_URL: &str = "https://api.genius.com/search";
const PAGE_BASE: &str = "https://genius.com";

#[derive(Deserialize)]
struct SearchResponse {
    response: SearchBody,
}

#[derive(Deserialize)]
struct SearchBody {
    hits: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    result: HitResult,
}

#[derive(Deserialize)]
struct HitResult {
    path: Option<String>,
}

pub struct GeniusClient {
    token: String,
    extractor: Box<dyn LyricExtractor>,
}

impl GeniusClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_extractor(token, Box::new(GeniusExtractor))
    }

    pub fn with_extractor(token: impl Into<String>, extractor: Box<dyn LyricExtractor>) -> Self {
        Self {
            token: token.into(),
            extractor,
        }
    }

    /// Fetch lyrics for one (title, artist) pair.
    ///
    /// No retries at this layer; the caller's refresh cadence is the retry
    /// policy for transient failures.
    pub async fn fetch_lyrics(&self, title: &str, artist: &str) -> Result<LyricSet, LyricsError> {
        let path = self.search_path(title, artist).await?;
        let page_url = format!("{PAGE_BASE}{path}");

        let resp = http_client().get(&page_url).send().await?;
        let html = resp
            .text()
            .await
            .map_err(|_| LyricsError::NoLyricsFound(page_url.clone()))?;

        let lines = self
            .extractor
            .extract(&html)
            .ok_or(LyricsError::NoLyricsFound(page_url))?;
        Ok(LyricSet::from_lines(lines))
    }

    async fn search_path(&self, title: &str, artist: &str) -> Result<String, LyricsError> {
        let url = search_url(title, artist);
        let resp = http_client()
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(LyricsError::Api(format!(
                "genius search: HTTP {}",
                resp.status()
            )));
        }

        let body = resp.text().await?;
        first_hit_path(&body)
            .ok_or_else(|| LyricsError::NoSearchResult(format!("{title} {artist}")))
    }
}

impl LyricsSource for GeniusClient {
    async fn fetch(&self, title: &str, artist: &str) -> Result<LyricSet, LyricsError> {
        self.fetch_lyrics(title, artist).await
    }
}

fn search_url(title: &str, artist: &str) -> String {
    format!(
        "{SEARCH_URL}?q={}%20{}",
        urlencoding::encode(title),
        urlencoding::encode(artist)
    )
}

/// Page path of the first search hit, if the response shape holds.
fn first_hit_path(body: &str) -> Option<String> {
    let parsed: SearchResponse = serde_json::from_str(body).ok()?;
    parsed
        .response
        .hits
        .into_iter()
        .next()
        .and_then(|hit| hit.result.path)
        .filter(|p| !p.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_url_percent_encodes_both_parts() {
        assert_eq!(
            search_url("Billie Jean", "Michael Jackson"),
            "https://api.genius.com/search?q=Billie%20Jean%20Michael%20Jackson"
        );
    }

    #[test]
    fn first_hit_path_reads_first_result() {
        let body = r#"{"response":{"hits":[
            {"result":{"path":"/Michael-jackson-billie-jean-lyrics"}},
            {"result":{"path":"/other"}}
        ]}}"#;
        assert_eq!(
            first_hit_path(body).as_deref(),
            Some("/Michael-jackson-billie-jean-lyrics")
        );
    }

    #[test]
    fn no_hits_or_bad_shapes_yield_none() {
        assert_eq!(first_hit_path(r#"{"response":{"hits":[]}}"#), None);
        assert_eq!(first_hit_path(r#"{"response":{"hits":[{"result":{}}]}}"#), None);
        assert_eq!(
            first_hit_path(r#"{"response":{"hits":[{"result":{"path":""}}]}}"#),
            None
        );
        assert_eq!(first_hit_path("not json"), None);
    }
}
