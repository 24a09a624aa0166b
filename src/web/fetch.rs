use crate::connections::{date::PuzzleDate, puzzle::Puzzle, source::*};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;
use super::describe_js_err;

pub const DEFAULT_API_BASE: &str = "/api";

///
/// Talks to the puzzle API:
///
///   * GET {base}/puzzles        -> every puzzle, keyed by date
///   * GET {base}/puzzles/{date} -> the categories for one date, or null
///
/// This makes a single attempt per call, wrap it in a RetryingSource for retries.
///
#[derive(Clone, Debug)]
pub struct HttpPuzzleSource {
    base_url: String,
}

impl Default for HttpPuzzleSource {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

impl HttpPuzzleSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    /// The response body, or None for a 404
    async fn get_text(&self, path: &str) -> Result<Option<String>, SourceErr> {
        let url = format!("{}{}", self.base_url, path);
        let window = web_sys::window().ok_or_else(|| SourceErr::Platform("no window".to_string()))?;
        let resp = JsFuture::from(window.fetch_with_str(&url))
            .await
            .map_err(|err| SourceErr::Platform(describe_js_err(&err)))?;
        let resp: Response = resp
            .dyn_into()
            .map_err(|_| SourceErr::Platform("fetch did not return a Response".to_string()))?;

        if resp.status() == 404 {
            return Ok(None);
        }
        if !resp.ok() {
            return Err(SourceErr::Http(resp.status()));
        }

        let text_promise = resp.text().map_err(|err| SourceErr::Platform(describe_js_err(&err)))?;
        let text = JsFuture::from(text_promise)
            .await
            .map_err(|err| SourceErr::Platform(describe_js_err(&err)))?;
        text.as_string()
            .map(Some)
            .ok_or_else(|| SourceErr::Decode("response body is not text".to_string()))
    }
}

impl PuzzleSource for HttpPuzzleSource {
    async fn fetch_all_puzzles(&self) -> Result<PuzzlesByDate, SourceErr> {
        match self.get_text("/puzzles").await? {
            Some(raw) => decode_puzzles(&raw),
            None => Err(SourceErr::Http(404)),
        }
    }

    async fn fetch_puzzle_for_date(&self, date: PuzzleDate) -> Result<Option<Puzzle>, SourceErr> {
        match self.get_text(&format!("/puzzles/{}", date)).await? {
            Some(raw) => decode_puzzle(&raw),
            None => Ok(None),
        }
    }
}
