/*
 * MIT License
 *
 * Copyright (c) 2022 Joseph Sacchini
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use super::{date::*, prelude::*, puzzle::*, store::KeyValueStore};

/// Every puzzle the source knows about, keyed by its (canonical) date
pub type PuzzlesByDate = BTreeMap<PuzzleDate, Puzzle>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceErr {
    #[error("request failed with status {0}")]
    Http(u16),
    #[error("malformed puzzle data: {0}")]
    Decode(String),
    #[error("{0}")]
    Platform(String),
    #[error("gave up after {attempts} attempts")]
    RetriesExhausted {
        attempts: usize,
        #[source]
        last: Box<SourceErr>,
    },
}

///
/// Where puzzles come from. The network implementation lives in web::fetch; the decorators in
/// this module add retries and caching on top of any implementation.
///
#[allow(async_fn_in_trait)]
pub trait PuzzleSource {
    async fn fetch_all_puzzles(&self) -> Result<PuzzlesByDate, SourceErr>;

    async fn fetch_puzzle_for_date(&self, date: PuzzleDate) -> Result<Option<Puzzle>, SourceErr>;
}

/// The entries of a JSON object in document order, repeated keys included
struct OrderedEntries(Vec<(String, serde_json::Value)>);

impl<'de> Deserialize<'de> for OrderedEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = OrderedEntries;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of puzzles keyed by date")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut out = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, serde_json::Value>()? {
                    out.push(entry);
                }
                Ok(OrderedEntries(out))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Splits an "all puzzles" response into its (raw date, categories) entries, in the order served
pub fn decode_entries(raw: &str) -> Result<Vec<(String, serde_json::Value)>, SourceErr> {
    let OrderedEntries(entries) =
        serde_json::from_str(raw).map_err(|err| SourceErr::Decode(err.to_string()))?;
    Ok(entries)
}

/// Turns one entry of an "all puzzles" response into a date and a validated puzzle
pub fn decode_entry(raw_date: &str, value: serde_json::Value) -> Result<(PuzzleDate, Puzzle), String> {
    let date = raw_date.parse::<PuzzleDate>().map_err(|err| err.to_string())?;
    let categories: Vec<Category> = serde_json::from_value(value).map_err(|err| err.to_string())?;
    let puzzle = Puzzle::new(categories).map_err(|err| err.to_string())?;
    Ok((date, puzzle))
}

///
/// Decodes the response of the "all puzzles" endpoint:
///
/// ```text
/// { "3/9/2024": [ { "category": "...", "words": [...], "difficulty": 1 }, ... ], ... }
/// ```
///
/// Entries with a date we can't read, or categories which don't form a valid puzzle, are skipped
/// (and logged) rather than failing everything else. When two entries name the same date the one
/// served first wins.
///
pub fn decode_puzzles(raw: &str) -> Result<PuzzlesByDate, SourceErr> {
    let mut out = PuzzlesByDate::new();
    for (raw_date, value) in decode_entries(raw)? {
        let (date, puzzle) = match decode_entry(&raw_date, value) {
            Ok(decoded) => decoded,
            Err(reason) => {
                log::warn!("skipping puzzle '{}': {}", raw_date, reason);
                continue;
            }
        };

        if out.contains_key(&date) {
            log::debug!("ignoring second puzzle for {} ('{}')", date, raw_date);
            continue;
        }
        out.insert(date, puzzle);
    }

    Ok(out)
}

/// Decodes the response of the "puzzle for date" endpoint: a bare list of categories, or null
pub fn decode_puzzle(raw: &str) -> Result<Option<Puzzle>, SourceErr> {
    let categories: Option<Vec<Category>> =
        serde_json::from_str(raw).map_err(|err| SourceErr::Decode(err.to_string()))?;
    let categories = match categories {
        Some(categories) if !categories.is_empty() => categories,
        _ => return Ok(None),
    };

    Puzzle::new(categories)
        .map(Some)
        .map_err(|err| SourceErr::Decode(err.to_string()))
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_FETCH_ATTEMPTS,
            initial_delay: Duration::from_millis(INITIAL_RETRY_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    /// How long to wait after the given (0 based) failed attempt: initial_delay, doubled each time
    pub fn delay_after(&self, attempt: usize) -> Duration {
        self.initial_delay * 2u32.saturating_pow(attempt as u32)
    }
}

/// Retries failed requests of the wrapped source with exponential backoff
pub struct RetryingSource<S, T> {
    inner: S,
    timer: T,
    policy: RetryPolicy,
}

impl<S: PuzzleSource, T: Timer> RetryingSource<S, T> {
    pub fn new(inner: S, timer: T) -> Self {
        Self::with_policy(inner, timer, RetryPolicy::default())
    }

    pub fn with_policy(inner: S, timer: T, policy: RetryPolicy) -> Self {
        Self { inner, timer, policy }
    }

    async fn retry<R, F, Fut>(&self, what: &str, mut attempt_fn: F) -> Result<R, SourceErr>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<R, SourceErr>>,
    {
        let attempts = self.policy.max_attempts.max(1);
        let mut last = None;
        for attempt in 0..attempts {
            match attempt_fn().await {
                Ok(out) => return Ok(out),
                // asking again gets the same bytes back
                Err(err @ SourceErr::Decode(_)) => {
                    log::warn!("{} returned unusable data: {}", what, err);
                    return Err(err);
                }
                Err(err) => {
                    log::info!("{} attempt {} failed: {}", what, attempt + 1, err);
                    last = Some(err);
                }
            }

            if attempt + 1 < attempts {
                let delay = self.policy.delay_after(attempt);
                log::debug!("retrying {} in {}ms...", what, delay.as_millis());
                self.timer.sleep(delay).await;
            }
        }

        Err(SourceErr::RetriesExhausted {
            attempts,
            last: Box::new(last.unwrap_or_else(|| SourceErr::Platform("no attempts made".to_string()))),
        })
    }
}

impl<S: PuzzleSource, T: Timer> PuzzleSource for RetryingSource<S, T> {
    async fn fetch_all_puzzles(&self) -> Result<PuzzlesByDate, SourceErr> {
        let inner = &self.inner;
        self.retry("fetch all puzzles", move || inner.fetch_all_puzzles()).await
    }

    async fn fetch_puzzle_for_date(&self, date: PuzzleDate) -> Result<Option<Puzzle>, SourceErr> {
        let inner = &self.inner;
        self.retry("fetch puzzle", move || inner.fetch_puzzle_for_date(date)).await
    }
}

#[derive(Serialize, Deserialize)]
struct CachedPuzzles {
    timestamp: u64,
    puzzles: PuzzlesByDate,
}

///
/// Keeps the most recent "all puzzles" response in a KeyValueStore, and serves it for a day
/// instead of asking the wrapped source again. An unreadable cache entry is the same as no entry.
///
pub struct CachedSource<S, K, C = SystemClock> {
    inner: S,
    store: RefCell<K>,
    clock: C,
    ttl_ms: u64,
}

impl<S: PuzzleSource, K: KeyValueStore> CachedSource<S, K, SystemClock> {
    pub fn new(inner: S, store: K) -> Self {
        Self::with_clock(inner, store, SystemClock)
    }
}

impl<S: PuzzleSource, K: KeyValueStore, C: Clock> CachedSource<S, K, C> {
    pub fn with_clock(inner: S, store: K, clock: C) -> Self {
        Self {
            inner,
            store: RefCell::new(store),
            clock,
            ttl_ms: PUZZLE_CACHE_TTL_MS,
        }
    }

    /// Returns the cached puzzles if they're still fresh. Unreadable or expired entries are dropped.
    fn read_cache(&self) -> Option<PuzzlesByDate> {
        let raw = self.store.borrow().get(PUZZLE_CACHE_KEY)?;
        let cached: CachedPuzzles = match serde_json::from_str(&raw) {
            Ok(cached) => cached,
            Err(err) => {
                log::warn!("dropping unreadable puzzle cache: {}", err);
                self.store.borrow_mut().remove(PUZZLE_CACHE_KEY);
                return None;
            }
        };

        let age = self.clock.now_millis().saturating_sub(cached.timestamp);
        if age < self.ttl_ms {
            log::debug!("using cached puzzles ({}s old)", age / 1000);
            Some(cached.puzzles)
        } else {
            log::debug!("puzzle cache expired");
            self.store.borrow_mut().remove(PUZZLE_CACHE_KEY);
            None
        }
    }

    fn write_cache(&self, puzzles: PuzzlesByDate) -> PuzzlesByDate {
        let cached = CachedPuzzles {
            timestamp: self.clock.now_millis(),
            puzzles,
        };

        let written = serde_json::to_string(&cached)
            .map_err(|err| err.to_string())
            .and_then(|raw| {
                self.store
                    .borrow_mut()
                    .set(PUZZLE_CACHE_KEY, &raw)
                    .map_err(|err| err.to_string())
            });
        if let Err(err) = written {
            log::warn!("failed to cache puzzles: {}", err);
        }

        cached.puzzles
    }
}

impl<S: PuzzleSource, K: KeyValueStore, C: Clock> PuzzleSource for CachedSource<S, K, C> {
    async fn fetch_all_puzzles(&self) -> Result<PuzzlesByDate, SourceErr> {
        if let Some(puzzles) = self.read_cache() {
            return Ok(puzzles);
        }

        let fresh = self.inner.fetch_all_puzzles().await?;
        Ok(self.write_cache(fresh))
    }

    async fn fetch_puzzle_for_date(&self, date: PuzzleDate) -> Result<Option<Puzzle>, SourceErr> {
        Ok(self.fetch_all_puzzles().await?.remove(&date))
    }
}
