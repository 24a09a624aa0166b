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
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use super::{date::*, game::*, prelude::*, puzzle::*};

///
/// The persisted record of one day's session. The JSON shape (camelCase field names) is what ends
/// up in local storage under `session:<date>`.
///
/// completed/failed are derived from the rest of the snapshot when it is created; they are written
/// so that the archive can show a status without replaying anything, but nothing reads them back
/// when restoring a session.
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub puzzle_date: PuzzleDate,
    pub submitted_guesses: Vec<Guess>,
    pub solved_game_data: Vec<Category>,
    pub game_data: Vec<Category>,
    pub completed: bool,
    pub failed: bool,
    /// milliseconds since the unix epoch, set when the snapshot is written
    pub timestamp: u64,
}

/// The part of a snapshot the archive listing needs
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleStatus {
    pub completed: bool,
    pub failed: bool,
    pub timestamp: u64,
}

/// Used by list_statuses so that we don't have to parse the whole snapshot
#[derive(Deserialize)]
struct StatusFields {
    completed: bool,
    failed: bool,
    timestamp: u64,
}

#[derive(Error, Debug)]
pub enum StoreErr {
    #[error("failed to write '{key}': {reason}")]
    WriteFailed { key: String, reason: String },
    #[error(transparent)]
    Encoding(#[from] serde_json::Error),
}

///
/// A string key -> string value store. In the browser this is window.localStorage, elsewhere it's
/// usually a MemoryStore.
///
/// Reads never fail (a value that can't be read is the same as a missing value), writes might.
///
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreErr>;

    fn remove(&mut self, key: &str);

    fn keys(&self) -> Vec<String>;
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    items: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreErr> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.items.remove(key);
    }

    fn keys(&self) -> Vec<String> {
        self.items.keys().cloned().collect()
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreErr> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) {
        (**self).remove(key)
    }

    fn keys(&self) -> Vec<String> {
        (**self).keys()
    }
}

/// The key a date's snapshot lives under
pub fn session_key(date: PuzzleDate) -> String {
    format!("{}{}", SESSION_KEY_PREFIX, date)
}

///
/// Saves one snapshot per puzzle date, plus the aggregate stats blob, on top of any KeyValueStore.
///
/// This holds no game logic: it doesn't know how a snapshot is derived, only how it is stored.
///
pub struct SnapshotStore<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: KeyValueStore> SnapshotStore<S, SystemClock> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> SnapshotStore<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Writes the snapshot for a date (replacing whatever was there), stamped with the current time
    pub fn save(&mut self, date: PuzzleDate, mut snapshot: SessionSnapshot) -> Result<(), StoreErr> {
        snapshot.timestamp = self.clock.now_millis();
        let raw = serde_json::to_string(&snapshot)?;
        self.store.set(&session_key(date), &raw)?;
        log::debug!("saved session for {} ({} guesses)", date, snapshot.submitted_guesses.len());
        Ok(())
    }

    /// Carries out a PersistCommand returned by a Session
    pub fn apply(&mut self, command: PersistCommand) -> Result<(), StoreErr> {
        self.save(command.date, command.snapshot)
    }

    /// Reads the snapshot for a date. Anything that doesn't parse is treated as if it wasn't there.
    pub fn load(&self, date: PuzzleDate) -> Option<SessionSnapshot> {
        let key = session_key(date);
        let raw = self.store.get(&key)?;
        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                log::warn!("ignoring unreadable snapshot at '{}': {}", key, err);
                None
            }
        }
    }

    ///
    /// The status of every date with a saved session, for the archive. Keys that aren't a valid
    /// date and values that don't parse are skipped.
    ///
    pub fn list_statuses(&self) -> BTreeMap<PuzzleDate, PuzzleStatus> {
        let mut out = BTreeMap::new();
        for key in self.store.keys() {
            let date = match key.strip_prefix(SESSION_KEY_PREFIX) {
                Some(raw) => match raw.parse::<PuzzleDate>() {
                    Ok(date) => date,
                    Err(err) => {
                        log::warn!("skipping session key '{}': {}", key, err);
                        continue;
                    }
                },
                None => continue,
            };

            let parsed = self
                .store
                .get(&key)
                .map(|raw| serde_json::from_str::<StatusFields>(&raw));
            match parsed {
                Some(Ok(fields)) => {
                    out.insert(date, PuzzleStatus {
                        completed: fields.completed,
                        failed: fields.failed,
                        timestamp: fields.timestamp,
                    });
                }
                Some(Err(err)) => log::warn!("skipping unreadable session '{}': {}", key, err),
                None => {}
            }
        }

        out
    }

    /// Writes the aggregate stats blob. The shape is up to the caller.
    pub fn save_stats(&mut self, stats: &serde_json::Value) -> Result<(), StoreErr> {
        let raw = serde_json::to_string(stats)?;
        self.store.set(STATS_KEY, &raw)
    }

    pub fn load_stats(&self) -> Option<serde_json::Value> {
        let raw = self.store.get(STATS_KEY)?;
        serde_json::from_str(&raw).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connections::puzzle::tests::abcd_puzzle;
    use crate::util::tests::FixedClock;
    use serde_json::json;

    fn date(day: u8) -> PuzzleDate {
        PuzzleDate::new(2024, 3, day).unwrap()
    }

    fn store() -> SnapshotStore<MemoryStore, FixedClock> {
        SnapshotStore::with_clock(MemoryStore::new(), FixedClock::new(1_700_000_000_000))
    }

    fn played_session(day: u8) -> Session {
        let mut session = Session::new(date(day), abcd_puzzle(), GameConfig::default());
        session.submit_guess(&["a1", "a2", "a3", "a4"]).unwrap();
        session.submit_guess(&["b1", "c1", "d1", "a1"]).unwrap();
        session
    }

    #[test]
    fn test_save_then_load() {
        let mut store = store();
        let session = played_session(9);
        store.apply(session.persist_command()).unwrap();

        let loaded = store.load(date(9)).expect("snapshot should be there");
        assert_eq!(loaded.timestamp, 1_700_000_000_000);
        assert_eq!(loaded.submitted_guesses, session.submitted_guesses());
        assert!(store.load(date(10)).is_none());
    }

    #[test]
    fn test_save_overwrites() {
        let mut store = store();
        let mut session = played_session(9);
        store.apply(session.persist_command()).unwrap();
        let outcome = session.submit_guess(&["b1", "b2", "b3", "b4"]).unwrap();
        store.apply(outcome.persist).unwrap();

        assert_eq!(store.inner().len(), 1);
        assert_eq!(store.load(date(9)).unwrap().submitted_guesses.len(), 3);
    }

    #[test]
    fn test_snapshot_json_shape() {
        let mut store = store();
        store.apply(played_session(9).persist_command()).unwrap();
        let raw = store.inner().get("session:2024-03-09").expect("canonical key");
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(value["puzzleDate"], json!("2024-03-09"));
        assert_eq!(value["submittedGuesses"][0], json!(["a1", "a2", "a3", "a4"]));
        assert_eq!(value["solvedGameData"][0]["category"], json!("A"));
        assert_eq!(value["gameData"].as_array().map(|a| a.len()), Some(4));
        assert_eq!(value["completed"], json!(false));
        assert_eq!(value["failed"], json!(false));
        assert_eq!(value["timestamp"], json!(1_700_000_000_000u64));
    }

    #[test]
    fn test_corrupt_snapshot_is_absent() {
        let mut store = store();
        store.inner_mut().set("session:2024-03-09", "{not json").unwrap();
        assert!(store.load(date(9)).is_none());

        store.inner_mut().set("session:2024-03-09", r#"{"puzzleDate":"2024-03-09"}"#).unwrap();
        assert!(store.load(date(9)).is_none(), "missing fields is the same as corrupt");
    }

    #[test]
    fn test_list_statuses() {
        let mut store = store();
        store.apply(played_session(9).persist_command()).unwrap();

        let mut won = Session::new(date(10), abcd_puzzle(), GameConfig::default());
        for prefix in ["a", "b", "c", "d"] {
            let guess = (1..=4).map(|n| format!("{}{}", prefix, n)).collect::<Vec<_>>();
            won.submit_guess(&guess).unwrap();
        }
        store.apply(won.persist_command()).unwrap();

        store.inner_mut().set("session:2024-03-11", "garbage").unwrap();
        store.inner_mut().set("session:someday", "{}").unwrap();
        store.save_stats(&json!({"played": 2})).unwrap();

        let statuses = store.list_statuses();
        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[&date(9)], PuzzleStatus { completed: false, failed: false, timestamp: 1_700_000_000_000 });
        assert!(statuses[&date(10)].completed);
    }

    #[test]
    fn test_stats_do_not_collide_with_sessions() {
        let mut store = store();
        store.save_stats(&json!({"streak": 3})).unwrap();
        store.apply(played_session(9).persist_command()).unwrap();

        assert_eq!(store.load_stats(), Some(json!({"streak": 3})));
        assert!(store.list_statuses().contains_key(&date(9)));
        assert_ne!(session_key(date(9)), STATS_KEY);
    }
}
