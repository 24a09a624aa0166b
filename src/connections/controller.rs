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
use instant::Instant;
use rand::rngs::ThreadRng;
use rand::Rng;
use thiserror::Error;
use super::{
    data::fallback_puzzle, date::*, game::*, prelude::*, puzzle::*, share::session_share_text, shuffle::*,
    source::*, store::*,
};

/// Handed out by begin_load, and required to finish that load
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    pub date: PuzzleDate,
    generation: u64,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadErr {
    #[error("the load for {0} was superseded by a newer one")]
    Stale(PuzzleDate),
    #[error("there is no puzzle for {0}")]
    NoPuzzle(PuzzleDate),
    #[error(transparent)]
    Retrieval(#[from] SourceErr),
    #[error(transparent)]
    InvalidPuzzle(#[from] PuzzleErr),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlayErr {
    #[error("no puzzle is loaded")]
    NoSession,
    #[error(transparent)]
    Guess(#[from] GuessErr),
}

struct ActiveGame {
    session: Session,
    tiles: Vec<String>,
}

///
/// Owns the session for whichever date is currently being played.
///
/// Loading is split in two so that retrieval can happen without holding on to the controller:
/// begin_load marks a date as active and returns a ticket, finish_load takes the ticket and the
/// retrieval result. Only the most recently issued ticket is accepted. Anything older is
/// discarded, so a slow response for yesterday can never overwrite the session for today.
///
pub struct SessionController<R = ThreadRng> {
    config: GameConfig,
    active_date: Option<PuzzleDate>,
    generation: u64,
    game: Option<ActiveGame>,
    shuffler: TileShuffler<R>,
}

impl SessionController<ThreadRng> {
    pub fn new(config: GameConfig) -> Self {
        Self::with_shuffler(config, TileShuffler::new())
    }
}

impl<R: Rng> SessionController<R> {
    pub fn with_shuffler(config: GameConfig, shuffler: TileShuffler<R>) -> Self {
        Self {
            config,
            active_date: None,
            generation: 0,
            game: None,
            shuffler,
        }
    }

    pub fn begin_load(&mut self, date: PuzzleDate) -> LoadTicket {
        self.generation += 1;
        self.active_date = Some(date);
        if self.game.as_ref().map(|g| g.session.date() != date).unwrap_or(false) {
            self.game = None;
        }

        log::debug!("loading puzzle for {} (load #{})", date, self.generation);
        LoadTicket {
            date,
            generation: self.generation,
        }
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.generation && self.active_date == Some(ticket.date)
    }

    /// Starts the session for the ticket's date from a retrieval result, restoring saved progress
    pub fn finish_load<S: KeyValueStore, C: Clock>(
        &mut self,
        ticket: LoadTicket,
        result: Result<Option<Puzzle>, SourceErr>,
        store: &SnapshotStore<S, C>,
    ) -> Result<RestoreOutcome, LoadErr> {
        self.check_current(&ticket)?;
        let puzzle = result?.ok_or(LoadErr::NoPuzzle(ticket.date))?;
        Ok(self.start(ticket.date, puzzle, store))
    }

    /// Like finish_load, for puzzle data that hasn't been validated yet
    pub fn finish_load_categories<S: KeyValueStore, C: Clock>(
        &mut self,
        ticket: LoadTicket,
        categories: Vec<Category>,
        store: &SnapshotStore<S, C>,
    ) -> Result<RestoreOutcome, LoadErr> {
        self.check_current(&ticket)?;
        let puzzle = Puzzle::new(categories)?;
        Ok(self.start(ticket.date, puzzle, store))
    }

    /// Starts the ticket's session with the embedded puzzle for its date
    pub fn finish_with_fallback<S: KeyValueStore, C: Clock>(
        &mut self,
        ticket: LoadTicket,
        store: &SnapshotStore<S, C>,
    ) -> Result<RestoreOutcome, LoadErr> {
        self.check_current(&ticket)?;
        log::info!("using the fallback puzzle for {}", ticket.date);
        Ok(self.start(ticket.date, fallback_puzzle(ticket.date).clone(), store))
    }

    ///
    /// begin_load, retrieval and finish_load in one go. This holds the controller for the whole
    /// retrieval, callers that need to switch dates while a load is in flight should use the
    /// split calls instead.
    ///
    pub async fn load<P: PuzzleSource, S: KeyValueStore, C: Clock>(
        &mut self,
        date: PuzzleDate,
        source: &P,
        store: &SnapshotStore<S, C>,
    ) -> Result<RestoreOutcome, LoadErr> {
        let ticket = self.begin_load(date);
        let start = Instant::now();
        let result = source.fetch_puzzle_for_date(date).await;
        log::debug!("retrieval for {} took {}ms", date, start.elapsed().as_millis());
        self.finish_load(ticket, result, store)
    }

    fn check_current(&self, ticket: &LoadTicket) -> Result<(), LoadErr> {
        if self.is_current(ticket) {
            Ok(())
        } else {
            log::info!("discarding stale load for {}", ticket.date);
            Err(LoadErr::Stale(ticket.date))
        }
    }

    fn start<S: KeyValueStore, C: Clock>(
        &mut self,
        date: PuzzleDate,
        puzzle: Puzzle,
        store: &SnapshotStore<S, C>,
    ) -> RestoreOutcome {
        let (session, outcome) = Session::initialize(date, puzzle, store.load(date), self.config.clone());
        match &outcome {
            RestoreOutcome::Stale => log::info!("saved progress for {} is for an older version of the puzzle", date),
            RestoreOutcome::Corrupt(reason) => log::warn!("saved progress for {} is invalid: {}", date, reason),
            _ => log::debug!("started session for {}: {:?}", date, outcome),
        }

        let tiles = self.shuffler.shuffle(session.unsolved_categories());
        self.game = Some(ActiveGame { session, tiles });
        outcome
    }

    ///
    /// Submits a guess to the active session and saves the result. A failed save is logged and
    /// otherwise ignored, the guess still counts.
    ///
    pub fn submit_guess<W: AsRef<str>, S: KeyValueStore, C: Clock>(
        &mut self,
        words: &[W],
        store: &mut SnapshotStore<S, C>,
    ) -> Result<GuessOutcome, PlayErr> {
        let game = self.game.as_mut().ok_or(PlayErr::NoSession)?;
        let outcome = game.session.submit_guess(words)?;
        if let Err(err) = store.apply(outcome.persist.clone()) {
            log::warn!("failed to save progress for {}: {}", game.session.date(), err);
        }

        if outcome.verdict.is_correct() {
            game.tiles = self.shuffler.shuffle(game.session.unsolved_categories());
        }

        Ok(outcome)
    }

    /// Re-orders the remaining tiles
    pub fn shuffle_tiles(&mut self) -> &[String] {
        match self.game.as_mut() {
            Some(game) => {
                game.tiles = self.shuffler.shuffle(game.session.unsolved_categories());
                &game.tiles
            }
            None => &[],
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.game.as_ref().map(|g| &g.session)
    }

    /// The words still on the board, in display order
    pub fn tiles(&self) -> &[String] {
        self.game.as_ref().map(|g| g.tiles.as_slice()).unwrap_or(&[])
    }

    pub fn active_date(&self) -> Option<PuzzleDate> {
        self.active_date
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn share_text(&self, link: Option<&str>) -> Option<String> {
        self.session().map(|session| session_share_text(session, link))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connections::puzzle::tests::abcd_puzzle;
    use crate::connections::source::tests::FlakySource;
    use crate::util::tests::FixedClock;
    use futures::executor::block_on;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn date(day: u8) -> PuzzleDate {
        PuzzleDate::new(2024, 3, day).unwrap()
    }

    fn controller() -> SessionController<StdRng> {
        SessionController::with_shuffler(GameConfig::default(), TileShuffler::with_rng(StdRng::seed_from_u64(3)))
    }

    fn store() -> SnapshotStore<MemoryStore, FixedClock> {
        SnapshotStore::with_clock(MemoryStore::new(), FixedClock::new(1_710_000_000_000))
    }

    fn category(prefix: &str) -> Vec<String> {
        (1..=4).map(|n| format!("{}{}", prefix, n)).collect()
    }

    #[test]
    fn test_load_then_play() {
        let mut controller = controller();
        let mut store = store();
        let ticket = controller.begin_load(date(9));
        let outcome = controller.finish_load(ticket, Ok(Some(abcd_puzzle())), &store).unwrap();
        assert_eq!(outcome, RestoreOutcome::Fresh);
        assert_eq!(controller.tiles().len(), 16);

        let guess = controller.submit_guess(&category("c"), &mut store).unwrap();
        assert!(guess.verdict.is_correct());
        assert_eq!(controller.tiles().len(), 12);
        assert!(controller.tiles().iter().all(|w| !w.starts_with('c')));
        assert_eq!(store.load(date(9)).map(|s| s.submitted_guesses.len()), Some(1));
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let mut controller = controller();
        let store = store();
        let yesterday = controller.begin_load(date(8));
        let today = controller.begin_load(date(9));

        controller.finish_load(today, Ok(Some(abcd_puzzle())), &store).unwrap();
        let late = controller.finish_load(yesterday, Ok(Some(abcd_puzzle())), &store);
        assert_eq!(late, Err(LoadErr::Stale(date(8))));
        assert_eq!(controller.session().map(|s| s.date()), Some(date(9)));
    }

    #[test]
    fn test_reloading_same_date_supersedes_older_ticket() {
        let mut controller = controller();
        let store = store();
        let first = controller.begin_load(date(9));
        let second = controller.begin_load(date(9));
        assert!(!controller.is_current(&first));
        assert!(controller.is_current(&second));
        assert!(matches!(controller.finish_load(first, Ok(Some(abcd_puzzle())), &store), Err(LoadErr::Stale(_))));
        assert!(controller.session().is_none());
    }

    #[test]
    fn test_switching_dates_drops_old_session() {
        let mut controller = controller();
        let store = store();
        let ticket = controller.begin_load(date(9));
        controller.finish_load(ticket, Ok(Some(abcd_puzzle())), &store).unwrap();
        controller.begin_load(date(10));
        assert!(controller.session().is_none());
        assert!(controller.tiles().is_empty());
    }

    #[test]
    fn test_restores_saved_progress() {
        let mut store = store();
        let mut first = controller();
        let ticket = first.begin_load(date(9));
        first.finish_load(ticket, Ok(Some(abcd_puzzle())), &store).unwrap();
        first.submit_guess(&category("a"), &mut store).unwrap();
        first.submit_guess(&["a1", "b1", "c1", "d1"], &mut store).unwrap();

        let mut second = controller();
        let ticket = second.begin_load(date(9));
        let outcome = second.finish_load(ticket, Ok(Some(abcd_puzzle())), &store).unwrap();
        assert_eq!(outcome, RestoreOutcome::Restored);
        let session = second.session().unwrap();
        assert_eq!(session.solved_categories().count(), 1);
        assert_eq!(second.tiles().len(), 12);
    }

    #[test]
    fn test_errors_are_reported() {
        let mut controller = controller();
        let store = store();
        let ticket = controller.begin_load(date(9));
        assert_eq!(controller.finish_load(ticket, Ok(None), &store), Err(LoadErr::NoPuzzle(date(9))));

        let ticket = controller.begin_load(date(9));
        let err = controller.finish_load(ticket, Err(SourceErr::Http(500)), &store);
        assert_eq!(err, Err(LoadErr::Retrieval(SourceErr::Http(500))));

        let ticket = controller.begin_load(date(9));
        let err = controller.finish_load_categories(ticket, vec![], &store);
        assert_eq!(err, Err(LoadErr::InvalidPuzzle(PuzzleErr::NoCategories)));
        assert!(controller.session().is_none());
    }

    #[test]
    fn test_fallback() {
        let mut controller = controller();
        let store = store();
        let ticket = controller.begin_load(date(9));
        controller.finish_with_fallback(ticket, &store).unwrap();
        assert_eq!(controller.session().map(|s| s.num_categories()), Some(4));
    }

    #[test]
    fn test_guess_without_session() {
        let mut controller = controller();
        let mut store = store();
        assert_eq!(controller.submit_guess(&category("a"), &mut store).unwrap_err(), PlayErr::NoSession);
    }

    #[test]
    fn test_rejected_guess_leaves_tiles_alone() {
        let mut controller = controller();
        let mut store = store();
        let ticket = controller.begin_load(date(9));
        controller.finish_load(ticket, Ok(Some(abcd_puzzle())), &store).unwrap();
        let before = controller.tiles().to_vec();

        let err = controller.submit_guess(&["a1", "a2"], &mut store).unwrap_err();
        assert!(matches!(err, PlayErr::Guess(GuessErr::InvalidGuessSize { .. })));
        controller.submit_guess(&["a1", "a2", "a3", "b1"], &mut store).unwrap();
        assert_eq!(controller.tiles(), before.as_slice());
        assert!(store.load(date(9)).is_some());
    }

    #[test]
    fn test_shuffle_tiles_keeps_words() {
        let mut controller = controller();
        assert!(controller.shuffle_tiles().is_empty());

        let store = store();
        let ticket = controller.begin_load(date(9));
        controller.finish_load(ticket, Ok(Some(abcd_puzzle())), &store).unwrap();
        let mut before = controller.tiles().to_vec();
        let mut after = controller.shuffle_tiles().to_vec();
        before.sort();
        after.sort();
        assert_eq!(before, after);
    }

    #[test]
    fn test_async_load() {
        let mut controller = controller();
        let store = store();
        let source = FlakySource::new(0, date(9));
        let outcome = block_on(controller.load(date(9), &source, &store)).unwrap();
        assert_eq!(outcome, RestoreOutcome::Fresh);
        assert_eq!(controller.share_text(None).map(|t| t.starts_with("Connections #68")), Some(true));
    }
}
