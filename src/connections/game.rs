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
use std::collections::HashSet;
use thiserror::Error;
use super::{date::*, prelude::*, puzzle::*, store::SessionSnapshot};

///
/// A single submitted selection of K words.
///
/// The words are stored using the puzzle's own spelling (see Puzzle::canonical_word) in the order
/// the player selected them. Two guesses with the same words in another order are the same guess.
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Guess {
    words: Vec<String>,
}

impl Guess {
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Whether the guess holds exactly the words of the category (in any order)
    pub fn matches(&self, category: &Category, policy: MatchPolicy) -> bool {
        self.words.len() == category.words.len() && self.overlap(category, policy) == self.words.len()
    }

    /// How many of the guessed words belong to the category
    pub fn overlap(&self, category: &Category, policy: MatchPolicy) -> usize {
        self.words.iter().filter(|w| category.contains(w, policy)).count()
    }
}

impl From<Vec<String>> for Guess {
    fn from(words: Vec<String>) -> Self {
        Self { words }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

/// What a single accepted guess turned out to be
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// the guess was exactly this (previously unsolved) category
    Correct(Category),
    /// not a match, but all except one of the words belong to a single unsolved category
    OneAway,
    Incorrect,
}

impl Verdict {
    pub fn is_correct(&self) -> bool {
        matches!(self, Verdict::Correct(_))
    }
}

///
/// Returned by every accepted mutation. The session never writes to storage itself, whoever owns
/// the session is expected to hand this to a SnapshotStore (see SnapshotStore::apply).
///
#[derive(Clone, Debug, PartialEq)]
pub struct PersistCommand {
    pub date: PuzzleDate,
    pub snapshot: SessionSnapshot,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GuessOutcome {
    pub verdict: Verdict,
    pub status: GameStatus,
    pub mistakes: usize,
    pub persist: PersistCommand,
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuessErr {
    #[error("a guess needs exactly {expected} words, got {got}")]
    InvalidGuessSize { expected: usize, got: usize },
    #[error("'{0}' was selected more than once")]
    DuplicateWord(String),
    #[error("'{0}' is not one of today's words")]
    UnknownWord(String),
    #[error("the game is already over")]
    GameOver,
}

/// How Session::initialize dealt with the snapshot it was given
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// progress was restored from the snapshot
    Restored,
    /// there was no snapshot, so the session starts empty
    Fresh,
    /// the snapshot was recorded against a different version of the puzzle, and was discarded
    Stale,
    /// the snapshot doesn't describe a session that could have happened, and was discarded
    Corrupt(String),
}

///
/// The state of one player's attempt at one day's puzzle.
///
/// The invariants maintained here at all times:
///   * solved holds indices into the puzzle's categories, each at most once, in solve order
///   * every solved category was also recorded in submitted_guesses, so
///     mistakes = submitted_guesses.len() - solved.len() never underflows
///   * status is Won when everything is solved, Lost when the mistakes reach the budget
///     (and it isn't Won), otherwise InProgress
///
#[derive(Clone, Debug)]
pub struct Session {
    date: PuzzleDate,
    puzzle: Puzzle,
    config: GameConfig,
    submitted_guesses: Vec<Guess>,
    solved: Vec<usize>,
    status: GameStatus,
}

impl Session {
    /// A brand new session, no guesses made yet
    pub fn new(date: PuzzleDate, puzzle: Puzzle, config: GameConfig) -> Self {
        Self {
            date,
            puzzle,
            config,
            submitted_guesses: Vec::new(),
            solved: Vec::new(),
            status: GameStatus::InProgress,
        }
    }

    ///
    /// Builds the session for a freshly loaded puzzle, picking up where the snapshot left off when
    /// the snapshot still belongs to this puzzle.
    ///
    /// The saved guesses are replayed against the puzzle instead of trusting the saved solved list
    /// or completed/failed flags, and the snapshot is only accepted if the replay agrees with it.
    /// Any doubt at all and the whole snapshot is dropped: a partially restored session is never
    /// produced.
    ///
    pub fn initialize(
        date: PuzzleDate,
        puzzle: Puzzle,
        restored: Option<SessionSnapshot>,
        config: GameConfig,
    ) -> (Self, RestoreOutcome) {
        let mut session = Self::new(date, puzzle, config);
        let snapshot = match restored {
            Some(snapshot) => snapshot,
            None => return (session, RestoreOutcome::Fresh),
        };

        let outcome = match session.replay(&snapshot) {
            Ok(()) => {
                log::debug!(
                    "restored {} guesses ({} solved) for {}",
                    session.submitted_guesses.len(),
                    session.solved.len(),
                    date,
                );
                RestoreOutcome::Restored
            }
            Err(outcome) => {
                match &outcome {
                    RestoreOutcome::Stale => {
                        log::info!("saved progress for {} was for a different puzzle, starting over", date)
                    }
                    RestoreOutcome::Corrupt(reason) => {
                        log::warn!("discarding saved progress for {}: {}", date, reason)
                    }
                    _ => {}
                }
                session.reset();
                outcome
            }
        };

        (session, outcome)
    }

    fn replay(&mut self, snapshot: &SessionSnapshot) -> Result<(), RestoreOutcome> {
        if snapshot.puzzle_date != self.date {
            return Err(RestoreOutcome::Corrupt(format!(
                "snapshot is for {}",
                snapshot.puzzle_date
            )));
        }

        if !same_definition(self.puzzle.categories(), &snapshot.game_data) {
            return Err(RestoreOutcome::Stale);
        }

        let policy = self.config.match_policy;
        for (idx, guess) in snapshot.submitted_guesses.iter().enumerate() {
            if !is_guess_from_puzzle(&self.puzzle, guess.words(), policy) {
                return Err(RestoreOutcome::Corrupt(format!("guess #{} is not from this puzzle", idx + 1)));
            }

            if self.status.is_terminal() {
                return Err(RestoreOutcome::Corrupt(format!("guess #{} was made after the game ended", idx + 1)));
            }

            let words = guess
                .words()
                .iter()
                .filter_map(|w| self.puzzle.canonical_word(w, policy))
                .map(str::to_string)
                .collect::<Vec<_>>();
            self.record(Guess::from(words));
        }

        let solved = self.solved_categories().cloned().collect::<Vec<_>>();
        if !same_definition(&solved, &snapshot.solved_game_data) {
            return Err(RestoreOutcome::Corrupt("solved categories don't match the guesses".to_string()));
        }

        Ok(())
    }

    ///
    /// Submits a selection of words.
    ///
    /// Rejected selections (wrong size, a word picked twice, words not in the puzzle, game already
    /// over) leave the session untouched. Accepted ones are always recorded in the guess history,
    /// and additionally solve a category when the words are exactly that category.
    ///
    pub fn submit_guess<S: AsRef<str>>(&mut self, candidate: &[S]) -> Result<GuessOutcome, GuessErr> {
        if self.is_game_over() {
            return Err(GuessErr::GameOver);
        }

        let policy = self.config.match_policy;
        let expected = self.category_size();
        if candidate.len() != expected {
            return Err(GuessErr::InvalidGuessSize { expected, got: candidate.len() });
        }

        let mut seen = HashSet::with_capacity(expected);
        let mut words = Vec::with_capacity(expected);
        for word in candidate.iter().map(|w| w.as_ref()) {
            if !seen.insert(policy.key(word)) {
                return Err(GuessErr::DuplicateWord(word.to_string()));
            }

            let canonical = self
                .puzzle
                .canonical_word(word, policy)
                .ok_or_else(|| GuessErr::UnknownWord(word.to_string()))?;
            words.push(canonical.to_string());
        }

        let verdict = self.record(Guess::from(words));
        log::debug!(
            "guess #{} for {}: {:?}, {} mistakes, {:?}",
            self.submitted_guesses.len(),
            self.date,
            &verdict,
            self.mistakes(),
            self.status,
        );

        Ok(GuessOutcome {
            verdict,
            status: self.status,
            mistakes: self.mistakes(),
            persist: self.persist_command(),
        })
    }

    /// Records an already validated guess and updates the status
    fn record(&mut self, guess: Guess) -> Verdict {
        let policy = self.config.match_policy;
        let matched = self
            .unsolved_indices()
            .find(|idx| guess.matches(&self.puzzle.categories()[*idx], policy));

        let verdict = if let Some(idx) = matched {
            self.solved.push(idx);
            Verdict::Correct(self.puzzle.categories()[idx].clone())
        } else {
            let size = self.category_size();
            let one_away = size > 1
                && self
                    .unsolved_indices()
                    .any(|idx| guess.overlap(&self.puzzle.categories()[idx], policy) == size - 1);
            if one_away {
                Verdict::OneAway
            } else {
                Verdict::Incorrect
            }
        };

        self.submitted_guesses.push(guess);
        self.recompute_status();
        verdict
    }

    fn recompute_status(&mut self) {
        self.status = if self.solved.len() == self.num_categories() {
            GameStatus::Won
        } else if self.mistakes() >= self.config.max_mistakes {
            GameStatus::Lost
        } else {
            GameStatus::InProgress
        };
    }

    ///
    /// Clears all guesses and returns to the starting state. Nothing is written to storage: saved
    /// progress for this date is replaced the next time a guess is accepted.
    ///
    pub fn reset(&mut self) {
        self.submitted_guesses.clear();
        self.solved.clear();
        self.status = GameStatus::InProgress;
    }

    pub fn date(&self) -> PuzzleDate {
        self.date
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn is_won(&self) -> bool {
        self.status == GameStatus::Won
    }

    pub fn category_size(&self) -> usize {
        self.puzzle.category_size()
    }

    pub fn num_categories(&self) -> usize {
        self.puzzle.num_categories()
    }

    pub fn mistakes(&self) -> usize {
        self.submitted_guesses.len() - self.solved.len()
    }

    pub fn mistakes_remaining(&self) -> usize {
        self.config.max_mistakes.saturating_sub(self.mistakes())
    }

    pub fn submitted_guesses(&self) -> &[Guess] {
        &self.submitted_guesses
    }

    /// The solved categories, in the order they were solved
    pub fn solved_categories(&self) -> impl Iterator<Item = &Category> + '_ {
        self.solved.iter().map(|idx| &self.puzzle.categories()[*idx])
    }

    /// The categories not solved yet, in puzzle order
    pub fn unsolved_categories(&self) -> impl Iterator<Item = &Category> + '_ {
        self.unsolved_indices().map(|idx| &self.puzzle.categories()[idx])
    }

    fn unsolved_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.num_categories()).filter(|idx| !self.solved.contains(idx))
    }

    ///
    /// Captures the session as a snapshot. The timestamp is left at 0, the store stamps snapshots as
    /// they are written.
    ///
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            puzzle_date: self.date,
            submitted_guesses: self.submitted_guesses.clone(),
            solved_game_data: self.solved_categories().cloned().collect(),
            game_data: self.puzzle.categories().to_vec(),
            completed: self.status == GameStatus::Won,
            failed: self.status == GameStatus::Lost,
            timestamp: 0,
        }
    }

    pub fn persist_command(&self) -> PersistCommand {
        PersistCommand {
            date: self.date,
            snapshot: self.snapshot(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connections::puzzle::tests::{abcd_puzzle, words};
    use test_case::test_case;

    fn today() -> PuzzleDate {
        PuzzleDate::new(2024, 3, 9).unwrap()
    }

    fn new_session() -> Session {
        Session::new(today(), abcd_puzzle(), GameConfig::default())
    }

    fn category_words(prefix: &str) -> Vec<String> {
        (1..=4).map(|n| format!("{}{}", prefix, n)).collect()
    }

    fn assert_invariants(session: &Session) {
        assert!(session.submitted_guesses().len() >= session.solved_categories().count());
        assert!(session.mistakes() <= MAX_MISTAKES);
        let solved = session.solved_categories().map(|c| c.name.clone()).collect::<HashSet<_>>();
        assert_eq!(solved.len(), session.solved_categories().count(), "no category solved twice");
    }

    #[test]
    fn test_mistakes_scenario_ends_in_loss() {
        let mut session = new_session();

        let outcome = session.submit_guess(&category_words("a")).unwrap();
        assert!(outcome.verdict.is_correct());
        assert_eq!(session.mistakes(), 0);
        assert_eq!(session.solved_categories().map(|c| c.name.as_str()).collect::<Vec<_>>(), ["A"]);

        session.submit_guess(&["a1", "b1", "c1", "d1"]).unwrap();
        assert_eq!(session.mistakes(), 1);

        for guess in [["b1", "b2", "c1", "c2"], ["c3", "c4", "d1", "d2"], ["b3", "d3", "d4", "c1"]] {
            assert_eq!(session.status(), GameStatus::InProgress, "not lost before the 4th mistake");
            session.submit_guess(&guess).unwrap();
            assert_invariants(&session);
        }

        assert_eq!(session.mistakes(), 4);
        assert_eq!(session.status(), GameStatus::Lost);
        assert!(!session.is_won());
        assert_eq!(session.submit_guess(&category_words("b")), Err(GuessErr::GameOver));
        assert_eq!(session.mistakes(), 4, "no further guesses accepted once lost");
    }

    #[test_case(["a", "b", "c", "d"])]
    #[test_case(["d", "c", "b", "a"])]
    #[test_case(["b", "d", "a", "c"])]
    fn test_four_correct_guesses_win(order: [&str; 4]) {
        let mut session = new_session();
        for (idx, prefix) in order.iter().enumerate() {
            assert!(!session.is_won());
            let outcome = session.submit_guess(&category_words(prefix)).unwrap();
            assert!(outcome.verdict.is_correct());
            assert_eq!(outcome.mistakes, 0);
            assert_eq!(session.solved_categories().count(), idx + 1);
        }

        assert_eq!(session.status(), GameStatus::Won);
        let solved = session.solved_categories().map(|c| c.name.to_lowercase()).collect::<Vec<_>>();
        assert_eq!(solved, order, "solved in the order guessed");
    }

    #[test]
    fn test_guess_order_does_not_matter() {
        let mut session = new_session();
        let outcome = session.submit_guess(&["a3", "a1", "a4", "a2"]).unwrap();
        assert!(outcome.verdict.is_correct());
    }

    #[test]
    fn test_invalid_size_changes_nothing() {
        let mut session = new_session();
        assert_eq!(
            session.submit_guess(&["a1", "a2", "a3"]),
            Err(GuessErr::InvalidGuessSize { expected: 4, got: 3 })
        );
        assert_eq!(
            session.submit_guess(&["a1", "a2", "a3", "a4", "b1"]),
            Err(GuessErr::InvalidGuessSize { expected: 4, got: 5 })
        );
        assert!(session.submitted_guesses().is_empty());
        assert_eq!(session.status(), GameStatus::InProgress);
    }

    #[test]
    fn test_repeated_words_are_not_collapsed() {
        let mut session = new_session();
        assert_eq!(
            session.submit_guess(&["a1", "a1", "a2", "a3", "a4"]),
            Err(GuessErr::InvalidGuessSize { expected: 4, got: 5 })
        );
        assert_eq!(
            session.submit_guess(&["a1", "a2", "a3", "a3"]),
            Err(GuessErr::DuplicateWord("a3".to_string()))
        );
        assert!(session.submitted_guesses().is_empty());
        assert_eq!(session.mistakes(), 0);
        assert_eq!(session.solved_categories().count(), 0);
    }

    #[test]
    fn test_repeated_words_under_policy() {
        let config = GameConfig {
            match_policy: MatchPolicy::CaseInsensitive,
            ..GameConfig::default()
        };
        let mut session = Session::new(today(), abcd_puzzle(), config);
        assert_eq!(
            session.submit_guess(&["a1", "A1", "a2", "a3"]),
            Err(GuessErr::DuplicateWord("A1".to_string()))
        );
        assert!(!session.is_game_over());
    }

    #[test]
    fn test_unknown_word_changes_nothing() {
        let mut session = new_session();
        assert_eq!(
            session.submit_guess(&["a1", "a2", "a3", "zebra"]),
            Err(GuessErr::UnknownWord("zebra".to_string()))
        );
        assert!(session.submitted_guesses().is_empty());
    }

    #[test]
    fn test_solved_category_counts_as_mistake_when_guessed_again() {
        let mut session = new_session();
        session.submit_guess(&category_words("a")).unwrap();
        let again = session.submit_guess(&category_words("a")).unwrap();
        assert!(!again.verdict.is_correct());
        assert_eq!(session.mistakes(), 1);
        assert_eq!(session.solved_categories().count(), 1);
    }

    #[test]
    fn test_one_away() {
        let mut session = new_session();
        let outcome = session.submit_guess(&["a1", "a2", "a3", "b1"]).unwrap();
        assert_eq!(outcome.verdict, Verdict::OneAway);
        let outcome = session.submit_guess(&["a1", "a2", "b2", "b1"]).unwrap();
        assert_eq!(outcome.verdict, Verdict::Incorrect);
        assert_eq!(session.mistakes(), 2);
    }

    #[test]
    fn test_match_policy() {
        let config = GameConfig {
            match_policy: MatchPolicy::Normalized,
            ..GameConfig::default()
        };
        let mut session = Session::new(today(), abcd_puzzle(), config);
        let outcome = session.submit_guess(&[" A1", "a2 ", "A3", "a4"]).unwrap();
        assert!(outcome.verdict.is_correct());
        assert_eq!(session.submitted_guesses()[0].words(), category_words("a").as_slice());

        let mut exact = new_session();
        assert_eq!(
            exact.submit_guess(&["A1", "a2", "a3", "a4"]),
            Err(GuessErr::UnknownWord("A1".to_string()))
        );
    }

    #[test]
    fn test_outcome_carries_snapshot() {
        let mut session = new_session();
        session.submit_guess(&category_words("a")).unwrap();
        let outcome = session.submit_guess(&["a1", "b1", "c1", "d1"]).unwrap();
        assert_eq!(outcome.persist.date, today());
        let snapshot = outcome.persist.snapshot;
        assert_eq!(snapshot.submitted_guesses.len(), 2);
        assert_eq!(snapshot.solved_game_data.len(), 1);
        assert!(same_definition(&snapshot.game_data, abcd_puzzle().categories()));
        assert!(!snapshot.completed);
        assert!(!snapshot.failed);
    }

    #[test]
    fn test_restore_reproduces_state() {
        let mut session = new_session();
        session.submit_guess(&category_words("c")).unwrap();
        session.submit_guess(&["a1", "b1", "c1", "d1"]).unwrap();
        session.submit_guess(&category_words("a")).unwrap();
        let snapshot = session.snapshot();

        let (restored, outcome) = Session::initialize(today(), abcd_puzzle(), Some(snapshot), GameConfig::default());
        assert_eq!(outcome, RestoreOutcome::Restored);
        assert_eq!(restored.submitted_guesses(), session.submitted_guesses());
        assert!(same_definition(
            &restored.solved_categories().cloned().collect::<Vec<_>>(),
            &session.solved_categories().cloned().collect::<Vec<_>>(),
        ));
        assert_eq!(restored.status(), session.status());
        assert_eq!(restored.mistakes(), 1);
    }

    #[test]
    fn test_restore_terminal_status_is_recomputed() {
        let mut session = new_session();
        for prefix in ["a", "b", "c", "d"] {
            session.submit_guess(&category_words(prefix)).unwrap();
        }
        let mut snapshot = session.snapshot();
        snapshot.completed = false;
        snapshot.failed = true;

        let (restored, outcome) = Session::initialize(today(), abcd_puzzle(), Some(snapshot), GameConfig::default());
        assert_eq!(outcome, RestoreOutcome::Restored);
        assert_eq!(restored.status(), GameStatus::Won);
    }

    #[test]
    fn test_restore_discards_snapshot_for_changed_puzzle() {
        let mut session = new_session();
        session.submit_guess(&category_words("a")).unwrap();
        let mut snapshot = session.snapshot();
        snapshot.game_data[3].words[0] = "d9".to_string();

        let (restored, outcome) = Session::initialize(today(), abcd_puzzle(), Some(snapshot), GameConfig::default());
        assert_eq!(outcome, RestoreOutcome::Stale);
        assert!(restored.submitted_guesses().is_empty());
        assert_eq!(restored.solved_categories().count(), 0);
        assert_eq!(restored.status(), GameStatus::InProgress);
    }

    #[test]
    fn test_restore_discards_inconsistent_snapshot() {
        let mut session = new_session();
        session.submit_guess(&["a1", "b1", "c1", "d1"]).unwrap();
        let mut snapshot = session.snapshot();
        // claims a solve that the guesses never produced
        snapshot.solved_game_data.push(abcd_puzzle().categories()[0].clone());

        let (restored, outcome) = Session::initialize(today(), abcd_puzzle(), Some(snapshot), GameConfig::default());
        assert!(matches!(outcome, RestoreOutcome::Corrupt(_)));
        assert!(restored.submitted_guesses().is_empty());
    }

    #[test]
    fn test_restore_discards_foreign_guesses() {
        let mut snapshot = new_session().snapshot();
        snapshot.submitted_guesses.push(Guess::from(words(&["a1", "a2", "a3"])));
        let (_, outcome) = Session::initialize(today(), abcd_puzzle(), Some(snapshot.clone()), GameConfig::default());
        assert!(matches!(outcome, RestoreOutcome::Corrupt(_)));

        snapshot.submitted_guesses = vec![Guess::from(words(&["a1", "a2", "a3", "x1"]))];
        let (_, outcome) = Session::initialize(today(), abcd_puzzle(), Some(snapshot), GameConfig::default());
        assert!(matches!(outcome, RestoreOutcome::Corrupt(_)));
    }

    #[test]
    fn test_restore_rejects_guesses_after_the_end() {
        let mut session = new_session();
        for guess in [["a1", "b1", "c1", "d1"], ["a2", "b2", "c2", "d2"], ["a3", "b3", "c3", "d3"], ["a4", "b4", "c4", "d4"]] {
            session.submit_guess(&guess).unwrap();
        }
        let mut snapshot = session.snapshot();
        snapshot.submitted_guesses.push(Guess::from(category_words("a")));
        snapshot.solved_game_data.push(abcd_puzzle().categories()[0].clone());

        let (_, outcome) = Session::initialize(today(), abcd_puzzle(), Some(snapshot), GameConfig::default());
        assert!(matches!(outcome, RestoreOutcome::Corrupt(_)));
    }

    #[test]
    fn test_reset() {
        let mut session = new_session();
        session.submit_guess(&["a1", "b1", "c1", "d1"]).unwrap();
        session.reset();
        assert!(session.submitted_guesses().is_empty());
        assert_eq!(session.mistakes_remaining(), MAX_MISTAKES);
        assert_eq!(session.status(), GameStatus::InProgress);
    }
}
