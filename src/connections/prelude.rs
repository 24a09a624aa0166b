// This file allows you to configure some of the constants that define the game.
//
// The size of a puzzle (how many categories, how many words in each) is never configured here,
// it is always read from the puzzle data itself.

use serde::{Deserialize, Serialize};

// how many incorrect guesses end the game?
pub const MAX_MISTAKES: usize = 4;
// the conventional number of words in a category (and in a guess)
pub const DEFAULT_CATEGORY_SIZE: usize = 4;
// what we call the game in the share text
pub const GAME_TITLE: &str = "Connections";

// keys in the key-value store... everything we write lives under one of these
pub const SESSION_KEY_PREFIX: &str = "session:";
pub const STATS_KEY: &str = "stats:global";
pub const PUZZLE_CACHE_KEY: &str = "cache:puzzles";

// how long fetched puzzle data is considered fresh, in milliseconds (24 hours)
pub const PUZZLE_CACHE_TTL_MS: u64 = 24 * 60 * 60 * 1000;

// retrieval is attempted this many times before giving up
pub const MAX_FETCH_ATTEMPTS: usize = 3;
// delay before the first retry, doubled for each one after that
pub const INITIAL_RETRY_DELAY_MS: u64 = 2000;

///
/// How the words in a submitted guess are compared to the words in the puzzle.
///
/// Words coming from the UI are normally the exact strings from the puzzle data (the player
/// clicks tiles, they don't type), so Exact is the default.
///
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MatchPolicy {
    #[default]
    Exact,
    CaseInsensitive,
    /// trims surrounding whitespace and ignores case
    Normalized,
}

impl MatchPolicy {
    /// Produces the comparison key for a word under this policy
    pub fn key(&self, word: &str) -> String {
        match self {
            MatchPolicy::Exact => word.to_string(),
            MatchPolicy::CaseInsensitive => word.to_lowercase(),
            MatchPolicy::Normalized => normalize_word(word),
        }
    }
}

/// Runtime knobs for a game session and for the text we share.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub max_mistakes: usize,
    pub match_policy: MatchPolicy,
    pub title: String,
    /// whether the share text should end with a link back to the game
    pub include_link: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_mistakes: MAX_MISTAKES,
            match_policy: MatchPolicy::default(),
            title: GAME_TITLE.to_string(),
            include_link: true,
        }
    }
}

/// Cleans up a word by removing spacing around it and converting it to lowercase.
pub fn normalize_word(word: &str) -> String {
    word.trim().to_lowercase()
}

pub use crate::util::*;
