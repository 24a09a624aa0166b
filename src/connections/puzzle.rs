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
use super::prelude::*;

///
/// One of the groups of words in a puzzle. Every word belongs to exactly one category.
///
/// The field is called "category" on the wire because that's what the puzzle spreadsheet calls
/// the column.
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "category")]
    pub name: String,
    pub words: Vec<String>,
    pub difficulty: u8,
}

impl Category {
    pub fn new<N, I, W>(name: N, words: I, difficulty: u8) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = W>,
        W: Into<String>,
    {
        Self {
            name: name.into(),
            words: words.into_iter().map(Into::into).collect(),
            difficulty,
        }
    }

    pub fn contains(&self, word: &str, policy: MatchPolicy) -> bool {
        let key = policy.key(word);
        self.words.iter().any(|w| policy.key(w) == key)
    }
}

///
/// A full day's puzzle: N categories of K words each.
///
/// A Puzzle can only be built through Puzzle::new (or deserialization, which goes through the same
/// checks), so any Puzzle you hold has at least one category, all categories are the same size, and
/// no word appears twice. Words are compared after trimming and lowercasing, so the puzzle stays
/// solvable under every MatchPolicy.
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Category>", into = "Vec<Category>")]
pub struct Puzzle {
    categories: Vec<Category>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleErr {
    #[error("a puzzle needs at least one category")]
    NoCategories,
    #[error("category '{0}' has no words")]
    EmptyCategory(String),
    #[error("category '{name}' has {got} words, expected {expected}")]
    MismatchedCategorySize { name: String, expected: usize, got: usize },
    #[error("the word '{0}' appears more than once")]
    DuplicateWord(String),
}

impl Puzzle {
    pub fn new(categories: Vec<Category>) -> Result<Self, PuzzleErr> {
        let first = categories.first().ok_or(PuzzleErr::NoCategories)?;
        let expected = first.words.len();
        if expected == 0 {
            return Err(PuzzleErr::EmptyCategory(first.name.clone()));
        }

        let mut seen = HashSet::with_capacity(expected * categories.len());
        for category in &categories {
            if category.words.len() != expected {
                return Err(PuzzleErr::MismatchedCategorySize {
                    name: category.name.clone(),
                    expected,
                    got: category.words.len(),
                });
            }

            for word in &category.words {
                if !seen.insert(normalize_word(word)) {
                    return Err(PuzzleErr::DuplicateWord(word.clone()));
                }
            }
        }

        Ok(Self { categories })
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// K, the number of words in every category (and so in every guess)
    pub fn category_size(&self) -> usize {
        self.categories[0].words.len()
    }

    /// N, the number of categories
    pub fn num_categories(&self) -> usize {
        self.categories.len()
    }

    /// All N*K words, category by category
    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.categories
            .iter()
            .flat_map(|c| c.words.iter().map(|w| w.as_str()))
    }

    /// Finds the category containing a word (None when the word isn't part of this puzzle)
    pub fn category_of(&self, word: &str, policy: MatchPolicy) -> Option<&Category> {
        self.categories.iter().find(|c| c.contains(word, policy))
    }

    /// Returns the puzzle's spelling of a word, if the word is in the puzzle under the policy
    pub fn canonical_word(&self, word: &str, policy: MatchPolicy) -> Option<&str> {
        let key = policy.key(word);
        self.words().find(|w| policy.key(w) == key)
    }
}

impl TryFrom<Vec<Category>> for Puzzle {
    type Error = PuzzleErr;

    fn try_from(categories: Vec<Category>) -> Result<Self, Self::Error> {
        Self::new(categories)
    }
}

impl From<Puzzle> for Vec<Category> {
    fn from(puzzle: Puzzle) -> Self {
        puzzle.categories
    }
}

///
/// Structural comparison of two puzzle definitions.
///
/// Categories are compared position by position: same name, same words in the same order, same
/// difficulty. Any difference at all (including the categories being listed in another order)
/// means the definitions differ. This is what decides whether saved progress still belongs to the
/// puzzle that was just loaded.
///
pub fn same_definition(a: &[Category], b: &[Category]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b.iter()).all(|(x, y)| {
            x.name == y.name
                && x.difficulty == y.difficulty
                && x.words.len() == y.words.len()
                && x.words.iter().zip(y.words.iter()).all(|(wx, wy)| wx == wy)
        })
}

///
/// Checks that a single guess is a valid selection for the puzzle: exactly K distinct words, all of
/// which are in the puzzle.
///
pub fn is_guess_from_puzzle(puzzle: &Puzzle, guess: &[String], policy: MatchPolicy) -> bool {
    if guess.len() != puzzle.category_size() {
        return false;
    }

    let mut seen = HashSet::with_capacity(guess.len());
    guess.iter().all(|word| {
        puzzle.canonical_word(word, policy).is_some() && seen.insert(policy.key(word))
    })
}
