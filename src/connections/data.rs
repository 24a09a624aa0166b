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
use lazy_static::lazy_static;
use rust_embed::RustEmbed;
use std::str::Utf8Error;
use thiserror::Error;
use super::{date::*, puzzle::*};

pub const EMBED_DATA_DIRECTORY: &str = "puzzle_data/";
pub const FALLBACK_PUZZLES_FILE_NAME: &str = "fallback_puzzles.json";

lazy_static! {
    pub static ref FALLBACK: Vec<Puzzle> = read_fallback_puzzles().expect("embedded fallback puzzles should be valid...");
}

#[derive(RustEmbed)]
#[folder = "puzzle_data/"]
struct RawData;

#[derive(Error, Debug)]
pub enum LoadDataErr {
    #[error("missing fallback puzzles file")]
    MissingFallbackFile,
    #[error("no fallback puzzles defined")]
    NoFallbackPuzzles,
    #[error(transparent)]
    EncodingError(#[from] Utf8Error),
    #[error(transparent)]
    MalformedJson(#[from] serde_json::Error),
}

///
/// The static puzzle to use for a date when nothing could be retrieved. Dates rotate through the
/// embedded puzzles by puzzle number; dates from before the first game use the first puzzle.
///
/// Nothing calls this implicitly, falling back is always the caller's choice.
///
pub fn fallback_puzzle(date: PuzzleDate) -> &'static Puzzle {
    let index = date.puzzle_number().unwrap_or(0) as usize % FALLBACK.len();
    &FALLBACK[index]
}

fn read_fallback_puzzles() -> Result<Vec<Puzzle>, LoadDataErr> {
    let raw = retrieve_file_as_str(FALLBACK_PUZZLES_FILE_NAME)?.ok_or(LoadDataErr::MissingFallbackFile)?;
    // Puzzle's Deserialize runs the same validation as Puzzle::new
    let out: Vec<Puzzle> = serde_json::from_str(&raw)?;
    if out.is_empty() {
        return Err(LoadDataErr::NoFallbackPuzzles);
    }

    log::debug!("got {} fallback puzzles from data file", out.len());
    Ok(out)
}

fn retrieve_file_as_str(name: &str) -> Result<Option<String>, LoadDataErr> {
    let f: rust_embed::EmbeddedFile = if let Some(data) = RawData::get(name) {
        data
    } else {
        #[cfg(not(target_arch = "wasm32"))]
        if let Ok(out) = std::fs::read_to_string(format!("{}{}", EMBED_DATA_DIRECTORY, name)) {
            return Ok(Some(out));
        }

        return Ok(None);
    };

    Ok(Some(std::str::from_utf8(&f.data)?.to_string()))
}
