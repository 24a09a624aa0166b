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
use rand::seq::SliceRandom;
use rand::Rng;
use super::puzzle::Category;

///
/// Lays out the tiles for the categories which haven't been solved yet.
///
/// All of their words are flattened and shuffled together, so the grouping isn't visible. The
/// output always holds exactly the input words: nothing is added, dropped or repeated.
///
pub struct TileShuffler<R> {
    rng: R,
}

impl TileShuffler<rand::rngs::ThreadRng> {
    pub fn new() -> Self {
        Self::with_rng(rand::thread_rng())
    }
}

impl Default for TileShuffler<rand::rngs::ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> TileShuffler<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    pub fn shuffle<'a, I>(&mut self, unsolved: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a Category>,
    {
        let mut tiles = unsolved
            .into_iter()
            .flat_map(|c| c.words.iter().cloned())
            .collect::<Vec<_>>();
        tiles.shuffle(&mut self.rng);
        tiles
    }
}
