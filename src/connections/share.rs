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
use std::fmt::{Display, Formatter};
use thiserror::Error;
use self::Tile::*;
use super::{game::*, prelude::*, puzzle::*};

///
/// The symbol used for one guessed word in the shared result. It's decided entirely by the
/// difficulty of the category that the word belongs to, so a row of four identical tiles is a
/// correct guess.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    Yellow,
    Green,
    Blue,
    Purple,
    Red,
    Orange,
    Brown,
    Black,
    /// the word isn't in the puzzle, or the difficulty is out of range
    Blank,
}

impl Tile {
    /// Tiles for difficulty 1, 2, 3, ... in order
    pub const BY_DIFFICULTY: [Tile; 8] = [Yellow, Green, Blue, Purple, Red, Orange, Brown, Black];

    pub fn from_difficulty(difficulty: u8) -> Self {
        (difficulty as usize)
            .checked_sub(1)
            .and_then(|idx| Self::BY_DIFFICULTY.get(idx).copied())
            .unwrap_or(Blank)
    }

    pub fn for_word(puzzle: &Puzzle, word: &str) -> Self {
        puzzle
            .category_of(word, MatchPolicy::Exact)
            .map(|c| Self::from_difficulty(c.difficulty))
            .unwrap_or(Blank)
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Yellow => "🟨",
            Green => "🟩",
            Blue => "🟦",
            Purple => "🟪",
            Red => "🟥",
            Orange => "🟧",
            Brown => "🟫",
            Black => "⬛",
            Blank => "⬜",
        }
    }
}

impl Display for Tile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.emoji())
    }
}

/// One row of tiles per guess, one tile per guessed word
pub fn render_grid(puzzle: &Puzzle, guesses: &[Guess]) -> Vec<Vec<Tile>> {
    guesses
        .iter()
        .map(|guess| guess.words().iter().map(|w| Tile::for_word(puzzle, w)).collect())
        .collect()
}

pub fn grid_to_string(grid: &[Vec<Tile>]) -> String {
    grid.iter()
        .map(|row| row.iter().map(Tile::emoji).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

///
/// The text that gets shared, for example:
///
/// ```text
/// Connections #68
///
/// 🟨🟨🟨🟨
/// 🟩🟦🟩🟩
/// ...
///
/// https://example.com/
/// ```
///
pub fn share_text(title: &str, puzzle_number: Option<u32>, grid: &[Vec<Tile>], link: Option<&str>) -> String {
    let mut out = match puzzle_number {
        Some(number) => format!("{} #{}", title, number),
        None => title.to_string(),
    };
    out.push_str("\n\n");
    out.push_str(&grid_to_string(grid));
    if let Some(link) = link {
        out.push_str("\n\n");
        out.push_str(link);
    }

    out
}

/// share_text for the current state of a session
pub fn session_share_text(session: &Session, link: Option<&str>) -> String {
    let config = session.config();
    let grid = render_grid(session.puzzle(), session.submitted_guesses());
    let link = link.filter(|_| config.include_link);
    share_text(&config.title, session.date().puzzle_number(), &grid, link)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShareMethod {
    Native,
    Clipboard,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShareErr {
    #[error("sharing is not available")]
    Unavailable,
    #[error("sharing was rejected: {0}")]
    Rejected(String),
}

///
/// What the platform can do with the text. In the browser this is navigator.share and
/// navigator.clipboard (see web::share), tests use a fake.
///
#[allow(async_fn_in_trait)]
pub trait ShareBackend {
    fn user_agent(&self) -> Option<String>;

    /// whether the native share sheet exists and accepts this text (navigator.canShare)
    fn can_share(&self, text: &str) -> bool;

    async fn share(&self, text: &str) -> Result<(), ShareErr>;

    fn has_clipboard(&self) -> bool;

    async fn copy_to_clipboard(&self, text: &str) -> Result<(), ShareErr>;
}

/// Decides whether the native share sheet should be attempted for a user agent
pub trait ShareCapability {
    fn allows_native_share(&self, user_agent: &str) -> bool;
}

impl<F: Fn(&str) -> bool> ShareCapability for F {
    fn allows_native_share(&self, user_agent: &str) -> bool {
        self(user_agent)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeviceType {
    Mobile,
    Tablet,
    SmartTv,
    Wearable,
    Desktop,
}

impl DeviceType {
    /// A rough classification of the device from the user agent string
    pub fn from_user_agent(user_agent: &str) -> Self {
        const SMART_TV: [&str; 7] = ["SmartTV", "SMART-TV", "Tizen", "Web0S", "HbbTV", "AppleTV", "CrKey"];
        const WEARABLE: [&str; 2] = ["Watch", "Wear OS"];

        let has = |needle: &&str| user_agent.contains(*needle);
        if SMART_TV.iter().any(has) {
            DeviceType::SmartTv
        } else if WEARABLE.iter().any(has) {
            DeviceType::Wearable
        } else if user_agent.contains("iPad") || user_agent.contains("Tablet") {
            DeviceType::Tablet
        } else if user_agent.contains("Mobi") || user_agent.contains("iPhone") {
            DeviceType::Mobile
        } else if user_agent.contains("Android") {
            // android without "Mobile" is a tablet
            DeviceType::Tablet
        } else {
            DeviceType::Desktop
        }
    }
}

///
/// The default ShareCapability: only phones, TVs and wearables get the native share sheet, and
/// never Firefox, whose Web Share API doesn't work correctly.
///
#[derive(Copy, Clone, Debug, Default)]
pub struct DeviceAllowList;

impl DeviceAllowList {
    pub const ALLOWED: [DeviceType; 3] = [DeviceType::Mobile, DeviceType::SmartTv, DeviceType::Wearable];
}

impl ShareCapability for DeviceAllowList {
    fn allows_native_share(&self, user_agent: &str) -> bool {
        let is_firefox = user_agent.contains("Firefox") || user_agent.contains("FxiOS");
        !is_firefox && Self::ALLOWED.contains(&DeviceType::from_user_agent(user_agent))
    }
}

///
/// Best effort sharing: the native share sheet when the capability check allows it, otherwise (or
/// if that fails) the clipboard.
///
/// The outcome is only ever reported through the callbacks. Exactly one of them is called.
///
pub async fn share_result<B, C, S, F>(text: &str, backend: &B, capability: &C, on_success: S, on_failure: F)
where
    B: ShareBackend,
    C: ShareCapability,
    S: FnOnce(ShareMethod),
    F: FnOnce(ShareErr),
{
    let native_allowed = backend
        .user_agent()
        .map(|ua| capability.allows_native_share(&ua))
        .unwrap_or(false);

    if native_allowed && backend.can_share(text) {
        match backend.share(text).await {
            Ok(()) => return on_success(ShareMethod::Native),
            Err(err) => log::debug!("native share failed, trying clipboard... {}", err),
        }
    }

    if !backend.has_clipboard() {
        return on_failure(ShareErr::Unavailable);
    }

    match backend.copy_to_clipboard(text).await {
        Ok(()) => on_success(ShareMethod::Clipboard),
        Err(err) => {
            log::warn!("failed to copy result to clipboard: {}", err);
            on_failure(err)
        }
    }
}
