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
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

///
/// A calendar date identifying a daily puzzle.
///
/// This is the join key between the puzzle source and the local store, so it always renders the
/// same way: ISO-8601 (`2024-03-09`). Parsing additionally accepts the US style `3/9/2024` that the
/// puzzle spreadsheet uses, so both sides canonicalize to one representation.
///
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PuzzleDate {
    year: i32,
    month: u8,
    day: u8,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateErr {
    #[error("malformed date '{0}'")]
    Malformed(String),
    #[error("{year:04}-{month:02}-{day:02} is not a calendar date")]
    OutOfRange { year: i32, month: u8, day: u8 },
}

impl PuzzleDate {
    /// The date of the very first puzzle (puzzle #0)
    pub const FIRST_GAME: PuzzleDate = PuzzleDate { year: 2024, month: 1, day: 1 };

    pub fn new(year: i32, month: u8, day: u8) -> Result<Self, DateErr> {
        if !(1..=12).contains(&month) || day == 0 || day > days_in_month(year, month) {
            return Err(DateErr::OutOfRange { year, month, day });
        }

        Ok(Self { year, month, day })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn next(&self) -> Self {
        Self::from_days_since_epoch(self.days_since_epoch() + 1)
    }

    pub fn previous(&self) -> Self {
        Self::from_days_since_epoch(self.days_since_epoch() - 1)
    }

    ///
    /// The puzzle number shown in the share text: the number of days since FIRST_GAME. Dates
    /// before the first game have no number.
    ///
    pub fn puzzle_number(&self) -> Option<u32> {
        let days = self.days_since_epoch() - Self::FIRST_GAME.days_since_epoch();
        u32::try_from(days).ok()
    }

    /// A date is playable if it is between the first game and today (inclusive)
    pub fn is_valid_game_date(&self, today: PuzzleDate) -> bool {
        *self >= Self::FIRST_GAME && *self <= today
    }

    ///
    /// Days since 1970-01-01, using the well known "days from civil" calculation which shifts the
    /// year so that it starts in March (putting the leap day at the very end of the year).
    ///
    fn days_since_epoch(&self) -> i64 {
        let y = self.year as i64 - if self.month <= 2 { 1 } else { 0 };
        let era = y.div_euclid(400);
        let yoe = y - era * 400;
        let m = self.month as i64;
        let doy = (153 * (m + if m > 2 { -3 } else { 9 }) + 2) / 5 + self.day as i64 - 1;
        let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
        era * 146097 + doe - 719468
    }

    fn from_days_since_epoch(days: i64) -> Self {
        let z = days + 719468;
        let era = z.div_euclid(146097);
        let doe = z - era * 146097;
        let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
        let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
        let year = (yoe + era * 400 + if month <= 2 { 1 } else { 0 }) as i32;
        Self { year, month, day }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

impl Display for PuzzleDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for PuzzleDate {
    type Err = DateErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let malformed = || DateErr::Malformed(s.to_string());

        // ISO is YYYY-MM-DD, the spreadsheet uses M/D/YYYY
        let (year, month, day) = if s.contains('-') {
            let mut parts = s.splitn(3, '-');
            let year = parts.next().ok_or_else(malformed)?;
            let month = parts.next().ok_or_else(malformed)?;
            let day = parts.next().ok_or_else(malformed)?;
            (year, month, day)
        } else if s.contains('/') {
            let mut parts = s.splitn(3, '/');
            let month = parts.next().ok_or_else(malformed)?;
            let day = parts.next().ok_or_else(malformed)?;
            let year = parts.next().ok_or_else(malformed)?;
            (year, month, day)
        } else {
            return Err(malformed());
        };

        if year.len() != 4 {
            return Err(malformed());
        }

        let year = year.parse::<i32>().map_err(|_| malformed())?;
        let month = month.parse::<u8>().map_err(|_| malformed())?;
        let day = day.parse::<u8>().map_err(|_| malformed())?;
        Self::new(year, month, day)
    }
}

impl Serialize for PuzzleDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PuzzleDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("2024-03-09", 2024, 3, 9)]
    #[test_case("3/9/2024", 2024, 3, 9)]
    #[test_case("03/09/2024", 2024, 3, 9)]
    #[test_case(" 12/31/2023 ", 2023, 12, 31)]
    #[test_case("2024-02-29", 2024, 2, 29)]
    fn test_parse(raw: &str, year: i32, month: u8, day: u8) {
        let date: PuzzleDate = raw.parse().expect("should parse");
        assert_eq!(date, PuzzleDate::new(year, month, day).unwrap(), "parsing '{}'", raw);
    }

    #[test_case("2023-02-29")]
    #[test_case("13/01/2024")]
    #[test_case("1/1/24")]
    #[test_case("yesterday")]
    #[test_case("2024-1")]
    fn test_parse_rejects(raw: &str) {
        assert!(raw.parse::<PuzzleDate>().is_err(), "'{}' should not parse", raw);
    }

    #[test]
    fn test_display_is_iso() {
        let date: PuzzleDate = "3/9/2024".parse().unwrap();
        assert_eq!(date.to_string(), "2024-03-09");
    }

    #[test]
    fn test_puzzle_number() {
        assert_eq!(PuzzleDate::FIRST_GAME.puzzle_number(), Some(0));
        assert_eq!(PuzzleDate::new(2024, 1, 31).unwrap().puzzle_number(), Some(30));
        assert_eq!(PuzzleDate::new(2025, 1, 1).unwrap().puzzle_number(), Some(366));
        assert_eq!(PuzzleDate::new(2023, 12, 31).unwrap().puzzle_number(), None);
    }

    #[test]
    fn test_next_and_previous_cross_boundaries() {
        let leap = PuzzleDate::new(2024, 2, 28).unwrap();
        assert_eq!(leap.next(), PuzzleDate::new(2024, 2, 29).unwrap());
        assert_eq!(leap.next().next(), PuzzleDate::new(2024, 3, 1).unwrap());

        let new_year = PuzzleDate::new(2025, 1, 1).unwrap();
        assert_eq!(new_year.previous(), PuzzleDate::new(2024, 12, 31).unwrap());
    }

    #[test]
    fn test_valid_game_date() {
        let today = PuzzleDate::new(2024, 6, 1).unwrap();
        assert!(PuzzleDate::FIRST_GAME.is_valid_game_date(today));
        assert!(today.is_valid_game_date(today));
        assert!(!today.next().is_valid_game_date(today));
        assert!(!PuzzleDate::FIRST_GAME.previous().is_valid_game_date(today));
    }

    #[test]
    fn test_serde_uses_iso_string() {
        let date = PuzzleDate::new(2024, 3, 9).unwrap();
        assert_eq!(serde_json::to_string(&date).unwrap(), "\"2024-03-09\"");
        let back: PuzzleDate = serde_json::from_str("\"3/9/2024\"").unwrap();
        assert_eq!(back, date);
    }
}
