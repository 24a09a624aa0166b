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
use std::{env, fs, io, process, time::Instant};
use connections_site::connections::*;

///
/// Checks a puzzle export (the same JSON the "all puzzles" endpoint serves) before it goes live:
/// every entry that the site would skip is reported, and every puzzle that would be served is
/// listed with its date and number.
///
/// usage: check_puzzles <puzzles.json>
///
fn main() {
    let path = match env::args().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("usage: check_puzzles <puzzles.json>");
            process::exit(2);
        }
    };

    match check_file(&path) {
        Ok(0) => {}
        Ok(skipped) => {
            eprintln!("{} entries would be skipped", skipped);
            process::exit(1);
        }
        Err(err) => {
            eprintln!("failed to read {}: {}", path, err);
            process::exit(2);
        }
    }
}

/// Returns the number of entries which didn't decode into a puzzle
fn check_file(path: &str) -> io::Result<usize> {
    let raw = fs::read_to_string(path)?;
    let start_at = Instant::now();
    let entries = decode_entries(&raw).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    let total = entries.len();

    // same order and rules as decode_puzzles: the first valid entry for a date is the one served
    let mut puzzles = PuzzlesByDate::new();
    let mut skipped = 0;
    let mut duplicates = 0;
    for (raw_date, value) in entries {
        match decode_entry(&raw_date, value) {
            Ok((date, _)) if puzzles.contains_key(&date) => {
                println!("DUP   {:<12} repeats {}", raw_date, date);
                duplicates += 1;
            }
            Ok((date, puzzle)) => {
                puzzles.insert(date, puzzle);
            }
            Err(reason) => {
                println!("SKIP  {:<12} {}", raw_date, reason);
                skipped += 1;
            }
        }
    }

    for (date, puzzle) in &puzzles {
        let number = date.puzzle_number().map(|n| format!("#{}", n)).unwrap_or_else(|| "-".to_string());
        let names = puzzle.categories().iter().map(|c| c.name.as_str()).collect::<Vec<_>>();
        println!("OK    {} {:>5}  {}", date, number, names.join(" / "));
    }

    if duplicates > 0 {
        println!("{} entries repeat an earlier date and were ignored", duplicates);
    }

    eprintln!(
        "checked {} entries in {:.2}ms, {} puzzles",
        total,
        start_at.elapsed().as_secs_f64() * 1000.0,
        puzzles.len()
    );
    Ok(skipped)
}
