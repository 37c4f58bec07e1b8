//! PGN (Portable Game Notation) output for finished games.
//!
//! Games are appended to a log file, so one file collects every game of a
//! self-play batch or arena series.

use crate::record::GameRecord;
use chrono::Utc;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

const LINE_WIDTH: usize = 80;

/// Renders a game record as a PGN game: tag pairs, a blank line, and the
/// numbered move text terminated by the result.
pub fn format_pgn(record: &GameRecord) -> String {
    let result_str = record.result_str();
    let mut out = String::new();
    let tags = [
        ("Event", record.event.clone()),
        ("Site", record.site.clone()),
        ("Date", Utc::now().format("%Y.%m.%d").to_string()),
        ("Round", record.round().to_string()),
        ("White", record.white.clone()),
        ("Black", record.black.clone()),
        ("Result", result_str.to_string()),
        ("Variant", record.variant.to_string()),
        ("PlyCount", record.len().to_string()),
    ];
    for (name, value) in tags {
        out.push_str(&format!("[{} \"{}\"]\n", name, value));
    }
    if let Some(termination) = record.termination() {
        out.push_str(&format!("[Termination \"{}\"]\n", termination.pgn_tag()));
    }
    out.push('\n');

    let mut tokens = Vec::with_capacity(record.len() * 3 / 2 + 1);
    for (i, mv) in record.moves().iter().enumerate() {
        if i % 2 == 0 {
            tokens.push(format!("{}. {}", i / 2 + 1, mv));
        } else {
            tokens.push(mv.clone());
        }
    }
    tokens.push(result_str.to_string());

    let mut line = String::new();
    for token in tokens {
        if !line.is_empty() && line.len() + 1 + token.len() > LINE_WIDTH {
            out.push_str(&line);
            out.push('\n');
            line.clear();
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&token);
    }
    out.push_str(&line);
    out.push('\n');
    out
}

/// Appends a game record to the PGN log at `path`, creating the file if needed.
///
/// With `verbose` set the same text is also printed to stdout.
///
/// # Errors
///
/// Returns an `std::io::Error` if the file cannot be opened or written.
pub fn write_game_to_pgn<P: AsRef<Path>>(
    path: P,
    record: &GameRecord,
    verbose: bool,
) -> std::io::Result<()> {
    let pgn = format_pgn(record);
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", pgn)?;
    if verbose {
        println!("{}", pgn);
    }
    Ok(())
}
