//! Interactive debugger over a recorded stack snapshot.

pub mod helper;
pub mod repl;

/// Shortest accepted abbreviation of `info`.
pub const INFO_MIN_ABBREV: usize = 1;

/// Whether `word` abbreviates `full` with at least `min` characters.
pub fn is_abbrev(word: &str, full: &str, min: usize) -> bool {
    word.len() >= min && full.starts_with(word)
}
