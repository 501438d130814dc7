//! Canonical form for author names and book titles.
//!
//! Uniqueness comparisons and substring filters run against this form, so
//! it must stay deterministic and locale-independent.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^\w\s]").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Normalize a name or title: replace characters that are neither word
/// characters nor whitespace with a space, collapse whitespace runs to a
/// single space, trim, lowercase. Punctuation acts as a separator so that
/// "J.R.R. Tolkien" and "J R R Tolkien" agree on one canonical form.
pub fn normalize(input: &str) -> String {
    let stripped = NON_WORD.replace_all(input, " ");
    let collapsed = WHITESPACE.replace_all(&stripped, " ");
    collapsed.trim().to_lowercase()
}
