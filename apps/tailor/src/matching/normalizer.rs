//! Text normalization — turns free text (job descriptions, project
//! write-ups) into comparable lowercase tokens.
//!
//! Deterministic: the same input always yields the same token sequence.
//! Casing uses Rust's locale-independent `to_lowercase`; markup artifacts
//! (list bullets, heading markers) are stripped without touching semantic
//! words. Numeric tokens keep their decimal point so quantities like
//! `141.35` survive as single tokens.

#![allow(dead_code)]

use std::collections::HashSet;

/// Tokenizes raw text into a lowercased, punctuation-stripped sequence.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for raw_line in text.lines() {
        let line = strip_markup(raw_line);
        let mut current = String::new();
        for ch in line.chars() {
            if ch.is_alphanumeric() {
                current.extend(ch.to_lowercase());
            } else if ch == '.'
                && current.chars().next_back().is_some_and(|c| c.is_ascii_digit())
            {
                // interior decimal point of a number
                current.push('.');
            } else if (ch == '+' || ch == '#') && !current.is_empty() {
                // "c++", "c#", "5+"
                current.push(ch);
            } else {
                flush_token(&mut tokens, &mut current);
            }
        }
        flush_token(&mut tokens, &mut current);
    }
    tokens
}

fn flush_token(tokens: &mut Vec<String>, current: &mut String) {
    if current.is_empty() {
        return;
    }
    // A sentence-final period lands on the token ("141." from "scored 141.")
    let token = current.trim_end_matches('.');
    if !token.is_empty() {
        tokens.push(token.to_string());
    }
    current.clear();
}

/// Strips leading list bullets, heading markers and quote markers.
fn strip_markup(line: &str) -> &str {
    line.trim_start()
        .trim_start_matches(|c: char| matches!(c, '#' | '-' | '*' | '•' | '>'))
        .trim_start()
}

/// Derived set view of a token sequence, for overlap operations.
pub fn token_set(tokens: &[String]) -> HashSet<&str> {
    tokens.iter().map(String::as_str).collect()
}

/// True when `phrase` occurs in `tokens` as a contiguous run.
pub fn contains_phrase(tokens: &[String], phrase: &[String]) -> bool {
    !phrase.is_empty()
        && tokens.len() >= phrase.len()
        && tokens.windows(phrase.len()).any(|window| window == phrase)
}

/// Number of contiguous occurrences of `phrase` in `tokens`.
pub fn count_phrase(tokens: &[String], phrase: &[String]) -> usize {
    if phrase.is_empty() || tokens.len() < phrase.len() {
        return 0;
    }
    tokens
        .windows(phrase.len())
        .filter(|window| *window == phrase)
        .count()
}

/// Light suffix stripping for partial matches ("systems" ~ "system",
/// "testing" ~ "test"). ASCII suffixes only — Unicode words pass through.
pub fn stem(token: &str) -> &str {
    for suffix in ["ing", "ed", "es", "s"] {
        if let Some(stripped) = token.strip_suffix(suffix) {
            if stripped.len() >= 3 {
                return stripped;
            }
        }
    }
    token
}
