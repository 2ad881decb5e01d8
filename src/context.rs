//! # Context Extraction Module
//!
//! ## Purpose
//! Produces the human-readable excerpt shown for each match: a bounded window of
//! words around every occurrence of the pattern, with the matched word(s)
//! emphasized and clipped edges marked with ellipses.
//!
//! ## Input/Output Specification
//! - **Input**: Full text, compiled term pattern, context radius (words per side)
//! - **Output**: One string combining all occurrence contexts, joined with
//!   `" | "`; empty string when the pattern has no occurrence
//! - **Window**: `[word_index - radius, word_index + radius]` inclusive, clamped
//!   to the text bounds
//!
//! ## Key Features
//! - Word positions derived from whitespace splitting, nothing smarter
//! - Emphasis is word-level: within the window, each token that independently
//!   matches the pattern is wrapped in `**...**`. A multi-token phrase match may
//!   therefore emphasize only some of its tokens, or none. That approximation is
//!   deliberate and kept as-is.
//! - Leading `...` when the window starts past word 0, trailing `...` when it
//!   stops short of the final word

use crate::matcher::TermPattern;
use crate::CONTEXT_SEPARATOR;

/// Extract the combined context for every occurrence of `pattern` in `text`.
///
/// Returns the empty string when there is no occurrence. The matcher only calls
/// this after confirming a match, so in normal flow the result is non-empty;
/// direct callers must treat an empty result as "no match", not an error.
pub fn extract(text: &str, pattern: &TermPattern, radius: usize) -> String {
    let occurrences: Vec<usize> = pattern.regex().find_iter(text).map(|m| m.start()).collect();
    if occurrences.is_empty() {
        return String::new();
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return String::new();
    }

    let mut contexts = Vec::with_capacity(occurrences.len());
    for start_offset in occurrences {
        let word_index = word_index_at(text, start_offset).min(words.len() - 1);

        let window_start = word_index.saturating_sub(radius);
        let window_end = (word_index + radius + 1).min(words.len());

        let mut highlighted = Vec::with_capacity(window_end - window_start);
        for word in &words[window_start..window_end] {
            if pattern.regex().is_match(word) {
                highlighted.push(format!("**{}**", word));
            } else {
                highlighted.push((*word).to_string());
            }
        }

        let mut context = highlighted.join(" ");
        if window_start > 0 {
            context = format!("...{}", context);
        }
        if window_end < words.len() {
            context.push_str("...");
        }
        contexts.push(context);
    }

    contexts.join(CONTEXT_SEPARATOR)
}

/// 0-based word index of the token containing byte offset `start`.
///
/// Counts the whitespace-delimited tokens preceding the offset; when the offset
/// falls mid-token (the match starts after leading punctuation, for example) the
/// partial token at the end of the prefix belongs to the match itself and is not
/// counted.
fn word_index_at(text: &str, start: usize) -> usize {
    let prefix = &text[..start];
    let mut count = prefix.split_whitespace().count();
    if !prefix.is_empty() && !prefix.ends_with(char::is_whitespace) {
        count = count.saturating_sub(1);
    }
    count
}
