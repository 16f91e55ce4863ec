//! Word-frequency analysis over free-form journal text.
//!
//! Normalization is lossy on purpose: punctuation is stripped, case is
//! folded, and low-signal tokens (short words, stopwords, pure numbers)
//! are dropped. The transform is not invertible.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub mod stopwords;
pub use stopwords::{is_stopword, STOPWORDS};

pub const DEFAULT_TOP_N: usize = 15;
const MIN_WORD_LEN: usize = 3;

/// A ranked word with its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// Tally normalized words in `text`.
///
/// Pipeline, in order: lowercase; replace every character that is not
/// alphanumeric, `_`, or whitespace with a space; split on whitespace runs;
/// drop tokens shorter than 3 characters, stopwords, and pure-digit tokens.
/// Empty or fully-filtered input yields an empty map.
pub fn word_frequency(text: &str) -> HashMap<String, usize> {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    let mut frequency = HashMap::new();
    for word in normalized.split_whitespace() {
        if word.chars().count() < MIN_WORD_LEN
            || is_stopword(word)
            || word.chars().all(|c| c.is_ascii_digit())
        {
            continue;
        }
        *frequency.entry(word.to_string()).or_insert(0) += 1;
    }

    frequency
}

/// Top `n` words by count, descending.
///
/// Ties are broken alphabetically so the ranking is deterministic and
/// independent of map iteration order.
pub fn top_words(frequency: &HashMap<String, usize>, n: usize) -> Vec<WordCount> {
    let mut ranked: Vec<WordCount> = frequency
        .iter()
        .map(|(word, count)| WordCount {
            word: word.clone(),
            count: *count,
        })
        .collect();

    ranked.sort_unstable_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
    ranked.truncate(n);
    ranked
}
