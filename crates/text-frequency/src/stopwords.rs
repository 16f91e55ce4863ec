//! Fixed stopword set for word-frequency analysis.
//!
//! Common English function words carry little signal in a frequency chart,
//! so they are excluded before tallying. The set is compiled in and never
//! mutated at runtime.

use std::collections::HashSet;
use std::sync::OnceLock;

pub const STOPWORDS: &[&str] = &[
    "about", "above", "after", "again", "against", "all", "and", "any", "are",
    "aren", "because", "been", "before", "being", "below", "between", "both",
    "but", "can", "cannot", "could", "couldn", "did", "didn", "does", "doesn",
    "doing", "don", "down", "during", "each", "few", "for", "from", "further",
    "had", "hadn", "has", "hasn", "have", "haven", "having", "her", "here",
    "hers", "herself", "him", "himself", "his", "how", "into", "isn", "its",
    "itself", "just", "let", "more", "most", "mustn", "myself", "nor", "not",
    "now", "off", "once", "only", "other", "ought", "our", "ours", "ourselves",
    "out", "over", "own", "same", "shan", "she", "should", "shouldn", "some",
    "such", "than", "that", "the", "their", "theirs", "them", "themselves",
    "then", "there", "these", "they", "this", "those", "through", "too",
    "under", "until", "very", "was", "wasn", "were", "weren", "what", "when",
    "where", "which", "while", "who", "whom", "why", "will", "with", "won",
    "would", "wouldn", "you", "your", "yours", "yourself", "yourselves",
];

static STOPWORD_SET: OnceLock<HashSet<&'static str>> = OnceLock::new();

pub fn is_stopword(word: &str) -> bool {
    STOPWORD_SET
        .get_or_init(|| STOPWORDS.iter().copied().collect())
        .contains(word)
}
