use super::{FeatureGroup, UrlContext};
use std::collections::HashMap;

pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?/~`";

/// Shannon entropy in bits over the character distribution.
/// Every Unicode code point counts as its own symbol.
pub fn shannon_entropy(text: &str) -> f64 {
    let mut counts: HashMap<char, usize> = HashMap::new();
    let mut total = 0usize;
    for c in text.chars() {
        *counts.entry(c).or_insert(0) += 1;
        total += 1;
    }

    if total == 0 {
        return 0.0;
    }

    let total = total as f64;
    counts
        .values()
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum::<f64>()
        .max(0.0)
}

/// ASCII digits only. Non-ASCII digits fall in no class, so the three
/// character ratios never sum past 1.
pub fn count_digits(text: &str) -> usize {
    text.chars().filter(|c| c.is_ascii_digit()).count()
}

pub fn count_letters(text: &str) -> usize {
    text.chars().filter(|c| c.is_alphabetic()).count()
}

pub fn count_special(text: &str) -> usize {
    text.chars().filter(|c| SPECIAL_CHARACTERS.contains(*c)).count()
}

pub fn ratio(count: usize, length: usize) -> f64 {
    if length == 0 {
        0.0
    } else {
        count as f64 / length as f64
    }
}

pub struct LexicalStatsAnalyzer;

impl FeatureGroup for LexicalStatsAnalyzer {
    fn extract(&self, context: &UrlContext) -> Vec<(&'static str, f64)> {
        let url = context.url;
        let length = context.char_count;
        let digits = count_digits(url);
        let letters = count_letters(url);
        let special = count_special(url);

        vec![
            ("url_length", length as f64),
            ("entropy", shannon_entropy(url)),
            ("digit_count", digits as f64),
            ("letter_count", letters as f64),
            ("special_count", special as f64),
            ("digit_ratio", ratio(digits, length)),
            ("letter_ratio", ratio(letters, length)),
            ("special_ratio", ratio(special, length)),
        ]
    }

    fn name(&self) -> &str {
        "lexical_stats"
    }
}
