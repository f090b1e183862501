//! Word-cloud frequency builder: turns free-text descriptions into a
//! token → count mapping after a fixed sequence of cleanup passes.

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::debug;

static NUMERALS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());
static PUNCTUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Fixed English stopword list applied after case-folding.
const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "cannot", "could", "did", "do", "does", "doing", "down", "during", "each",
    "few", "for", "from", "further", "had", "has", "have", "having", "he", "her", "here",
    "hers", "herself", "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it",
    "its", "itself", "just", "me", "more", "most", "my", "myself", "no", "nor", "not", "now",
    "of", "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves", "out",
    "over", "own", "same", "she", "should", "so", "some", "such", "than", "that", "the",
    "their", "theirs", "them", "themselves", "then", "there", "these", "they", "this",
    "those", "through", "to", "too", "under", "until", "up", "very", "was", "we", "were",
    "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with", "would",
    "you", "your", "yours", "yourself", "yourselves",
];

/// Placeholder strings that mean "no description at all".
const NULL_PLACEHOLDERS: &[&str] = &["", "none", "null", "nan", "n/a"];

/// Build the token frequency table for a set of descriptions.
///
/// Inputs beyond `sample_cap` are down-sampled to exactly `sample_cap`
/// entries with a seeded RNG, so repeat runs over the same input produce
/// identical tables.
pub fn build_frequencies(
    descriptions: &[String],
    sample_cap: usize,
    seed: u64,
) -> BTreeMap<String, usize> {
    let sampled = sample_capped(descriptions, sample_cap, seed);

    let mut frequencies: BTreeMap<String, usize> = BTreeMap::new();
    for description in sampled {
        for token in tokenize(description) {
            *frequencies.entry(token).or_insert(0) += 1;
        }
    }
    debug!(
        "Word-cloud frequency table holds {} distinct tokens",
        frequencies.len()
    );
    frequencies
}

/// Uniform random sample of exactly `cap` entries when the input is
/// oversized, in stable input order; the input unchanged otherwise.
pub fn sample_capped(descriptions: &[String], cap: usize, seed: u64) -> Vec<&String> {
    if descriptions.len() <= cap {
        return descriptions.iter().collect();
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut indices: Vec<usize> = (0..descriptions.len()).collect();
    indices.shuffle(&mut rng);
    indices.truncate(cap);
    indices.sort_unstable();
    indices.into_iter().map(|i| &descriptions[i]).collect()
}

/// Cleanup passes, in order: null-placeholder removal, case-folding,
/// numeral stripping, stopword removal, punctuation stripping, whitespace
/// collapsing.
fn tokenize(description: &str) -> Vec<String> {
    let folded = description.trim().to_lowercase();
    if NULL_PLACEHOLDERS.contains(&folded.as_str()) {
        return Vec::new();
    }

    let no_numerals = NUMERALS.replace_all(&folded, " ");
    let no_stopwords: Vec<&str> = no_numerals
        .split_whitespace()
        .filter(|word| !STOPWORDS.contains(&word.trim_matches(|c: char| !c.is_alphanumeric())))
        .collect();
    let joined = no_stopwords.join(" ");
    let no_punctuation = PUNCTUATION.replace_all(&joined, " ");
    let collapsed = WHITESPACE.replace_all(&no_punctuation, " ");

    collapsed
        .split(' ')
        .filter(|token| !token.is_empty())
        .map(|token| token.to_string())
        .collect()
}
