// ============================================================
// Layer 4 — Vocabulary Extension
// ============================================================
// Optionally grows a pretrained vocabulary with words from the
// training captions. Only words that occur MORE than
// `threshold` times are added. They go after the base words so
// every pretrained index keeps its meaning.
//
// New words are ordered by count (descending) and then
// alphabetically, which keeps the result deterministic.

use std::collections::{HashMap, HashSet};

use crate::data::tokenizer::split_sentence;

/// Count tokens over a set of captions.
pub fn count_words<'a>(captions: impl IntoIterator<Item = &'a str>) -> HashMap<String, usize> {
    let mut freq: HashMap<String, usize> = HashMap::new();
    for caption in captions {
        for token in split_sentence(caption) {
            *freq.entry(token).or_insert(0) += 1;
        }
    }
    freq
}

/// Append frequent words missing from `base`.
pub fn extend_words(
    mut base:  Vec<String>,
    counts:    HashMap<String, usize>,
    threshold: usize,
) -> Vec<String> {
    let known: HashSet<&str> = base.iter().map(String::as_str).collect();

    let mut extra: Vec<(String, usize)> = counts
        .into_iter()
        .filter(|(word, count)| *count > threshold && !known.contains(word.as_str()))
        .collect();
    extra.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    tracing::info!(
        "Extending base vocab of {} words with {} words seen more than {} times",
        base.len(),
        extra.len(),
        threshold
    );

    base.extend(extra.into_iter().map(|(word, _)| word));
    base
}
