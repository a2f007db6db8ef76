// ============================================================
// Layer 3 — Vocabulary Domain Type
// ============================================================
// An ordered list of distinct words. The position of a word
// defines its index, starting at 1:
//
//   words = ["a", "dog", "runs"]
//   index:    1     2       3
//
// Index 0 is never assigned because the label table uses it
// as right padding. Out-of-vocabulary words map to the
// reserved UNK token. When the source vocabulary does not
// contain UNK it is appended at the end, so {1:a,2:dog,3:runs}
// gets UNK = 4.

use std::collections::HashMap;

use serde::{Serialize, Serializer};

use crate::domain::error::VocabError;

/// The reserved out-of-vocabulary token.
pub const UNK_TOKEN: &str = "UNK";

/// Padding index used in label rows. Never produced by lookup.
pub const PAD_IX: u32 = 0;

#[derive(Debug, Clone)]
pub struct Vocabulary {
    /// Word at position i has index i + 1
    words: Vec<String>,
    /// Inverse table: word → 1-based index
    index: HashMap<String, u32>,
    /// Index of UNK_TOKEN
    unk_ix: u32,
}

impl Vocabulary {
    /// Build a vocabulary from an ordered word list.
    ///
    /// Words must be distinct and non-empty. UNK is appended
    /// when the list does not already contain it.
    pub fn from_words(mut words: Vec<String>) -> Result<Self, VocabError> {
        if !words.iter().any(|w| w == UNK_TOKEN) {
            words.push(UNK_TOKEN.to_string());
        }

        let mut index = HashMap::with_capacity(words.len());
        for (pos, word) in words.iter().enumerate() {
            let ix = pos + 1;
            if word.is_empty() {
                return Err(VocabError::EmptyWord { index: ix });
            }
            if let Some(first) = index.insert(word.clone(), ix as u32) {
                return Err(VocabError::DuplicateWord {
                    word:   word.clone(),
                    first:  first as usize,
                    second: ix,
                });
            }
        }

        let unk_ix = index[UNK_TOKEN];
        Ok(Self { words, index, unk_ix })
    }

    /// Number of words, UNK included. Valid indices are 1..=len().
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn unk_ix(&self) -> u32 {
        self.unk_ix
    }

    /// 1-based index of `word`, or the UNK index when it is unknown.
    pub fn lookup(&self, word: &str) -> u32 {
        self.index.get(word).copied().unwrap_or(self.unk_ix)
    }

    /// Word stored at a 1-based index.
    pub fn word(&self, ix: u32) -> Option<&str> {
        let pos = (ix as usize).checked_sub(1)?;
        self.words.get(pos).map(String::as_str)
    }

    /// Decode one label row back into tokens.
    ///
    /// Trailing zero padding is stripped. Indices outside the
    /// vocabulary come back as the UNK placeholder.
    pub fn decode(&self, row: &[u32]) -> Vec<String> {
        row.iter()
            .take_while(|&&ix| ix != PAD_IX)
            .map(|&ix| self.word(ix).unwrap_or(UNK_TOKEN).to_string())
            .collect()
    }

    /// Serialisable `{"1": word, "2": word, ...}` view.
    pub fn ix_to_word(&self) -> IxToWord<'_> {
        IxToWord::new(&self.words)
    }
}

/// Read the words of a 1-indexed `ix_to_word` map in index order.
///
/// Keys must cover "1" through "n" without gaps, where n is
/// the number of entries.
pub fn ordered_words(ix_to_word: &HashMap<String, String>) -> Result<Vec<String>, VocabError> {
    let size = ix_to_word.len();
    (1..=size)
        .map(|ix| {
            ix_to_word
                .get(&ix.to_string())
                .cloned()
                .ok_or(VocabError::MissingIndex { size, missing: ix })
        })
        .collect()
}

/// Borrowed word list that serialises as a 1-indexed JSON object,
/// keys written in index order.
#[derive(Debug, Clone, Copy)]
pub struct IxToWord<'a>(&'a [String]);

impl<'a> IxToWord<'a> {
    pub fn new(words: &'a [String]) -> Self {
        Self(words)
    }
}

impl Serialize for IxToWord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.0
                .iter()
                .enumerate()
                .map(|(pos, word)| ((pos + 1).to_string(), word)),
        )
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_unk_appended_when_missing() {
        let v = Vocabulary::from_words(words(&["a", "dog", "runs"])).unwrap();
        assert_eq!(v.len(), 4);
        assert_eq!(v.unk_ix(), 4);
        assert_eq!(v.word(4), Some(UNK_TOKEN));
    }

    #[test]
    fn test_existing_unk_keeps_its_index() {
        let v = Vocabulary::from_words(words(&["a", "UNK", "dog"])).unwrap();
        assert_eq!(v.len(), 3);
        assert_eq!(v.unk_ix(), 2);
    }

    #[test]
    fn test_lookup_is_one_based_and_falls_back_to_unk() {
        let v = Vocabulary::from_words(words(&["a", "dog", "runs"])).unwrap();
        assert_eq!(v.lookup("a"), 1);
        assert_eq!(v.lookup("runs"), 3);
        assert_eq!(v.lookup("!"), 4);
    }

    #[test]
    fn test_index_zero_has_no_word() {
        let v = Vocabulary::from_words(words(&["a"])).unwrap();
        assert_eq!(v.word(0), None);
        assert_eq!(v.word(3), None);
    }

    #[test]
    fn test_duplicate_word_rejected() {
        let err = Vocabulary::from_words(words(&["a", "b", "a"])).unwrap_err();
        assert_eq!(
            err,
            VocabError::DuplicateWord { word: "a".into(), first: 1, second: 3 }
        );
    }

    #[test]
    fn test_empty_word_rejected() {
        let err = Vocabulary::from_words(words(&["a", ""])).unwrap_err();
        assert_eq!(err, VocabError::EmptyWord { index: 2 });
    }

    #[test]
    fn test_decode_strips_padding_and_maps_unknown_indices() {
        let v = Vocabulary::from_words(words(&["a", "dog", "runs"])).unwrap();
        assert_eq!(v.decode(&[1, 2, 3, 4, 0]), vec!["a", "dog", "runs", "UNK"]);
        assert_eq!(v.decode(&[2, 99, 0, 0]), vec!["dog", "UNK"]);
        assert!(v.decode(&[0, 0]).is_empty());
    }

    #[test]
    fn test_ordered_words_reads_keys_in_index_order() {
        let map: HashMap<String, String> = [("2", "dog"), ("1", "a"), ("3", "runs")]
            .into_iter()
            .map(|(k, w)| (k.to_string(), w.to_string()))
            .collect();
        assert_eq!(ordered_words(&map).unwrap(), vec!["a", "dog", "runs"]);
    }

    #[test]
    fn test_ordered_words_detects_gap() {
        let map: HashMap<String, String> = [("1", "a"), ("3", "runs")]
            .into_iter()
            .map(|(k, w)| (k.to_string(), w.to_string()))
            .collect();
        assert_eq!(
            ordered_words(&map).unwrap_err(),
            VocabError::MissingIndex { size: 2, missing: 2 }
        );
    }

    #[test]
    fn test_ix_to_word_serialises_in_index_order() {
        let list = words(&["w1", "w2", "w3", "w4", "w5", "w6", "w7", "w8", "w9", "w10"]);
        let json = serde_json::to_string(&IxToWord::new(&list)).unwrap();
        assert!(json.starts_with(r#"{"1":"w1","2":"w2""#));
        assert!(json.ends_with(r#""9":"w9","10":"w10"}"#));
    }
}
