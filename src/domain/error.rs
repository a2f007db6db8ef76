// ============================================================
// Layer 3 — Domain Errors
// ============================================================
// Typed failures for the input contracts the encoder and the
// vocabulary enforce. Every one of them is fatal: the use case
// propagates it through anyhow and the run aborts before any
// output file is written.

use thiserror::Error;

/// Violations of the caption-encoding contract.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    /// A label row must hold at least one token.
    #[error("max_length must be at least 1")]
    ZeroMaxLength,

    /// Every image that is not excluded needs one or more captions.
    #[error("image {image_id} has no captions")]
    NoCaptions { image_id: u64 },

    /// The length array may never contain a zero.
    #[error("caption {caption:?} of image {image_id} has no words")]
    EmptyCaption { image_id: u64, caption: String },

    /// Internal consistency check between the counting pass and the encoding pass.
    #[error("encoded {actual} caption rows but expected {expected}")]
    RowCountMismatch { expected: usize, actual: usize },

    /// Label pointers are stored as u32.
    #[error("{rows} caption rows do not fit into u32 label pointers")]
    TooManyRows { rows: usize },
}

/// Problems with a 1-indexed `ix_to_word` vocabulary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VocabError {
    #[error("vocabulary has {size} entries but index {missing} is missing")]
    MissingIndex { size: usize, missing: usize },

    #[error("word {word:?} appears at index {first} and again at index {second}")]
    DuplicateWord { word: String, first: usize, second: usize },

    #[error("vocabulary entry {index} is empty")]
    EmptyWord { index: usize },
}

/// Raised when a split or image order name cannot be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseNameError {
    pub kind:     &'static str,
    pub value:    String,
    pub expected: &'static str,
}
