// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between raw dataset files and encoded arrays.
//
// Caption encoding flows in this order:
//
//   <split>.json files
//       │
//       ▼
//   AnnotationLoader  → groups captions by image (CaptionSource)
//       │
//       ▼
//   split_sentence    → lower-case word / punctuation tokens
//       │
//       ▼
//   CaptionEncoder    → label table + offset index + lengths
//
// The remaining modules are single-pass rewrites used by the
// other subcommands.

/// Groups per-split annotation files into captioned images
pub mod loader;

/// Caption tokenization rules
pub mod tokenizer;

/// Packs captions into the label table and offset index
pub mod encoder;

/// Grows a base vocabulary with frequent training words
pub mod vocab_builder;

/// Drops rejected / precanned captions
pub mod filter;

/// Placeholder captions for unlabelled test images
pub mod dummy;

/// Parses bottom-up attention TSV rows
pub mod region_features;
