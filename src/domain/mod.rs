// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain structs, enums and traits that define what the
// preprocessing tools work on: vocabularies, annotation files,
// images and splits.
//
// Rules for this layer:
//   - NO file I/O
//   - NO array or numpy types
//   - Only plain Rust types, serde derives and traits

// Annotation file records (images + captions)
pub mod annotation;

// Typed errors for encoding and vocabulary contracts
pub mod error;

// Splits, captioned images and metadata records
pub mod image;

// Core abstractions (traits) that other layers implement
pub mod traits;

// 1-indexed word vocabulary with UNK handling
pub mod vocabulary;
