// ============================================================
// Layer 5 — Infrastructure Layer
// ============================================================
// File formats on disk. Nothing in here decides WHAT gets
// written, only how it is laid out:
//
//   annotation_store.rs : per-split annotation JSON (read + write)
//   vocab_store.rs      : ix_to_word vocabulary JSON, infos files
//   label_store.rs      : encoded label .npz + metadata JSON
//   feature_store.rs    : per-image att / fc / box numpy files
//
// Every failure carries the offending path in its context.

/// Annotation JSON reading and writing
pub mod annotation_store;

/// Vocabulary loading and saving
pub mod vocab_store;

/// Encoded caption arrays and metadata output
pub mod label_store;

/// Region-feature numpy output
pub mod feature_store;
