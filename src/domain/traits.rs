// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The caption encoder never reads annotation files itself.
// It asks a CaptionSource for the images of each split and
// encodes them in exactly the order they are returned, so the
// offset index is a function of that order alone.
//
// Implementations:
//   - AnnotationLoader → per-split JSON annotation files
//   - in-memory sources in the encoder tests

use anyhow::Result;

use crate::domain::image::{CaptionedImage, Split};

// ─── CaptionSource ────────────────────────────────────────────────────────────
/// Anything that can list the captioned images of a dataset split.
pub trait CaptionSource {
    /// All images of `split` with their captions, in a stable order.
    fn images(&self, split: Split) -> Result<Vec<CaptionedImage>>;
}
