// ============================================================
// Layer 4 — Caption Encoder
// ============================================================
// Packs every caption into one large zero-padded label table
// and records, per image, which rows belong to it:
//
//   image A: 2 captions   → rows 1..=2
//   image B: 1 caption    → rows 3..=3
//
//   label_start_ix = [1, 3]     (1-indexed, inclusive)
//   label_end_ix   = [2, 3]
//   label_length   = [len(A0), len(A1), len(B0)]
//
// Splits are encoded in the order given by the caller and the
// images of each split in the order the CaptionSource yields
// them. Rows are appended in a single sequential pass over a
// running row counter.

use std::collections::HashSet;

use anyhow::Result;
use ndarray::{Array1, Array2};

use crate::data::tokenizer::split_sentence;
use crate::domain::{
    error::EncodeError,
    image::{CaptionedImage, ImageInfo, Split},
    traits::CaptionSource,
    vocabulary::Vocabulary,
};

/// Everything produced by one encoding run.
#[derive(Debug, Clone)]
pub struct EncodedCaptions {
    /// Number of encoded images (N)
    pub image_count: usize,
    /// (M, max_length) token indices, zero padded on the right
    pub labels: Array2<u32>,
    /// (N,) first row of each image, 1-indexed
    pub label_start_ix: Array1<u32>,
    /// (N,) last row of each image, 1-indexed and inclusive
    pub label_end_ix: Array1<u32>,
    /// (M,) min(max_length, token count) per caption
    pub label_length: Array1<u32>,
    /// (N,) metadata, record i matches offset entry i
    pub images: Vec<ImageInfo>,
}

impl EncodedCaptions {
    /// Number of caption rows (M).
    pub fn caption_count(&self) -> usize {
        self.labels.nrows()
    }
}

pub struct CaptionEncoder<'a> {
    vocab: &'a Vocabulary,
    max_length: usize,
    /// Images skipped entirely (no rows, no offsets, no metadata)
    excluded: &'a HashSet<u64>,
}

impl<'a> CaptionEncoder<'a> {
    pub fn new(
        vocab:      &'a Vocabulary,
        max_length: usize,
        excluded:   &'a HashSet<u64>,
    ) -> Result<Self, EncodeError> {
        if max_length == 0 {
            return Err(EncodeError::ZeroMaxLength);
        }
        Ok(Self { vocab, max_length, excluded })
    }

    /// Load every split from `source` and encode them in `splits` order.
    pub fn encode(&self, source: &dyn CaptionSource, splits: &[Split]) -> Result<EncodedCaptions> {
        let batches = splits
            .iter()
            .map(|&split| source.images(split).map(|images| (split, images)))
            .collect::<Result<Vec<_>>>()?;

        let encoded = self.encode_batches(&batches)?;
        tracing::info!(
            "Encoded captions to array of size ({}, {})",
            encoded.labels.nrows(),
            encoded.labels.ncols()
        );
        Ok(encoded)
    }

    /// Encode already-loaded splits.
    pub fn encode_batches(
        &self,
        batches: &[(Split, Vec<CaptionedImage>)],
    ) -> Result<EncodedCaptions, EncodeError> {
        // ── Pass 1: count images and captions ────────────────────────────────
        let (image_count, caption_count) = batches
            .iter()
            .flat_map(|(_, images)| images)
            .filter(|image| !self.excluded.contains(&image.id))
            .fold((0usize, 0usize), |(n, m), image| (n + 1, m + image.captions.len()));

        if u32::try_from(caption_count).is_err() {
            return Err(EncodeError::TooManyRows { rows: caption_count });
        }

        // ── Pass 2: encode rows and offsets ──────────────────────────────────
        let mut flat        = Vec::with_capacity(caption_count * self.max_length);
        let mut lengths     = Vec::with_capacity(caption_count);
        let mut start_ix    = Vec::with_capacity(image_count);
        let mut end_ix      = Vec::with_capacity(image_count);
        let mut images      = Vec::with_capacity(image_count);
        let mut rows: usize = 0;

        for (split, split_images) in batches {
            for image in split_images {
                if self.excluded.contains(&image.id) {
                    continue;
                }
                if image.captions.is_empty() {
                    return Err(EncodeError::NoCaptions { image_id: image.id });
                }

                for caption in &image.captions {
                    let (row, length) = self.encode_caption(image.id, caption)?;
                    flat.extend_from_slice(&row);
                    lengths.push(length);
                }

                // rows <= caption_count, which fits u32
                start_ix.push((rows + 1) as u32);
                rows += image.captions.len();
                end_ix.push(rows as u32);

                images.push(ImageInfo {
                    split:     split.metadata_label().to_string(),
                    file_path: image.file_path.clone(),
                    id:        image.id,
                });
            }
        }

        if rows != caption_count || lengths.len() != caption_count {
            return Err(EncodeError::RowCountMismatch { expected: caption_count, actual: rows });
        }

        let labels = Array2::from_shape_vec((rows, self.max_length), flat).map_err(|_| {
            EncodeError::RowCountMismatch { expected: caption_count, actual: rows }
        })?;

        Ok(EncodedCaptions {
            image_count: images.len(),
            labels,
            label_start_ix: Array1::from(start_ix),
            label_end_ix:   Array1::from(end_ix),
            label_length:   Array1::from(lengths),
            images,
        })
    }

    /// One padded label row and its recorded length.
    fn encode_caption(&self, image_id: u64, caption: &str) -> Result<(Vec<u32>, u32), EncodeError> {
        let tokens = split_sentence(caption);
        if tokens.is_empty() {
            return Err(EncodeError::EmptyCaption { image_id, caption: caption.to_string() });
        }

        let mut row = vec![0u32; self.max_length];
        for (slot, token) in row.iter_mut().zip(&tokens) {
            *slot = self.vocab.lookup(token);
        }

        let length = tokens.len().min(self.max_length) as u32;
        Ok((row, length))
    }
}
