// ============================================================
// Layer 4 — Region-Feature TSV Reader
// ============================================================
// Bottom-up attention exports one image per TSV line:
//
//   image_id \t image_w \t image_h \t num_boxes \t boxes \t features
//
// `boxes` and `features` are base64 strings holding
// little-endian f32 buffers. Each is reshaped to
// (num_boxes, -1): four coordinates per box, and typically 2048
// feature values per box.
//
// Any malformed line aborts the conversion.

use std::io::BufRead;

use base64::{engine::general_purpose::STANDARD, Engine};
use ndarray::{Array1, Array2, Axis};
use thiserror::Error;

/// Column names, in file order.
pub const FIELD_NAMES: [&str; 6] = ["image_id", "image_w", "image_h", "num_boxes", "boxes", "features"];

#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: expected {} tab-separated fields, found {found}", FIELD_NAMES.len())]
    FieldCount { line: usize, found: usize },

    #[error("line {line}: invalid {field} {value:?}")]
    InvalidNumber { line: usize, field: &'static str, value: String },

    #[error("line {line}: {field} is not valid base64: {source}")]
    Base64 { line: usize, field: &'static str, source: base64::DecodeError },

    #[error("line {line}: {field} holds {bytes} bytes, not a whole number of f32 values")]
    BufferLength { line: usize, field: &'static str, bytes: usize },

    #[error("line {line}: {field} holds {values} values, which do not split into {num_boxes} boxes")]
    Shape { line: usize, field: &'static str, values: usize, num_boxes: usize },

    #[error("line {line}: image {image_id} has no boxes")]
    NoBoxes { line: usize, image_id: u64 },
}

/// Decoded region features of one image.
#[derive(Debug, Clone)]
pub struct RegionFeatures {
    pub image_id: u64,
    /// (num_boxes, 4)
    pub boxes: Array2<f32>,
    /// (num_boxes, feature_dim)
    pub features: Array2<f32>,
}

impl RegionFeatures {
    pub fn num_boxes(&self) -> usize {
        self.features.nrows()
    }

    /// Feature vector averaged over all boxes.
    pub fn mean_feature(&self) -> Array1<f32> {
        // rows are never empty; parse_row rejects num_boxes == 0
        self.features
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(self.features.ncols()))
    }
}

/// Parse one TSV line. `line` is 1-based and used for messages.
pub fn parse_row(text: &str, line: usize) -> Result<RegionFeatures, FeatureError> {
    let fields: Vec<&str> = text.split('\t').collect();
    if fields.len() != FIELD_NAMES.len() {
        return Err(FeatureError::FieldCount { line, found: fields.len() });
    }

    let image_id: u64 = parse_number(fields[0], "image_id", line)?;
    let num_boxes: usize = parse_number(fields[3], "num_boxes", line)?;
    if num_boxes == 0 {
        return Err(FeatureError::NoBoxes { line, image_id });
    }

    Ok(RegionFeatures {
        image_id,
        boxes:    decode_matrix(fields[4], "boxes", num_boxes, line)?,
        features: decode_matrix(fields[5], "features", num_boxes, line)?,
    })
}

fn parse_number<T: std::str::FromStr>(value: &str, field: &'static str, line: usize) -> Result<T, FeatureError> {
    value.trim().parse().map_err(|_| FeatureError::InvalidNumber {
        line,
        field,
        value: value.to_string(),
    })
}

/// base64 → little-endian f32 → (num_boxes, -1)
fn decode_matrix(
    encoded:   &str,
    field:     &'static str,
    num_boxes: usize,
    line:      usize,
) -> Result<Array2<f32>, FeatureError> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|source| FeatureError::Base64 { line, field, source })?;

    if bytes.len() % 4 != 0 {
        return Err(FeatureError::BufferLength { line, field, bytes: bytes.len() });
    }

    let values: Vec<f32> = bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();

    let count = values.len();
    if count % num_boxes != 0 {
        return Err(FeatureError::Shape { line, field, values: count, num_boxes });
    }

    Array2::from_shape_vec((num_boxes, count / num_boxes), values)
        .map_err(|_| FeatureError::Shape { line, field, values: count, num_boxes })
}

/// Streams RegionFeatures out of a TSV reader, skipping blank lines.
pub struct FeatureReader<R> {
    lines: std::io::Lines<R>,
    line:  usize,
}

impl<R: BufRead> FeatureReader<R> {
    pub fn new(reader: R) -> Self {
        Self { lines: reader.lines(), line: 0 }
    }
}

impl<R: BufRead> Iterator for FeatureReader<R> {
    type Item = Result<RegionFeatures, FeatureError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let text = match self.lines.next()? {
                Ok(text) => text,
                Err(e)   => return Some(Err(e.into())),
            };
            self.line += 1;

            let text = text.trim_end_matches('\r');
            if text.trim().is_empty() {
                continue;
            }
            return Some(parse_row(text, self.line));
        }
    }
}
