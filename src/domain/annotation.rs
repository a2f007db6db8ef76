// ============================================================
// Layer 3 — Annotation Domain Types
// ============================================================
// Mirrors one split's annotation JSON file:
//
//   {
//     "images":      [{ "id": 1, "file_name": "VizWiz_train_00000001.jpg", ... }],
//     "annotations": [{ "image_id": 1, "caption": "...", "id": 7,
//                       "is_precanned": false, "is_rejected": false,
//                       "text_detected": true }],
//     ...
//   }
//
// Fields this crate does not interpret are kept in `extra` so
// filter and dummy rewrites hand them through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A whole annotation file for one dataset split.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnotationFile {
    #[serde(default)]
    pub images: Vec<ImageEntry>,

    #[serde(default)]
    pub annotations: Vec<Annotation>,

    /// "info", "licenses" and anything else at the top level
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of the `images` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageEntry {
    pub id: u64,

    pub file_name: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One caption attached to an image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Annotation {
    pub image_id: u64,

    pub caption: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// Caption is one of the canned "quality issues" answers
    #[serde(default)]
    pub is_precanned: bool,

    /// Caption was rejected during crowd-sourcing review
    #[serde(default)]
    pub is_rejected: bool,

    /// Text was detected in the image
    #[serde(default)]
    pub text_detected: bool,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ImageEntry {
    pub fn new(id: u64, file_name: impl Into<String>) -> Self {
        Self { id, file_name: file_name.into(), extra: Map::new() }
    }
}

impl Annotation {
    /// A plain caption with every flag cleared.
    pub fn new(image_id: u64, caption: impl Into<String>) -> Self {
        Self {
            image_id,
            caption:       caption.into(),
            id:            None,
            is_precanned:  false,
            is_rejected:   false,
            text_detected: false,
            extra:         Map::new(),
        }
    }

    /// True when the caption should not be used for training.
    pub fn is_unusable(&self) -> bool {
        self.is_rejected || self.is_precanned
    }
}
