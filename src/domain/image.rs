// ============================================================
// Layer 3 — Image and Split Domain Types
// ============================================================
// `Split` names a dataset partition and the annotation file
// that holds it (train.json, val.json, test.json).
//
// `CaptionedImage` is what a caption source yields: one image
// with all of its captions, in file order.
//
// `ImageInfo` is the per-image metadata record written next to
// the label arrays. Record i describes offset-index entry i.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::domain::error::ParseNameError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Val,
    Test,
}

impl Split {
    pub fn name(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val   => "val",
            Split::Test  => "test",
        }
    }

    /// Split label written to the metadata JSON.
    /// Validation images are folded into training.
    pub fn metadata_label(self) -> &'static str {
        match self {
            Split::Train | Split::Val => "train",
            Split::Test               => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Split {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "train" => Ok(Split::Train),
            "val"   => Ok(Split::Val),
            "test"  => Ok(Split::Test),
            other   => Err(ParseNameError {
                kind:     "split",
                value:    other.to_string(),
                expected: "train, val, test",
            }),
        }
    }
}

/// One image and its captions, as yielded by a caption source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionedImage {
    pub id:        u64,
    pub file_path: String,
    pub captions:  Vec<String>,
}

impl CaptionedImage {
    pub fn new<S: Into<String>>(
        id:        u64,
        file_path: impl Into<String>,
        captions:  impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            id,
            file_path: file_path.into(),
            captions:  captions.into_iter().map(Into::into).collect(),
        }
    }
}

/// Auxiliary metadata for one encoded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub split:     String,
    pub file_path: String,
    pub id:        u64,
}
