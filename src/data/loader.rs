// ============================================================
// Layer 4 — Annotation Loader
// ============================================================
// Reads one `<split>.json` annotation file per dataset split
// and groups its captions by image.
//
// The order images come out in decides the order of the
// offset index, so it is an explicit parameter:
//
//   first-caption → order in which each image's first caption
//                   appears in `annotations` (images without
//                   captions are left out, with a warning)
//   image-list    → order of the `images` array
//   id            → ascending image id
//
// Captions of one image always keep their file order.

use std::{
    collections::HashMap,
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::domain::{
    annotation::{AnnotationFile, ImageEntry},
    error::ParseNameError,
    image::{CaptionedImage, Split},
    traits::CaptionSource,
};
use crate::infra::annotation_store;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageOrder {
    #[default]
    FirstCaption,
    ImageList,
    Id,
}

impl fmt::Display for ImageOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ImageOrder::FirstCaption => "first-caption",
            ImageOrder::ImageList    => "image-list",
            ImageOrder::Id           => "id",
        })
    }
}

impl FromStr for ImageOrder {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first-caption" => Ok(ImageOrder::FirstCaption),
            "image-list"    => Ok(ImageOrder::ImageList),
            "id"            => Ok(ImageOrder::Id),
            other           => Err(ParseNameError {
                kind:     "image order",
                value:    other.to_string(),
                expected: "first-caption, image-list, id",
            }),
        }
    }
}

/// Loads per-split annotation JSON files from a directory.
/// Implements the CaptionSource trait from Layer 3.
pub struct AnnotationLoader {
    /// Directory holding train.json, val.json, test.json
    dir: PathBuf,
    order: ImageOrder,
    /// Prepended to every file name when non-empty
    images_root: Option<PathBuf>,
}

impl AnnotationLoader {
    pub fn new(dir: impl Into<PathBuf>, order: ImageOrder) -> Self {
        Self { dir: dir.into(), order, images_root: None }
    }

    /// Prefix file paths with `root`. An empty root is ignored.
    pub fn with_images_root(mut self, root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        self.images_root = (!root.as_os_str().is_empty()).then(|| root.to_path_buf());
        self
    }

    pub fn split_path(&self, split: Split) -> PathBuf {
        self.dir.join(format!("{split}.json"))
    }
}

impl CaptionSource for AnnotationLoader {
    fn images(&self, split: Split) -> Result<Vec<CaptionedImage>> {
        let path = self.split_path(split);
        let file = annotation_store::read(&path)?;

        let mut images = group_captions(&file, self.order)?;
        if let Some(root) = &self.images_root {
            for image in &mut images {
                image.file_path = root.join(&image.file_path).to_string_lossy().into_owned();
            }
        }

        tracing::info!(
            "Loaded split '{}': {} images, {} captions from '{}'",
            split,
            images.len(),
            images.iter().map(|i| i.captions.len()).sum::<usize>(),
            path.display()
        );
        Ok(images)
    }
}

/// Group the captions of `file` by image, in the requested order.
///
/// Fails when a caption references an image id that is not in
/// the `images` list.
pub fn group_captions(file: &AnnotationFile, order: ImageOrder) -> Result<Vec<CaptionedImage>> {
    let mut entries: HashMap<u64, &ImageEntry> = HashMap::with_capacity(file.images.len());
    for entry in &file.images {
        if entries.insert(entry.id, entry).is_some() {
            tracing::warn!("Image id {} is listed more than once; using the last entry", entry.id);
        }
    }

    // Captions per image, plus first-appearance order
    let mut captions: HashMap<u64, Vec<String>> = HashMap::new();
    let mut first_seen: Vec<u64> = Vec::new();
    for ann in &file.annotations {
        if !entries.contains_key(&ann.image_id) {
            bail!(
                "caption {:?} references image {} which is not in the images list",
                ann.caption,
                ann.image_id
            );
        }
        captions
            .entry(ann.image_id)
            .or_insert_with(|| {
                first_seen.push(ann.image_id);
                Vec::new()
            })
            .push(ann.caption.clone());
    }

    let ids: Vec<u64> = match order {
        ImageOrder::FirstCaption => {
            let uncaptioned = entries.len() - first_seen.len();
            if uncaptioned > 0 {
                tracing::warn!("{} images have no captions and are skipped", uncaptioned);
            }
            first_seen
        }
        ImageOrder::ImageList => unique_ids(file),
        ImageOrder::Id => {
            let mut ids = unique_ids(file);
            ids.sort_unstable();
            ids
        }
    };

    Ok(ids
        .into_iter()
        .map(|id| CaptionedImage {
            id,
            file_path: entries[&id].file_name.clone(),
            captions:  captions.remove(&id).unwrap_or_default(),
        })
        .collect())
}

/// Image ids in list order, duplicates dropped.
fn unique_ids(file: &AnnotationFile) -> Vec<u64> {
    let mut seen = std::collections::HashSet::new();
    file.images
        .iter()
        .map(|e| e.id)
        .filter(|id| seen.insert(*id))
        .collect()
}
