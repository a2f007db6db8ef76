// ============================================================
// Layer 2 — FilterUseCase
// ============================================================
// Rewrites the raw annotation files of each split without
// rejected or precanned captions:
//
//   <input_dir>/<split>.json → <output_dir>/<split>.json

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::data::filter::{remove_rejected, FilterStats};
use crate::domain::image::Split;
use crate::infra::annotation_store;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    pub input_dir:  String,
    pub output_dir: String,
    pub splits:     Vec<Split>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            input_dir:  "annotations".to_string(),
            output_dir: "data".to_string(),
            splits:     vec![Split::Train, Split::Val],
        }
    }
}

pub struct FilterUseCase {
    config: FilterConfig,
}

impl FilterUseCase {
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    /// Filter every configured split; returns per-split stats.
    pub fn execute(&self) -> Result<Vec<(Split, FilterStats)>> {
        let cfg = &self.config;
        let mut report = Vec::with_capacity(cfg.splits.len());

        for &split in &cfg.splits {
            let name   = format!("{split}.json");
            let input  = Path::new(&cfg.input_dir).join(&name);
            let output = Path::new(&cfg.output_dir).join(&name);

            let (filtered, stats) = remove_rejected(annotation_store::read(&input)?);
            annotation_store::write(&output, &filtered)?;

            tracing::info!(
                "{}: kept {} captions / {} images, dropped {} captions / {} images",
                split,
                stats.annotations_kept,
                stats.images_kept,
                stats.annotations_dropped,
                stats.images_dropped
            );
            report.push((split, stats));
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::annotation::{Annotation, AnnotationFile, ImageEntry};

    #[test]
    fn test_filters_each_split_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("annotations");
        let output = dir.path().join("data");

        let mut rejected = Annotation::new(2, "quality issues are too severe");
        rejected.is_precanned = true;
        let raw = AnnotationFile {
            images: vec![ImageEntry::new(1, "a.jpg"), ImageEntry::new(2, "b.jpg")],
            annotations: vec![Annotation::new(1, "a cup"), rejected],
            ..Default::default()
        };
        annotation_store::write(&input.join("train.json"), &raw).unwrap();
        annotation_store::write(&input.join("val.json"), &raw).unwrap();

        let report = FilterUseCase::new(FilterConfig {
            input_dir:  input.to_string_lossy().into_owned(),
            output_dir: output.to_string_lossy().into_owned(),
            ..Default::default()
        })
        .execute()
        .unwrap();

        assert_eq!(report.len(), 2);
        assert_eq!(report[0].1.images_dropped, 1);

        let val = annotation_store::read(&output.join("val.json")).unwrap();
        assert_eq!(val.images.len(), 1);
        assert_eq!(val.annotations[0].caption, "a cup");
    }
}
