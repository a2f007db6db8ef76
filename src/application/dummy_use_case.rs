// ============================================================
// Layer 2 — DummyUseCase
// ============================================================
// Gives every image of the unlabelled splits a placeholder
// caption so the caption encoder can index them.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::data::dummy::dummy_captions;
use crate::domain::image::Split;
use crate::infra::annotation_store;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DummyConfig {
    pub input_dir:        String,
    pub output_dir:       String,
    pub splits:           Vec<Split>,
    /// First caption id handed out; continues across splits
    pub first_caption_id: u64,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            input_dir:        "annotations".to_string(),
            output_dir:       "data".to_string(),
            splits:           vec![Split::Test],
            first_caption_id: 155905,
        }
    }
}

pub struct DummyUseCase {
    config: DummyConfig,
}

impl DummyUseCase {
    pub fn new(config: DummyConfig) -> Self {
        Self { config }
    }

    /// Returns the number of dummy captions written.
    pub fn execute(&self) -> Result<u64> {
        let cfg = &self.config;
        let mut next_id = cfg.first_caption_id;

        for &split in &cfg.splits {
            let name   = format!("{split}.json");
            let input  = Path::new(&cfg.input_dir).join(&name);
            let output = Path::new(&cfg.output_dir).join(&name);

            let (file, next) = dummy_captions(annotation_store::read(&input)?, next_id);
            annotation_store::write(&output, &file)?;

            tracing::info!("{}: {} dummy captions written to '{}'", split, next - next_id, output.display());
            next_id = next;
        }

        Ok(next_id - cfg.first_caption_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::annotation::{AnnotationFile, ImageEntry};

    #[test]
    fn test_ids_continue_across_splits() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        let output = dir.path().join("out");

        let two = AnnotationFile {
            images: vec![ImageEntry::new(1, "a.jpg"), ImageEntry::new(2, "b.jpg")],
            ..Default::default()
        };
        annotation_store::write(&input.join("val.json"), &two).unwrap();
        annotation_store::write(&input.join("test.json"), &two).unwrap();

        let written = DummyUseCase::new(DummyConfig {
            input_dir:        input.to_string_lossy().into_owned(),
            output_dir:       output.to_string_lossy().into_owned(),
            splits:           vec![Split::Val, Split::Test],
            first_caption_id: 10,
        })
        .execute()
        .unwrap();

        assert_eq!(written, 4);
        let test = annotation_store::read(&output.join("test.json")).unwrap();
        assert_eq!(test.annotations[0].id, Some(12));
        assert_eq!(test.annotations[1].id, Some(13));
    }
}
