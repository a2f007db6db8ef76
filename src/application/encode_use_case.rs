// ============================================================
// Layer 2 — EncodeUseCase
// ============================================================
// Orchestrates caption encoding:
//
//   Step 1: Load the base vocabulary          (Layer 5 - infra)
//   Step 2: Optionally extend it              (Layer 4 - data)
//   Step 3: Encode captions of every split    (Layer 4 - data)
//   Step 4: Write label arrays + metadata     (Layer 5 - infra)
//
// All arrays are built in memory before anything is written,
// and both output files are committed together by LabelStore,
// so a failed run leaves no partial output behind.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::data::{
    encoder::{CaptionEncoder, EncodedCaptions},
    loader::{AnnotationLoader, ImageOrder},
    vocab_builder::{count_words, extend_words},
};
use crate::domain::{image::Split, traits::CaptionSource, vocabulary::Vocabulary};
use crate::infra::{label_store::LabelStore, vocab_store::VocabStore};

// ─── Encoding Configuration ──────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodeConfig {
    pub annotations_dir:      String,
    pub vocab_path:           String,
    pub output_json:          String,
    pub output_labels:        String,
    pub images_root:          String,
    pub max_length:           usize,
    pub word_count_threshold: usize,
    pub extend_vocab:         bool,
    pub splits:               Vec<Split>,
    pub image_order:          ImageOrder,
    pub exclude:              Vec<u64>,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            annotations_dir:      "data".to_string(),
            vocab_path:           "data/cocotalk_vocab.json".to_string(),
            output_json:          "data/vizwiztalk".to_string(),
            output_labels:        "data/vizwiztalk".to_string(),
            images_root:          String::new(),
            max_length:           16,
            word_count_threshold: 5,
            extend_vocab:         false,
            splits:               vec![Split::Train, Split::Val, Split::Test],
            image_order:          ImageOrder::FirstCaption,
            exclude:              Vec::new(),
        }
    }
}

pub struct EncodeUseCase {
    config: EncodeConfig,
}

impl EncodeUseCase {
    pub fn new(config: EncodeConfig) -> Self {
        Self { config }
    }

    /// Run the whole pipeline and write both output files.
    pub fn execute(&self) -> Result<EncodedCaptions> {
        let cfg = &self.config;
        tracing::info!("Parsed input parameters:\n{}", serde_json::to_string_pretty(cfg)?);

        let loader = AnnotationLoader::new(&cfg.annotations_dir, cfg.image_order)
            .with_images_root(&cfg.images_root);

        let vocab   = self.build_vocab(&loader)?;
        let encoded = self.encode(&vocab, &loader)?;
        if let Some(row) = encoded.labels.rows().into_iter().next() {
            tracing::debug!("First caption decodes to: {}", vocab.decode(&row.to_vec()).join(" "));
        }

        let store = LabelStore::new(&cfg.output_labels, &cfg.output_json);
        store.write(&vocab, &encoded)?;

        Ok(encoded)
    }

    /// Base vocabulary, grown from training captions when asked.
    fn build_vocab(&self, source: &dyn CaptionSource) -> Result<Vocabulary> {
        let cfg = &self.config;
        let mut words = VocabStore::new(&cfg.vocab_path).load_words()?;

        if cfg.extend_vocab {
            let mut train_captions = Vec::new();
            for &split in cfg.splits.iter().filter(|&&s| s == Split::Train) {
                for image in source.images(split)? {
                    train_captions.extend(image.captions);
                }
            }
            let counts = count_words(train_captions.iter().map(String::as_str));
            words = extend_words(words, counts, cfg.word_count_threshold);
        }

        let vocab = Vocabulary::from_words(words)?;
        tracing::info!("Vocabulary size: {} (UNK = {})", vocab.len(), vocab.unk_ix());
        Ok(vocab)
    }

    fn encode(&self, vocab: &Vocabulary, source: &dyn CaptionSource) -> Result<EncodedCaptions> {
        let cfg = &self.config;
        let excluded: HashSet<u64> = cfg.exclude.iter().copied().collect();
        if !excluded.is_empty() {
            tracing::info!("Excluding {} images", excluded.len());
        }

        let encoder = CaptionEncoder::new(vocab, cfg.max_length, &excluded)?;
        encoder.encode(source, &cfg.splits)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::annotation::{Annotation, AnnotationFile, ImageEntry};
    use crate::infra::annotation_store;
    use std::{fs, path::Path};

    fn write_split(dir: &Path, split: &str, images: &[(u64, &[&str])]) {
        let file = AnnotationFile {
            images: images.iter().map(|(id, _)| ImageEntry::new(*id, format!("{id}.jpg"))).collect(),
            annotations: images
                .iter()
                .flat_map(|(id, caps)| caps.iter().map(move |c| Annotation::new(*id, *c)))
                .collect(),
            ..Default::default()
        };
        annotation_store::write(&dir.join(format!("{split}.json")), &file).unwrap();
    }

    fn config(dir: &Path) -> EncodeConfig {
        let vocab_path = dir.join("vocab.json");
        VocabStore::new(&vocab_path)
            .save(&["a".to_string(), "dog".to_string(), "runs".to_string()])
            .unwrap();

        let out = dir.join("out").join("talk").to_string_lossy().into_owned();
        EncodeConfig {
            annotations_dir: dir.to_string_lossy().into_owned(),
            vocab_path:      vocab_path.to_string_lossy().into_owned(),
            output_json:     out.clone(),
            output_labels:   out,
            max_length:      5,
            ..Default::default()
        }
    }

    #[test]
    fn test_end_to_end_writes_outputs() {
        let dir = tempfile::tempdir().unwrap();
        write_split(dir.path(), "train", &[(1, &["A dog runs!", "a dog"]), (2, &["runs."])]);
        write_split(dir.path(), "val", &[(3, &["dog"])]);
        write_split(dir.path(), "test", &[(4, &["the"])]);

        let cfg = config(dir.path());
        let store = LabelStore::new(&cfg.output_labels, &cfg.output_json);
        let enc = EncodeUseCase::new(cfg).execute().unwrap();

        assert_eq!(enc.image_count, 4);
        assert_eq!(enc.label_start_ix.to_vec(), vec![1, 3, 4, 5]);
        assert_eq!(enc.label_end_ix.to_vec(), vec![2, 3, 4, 5]);
        assert_eq!(enc.labels.row(0).to_vec(), vec![1, 2, 3, 4, 0]);

        let splits: Vec<&str> = enc.images.iter().map(|i| i.split.as_str()).collect();
        assert_eq!(splits, vec!["train", "train", "train", "test"]);

        assert!(store.labels_path().is_file());
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.json_path()).unwrap()).unwrap();
        assert_eq!(json["images"].as_array().unwrap().len(), 4);
        assert_eq!(json["ix_to_word"]["4"], "UNK");
    }

    #[test]
    fn test_exclusion_and_splits_from_config() {
        let dir = tempfile::tempdir().unwrap();
        write_split(dir.path(), "train", &[(1, &["a"]), (2, &["dog"]), (3, &["runs"])]);

        let cfg = EncodeConfig {
            splits:  vec![Split::Train],
            exclude: vec![2],
            ..config(dir.path())
        };
        let enc = EncodeUseCase::new(cfg).execute().unwrap();

        assert_eq!(enc.images.iter().map(|i| i.id).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(enc.label_end_ix.to_vec(), vec![1, 2]);
    }

    #[test]
    fn test_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        write_split(dir.path(), "train", &[(1, &["a"]), (2, &["  .  "])]);

        let cfg = EncodeConfig { splits: vec![Split::Train], ..config(dir.path()) };
        let store = LabelStore::new(&cfg.output_labels, &cfg.output_json);

        let err = EncodeUseCase::new(cfg).execute().unwrap_err();
        assert!(err.to_string().contains("has no words"));
        assert!(!store.labels_path().exists());
        assert!(!store.json_path().exists());
    }

    #[test]
    fn test_unwritable_metadata_leaves_no_labels() {
        let dir = tempfile::tempdir().unwrap();
        write_split(dir.path(), "train", &[(1, &["a dog"])]);
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let cfg = EncodeConfig {
            splits:      vec![Split::Train],
            output_json: blocker.join("talk").to_string_lossy().into_owned(),
            ..config(dir.path())
        };
        let store = LabelStore::new(&cfg.output_labels, &cfg.output_json);

        assert!(EncodeUseCase::new(cfg).execute().is_err());
        assert!(!store.labels_path().exists());
    }

    #[test]
    fn test_extend_vocab_adds_frequent_train_words() {
        let dir = tempfile::tempdir().unwrap();
        write_split(dir.path(), "train", &[(1, &["a cat", "a cat", "a cat"]), (2, &["cat bird"])]);

        let cfg = EncodeConfig {
            splits:               vec![Split::Train],
            extend_vocab:         true,
            word_count_threshold: 2,
            ..config(dir.path())
        };
        let store = LabelStore::new(&cfg.output_labels, &cfg.output_json);
        let enc = EncodeUseCase::new(cfg).execute().unwrap();

        // a=1 dog=2 runs=3 cat=4 UNK=5; "bird" seen once → UNK
        assert_eq!(enc.labels.row(3).to_vec(), vec![4, 5, 0, 0, 0]);
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.json_path()).unwrap()).unwrap();
        assert_eq!(json["ix_to_word"]["4"], "cat");
        assert_eq!(json["ix_to_word"]["5"], "UNK");
    }
}
