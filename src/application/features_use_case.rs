// ============================================================
// Layer 2 — ConvertFeaturesUseCase
// ============================================================
// Converts bottom-up attention TSV exports into per-image numpy
// files:
//
//   Step 1: Create <output>_att / _fc / _box     (Layer 5 - infra)
//   Step 2: Stream every TSV row                  (Layer 4 - data)
//   Step 3: Save att / fc / box arrays per image  (Layer 5 - infra)
//
// Rows are independent; the first malformed one aborts the run.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, io::BufReader, path::Path};

use crate::data::region_features::FeatureReader;
use crate::infra::feature_store::FeatureStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertFeaturesConfig {
    pub input_dir:  String,
    pub inputs:     Vec<String>,
    pub output_dir: String,
}

impl Default for ConvertFeaturesConfig {
    fn default() -> Self {
        Self {
            input_dir:  "data/tsv".to_string(),
            inputs:     vec![
                "VizWiz_resnet101_faster_rcnn_genome_trainval.tsv.2".to_string(),
                "VizWiz_resnet101_faster_rcnn_genome_trainval.tsv.3".to_string(),
                "VizWiz_resnet101_faster_rcnn_genome_test.tsv.1".to_string(),
            ],
            output_dir: "data/vizwizbu".to_string(),
        }
    }
}

pub struct ConvertFeaturesUseCase {
    config: ConvertFeaturesConfig,
}

impl ConvertFeaturesUseCase {
    pub fn new(config: ConvertFeaturesConfig) -> Self {
        Self { config }
    }

    /// Returns the number of images converted.
    pub fn execute(&self) -> Result<usize> {
        let cfg   = &self.config;
        let store = FeatureStore::create(&cfg.output_dir)?;
        let mut converted = 0usize;

        for input in &cfg.inputs {
            let path = Path::new(&cfg.input_dir).join(input);
            tracing::info!("Reading '{}'", path.display());

            let file = fs::File::open(&path)
                .with_context(|| format!("Cannot open feature file '{}'", path.display()))?;

            for item in FeatureReader::new(BufReader::new(file)) {
                let item = item.with_context(|| format!("Bad row in '{}'", path.display()))?;
                store.save(&item)?;
                converted += 1;
            }
        }

        tracing::info!("Converted features for {} images", converted);
        Ok(converted)
    }
}
