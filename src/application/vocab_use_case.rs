// ============================================================
// Layer 2 — ExtractVocabUseCase
// ============================================================
// Pulls the 1-indexed vocabulary out of a training run's
// infos file and saves it as a standalone ix_to_word JSON, so
// the caption encoder can reuse the pretrained word indices.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::infra::vocab_store::{read_infos_vocab, VocabStore};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractVocabConfig {
    pub infos_path:  String,
    pub output_path: String,
}

impl Default for ExtractVocabConfig {
    fn default() -> Self {
        Self {
            infos_path:  "log/log_aoanet_rl/infos_aoanet.pkl".to_string(),
            output_path: "data/cocotalk_vocab.json".to_string(),
        }
    }
}

pub struct ExtractVocabUseCase {
    config: ExtractVocabConfig,
}

impl ExtractVocabUseCase {
    pub fn new(config: ExtractVocabConfig) -> Self {
        Self { config }
    }

    /// Returns the number of words written.
    pub fn execute(&self) -> Result<usize> {
        let cfg = &self.config;
        tracing::info!("Reading vocab from '{}'", cfg.infos_path);

        let words = read_infos_vocab(Path::new(&cfg.infos_path))?;
        VocabStore::new(&cfg.output_path).save(&words)?;
        Ok(words.len())
    }
}
