// ============================================================
// Layer 5 — Vocabulary Store
// ============================================================
// Loads and saves `{"ix_to_word": {"1": "a", "2": "dog", ...}}`
// vocabulary files, and pulls the vocabulary out of a training
// run's infos file.
//
// Infos files come in two flavours:
//   *.json → {"vocab": {"1": "a", ...}, ...}
//   other  → Python pickle with the same "vocab" entry. Classes
//            the pickle references (argparse options, numpy
//            scalars) are replaced by None; only "vocab" is read.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::domain::vocabulary::{ordered_words, IxToWord};

#[derive(Deserialize)]
struct VocabFile {
    ix_to_word: HashMap<String, String>,
}

#[derive(Serialize)]
struct VocabFileRef<'a> {
    ix_to_word: IxToWord<'a>,
}

#[derive(Deserialize)]
struct Infos {
    vocab: HashMap<String, String>,
}

pub struct VocabStore {
    path: PathBuf,
}

impl VocabStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Words in index order (word i has index i + 1).
    pub fn load_words(&self) -> Result<Vec<String>> {
        let file = fs::File::open(&self.path)
            .with_context(|| format!("Cannot open vocabulary '{}'", self.path.display()))?;
        let parsed: VocabFile = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Cannot parse vocabulary '{}'", self.path.display()))?;

        let words = ordered_words(&parsed.ix_to_word)
            .with_context(|| format!("Invalid vocabulary '{}'", self.path.display()))?;
        tracing::info!("Number of words in the base vocab: {}", words.len());
        Ok(words)
    }

    /// Save words as a 1-indexed `ix_to_word` object.
    pub fn save(&self, words: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
        }

        let file = fs::File::create(&self.path)
            .with_context(|| format!("Cannot create '{}'", self.path.display()))?;
        let mut writer = BufWriter::new(file);

        let ctx = || format!("Cannot write vocabulary to '{}'", self.path.display());
        serde_json::to_writer(&mut writer, &VocabFileRef { ix_to_word: IxToWord::new(words) })
            .with_context(ctx)?;
        writer.flush().with_context(ctx)?;

        tracing::info!("Saved {} words to '{}'", words.len(), self.path.display());
        Ok(())
    }
}

/// Read the "vocab" entry of an infos file, in index order.
pub fn read_infos_vocab(path: &Path) -> Result<Vec<String>> {
    let file = fs::File::open(path)
        .with_context(|| format!("Cannot open infos file '{}'", path.display()))?;
    let reader = BufReader::new(file);

    let infos: Infos = if path.extension().and_then(|e| e.to_str()) == Some("json") {
        serde_json::from_reader(reader)
            .with_context(|| format!("Cannot parse infos JSON '{}'", path.display()))?
    } else {
        let options = serde_pickle::DeOptions::new()
            .replace_unresolved_globals()
            .decode_strings();
        serde_pickle::from_reader(reader, options)
            .with_context(|| format!("Cannot unpickle infos file '{}'", path.display()))?
    };

    ordered_words(&infos.vocab)
        .with_context(|| format!("Invalid vocab in infos file '{}'", path.display()))
}
