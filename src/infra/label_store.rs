// ============================================================
// Layer 5 — Label Store
// ============================================================
// Writes the two outputs of caption encoding:
//
//   <output_labels>_pretrained_label.npz
//       labels          (M, max_length) u32
//       label_start_ix  (N,) u32
//       label_end_ix    (N,) u32
//       label_length    (M,) u32
//
//   <output_json>_pretrained.json
//       {"ix_to_word": {"1": ...}, "images": [{split, file_path, id}, ...]}
//
// The .npz archive is what numpy.load() opens; each array is
// stored under its name with a .npy suffix.
//
// Both files are first written to temporary siblings and only
// renamed into place once both are complete. A failed run
// leaves neither output behind.

use anyhow::{Context, Result};
use ndarray_npy::NpzWriter;
use serde::Serialize;
use std::{
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

use crate::data::encoder::EncodedCaptions;
use crate::domain::{
    image::ImageInfo,
    vocabulary::{IxToWord, Vocabulary},
};

#[derive(Serialize)]
struct Metadata<'a> {
    ix_to_word: IxToWord<'a>,
    images: &'a [ImageInfo],
}

pub struct LabelStore {
    labels_path: PathBuf,
    json_path: PathBuf,
}

impl LabelStore {
    /// Output paths are derived from two prefixes, e.g.
    /// "data/vizwiztalk" → "data/vizwiztalk_pretrained_label.npz".
    pub fn new(output_labels: &str, output_json: &str) -> Self {
        Self {
            labels_path: PathBuf::from(format!("{output_labels}_pretrained_label.npz")),
            json_path:   PathBuf::from(format!("{output_json}_pretrained.json")),
        }
    }

    pub fn labels_path(&self) -> &Path {
        &self.labels_path
    }

    pub fn json_path(&self) -> &Path {
        &self.json_path
    }

    /// Write the label archive and the metadata JSON.
    pub fn write(&self, vocab: &Vocabulary, encoded: &EncodedCaptions) -> Result<()> {
        let labels   = self.stage_labels(encoded)?;
        let metadata = self.stage_metadata(vocab, &encoded.images)?;

        commit(labels, self.labels_path())?;
        if let Err(err) = commit(metadata, self.json_path()) {
            // Neither output survives a failed run
            let _ = fs::remove_file(self.labels_path());
            return Err(err);
        }

        tracing::info!(
            "Wrote {} label rows for {} images to '{}'",
            encoded.caption_count(),
            encoded.image_count,
            self.labels_path().display()
        );
        tracing::info!("Wrote '{}'", self.json_path().display());
        Ok(())
    }

    /// The four label arrays in one .npz archive.
    fn stage_labels(&self, encoded: &EncodedCaptions) -> Result<NamedTempFile> {
        let mut staged = staging_file(self.labels_path())?;

        let ctx = || format!("Cannot write label arrays for '{}'", self.labels_path.display());
        let mut npz = NpzWriter::new(BufWriter::new(staged.as_file_mut()));
        npz.add_array("labels", &encoded.labels).with_context(ctx)?;
        npz.add_array("label_start_ix", &encoded.label_start_ix).with_context(ctx)?;
        npz.add_array("label_end_ix", &encoded.label_end_ix).with_context(ctx)?;
        npz.add_array("label_length", &encoded.label_length).with_context(ctx)?;
        npz.finish().with_context(ctx)?.flush().with_context(ctx)?;

        Ok(staged)
    }

    /// The vocabulary and per-image metadata JSON.
    fn stage_metadata(&self, vocab: &Vocabulary, images: &[ImageInfo]) -> Result<NamedTempFile> {
        let mut staged = staging_file(self.json_path())?;
        let metadata   = Metadata { ix_to_word: vocab.ix_to_word(), images };

        let ctx = || format!("Cannot write metadata for '{}'", self.json_path.display());
        let mut writer = BufWriter::new(staged.as_file_mut());
        serde_json::to_writer(&mut writer, &metadata).with_context(ctx)?;
        writer.flush().with_context(ctx)?;
        drop(writer);

        Ok(staged)
    }
}

/// Temporary file in the directory `path` will be renamed into.
fn staging_file(path: &Path) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)
        .with_context(|| format!("Cannot create directory '{}'", dir.display()))?;
    NamedTempFile::new_in(dir)
        .with_context(|| format!("Cannot create temporary file in '{}'", dir.display()))
}

fn commit(staged: NamedTempFile, path: &Path) -> Result<()> {
    staged
        .persist(path)
        .map_err(|err| err.error)
        .with_context(|| format!("Cannot move output into place at '{}'", path.display()))?;
    Ok(())
}
