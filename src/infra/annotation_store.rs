// ============================================================
// Layer 5 — Annotation Store
// ============================================================
// Reads and writes per-split annotation JSON files.

use anyhow::{Context, Result};
use std::{
    fs,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use crate::domain::annotation::AnnotationFile;

/// Parse one annotation file.
pub fn read(path: &Path) -> Result<AnnotationFile> {
    let file = fs::File::open(path)
        .with_context(|| format!("Cannot open annotation file '{}'", path.display()))?;

    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Cannot parse annotation file '{}'", path.display()))
}

/// Write one annotation file, creating parent directories.
pub fn write(path: &Path, data: &AnnotationFile) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
    }

    let file = fs::File::create(path)
        .with_context(|| format!("Cannot create '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);

    let ctx = || format!("Cannot write annotations to '{}'", path.display());
    serde_json::to_writer(&mut writer, data).with_context(ctx)?;
    writer.flush().with_context(ctx)?;

    tracing::debug!(
        "Wrote {} images / {} annotations to '{}'",
        data.images.len(),
        data.annotations.len(),
        path.display()
    );
    Ok(())
}
