// ============================================================
// Layer 5 — Region-Feature Store
// ============================================================
// Writes three numpy files per image, next to each other in
// three sibling directories derived from one prefix:
//
//   <prefix>_att/<image_id>.npz   "feat": (num_boxes, dim), compressed
//   <prefix>_fc/<image_id>.npy    (dim,)  mean over boxes
//   <prefix>_box/<image_id>.npy   (num_boxes, 4)

use anyhow::{Context, Result};
use ndarray_npy::{write_npy, NpzWriter};
use std::{
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::data::region_features::RegionFeatures;

pub struct FeatureStore {
    att_dir: PathBuf,
    fc_dir: PathBuf,
    box_dir: PathBuf,
}

impl FeatureStore {
    /// Create the three output directories for `prefix`.
    pub fn create(prefix: &str) -> Result<Self> {
        let store = Self {
            att_dir: PathBuf::from(format!("{prefix}_att")),
            fc_dir:  PathBuf::from(format!("{prefix}_fc")),
            box_dir: PathBuf::from(format!("{prefix}_box")),
        };

        for dir in [&store.att_dir, &store.fc_dir, &store.box_dir] {
            fs::create_dir_all(dir)
                .with_context(|| format!("Cannot create directory '{}'", dir.display()))?;
        }
        Ok(store)
    }

    pub fn att_path(&self, image_id: u64) -> PathBuf {
        self.att_dir.join(format!("{image_id}.npz"))
    }

    pub fn fc_path(&self, image_id: u64) -> PathBuf {
        self.fc_dir.join(format!("{image_id}.npy"))
    }

    pub fn box_path(&self, image_id: u64) -> PathBuf {
        self.box_dir.join(format!("{image_id}.npy"))
    }

    /// Write the att / fc / box files of one image.
    pub fn save(&self, item: &RegionFeatures) -> Result<()> {
        let att = self.att_path(item.image_id);
        write_att(&att, item)?;

        let fc = self.fc_path(item.image_id);
        write_npy(&fc, &item.mean_feature())
            .with_context(|| format!("Cannot write '{}'", fc.display()))?;

        let boxes = self.box_path(item.image_id);
        write_npy(&boxes, &item.boxes)
            .with_context(|| format!("Cannot write '{}'", boxes.display()))?;

        tracing::debug!("Saved features for image {} ({} boxes)", item.image_id, item.num_boxes());
        Ok(())
    }
}

fn write_att(path: &Path, item: &RegionFeatures) -> Result<()> {
    let file = fs::File::create(path)
        .with_context(|| format!("Cannot create '{}'", path.display()))?;

    let ctx = || format!("Cannot write '{}'", path.display());
    let mut npz = NpzWriter::new_compressed(BufWriter::new(file));
    npz.add_array("feat", &item.features).with_context(ctx)?;
    npz.finish().with_context(ctx)?.flush().with_context(ctx)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::region_features::{parse_row, tests::sample_line};
    use ndarray::{Array1, Array2};
    use ndarray_npy::{read_npy, NpzReader};

    #[test]
    fn test_save_writes_three_files() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("vizwizbu");
        let store = FeatureStore::create(prefix.to_str().unwrap()).unwrap();

        let item = parse_row(&sample_line(77), 1).unwrap();
        store.save(&item).unwrap();

        let fc: Array1<f32> = read_npy(store.fc_path(77)).unwrap();
        assert_eq!(fc.to_vec(), vec![2.0, 3.0, 4.0]);

        let boxes: Array2<f32> = read_npy(store.box_path(77)).unwrap();
        assert_eq!(boxes, item.boxes);

        let mut npz = NpzReader::new(fs::File::open(store.att_path(77)).unwrap()).unwrap();
        let feat: Array2<f32> = npz.by_name("feat.npy").unwrap();
        assert_eq!(feat, item.features);

        assert!(dir.path().join("vizwizbu_att").is_dir());
    }
}
