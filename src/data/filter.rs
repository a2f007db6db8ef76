// ============================================================
// Layer 4 — Annotation Filter
// ============================================================
// Drops captions that crowd workers flagged as rejected or
// that are canned "quality issue" answers, then keeps only the
// images that still have at least one caption.
//
// Both lists keep their original order; every other field of
// the file is passed through.

use std::collections::HashSet;

use crate::domain::annotation::AnnotationFile;

/// Counts reported after filtering one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub annotations_kept:    usize,
    pub annotations_dropped: usize,
    pub images_kept:         usize,
    pub images_dropped:      usize,
}

/// Remove unusable captions and the images left without any.
pub fn remove_rejected(mut file: AnnotationFile) -> (AnnotationFile, FilterStats) {
    let total_annotations = file.annotations.len();
    let total_images      = file.images.len();

    file.annotations.retain(|ann| !ann.is_unusable());

    let valid: HashSet<u64> = file.annotations.iter().map(|ann| ann.image_id).collect();
    file.images.retain(|img| valid.contains(&img.id));

    let stats = FilterStats {
        annotations_kept:    file.annotations.len(),
        annotations_dropped: total_annotations - file.annotations.len(),
        images_kept:         file.images.len(),
        images_dropped:      total_images - file.images.len(),
    };
    (file, stats)
}
