// ============================================================
// Layer 4 — Test Dummy Captions
// ============================================================
// Test splits ship without captions, but the encoder needs at
// least one per image. This gives every image a single
// placeholder caption so the test images get offset entries.

use crate::domain::annotation::{Annotation, AnnotationFile};

/// Caption text given to every image.
pub const DUMMY_CAPTION: &str = "the";

/// Replace all annotations with one dummy caption per image.
///
/// Caption ids count up from `next_id`. Returns the file and the
/// id to continue from, so several splits never share an id.
pub fn dummy_captions(mut file: AnnotationFile, mut next_id: u64) -> (AnnotationFile, u64) {
    file.annotations = file
        .images
        .iter()
        .map(|img| {
            let mut ann = Annotation::new(img.id, DUMMY_CAPTION);
            ann.id = Some(next_id);
            next_id += 1;
            ann
        })
        .collect();

    (file, next_id)
}
