//! Per-object box annotations and their array form.

use crate::common::*;

/// A labeled box in pixel coordinates of the original image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoxAnnotation {
    pub class_id: i32,
    pub y1: i32,
    pub x1: i32,
    pub y2: i32,
    pub x2: i32,
}

impl BoxAnnotation {
    pub fn tlbr(&self) -> Result<TLBR<i32>> {
        TLBR::try_from_tlbr([self.y1, self.x1, self.y2, self.x2])
    }
}

/// The dataset entry of one image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageInfo {
    pub filepath: PathBuf,
    pub bboxes: Vec<BoxAnnotation>,
}

/// Load a JSON array of [ImageInfo] entries.
///
/// Relative image paths are resolved against the directory of the annotation file.
pub fn load_image_infos(path: impl AsRef<Path>) -> Result<Vec<ImageInfo>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let infos: Vec<ImageInfo> = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse annotation file {}", path.display()))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));

    let infos: Vec<_> = infos
        .into_iter()
        .map(|info| {
            let num_degenerated = info
                .bboxes
                .iter()
                .filter(|bbox| bbox.tlbr().is_err())
                .count();
            if num_degenerated > 0 {
                warn!(
                    "{} boxes with flipped corners found in '{}'",
                    num_degenerated,
                    info.filepath.display()
                );
            }

            ImageInfo {
                filepath: base_dir.join(&info.filepath),
                ..info
            }
        })
        .collect();

    info!("loaded {} image entries from '{}'", infos.len(), path.display());
    Ok(infos)
}

/// Split annotations into class IDs `[N]` and boxes `[N, (y1, x1, y2, x2)]`.
pub fn extract_class_ids_and_bboxes(boxes: &[BoxAnnotation]) -> (Array1<i32>, Array2<i32>) {
    let class_ids: Array1<i32> = boxes.iter().map(|bbox| bbox.class_id).collect();
    let bboxes = Array2::from_shape_fn((boxes.len(), 4), |(row, col)| {
        let BoxAnnotation { y1, x1, y2, x2, .. } = boxes[row];
        [y1, x1, y2, x2][col]
    });
    (class_ids, bboxes)
}
