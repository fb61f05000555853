//! Per-sample ground truth loading.

use crate::{
    adjust::adjust_box,
    annotation::{extract_class_ids_and_bboxes, ImageInfo},
    common::*,
    config::ImageConfig,
    loader::load_image,
    meta::ImageMeta,
    profiling::Timing,
    resize::{resize_image, Resized},
};

/// The model input of one image and its boxes.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundTruth {
    /// `[h, w, 3]` after resizing and padding.
    pub image: Array3<u8>,
    pub image_meta: ImageMeta,
    /// `[N]`
    pub class_ids: Array1<i32>,
    /// `[N, (y1, x1, y2, x2)]` in resized image coordinates.
    pub bbox: Array2<f64>,
}

impl GroundTruth {
    /// The image meta in its flat numeric form.
    pub fn meta_array(&self) -> Array1<f64> {
        self.image_meta.to_array()
    }
}

/// Load the image and boxes of a dataset entry, and resize both to the model input shape.
///
/// Boxes are not clipped. Some of them may fall outside the window, or become all
/// zeros if the annotation was empty.
pub fn load_image_gt<R>(
    config: &ImageConfig,
    image_info: &ImageInfo,
    image_id: usize,
    rng: &mut R,
) -> Result<GroundTruth>
where
    R: Rng,
{
    let mut timing = Timing::new("load_image_gt");
    let path = &image_info.filepath;

    let image = load_image(path)?;
    let original_image_shape = shape_of(&image);
    timing.set_record("load image");

    let resized = resize_image(image, &config.resize_config(), rng)?;
    check_window(&resized, original_image_shape, path)?;
    timing.set_record("resize");

    let (class_ids, bbox) = extract_class_ids_and_bboxes(&image_info.bboxes);
    let image_meta = ImageMeta {
        image_id,
        original_image_shape,
        image_shape: shape_of(&resized.image),
        window: resized.window.clone(),
        scale: resized.scale,
    };

    let mut bbox = adjust_box(&bbox, &resized.padding, resized.scale)?;
    if let Some(crop) = &resized.crop {
        let (off_y, off_x) = (crop.t() as f64, crop.l() as f64);
        bbox.column_mut(0).mapv_inplace(|y| y - off_y);
        bbox.column_mut(1).mapv_inplace(|x| x - off_x);
        bbox.column_mut(2).mapv_inplace(|y| y - off_y);
        bbox.column_mut(3).mapv_inplace(|x| x - off_x);
    }
    timing.set_record("adjust boxes");

    let num_outside = count_outside(&bbox, &resized.window)?;
    if num_outside > 0 {
        warn!(
            "{} out of {} boxes exceed the image window in '{}'",
            num_outside,
            bbox.nrows(),
            path.display()
        );
    }

    debug!(
        "loaded ground truth of '{}': image {:?}, {} boxes",
        path.display(),
        resized.image.dim(),
        bbox.nrows()
    );
    timing.report();

    Ok(GroundTruth {
        image: resized.image,
        image_meta,
        class_ids,
        bbox,
    })
}

fn shape_of(image: &Array3<u8>) -> [usize; 3] {
    let (h, w, c) = image.dim();
    [h, w, c]
}

/// Verify the box transform maps the whole original image onto the window.
fn check_window(resized: &Resized, original_shape: [usize; 3], path: &Path) -> Result<()> {
    // the window covers the crop, not the image, in crop mode
    if resized.crop.is_some() {
        return Ok(());
    }

    let [orig_h, orig_w, _] = original_shape;
    let mapped = resized
        .transform()?
        .apply([0.0, 0.0, orig_h as f64, orig_w as f64]);
    let window = resized.window.tlbr();

    // rounding of the resized size shifts the far corner by at most one pixel
    let max_diff = izip!(mapped, window)
        .map(|(lhs, rhs)| (lhs - rhs as f64).abs())
        .fold(0.0, f64::max);
    if max_diff > 1.0 {
        warn!(
            "box transform {:?} disagrees with window {:?} in '{}'",
            mapped,
            window,
            path.display()
        );
    }

    Ok(())
}

fn count_outside(bbox: &Array2<f64>, window: &TLBR<usize>) -> Result<usize> {
    let window: TLBR<f64> = window
        .clone()
        .try_cast()
        .ok_or_else(|| format_err!("unable to cast window {:?}", window))?;

    let count = bbox
        .outer_iter()
        .filter(|row| {
            let rect = TLBR::try_from_tlbr([row[0], row[1], row[2], row[3]]);
            matches!(rect, Ok(rect) if !window.contains(&rect))
        })
        .count();
    Ok(count)
}
