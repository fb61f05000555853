//! The flat numeric record describing an image before and after resizing.
//!
//! The record has [IMAGE_META_LEN] values laid out as
//!
//! | offset   | field                               |
//! |----------|-------------------------------------|
//! | `0`      | image ID                            |
//! | `1..4`   | original image shape `[h, w, c]`    |
//! | `4..7`   | resized image shape `[h, w, c]`     |
//! | `7..11`  | window `(y1, x1, y2, x2)` in pixels |
//! | `11`     | scale factor                        |

use crate::common::*;
use std::ops::Range;

pub const IMAGE_META_LEN: usize = 12;

const IMAGE_ID_OFFSET: usize = 0;
const ORIGINAL_SHAPE_RANGE: Range<usize> = 1..4;
const IMAGE_SHAPE_RANGE: Range<usize> = 4..7;
const WINDOW_RANGE: Range<usize> = 7..11;
const SCALE_OFFSET: usize = 11;

/// Attributes of an image going through resizing and padding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageMeta {
    pub image_id: usize,
    /// `[h, w, c]` before resizing or padding.
    pub original_image_shape: [usize; 3],
    /// `[h, w, c]` after resizing and padding.
    pub image_shape: [usize; 3],
    /// The area of the image where the real image is, excluding the padding.
    pub window: TLBR<usize>,
    /// The scaling factor applied to the original image.
    pub scale: R64,
}

impl ImageMeta {
    pub fn to_array(&self) -> Array1<f64> {
        let Self {
            image_id,
            original_image_shape,
            image_shape,
            ref window,
            scale,
        } = *self;

        let mut array = Array1::zeros(IMAGE_META_LEN);
        array[IMAGE_ID_OFFSET] = image_id as f64;
        izip!(ORIGINAL_SHAPE_RANGE, original_image_shape)
            .for_each(|(index, value)| array[index] = value as f64);
        izip!(IMAGE_SHAPE_RANGE, image_shape).for_each(|(index, value)| array[index] = value as f64);
        izip!(WINDOW_RANGE, window.tlbr()).for_each(|(index, value)| array[index] = value as f64);
        array[SCALE_OFFSET] = scale.raw();
        array
    }

    pub fn from_array<S>(array: &ArrayBase<S, ndarray::Ix1>) -> Result<Self>
    where
        S: Data<Elem = f64>,
    {
        ensure!(
            array.len() == IMAGE_META_LEN,
            "expect image meta of length {}, but get {}",
            IMAGE_META_LEN,
            array.len()
        );

        let image_id = to_index(array[IMAGE_ID_OFFSET])?;
        let original_image_shape = to_indices(array, ORIGINAL_SHAPE_RANGE)?;
        let image_shape = to_indices(array, IMAGE_SHAPE_RANGE)?;
        let window = TLBR::try_from_tlbr(to_indices(array, WINDOW_RANGE)?)?;
        let scale = R64::try_new(array[SCALE_OFFSET])
            .ok_or_else(|| format_err!("scale must be finite, but get {}", array[SCALE_OFFSET]))?;

        Ok(Self {
            image_id,
            original_image_shape,
            image_shape,
            window,
            scale,
        })
    }
}

/// Columnar view of a batch of image meta records.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedImageMeta {
    /// `[batch]`
    pub image_id: Array1<i32>,
    /// `[batch, 3]`
    pub original_image_shape: Array2<i32>,
    /// `[batch, 3]`
    pub image_shape: Array2<i32>,
    /// `[batch, (y1, x1, y2, x2)]`
    pub window: Array2<i32>,
    /// `[batch]`
    pub scale: Array1<f32>,
}

impl ParsedImageMeta {
    pub fn batch_size(&self) -> usize {
        self.image_id.len()
    }

    /// Rebuild the typed record of each row.
    pub fn to_metas(&self) -> Result<Vec<ImageMeta>> {
        (0..self.batch_size())
            .map(|index| -> Result<_> {
                let row = |array: &Array2<i32>| -> Result<[usize; 3]> {
                    let values: Vec<usize> = array
                        .row(index)
                        .iter()
                        .map(|&value| to_index(value as f64))
                        .try_collect()?;
                    Ok([values[0], values[1], values[2]])
                };
                let window: Vec<usize> = self
                    .window
                    .row(index)
                    .iter()
                    .map(|&value| to_index(value as f64))
                    .try_collect()?;

                Ok(ImageMeta {
                    image_id: to_index(self.image_id[index] as f64)?,
                    original_image_shape: row(&self.original_image_shape)?,
                    image_shape: row(&self.image_shape)?,
                    window: TLBR::try_from_tlbr([window[0], window[1], window[2], window[3]])?,
                    scale: R64::try_new(self.scale[index] as f64)
                        .ok_or_else(|| format_err!("scale must be finite"))?,
                })
            })
            .try_collect()
    }
}

/// Put the attributes of an image into one `[IMAGE_META_LEN]` array.
pub fn compose_image_meta(
    image_id: usize,
    original_image_shape: [usize; 3],
    image_shape: [usize; 3],
    window: TLBR<usize>,
    scale: R64,
) -> Array1<f64> {
    ImageMeta {
        image_id,
        original_image_shape,
        image_shape,
        window,
        scale,
    }
    .to_array()
}

/// Stack image meta records into a `[batch, IMAGE_META_LEN]` array.
pub fn compose_image_meta_batch(metas: &[ImageMeta]) -> Array2<f64> {
    let mut batch = Array2::zeros((metas.len(), IMAGE_META_LEN));
    izip!(batch.outer_iter_mut(), metas).for_each(|(mut row, meta)| row.assign(&meta.to_array()));
    batch
}

/// Split a `[batch, IMAGE_META_LEN]` array into its fields.
///
/// IDs, shapes and windows are truncated to `i32` and the scale is narrowed to `f32`.
pub fn parse_image_meta<S>(meta: &ArrayBase<S, ndarray::Ix2>) -> Result<ParsedImageMeta>
where
    S: Data<Elem = f64>,
{
    ensure!(
        meta.ncols() == IMAGE_META_LEN,
        "expect image meta in [batch, {}] shape, but get {:?}",
        IMAGE_META_LEN,
        meta.shape()
    );

    let columns =
        |range: Range<usize>| meta.slice(s![.., range]).mapv(|value| value as i32);

    Ok(ParsedImageMeta {
        image_id: meta.column(IMAGE_ID_OFFSET).mapv(|value| value as i32),
        original_image_shape: columns(ORIGINAL_SHAPE_RANGE),
        image_shape: columns(IMAGE_SHAPE_RANGE),
        window: columns(WINDOW_RANGE),
        scale: meta.column(SCALE_OFFSET).mapv(|value| value as f32),
    })
}

fn to_index(value: f64) -> Result<usize> {
    ensure!(
        value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value < usize::MAX as f64,
        "expect a non-negative integer, but get {}",
        value
    );
    Ok(value as usize)
}

fn to_indices<S, const N: usize>(
    array: &ArrayBase<S, ndarray::Ix1>,
    range: Range<usize>,
) -> Result<[usize; N]>
where
    S: Data<Elem = f64>,
{
    debug_assert_eq!(range.len(), N);
    let mut indices = [0; N];
    izip!(&mut indices, range).try_for_each(|(index, offset)| -> Result<_> {
        *index = to_index(array[offset])?;
        Ok(())
    })?;
    Ok(indices)
}
