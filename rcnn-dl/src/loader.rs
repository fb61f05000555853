//! Image file loading.

use crate::common::*;
use ::image::{io::Reader as ImageReader, ColorType, DynamicImage, GenericImageView as _};

/// Load an image file into a `[height, width, 3]` RGB array.
///
/// Grayscale images are broadcast to three channels and the alpha channel is dropped.
pub fn load_image(path: impl AsRef<Path>) -> Result<Array3<u8>> {
    let path = path.as_ref();
    let image = ImageReader::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?
        .with_guessed_format()
        .with_context(|| {
            format!(
                "failed to determine the image file format: {}",
                path.display()
            )
        })?
        .decode()
        .with_context(|| format!("failed to decode image file: {}", path.display()))?;

    let raw = to_raw_array(&image)?;
    debug!("decoded '{}' into shape {:?}", path.display(), raw.shape());
    normalize_channels(raw)
}

/// Convert a decoded image to an `[h, w]` luma array or an `[h, w, c]` color array.
fn to_raw_array(image: &DynamicImage) -> Result<ArrayD<u8>> {
    let (width, height) = image.dimensions();
    let (h, w) = (height as usize, width as usize);

    let array = match image.color() {
        // luma alpha is reduced to luma, as alpha is discarded in the end anyway
        ColorType::L8 | ColorType::La8 | ColorType::L16 | ColorType::La16 => {
            Array::from_shape_vec(IxDyn(&[h, w]), image.to_luma8().into_raw())?
        }
        color if color.has_alpha() => {
            Array::from_shape_vec(IxDyn(&[h, w, 4]), image.to_rgba8().into_raw())?
        }
        _ => Array::from_shape_vec(IxDyn(&[h, w, 3]), image.to_rgb8().into_raw())?,
    };

    Ok(array)
}

/// Normalize a pixel array to exactly three channels.
///
/// * `[h, w]` and `[h, w, 1]` - the single channel is replicated.
/// * `[h, w, 3]` - returned as is.
/// * `[h, w, 4]` - the fourth channel is dropped.
pub fn normalize_channels<T>(image: ArrayD<T>) -> Result<Array3<T>>
where
    T: Clone,
{
    let image = match image.ndim() {
        2 => image.insert_axis(Axis(2)).into_dimensionality::<Ix3>()?,
        3 => image.into_dimensionality::<Ix3>()?,
        ndim => bail!("expect a 2 or 3 dimensional image, but get {} dimensions", ndim),
    };
    let (h, w, c) = image.dim();

    let output = match c {
        1 => image
            .broadcast((h, w, 3))
            .ok_or_else(|| format_err!("unable to broadcast shape {:?}", (h, w, c)))?
            .to_owned(),
        3 => image,
        4 => image.slice_move(s![.., .., ..3]),
        _ => bail!("unsupported number of image channels {}", c),
    };

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grayscale_is_broadcast() {
        let gray = Array::from_shape_fn(IxDyn(&[4, 5]), |idx| (idx[0] * 5 + idx[1]) as u8);
        let rgb = normalize_channels(gray.clone()).unwrap();
        assert_eq!(rgb.dim(), (4, 5, 3));
        for channel in 0..3 {
            assert_eq!(
                rgb.index_axis(Axis(2), channel).into_dyn(),
                gray.view()
            );
        }
    }

    #[test]
    fn strided_grayscale_is_broadcast() {
        let base = Array::from_shape_fn((4, 10), |(row, col)| (row * 10 + col) as u8);
        let strided = base.slice_move(s![.., ..;2]).into_dyn();
        let rgb = normalize_channels(strided.clone()).unwrap();
        assert_eq!(rgb.dim(), (4, 5, 3));
        for channel in 0..3 {
            assert_eq!(rgb.index_axis(Axis(2), channel).into_dyn(), strided);
        }

        let transposed = Array::from_shape_fn((4, 10), |(row, col)| (row + col) as u8)
            .reversed_axes()
            .into_dyn();
        let rgb = normalize_channels(transposed).unwrap();
        assert_eq!(rgb.dim(), (10, 4, 3));
    }

    #[test]
    fn single_channel_is_broadcast() {
        let gray = Array::from_elem(IxDyn(&[2, 3, 1]), 7u8);
        let rgb = normalize_channels(gray).unwrap();
        assert_eq!(rgb.dim(), (2, 3, 3));
        assert!(rgb.iter().all(|&value| value == 7));
    }

    #[test]
    fn alpha_is_dropped() {
        let rgba = Array::from_shape_fn(IxDyn(&[3, 2, 4]), |idx| (idx[2] * 10 + idx[0]) as u8);
        let rgb = normalize_channels(rgba.clone()).unwrap();
        assert_eq!(rgb.dim(), (3, 2, 3));
        let expect = rgba
            .into_dimensionality::<Ix3>()
            .unwrap()
            .slice_move(s![.., .., ..3]);
        assert_eq!(rgb, expect);
    }

    #[test]
    fn rgb_is_unchanged() {
        let image = Array::from_shape_fn(IxDyn(&[2, 2, 3]), |idx| idx[2] as f32);
        let output = normalize_channels(image.clone()).unwrap();
        assert_eq!(output.into_dyn(), image);
    }

    #[test]
    fn unsupported_shapes_are_rejected() {
        assert!(normalize_channels(Array::<u8, _>::zeros(IxDyn(&[2, 2, 2]))).is_err());
        assert!(normalize_channels(Array::<u8, _>::zeros(IxDyn(&[4]))).is_err());
    }
}
