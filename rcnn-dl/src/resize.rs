//! Image resizing to the model input shape.

use crate::common::*;
use ::image::{imageops, imageops::FilterType, RgbImage};

/// The strategy to fit an image into the model input shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeMode {
    /// Keep the image as is.
    None,
    /// Scale and zero pad to a `[max_dim, max_dim]` square.
    Square,
    /// Scale and zero pad each side up to a multiple of 64.
    Pad64,
    /// Scale and take a random `[min_dim, min_dim]` crop.
    Crop,
}

/// Resizing parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResizeConfig {
    /// The image is scaled up so that the shorter side is at least this long.
    pub min_dim: Option<usize>,
    /// The lower bound of the scaling factor.
    pub min_scale: Option<R64>,
    /// The longer side never exceeds this in square mode.
    pub max_dim: Option<usize>,
    pub mode: ResizeMode,
}

/// The resized image along with the parameters applied to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resized {
    /// `[h, w, 3]`
    pub image: Array3<u8>,
    /// The region of real image content, excluding the padding.
    pub window: TLBR<usize>,
    pub scale: R64,
    pub padding: Padding,
    /// The `(y1, x1, y2, x2)` region taken from the scaled image in crop mode.
    pub crop: Option<TLBR<usize>>,
}

impl Resized {
    /// The map from original image coordinates to resized image coordinates,
    /// excluding the crop offset.
    pub fn transform(&self) -> Result<Transform<f64>> {
        Transform::from_scale_padding(self.scale.raw(), &self.padding)
    }
}

/// Resize an image while keeping the aspect ratio.
///
/// The image is scaled first and then padded or cropped according to `config.mode`.
/// `rng` is only used in crop mode.
pub fn resize_image<R>(image: Array3<u8>, config: &ResizeConfig, rng: &mut R) -> Result<Resized>
where
    R: Rng,
{
    let ResizeConfig {
        min_dim,
        max_dim,
        mode,
        ..
    } = *config;
    let (orig_h, orig_w, _) = image.dim();
    let orig_size = HW::try_from_hw([orig_h, orig_w])?;
    ensure!(orig_size.area() > 0, "cannot resize an empty image");

    let scale = compute_scale(config, &orig_size)?;

    let image = if scale != 1.0 {
        let new_h = (orig_h as f64 * scale).round_ties_even() as usize;
        let new_w = (orig_w as f64 * scale).round_ties_even() as usize;
        resize_pixels(&image, new_h, new_w)?
    } else {
        image
    };
    let (h, w, _) = image.dim();

    let resized = match mode {
        ResizeMode::None => Resized {
            image,
            window: TLBR::try_from_tlbr([0, 0, h, w])?,
            scale: r64(scale),
            padding: Padding::default(),
            crop: None,
        },
        ResizeMode::Square => {
            let max_dim = max_dim.ok_or_else(|| format_err!("max_dim is required in square mode"))?;
            let padding = Padding::centered([h, w], [max_dim, max_dim])?;
            Resized {
                image: pad_pixels(&image, &padding),
                window: TLBR::try_from_tlhw([padding.top, padding.left, h, w])?,
                scale: r64(scale),
                padding,
                crop: None,
            }
        }
        ResizeMode::Pad64 => {
            let min_dim = min_dim.ok_or_else(|| format_err!("min_dim is required in pad64 mode"))?;
            ensure!(
                min_dim % 64 == 0,
                "min_dim must be a multiple of 64 in pad64 mode, but get {}",
                min_dim
            );
            let round_up = |len: usize| (len + 63) / 64 * 64;
            let padding = Padding::centered([h, w], [round_up(h), round_up(w)])?;
            Resized {
                image: pad_pixels(&image, &padding),
                window: TLBR::try_from_tlhw([padding.top, padding.left, h, w])?,
                scale: r64(scale),
                padding,
                crop: None,
            }
        }
        ResizeMode::Crop => {
            let min_dim = min_dim.ok_or_else(|| format_err!("min_dim is required in crop mode"))?;
            ensure!(
                h >= min_dim && w >= min_dim,
                "cannot crop [{}, {}] out of a [{}, {}] image",
                min_dim,
                min_dim,
                h,
                w
            );
            let y = rng.gen_range(0..=(h - min_dim));
            let x = rng.gen_range(0..=(w - min_dim));
            let image = image
                .slice(s![y..(y + min_dim), x..(x + min_dim), ..])
                .to_owned();
            Resized {
                image,
                window: TLBR::try_from_tlbr([0, 0, min_dim, min_dim])?,
                scale: r64(scale),
                padding: Padding::default(),
                crop: Some(TLBR::try_from_tlhw([y, x, min_dim, min_dim])?),
            }
        }
    };

    debug!(
        "resized [{}, {}] image to {:?} with scale {}",
        orig_h,
        orig_w,
        resized.image.dim(),
        scale
    );

    Ok(resized)
}

/// The scaling factor, which stays `1.0` in [ResizeMode::None].
///
/// Sizes are rounded half to even.
fn compute_scale(config: &ResizeConfig, orig_size: &HW<usize>) -> Result<f64> {
    let ResizeConfig {
        min_dim,
        min_scale,
        max_dim,
        mode,
    } = *config;

    if mode == ResizeMode::None {
        return Ok(1.0);
    }

    let mut scale = 1.0;
    if let Some(min_dim) = min_dim {
        scale = (min_dim as f64 / orig_size.min_side() as f64).max(1.0);
    }
    if let Some(min_scale) = min_scale {
        scale = scale.max(min_scale.raw());
    }
    if mode == ResizeMode::Square {
        let max_dim = max_dim.ok_or_else(|| format_err!("max_dim is required in square mode"))?;
        let image_max = orig_size.max_side() as f64;
        if (image_max * scale).round_ties_even() > max_dim as f64 {
            scale = max_dim as f64 / image_max;
        }
    }

    Ok(scale)
}

/// Bilinear resize of an RGB array.
fn resize_pixels(image: &Array3<u8>, new_h: usize, new_w: usize) -> Result<Array3<u8>> {
    let (h, w, c) = image.dim();
    ensure!(c == 3, "expect an RGB image, but get {} channels", c);
    ensure!(
        new_h > 0 && new_w > 0,
        "the image [{}, {}] vanishes after resizing",
        h,
        w
    );

    let samples: Vec<u8> = image.iter().copied().collect();
    let buffer = RgbImage::from_raw(w as u32, h as u32, samples)
        .ok_or_else(|| format_err!("pixel buffer does not match image size [{}, {}]", h, w))?;
    let resized = imageops::resize(&buffer, new_w as u32, new_h as u32, FilterType::Triangle);
    let output = Array3::from_shape_vec((new_h, new_w, 3), resized.into_raw())?;
    Ok(output)
}

/// Zero pad an image on spatial axes.
fn pad_pixels(image: &Array3<u8>, padding: &Padding) -> Array3<u8> {
    let (h, w, c) = image.dim();
    let Padding {
        top,
        bottom,
        left,
        right,
    } = *padding;

    let mut output = Array3::zeros((top + h + bottom, left + w + right, c));
    output
        .slice_mut(s![top..(top + h), left..(left + w), ..])
        .assign(image);
    output
}
