//! Image and ground truth preprocessing for R-CNN style detection models.

mod common;
pub mod adjust;
pub mod annotation;
pub mod config;
pub mod ground_truth;
pub mod loader;
pub mod meta;
pub mod padding;
pub mod profiling;
pub mod resize;

pub use adjust::adjust_box;
pub use annotation::{extract_class_ids_and_bboxes, load_image_infos, BoxAnnotation, ImageInfo};
pub use config::{Config, ImageConfig};
pub use ground_truth::{load_image_gt, GroundTruth};
pub use loader::{load_image, normalize_channels};
pub use meta::{
    compose_image_meta, compose_image_meta_batch, parse_image_meta, ImageMeta, ParsedImageMeta,
    IMAGE_META_LEN,
};
pub use padding::fix_num_pad;
pub use resize::{resize_image, ResizeConfig, ResizeMode, Resized};
