//! Bounding box, image size and padding types in pixel units.

mod common;

pub use hw::*;
pub mod hw;

pub use padding::*;
pub mod padding;

pub use rect::*;
pub mod rect;

pub use tlbr::*;
pub mod tlbr;

pub use transform::*;
mod transform;

pub mod prelude {
    pub use crate::rect::{Rect, RectNum};
}
