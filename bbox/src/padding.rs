use crate::common::*;

/// Zero padding in pixels added around an image, per spatial side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Padding {
    pub top: usize,
    pub bottom: usize,
    pub left: usize,
    pub right: usize,
}

impl Padding {
    /// Build from per-axis `(before, after)` pairs in `[height, width, channel]` order.
    ///
    /// The channel axis is never padded.
    pub fn try_from_axes(axes: [(usize, usize); 3]) -> Result<Self> {
        let [(top, bottom), (left, right), channel] = axes;
        ensure!(
            channel == (0, 0),
            "the channel axis cannot be padded, but get {:?}",
            channel
        );
        Ok(Self {
            top,
            bottom,
            left,
            right,
        })
    }

    /// Split the gap between `size` and `target` evenly, with the odd pixel going after.
    pub fn centered(size: [usize; 2], target: [usize; 2]) -> Result<Self> {
        let [h, w] = size;
        let [target_h, target_w] = target;
        ensure!(
            target_h >= h && target_w >= w,
            "cannot pad size {:?} into smaller target {:?}",
            size,
            target
        );
        let top = (target_h - h) / 2;
        let left = (target_w - w) / 2;
        Ok(Self {
            top,
            bottom: target_h - h - top,
            left,
            right: target_w - w - left,
        })
    }

    pub fn axes(&self) -> [(usize, usize); 3] {
        [(self.top, self.bottom), (self.left, self.right), (0, 0)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_centered() {
        let padding = Padding::centered([100, 128], [128, 128]).unwrap();
        assert_eq!(padding.axes(), [(14, 14), (0, 0), (0, 0)]);

        let padding = Padding::centered([99, 120], [128, 128]).unwrap();
        assert_eq!(padding.axes(), [(14, 15), (4, 4), (0, 0)]);

        assert!(Padding::centered([130, 100], [128, 128]).is_err());
    }

    #[test]
    fn padding_channel_axis() {
        assert!(Padding::try_from_axes([(1, 2), (3, 4), (0, 1)]).is_err());
        let padding = Padding::try_from_axes([(1, 2), (3, 4), (0, 0)]).unwrap();
        assert_eq!(padding.top, 1);
        assert_eq!(padding.right, 4);
    }
}
