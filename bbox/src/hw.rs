use crate::common::*;

/// Image size in height and width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HW<T> {
    h: T,
    w: T,
}

impl<T> HW<T>
where
    T: Num + PartialOrd + Copy,
{
    pub fn try_from_hw(hw: [T; 2]) -> Result<Self> {
        let [h, w] = hw;
        let zero = T::zero();
        ensure!(
            h >= zero && w >= zero,
            "height and width parameters must be non-negative"
        );
        Ok(Self { h, w })
    }

    pub fn area(&self) -> T {
        self.w * self.h
    }

    /// The shorter side.
    pub fn min_side(&self) -> T {
        if self.h <= self.w {
            self.h
        } else {
            self.w
        }
    }

    /// The longer side.
    pub fn max_side(&self) -> T {
        if self.h >= self.w {
            self.h
        } else {
            self.w
        }
    }
}
