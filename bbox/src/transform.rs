use super::TLBR;
use crate::{common::*, Padding};

/// Per-axis scaling followed by translation.
///
/// A point `(y, x)` is mapped to `(y * sy + ty, x * sx + tx)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transform<T> {
    pub sy: T,
    pub sx: T,
    pub ty: T,
    pub tx: T,
}

impl<T> Transform<T>
where
    T: Copy + Num + NumCast,
{
    /// The map an image goes through when it is uniformly scaled first and then padded.
    pub fn from_scale_padding(scale: T, padding: &Padding) -> Result<Self> {
        let ty = T::from(padding.top);
        let tx = T::from(padding.left);
        let (ty, tx) = match (ty, tx) {
            (Some(ty), Some(tx)) => (ty, tx),
            _ => bail!("padding {:?} is not representable", padding),
        };

        Ok(Self {
            sy: scale,
            sx: scale,
            ty,
            tx,
        })
    }
}

impl<T> Transform<T>
where
    T: Copy + Num,
{
    /// Apply on `[y1, x1, y2, x2]` coordinates.
    pub fn apply(&self, tlbr: [T; 4]) -> [T; 4] {
        let [t, l, b, r] = tlbr;
        [
            t * self.sy + self.ty,
            l * self.sx + self.tx,
            b * self.sy + self.ty,
            r * self.sx + self.tx,
        ]
    }
}

impl<T> Mul<&TLBR<T>> for &Transform<T>
where
    T: Copy + Num,
{
    type Output = TLBR<T>;

    fn mul(self, rhs: &TLBR<T>) -> Self::Output {
        rhs.transform(self)
    }
}
