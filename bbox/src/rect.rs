use crate::common::*;

/// The generic rectangle in `(y1, x1, y2, x2)` convention.
pub trait Rect {
    type Type;

    fn t(&self) -> Self::Type;
    fn l(&self) -> Self::Type;
    fn b(&self) -> Self::Type;
    fn r(&self) -> Self::Type;
    fn h(&self) -> Self::Type;
    fn w(&self) -> Self::Type;

    fn try_from_tlbr(tlbr: [Self::Type; 4]) -> Result<Self>
    where
        Self: Sized;

    fn try_from_tlhw(tlhw: [Self::Type; 4]) -> Result<Self>
    where
        Self: Sized;
}

pub trait RectNum: Rect
where
    Self::Type: Num + PartialOrd + Copy,
{
    fn tlbr(&self) -> [Self::Type; 4] {
        [self.t(), self.l(), self.b(), self.r()]
    }

    fn area(&self) -> Self::Type {
        self.h() * self.w()
    }

    /// Check if `other` lies entirely inside this rectangle, borders included.
    fn contains<R>(&self, other: &R) -> bool
    where
        R: Rect<Type = Self::Type>,
    {
        self.t() <= other.t() && self.l() <= other.l() && self.b() >= other.b() && self.r() >= other.r()
    }
}

impl<T> RectNum for T
where
    T: Rect,
    T::Type: Num + PartialOrd + Copy,
{
}
