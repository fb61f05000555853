//! Row padding to a fixed length with a validity tag column.

use crate::common::*;

/// Pad `array` along the first axis to `num` rows and append a tag column on the last axis.
///
/// The tag is `0` on the original rows and `-1` on the appended rows. The appended rows
/// are zero filled otherwise. An input with more than `num` rows is rejected.
pub fn fix_num_pad<S, A, D>(array: &ArrayBase<S, D>, num: usize) -> Result<Array<A, D>>
where
    S: Data<Elem = A>,
    A: Clone + Zero + One + Neg<Output = A>,
    D: Dimension,
{
    let ndim = array.ndim();
    ensure!(
        ndim >= 2,
        "expect an array with at least 2 dimensions, but get shape {:?}",
        array.shape()
    );
    let last_axis = ndim - 1;
    let num_rows = array.len_of(Axis(0));
    let num_cols = array.len_of(Axis(last_axis));
    ensure!(
        num_rows <= num,
        "cannot pad {} rows to a smaller length {}",
        num_rows,
        num
    );

    let mut shape = array.raw_dim();
    shape[0] = num;
    shape[last_axis] = num_cols + 1;
    let mut output = Array::zeros(shape);

    output
        .slice_each_axis_mut(|desc| match desc.axis.index() {
            0 => Slice::from(0..num_rows),
            index if index == last_axis => Slice::from(0..num_cols),
            _ => Slice::from(..),
        })
        .assign(array);
    output
        .slice_each_axis_mut(|desc| match desc.axis.index() {
            0 => Slice::from(num_rows..),
            index if index == last_axis => Slice::from(num_cols..),
            _ => Slice::from(..),
        })
        .fill(-A::one());

    Ok(output)
}
