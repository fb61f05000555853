//! Box coordinate adjustment after the image is resized and padded.

use crate::common::*;

/// Map `[N, (y1, x1, y2, x2)]` boxes from the original image onto the resized image.
///
/// The coordinates are multiplied by `scale` first, then shifted by the top padding on
/// the y axis and the left padding on the x axis. It must match the order in which
/// the image itself was transformed. Boxes are not clipped to the image.
pub fn adjust_box<S, A>(
    boxes: &ArrayBase<S, ndarray::Ix2>,
    padding: &Padding,
    scale: R64,
) -> Result<Array2<f64>>
where
    S: Data<Elem = A>,
    A: Copy + ToPrimitive,
{
    ensure!(
        boxes.ncols() == 4,
        "expect boxes in [N, 4] shape, but get {:?}",
        boxes.shape()
    );
    let transform = Transform::from_scale_padding(scale.raw(), padding)?;

    let mut output = Array2::zeros((boxes.nrows(), 4));
    izip!(output.outer_iter_mut(), boxes.outer_iter()).try_for_each(
        |(mut output_row, input_row)| -> Result<_> {
            let coords: Vec<f64> = input_row
                .iter()
                .map(|value| {
                    value
                        .to_f64()
                        .ok_or_else(|| format_err!("box coordinate is not representable as f64"))
                })
                .try_collect()?;
            let adjusted = transform.apply([coords[0], coords[1], coords[2], coords[3]]);
            output_row.assign(&ArrayView1::from(&adjusted[..]));
            Ok(())
        },
    )?;

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn adjust_scale_then_pad() {
        let boxes = arr2(&[[10, 20, 30, 40]]);
        let padding = Padding::try_from_axes([(5, 5), (2, 2), (0, 0)]).unwrap();
        let output = adjust_box(&boxes, &padding, r64(2.0)).unwrap();
        assert_eq!(output, arr2(&[[25.0, 42.0, 65.0, 82.0]]));
    }

    #[test]
    fn adjust_without_padding_only_scales() {
        let boxes = arr2(&[[1.0, 2.0, 3.0, 4.0], [0.0, 0.0, 0.0, 0.0]]);
        let output = adjust_box(&boxes, &Padding::default(), r64(0.5)).unwrap();
        assert_eq!(output, arr2(&[[0.5, 1.0, 1.5, 2.0], [0.0, 0.0, 0.0, 0.0]]));
    }

    #[test]
    fn adjust_does_not_clip() {
        let boxes = arr2(&[[0, 0, 100, 100]]);
        let padding = Padding::try_from_axes([(0, 0), (10, 10), (0, 0)]).unwrap();
        let output = adjust_box(&boxes, &padding, r64(1.5)).unwrap();
        assert_eq!(output, arr2(&[[0.0, 10.0, 150.0, 160.0]]));
    }

    #[test]
    fn adjust_empty_and_malformed() {
        let empty = Array2::<i32>::zeros((0, 4));
        let output = adjust_box(&empty, &Padding::default(), r64(3.0)).unwrap();
        assert_eq!(output.dim(), (0, 4));

        let malformed = Array2::<i32>::zeros((2, 3));
        assert!(adjust_box(&malformed, &Padding::default(), r64(1.0)).is_err());
    }
}
