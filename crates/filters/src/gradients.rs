//! Derivative-kernel builders: Prewitt, Sobel, Scharr and the discrete
//! Laplace operator.
//!
//! Each gradient is a 1-D derivation kernel `{sign, 0, -sign}` convolved with
//! a smoothing kernel on the remaining axes; the Laplace operator sums 1-D
//! second differences `{sign, -2*sign, sign}` across axes.

use num_traits::Num;
use rastra_core::{Bounds, Element, Result};

use crate::agg::FilterAgg;
use crate::engine::SimpleFilter;
use crate::kernels::{convolution, convolution_along, line_window, Convolution};
use crate::seq::FilterSeq;

/// Exact small integer constant in `T`.
fn small<T: Num>(n: u32) -> T {
    (0..n).fold(T::zero(), |acc, _| acc + T::one())
}

fn directional_gradient<T, const N: usize>(
    derivation: usize,
    averaging: &[usize],
    sign: T,
    side: u32,
    middle: u32,
) -> Result<FilterSeq<SimpleFilter<Convolution<T>, Bounds<N>, N>>>
where
    T: Element + Num,
{
    let derive =
        convolution_along::<T, N>(&[derivation], &[sign, T::zero(), T::zero() - sign])?;
    if averaging.is_empty() {
        return Ok(derive);
    }
    let smooth =
        convolution_along::<T, N>(averaging, &[small(side), small(middle), small(side)])?;
    Ok(derive.compose(smooth))
}

/// Prewitt gradient: derivation `{sign, 0, -sign}` along `derivation`,
/// averaging `{1, 1, 1}` along each axis of `averaging`.
///
/// Keep `sign = 1` to differentiate in the increasing-index direction, or
/// pass `-1` for the opposite one.
pub fn prewitt_gradient<T, const N: usize>(
    derivation: usize,
    averaging: &[usize],
    sign: T,
) -> Result<FilterSeq<SimpleFilter<Convolution<T>, Bounds<N>, N>>>
where
    T: Element + Num,
{
    directional_gradient(derivation, averaging, sign, 1, 1)
}

/// Sobel gradient: averaging kernel `{1, 2, 1}`.
///
/// See [`prewitt_gradient`].
pub fn sobel_gradient<T, const N: usize>(
    derivation: usize,
    averaging: &[usize],
    sign: T,
) -> Result<FilterSeq<SimpleFilter<Convolution<T>, Bounds<N>, N>>>
where
    T: Element + Num,
{
    directional_gradient(derivation, averaging, sign, 1, 2)
}

/// Scharr gradient: averaging kernel `{3, 10, 3}`.
///
/// See [`prewitt_gradient`].
pub fn scharr_gradient<T, const N: usize>(
    derivation: usize,
    averaging: &[usize],
    sign: T,
) -> Result<FilterSeq<SimpleFilter<Convolution<T>, Bounds<N>, N>>>
where
    T: Element + Num,
{
    directional_gradient(derivation, averaging, sign, 3, 10)
}

/// Discrete Laplace operator: sum across `axes` of the 1-D second difference
/// `{sign, -2*sign, sign}`.
pub fn laplace_operator<T, const N: usize>(
    axes: &[usize],
    sign: T,
) -> Result<FilterAgg<impl Fn(T, T) -> T + Copy, SimpleFilter<Convolution<T>, Bounds<N>, N>>>
where
    T: Element + Num,
{
    let two = T::one() + T::one();
    let branches = axes
        .iter()
        .map(|&axis| {
            line_window::<N>(axis, 3).and_then(|window| {
                convolution(&[sign, T::zero() - two * sign, sign], window)
            })
        })
        .collect::<Result<Vec<_>>>()?;
    FilterAgg::new(|a, b| a + b, branches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Filter;
    use rastra_core::{Position, Raster};

    fn ramp() -> Raster<f64, 2> {
        // f(x, y) = 3x + y
        Raster::from_fn(Bounds::from_shape(Position::new([7, 7])), |p| {
            (3 * p[0] + p[1]) as f64
        })
    }

    #[test]
    fn test_prewitt_on_ramp() {
        let gradient = prewitt_gradient::<f64, 2>(0, &[1], 1.0).unwrap();
        let out = gradient.apply_inner(&ramp()).unwrap();
        // Convolving {1, 0, -1} along a slope-3 ramp gives +6 per tap,
        // times 3 averaging taps.
        for (_, &v) in out.iter() {
            assert!((v - 18.0).abs() < 1e-12, "got {v}");
        }
    }

    #[test]
    fn test_sobel_sign_flip() {
        let forward = sobel_gradient::<f64, 2>(0, &[1], 1.0).unwrap();
        let backward = sobel_gradient::<f64, 2>(0, &[1], -1.0).unwrap();
        let input = ramp();
        let f = forward.apply_inner(&input).unwrap();
        let b = backward.apply_inner(&input).unwrap();
        for (p, &v) in f.iter() {
            assert!((v + b[p]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_scharr_weights() {
        let gradient = scharr_gradient::<i64, 2>(0, &[1], 1).unwrap();
        let smoothing = &gradient.stages()[1];
        assert_eq!(smoothing.op().weights(), &[3, 10, 3]);
    }

    #[test]
    fn test_laplace_of_parabola() {
        let input = Raster::from_fn(Bounds::<2>::from_shape(Position::new([7, 7])), |p| {
            (p[0] * p[0] + p[1] * p[1]) as f64
        });
        let laplace = laplace_operator::<f64, 2>(&[0, 1], 1.0).unwrap();
        let out = laplace.apply_inner(&input).unwrap();
        for (_, &v) in out.iter() {
            assert!((v - 4.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_laplace_axis_out_of_range() {
        assert!(laplace_operator::<f64, 2>(&[0, 2], 1.0).is_err());
    }
}
