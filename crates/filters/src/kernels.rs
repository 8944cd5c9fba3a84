//! Concrete window operators and kernel construction helpers.

use num_traits::{Num, NumCast};
use rastra_core::{Bounds, Element, Error, Mask, Position, Raster, Region, Result};

use crate::engine::{SimpleFilter, WindowOp};
use crate::seq::FilterSeq;

/// Correlation kernel: inner product of the weights and the neighborhood, in
/// window order.
#[derive(Debug, Clone, PartialEq)]
pub struct Correlation<T> {
    weights: Vec<T>,
}

impl<T> Correlation<T> {
    /// Create a correlation operator from weights in window order.
    pub fn new(weights: Vec<T>) -> Self {
        Self { weights }
    }

    /// The weights, in window order.
    pub fn weights(&self) -> &[T] {
        &self.weights
    }
}

impl<T: Element + Num> WindowOp<T> for Correlation<T> {
    fn evaluate(&self, neighbors: &[T]) -> T {
        self.weights
            .iter()
            .zip(neighbors)
            .fold(T::zero(), |acc, (&w, &v)| acc + w * v)
    }
}

/// Convolution kernel: inner product of the reversed weights and the
/// neighborhood (true signal-processing convolution).
#[derive(Debug, Clone, PartialEq)]
pub struct Convolution<T> {
    weights: Vec<T>,
}

impl<T> Convolution<T> {
    /// Create a convolution operator from weights in window order.
    pub fn new(weights: Vec<T>) -> Self {
        Self { weights }
    }

    /// The weights, in window order.
    pub fn weights(&self) -> &[T] {
        &self.weights
    }
}

impl<T: Element + Num> WindowOp<T> for Convolution<T> {
    fn evaluate(&self, neighbors: &[T]) -> T {
        self.weights
            .iter()
            .rev()
            .zip(neighbors)
            .fold(T::zero(), |acc, (&w, &v)| acc + w * v)
    }
}

/// Arithmetic mean of the neighborhood.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mean;

impl<T: Element + Num + NumCast> WindowOp<T> for Mean {
    fn evaluate(&self, neighbors: &[T]) -> T {
        let sum = neighbors.iter().fold(T::zero(), |acc, &v| acc + v);
        match T::from(neighbors.len()) {
            Some(count) if !count.is_zero() => sum / count,
            _ => sum,
        }
    }
}

/// Median of the neighborhood via partial selection.
///
/// An even-sized neighborhood yields the mean of the two middle order
/// statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Median;

impl<T: Element + Num + PartialOrd> WindowOp<T> for Median {
    fn evaluate(&self, neighbors: &[T]) -> T {
        let mut values = neighbors.to_vec();
        let mid = values.len() / 2;
        let (lows, nth, _) = values.select_nth_unstable_by(mid, |a, b| {
            a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal)
        });
        let upper = *nth;
        if neighbors.len() % 2 == 1 {
            return upper;
        }
        let mut lower = lows[0];
        for &v in &lows[1..] {
            if v > lower {
                lower = v;
            }
        }
        (lower + upper) / (T::one() + T::one())
    }
}

/// Minimum of the neighborhood.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Minimum;

impl<T: Element + PartialOrd> WindowOp<T> for Minimum {
    fn evaluate(&self, neighbors: &[T]) -> T {
        match neighbors.split_first() {
            Some((&first, rest)) => {
                rest.iter().fold(first, |acc, &v| if v < acc { v } else { acc })
            }
            None => panic!("extremum of an empty window"),
        }
    }
}

/// Maximum of the neighborhood.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Maximum;

impl<T: Element + PartialOrd> WindowOp<T> for Maximum {
    fn evaluate(&self, neighbors: &[T]) -> T {
        match neighbors.split_first() {
            Some((&first, rest)) => {
                rest.iter().fold(first, |acc, &v| if v > acc { v } else { acc })
            }
            None => panic!("extremum of an empty window"),
        }
    }
}

/// Binary erosion: logical AND over the neighborhood.
///
/// An optimization of the minimum filter for booleans: a false center decides
/// the output without fetching the neighborhood.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinaryErosion;

impl WindowOp<bool> for BinaryErosion {
    const SHORTCUTS: bool = true;

    fn evaluate(&self, neighbors: &[bool]) -> bool {
        neighbors.iter().all(|&v| v)
    }

    fn shortcut(&self, center: bool) -> Option<bool> {
        if center {
            None
        } else {
            Some(false)
        }
    }
}

/// Binary dilation: logical OR over the neighborhood.
///
/// An optimization of the maximum filter for booleans: a true center decides
/// the output without fetching the neighborhood.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinaryDilation;

impl WindowOp<bool> for BinaryDilation {
    const SHORTCUTS: bool = true;

    fn evaluate(&self, neighbors: &[bool]) -> bool {
        neighbors.iter().any(|&v| v)
    }

    fn shortcut(&self, center: bool) -> Option<bool> {
        if center {
            Some(true)
        } else {
            None
        }
    }
}

fn ensure_window<R: Region<N>, const N: usize>(window: &R) -> Result<()> {
    if window.is_empty() {
        return Err(Error::InvalidParameter {
            name: "window",
            reason: "structuring element must contain at least one position".into(),
        });
    }
    Ok(())
}

/// 1-D window of `length` taps along `axis`, centered with even lengths
/// rounded down.
pub(crate) fn line_window<const N: usize>(axis: usize, length: usize) -> Result<Bounds<N>> {
    if axis >= N {
        return Err(Error::AxisOutOfRange { axis, dimension: N });
    }
    let radius = (length / 2) as i64;
    let front = Position::zero().with_axis(axis, -radius);
    let back = Position::zero().with_axis(axis, length as i64 - radius - 1);
    Ok(Bounds::new(front, back))
}

/// Make a correlation filter from flat values and a window region.
///
/// The value count must equal the window size.
pub fn correlation<T, R, const N: usize>(
    values: &[T],
    window: R,
) -> Result<SimpleFilter<Correlation<T>, R, N>>
where
    T: Element + Num,
    R: Region<N>,
{
    if values.len() != window.size() {
        return Err(Error::ShapeMismatch {
            expected: window.size(),
            actual: values.len(),
        });
    }
    Ok(SimpleFilter::new(Correlation::new(values.to_vec()), window))
}

/// Make a correlation filter from a weight raster and an origin position.
pub fn correlation_of<T, const N: usize>(
    weights: &Raster<T, N>,
    origin: Position<N>,
) -> Result<SimpleFilter<Correlation<T>, Bounds<N>, N>>
where
    T: Element + Num,
{
    correlation(weights.values(), weights.domain().translate(-origin))
}

/// Make a correlation filter from a weight raster with a centered origin.
///
/// Even-length axes round the center down.
pub fn correlation_centered<T, const N: usize>(
    weights: &Raster<T, N>,
) -> Result<SimpleFilter<Correlation<T>, Bounds<N>, N>>
where
    T: Element + Num,
{
    correlation_of(weights, weights.domain().center())
}

/// Make a convolution filter from flat values and a window region.
///
/// The value count must equal the window size.
pub fn convolution<T, R, const N: usize>(
    values: &[T],
    window: R,
) -> Result<SimpleFilter<Convolution<T>, R, N>>
where
    T: Element + Num,
    R: Region<N>,
{
    if values.len() != window.size() {
        return Err(Error::ShapeMismatch {
            expected: window.size(),
            actual: values.len(),
        });
    }
    Ok(SimpleFilter::new(Convolution::new(values.to_vec()), window))
}

/// Make a convolution filter from a weight raster and an origin position.
pub fn convolution_of<T, const N: usize>(
    weights: &Raster<T, N>,
    origin: Position<N>,
) -> Result<SimpleFilter<Convolution<T>, Bounds<N>, N>>
where
    T: Element + Num,
{
    convolution(weights.values(), weights.domain().translate(-origin))
}

/// Make a convolution filter from a weight raster with a centered origin.
///
/// Even-length axes round the center down.
pub fn convolution_centered<T, const N: usize>(
    weights: &Raster<T, N>,
) -> Result<SimpleFilter<Convolution<T>, Bounds<N>, N>>
where
    T: Element + Num,
{
    convolution_of(weights, weights.domain().center())
}

/// Make a sparse convolution filter from a weight raster with a centered
/// origin, skipping zero-weight taps.
///
/// The window becomes a [`Mask`] flagged at the non-zero taps of the reversed
/// weights, so disabled cells cost nothing at application time.
pub fn sparse_convolution<T, const N: usize>(
    weights: &Raster<T, N>,
) -> Result<SimpleFilter<Correlation<T>, Mask<N>, N>>
where
    T: Element + Num,
{
    let origin = weights.domain().center();
    let window = weights.domain().translate(-origin);
    let reversed: Vec<T> = weights.values().iter().rev().copied().collect();
    let flags = reversed.iter().map(|&w| w != T::zero()).collect();
    let mask = Mask::from_flags(window, flags)?;
    let kept: Vec<T> = reversed.into_iter().filter(|&w| w != T::zero()).collect();
    correlation(&kept, mask)
}

/// Make a sequence of identical 1-D correlation kernels along given axes.
///
/// Axes need not be distinct, e.g. to define an iterated kernel.
pub fn correlation_along<T, const N: usize>(
    axes: &[usize],
    values: &[T],
) -> Result<FilterSeq<SimpleFilter<Correlation<T>, Bounds<N>, N>>>
where
    T: Element + Num,
{
    let stages = axes
        .iter()
        .map(|&axis| {
            line_window::<N>(axis, values.len()).and_then(|window| correlation(values, window))
        })
        .collect::<Result<Vec<_>>>()?;
    FilterSeq::new(stages)
}

/// Make a sequence of identical 1-D convolution kernels along given axes.
///
/// Axes need not be distinct, e.g. to define an iterated kernel.
pub fn convolution_along<T, const N: usize>(
    axes: &[usize],
    values: &[T],
) -> Result<FilterSeq<SimpleFilter<Convolution<T>, Bounds<N>, N>>>
where
    T: Element + Num,
{
    let stages = axes
        .iter()
        .map(|&axis| {
            line_window::<N>(axis, values.len()).and_then(|window| convolution(values, window))
        })
        .collect::<Result<Vec<_>>>()?;
    FilterSeq::new(stages)
}

/// Make a mean filter with a given structuring element.
pub fn mean_filter<R: Region<N>, const N: usize>(window: R) -> Result<SimpleFilter<Mean, R, N>> {
    ensure_window(&window)?;
    Ok(SimpleFilter::new(Mean, window))
}

/// Make a median filter with a given structuring element.
pub fn median_filter<R: Region<N>, const N: usize>(
    window: R,
) -> Result<SimpleFilter<Median, R, N>> {
    ensure_window(&window)?;
    Ok(SimpleFilter::new(Median, window))
}

/// Make a minimum filter with a given structuring element.
pub fn minimum_filter<R: Region<N>, const N: usize>(
    window: R,
) -> Result<SimpleFilter<Minimum, R, N>> {
    ensure_window(&window)?;
    Ok(SimpleFilter::new(Minimum, window))
}

/// Make a maximum filter with a given structuring element.
pub fn maximum_filter<R: Region<N>, const N: usize>(
    window: R,
) -> Result<SimpleFilter<Maximum, R, N>> {
    ensure_window(&window)?;
    Ok(SimpleFilter::new(Maximum, window))
}

/// Make a binary erosion filter with a given structuring element.
pub fn erosion<R: Region<N>, const N: usize>(
    window: R,
) -> Result<SimpleFilter<BinaryErosion, R, N>> {
    ensure_window(&window)?;
    Ok(SimpleFilter::new(BinaryErosion, window))
}

/// Make a binary dilation filter with a given structuring element.
pub fn dilation<R: Region<N>, const N: usize>(
    window: R,
) -> Result<SimpleFilter<BinaryDilation, R, N>> {
    ensure_window(&window)?;
    Ok(SimpleFilter::new(BinaryDilation, window))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Filter;
    use approx::assert_relative_eq;
    use rastra_core::boundary::Constant;

    fn ramp_1d(len: i64) -> Raster<f64, 1> {
        Raster::from_fn(Bounds::from_shape(Position::new([len])), |p| p[0] as f64)
    }

    #[test]
    fn test_correlation_vs_convolution_orientation() {
        let input = ramp_1d(7);
        let window = Bounds::<1>::from_center(1, Position::zero());
        let corr = correlation(&[1.0, 0.0, 0.0], window).unwrap();
        let conv = convolution(&[1.0, 0.0, 0.0], window).unwrap();
        let c = corr.apply_inner(&input).unwrap();
        let v = conv.apply_inner(&input).unwrap();
        // Correlation picks the left neighbor, convolution the right one.
        assert_relative_eq!(c[Position::new([3])], 2.0);
        assert_relative_eq!(v[Position::new([3])], 4.0);
    }

    #[test]
    fn test_mean_uniform() {
        let domain = Bounds::<2>::from_shape(Position::new([5, 5]));
        let input = Raster::filled(domain, 5.0);
        let filter = mean_filter(Bounds::from_center(1, Position::zero())).unwrap();
        let out = filter.apply_inner(&input).unwrap();
        assert!(out.values().iter().all(|&v: &f64| (v - 5.0).abs() < 1e-12));
    }

    #[test]
    fn test_mean_boundary_scenario() {
        // 3x3 raster of ones, radius-1 mean with Constant(0) extrapolation.
        let domain = Bounds::<2>::from_shape(Position::new([3, 3]));
        let input = Raster::filled(domain, 1.0);
        let filter = mean_filter(Bounds::from_center(1, Position::zero())).unwrap();
        let view = input.extrapolated(Constant(0.0));

        let center = filter
            .apply_to(&view, &Bounds::point(Position::new([1, 1])))
            .unwrap();
        assert_relative_eq!(center[Position::new([1, 1])], 1.0);

        let corner = filter
            .apply_to(&view, &Bounds::point(Position::new([0, 0])))
            .unwrap();
        assert_relative_eq!(corner[Position::new([0, 0])], 4.0 / 9.0);
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_relative_eq!(Median.evaluate(&[3.0, 1.0, 2.0]), 2.0);
        assert_relative_eq!(Median.evaluate(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn test_min_max() {
        let input = ramp_1d(9);
        let window = Bounds::<1>::from_center(1, Position::zero());
        let lo = minimum_filter(window).unwrap().apply_inner(&input).unwrap();
        let hi = maximum_filter(window).unwrap().apply_inner(&input).unwrap();
        assert_relative_eq!(lo[Position::new([4])], 3.0);
        assert_relative_eq!(hi[Position::new([4])], 5.0);
    }

    #[test]
    fn test_binary_shortcut_matches_full_evaluation() {
        assert!(!BinaryErosion.evaluate(&[true, false, true]));
        assert_eq!(BinaryErosion.shortcut(false), Some(false));
        assert_eq!(BinaryErosion.shortcut(true), None);
        assert_eq!(BinaryDilation.shortcut(true), Some(true));
        assert_eq!(BinaryDilation.shortcut(false), None);
    }

    #[test]
    fn test_kernel_size_mismatch() {
        let window = Bounds::<1>::from_center(1, Position::zero());
        assert!(correlation(&[1.0, 2.0], window).is_err());
    }

    #[test]
    fn test_line_window_even_rounds_down() {
        let w = line_window::<1>(0, 4).unwrap();
        assert_eq!(w.front(), Position::new([-2]));
        assert_eq!(w.back(), Position::new([1]));
        assert!(line_window::<1>(1, 3).is_err());
    }

    #[test]
    fn test_sparse_convolution_matches_dense() {
        let weights = Raster::from_vec(
            Bounds::<2>::from_shape(Position::new([3, 3])),
            vec![0.0, 1.0, 0.0, 2.0, 0.0, 3.0, 0.0, 4.0, 0.0],
        )
        .unwrap();
        let input = Raster::from_fn(Bounds::<2>::from_shape(Position::new([6, 6])), |p| {
            (p[0] * 6 + p[1]) as f64
        });
        let dense = convolution_centered(&weights).unwrap();
        let sparse = sparse_convolution(&weights).unwrap();
        assert_eq!(sparse.region().size(), 4);
        let a = dense.apply_inner(&input).unwrap();
        let b = sparse.apply_to(&input, &a.domain()).unwrap();
        for (p, &v) in a.iter() {
            assert_relative_eq!(v, b[p]);
        }
    }

    #[test]
    fn test_empty_window_rejected() {
        let empty = Bounds::<1>::new(Position::new([1]), Position::new([0]));
        assert!(mean_filter(empty).is_err());
        assert!(erosion(empty).is_err());
    }
}
