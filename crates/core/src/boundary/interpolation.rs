//! Interpolation policies: values at fractional positions.
//!
//! `Linear` and `Cubic` collapse one axis at a time, starting from the last
//! (fastest-varying) axis and recursing over the remaining ones. Integer taps
//! that fall outside the stored domain must be served by an extrapolation
//! policy; compose `raster.extrapolated(..).interpolated(..)` for safe
//! sampling near edges.

use num_traits::Float;

use crate::boundary::{Extrapolated, Extrapolation, Nearest};
use crate::position::{Position, Vector};
use crate::raster::{Domain, Element, Raster, Sampler};
use crate::region::Bounds;

/// Computes a value at a fractional (real-valued) position from surrounding
/// integer samples.
pub trait Interpolation<T> {
    /// Interpolated value of `sampler` at `position`.
    fn sample<S, const N: usize>(&self, sampler: &S, position: Vector<f64, N>) -> T
    where
        S: Sampler<T, N>;
}

impl<T: Element> Interpolation<T> for Nearest {
    fn sample<S, const N: usize>(&self, sampler: &S, position: Vector<f64, N>) -> T
    where
        S: Sampler<T, N>,
    {
        sampler.at(position.round_ties_away())
    }
}

/// Multi-linear interpolation; needs the two adjacent taps per axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Linear;

impl<T: Element + Float> Interpolation<T> for Linear {
    fn sample<S, const N: usize>(&self, sampler: &S, position: Vector<f64, N>) -> T
    where
        S: Sampler<T, N>,
    {
        debug_assert!(N > 0);
        let mut taps = Position::<N>::zero();
        linear_axis(sampler, &position, N - 1, &mut taps)
    }
}

/// Catmull-Rom cubic interpolation; needs two taps on either side per axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cubic;

impl<T: Element + Float> Interpolation<T> for Cubic {
    fn sample<S, const N: usize>(&self, sampler: &S, position: Vector<f64, N>) -> T
    where
        S: Sampler<T, N>,
    {
        debug_assert!(N > 0);
        let mut taps = Position::<N>::zero();
        cubic_axis(sampler, &position, N - 1, &mut taps)
    }
}

/// f64 -> Float conversion; cannot fail for floating-point targets.
#[inline]
fn weight<T: Float>(value: f64) -> T {
    T::from(value).unwrap_or_else(T::zero)
}

fn linear_axis<T, S, const N: usize>(
    sampler: &S,
    position: &Vector<f64, N>,
    axis: usize,
    taps: &mut Position<N>,
) -> T
where
    T: Element + Float,
    S: Sampler<T, N>,
{
    let floor = position[axis].floor();
    let tap = floor as i64;
    let d = weight::<T>(position[axis] - floor);
    let (previous, next) = if axis == 0 {
        taps[0] = tap;
        let previous = sampler.at(*taps);
        taps[0] = tap + 1;
        (previous, sampler.at(*taps))
    } else {
        taps[axis] = tap;
        let previous = linear_axis(sampler, position, axis - 1, taps);
        taps[axis] = tap + 1;
        (previous, linear_axis(sampler, position, axis - 1, taps))
    };
    previous + d * (next - previous)
}

fn cubic_axis<T, S, const N: usize>(
    sampler: &S,
    position: &Vector<f64, N>,
    axis: usize,
    taps: &mut Position<N>,
) -> T
where
    T: Element + Float,
    S: Sampler<T, N>,
{
    let floor = position[axis].floor();
    let tap = floor as i64;
    let d = weight::<T>(position[axis] - floor);
    let at = |offset: i64, taps: &mut Position<N>| {
        taps[axis] = tap + offset;
        if axis == 0 {
            sampler.at(*taps)
        } else {
            cubic_axis(sampler, position, axis - 1, taps)
        }
    };
    let pp = at(-1, taps);
    let p = at(0, taps);
    let n = at(1, taps);
    let nn = at(2, taps);
    let two = weight::<T>(2.0);
    let three = weight::<T>(3.0);
    let four = weight::<T>(4.0);
    let five = weight::<T>(5.0);
    let half = weight::<T>(0.5);
    p + half
        * (d * (n - pp)
            + d * d * (two * pp - five * p + four * n - nn)
            + d * d * d * (nn - pp + three * (p - n)))
}

/// A sampler wrapped with an interpolation policy.
///
/// The inner sampler is usually a raster or an [`Extrapolated`] view; the
/// adapter adds fractional-position reads on top of its integer ones.
#[derive(Debug, Clone, Copy)]
pub struct Interpolated<S, M> {
    sampler: S,
    method: M,
}

impl<S, M> Interpolated<S, M> {
    /// Wrap `sampler` with `method`.
    pub fn new(sampler: S, method: M) -> Self {
        Self { sampler, method }
    }

    /// The wrapped sampler.
    pub fn sampler(&self) -> &S {
        &self.sampler
    }

    /// Interpolated value at a fractional position.
    pub fn at<T, const N: usize>(&self, position: Vector<f64, N>) -> T
    where
        T: Element,
        S: Sampler<T, N>,
        M: Interpolation<T>,
    {
        self.method.sample(&self.sampler, position)
    }
}

impl<S: Domain<N>, M, const N: usize> Domain<N> for Interpolated<S, M> {
    fn domain(&self) -> Bounds<N> {
        self.sampler.domain()
    }
}

impl<T: Element, const N: usize> Raster<T, N> {
    /// View this raster through an interpolation policy.
    ///
    /// Integer taps outside the domain panic; wrap with
    /// [`Raster::extrapolated`] first when sampling near edges.
    pub fn interpolated<M>(&self, method: M) -> Interpolated<&Raster<T, N>, M> {
        Interpolated::new(self, method)
    }
}

impl<'a, T, X, const N: usize> Extrapolated<'a, T, X, N>
where
    T: Element,
    X: Extrapolation<T, N>,
{
    /// Add fractional-position sampling on top of this extrapolated view.
    pub fn interpolated<M>(self, method: M) -> Interpolated<Extrapolated<'a, T, X, N>, M> {
        Interpolated::new(self, method)
    }
}
