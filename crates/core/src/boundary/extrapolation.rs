//! Extrapolation policies: values for positions outside a raster's domain.

use crate::position::Position;
use crate::raster::{Domain, Element, Raster, Sampler};
use crate::region::Bounds;

/// Maps any lattice position, inside the stored domain or not, to a value.
pub trait Extrapolation<T, const N: usize> {
    /// Value of `raster` at `position`.
    fn at(&self, raster: &Raster<T, N>, position: Position<N>) -> T;
}

/// Constant boundary: out-of-domain positions read a fixed value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant<T>(pub T);

impl<T: Element, const N: usize> Extrapolation<T, N> for Constant<T> {
    fn at(&self, raster: &Raster<T, N>, position: Position<N>) -> T {
        raster.get(position).unwrap_or(self.0)
    }
}

/// Nearest boundary: out-of-domain positions clamp to the closest in-domain
/// one. Doubles as rounding interpolation for fractional positions.
///
/// Requires a non-empty domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Nearest;

impl<T: Element, const N: usize> Extrapolation<T, N> for Nearest {
    fn at(&self, raster: &Raster<T, N>, position: Position<N>) -> T {
        let front = raster.domain().front();
        let back = raster.domain().back();
        let clamped = Position::new(std::array::from_fn(|axis| {
            position[axis].max(front[axis]).min(back[axis])
        }));
        raster[clamped]
    }
}

/// Periodic boundary: positions wrap modulo the domain shape along each axis,
/// with a positive-modulo convention.
///
/// Requires a non-empty domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Periodic;

impl<T: Element, const N: usize> Extrapolation<T, N> for Periodic {
    fn at(&self, raster: &Raster<T, N>, position: Position<N>) -> T {
        let domain = raster.domain();
        let front = domain.front();
        let wrapped = Position::new(std::array::from_fn(|axis| {
            front[axis] + (position[axis] - front[axis]).rem_euclid(domain.length(axis))
        }));
        raster[wrapped]
    }
}

/// A raster wrapped with an extrapolation policy.
///
/// Samples anywhere on the lattice; the reported domain stays the raster's
/// stored one, so filters applied to the full domain know which positions to
/// produce while reading safely past the edges.
#[derive(Debug, Clone, Copy)]
pub struct Extrapolated<'a, T, X, const N: usize> {
    raster: &'a Raster<T, N>,
    method: X,
}

impl<'a, T, X, const N: usize> Extrapolated<'a, T, X, N> {
    /// Wrap `raster` with `method`.
    pub fn new(raster: &'a Raster<T, N>, method: X) -> Self {
        Self { raster, method }
    }

    /// The wrapped raster.
    pub fn raster(&self) -> &'a Raster<T, N> {
        self.raster
    }
}

impl<T, X, const N: usize> Domain<N> for Extrapolated<'_, T, X, N> {
    fn domain(&self) -> Bounds<N> {
        self.raster.domain()
    }
}

impl<T: Element, X: Extrapolation<T, N>, const N: usize> Sampler<T, N>
    for Extrapolated<'_, T, X, N>
{
    fn at(&self, position: Position<N>) -> T {
        self.method.at(self.raster, position)
    }
}

impl<T: Element, const N: usize> Raster<T, N> {
    /// View this raster through an extrapolation policy.
    pub fn extrapolated<X: Extrapolation<T, N>>(&self, method: X) -> Extrapolated<'_, T, X, N> {
        Extrapolated::new(self, method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> Raster<f64, 1> {
        let domain = Bounds::from_shape(Position::new([3]));
        Raster::from_vec(domain, vec![10.0, 20.0, 30.0]).unwrap()
    }

    #[test]
    fn test_constant() {
        let raster = line();
        let view = raster.extrapolated(Constant(0.0));
        assert_eq!(view.at(Position::new([1])), 20.0);
        assert_eq!(view.at(Position::new([-1])), 0.0);
        assert_eq!(view.at(Position::new([5])), 0.0);
    }

    #[test]
    fn test_nearest_clamps() {
        let raster = line();
        let view = raster.extrapolated(Nearest);
        assert_eq!(view.at(Position::new([-4])), 10.0);
        assert_eq!(view.at(Position::new([7])), 30.0);
    }

    #[test]
    fn test_periodic_wraps_positive() {
        let raster = line();
        let view = raster.extrapolated(Periodic);
        assert_eq!(view.at(Position::new([3])), 10.0);
        assert_eq!(view.at(Position::new([-1])), 30.0);
        assert_eq!(view.at(Position::new([-3])), 10.0);
        assert_eq!(view.at(Position::new([4])), 20.0);
    }

    #[test]
    fn test_periodic_offset_domain() {
        let domain = Bounds::new(Position::new([2]), Position::new([4]));
        let raster = Raster::from_vec(domain, vec![1.0, 2.0, 3.0]).unwrap();
        let view = raster.extrapolated(Periodic);
        assert_eq!(view.at(Position::new([5])), 1.0);
        assert_eq!(view.at(Position::new([1])), 3.0);
    }
}
