//! Dense ND raster storage and the sampling contract.

mod element;
mod patch;

pub use element::Element;
pub use patch::Patch;

use ndarray::{ArrayD, IxDyn};
use num_traits::Zero;

use crate::error::{Error, Result};
use crate::position::Position;
use crate::region::Bounds;

/// Read access to a finite lattice domain.
pub trait Domain<const N: usize> {
    /// The region over which values are defined.
    fn domain(&self) -> Bounds<N>;
}

/// Position-indexed read access to cell values.
///
/// Implementors promise side-effect-free reads. A plain [`Raster`] samples
/// only inside its stored domain and panics otherwise; boundary-policy
/// adapters extend the readable set to the whole lattice or to fractional
/// positions.
pub trait Sampler<T, const N: usize>: Domain<N> {
    /// Value at `position`.
    fn at(&self, position: Position<N>) -> T;
}

impl<D: Domain<N> + ?Sized, const N: usize> Domain<N> for &D {
    fn domain(&self) -> Bounds<N> {
        (**self).domain()
    }
}

impl<T, S: Sampler<T, N> + ?Sized, const N: usize> Sampler<T, N> for &S {
    fn at(&self, position: Position<N>) -> T {
        (**self).at(position)
    }
}

/// A dense ND array addressed by [`Position`].
///
/// Values are stored contiguously in row-major order (last axis fastest) over
/// an arbitrary, possibly negative-fronted, [`Bounds`] domain. The raster
/// exclusively owns its buffer; borrowed sub-views are expressed as
/// [`Patch`]es.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster<T, const N: usize> {
    domain: Bounds<N>,
    data: Vec<T>,
}

impl<T: Zero + Copy, const N: usize> Raster<T, N> {
    /// Create a raster filled with zeros.
    pub fn new(domain: Bounds<N>) -> Self {
        Self::filled(domain, T::zero())
    }
}

impl<T: Copy, const N: usize> Raster<T, N> {
    /// Create a raster filled with a specific value.
    pub fn filled(domain: Bounds<N>, value: T) -> Self {
        Self {
            domain,
            data: vec![value; domain.size()],
        }
    }
}

impl<T, const N: usize> Raster<T, N> {
    /// Create a raster from existing row-major data.
    pub fn from_vec(domain: Bounds<N>, data: Vec<T>) -> Result<Self> {
        if data.len() != domain.size() {
            return Err(Error::ShapeMismatch {
                expected: domain.size(),
                actual: data.len(),
            });
        }
        Ok(Self { domain, data })
    }

    /// Create a raster by evaluating `f` at every domain position.
    pub fn from_fn(domain: Bounds<N>, f: impl FnMut(Position<N>) -> T) -> Self {
        let data = domain.positions().map(f).collect();
        Self { domain, data }
    }

    /// The stored domain.
    pub fn domain(&self) -> Bounds<N> {
        self.domain
    }

    /// Per-axis lengths.
    pub fn shape(&self) -> Position<N> {
        self.domain.shape()
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the raster holds no cell.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major values.
    pub fn values(&self) -> &[T] {
        &self.data
    }

    /// Row-major values, mutable.
    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Iterate over `(position, value)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position<N>, &T)> {
        self.domain.positions().zip(self.data.iter())
    }

    /// Linear offset of `position` in the row-major buffer.
    ///
    /// Panics when `position` lies outside the domain.
    fn offset_of(&self, position: Position<N>) -> usize {
        assert!(
            self.domain.contains(position),
            "position {:?} outside domain {:?}",
            position,
            self.domain
        );
        let mut offset = 0usize;
        for axis in 0..N {
            offset = offset * self.domain.length(axis) as usize
                + (position[axis] - self.domain.front()[axis]) as usize;
        }
        offset
    }

    /// Borrow a rectangular sub-view sharing this raster's storage.
    pub fn patch(&self, region: Bounds<N>) -> Patch<'_, T, N> {
        Patch::new(self, region)
    }
}

impl<T: Copy, const N: usize> Raster<T, N> {
    /// Get the value at `position`, or `None` outside the domain.
    pub fn get(&self, position: Position<N>) -> Option<T> {
        if self.domain.contains(position) {
            Some(self.data[self.offset_of(position)])
        } else {
            None
        }
    }

    /// Set the value at `position`.
    pub fn set(&mut self, position: Position<N>, value: T) -> Result<()> {
        if !self.domain.contains(position) {
            return Err(Error::OutOfDomain {
                position: format!("{position:?}"),
                domain: format!("{:?}", self.domain),
            });
        }
        let offset = self.offset_of(position);
        self.data[offset] = value;
        Ok(())
    }

    /// Get the value at `position` without bounds checking.
    ///
    /// # Safety
    /// Caller must ensure `self.domain().contains(position)`.
    pub unsafe fn get_unchecked(&self, position: Position<N>) -> T {
        debug_assert!(self.domain.contains(position));
        let mut offset = 0usize;
        for axis in 0..N {
            offset = offset * self.domain.length(axis) as usize
                + (position[axis] - self.domain.front()[axis]) as usize;
        }
        unsafe { *self.data.get_unchecked(offset) }
    }

    /// Overwrite every cell with `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Apply `f` to every cell, producing a raster over the same domain.
    pub fn map<U>(&self, f: impl FnMut(T) -> U) -> Raster<U, N> {
        let mut f = f;
        Raster {
            domain: self.domain,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }
}

impl<T: Clone, const N: usize> Raster<T, N> {
    /// The same values over a domain shifted by `vector`.
    pub fn translated(&self, vector: Position<N>) -> Self {
        Self {
            domain: self.domain.translate(vector),
            data: self.data.clone(),
        }
    }

    /// The values in reverse row-major order over the mirrored domain.
    pub fn reversed(&self) -> Self {
        let mut data = self.data.clone();
        data.reverse();
        Self {
            domain: self.domain.negate(),
            data,
        }
    }

    /// Convert from a dynamically-dimensioned `ndarray` array.
    ///
    /// The array's `ndim` must equal `N`; the resulting domain has its front
    /// at the origin.
    pub fn from_ndarray(array: ArrayD<T>) -> Result<Self> {
        if array.ndim() != N {
            return Err(Error::DimensionMismatch {
                expected: N,
                actual: array.ndim(),
            });
        }
        let shape =
            Position::new(std::array::from_fn(|axis| array.shape()[axis] as i64));
        let data = array.as_standard_layout().iter().cloned().collect();
        Self::from_vec(Bounds::from_shape(shape), data)
    }

    /// Convert into a dynamically-dimensioned `ndarray` array.
    ///
    /// The domain's front offset is discarded; only the shape survives.
    pub fn to_ndarray(&self) -> Result<ArrayD<T>> {
        let shape: Vec<usize> =
            (0..N).map(|axis| self.domain.length(axis) as usize).collect();
        ArrayD::from_shape_vec(IxDyn(&shape), self.data.clone()).map_err(|_| {
            Error::ShapeMismatch {
                expected: self.domain.size(),
                actual: self.data.len(),
            }
        })
    }
}

impl<T, const N: usize> std::ops::Index<Position<N>> for Raster<T, N> {
    type Output = T;

    fn index(&self, position: Position<N>) -> &T {
        &self.data[self.offset_of(position)]
    }
}

impl<T, const N: usize> std::ops::IndexMut<Position<N>> for Raster<T, N> {
    fn index_mut(&mut self, position: Position<N>) -> &mut T {
        let offset = self.offset_of(position);
        &mut self.data[offset]
    }
}

impl<T, const N: usize> Domain<N> for Raster<T, N> {
    fn domain(&self) -> Bounds<N> {
        self.domain
    }
}

impl<T: Copy, const N: usize> Sampler<T, N> for Raster<T, N> {
    fn at(&self, position: Position<N>) -> T {
        self[position]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    #[test]
    fn test_creation_and_access() {
        let domain = Bounds::<2>::from_shape(Position::new([3, 4]));
        let mut raster: Raster<f64, 2> = Raster::new(domain);
        assert_eq!(raster.len(), 12);
        raster.set(Position::new([1, 2]), 42.0).unwrap();
        assert_eq!(raster.get(Position::new([1, 2])), Some(42.0));
        assert_eq!(raster.get(Position::new([3, 0])), None);
    }

    #[test]
    fn test_negative_front() {
        let domain = Bounds::<2>::from_center(1, Position::zero());
        let raster = Raster::from_fn(domain, |p| p[0] * 10 + p[1]);
        assert_eq!(raster[Position::new([-1, -1])], -11);
        assert_eq!(raster[Position::new([1, 0])], 10);
    }

    #[test]
    fn test_from_vec_mismatch() {
        let domain = Bounds::<1>::from_shape(Position::new([3]));
        assert!(Raster::from_vec(domain, vec![1.0, 2.0]).is_err());
    }

    #[test]
    fn test_row_major_layout() {
        let domain = Bounds::<2>::from_shape(Position::new([2, 3]));
        let raster = Raster::from_vec(domain, vec![0, 1, 2, 3, 4, 5]).unwrap();
        assert_eq!(raster[Position::new([0, 2])], 2);
        assert_eq!(raster[Position::new([1, 0])], 3);
    }

    #[test]
    fn test_reversed() {
        let domain = Bounds::<1>::from_shape(Position::new([3]));
        let raster = Raster::from_vec(domain, vec![1, 2, 3]).unwrap();
        let rev = raster.reversed();
        assert_eq!(rev.domain().front(), Position::new([-2]));
        assert_eq!(rev[Position::new([-2])], 3);
        assert_eq!(rev[Position::new([0])], 1);
    }

    #[test]
    fn test_ndarray_roundtrip() {
        let domain = Bounds::<2>::from_shape(Position::new([2, 2]));
        let raster = Raster::from_vec(domain, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let array = raster.to_ndarray().unwrap();
        assert_eq!(array.shape(), &[2, 2]);
        let back = Raster::<f64, 2>::from_ndarray(array).unwrap();
        assert_eq!(back, raster);
    }

    #[test]
    fn test_empty_domain() {
        let domain = Bounds::<2>::new(Position::new([0, 0]), Position::new([-1, 2]));
        let raster: Raster<f64, 2> = Raster::new(domain);
        assert!(raster.is_empty());
        assert_eq!(raster.iter().count(), 0);
    }
}
