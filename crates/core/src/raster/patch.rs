//! Borrowed rectangular views into a raster.

use crate::position::Position;
use crate::raster::{Domain, Raster, Sampler};
use crate::region::Bounds;

/// A non-owning view of the cells of a [`Raster`] inside a sub-region.
///
/// The view borrows the owning raster, so it can never outlive or alias the
/// storage it reads. Filters accept patches wherever they accept rasters.
#[derive(Debug, Clone, Copy)]
pub struct Patch<'a, T, const N: usize> {
    source: &'a Raster<T, N>,
    region: Bounds<N>,
}

impl<'a, T, const N: usize> Patch<'a, T, N> {
    pub(crate) fn new(source: &'a Raster<T, N>, region: Bounds<N>) -> Self {
        debug_assert!(
            region.is_empty()
                || (source.domain().contains(region.front())
                    && source.domain().contains(region.back())),
            "patch region {:?} escapes raster domain {:?}",
            region,
            source.domain()
        );
        Self { source, region }
    }

    /// The viewed region.
    pub fn region(&self) -> Bounds<N> {
        self.region
    }

    /// The owning raster.
    pub fn source(&self) -> &'a Raster<T, N> {
        self.source
    }
}

impl<'a, T: Copy, const N: usize> Patch<'a, T, N> {
    /// Iterate over the viewed values in row-major region order.
    pub fn values(&self) -> impl Iterator<Item = T> + 'a {
        let source = self.source;
        self.region.positions().map(move |p| source[p])
    }

    /// Copy the viewed cells into an owned raster over the view's region.
    pub fn to_raster(&self) -> Raster<T, N> {
        let source = self.source;
        Raster::from_fn(self.region, |p| source[p])
    }
}

impl<T, const N: usize> Domain<N> for Patch<'_, T, N> {
    fn domain(&self) -> Bounds<N> {
        self.region
    }
}

impl<T: Copy, const N: usize> Sampler<T, N> for Patch<'_, T, N> {
    fn at(&self, position: Position<N>) -> T {
        self.source[position]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_reads_owner() {
        let domain = Bounds::<2>::from_shape(Position::new([4, 4]));
        let raster = Raster::from_fn(domain, |p| p[0] * 4 + p[1]);
        let region = Bounds::new(Position::new([1, 1]), Position::new([2, 2]));
        let patch = raster.patch(region);
        let values: Vec<_> = patch.values().collect();
        assert_eq!(values, vec![5, 6, 9, 10]);
    }

    #[test]
    fn test_patch_to_raster() {
        let domain = Bounds::<2>::from_shape(Position::new([3, 3]));
        let raster = Raster::from_fn(domain, |p| p[0] + p[1]);
        let region = Bounds::new(Position::new([0, 1]), Position::new([1, 2]));
        let copy = raster.patch(region).to_raster();
        assert_eq!(copy.domain(), region);
        assert_eq!(copy[Position::new([1, 2])], 3);
    }
}
