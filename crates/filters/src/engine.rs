//! The neighborhood-filter engine.
//!
//! A filter turns a per-window function into a full-raster transform: for
//! every position of an output domain it gathers the input values at
//! `position + offset` for each offset of a window region, hands them to a
//! [`WindowOp`], and writes the scalar result to the output.
//!
//! Near the edges the gathered positions may leave the input's stored domain.
//! The engine performs no bounds handling of its own: apply a filter to the
//! full domain only through an extrapolated view, or shrink the output with
//! [`Filter::apply_inner`].

use crate::maybe_rayon::*;
use rastra_core::{Bounds, Element, Position, Raster, Region, Result, Sampler};

/// A per-window scalar function.
///
/// The capability interface behind every concrete kernel: evaluate one
/// neighborhood, in window order, to one output value.
pub trait WindowOp<T> {
    /// Whether [`WindowOp::shortcut`] can decide some outputs from the center
    /// value alone, letting the engine skip the neighborhood fetch.
    const SHORTCUTS: bool = false;

    /// Evaluate one gathered neighborhood.
    fn evaluate(&self, neighbors: &[T]) -> T;

    /// Decide the output from the center value alone, if possible.
    #[inline]
    fn shortcut(&self, _center: T) -> Option<T> {
        None
    }
}

/// A raster-to-raster transform evaluated per output position.
///
/// Implemented by [`SimpleFilter`] and the composite
/// [`FilterSeq`](crate::FilterSeq)/[`FilterAgg`](crate::FilterAgg) shapes.
pub trait Filter<T: Element, const N: usize> {
    /// Bounding window of the filter's neighborhood.
    fn window(&self) -> Bounds<N>;

    /// Apply over an explicit output domain.
    ///
    /// Every window position reachable from `domain` must be readable from
    /// `input`.
    fn apply_to<S>(&self, input: &S, domain: &Bounds<N>) -> Result<Raster<T, N>>
    where
        S: Sampler<T, N> + Sync;

    /// Apply over the input's full domain.
    ///
    /// Unless the window is a single point, `input` must be a
    /// boundary-extended view.
    fn apply<S>(&self, input: &S) -> Result<Raster<T, N>>
    where
        S: Sampler<T, N> + Sync,
    {
        self.apply_to(input, &input.domain())
    }

    /// Apply over the input domain shrunk by the window, so a bare raster is
    /// always sampled in-bounds.
    fn apply_inner<S>(&self, input: &S) -> Result<Raster<T, N>>
    where
        S: Sampler<T, N> + Sync,
    {
        let domain = input.domain().shrink(&self.window());
        self.apply_to(input, &domain)
    }
}

/// A filter wrapping one window operator over one region.
#[derive(Debug, Clone)]
pub struct SimpleFilter<K, R, const N: usize> {
    op: K,
    window: R,
    offsets: Vec<Position<N>>,
}

impl<K, R: Region<N>, const N: usize> SimpleFilter<K, R, N> {
    /// Build a filter from an operator and its window region.
    ///
    /// The window's member positions are collected once, so masked regions
    /// pay for their disabled cells only here.
    pub fn new(op: K, window: R) -> Self {
        let offsets = window.positions().collect();
        Self { op, window, offsets }
    }

    /// The window operator.
    pub fn op(&self) -> &K {
        &self.op
    }

    /// The window region.
    pub fn region(&self) -> &R {
        &self.window
    }
}

impl<T, K, R, const N: usize> Filter<T, N> for SimpleFilter<K, R, N>
where
    T: Element + Send,
    K: WindowOp<T> + Sync,
    R: Region<N> + Sync,
{
    fn window(&self) -> Bounds<N> {
        self.window.bounding_box()
    }

    fn apply_to<S>(&self, input: &S, domain: &Bounds<N>) -> Result<Raster<T, N>>
    where
        S: Sampler<T, N> + Sync,
    {
        if domain.is_empty() {
            return Raster::from_vec(*domain, Vec::new());
        }
        let front = domain.front()[0];
        let slabs = domain.length(0) as usize;
        let values: Vec<T> = (0..slabs)
            .into_par_iter()
            .flat_map(|index| {
                let slab = domain.slab(0, front + index as i64);
                let mut out = Vec::with_capacity(slab.size());
                let mut neighbors = Vec::with_capacity(self.offsets.len());
                for position in slab.positions() {
                    if K::SHORTCUTS {
                        if let Some(value) = self.op.shortcut(input.at(position)) {
                            out.push(value);
                            continue;
                        }
                    }
                    neighbors.clear();
                    for &offset in &self.offsets {
                        neighbors.push(input.at(position + offset));
                    }
                    out.push(self.op.evaluate(&neighbors));
                }
                out
            })
            .collect();
        Raster::from_vec(*domain, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rastra_core::boundary::Constant;
    use rastra_core::Mask;

    struct Count;

    impl WindowOp<f64> for Count {
        fn evaluate(&self, neighbors: &[f64]) -> f64 {
            neighbors.len() as f64
        }
    }

    #[test]
    fn test_offsets_follow_region() {
        let window = Mask::<2>::ball::<2>(1.0, Position::zero());
        let filter = SimpleFilter::new(Count, window);
        let domain = Bounds::from_shape(Position::new([3, 3]));
        let raster: Raster<f64, 2> = Raster::new(domain);
        let out = filter
            .apply(&raster.extrapolated(Constant(0.0)))
            .unwrap();
        assert!(out.values().iter().all(|&v| v == 5.0));
    }

    #[test]
    fn test_apply_inner_shrinks_domain() {
        let window = Bounds::<2>::from_center(1, Position::zero());
        let filter = SimpleFilter::new(Count, window);
        let domain = Bounds::from_shape(Position::new([5, 5]));
        let raster: Raster<f64, 2> = Raster::new(domain);
        let out = filter.apply_inner(&raster).unwrap();
        assert_eq!(out.domain().front(), Position::new([1, 1]));
        assert_eq!(out.domain().back(), Position::new([3, 3]));
    }

    #[test]
    fn test_empty_output_domain() {
        let window = Bounds::<2>::from_center(2, Position::zero());
        let filter = SimpleFilter::new(Count, window);
        let domain = Bounds::from_shape(Position::new([3, 3]));
        let raster: Raster<f64, 2> = Raster::new(domain);
        // Shrinking a 3x3 domain by a radius-2 window empties it.
        let out = filter.apply_inner(&raster).unwrap();
        assert!(out.is_empty());
    }
}
