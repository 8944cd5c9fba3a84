//! Parallel filter aggregation.

use rastra_core::{Bounds, Element, Error, Position, Raster, Result, Sampler};

use crate::engine::Filter;

/// Filters applied independently to the same input, combined position-wise
/// with a binary reducer.
///
/// Unlike [`FilterSeq`](crate::FilterSeq), aggregation introduces no barrier
/// between branches: each branch reads only the shared input.
#[derive(Debug, Clone)]
pub struct FilterAgg<Op, F> {
    combine: Op,
    branches: Vec<F>,
}

impl<Op, F> FilterAgg<Op, F> {
    /// Aggregate the given branches with `combine`.
    ///
    /// At least one branch is required.
    pub fn new(combine: Op, branches: Vec<F>) -> Result<Self> {
        if branches.is_empty() {
            return Err(Error::InvalidParameter {
                name: "branches",
                reason: "a filter aggregate needs at least one branch".into(),
            });
        }
        Ok(Self { combine, branches })
    }

    /// The branches, in combination order.
    pub fn branches(&self) -> &[F] {
        &self.branches
    }
}

impl<T, Op, F, const N: usize> Filter<T, N> for FilterAgg<Op, F>
where
    T: Element,
    Op: Fn(T, T) -> T,
    F: Filter<T, N>,
{
    fn window(&self) -> Bounds<N> {
        self.branches
            .iter()
            .map(|branch| branch.window())
            .reduce(|a, b| a.hull(&b))
            .unwrap_or_else(|| Bounds::point(Position::zero()))
    }

    fn apply_to<S>(&self, input: &S, domain: &Bounds<N>) -> Result<Raster<T, N>>
    where
        S: Sampler<T, N> + Sync,
    {
        let mut branches = self.branches.iter();
        let first = match branches.next() {
            Some(branch) => branch,
            None => {
                return Err(Error::InvalidParameter {
                    name: "branches",
                    reason: "a filter aggregate needs at least one branch".into(),
                })
            }
        };
        let mut accumulator = first.apply_to(input, domain)?;
        for branch in branches {
            let partial = branch.apply_to(input, domain)?;
            for (acc, &value) in accumulator.values_mut().iter_mut().zip(partial.values()) {
                *acc = (self.combine)(*acc, value);
            }
        }
        Ok(accumulator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::{convolution, line_window, Convolution};
    use crate::engine::SimpleFilter;
    use rastra_core::boundary::Constant;

    fn axis_difference(axis: usize) -> SimpleFilter<Convolution<f64>, Bounds<2>, 2> {
        convolution(&[1.0, -2.0, 1.0], line_window::<2>(axis, 3).unwrap()).unwrap()
    }

    #[test]
    fn test_window_is_hull() {
        let agg =
            FilterAgg::new(|a, b| a + b, vec![axis_difference(0), axis_difference(1)]).unwrap();
        let window = agg.window();
        assert_eq!(window.front(), Position::new([-1, -1]));
        assert_eq!(window.back(), Position::new([1, 1]));
    }

    #[test]
    fn test_sum_of_branches() {
        let domain = Bounds::<2>::from_shape(Position::new([5, 5]));
        let input = Raster::from_fn(domain, |p| (p[0] * p[0]) as f64);
        let agg =
            FilterAgg::new(|a, b| a + b, vec![axis_difference(0), axis_difference(1)]).unwrap();
        let out = agg.apply_inner(&input).unwrap();
        // Second difference of x^2 along axis 0 is 2, axis 1 contributes 0.
        for (_, &v) in out.iter() {
            assert!((v - 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_branches_share_input() {
        let domain = Bounds::<2>::from_shape(Position::new([3, 3]));
        let input = Raster::filled(domain, 1.0);
        let agg =
            FilterAgg::new(|a, b| a + b, vec![axis_difference(0), axis_difference(1)]).unwrap();
        let out = agg.apply(&input.extrapolated(Constant(1.0))).unwrap();
        assert_eq!(out.domain(), domain);
        assert!(out.values().iter().all(|&v| v.abs() < 1e-12));
    }
}
