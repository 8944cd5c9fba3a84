//! Sequential filter composition.

use rastra_core::{Bounds, Element, Error, Position, Raster, Result, Sampler};

use crate::engine::Filter;

/// Filters applied one after another, each reading the previous output.
///
/// This is the separable-filter optimization: an N-axis separable kernel of
/// window length `L` per axis costs `O(N * L)` per cell instead of `O(L^N)`.
/// Each stage's output domain is enlarged by the Minkowski sum of the
/// remaining stages' windows, so only the first stage ever consults the
/// input's boundary policy and every intermediate read stays in bounds.
#[derive(Debug, Clone)]
pub struct FilterSeq<F> {
    stages: Vec<F>,
}

impl<F> FilterSeq<F> {
    /// Compose the given stages in order.
    ///
    /// At least one stage is required.
    pub fn new(stages: Vec<F>) -> Result<Self> {
        if stages.is_empty() {
            return Err(Error::InvalidParameter {
                name: "stages",
                reason: "a filter sequence needs at least one stage".into(),
            });
        }
        Ok(Self { stages })
    }

    /// A sequence of one stage.
    pub fn single(stage: F) -> Self {
        Self { stages: vec![stage] }
    }

    /// Append a stage.
    pub fn then(mut self, stage: F) -> Self {
        self.stages.push(stage);
        self
    }

    /// Append every stage of `other`.
    pub fn compose(mut self, other: Self) -> Self {
        self.stages.extend(other.stages);
        self
    }

    /// The stages, in application order.
    pub fn stages(&self) -> &[F] {
        &self.stages
    }
}

impl<T, F, const N: usize> Filter<T, N> for FilterSeq<F>
where
    T: Element + Send,
    F: Filter<T, N>,
{
    fn window(&self) -> Bounds<N> {
        self.stages
            .iter()
            .fold(Bounds::point(Position::zero()), |acc, stage| {
                acc.grow(&stage.window())
            })
    }

    fn apply_to<S>(&self, input: &S, domain: &Bounds<N>) -> Result<Raster<T, N>>
    where
        S: Sampler<T, N> + Sync,
    {
        let count = self.stages.len();
        // margins[i] = Minkowski sum of the windows of stages i+1..count.
        let mut margins = vec![Bounds::point(Position::zero()); count];
        for i in (0..count.saturating_sub(1)).rev() {
            margins[i] = margins[i + 1].grow(&self.stages[i + 1].window());
        }
        let mut buffer = self.stages[0].apply_to(input, &domain.grow(&margins[0]))?;
        for (stage, margin) in self.stages[1..].iter().zip(&margins[1..]) {
            buffer = stage.apply_to(&buffer, &domain.grow(margin))?;
        }
        Ok(buffer)
    }
}
