//! Masked regions: a bounding box with per-cell flags.

use std::ops::{Add, BitAnd, Neg, Sub};

use crate::error::Result;
use crate::position::Position;
use crate::raster::Raster;
use crate::region::bounds::BoundsPositions;
use crate::region::{Bounds, Region};

/// A flagged ND bounding box.
///
/// Like [`Bounds`], but with a boolean flag attached to each position inside
/// the box. Masks describe non-rectangular structuring elements (disks,
/// crosses, sparse kernels): iteration yields flagged positions only, so
/// filters skip disabled neighbors at construction time.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask<const N: usize> {
    bounds: Bounds<N>,
    flags: Raster<bool, N>,
}

impl<const N: usize> Mask<N> {
    /// Create a mask with every flag set to `flag`.
    pub fn filled(bounds: Bounds<N>, flag: bool) -> Self {
        Self {
            bounds,
            flags: Raster::filled(bounds, flag),
        }
    }

    /// Create a mask from row-major flags.
    ///
    /// The flag count must equal the box size.
    pub fn from_flags(bounds: Bounds<N>, flags: Vec<bool>) -> Result<Self> {
        Ok(Self {
            bounds,
            flags: Raster::from_vec(bounds, flags)?,
        })
    }

    /// Fully-flagged cube of half-width `radius` around `center`.
    pub fn from_center(radius: i64, center: Position<N>) -> Self {
        Self::filled(Bounds::from_center(radius, center), true)
    }

    /// Ball of the given radius under the Lp (pseudo-)norm.
    ///
    /// `P = 0` counts non-zero coordinates, `P = 1` gives a diamond,
    /// `P = 2` a Euclidean ball.
    pub fn ball<const P: u32>(radius: f64, center: Position<N>) -> Self {
        let bounds = Bounds::from_center(radius as i64, center);
        let radius_pow = radius.powi(P as i32);
        let flags =
            Raster::from_fn(bounds, |p| (p - center).lp_norm_pow::<P>() <= radius_pow);
        Self { bounds, flags }
    }

    /// The bounding box.
    pub fn bounding_box(&self) -> Bounds<N> {
        self.bounds
    }

    /// The front corner of the bounding box.
    pub fn front(&self) -> Position<N> {
        self.bounds.front()
    }

    /// The back corner of the bounding box.
    pub fn back(&self) -> Position<N> {
        self.bounds.back()
    }

    /// Per-axis lengths of the bounding box.
    pub fn shape(&self) -> Position<N> {
        self.bounds.shape()
    }

    /// The flag map.
    pub fn flags(&self) -> &Raster<bool, N> {
        &self.flags
    }

    /// Number of flagged positions. O(box volume).
    pub fn size(&self) -> usize {
        self.flags.values().iter().filter(|&&f| f).count()
    }

    /// Whether `position` is inside the box and flagged.
    pub fn contains(&self, position: Position<N>) -> bool {
        self.bounds.contains(position) && self.flags[position]
    }

    /// Set or clear the flag at `position`.
    pub fn set(&mut self, position: Position<N>, flag: bool) -> Result<()> {
        self.flags.set(position, flag)
    }

    /// Shift the box by `vector`; flags move with it, unchanged.
    pub fn translate(&self, vector: Position<N>) -> Self {
        Self {
            bounds: self.bounds.translate(vector),
            flags: self.flags.translated(vector),
        }
    }

    /// Mirror through the origin; flag order reverses to match the mirrored
    /// traversal.
    pub fn negate(&self) -> Self {
        Self {
            bounds: self.bounds.negate(),
            flags: self.flags.reversed(),
        }
    }

    /// Clamp to `outer`, copying the retained sub-array of flags.
    pub fn clamp(&self, outer: &Bounds<N>) -> Self {
        let bounds = self.bounds.intersect(outer);
        let flags = Raster::from_fn(bounds, |p| self.flags[p]);
        Self { bounds, flags }
    }

    /// Raise to `M >= N` dimensions by appending degenerate axes at `padding`.
    pub fn extend<const M: usize>(&self, padding: Position<M>) -> Result<Mask<M>> {
        let bounds = self.bounds.extend::<M>(padding)?;
        Mask::from_flags(bounds, self.flags.values().to_vec())
    }

    /// Iterate over the flagged positions in row-major order.
    pub fn positions(&self) -> MaskPositions<'_, N> {
        MaskPositions {
            inner: self.bounds.positions(),
            flags: &self.flags,
        }
    }
}

impl<const N: usize> Region<N> for Mask<N> {
    type Positions<'a> = MaskPositions<'a, N> where Self: 'a;

    fn bounding_box(&self) -> Bounds<N> {
        self.bounds
    }

    fn size(&self) -> usize {
        Mask::size(self)
    }

    fn contains(&self, position: Position<N>) -> bool {
        Mask::contains(self, position)
    }

    fn positions(&self) -> Self::Positions<'_> {
        Mask::positions(self)
    }
}

/// Iterator over the flagged positions of a [`Mask`].
///
/// Walks the full bounding box and consults the flag at each position.
#[derive(Debug, Clone)]
pub struct MaskPositions<'a, const N: usize> {
    inner: BoundsPositions<N>,
    flags: &'a Raster<bool, N>,
}

impl<const N: usize> Iterator for MaskPositions<'_, N> {
    type Item = Position<N>;

    fn next(&mut self) -> Option<Position<N>> {
        for position in self.inner.by_ref() {
            if self.flags[position] {
                return Some(position);
            }
        }
        None
    }
}

impl<const N: usize> Add<Position<N>> for Mask<N> {
    type Output = Self;

    fn add(self, vector: Position<N>) -> Self {
        self.translate(vector)
    }
}

impl<const N: usize> Sub<Position<N>> for Mask<N> {
    type Output = Self;

    fn sub(self, vector: Position<N>) -> Self {
        self.translate(-vector)
    }
}

impl<const N: usize> Add<i64> for Mask<N> {
    type Output = Self;

    fn add(self, scalar: i64) -> Self {
        self.translate(Position::filled(scalar))
    }
}

impl<const N: usize> Sub<i64> for Mask<N> {
    type Output = Self;

    fn sub(self, scalar: i64) -> Self {
        self.translate(Position::filled(-scalar))
    }
}

impl<const N: usize> Neg for Mask<N> {
    type Output = Self;

    fn neg(self) -> Self {
        self.negate()
    }
}

impl<const N: usize> BitAnd<Bounds<N>> for Mask<N> {
    type Output = Self;

    fn bitand(self, outer: Bounds<N>) -> Self {
        self.clamp(&outer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ball_l2_radius_one() {
        let mask = Mask::<2>::ball::<2>(1.0, Position::zero());
        assert_eq!(mask.shape(), Position::new([3, 3]));
        assert_eq!(mask.size(), 5);
        assert!(mask.contains(Position::new([0, 0])));
        assert!(mask.contains(Position::new([0, 1])));
        assert!(mask.contains(Position::new([-1, 0])));
        assert!(!mask.contains(Position::new([1, 1])));
        assert!(!mask.contains(Position::new([-1, -1])));
    }

    #[test]
    fn test_ball_l1() {
        let mask = Mask::<2>::ball::<1>(2.0, Position::zero());
        // Diamond: |x| + |y| <= 2 over a 5x5 box.
        assert_eq!(mask.size(), 13);
        assert!(mask.contains(Position::new([1, 1])));
        assert!(!mask.contains(Position::new([2, 1])));
    }

    #[test]
    fn test_membership_needs_flag_and_box() {
        let mut mask = Mask::<1>::from_center(1, Position::zero());
        mask.set(Position::new([0]), false).unwrap();
        assert!(!mask.contains(Position::new([0])));
        assert!(mask.contains(Position::new([1])));
        assert!(!mask.contains(Position::new([2])));
    }

    #[test]
    fn test_flagged_iteration_only() {
        let mask = Mask::<2>::ball::<2>(1.0, Position::zero());
        let flagged: Vec<_> = mask.positions().collect();
        assert_eq!(flagged.len(), 5);
        assert!(flagged.iter().all(|&p| mask.contains(p)));
    }

    #[test]
    fn test_translate_moves_flags() {
        let mask = Mask::<2>::ball::<2>(1.0, Position::zero());
        let shifted = mask.translate(Position::new([10, 20]));
        assert!(shifted.contains(Position::new([10, 20])));
        assert!(shifted.contains(Position::new([11, 20])));
        assert!(!shifted.contains(Position::new([11, 21])));
        assert_eq!(shifted.size(), mask.size());
    }

    #[test]
    fn test_clamp_matches_box_intersection() {
        let mask = Mask::<2>::ball::<2>(1.0, Position::zero());
        let outer = Bounds::from_shape(Position::new([6, 6]));
        let clamped = mask.clamp(&outer);
        assert_eq!(
            clamped.bounding_box(),
            mask.bounding_box().intersect(&outer)
        );
        // Retained flags are exactly the flagged positions inside `outer`.
        for p in clamped.bounding_box().positions() {
            assert_eq!(clamped.contains(p), mask.contains(p));
        }
        assert_eq!(clamped.size(), 3);
    }

    #[test]
    fn test_negate_reverses_flags() {
        let bounds = Bounds::<1>::new(Position::new([0]), Position::new([2]));
        let mask = Mask::from_flags(bounds, vec![true, false, false]).unwrap();
        let negated = mask.negate();
        assert_eq!(negated.front(), Position::new([-2]));
        assert!(negated.contains(Position::new([0])));
        assert!(!negated.contains(Position::new([-1])));
        assert!(!negated.contains(Position::new([-2])));
    }

    #[test]
    fn test_extend() {
        let mask = Mask::<2>::ball::<2>(1.0, Position::zero());
        let extended = mask.extend::<3>(Position::new([0, 0, 4])).unwrap();
        assert_eq!(extended.size(), mask.size());
        assert!(extended.contains(Position::new([0, 1, 4])));
        assert!(!extended.contains(Position::new([0, 1, 3])));
    }

    #[test]
    fn test_flags_shape_mismatch() {
        let bounds = Bounds::<1>::from_shape(Position::new([3]));
        assert!(Mask::from_flags(bounds, vec![true, false]).is_err());
    }
}
