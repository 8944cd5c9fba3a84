//! Cell value marker trait.

use std::fmt::Debug;

/// Types that can live in a raster cell.
///
/// Cheap-to-copy plain values; numeric capabilities (ordering, arithmetic,
/// casting) are requested per-operation through `num_traits` bounds rather
/// than globally, so boolean rasters participate in regions and morphology.
pub trait Element: Copy + Debug + PartialEq + Send + Sync + 'static {}

impl<T> Element for T where T: Copy + Debug + PartialEq + Send + Sync + 'static {}
