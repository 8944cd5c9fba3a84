//! Boundary policies: extrapolation beyond the stored domain and
//! interpolation at fractional positions.
//!
//! Any consumer that must read outside a raster's declared domain, or at a
//! non-integer position, does so exclusively through these adapters, never
//! through raw indexing.

mod extrapolation;
mod interpolation;

pub use extrapolation::{Constant, Extrapolated, Extrapolation, Nearest, Periodic};
pub use interpolation::{Cubic, Interpolated, Interpolation, Linear};
