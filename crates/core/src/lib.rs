//! # Rastra Core
//!
//! Core types for N-dimensional raster processing.
//!
//! This crate provides:
//! - `Vector<T, N>` / `Position<N>`: fixed-length coordinate tuples
//! - `Bounds<N>`, `Mask<N>`, `Grid<N>`: the region family over the integer
//!   lattice, sharing the [`Region`] contract
//! - `Raster<T, N>`: dense ND storage addressed by position, with borrowed
//!   [`Patch`] views and `ndarray` interop
//! - Boundary policies: `Constant`/`Nearest`/`Periodic` extrapolation and
//!   `Nearest`/`Linear`/`Cubic` interpolation
//!
//! The dimension count is a compile-time constant. Runtime-dimensioned data
//! enters through [`Raster::from_ndarray`] together with the
//! [`with_dimension!`] dispatch macro.

pub mod boundary;
pub mod error;
pub mod position;
pub mod raster;
pub mod region;

pub use error::{Error, Result};
pub use position::{Position, Vector};
pub use raster::{Domain, Element, Patch, Raster, Sampler};
pub use region::{Bounds, Grid, Mask, Region};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::boundary::{
        Constant, Cubic, Extrapolated, Extrapolation, Interpolated, Interpolation, Linear,
        Nearest, Periodic,
    };
    pub use crate::error::{Error, Result};
    pub use crate::position::{Position, Vector};
    pub use crate::raster::{Domain, Element, Patch, Raster, Sampler};
    pub use crate::region::{Bounds, Grid, Mask, Region};
}

/// Monomorphize a block of code for a runtime dimension count.
///
/// Binds `$dim` as a `const usize` inside `$body` for each supported
/// dimensionality (1 through 6) and evaluates `$fallback` otherwise. All arms
/// must produce the same type, so bodies typically converge on a
/// dimension-erased value such as an `ndarray::ArrayD` or `()`.
///
/// ```
/// use rastra_core::{with_dimension, Raster};
///
/// let array = ndarray::ArrayD::<f64>::zeros(ndarray::IxDyn(&[4, 4]));
/// let doubled = with_dimension!(array.ndim(), DIM => {
///     let raster = Raster::<f64, DIM>::from_ndarray(array.clone()).unwrap();
///     raster.map(|v| v * 2.0).to_ndarray().unwrap()
/// }, else => panic!("unsupported dimension"));
/// assert_eq!(doubled.ndim(), 2);
/// ```
#[macro_export]
macro_rules! with_dimension {
    ($ndim:expr, $dim:ident => $body:expr, else => $fallback:expr) => {
        match $ndim {
            1 => {
                const $dim: usize = 1;
                $body
            }
            2 => {
                const $dim: usize = 2;
                $body
            }
            3 => {
                const $dim: usize = 3;
                $body
            }
            4 => {
                const $dim: usize = 4;
                $body
            }
            5 => {
                const $dim: usize = 5;
                $body
            }
            6 => {
                const $dim: usize = 6;
                $body
            }
            _ => $fallback,
        }
    };
}
