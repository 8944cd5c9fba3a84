//! # Rastra Filters
//!
//! Neighborhood filtering and geometric resampling over `rastra-core`
//! regions and rasters.
//!
//! ## Components
//!
//! - [`SimpleFilter`]: one window operator over one region
//! - [`FilterSeq`]: sequential composition (separable filters)
//! - [`FilterAgg`]: parallel branches combined with a binary reducer
//! - Kernels: correlation, convolution, mean/median/minimum/maximum, binary
//!   erosion/dilation, plus Prewitt/Sobel/Scharr gradients and the Laplace
//!   operator
//! - [`Affinity`]: center-relative affine transforms with inverse-mapped
//!   resampling
//!
//! Position loops run in parallel with rayon under the default `parallel`
//! feature; disable it for single-threaded targets.

pub mod affinity;
pub mod agg;
pub mod engine;
pub mod gradients;
pub mod kernels;
mod maybe_rayon;
pub mod seq;

pub use affinity::{downsample, rotate_about_center, upsample, Affinity};
pub use agg::FilterAgg;
pub use engine::{Filter, SimpleFilter, WindowOp};
pub use gradients::{laplace_operator, prewitt_gradient, scharr_gradient, sobel_gradient};
pub use kernels::{
    convolution, convolution_along, convolution_centered, convolution_of, correlation,
    correlation_along, correlation_centered, correlation_of, dilation, erosion, mean_filter,
    median_filter, maximum_filter, minimum_filter, sparse_convolution, BinaryDilation,
    BinaryErosion, Convolution, Correlation, Maximum, Mean, Median, Minimum,
};
pub use seq::FilterSeq;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::affinity::{downsample, rotate_about_center, upsample, Affinity};
    pub use crate::agg::FilterAgg;
    pub use crate::engine::{Filter, SimpleFilter, WindowOp};
    pub use crate::gradients::{
        laplace_operator, prewitt_gradient, scharr_gradient, sobel_gradient,
    };
    pub use crate::kernels::{
        convolution, convolution_along, convolution_centered, convolution_of, correlation,
        correlation_along, correlation_centered, correlation_of, dilation, erosion, mean_filter,
        median_filter, maximum_filter, minimum_filter, sparse_convolution,
    };
    pub use crate::seq::FilterSeq;
    pub use rastra_core::prelude::*;
}
