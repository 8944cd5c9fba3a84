//! Center-relative affine transforms and inverse-mapped resampling.
//!
//! An affinity transforms a point `x` into `a * (x - c) + b + c` for a linear
//! map `a`, translation `b` and fixed center `c`. Builder calls multiply into
//! the map or accumulate into the translation in invocation order, so the
//! composition order is the caller's contract.
//!
//! Applying an affinity to a raster walks the **output** domain and samples
//! the input at the inverse-mapped position, so every output cell is filled
//! exactly once however the forward map stretches or rotates the lattice.
//! Fractional sampling goes through an [`Interpolated`] input; positions
//! outside the stored input additionally need an extrapolation policy.

use crate::maybe_rayon::*;
use rastra_core::boundary::{Interpolated, Interpolation};
use rastra_core::{Bounds, Domain, Element, Error, Position, Raster, Result, Sampler, Vector};

/// Geometrical affine transform (translation, scaling, rotation) around a
/// fixed center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affinity<const N: usize> {
    map: [[f64; N]; N],
    translation: Vector<f64, N>,
    center: Vector<f64, N>,
}

fn identity_map<const N: usize>() -> [[f64; N]; N] {
    std::array::from_fn(|i| std::array::from_fn(|j| if i == j { 1.0 } else { 0.0 }))
}

fn map_mul<const N: usize>(a: &[[f64; N]; N], b: &[[f64; N]; N]) -> [[f64; N]; N] {
    std::array::from_fn(|i| {
        std::array::from_fn(|j| (0..N).map(|k| a[i][k] * b[k][j]).sum())
    })
}

fn map_apply<const N: usize>(map: &[[f64; N]; N], v: Vector<f64, N>) -> Vector<f64, N> {
    Vector::new(std::array::from_fn(|i| {
        (0..N).map(|j| map[i][j] * v[j]).sum()
    }))
}

/// Gauss-Jordan inversion with partial pivoting.
fn map_invert<const N: usize>(map: &[[f64; N]; N]) -> Result<[[f64; N]; N]> {
    let mut a = *map;
    let mut inverse = identity_map::<N>();
    for column in 0..N {
        let mut pivot = column;
        for row in column + 1..N {
            if a[row][column].abs() > a[pivot][column].abs() {
                pivot = row;
            }
        }
        if a[pivot][column].abs() < 1e-12 {
            return Err(Error::SingularMatrix);
        }
        a.swap(column, pivot);
        inverse.swap(column, pivot);
        let divisor = a[column][column];
        for j in 0..N {
            a[column][j] /= divisor;
            inverse[column][j] /= divisor;
        }
        for row in 0..N {
            if row == column {
                continue;
            }
            let factor = a[row][column];
            if factor == 0.0 {
                continue;
            }
            for j in 0..N {
                a[row][j] -= factor * a[column][j];
                inverse[row][j] -= factor * inverse[column][j];
            }
        }
    }
    Ok(inverse)
}

impl<const N: usize> Affinity<N> {
    /// Identity transform around the given center.
    pub fn new(center: Vector<f64, N>) -> Self {
        Self {
            map: identity_map(),
            translation: Vector::zero(),
            center,
        }
    }

    /// Identity transform around the origin.
    pub fn identity() -> Self {
        Self::new(Vector::zero())
    }

    /// Pure translation.
    pub fn translation(vector: Vector<f64, N>) -> Self {
        let mut out = Self::identity();
        out.translate(vector);
        out
    }

    /// Isotropic scaling around `center`.
    pub fn scaling(factor: f64, center: Vector<f64, N>) -> Self {
        let mut out = Self::new(center);
        out.scale(factor);
        out
    }

    /// Per-axis scaling around `center`.
    pub fn scaling_per_axis(factors: Vector<f64, N>, center: Vector<f64, N>) -> Self {
        let mut out = Self::new(center);
        out.scale_per_axis(factors);
        out
    }

    /// Rotation by `radians` from axis `from` to axis `to`, around `center`.
    pub fn rotation(
        radians: f64,
        from: usize,
        to: usize,
        center: Vector<f64, N>,
    ) -> Result<Self> {
        let mut out = Self::new(center);
        out.rotate(radians, from, to)?;
        Ok(out)
    }

    /// The linear map.
    pub fn map(&self) -> &[[f64; N]; N] {
        &self.map
    }

    /// The translation vector.
    pub fn translation_vector(&self) -> Vector<f64, N> {
        self.translation
    }

    /// The fixed center.
    pub fn center(&self) -> Vector<f64, N> {
        self.center
    }

    /// Accumulate a translation.
    pub fn translate(&mut self, vector: Vector<f64, N>) -> &mut Self {
        self.translation += vector;
        self
    }

    /// Multiply an isotropic scaling into the map.
    pub fn scale(&mut self, factor: f64) -> &mut Self {
        self.scale_per_axis(Vector::filled(factor))
    }

    /// Multiply a per-axis scaling into the map.
    pub fn scale_per_axis(&mut self, factors: Vector<f64, N>) -> &mut Self {
        let diagonal: [[f64; N]; N] = std::array::from_fn(|i| {
            std::array::from_fn(|j| if i == j { factors[i] } else { 0.0 })
        });
        self.map = map_mul(&self.map, &diagonal);
        self
    }

    /// Multiply a rotation by `radians` from axis `from` to axis `to` into
    /// the map.
    pub fn rotate(&mut self, radians: f64, from: usize, to: usize) -> Result<&mut Self> {
        if from >= N {
            return Err(Error::AxisOutOfRange { axis: from, dimension: N });
        }
        if to >= N {
            return Err(Error::AxisOutOfRange { axis: to, dimension: N });
        }
        if radians != 0.0 {
            let (sin, cos) = radians.sin_cos();
            let mut rotation = identity_map::<N>();
            rotation[from][from] = cos;
            rotation[from][to] = -sin;
            rotation[to][from] = sin;
            rotation[to][to] = cos;
            self.map = map_mul(&self.map, &rotation);
        }
        Ok(self)
    }

    /// Multiply a rotation given in degrees into the map.
    pub fn rotate_degrees(&mut self, degrees: f64, from: usize, to: usize) -> Result<&mut Self> {
        self.rotate(degrees.to_radians(), from, to)
    }

    /// The inverse transform.
    ///
    /// Fails with [`Error::SingularMatrix`] when the linear map has no
    /// inverse.
    pub fn inverse(&self) -> Result<Self> {
        let map = map_invert(&self.map)?;
        let translation = -map_apply(&map, self.translation);
        Ok(Self {
            map,
            translation,
            center: self.center,
        })
    }

    /// Transform a point.
    pub fn apply(&self, point: Vector<f64, N>) -> Vector<f64, N> {
        self.center + self.translation + map_apply(&self.map, point - self.center)
    }

    /// Transform an integer position.
    pub fn apply_position(&self, position: Position<N>) -> Vector<f64, N> {
        self.apply(position.to_f64())
    }

    /// Resample an interpolated input over an output domain.
    ///
    /// Walks `domain` and pulls each cell from the inverse-mapped input
    /// position.
    pub fn warp<T, S, M>(
        &self,
        input: &Interpolated<S, M>,
        domain: &Bounds<N>,
    ) -> Result<Raster<T, N>>
    where
        T: Element + Send,
        S: Sampler<T, N> + Sync,
        M: Interpolation<T> + Sync,
    {
        let inverse = self.inverse()?;
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
                for position in slab.positions() {
                    out.push(input.at(inverse.apply_position(position)));
                }
                out
            })
            .collect();
        Raster::from_vec(*domain, values)
    }
}

/// Resample to a domain scaled by `factor`, around the origin.
pub fn upsample<T, S, M, const N: usize>(
    input: &Interpolated<S, M>,
    factor: f64,
) -> Result<Raster<T, N>>
where
    T: Element + Send,
    S: Sampler<T, N> + Sync,
    M: Interpolation<T> + Sync,
{
    let domain = input.domain();
    let front = Position::new(std::array::from_fn(|axis| {
        (domain.front()[axis] as f64 * factor).floor() as i64
    }));
    let lengths = Position::new(std::array::from_fn(|axis| {
        ((domain.length(axis) as f64 * factor).floor() as i64).max(0)
    }));
    let out_domain = Bounds::new(front, front + lengths.sub_scalar(1));
    let mut scaling = Affinity::<N>::identity();
    scaling.scale(factor);
    scaling.warp(input, &out_domain)
}

/// Resample to a domain shrunk by `factor`, around the origin.
pub fn downsample<T, S, M, const N: usize>(
    input: &Interpolated<S, M>,
    factor: f64,
) -> Result<Raster<T, N>>
where
    T: Element + Send,
    S: Sampler<T, N> + Sync,
    M: Interpolation<T> + Sync,
{
    upsample(input, 1.0 / factor)
}

/// Rotate an interpolated input around the center of its domain.
pub fn rotate_about_center<T, S, M, const N: usize>(
    input: &Interpolated<S, M>,
    radians: f64,
    from: usize,
    to: usize,
) -> Result<Raster<T, N>>
where
    T: Element + Send,
    S: Sampler<T, N> + Sync,
    M: Interpolation<T> + Sync,
{
    let domain = input.domain();
    let center = (domain.front() + domain.back()).to_f64() / 2.0;
    let rotation = Affinity::rotation(radians, from, to, center)?;
    rotation.warp(input, &domain)
}
