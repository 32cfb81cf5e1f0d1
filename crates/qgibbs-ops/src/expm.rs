//! Dense matrix helpers: exponential, norms and unitarity checks.

use nalgebra::DMatrix;
use ndarray::Array2;
use num_complex::Complex64;

use crate::error::{OpsError, OpsResult};

/// Coefficients of the degree-13 Padé approximant (Higham 2005, Table 2.3).
const PADE13: [f64; 14] = [
    64_764_752_532_480_000.0,
    32_382_376_266_240_000.0,
    7_771_770_303_897_600.0,
    1_187_353_796_428_800.0,
    129_060_195_264_000.0,
    10_559_470_521_600.0,
    670_442_572_800.0,
    33_522_128_640.0,
    1_323_241_920.0,
    40_840_800.0,
    960_960.0,
    16_380.0,
    182.0,
    1.0,
];

/// Largest 1-norm for which degree 13 is accurate to double precision.
const THETA13: f64 = 5.371_920_351_148_152;

/// Induced 1-norm (maximum absolute column sum).
pub fn one_norm(a: &Array2<Complex64>) -> f64 {
    a.columns()
        .into_iter()
        .map(|col| col.iter().map(|z| z.norm()).sum::<f64>())
        .fold(0.0, f64::max)
}

fn to_nalgebra(a: &Array2<Complex64>) -> DMatrix<Complex64> {
    DMatrix::from_fn(a.nrows(), a.ncols(), |r, c| a[[r, c]])
}

fn from_nalgebra(m: &DMatrix<Complex64>) -> Array2<Complex64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(r, c)| m[(r, c)])
}

/// Matrix exponential by scaling and squaring with a degree-13 Padé core.
///
/// `A` is scaled by `2^-s` until its 1-norm is at most `THETA13`, the
/// approximant `(V - U)⁻¹(V + U)` is solved by LU and the result is squared
/// `s` times.
pub fn expm(a: &Array2<Complex64>) -> OpsResult<Array2<Complex64>> {
    let (rows, cols) = a.dim();
    if rows != cols {
        return Err(OpsError::InvalidShape { rows, cols });
    }

    let norm = one_norm(a);
    if !norm.is_finite() {
        return Err(OpsError::Numerical(
            "matrix exponential of a non-finite matrix".into(),
        ));
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let squarings = if norm > THETA13 {
        (norm / THETA13).log2().ceil() as i32
    } else {
        0
    };
    let a = to_nalgebra(a).scale(2f64.powi(-squarings));

    let b = PADE13;
    let id = DMatrix::<Complex64>::identity(rows, rows);
    let a2 = &a * &a;
    let a4 = &a2 * &a2;
    let a6 = &a4 * &a2;

    let u_inner = &a6 * (a6.scale(b[13]) + a4.scale(b[11]) + a2.scale(b[9]))
        + a6.scale(b[7])
        + a4.scale(b[5])
        + a2.scale(b[3])
        + id.scale(b[1]);
    let u = &a * u_inner;
    let v = &a6 * (a6.scale(b[12]) + a4.scale(b[10]) + a2.scale(b[8]))
        + a6.scale(b[6])
        + a4.scale(b[4])
        + a2.scale(b[2])
        + id.scale(b[0]);

    let mut result = (&v - &u)
        .lu()
        .solve(&(&v + &u))
        .ok_or_else(|| OpsError::Numerical("singular Padé denominator".into()))?;
    for _ in 0..squarings {
        result = &result * &result;
    }

    if result.iter().any(|z| !z.is_finite()) {
        return Err(OpsError::Numerical("matrix exponential overflowed".into()));
    }
    Ok(from_nalgebra(&result))
}

/// Conjugate transpose.
pub fn dagger(a: &Array2<Complex64>) -> Array2<Complex64> {
    a.t().mapv(|z| z.conj())
}

/// Largest singular value; NaN if any entry is not finite.
pub fn spectral_norm(a: &Array2<Complex64>) -> f64 {
    if a.is_empty() {
        return 0.0;
    }
    if a.iter().any(|z| !z.is_finite()) {
        return f64::NAN;
    }
    to_nalgebra(a)
        .singular_values()
        .iter()
        .copied()
        .fold(0.0, f64::max)
}

/// Largest entry-wise deviation between two matrices of equal shape.
pub fn max_abs_diff(a: &Array2<Complex64>, b: &Array2<Complex64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).norm())
        .fold(0.0, f64::max)
}

/// True if `U·U† = I` entry-wise within `tol`.
pub fn is_unitary(u: &Array2<Complex64>, tol: f64) -> bool {
    let (rows, cols) = u.dim();
    rows == cols && max_abs_diff(&u.dot(&dagger(u)), &Array2::eye(rows)) <= tol
}
