//! Linear algebra utilities.
//!
//! Small-matrix SVD, pseudoinverse least squares, and the quadratic
//! surface fit used by the FORC distribution kernel.

use forc_types::constants::QUADRATIC_TERMS;
use forc_types::error::{HysteresisError, HysteresisResult};
use ndarray::{Array1, Array2};

const JACOBI_MAX_SWEEPS: usize = 100;

/// Relative off-diagonal mass at which the Jacobi sweep stops.
const JACOBI_REL_TOL: f64 = 1e-15;

/// Relative singular-value cutoff for least squares. Forming A^T*A resolves
/// singular values only to about sqrt(eps) of sigma_max.
const LSTSQ_RCOND: f64 = 1e-7;

/// SVD of a small tall matrix.
///
/// Returns (U, sigma, Vt) where A ≈ U * diag(sigma) * Vt, with sigma sorted
/// in descending order. The local fit design matrices are a few dozen rows
/// by six columns, so the decomposition goes through the n×n Gram matrix
/// A^T*A (cyclic Jacobi) instead of rotating A itself.
pub fn svd_small(a: &Array2<f64>) -> (Array2<f64>, Array1<f64>, Array2<f64>) {
    let (m, n) = a.dim();
    let k = m.min(n);

    let (eigenvalues, v) = jacobi_eigen(a.t().dot(a));

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&x, &y| eigenvalues[y].total_cmp(&eigenvalues[x]));
    order.truncate(k);

    let sigma: Array1<f64> = order
        .iter()
        .map(|&col| eigenvalues[col].max(0.0).sqrt())
        .collect();
    let mut vt = Array2::zeros((k, n));
    for (row, &col) in order.iter().enumerate() {
        vt.row_mut(row).assign(&v.column(col));
    }

    // U = A * V * diag(1/sigma); null directions keep a zero column.
    let sigma_floor = sigma.get(0).copied().unwrap_or(0.0) * f64::EPSILON;
    let mut u = Array2::zeros((m, k));
    for idx in 0..k {
        if sigma[idx] > sigma_floor && sigma[idx] > 0.0 {
            let column = a.dot(&vt.row(idx)) / sigma[idx];
            u.column_mut(idx).assign(&column);
        }
    }

    (u, sigma, vt)
}

/// Eigen-decomposition of a symmetric matrix by cyclic Jacobi rotations.
///
/// Returns the (unsorted) eigenvalues and the matrix whose columns are the
/// matching eigenvectors.
fn jacobi_eigen(mut s: Array2<f64>) -> (Array1<f64>, Array2<f64>) {
    let n = s.nrows();
    let scale = s.diag().sum().max(f64::MIN_POSITIVE);
    let mut v = Array2::eye(n);

    for _ in 0..JACOBI_MAX_SWEEPS {
        let off_diag: f64 = (0..n)
            .flat_map(|p| ((p + 1)..n).map(move |q| (p, q)))
            .map(|(p, q)| s[[p, q]].abs())
            .sum();
        if off_diag <= JACOBI_REL_TOL * scale {
            break;
        }
        for p in 0..n {
            for q in (p + 1)..n {
                if s[[p, q]].abs() > JACOBI_REL_TOL * scale * 1e-3 {
                    rotate(&mut s, &mut v, p, q);
                }
            }
        }
    }

    (s.diag().to_owned(), v)
}

/// Apply the rotation J(p, q) that zeroes `s[p, q]`: S ← JᵀSJ, V ← VJ.
fn rotate(s: &mut Array2<f64>, v: &mut Array2<f64>, p: usize, q: usize) {
    let n = s.nrows();
    let theta = (s[[q, q]] - s[[p, p]]) / (2.0 * s[[p, q]]);
    let t = theta.signum() / (theta.abs() + (1.0 + theta * theta).sqrt());
    let c = 1.0 / (1.0 + t * t).sqrt();
    let sn = t * c;

    for r in 0..n {
        let (sp, sq) = (s[[r, p]], s[[r, q]]);
        s[[r, p]] = c * sp - sn * sq;
        s[[r, q]] = sn * sp + c * sq;
    }
    for r in 0..n {
        let (sp, sq) = (s[[p, r]], s[[q, r]]);
        s[[p, r]] = c * sp - sn * sq;
        s[[q, r]] = sn * sp + c * sq;
    }
    s[[p, q]] = 0.0;
    s[[q, p]] = 0.0;

    for r in 0..n {
        let (vp, vq) = (v[[r, p]], v[[r, q]]);
        v[[r, p]] = c * vp - sn * vq;
        v[[r, q]] = sn * vp + c * vq;
    }
}

/// Minimum-norm least-squares solution of `A x ≈ b`.
///
/// Singular values below `LSTSQ_RCOND * sigma_max` are discarded, so
/// rank-deficient systems still return the minimum-norm solution.
pub fn lstsq(a: &Array2<f64>, b: &Array1<f64>) -> HysteresisResult<Array1<f64>> {
    let (m, n) = a.dim();
    if b.len() != m {
        return Err(HysteresisError::LinAlg(format!(
            "lstsq dimension mismatch: A is {m}x{n}, b has {} rows",
            b.len()
        )));
    }
    if m == 0 || n == 0 {
        return Err(HysteresisError::LinAlg(format!(
            "lstsq requires a non-empty system, got {m}x{n}"
        )));
    }

    let (u, sigma, vt) = svd_small(a);
    let cutoff = sigma[0] * LSTSQ_RCOND;

    let mut x = Array1::zeros(n);
    for (idx, &s) in sigma.iter().enumerate() {
        if s <= cutoff || s == 0.0 {
            continue;
        }
        let coeff = u.column(idx).dot(b) / s;
        x.scaled_add(coeff, &vt.row(idx));
    }
    Ok(x)
}

/// Least-squares fit of `m ≈ a0 + a1·x + a2·y + a3·x² + a4·y² + a5·x·y`.
///
/// Returns `[a0, a1, a2, a3, a4, a5]`. Callers should pass coordinates
/// centred and scaled to O(1); the cross coefficient is unchanged by
/// translation and scales as `1 / (sx · sy)`.
pub fn poly2_surface_fit(
    x: &[f64],
    y: &[f64],
    m: &[f64],
) -> HysteresisResult<[f64; QUADRATIC_TERMS]> {
    if x.len() != m.len() || y.len() != m.len() {
        return Err(HysteresisError::LinAlg(format!(
            "surface fit sample mismatch: x={}, y={}, m={}",
            x.len(),
            y.len(),
            m.len()
        )));
    }

    let rows = m.len();
    let design = Array2::from_shape_fn((rows, QUADRATIC_TERMS), |(r, c)| {
        let (xr, yr) = (x[r], y[r]);
        match c {
            0 => 1.0,
            1 => xr,
            2 => yr,
            3 => xr * xr,
            4 => yr * yr,
            _ => xr * yr,
        }
    });
    let rhs = Array1::from_vec(m.to_vec());

    let coeffs = lstsq(&design, &rhs)?;
    let mut out = [0.0; QUADRATIC_TERMS];
    for (slot, value) in out.iter_mut().zip(coeffs.iter()) {
        *slot = *value;
    }
    Ok(out)
}
