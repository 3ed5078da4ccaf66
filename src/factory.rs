//! Polynomial factory: builds the named polynomial families (A, Ã, B, B̃,
//! C, C̃, D, D̃, u, v, w, y, T↓, T⇊, T↑, T∼) used as transfer-matrix
//! entries, from the scalar kernels in [`crate::kernels`].
//!
//! Every closed form below accumulates the running factor `(1-P)^{i-1}`
//! incrementally (`q *= 1.0 - params.p` each step) rather than calling
//! `powi` per term, matching the reference's `pow_of_q` variable -- this
//! is required for bit-identical results, not just an optimization (see
//! spec.md §4.3).

use crate::engine::Params;
use crate::error::EngineError;
use crate::kernels::{alpha_n, beta_n, delta_n, gamma_n, omega, omega_tilde, xi};
use crate::trunc_poly::TruncPoly;

fn cst(params: &Params, n: usize, tilde: bool) -> f64 {
    if tilde {
        omega_tilde(params.p, params.u, n)
    } else {
        omega(params.p, params.u, n)
    }
}

fn check_degree(params: &Params, deg: usize) -> Result<(), EngineError> {
    if deg == 0 || deg > params.k {
        return Err(EngineError::InvariantViolation {
            detail: "polynomial factory requested at degree 0 or above K",
        });
    }
    Ok(())
}

fn check_monomial_degree(params: &Params, deg: usize) -> Result<(), EngineError> {
    if deg == 0 || deg >= params.g || deg > params.k {
        return Err(EngineError::InvariantViolation {
            detail: "monomial family requested outside [1, min(K, G-1)]",
        });
    }
    Ok(())
}

/// The shared `αN(j) − αN(j−1) − γN(j) + δN(j−1)` denominator that the
/// C/y/T∼ families all divide by. Returns `None` when `N == 1`, since that
/// denominator is then identically zero -- not a failure, the corresponding
/// matrix cell is simply the null-poly (spec.md §4.3/§4.4).
fn c_family_denom(u: f64, n: usize, j: usize) -> Option<f64> {
    if n == 1 {
        return None;
    }
    Some(alpha_n(u, n, j) - alpha_n_prev(u, n, j) - gamma_n(u, n, j) + delta_n_prev(u, n, j))
}

// `j` may be 0 in these families (e.g. C_deg with deg == G); αN(j-1) and
// δN(j-1) must then read index "-1", which the closed form treats as 0
// (since (1-U)^{-1}... is never evaluated: at j=0 the reference always
// pairs αN(0)=1 with the understanding that the j-1 term only appears
// subtracted alongside a matching j term). We mirror the reference's use
// of signed-safe helpers that special-case the j=0 boundary.
fn alpha_n_prev(u: f64, n: usize, j: usize) -> f64 {
    if j == 0 {
        // αN(-1) is never reached in a well-formed matrix (j >= 1 for all
        // callers that subtract the j-1 term); kept total for robustness.
        alpha_n(u, n, 0)
    } else {
        alpha_n(u, n, j - 1)
    }
}

fn delta_n_prev(u: f64, n: usize, j: usize) -> f64 {
    if j == 0 {
        delta_n(u, n, 0)
    } else {
        delta_n(u, n, j - 1)
    }
}

fn beta_n_at(u: f64, n: usize, j: usize, i: usize) -> f64 {
    beta_n(u, n, j, i)
}

/// `βN(j−1, i)`, treating `βN(−1, i)` as `βN(0, i)` at the `j == 0`
/// boundary (mirrors `alpha_n_prev`/`delta_n_prev`).
fn beta_n_prev_j(u: f64, n: usize, j: usize, i: usize) -> f64 {
    if j == 0 {
        beta_n(u, n, 0, i)
    } else {
        beta_n(u, n, j - 1, i)
    }
}

/// `A_deg` / `Ã_deg`.
pub fn a_deg(params: &Params, deg: usize, n: usize, tilde: bool) -> Result<TruncPoly, EngineError> {
    check_degree(params, deg)?;
    let mut poly = TruncPoly::zero(params.k);
    let c = cst(params, n, tilde);
    let d = deg.min(params.g);
    let mut q = 1.0;
    for i in 1..=d {
        poly.set_coeff(i, c * xi(params.u, i - 1, n) * q);
        q *= 1.0 - params.p;
    }
    for i in (d + 1)..=deg {
        poly.set_coeff(i, params.p * (1.0 - alpha_n(params.u, n, i - 1)) * q);
        q *= 1.0 - params.p;
    }
    Ok(poly)
}

/// `B_deg` / `B̃_deg`.
pub fn b_deg(params: &Params, deg: usize, n: usize, tilde: bool) -> Result<TruncPoly, EngineError> {
    check_degree(params, deg)?;
    let mut poly = TruncPoly::zero(params.k);
    let c = cst(params, n, tilde);
    let denom = 1.0 - (1.0 - params.u / 3.0).powi(n as i32);
    let mut q = 1.0;
    for i in 1..=deg {
        poly.set_coeff(i, c * (1.0 - alpha_n(params.u, n, i - 1)) / denom * q);
        q *= 1.0 - params.p;
    }
    Ok(poly)
}

/// `C_deg` / `C̃_deg`. `None` when `N == 1` (not a failure).
pub fn c_deg(
    params: &Params,
    deg: usize,
    n: usize,
    tilde: bool,
) -> Result<Option<TruncPoly>, EngineError> {
    if n == 1 {
        return Ok(None);
    }
    check_degree(params, deg)?;
    if deg > params.g {
        return Err(EngineError::InvariantViolation {
            detail: "C family requested at degree above G",
        });
    }
    let u = params.u;
    let j = params.g - deg;
    let denom = c_family_denom(u, n, j).expect("n != 1 checked above");
    let mut poly = TruncPoly::zero(params.k);
    let c = cst(params, n, tilde);
    let mut q = 1.0;
    for i in 1..=deg {
        let numer = alpha_n(u, n, j) - alpha_n_prev(u, n, j) - beta_n_at(u, n, j, i + j - 1)
            + beta_n_prev_j(u, n, j, i + j - 1);
        poly.set_coeff(i, c * numer / denom * q);
        q *= 1.0 - params.p;
    }
    Ok(Some(poly))
}

/// `D_deg` / `D̃_deg`.
pub fn d_deg(params: &Params, deg: usize, n: usize, tilde: bool) -> Result<TruncPoly, EngineError> {
    check_degree(params, deg)?;
    let mut poly = TruncPoly::zero(params.k);
    let c = cst(params, n, tilde);
    let mut q = 1.0;
    for i in 1..=deg {
        poly.set_coeff(i, c * q);
        q *= 1.0 - params.p;
    }
    Ok(poly)
}

/// `u_deg`: monomial at `deg` with coefficient `(ξ(deg-1,N) − ξ(deg,N)) · (1-P)^deg`.
pub fn u_deg(params: &Params, deg: usize, n: usize) -> Result<TruncPoly, EngineError> {
    check_monomial_degree(params, deg)?;
    let mut poly = TruncPoly::zero(params.k);
    let coeff = (xi(params.u, deg - 1, n) - xi(params.u, deg, n)) * (1.0 - params.p).powi(deg as i32);
    poly.set_monomial(deg, coeff);
    Ok(poly)
}

/// `v_deg`.
pub fn v_deg(params: &Params, deg: usize, n: usize) -> Result<TruncPoly, EngineError> {
    check_monomial_degree(params, deg)?;
    let u = params.u;
    let numer = alpha_n(u, n, deg) - alpha_n_prev(u, n, deg) - gamma_n(u, n, deg) + delta_n_prev(u, n, deg);
    let denom = 1.0 - (1.0 - u / 3.0).powi(n as i32);
    let mut poly = TruncPoly::zero(params.k);
    poly.set_monomial(deg, numer / denom * (1.0 - params.p).powi(deg as i32));
    Ok(poly)
}

/// `w_deg`.
pub fn w_deg(params: &Params, deg: usize, n: usize) -> Result<TruncPoly, EngineError> {
    check_monomial_degree(params, deg)?;
    let u = params.u;
    let numer = gamma_n(u, n, deg) - delta_n_prev(u, n, deg);
    let denom = 1.0 - (1.0 - u / 3.0).powi(n as i32);
    let mut poly = TruncPoly::zero(params.k);
    poly.set_monomial(deg, numer / denom * (1.0 - params.p).powi(deg as i32));
    Ok(poly)
}

/// `y(j, i, N)`. `None` when `N == 1` (not a failure).
pub fn y(params: &Params, j: usize, i: usize, n: usize) -> Result<Option<TruncPoly>, EngineError> {
    if n == 1 {
        return Ok(None);
    }
    check_monomial_degree(params, i)?;
    let u = params.u;
    // βN(j, j+i) − βN(j, j+i−1) − βN(j−1, i+j) + βN(j−1, j+i−1)
    let numer = beta_n_at(u, n, j, j + i) - beta_n_at(u, n, j, j + i - 1)
        - beta_n_prev_j(u, n, j, i + j)
        + beta_n_prev_j(u, n, j, j + i - 1);
    let denom = c_family_denom(u, n, j).expect("n != 1 checked above");
    let mut poly = TruncPoly::zero(params.k);
    poly.set_monomial(i, numer / denom * (1.0 - params.p).powi(i as i32));
    Ok(Some(poly))
}

/// `T↓(N)`: `c[i] = (1 − αN(i)) / (1 − (1−U/3)^N) · (1−P)^i`, for `i ∈ [0, HIGH]`.
pub fn t_down(params: &Params, n: usize) -> Result<TruncPoly, EngineError> {
    let u = params.u;
    let denom = 1.0 - (1.0 - u / 3.0).powi(n as i32);
    let mut poly = TruncPoly::zero(params.k);
    let mut q = 1.0;
    for i in 0..=params.high {
        poly.set_coeff(i, (1.0 - alpha_n(u, n, i)) / denom * q);
        q *= 1.0 - params.p;
    }
    Ok(poly)
}

/// `T⇊(N)`: `c[i] = ξ(i, N) · (1−P)^i`, for `i ∈ [0, G−1]`.
pub fn t_ddown(params: &Params, n: usize) -> Result<TruncPoly, EngineError> {
    let mut poly = TruncPoly::zero(params.k);
    let mut q = 1.0;
    for i in 0..params.g {
        poly.set_coeff(i, xi(params.u, i, n) * q);
        q *= 1.0 - params.p;
    }
    Ok(poly)
}

/// `T↑_deg(N)`: `c[i] = (1−P)^i` for `i ∈ [0, deg]`.
pub fn t_up(params: &Params, deg: usize, n: usize) -> Result<TruncPoly, EngineError> {
    let _ = n;
    if deg >= params.g || deg > params.k {
        return Err(EngineError::InvariantViolation {
            detail: "T-up requested at degree >= G or > K",
        });
    }
    let mut poly = TruncPoly::zero(params.k);
    let mut q = 1.0;
    for i in 0..=deg {
        poly.set_coeff(i, q);
        q *= 1.0 - params.p;
    }
    Ok(poly)
}

/// `T∼_deg(N)`. `None` when `N == 1` (not a failure).
pub fn t_sim(params: &Params, deg: usize, n: usize) -> Result<Option<TruncPoly>, EngineError> {
    if n == 1 {
        return Ok(None);
    }
    if deg >= params.g || deg > params.k {
        return Err(EngineError::InvariantViolation {
            detail: "T-sim requested at degree >= G or > K",
        });
    }
    let u = params.u;
    let j = params.g - 1 - deg;
    let denom = c_family_denom(u, n, j).expect("n != 1 checked above");
    let mut poly = TruncPoly::zero(params.k);
    let mut q = 1.0;
    for i in 0..=deg {
        let numer =
            alpha_n(u, n, j) - alpha_n_prev(u, n, j) - beta_n_at(u, n, j, i + j) + beta_n_prev_j(u, n, j, i + j);
        poly.set_coeff(i, numer / denom * q);
        q *= 1.0 - params.p;
    }
    Ok(Some(poly))
}
