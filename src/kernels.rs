//! Scalar kernels: pure functions of `(P, U, N, i, j)` returning `f64`.
//!
//! These are the atomic building blocks for every polynomial coefficient
//! produced by the factory (`crate::factory`). Each one mirrors a macro of
//! the same shape in the original reference implementation; the algebraic
//! grouping below is kept identical to that reference so results reproduce
//! bit-for-bit.

/// `ω(N) = P · (1 - U/3)^N`
#[inline]
pub fn omega(p: f64, u: f64, n: usize) -> f64 {
    p * (1.0 - u / 3.0).powi(n as i32)
}

/// `ω̃(N) = P · (1 - (1 - U/3)^N)`
#[inline]
pub fn omega_tilde(p: f64, u: f64, n: usize) -> f64 {
    p * (1.0 - (1.0 - u / 3.0).powi(n as i32))
}

/// `ξ(i, m) = 1 - (1 - (1-U)^i)^m`
///
/// Probability that at least one of `m` alternative threads survives `i`
/// steps.
#[inline]
pub fn xi(u: f64, i: usize, m: usize) -> f64 {
    1.0 - (1.0 - (1.0 - u).powi(i as i32)).powi(m as i32)
}

/// `αN(i) = (1 - (1-U)^i · U/3)^N`
#[inline]
pub fn alpha_n(u: f64, n: usize, i: usize) -> f64 {
    (1.0 - (1.0 - u).powi(i as i32) * (u / 3.0)).powi(n as i32)
}

/// `γN(i) = (1 - (1-U)^i)^N`
#[inline]
pub fn gamma_n(u: f64, n: usize, i: usize) -> f64 {
    (1.0 - (1.0 - u).powi(i as i32)).powi(n as i32)
}

/// `δN(i) = (1 - (1 - U + U²/3) · (1-U)^i)^N`
#[inline]
pub fn delta_n(u: f64, n: usize, i: usize) -> f64 {
    (1.0 - (1.0 - u + u * u / 3.0) * (1.0 - u).powi(i as i32)).powi(n as i32)
}

/// `βN(j, i) = (1 - (1-U)^j·U/3 - (1-U)^i·(1 - U/3))^N`
#[inline]
pub fn beta_n(u: f64, n: usize, j: usize, i: usize) -> f64 {
    (1.0 - (1.0 - u).powi(j as i32) * (u / 3.0) - (1.0 - u).powi(i as i32) * (1.0 - u / 3.0))
        .powi(n as i32)
}
