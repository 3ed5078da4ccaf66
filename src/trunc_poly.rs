//! Truncated polynomial algebra.
//!
//! A [`TruncPoly`] is a degree-K truncated polynomial: coefficients above
//! degree K are simply not representable, so multiplication is a truncated
//! convolution rather than a full one. This generalizes the teacher's
//! `PolynomialCoefficientsFixedLength<T, const LEN: usize>`
//! (`determinant_and_adjugate.rs`) from a compile-time array length to a
//! configure-time `Vec<f64>` length, since K is only known once the engine
//! is configured, not at compile time.
//!
//! The *null polynomial* -- "this matrix cell has no term at all" -- is
//! represented one layer up as `Option<TruncPoly>` (see `crate::matrix`),
//! not by any value of this type; every `TruncPoly` that exists represents
//! a concrete (possibly all-zero) polynomial. `mul` and `add_into` below
//! take `Option<&TruncPoly>` operands because the closed forms that build
//! matrix entries need to combine present and null terms in one place.

/// A degree-K truncated polynomial, plus an optional monomial hint.
///
/// When `hint` is `Some((deg, coeff))`, this polynomial is known to be the
/// single term `coeff * x^deg`; `coeffs[deg]` is always kept equal to
/// `coeff` in that case; the hint is purely an optimization opportunity
/// for `mul`, never a separate source of truth.
#[derive(Clone, Debug, PartialEq)]
pub struct TruncPoly {
    coeffs: Vec<f64>,
    hint: Option<(usize, f64)>,
}

impl TruncPoly {
    /// An all-zero polynomial of degree capacity `k` (coefficients
    /// `0..=k`), with no monomial hint.
    pub fn zero(k: usize) -> Self {
        TruncPoly {
            coeffs: vec![0.0; k + 1],
            hint: None,
        }
    }

    /// The maximum representable degree (`K`, not the polynomial's actual
    /// degree -- trailing zero coefficients are not trimmed).
    pub fn max_degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// Coefficient of `x^i`, or `0.0` if `i` is within bounds but simply
    /// zero. Panics if `i` exceeds the polynomial's degree capacity, as
    /// spec.md's mul invariant promises this index is never read.
    pub fn coeff(&self, i: usize) -> f64 {
        self.coeffs[i]
    }

    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    /// The monomial hint, if this polynomial is known to be a single term.
    pub fn hint(&self) -> Option<(usize, f64)> {
        self.hint
    }

    /// Sets `coeffs[deg] = coeff` and records the monomial hint. Every
    /// factory constructor that builds a monomial must call this rather
    /// than writing the coefficient directly, so the hint and the
    /// coefficient vector never disagree.
    pub fn set_monomial(&mut self, deg: usize, coeff: f64) {
        self.coeffs[deg] = coeff;
        self.hint = Some((deg, coeff));
    }

    /// Sets `coeffs[i] = value` for a non-monomial term. Clears the hint,
    /// since a polynomial with more than one explicit term is no longer
    /// known to be a single monomial.
    pub fn set_coeff(&mut self, i: usize, value: f64) {
        self.coeffs[i] = value;
        self.hint = None;
    }

    /// `dest += a`, in place. A `None` operand (the null-poly) contributes
    /// nothing. Destroys any monomial hint `dest` may have carried, since
    /// the sum of two terms is not generally a monomial.
    pub fn add_into(dest: &mut TruncPoly, a: Option<&TruncPoly>) {
        let Some(a) = a else { return };
        debug_assert_eq!(dest.coeffs.len(), a.coeffs.len());
        for (d, s) in dest.coeffs.iter_mut().zip(a.coeffs.iter()) {
            *d += s;
        }
        dest.hint = None;
    }

    /// `dest = a * b`, truncated to degree `dest.max_degree()`.
    ///
    /// Mirrors the reference's `trunc_pol_mult`: a `None` operand makes the
    /// product the null-poly (`dest` is zeroed and `false` is returned so
    /// callers can skip accumulating it); two monomial hints multiply in
    /// O(1); one monomial hint multiplies in O(K); otherwise this is a
    /// full O(K²) truncated convolution.
    ///
    /// Returns `true` if the product is possibly nonzero (callers may
    /// still accumulate an all-zero result; the return value is an
    /// optimization signal, not a correctness guarantee).
    pub fn mul(dest: &mut TruncPoly, a: Option<&TruncPoly>, b: Option<&TruncPoly>) -> bool {
        let k = dest.max_degree();
        let (a, b) = match (a, b) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                dest.coeffs.iter_mut().for_each(|c| *c = 0.0);
                dest.hint = None;
                return false;
            }
        };
        debug_assert_eq!(a.coeffs.len(), k + 1);
        debug_assert_eq!(b.coeffs.len(), k + 1);

        match (a.hint, b.hint) {
            (Some((da, ca)), Some((db, cb))) => {
                dest.coeffs.iter_mut().for_each(|c| *c = 0.0);
                dest.hint = None;
                if da + db > k {
                    false
                } else {
                    dest.set_monomial(da + db, ca * cb);
                    true
                }
            }
            (Some((da, ca)), None) => {
                dest.hint = None;
                for i in 0..=k {
                    dest.coeffs[i] = if i >= da { ca * b.coeffs[i - da] } else { 0.0 };
                }
                true
            }
            (None, Some((db, cb))) => {
                dest.hint = None;
                for i in 0..=k {
                    dest.coeffs[i] = if i >= db { cb * a.coeffs[i - db] } else { 0.0 };
                }
                true
            }
            (None, None) => {
                dest.hint = None;
                for i in 0..=k {
                    let mut sum = 0.0;
                    for j in 0..=i {
                        sum += a.coeffs[j] * b.coeffs[i - j];
                    }
                    dest.coeffs[i] = sum;
                }
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn dense(coeffs: &[f64]) -> TruncPoly {
        let k = coeffs.len() - 1;
        let mut p = TruncPoly::zero(k);
        for (i, &c) in coeffs.iter().enumerate() {
            p.set_coeff(i, c);
        }
        p
    }

    #[test]
    fn zero_is_all_zero() {
        let z = TruncPoly::zero(4);
        assert_eq!(z.coeffs(), &[0.0; 5]);
        assert_eq!(z.hint(), None);
    }

    #[test]
    fn add_into_skips_null() {
        let mut dest = dense(&[1.0, 2.0, 3.0]);
        TruncPoly::add_into(&mut dest, None);
        assert_eq!(dest.coeffs(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn add_into_accumulates_and_clears_hint() {
        let mut dest = TruncPoly::zero(3);
        dest.set_monomial(1, 5.0);
        let a = dense(&[1.0, 1.0, 1.0, 1.0]);
        TruncPoly::add_into(&mut dest, Some(&a));
        assert_eq!(dest.coeffs(), &[1.0, 6.0, 1.0, 1.0]);
        assert_eq!(dest.hint(), None);
    }

    #[test]
    fn mul_with_null_operand_zeroes_dest() {
        let mut dest = dense(&[9.0, 9.0, 9.0]);
        let a = dense(&[1.0, 2.0, 3.0]);
        let nonzero = TruncPoly::mul(&mut dest, Some(&a), None);
        assert!(!nonzero);
        assert_eq!(dest.coeffs(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn mul_full_convolution_matches_hand_computation() {
        // (1 + 2x) * (3 + 4x), truncated to degree 3 (no truncation needed).
        let a = dense(&[1.0, 2.0, 0.0, 0.0]);
        let b = dense(&[3.0, 4.0, 0.0, 0.0]);
        let mut dest = TruncPoly::zero(3);
        TruncPoly::mul(&mut dest, Some(&a), Some(&b));
        // 3 + (4+6)x + 8x^2
        assert_relative_eq!(dest.coeff(0), 3.0);
        assert_relative_eq!(dest.coeff(1), 10.0);
        assert_relative_eq!(dest.coeff(2), 8.0);
        assert_relative_eq!(dest.coeff(3), 0.0);
    }

    #[test]
    fn mul_truncates_above_k() {
        // (1 + x)^1 * (x^3), truncated at degree 3: only the x^3 term of
        // the product (coefficient 1) survives; x^4 is dropped.
        let a = dense(&[1.0, 1.0, 0.0, 0.0]);
        let mut b = TruncPoly::zero(3);
        b.set_monomial(3, 1.0);
        let mut dest = TruncPoly::zero(3);
        TruncPoly::mul(&mut dest, Some(&a), Some(&b));
        assert_relative_eq!(dest.coeff(3), 1.0);
    }

    #[test]
    fn mul_two_monomials_out_of_range_is_zero() {
        let mut a = TruncPoly::zero(3);
        a.set_monomial(2, 2.0);
        let mut b = TruncPoly::zero(3);
        b.set_monomial(2, 3.0);
        let mut dest = TruncPoly::zero(3);
        let nonzero = TruncPoly::mul(&mut dest, Some(&a), Some(&b));
        assert!(!nonzero);
        assert_eq!(dest.coeffs(), &[0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn mul_two_monomials_in_range() {
        let mut a = TruncPoly::zero(5);
        a.set_monomial(2, 2.0);
        let mut b = TruncPoly::zero(5);
        b.set_monomial(1, 3.0);
        let mut dest = TruncPoly::zero(5);
        let nonzero = TruncPoly::mul(&mut dest, Some(&a), Some(&b));
        assert!(nonzero);
        assert_eq!(dest.hint(), Some((3, 6.0)));
        assert_relative_eq!(dest.coeff(3), 6.0);
    }

    #[test]
    fn mul_one_monomial_matches_shifted_scale() {
        let mut a = TruncPoly::zero(4);
        a.set_monomial(1, 2.0);
        let b = dense(&[1.0, 2.0, 3.0, 0.0, 0.0]);
        let mut dest = TruncPoly::zero(4);
        TruncPoly::mul(&mut dest, Some(&a), Some(&b));
        // 2x * (1 + 2x + 3x^2) = 2x + 4x^2 + 6x^3
        assert_relative_eq!(dest.coeff(0), 0.0);
        assert_relative_eq!(dest.coeff(1), 2.0);
        assert_relative_eq!(dest.coeff(2), 4.0);
        assert_relative_eq!(dest.coeff(3), 6.0);
        assert_relative_eq!(dest.coeff(4), 0.0);
    }
}
