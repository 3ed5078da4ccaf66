//! The transfer matrix `M(N)` and the truncated power-series summation that
//! turns it into the generating function `w(N)`.
//!
//! A [`Matrix`] is a `dim x dim` grid of `Option<TruncPoly>`, stored flat
//! and row-major -- the same layout the reference C uses for its
//! `term[i*dim+j]` array, kept here instead of reaching for `ndarray`
//! (nothing else in this crate needs a dependency on it; see DESIGN.md).
//! `None` is the null-poly: an entry with no term at all, which shortcuts
//! both multiplication and the matrix assembly below.

use crate::engine::Params;
use crate::error::EngineError;
use crate::factory;
use crate::trunc_poly::TruncPoly;

/// A square grid of `dim x dim` `Option<TruncPoly>` entries, row-major.
pub struct Matrix {
    dim: usize,
    terms: Vec<Option<TruncPoly>>,
}

impl Clone for Matrix {
    fn clone(&self) -> Self {
        Matrix {
            dim: self.dim,
            terms: self.terms.clone(),
        }
    }
}

impl Matrix {
    /// A matrix where every entry is the null-poly.
    pub fn null(dim: usize) -> Self {
        Matrix {
            dim,
            terms: (0..dim * dim).map(|_| None).collect(),
        }
    }

    /// The multiplicative identity: `1` on the diagonal, null elsewhere.
    /// This is `M(N)^0`, the zeroth term of the power series summed in
    /// `crate::engine`.
    pub fn identity(dim: usize, k: usize) -> Self {
        let mut m = Matrix::null(dim);
        for i in 0..dim {
            let mut one = TruncPoly::zero(k);
            one.set_monomial(0, 1.0);
            m.set(i, i, Some(one));
        }
        m
    }

    /// `dest += src`, entrywise. A null-poly entry on either side behaves
    /// like the corresponding `TruncPoly::add_into` semantics.
    pub fn add_into(dest: &mut Matrix, src: &Matrix) {
        debug_assert_eq!(dest.dim, src.dim);
        for i in 0..dest.terms.len() {
            if let Some(s) = src.terms[i].as_ref() {
                match dest.terms[i].as_mut() {
                    Some(d) => TruncPoly::add_into(d, Some(s)),
                    None => dest.terms[i] = Some(s.clone()),
                }
            }
        }
    }

    /// `true` if every entry is the null-poly.
    pub fn is_null(&self) -> bool {
        self.terms.iter().all(|t| t.is_none())
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    fn index(&self, row: usize, col: usize) -> usize {
        row * self.dim + col
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&TruncPoly> {
        self.terms[self.index(row, col)].as_ref()
    }

    fn set(&mut self, row: usize, col: usize, value: Option<TruncPoly>) {
        let idx = self.index(row, col);
        self.terms[idx] = value;
    }

    /// Builds the transfer matrix `M(N)` of dimension `2G+2`, per
    /// spec.md's §4.4 row-by-row description (rows are 0-indexed).
    pub fn transfer(params: &Params, n: usize) -> Result<Self, EngineError> {
        let dim = 2 * params.g + 2;
        let mut m = Matrix::null(dim);

        // Row 0: constant polynomial 1 at column 1.
        let mut one = TruncPoly::zero(params.k);
        one.set_monomial(0, 1.0);
        m.set(0, 1, Some(one));

        // Row 1.
        m.set(1, 1, Some(factory::a_deg(params, params.g, n, false)?));
        m.set(1, 2, Some(factory::a_deg(params, params.high, n, true)?));
        for j in 1..params.g {
            m.set(1, params.g + 1 + j, Some(factory::u_deg(params, j, n)?));
        }
        m.set(1, dim - 1, Some(factory::t_ddown(params, n)?));

        // Row 2.
        m.set(2, 1, Some(factory::b_deg(params, params.high, n, false)?));
        m.set(2, 2, Some(factory::b_deg(params, params.high, n, true)?));
        for j in 1..params.g {
            m.set(2, 2 + j, Some(factory::v_deg(params, j, n)?));
        }
        for j in 1..params.g {
            m.set(2, params.g + 1 + j, Some(factory::w_deg(params, j, n)?));
        }
        m.set(2, dim - 1, Some(factory::t_down(params, n)?));

        // Rows 3..=G+1 (j = 1..G-1, row r = j+2).
        for j in 1..params.g {
            let r = j + 2;
            m.set(r, 1, factory::c_deg(params, params.g - j, n, false)?);
            m.set(r, 2, factory::c_deg(params, params.g - j, n, true)?);
            for i in 1..(params.g - j) {
                m.set(r, params.g + j + i + 1, factory::y(params, j, i, n)?);
            }
            m.set(r, dim - 1, factory::t_sim(params, params.g - j - 1, n)?);
        }

        // Rows G+2..=2G (j = 1..G-1, row r = j+G+1).
        for j in 1..params.g {
            let r = j + params.g + 1;
            m.set(r, 1, Some(factory::d_deg(params, params.g - j, n, false)?));
            m.set(r, 2, Some(factory::d_deg(params, params.g - j, n, true)?));
            m.set(r, dim - 1, Some(factory::t_up(params, params.g - j - 1, n)?));
        }

        // Row dim-1 is entirely null (absorbing state): nothing to set.

        Ok(m)
    }

    /// `dest = a * b`. `scratch` is the single reusable `TruncPoly`
    /// destination for every pairwise product, per spec.md §4.5's
    /// discipline; `dest` is fully overwritten.
    pub fn mul_into(dest: &mut Matrix, a: &Matrix, b: &Matrix, scratch: &mut TruncPoly) {
        debug_assert_eq!(a.dim, b.dim);
        debug_assert_eq!(a.dim, dest.dim);
        let dim = dest.dim;
        for i in 0..dim {
            for j in 0..dim {
                let mut acc = TruncPoly::zero(scratch.max_degree());
                let mut any_term = false;
                for m in 0..dim {
                    let a_im = a.get(i, m);
                    let b_mj = b.get(m, j);
                    if a_im.is_none() || b_mj.is_none() {
                        continue;
                    }
                    TruncPoly::mul(scratch, a_im, b_mj);
                    TruncPoly::add_into(&mut acc, Some(scratch));
                    any_term = true;
                }
                // Keep the null-poly (None) when no term of the sum
                // existed at all, so later multiplications against this
                // cell can keep short-circuiting (spec.md §4.5).
                dest.set(i, j, if any_term { Some(acc) } else { None });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(g: usize, k: usize) -> Params {
        Params {
            g,
            k,
            p: 0.01,
            u: 0.05,
            high: g.max(k),
        }
    }

    #[test]
    fn null_matrix_is_all_none() {
        let m = Matrix::null(4);
        for i in 0..4 {
            for j in 0..4 {
                assert!(m.get(i, j).is_none());
            }
        }
    }

    #[test]
    fn transfer_row0_is_constant_one_at_col1() {
        let p = params(3, 10);
        let m = Matrix::transfer(&p, 2).unwrap();
        let e = m.get(0, 1).unwrap();
        assert_eq!(e.coeff(0), 1.0);
        assert_eq!(e.hint(), Some((0, 1.0)));
        assert!(m.get(0, 0).is_none());
        assert!(m.get(0, 2).is_none());
    }

    #[test]
    fn transfer_last_row_is_entirely_null() {
        let p = params(3, 10);
        let m = Matrix::transfer(&p, 2).unwrap();
        let dim = m.dim();
        for j in 0..dim {
            assert!(m.get(dim - 1, j).is_none());
        }
    }

    #[test]
    fn transfer_at_n1_has_null_c_y_tsim_entries() {
        let p = params(4, 20);
        let m = Matrix::transfer(&p, 1).unwrap();
        // Rows 3..=G+1 hold C/y/T~ entries at columns 1, 2, and the last
        // column; all must be null when N = 1.
        for j in 1..p.g {
            let r = j + 2;
            assert!(m.get(r, 1).is_none());
            assert!(m.get(r, 2).is_none());
            assert!(m.get(r, m.dim() - 1).is_none());
        }
    }

    #[test]
    fn mul_into_by_identity_is_unchanged() {
        let p = params(2, 5);
        let m = Matrix::transfer(&p, 2).unwrap();
        let id = Matrix::identity(m.dim(), p.k);
        let mut dest = Matrix::null(m.dim());
        let mut scratch = TruncPoly::zero(p.k);
        Matrix::mul_into(&mut dest, &m, &id, &mut scratch);
        for i in 0..m.dim() {
            for j in 0..m.dim() {
                match (m.get(i, j), dest.get(i, j)) {
                    (None, None) => {}
                    (Some(a), Some(b)) => assert_eq!(a.coeffs(), b.coeffs()),
                    other => panic!("mismatch at ({i},{j}): {other:?}"),
                }
            }
        }
    }

    #[test]
    fn identity_is_one_on_diagonal_and_null_off_diagonal() {
        let id = Matrix::identity(3, 4);
        for i in 0..3 {
            for j in 0..3 {
                if i == j {
                    assert_eq!(id.get(i, j).unwrap().coeff(0), 1.0);
                } else {
                    assert!(id.get(i, j).is_none());
                }
            }
        }
    }

    #[test]
    fn add_into_accumulates_entries_and_fills_previously_null_cells() {
        let mut dest = Matrix::null(2);
        let mut one = TruncPoly::zero(3);
        one.set_coeff(0, 1.0);
        let mut src = Matrix::null(2);
        src.terms[0] = Some(one.clone());
        Matrix::add_into(&mut dest, &src);
        assert_eq!(dest.get(0, 0).unwrap().coeff(0), 1.0);
        Matrix::add_into(&mut dest, &src);
        assert_eq!(dest.get(0, 0).unwrap().coeff(0), 2.0);
    }

    #[test]
    fn is_null_detects_all_none() {
        assert!(Matrix::null(3).is_null());
        assert!(!Matrix::identity(3, 2).is_null());
    }
}
