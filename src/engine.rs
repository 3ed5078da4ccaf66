//! The stateful engine: configuration, the per-`N` memo table, and the
//! truncated power-series summation that turns a transfer matrix into a
//! concrete failure probability.
//!
//! This replaces the flexible-array-plus-global-state layout of the
//! reference (a single process-wide `matrix_t*` and memo array) with an
//! explicit handle: nothing here is a global, so more than one `Engine`
//! can be configured independently in the same process (spec.md §9).
//! `crate::lib` layers the legacy free-function API back on top of a
//! single lazily-created default handle, for callers that want the old
//! shape.

use crate::error::EngineError;
use crate::matrix::Matrix;
use crate::trunc_poly::TruncPoly;

/// The exclusive upper bound on duplicate counts: valid `N` is `1..MAX_N`.
///
/// Mirrors the reference's `ARRAY[MAXN]` (`compute_mem_prob.c:89`), which
/// only has valid indices `0..MAXN-1` -- its `compute_mem_prob` therefore
/// rejects `N > MAXN-1` (line 873), i.e. `N == MAXN` is itself out of
/// range, not just values past it.
pub const MAX_N: usize = 1024;

/// The validated configuration of one engine instance: minimum seed
/// length `G`, read-length capacity `K`, per-base error rate `P`, and
/// per-base divergence rate `U`. `high` is `max(G, K)`, the span `T_down`
/// needs (spec.md §4.3).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Params {
    pub g: usize,
    pub k: usize,
    pub p: f64,
    pub u: f64,
    pub high: usize,
}

/// A configured instance of the MEM-seed failure-probability engine.
///
/// `compute` never panics and never propagates a `Result` -- any failure
/// is reported as `NaN`, with the underlying [`EngineError`] retained for
/// [`Engine::last_error_code`] (spec.md §6). This mirrors the reference's
/// "the query function itself cannot fail visibly" contract while keeping
/// the richer error internally for diagnostics.
pub struct Engine {
    params: Option<Params>,
    memo: Vec<Option<TruncPoly>>,
    last_error: Option<EngineError>,
}

impl Default for Engine {
    fn default() -> Self {
        Engine {
            params: None,
            memo: (0..MAX_N).map(|_| None).collect(),
            last_error: None,
        }
    }
}

impl Engine {
    pub fn new() -> Self {
        Engine::default()
    }

    /// Validates and installs a new configuration, discarding any memo
    /// entries from a previous configuration (spec.md §5: `configure`
    /// invalidates prior memoized results).
    pub fn configure(&mut self, g: usize, k: usize, p: f64, u: f64) -> Result<(), EngineError> {
        let validated = Self::validate(g, k, p, u);
        match validated {
            Ok(params) => {
                self.params = Some(params);
                for slot in self.memo.iter_mut() {
                    *slot = None;
                }
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                log::warn!("configure rejected: {e}");
                self.last_error = Some(e);
                Err(e)
            }
        }
    }

    fn validate(g: usize, k: usize, p: f64, u: f64) -> Result<Params, EngineError> {
        if g == 0 {
            return Err(EngineError::InvalidDimension { name: "G", value: g });
        }
        if k == 0 {
            return Err(EngineError::InvalidDimension { name: "K", value: k });
        }
        if !(p > 0.0 && p < 1.0) {
            return Err(EngineError::InvalidRate { name: "P", value: p });
        }
        if !(u > 0.0 && u < 1.0) {
            return Err(EngineError::InvalidRate { name: "U", value: u });
        }
        // The transfer matrix's T-down row spans degree HIGH = max(G, K);
        // every TruncPoly has capacity K, so G must not exceed K or that
        // row's assembly would need to write past the end of a degree-K
        // polynomial. The reference's flexible-array layout let G > K
        // silently truncate; the engine handle here rejects it instead.
        if g > k {
            return Err(EngineError::InvalidDimension { name: "G", value: g });
        }
        Ok(Params {
            g,
            k,
            p,
            u,
            high: g.max(k),
        })
    }

    /// Clears the memo table and the last-error state without discarding
    /// the active configuration.
    pub fn clean(&mut self) {
        for slot in self.memo.iter_mut() {
            *slot = None;
        }
        self.last_error = None;
    }

    /// The stable error code of the most recent failure, or `0` if the
    /// engine has not yet failed since the last `configure`/`clean`.
    pub fn last_error_code(&self) -> u32 {
        self.last_error.map(EngineError::code).unwrap_or(0)
    }

    /// The probability that a read of length `k` fails to seed against
    /// the correct locus among `n` near-identical duplicates. `NaN` on
    /// any failure (unconfigured engine, out-of-range `n`/`k`, or an
    /// internal invariant violation); `last_error_code` distinguishes the
    /// cause.
    pub fn compute(&mut self, n: usize, k: usize) -> f64 {
        match self.try_compute(n, k) {
            Ok(value) => {
                self.last_error = None;
                value
            }
            Err(e) => {
                log::warn!("compute(n={n}, k={k}) failed: {e}");
                self.last_error = Some(e);
                f64::NAN
            }
        }
    }

    fn try_compute(&mut self, n: usize, k: usize) -> Result<f64, EngineError> {
        let params = self.params.ok_or(EngineError::NotConfigured)?;
        if n == 0 || n >= MAX_N {
            return Err(EngineError::DomainRange {
                what: "N",
                value: n,
                bound: MAX_N - 1,
            });
        }
        if k > params.k {
            return Err(EngineError::DomainRange {
                what: "k",
                value: k,
                bound: params.k,
            });
        }

        let series = self.series_for(&params, n)?;
        Ok(series.coeff(k))
    }

    /// The memoized generating-function entry `[0, dim-1]` of
    /// `Σ_{p≥2} M(N)^p`, for the configured `params`.
    ///
    /// Row 0 holds the single edge leaving the start state (`M[0,1]`, a
    /// constant); column `dim-1` is the absorbing "read ended here"
    /// state every T-family polynomial feeds into. Row `dim-1` itself is
    /// entirely null (spec.md §4.4), so the flat index the reference C
    /// extracts via `term[2*G+1]` -- row-major with `dim = 2G+2`, that
    /// index is row 0, column `2G+1 = dim-1` -- names this same entry,
    /// not `[2G+1, 1]` as spec.md's prose states literally.
    fn series_for(&mut self, params: &Params, n: usize) -> Result<&TruncPoly, EngineError> {
        if self.memo[n].is_none() {
            let entry = Self::build_series_entry(params, n)?;
            self.memo[n] = Some(entry);
        }
        Ok(self.memo[n].as_ref().expect("just inserted"))
    }

    fn build_series_entry(params: &Params, n: usize) -> Result<TruncPoly, EngineError> {
        let dim = 2 * params.g + 2;
        let m = Matrix::transfer(params, n)?;
        let target_row = 0;
        let target_col = dim - 1;

        let mut w = TruncPoly::zero(params.k);
        let mut cur = m.clone();
        let mut next = Matrix::null(dim);
        let mut scratch = TruncPoly::zero(params.k);

        // `cur` starts as M^1; the loop body turns it into M^2, M^3, ...
        // and accumulates from p=2 onward, matching the reference's
        // `matrix_mult(powM1, M, M)` first step (never M^0 or M^1).
        // Every transition other than the opening row0->col1 edge and
        // the single closing edge into the terminal column consumes at
        // least one degree of read length, so by p = K+2 no entry of
        // M^p can still carry a nonzero coefficient at degree <= K: an
        // adaptive, hard bound rather than the reference's fixed 22
        // (spec.md §4.5/§9 REDESIGN note).
        for _ in 2..=(params.k + 2) {
            Matrix::mul_into(&mut next, &cur, &m, &mut scratch);
            if next.is_null() {
                break;
            }
            if let Some(entry) = next.get(target_row, target_col) {
                TruncPoly::add_into(&mut w, Some(entry));
            }
            std::mem::swap(&mut cur, &mut next);
        }

        Ok(w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn configure_rejects_zero_g() {
        let mut e = Engine::new();
        assert!(e.configure(0, 10, 0.01, 0.05).is_err());
        assert_eq!(e.last_error_code(), 3);
    }

    #[test]
    fn configure_rejects_rate_out_of_range() {
        let mut e = Engine::new();
        assert!(e.configure(5, 10, 1.0, 0.05).is_err());
        assert_eq!(e.last_error_code(), 2);
    }

    #[test]
    fn configure_rejects_g_above_k() {
        let mut e = Engine::new();
        assert!(e.configure(20, 10, 0.01, 0.05).is_err());
    }

    #[test]
    fn compute_without_configure_is_nan() {
        let mut e = Engine::new();
        assert!(e.compute(1, 10).is_nan());
        assert_eq!(e.last_error_code(), 1);
    }

    #[test]
    fn compute_rejects_n_above_max() {
        let mut e = Engine::new();
        e.configure(5, 20, 0.01, 0.05).unwrap();
        assert!(e.compute(MAX_N + 1, 10).is_nan());
        assert_eq!(e.last_error_code(), 4);
    }

    /// `N == MAX_N` is itself out of range: the reference's `ARRAY[MAXN]`
    /// only has valid indices `0..MAXN-1` (`compute_mem_prob.c:873`
    /// rejects with `N > MAXN-1`), so `MAX_N` is an exclusive bound, not
    /// an inclusive one.
    #[test]
    fn compute_rejects_n_equal_to_max() {
        let mut e = Engine::new();
        e.configure(5, 20, 0.01, 0.05).unwrap();
        assert!(e.compute(MAX_N, 10).is_nan());
        assert_eq!(e.last_error_code(), 4);
    }

    #[test]
    fn compute_rejects_k_above_configured_k() {
        let mut e = Engine::new();
        e.configure(5, 20, 0.01, 0.05).unwrap();
        assert!(e.compute(2, 21).is_nan());
    }

    #[test]
    fn compute_below_seed_length_is_certain_failure() {
        let mut e = Engine::new();
        e.configure(5, 20, 0.01, 0.05).unwrap();
        assert_relative_eq!(e.compute(2, 3), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn compute_result_is_a_probability() {
        let mut e = Engine::new();
        e.configure(4, 30, 0.01, 0.05).unwrap();
        let v = e.compute(3, 25);
        assert!((0.0..=1.0).contains(&v), "value {v} outside [0,1]");
    }

    #[test]
    fn compute_is_memoized_and_idempotent() {
        let mut e = Engine::new();
        e.configure(4, 30, 0.01, 0.05).unwrap();
        let a = e.compute(3, 25);
        let b = e.compute(3, 25);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn clean_clears_error_but_keeps_configuration() {
        let mut e = Engine::new();
        e.configure(4, 30, 0.01, 0.05).unwrap();
        let _ = e.compute(MAX_N + 1, 10);
        assert_ne!(e.last_error_code(), 0);
        e.clean();
        assert_eq!(e.last_error_code(), 0);
        assert!(!e.compute(3, 25).is_nan());
    }

    #[test]
    fn reconfigure_invalidates_previous_memo() {
        let mut e = Engine::new();
        e.configure(4, 30, 0.01, 0.05).unwrap();
        let first = e.compute(3, 25);
        e.configure(4, 30, 0.02, 0.05).unwrap();
        let second = e.compute(3, 25);
        assert_ne!(first.to_bits(), second.to_bits());
    }
}
