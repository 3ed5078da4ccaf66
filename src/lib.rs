//! Symbolic transfer-matrix engine for MEM-seed failure probabilities.
//!
//! Computes the probability that a sequencing read of length `k` fails to
//! carry any Maximal Exact Match (MEM) seed of minimum length `G` against
//! the correct genomic locus, when that locus is one of `N` near-identical
//! duplicate sequences diverged at per-base rate `U` and the read carries
//! per-base sequencing errors at rate `P`.
//!
//! The crate has two layers:
//!
//! - [`Engine`], an explicit handle owning one configuration's scratch
//!   buffer and memo table (the "engine handle" redesign noted in the
//!   reference's design notes). Safe to use from more than one thread when
//!   each thread owns its own handle.
//! - A thin legacy free-function API (`configure`/`compute`/`clean`/
//!   `last_error_code`) mirroring the reference implementation's
//!   process-wide globals, layered over a single lazily-created default
//!   `Engine` behind a mutex. New callers should prefer [`Engine`] directly.
//!
//! ```
//! let mut engine = mem_prob::Engine::new();
//! engine.configure(17, 50, 0.01, 0.05).unwrap();
//! let p = engine.compute(1, 16);
//! assert!((p - 1.0).abs() < 1e-9);
//! ```

mod engine;
mod error;
mod factory;
mod kernels;
mod matrix;
mod trunc_poly;

pub use engine::{Engine, Params, MAX_N};
pub use error::EngineError;

use once_cell::sync::Lazy;
use std::sync::Mutex;

static DEFAULT_ENGINE: Lazy<Mutex<Engine>> = Lazy::new(|| Mutex::new(Engine::new()));

/// Legacy global-style API, mirroring the reference's process-wide state.
///
/// Wraps a single lazily-created default [`Engine`] behind a mutex, per the
/// reference's "engine handle" redesign note: the global API is a thin
/// wrapper over one handle rather than a set of free-standing statics.
/// Callers must not rely on any particular interleaving across threads --
/// the mutex serializes calls but does not make concurrent `configure`s
/// from different threads meaningful (see the crate's concurrency notes).
pub mod legacy {
    use super::DEFAULT_ENGINE;

    /// (Re)configures the default engine. Clears all memoised results.
    pub fn configure(g: usize, k: usize, p: f64, u: f64) -> Result<(), super::EngineError> {
        DEFAULT_ENGINE
            .lock()
            .expect("default engine mutex poisoned")
            .configure(g, k, p, u)
    }

    /// Queries the default engine. Returns `NaN` on any failure; use
    /// [`last_error_code`] to distinguish the cause.
    pub fn compute(n: usize, k: usize) -> f64 {
        DEFAULT_ENGINE
            .lock()
            .expect("default engine mutex poisoned")
            .compute(n, k)
    }

    /// Releases the default engine's cached state without discarding its
    /// active configuration.
    pub fn clean() {
        DEFAULT_ENGINE
            .lock()
            .expect("default engine mutex poisoned")
            .clean();
    }

    /// The stable error code of the default engine's most recent failure,
    /// or `0` if it has not failed since the last `configure`/`clean`.
    pub fn last_error_code() -> u32 {
        DEFAULT_ENGINE
            .lock()
            .expect("default engine mutex poisoned")
            .last_error_code()
    }
}
