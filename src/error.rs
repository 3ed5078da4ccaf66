//! Error type for the MEM-probability engine.
//!
//! Follows the hand-rolled error-enum idiom used throughout this crate's
//! ancestry (manual `Display`/`Error` impls, no external error-derive
//! crate): a small `#[derive(Debug, Clone, PartialEq)]` enum whose variants
//! map to the three error kinds of the engine's failure semantics --
//! domain errors, internal invariant violations, and resource exhaustion.

use std::fmt;

/// Everything that can go wrong when configuring or querying the engine.
///
/// Every variant carries a stable, nonzero error code (see [`EngineError::code`])
/// that callers can read back through `last_error_code` without having to
/// match on the variant itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineError {
    /// `compute` was called before any successful `configure`.
    NotConfigured,
    /// A rate parameter (P or U) was outside the open interval (0, 1).
    InvalidRate { name: &'static str, value: f64 },
    /// A dimension parameter (G or K) was not a positive integer.
    InvalidDimension { name: &'static str, value: usize },
    /// A query argument (N or k) fell outside its accepted range.
    DomainRange {
        what: &'static str,
        value: usize,
        bound: usize,
    },
    /// The polynomial factory was asked to build a term outside the
    /// preconditions its closed form assumes. Never triggered by a correct
    /// matrix assembler; surfacing it is itself the bug report.
    InvariantViolation { detail: &'static str },
    /// Allocating scratch space for a query failed. Kept for interface
    /// completeness (see DESIGN.md); unreachable via safe-Rust `Vec`
    /// allocation, which aborts the process on OOM rather than returning
    /// an error.
    AllocationFailed,
}

impl EngineError {
    /// The stable, nonzero diagnostic token returned by `last_error_code`.
    ///
    /// These values are part of the engine's external contract: once
    /// assigned, a discriminant must not be reused for a different
    /// variant in a later revision.
    pub fn code(self) -> u32 {
        match self {
            EngineError::NotConfigured => 1,
            EngineError::InvalidRate { .. } => 2,
            EngineError::InvalidDimension { .. } => 3,
            EngineError::DomainRange { .. } => 4,
            EngineError::InvariantViolation { .. } => 5,
            EngineError::AllocationFailed => 6,
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::NotConfigured => {
                write!(f, "engine used before a successful configure() call")
            }
            EngineError::InvalidRate { name, value } => {
                write!(f, "parameter {name} must be in (0, 1), got {value}")
            }
            EngineError::InvalidDimension { name, value } => {
                write!(f, "parameter {name} must be a positive integer, got {value}")
            }
            EngineError::DomainRange { what, value, bound } => {
                write!(f, "argument {what}={value} exceeds bound {bound}")
            }
            EngineError::InvariantViolation { detail } => {
                write!(f, "internal error (please report): {detail}")
            }
            EngineError::AllocationFailed => {
                write!(f, "allocation failed while building a query")
            }
        }
    }
}

impl std::error::Error for EngineError {}
