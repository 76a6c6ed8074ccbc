//! Prelude module for common re-exports.
//!
//! ```rust
//! use evo_try::prelude::*;
//! ```

// ─── Error ──────────────────────────────────────────────────────────
pub use crate::error::{BoxError, Error};

// ─── Propagation ────────────────────────────────────────────────────
pub use crate::propagate::{check, ok, require, safe_val, safe_val2, safe_val3, val, val2, val3};

// ─── Recovery ───────────────────────────────────────────────────────
pub use crate::recover::{call, catch, handle, mute};

// ─── Concurrency ────────────────────────────────────────────────────
pub use crate::concurrent::{go, parallel};
