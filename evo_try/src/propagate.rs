//! # Propagation Helpers
//!
//! Turn `Result`-shaped or boolean failures into an unwind carrying an
//! annotated [`Error`].
//!
//! Every helper is `#[track_caller]`: the annotation records the line of
//! the code that called the helper, never a line inside this module.
//!
//! ```rust
//! use evo_try::{call, val};
//!
//! let err = call(|| {
//!     let port: u16 = val("80a".parse::<u16>());
//!     port
//! })
//! .unwrap_err();
//! assert!(err.to_string().contains("invalid digit"));
//! ```

use std::panic::{self, Location};

use crate::error::{BoxError, Error};

/// Unwind with `err` annotated by the caller's location.
#[cold]
#[inline(never)]
#[track_caller]
fn raise(err: Error) -> ! {
    panic::panic_any(err.located(Location::caller()))
}

// ─── Unary Checks ───────────────────────────────────────────────────

/// Unwind if `res` is an error.
#[track_caller]
pub fn ok<E>(res: Result<(), E>)
where
    E: Into<BoxError>,
{
    if let Err(err) = res {
        raise(Error::new(err));
    }
}

/// Unwind if `res` is an error. Same as [`ok`].
#[track_caller]
pub fn check<E>(res: Result<(), E>)
where
    E: Into<BoxError>,
{
    if let Err(err) = res {
        raise(Error::new(err));
    }
}

/// Unwind with `err` unless `condition` holds.
///
/// `err` may be a message (`&str`, `String`) or any error value.
#[track_caller]
pub fn require<E>(condition: bool, err: E)
where
    E: Into<BoxError>,
{
    if !condition {
        raise(Error::new(err));
    }
}

// ─── Checked Passthrough ────────────────────────────────────────────

/// Return the success value or unwind with the error.
#[track_caller]
pub fn val<T, E>(res: Result<T, E>) -> T
where
    E: Into<BoxError>,
{
    match res {
        Ok(value) => value,
        Err(err) => raise(Error::new(err)),
    }
}

/// Two-value form of [`val`].
#[track_caller]
pub fn val2<A, B, E>(res: Result<(A, B), E>) -> (A, B)
where
    E: Into<BoxError>,
{
    val(res)
}

/// Three-value form of [`val`].
#[track_caller]
pub fn val3<A, B, C, E>(res: Result<(A, B, C), E>) -> (A, B, C)
where
    E: Into<BoxError>,
{
    val(res)
}

// ─── Unchecked Passthrough ──────────────────────────────────────────

/// Return the success value and silently drop any error.
///
/// Never unwinds. An `Err` carries no value, so the result is
/// `T::default()` in that case.
pub fn safe_val<T, E>(res: Result<T, E>) -> T
where
    T: Default,
{
    res.unwrap_or_default()
}

/// Two-value form of [`safe_val`].
pub fn safe_val2<A, B, E>(res: Result<(A, B), E>) -> (A, B)
where
    A: Default,
    B: Default,
{
    res.unwrap_or_default()
}

/// Three-value form of [`safe_val`].
pub fn safe_val3<A, B, C, E>(res: Result<(A, B, C), E>) -> (A, B, C)
where
    A: Default,
    B: Default,
    C: Default,
{
    res.unwrap_or_default()
}

// ─── Tests ──────────────────────────────────────────────────────────
