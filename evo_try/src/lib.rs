//! # EVO Try
//!
//! Panic/recover helpers: turn failures into unwinds carrying a structured
//! [`Error`], and turn unwinds back into ordinary `Error` values at a
//! chosen boundary.
//!
//! # Module Structure
//!
//! - [`error`] - The `Error` value, payload normalization, joining
//! - [`propagate`] - `ok`, `check`, `val*`, `safe_val*`, `require`
//! - [`recover`] - `call`, `catch`, `handle`, `mute`
//! - [`concurrent`] - `go`, `parallel`, `parallel!`
//! - [`hook`] - Optional panic hook rendering `Error` payloads
//! - [`prelude`] - Common re-exports
//!
//! # Usage
//!
//! ```rust
//! use evo_try::prelude::*;
//!
//! fn port(raw: &str) -> u16 {
//!     let port = val(raw.parse::<u16>());
//!     require(port >= 1024, "privileged port");
//!     port
//! }
//!
//! assert_eq!(call(|| port("8080")).ok(), Some(8080));
//! assert!(call(|| port("80")).is_err());
//! ```
//!
//! # Unwinding
//!
//! Recovery relies on `panic = "unwind"`. Under `panic = "abort"` every
//! raised error terminates the process.

#![deny(missing_docs)]

pub mod concurrent;
pub mod error;
pub mod hook;
pub mod prelude;
pub mod propagate;
pub mod recover;

pub use crate::concurrent::{go, parallel};
pub use crate::error::{BoxError, Error};
pub use crate::hook::install_panic_hook;
pub use crate::propagate::{check, ok, require, safe_val, safe_val2, safe_val3, val, val2, val3};
pub use crate::recover::{call, catch, handle, mute};
