//! # Recovery Helpers
//!
//! Intercept an unwind at a chosen scope boundary and turn it back into an
//! ordinary [`Error`].
//!
//! A drop guard cannot stop a panic in Rust, so the boundary is the closure
//! passed to each helper: it runs under `catch_unwind` and every helper
//! below suppresses whatever unwind escapes it.
//!
//! ## Frame State Machine
//!
//! ```text
//! Running ──► Completed            (helper returns the body's value)
//!    │
//!    └──────► Unwinding ──► Suppressed   (helper returns / records the error)
//! ```
//!
//! Re-raising a recovered error is left to the caller
//! (`std::panic::panic_any(err)`).

use std::panic::{self, AssertUnwindSafe};

use tracing::error;

use crate::error::Error;

/// Run `f`, returning its value or the error it unwound with.
///
/// This is the synchronous building block behind every other helper.
pub fn call<T, F>(f: F) -> Result<T, Error>
where
    F: FnOnce() -> T,
{
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(Error::from_panic)
}

/// Run `f` and record an unwind into `slot`.
///
/// - No unwind: returns `Some(value)`, `slot` untouched.
/// - Unwind with `slot = None`: the error is logged and dropped.
/// - Unwind with a slot: the error is joined with whatever the slot
///   already holds.
///
/// Returns `None` whenever the body unwound.
pub fn catch<T, F>(slot: Option<&mut Option<Error>>, f: F) -> Option<T>
where
    F: FnOnce() -> T,
{
    match call(f) {
        Ok(value) => Some(value),
        Err(err) => {
            match slot {
                Some(slot) => {
                    let current = slot.take();
                    *slot = Some(Error::join_opt(current, err));
                }
                None => error!("panic: {err}"),
            }
            None
        }
    }
}

/// Run `f` and pass an unwind to `handler`.
///
/// A panic raised by `handler` itself is not intercepted.
pub fn handle<T, F, H>(f: F, handler: H) -> Option<T>
where
    F: FnOnce() -> T,
    H: FnOnce(Error),
{
    match call(f) {
        Ok(value) => Some(value),
        Err(err) => {
            handler(err);
            None
        }
    }
}

/// Run `f` and discard any unwind.
pub fn mute<T, F>(f: F) -> Option<T>
where
    F: FnOnce() -> T,
{
    call(f).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagate::{require, val};

    #[test]
    fn call_returns_value_when_body_completes() {
        assert_eq!(call(|| 40 + 2).expect("no unwind"), 42);
    }

    #[test]
    fn call_normalizes_plain_panic() {
        let err = call::<(), _>(|| panic!("plain {}", 7)).expect_err("unwound");
        assert_eq!(err.to_string(), "plain 7");
        assert!(err.location().is_none());
    }

    #[test]
    fn catch_into_empty_slot() {
        let mut slot = None;
        let out: Option<()> = catch(Some(&mut slot), || require(false, "x"));
        assert!(out.is_none());
        let err = slot.expect("error recorded");
        assert!(err.to_string().contains('x'));
        assert!(!err.is_combined());
    }

    #[test]
    fn catch_joins_with_existing_error() {
        let mut slot = Some(Error::msg("earlier"));
        let _ = catch(Some(&mut slot), || val("q".parse::<u32>()));

        let err = slot.expect("error recorded");
        assert_eq!(err.components().len(), 2);
        assert_eq!(err.components()[0].to_string(), "earlier");
    }

    #[test]
    fn catch_leaves_slot_alone_without_unwind() {
        let mut slot = Some(Error::msg("kept"));
        assert_eq!(catch(Some(&mut slot), || "done"), Some("done"));
        assert_eq!(slot.map(|e| e.to_string()).as_deref(), Some("kept"));
        assert_eq!(catch(None, || 5), Some(5));
    }

    #[test]
    fn handle_invokes_handler_only_on_unwind() {
        let mut seen = Vec::new();
        assert_eq!(handle(|| 1, |e| seen.push(e)), Some(1));
        assert!(seen.is_empty());

        let out: Option<u8> = handle(|| panic!("boom"), |e| seen.push(e));
        assert!(out.is_none());
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].to_string(), "boom");
    }

    #[test]
    fn handler_panic_propagates() {
        let outer = call(|| {
            handle::<(), _, _>(|| panic!("inner"), |e| panic!("handler saw {e}"));
        });
        assert_eq!(outer.expect_err("handler unwound").to_string(), "handler saw inner");
    }

    #[test]
    fn mute_suppresses_everything() {
        assert_eq!(mute(|| "fine"), Some("fine"));
        let out: Option<()> = mute(|| panic!("ignored"));
        assert!(out.is_none());
    }
}
