//! # Error Value
//!
//! The single error type carried through every `evo_try` unwind.
//!
//! An [`Error`] is immutable and cheap to clone (`Arc`-backed). Internally it
//! is one of four shapes:
//!
//! | Shape     | Produced by                                  | `source()`        |
//! |-----------|----------------------------------------------|-------------------|
//! | Message   | string or opaque panic payload               | `None`            |
//! | Wrapped   | caller-originated `std::error::Error`        | wrapped's source  |
//! | Located   | propagation helpers (call-site annotation)   | inner error       |
//! | Joined    | recovery into an occupied slot, `parallel`   | `None`            |
//!
//! Annotation never hides the original error: [`Error::downcast_ref`] looks
//! through locations, wrapped sources and every combined component.

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use static_assertions::assert_impl_all;

/// Boxed caller-originated error accepted by every helper.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Message used for panic payloads that are neither strings nor errors.
///
/// Matches the placeholder printed by the standard panic hook.
pub const OPAQUE_PAYLOAD: &str = "Box<dyn Any>";

// ─── Representation ─────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
enum Repr {
    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Wrapped(BoxError),

    #[error("{inner}\n\t{}", call_site(.location))]
    Located {
        #[source]
        inner: Error,
        location: &'static Location<'static>,
    },

    #[error("{}", joined_message(.0))]
    Joined(Vec<Error>),
}

fn call_site(location: &Location<'_>) -> String {
    format!("{}:{}", location.file(), location.line())
}

fn joined_message(parts: &[Error]) -> String {
    parts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

// ─── Error ──────────────────────────────────────────────────────────

/// Failure description raised by propagation helpers and returned by
/// recovery helpers.
#[derive(Debug, Clone, thiserror::Error)]
#[error(transparent)]
pub struct Error(Arc<Repr>);

assert_impl_all!(Error: Send, Sync, Clone, StdError);

impl Error {
    fn from_repr(repr: Repr) -> Self {
        Self(Arc::new(repr))
    }

    /// Wrap a caller-originated error.
    ///
    /// Accepts `&str`, `String` and any `std::error::Error + Send + Sync`.
    /// An `Error` (boxed or not) comes back unchanged instead of being
    /// wrapped twice.
    pub fn new<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        let boxed: BoxError = err.into();
        match boxed.downcast::<Error>() {
            Ok(err) => *err,
            Err(other) => Self::from_repr(Repr::Wrapped(other)),
        }
    }

    /// Build an error from a plain message.
    pub fn msg(message: impl fmt::Display) -> Self {
        Self::from_repr(Repr::Message(message.to_string()))
    }

    /// Normalize an unwind payload into an error.
    ///
    /// - `Error` → itself
    /// - `&'static str` / `String` → message
    /// - `Box<dyn Error + Send + Sync>` → wrapped
    /// - anything else → [`OPAQUE_PAYLOAD`]
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let payload = match payload.downcast::<Error>() {
            Ok(err) => return *err,
            Err(payload) => payload,
        };
        let payload = match payload.downcast::<&'static str>() {
            Ok(message) => return Self::msg(*message),
            Err(payload) => payload,
        };
        let payload = match payload.downcast::<String>() {
            Ok(message) => return Self::from_repr(Repr::Message(*message)),
            Err(payload) => payload,
        };
        match payload.downcast::<BoxError>() {
            Ok(err) => Self::new(*err),
            Err(_) => Self::msg(OPAQUE_PAYLOAD),
        }
    }

    /// Annotate with the call site that raised this error.
    pub(crate) fn located(self, location: &'static Location<'static>) -> Self {
        Self::from_repr(Repr::Located {
            inner: self,
            location,
        })
    }

    /// Combine two errors into one.
    ///
    /// `self` acts as the accumulator: its components are extended, while
    /// `other` is kept as a single component even when it is combined
    /// itself. Joining K failures one at a time yields exactly K components.
    pub fn join(self, other: Error) -> Self {
        let mut parts = Vec::with_capacity(self.components().len() + 1);
        parts.extend_from_slice(self.components());
        parts.push(other);
        Self::from_repr(Repr::Joined(parts))
    }

    /// Join `next` into an optional existing error.
    pub fn join_opt(current: Option<Error>, next: Error) -> Self {
        match current {
            Some(current) => current.join(next),
            None => next,
        }
    }

    /// Parts of a combined error, or a one-element slice holding `self`.
    pub fn components(&self) -> &[Error] {
        match self.0.as_ref() {
            Repr::Joined(parts) => parts,
            _ => std::slice::from_ref(self),
        }
    }

    /// True when this error aggregates several failures.
    pub fn is_combined(&self) -> bool {
        matches!(self.0.as_ref(), Repr::Joined(_))
    }

    /// Outermost call-site annotation, if any.
    pub fn location(&self) -> Option<&'static Location<'static>> {
        match self.0.as_ref() {
            Repr::Located { location, .. } => Some(*location),
            _ => None,
        }
    }

    /// Find an error of type `T` anywhere in this error.
    ///
    /// Searches through call-site annotations, the `source()` chain of
    /// wrapped errors and all components of a combined error.
    pub fn downcast_ref<T>(&self) -> Option<&T>
    where
        T: StdError + 'static,
    {
        match self.0.as_ref() {
            Repr::Message(_) => None,
            Repr::Located { inner, .. } => inner.downcast_ref::<T>(),
            Repr::Joined(parts) => parts.iter().find_map(|part| part.downcast_ref::<T>()),
            Repr::Wrapped(err) => {
                let mut current: Option<&(dyn StdError + 'static)> = Some(&**err);
                while let Some(err) = current {
                    if let Some(found) = err.downcast_ref::<T>() {
                        return Some(found);
                    }
                    if let Some(nested) = err.downcast_ref::<Error>() {
                        return nested.downcast_ref::<T>();
                    }
                    current = err.source();
                }
                None
            }
        }
    }

    /// True when [`Error::downcast_ref`] finds a `T`.
    pub fn is<T>(&self) -> bool
    where
        T: StdError + 'static,
    {
        self.downcast_ref::<T>().is_some()
    }

    /// Iterate over this error and its `source()` chain.
    pub fn chain(&self) -> Chain<'_> {
        Chain {
            next: Some(self as &(dyn StdError + 'static)),
        }
    }
}

// ─── Chain ──────────────────────────────────────────────────────────

/// Iterator returned by [`Error::chain`].
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    next: Option<&'a (dyn StdError + 'static)>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn StdError + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.source();
        Some(current)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
