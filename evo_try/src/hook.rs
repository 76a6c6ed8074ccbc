//! Process-wide panic hook for [`Error`] payloads.
//!
//! The standard hook prints `Box<dyn Any>` for any non-string payload, which
//! hides the annotation trail of an unwind nobody recovered. The hook
//! installed here renders [`Error`] payloads through `tracing` and leaves
//! every other payload to the previously installed hook.
//!
//! Like the standard hook it also fires for panics that a recovery helper
//! later intercepts.

use std::any::Any;
use std::panic;
use std::thread;

use tracing::error;

use crate::error::Error;

/// Chain a hook rendering [`Error`] payloads onto the current panic hook.
pub fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let Some(trail) = describe_payload(info.payload()) else {
            previous(info);
            return;
        };
        let current = thread::current();
        let name = current.name().unwrap_or("<unnamed>");
        match info.location() {
            Some(location) => error!(thread = name, "unwound at {location}: {trail}"),
            None => error!(thread = name, "unwound: {trail}"),
        }
    }));
}

/// Render a panic payload if it is an [`Error`].
pub fn describe_payload(payload: &(dyn Any + Send)) -> Option<String> {
    payload.downcast_ref::<Error>().map(ToString::to_string)
}
