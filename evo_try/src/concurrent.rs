//! # Concurrency Wrappers
//!
//! Run closures on other threads so that a panic inside them is captured
//! instead of tearing down the process.
//!
//! - [`go`] - fire-and-forget, failures are discarded
//! - [`parallel`] / [`parallel!`](crate::parallel!) - run a batch, wait for
//!   all of it, report every failure as one combined [`Error`]
//!
//! ## Join Barrier
//!
//! `parallel` spawns its threads inside `std::thread::scope`; leaving the
//! scope joins every thread, so the caller resumes only once all bodies
//! have finished and no thread outlives the call. Failures are joined into
//! a single mutex-guarded accumulator in the order the threads finish.

use std::thread;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::Error;
use crate::recover::call;

/// Name given to threads started by [`go`].
pub const GO_THREAD_NAME: &str = "evo-try-go";

/// Prefix of thread names started by [`parallel`] (suffixed with the index).
pub const PARALLEL_THREAD_PREFIX: &str = "evo-try-par";

/// Run `f` on a detached thread, discarding any unwind.
///
/// Returns an error only if the OS refuses to start the thread.
pub fn go<F>(f: F) -> Result<(), Error>
where
    F: FnOnce() + Send + 'static,
{
    thread::Builder::new()
        .name(GO_THREAD_NAME.to_string())
        .spawn(move || {
            if let Err(err) = call(f) {
                debug!("discarded panic in detached thread: {err}");
            }
        })
        .map(drop)
        .map_err(Error::new)
}

/// Run every closure on its own thread and wait for all of them.
///
/// Returns `Ok(())` when every closure completed (including the empty
/// batch), otherwise a combined error with one component per failed
/// closure. A thread that cannot be spawned counts as a failure.
pub fn parallel<I, F>(fns: I) -> Result<(), Error>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() + Send,
{
    let failures: Mutex<Option<Error>> = Mutex::new(None);
    let record = |err: Error| {
        let mut slot = failures.lock();
        let current = slot.take();
        *slot = Some(Error::join_opt(current, err));
    };

    thread::scope(|scope| {
        for (index, f) in fns.into_iter().enumerate() {
            let record = &record;
            let spawned = thread::Builder::new()
                .name(format!("{PARALLEL_THREAD_PREFIX}-{index}"))
                .spawn_scoped(scope, move || {
                    if let Err(err) = call(f) {
                        record(err);
                    }
                });
            if let Err(err) = spawned {
                warn!("failed to spawn parallel worker {index}: {err}");
                record(Error::new(err));
            }
        }
    });

    match failures.into_inner() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[doc(hidden)]
pub fn boxed<'a, F>(f: F) -> Box<dyn FnOnce() + Send + 'a>
where
    F: FnOnce() + Send + 'a,
{
    Box::new(f)
}

/// Run heterogeneous closures with [`parallel`].
///
/// ```rust
/// let err = evo_try::parallel!(
///     || panic!("boom1"),
///     || {},
///     || panic!("boom2"),
/// )
/// .unwrap_err();
/// assert_eq!(err.components().len(), 2);
/// ```
#[macro_export]
macro_rules! parallel {
    () => {
        $crate::parallel(::std::iter::empty::<fn()>())
    };
    ($($f:expr),+ $(,)?) => {
        $crate::parallel(::std::vec![$($crate::concurrent::boxed($f)),+])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn empty_batch_is_ok() {
        assert!(parallel(Vec::<fn()>::new()).is_ok());
        assert!(crate::parallel!().is_ok());
    }

    #[test]
    fn closures_may_borrow_from_caller() {
        let hits = AtomicUsize::new(0);
        let bump = || {
            hits.fetch_add(1, Ordering::SeqCst);
        };
        parallel([bump, bump, bump]).expect("no failures");
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn workers_are_named() {
        let (tx, rx) = mpsc::channel();
        parallel([move || {
            let name = thread::current().name().map(str::to_string);
            tx.send(name).expect("receiver alive");
        }])
        .expect("no failures");
        let name = rx.recv().expect("name sent");
        assert_eq!(name.as_deref(), Some("evo-try-par-0"));
    }

    #[test]
    fn go_survives_panic() {
        let (tx, rx) = mpsc::channel();
        go(move || {
            tx.send(thread::current().name().map(str::to_string))
                .expect("receiver alive");
            panic!("detached failure");
        })
        .expect("thread spawned");

        let name = rx.recv_timeout(Duration::from_secs(5)).expect("body ran");
        assert_eq!(name.as_deref(), Some(GO_THREAD_NAME));
    }
}
