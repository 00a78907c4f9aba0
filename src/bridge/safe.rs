//! Guarded execution - Time budget and panic isolation
//!
//! Every backend call runs on its own worker thread. The caller waits at
//! most the request's budget; a worker that overruns is told to stop through
//! its [`CancelToken`] and its late result dropped. Panics inside the worker
//! never reach the caller.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use crate::backend::CancelToken;
use crate::error::BridgeError;

/// Run `job` on a worker thread, giving up after `budget`
///
/// The job receives a token that is cancelled when the caller gives up.
pub(crate) fn run_guarded<T, F>(
    operation: &'static str,
    budget: Duration,
    job: F,
) -> Result<T, BridgeError>
where
    T: Send + 'static,
    F: FnOnce(CancelToken) -> Result<T, BridgeError> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let start = Instant::now();
    let cancel = CancelToken::new();
    let worker_cancel = cancel.clone();

    thread::Builder::new()
        .name(format!("bridge-{}", operation))
        .spawn(move || {
            let result = catch_unwind(AssertUnwindSafe(move || job(worker_cancel)));
            // The caller may have timed out and dropped the receiver
            let _ = tx.send(result);
        })
        .map_err(|e| BridgeError::Internal(format!("Failed to spawn worker: {}", e)))?;

    match rx.recv_timeout(budget) {
        Ok(Ok(result)) => {
            log::debug!("{} completed in {:?}", operation, start.elapsed());
            result
        }
        Ok(Err(_)) => {
            log::warn!("{} panicked in the backend", operation);
            Err(BridgeError::Internal(format!("{} panicked in the backend", operation)))
        }
        Err(RecvTimeoutError::Timeout) => {
            cancel.cancel();
            log::warn!("{} exceeded its budget of {:?}", operation, budget);
            Err(BridgeError::InternalTimeout { operation, budget })
        }
        Err(RecvTimeoutError::Disconnected) => Err(BridgeError::Internal(format!(
            "{} worker exited without a result",
            operation
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_result_is_returned() {
        let value = run_guarded("test", Duration::from_secs(5), |_| Ok(42)).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_error_is_passed_through() {
        let err = run_guarded::<(), _>("test", Duration::from_secs(5), |_| {
            Err(BridgeError::InvalidRequest("nope".into()))
        })
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }

    #[test]
    fn test_overrun_times_out() {
        let err = run_guarded("slow", Duration::from_millis(20), |_| {
            thread::sleep(Duration::from_millis(500));
            Ok(())
        })
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InternalTimeout);
    }

    #[test]
    fn test_panic_is_contained() {
        let err = run_guarded::<(), _>("boom", Duration::from_secs(5), |_| {
            panic!("backend exploded")
        })
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_overrun_cancels_worker() {
        let (done_tx, done_rx) = mpsc::channel();
        let err = run_guarded("spin", Duration::from_millis(20), move |cancel| {
            while !cancel.is_cancelled() {
                thread::sleep(Duration::from_millis(1));
            }
            let _ = done_tx.send(());
            Ok(())
        })
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InternalTimeout);
        assert!(done_rx.recv_timeout(Duration::from_secs(5)).is_ok());
    }
}
