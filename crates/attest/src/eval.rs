//! Bounded, cancellable evaluation of test thunks.

use crate::types::Thrown;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinError;

/// A restartable zero-argument computation producing a value or raising an
/// error. Re-invoked on every evaluation; nothing is memoized.
pub type Thunk<T> = Arc<dyn Fn() -> Result<T, Thrown> + Send + Sync>;

/// Failures of the evaluation machinery itself, distinct from a test's own
/// raised error. Callers map these to `TestOutcome::UnexpectedError`.
#[derive(Error, Debug)]
pub enum EvalError {
    #[error("evaluation task panicked: {0}")]
    Panicked(String),
    #[error("wait for the evaluation task was cancelled")]
    Cancelled,
}

impl EvalError {
    pub(crate) fn into_thrown(self) -> Thrown {
        match self {
            Self::Panicked(message) => Thrown::new("panic", message),
            Self::Cancelled => Thrown::bare("cancelled"),
        }
    }
}

/// Raw result of one bounded evaluation. Crate-internal: consumers only ever
/// see classified `TestOutcome`s.
#[derive(Debug)]
pub(crate) enum RawOutcome<T> {
    Completed(T),
    Raised(Thrown),
    TimedOut,
}

/// Run `thunk` on its own task and wait up to `timeout` for it to finish.
///
/// The wait is the engine's single suspension point. On expiry the task is
/// aborted best-effort — a blocking thunk may keep running — and `TimedOut`
/// is returned immediately; a late completion is discarded with the dropped
/// handle and can never replace the returned outcome.
pub(crate) async fn evaluate<T>(
    thunk: &Thunk<T>,
    timeout: Duration,
) -> Result<RawOutcome<T>, EvalError>
where
    T: Send + 'static,
{
    let thunk = Arc::clone(thunk);
    let mut task = tokio::task::spawn_blocking(move || thunk());

    match tokio::time::timeout(timeout, &mut task).await {
        Ok(Ok(Ok(value))) => Ok(RawOutcome::Completed(value)),
        Ok(Ok(Err(thrown))) => Ok(RawOutcome::Raised(thrown)),
        Ok(Err(join_error)) => Err(join_failure(join_error)),
        Err(_elapsed) => {
            task.abort();
            Ok(RawOutcome::TimedOut)
        }
    }
}

fn join_failure(error: JoinError) -> EvalError {
    if error.is_panic() {
        let payload = error.into_panic();
        let message = payload
            .downcast_ref::<&str>()
            .map(ToString::to_string)
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "opaque panic payload".to_string());
        EvalError::Panicked(message)
    } else {
        EvalError::Cancelled
    }
}
