//! Per-operation deadline and cancellation.
//!
//! Every network operation takes a [`CallContext`] and runs each transport
//! call under it. A context that expires or is cancelled fails the call with
//! [`RpcError::DeadlineExceeded`] or [`RpcError::Cancelled`]; session state
//! is left as it was before the call.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use crate::error::RpcError;

/// Cloneable cancellation flag shared between a caller and its operations.
#[derive(Debug, Clone)]
pub struct CancelToken {
    flag: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        let (flag, _) = watch::channel(false);
        Self {
            flag: Arc::new(flag),
        }
    }

    /// Cancel every operation holding a clone of this token.
    pub fn cancel(&self) {
        self.flag.send_replace(true);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.flag.borrow()
    }

    /// Resolves once [`Self::cancel`] has been called.
    pub async fn cancelled(&self) {
        let mut rx = self.flag.subscribe();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            // The sender lives as long as `self`, so this never resolves.
            std::future::pending::<()>().await;
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Deadline and cancellation for one top-level operation.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    deadline: Option<Instant>,
    cancel: CancelToken,
}

impl CallContext {
    /// A context that never expires and is never cancelled.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Expire `timeout` from now, or earlier if a deadline is already set.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Expire at `deadline`, or earlier if a deadline is already set.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(self.deadline.map_or(deadline, |current| current.min(deadline)));
        self
    }

    #[must_use]
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    #[must_use]
    pub const fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Fail fast if the context is already cancelled or past its deadline.
    ///
    /// # Errors
    ///
    /// [`RpcError::Cancelled`] or [`RpcError::DeadlineExceeded`].
    pub fn check(&self) -> Result<(), RpcError> {
        if self.cancel.is_cancelled() {
            return Err(RpcError::Cancelled);
        }
        if self.deadline.is_some_and(|deadline| deadline <= Instant::now()) {
            return Err(RpcError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Run `fut` under this context's deadline and cancellation.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::Cancelled`] if the token fires first,
    /// [`RpcError::DeadlineExceeded`] if the deadline passes first, or the
    /// future's own error.
    pub async fn run<F, T>(&self, fut: F) -> Result<T, RpcError>
    where
        F: Future<Output = Result<T, RpcError>>,
    {
        self.check()?;

        let bounded = async {
            match self.deadline {
                Some(deadline) => tokio::time::timeout_at(deadline, fut)
                    .await
                    .unwrap_or(Err(RpcError::DeadlineExceeded)),
                None => fut.await,
            }
        };

        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(RpcError::Cancelled),
            result = bounded => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn background_context_passes_results_through() {
        let ctx = CallContext::background();
        let value = ctx.run(async { Ok::<_, RpcError>(7) }).await.unwrap();
        assert_eq!(value, 7);

        let err = ctx
            .run(async { Err::<(), _>(RpcError::NotAuthenticated) })
            .await
            .unwrap_err();
        assert!(matches!(err, RpcError::NotAuthenticated));
    }

    #[tokio::test]
    async fn expired_deadline_fails_pending_call() {
        let ctx = CallContext::background().with_deadline(Instant::now());
        let err = ctx
            .run(std::future::pending::<Result<(), RpcError>>())
            .await
            .unwrap_err();
        assert!(matches!(err, RpcError::DeadlineExceeded));
    }

    #[tokio::test]
    async fn already_cancelled_token_short_circuits() {
        let token = CancelToken::new();
        token.cancel();
        let ctx = CallContext::background().with_cancel(token);
        let err = ctx.run(async { Ok::<_, RpcError>(()) }).await.unwrap_err();
        assert!(matches!(err, RpcError::Cancelled));
    }

    #[tokio::test]
    async fn cancel_interrupts_in_flight_call() {
        let token = CancelToken::new();
        let ctx = CallContext::background().with_cancel(token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            token.cancel();
        });

        let err = ctx
            .run(std::future::pending::<Result<(), RpcError>>())
            .await
            .unwrap_err();
        assert!(matches!(err, RpcError::Cancelled));
        canceller.await.unwrap();
    }

    #[test]
    fn check_reports_spent_context() {
        assert!(CallContext::background().check().is_ok());

        let expired = CallContext::background().with_deadline(Instant::now());
        assert!(matches!(expired.check(), Err(RpcError::DeadlineExceeded)));

        let cancelled = CallContext::background();
        cancelled.cancel_token().cancel();
        assert!(matches!(cancelled.check(), Err(RpcError::Cancelled)));

        let future = CallContext::background().with_timeout(Duration::from_secs(60));
        assert!(future.check().is_ok());
    }

    #[test]
    fn earlier_deadline_wins() {
        let now = Instant::now();
        let ctx = CallContext::background()
            .with_deadline(now + Duration::from_secs(5))
            .with_deadline(now + Duration::from_secs(60));
        assert_eq!(ctx.deadline(), Some(now + Duration::from_secs(5)));
    }

    #[test]
    fn clones_share_cancellation() {
        let ctx = CallContext::background();
        let clone = ctx.clone();
        ctx.cancel_token().cancel();
        assert!(clone.cancel_token().is_cancelled());
    }
}
