//! Compensation
//!
//! Scoped reversal of a local store mutation whose dependent remote call may
//! fail. The reversal is registered right after the mutation, awaited if the
//! remote call fails, and discarded once the remote call is confirmed.

use std::future::Future;
use std::pin::Pin;

use crate::shared::errors::RepositoryError;

type ReversalFuture = Pin<Box<dyn Future<Output = Result<(), RepositoryError>> + Send + 'static>>;
type Reversal = Box<dyn FnOnce() -> ReversalFuture + Send + 'static>;

/// Pending reversal of one local mutation
///
/// Dropping an armed compensation (for example when the request future is
/// cancelled mid-call) schedules the reversal on the current runtime.
#[must_use = "an unused compensation is reverted immediately on drop"]
pub struct Compensation {
    description: &'static str,
    reversal: Option<Reversal>,
}

impl Compensation {
    /// Register a reversal for a mutation that has already been applied
    pub fn register<F, Fut>(description: &'static str, reversal: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), RepositoryError>> + Send + 'static,
    {
        Self {
            description,
            reversal: Some(Box::new(move || Box::pin(reversal()) as ReversalFuture)),
        }
    }

    /// Keep the mutation; the reversal is dropped without running
    pub fn discard(mut self) {
        self.reversal = None;
    }

    /// Run the reversal now. Failures are logged; the caller still reports
    /// the error that made compensation necessary.
    pub async fn run(mut self) {
        if let Some(reversal) = self.reversal.take() {
            execute(self.description, reversal).await;
        }
    }

    /// Await a remote operation, reverting the local mutation if it fails
    ///
    /// # Errors
    ///
    /// Returns the operation's error after the reversal has completed.
    pub async fn guard<T, E, Fut>(self, operation: Fut) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
    {
        match operation.await {
            Ok(value) => {
                self.discard();
                Ok(value)
            }
            Err(err) => {
                self.run().await;
                Err(err)
            }
        }
    }
}

async fn execute(description: &'static str, reversal: Reversal) {
    match reversal().await {
        Ok(()) => tracing::info!(compensation = description, "Local state reverted"),
        Err(err) => tracing::error!(
            compensation = description,
            error = %err,
            "Failed to revert local state"
        ),
    }
}

impl Drop for Compensation {
    fn drop(&mut self) {
        let Some(reversal) = self.reversal.take() else {
            return;
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                tracing::warn!(
                    compensation = self.description,
                    "Operation abandoned before completion, scheduling revert"
                );
                handle.spawn(execute(self.description, reversal));
            }
            Err(_) => tracing::error!(
                compensation = self.description,
                "Operation abandoned outside a runtime, local state not reverted"
            ),
        }
    }
}
