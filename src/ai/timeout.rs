//! Timeout wrapper for LLM calls.
//!
//! Providers only bound connection setup; the gateway bounds the whole
//! request with [`with_timeout`] so a stalled stream cannot hang a run.

use std::future::Future;
use std::time::Duration;

use crate::types::{ModernizeError, Result};

/// Execute an async operation with a timeout
///
/// Returns a timeout error if the operation doesn't complete within the specified duration.
pub async fn with_timeout<T, F>(timeout: Duration, future: F, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(ModernizeError::timeout(operation_name, timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_timeout_success() {
        let result = with_timeout(
            Duration::from_secs(1),
            async { Ok::<_, ModernizeError>(42) },
            "test operation",
        )
        .await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_with_timeout_expires() {
        let result = with_timeout(
            Duration::from_millis(10),
            async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Ok::<_, ModernizeError>(42)
            },
            "slow operation",
        )
        .await;
        assert!(matches!(result.unwrap_err(), ModernizeError::Timeout { .. }));
    }
}
