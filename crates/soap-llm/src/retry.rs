//! Bounded retry with configurable backoff for provider calls.

use std::time::Duration;

use soap_types::Result;

/// Backoff policy controlling the delay between retry attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackoffPolicy {
    /// Fixed delay between retries.
    Fixed(Duration),
    /// Exponential backoff: base * 2^attempt, capped at max.
    Exponential { base: Duration, max: Duration },
    /// No delay between retries.
    None,
}

impl BackoffPolicy {
    /// Compute the delay for a given attempt number (0-indexed).
    pub fn delay_for_attempt(&self, attempt: usize) -> Duration {
        match self {
            BackoffPolicy::Fixed(d) => *d,
            BackoffPolicy::Exponential { base, max } => {
                let factor = 2u32.saturating_pow(attempt.min(u32::MAX as usize) as u32);
                base.saturating_mul(factor).min(*max)
            }
            BackoffPolicy::None => Duration::ZERO,
        }
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        BackoffPolicy::Exponential {
            base: Duration::from_millis(500),
            max: Duration::from_secs(8),
        }
    }
}

/// Call `f` up to `max_retries + 1` times, retrying only errors that satisfy
/// [`soap_types::SoapError::is_retryable`]. The last error is returned once
/// the budget is spent.
pub async fn execute_with_retry<T, F, Fut>(
    f: F,
    max_retries: usize,
    policy: &BackoffPolicy,
    label: &str,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        match f().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < max_retries => {
                let delay = policy.delay_for_attempt(attempt);
                tracing::warn!(
                    target_call = %label,
                    attempt,
                    delay_ms = %delay.as_millis(),
                    error = %e,
                    "Retryable error, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soap_types::{Provider, SoapError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn server_error() -> SoapError {
        SoapError::ProviderHttp {
            provider: Provider::Google,
            status: 503,
            body: "overloaded".into(),
        }
    }

    #[tokio::test]
    async fn success_on_first_try() {
        let result =
            execute_with_retry(|| async { Ok("done") }, 3, &BackoffPolicy::None, "google").await;
        assert_eq!(result.unwrap(), "done");
    }

    #[tokio::test]
    async fn retry_on_retryable_error_succeeds() {
        let call_count = Arc::new(AtomicUsize::new(0));
        let cc = call_count.clone();

        let result = execute_with_retry(
            move || {
                let cc = cc.clone();
                async move {
                    if cc.fetch_add(1, Ordering::SeqCst) == 0 {
                        Err(server_error())
                    } else {
                        Ok("recovered")
                    }
                }
            },
            3,
            &BackoffPolicy::None,
            "google",
        )
        .await;

        assert_eq!(result.unwrap(), "recovered");
        assert_eq!(call_count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn max_retries_exhausted_returns_last_error() {
        let call_count = Arc::new(AtomicUsize::new(0));
        let cc = call_count.clone();

        let result: Result<()> = execute_with_retry(
            move || {
                let cc = cc.clone();
                async move {
                    cc.fetch_add(1, Ordering::SeqCst);
                    Err(server_error())
                }
            },
            2,
            &BackoffPolicy::None,
            "google",
        )
        .await;

        assert!(matches!(result, Err(SoapError::ProviderHttp { status: 503, .. })));
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_retryable_error_no_retry() {
        let call_count = Arc::new(AtomicUsize::new(0));
        let cc = call_count.clone();

        let result: Result<()> = execute_with_retry(
            move || {
                let cc = cc.clone();
                async move {
                    cc.fetch_add(1, Ordering::SeqCst);
                    Err(SoapError::ProviderHttp {
                        provider: Provider::OpenAi,
                        status: 401,
                        body: "invalid key".into(),
                    })
                }
            },
            5,
            &BackoffPolicy::None,
            "openai",
        )
        .await;

        assert!(result.is_err());
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn fixed_backoff_constant_delay() {
        let policy = BackoffPolicy::Fixed(Duration::from_millis(200));
        assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(200));
        assert_eq!(policy.delay_for_attempt(100), Duration::from_millis(200));
    }

    #[test]
    fn exponential_backoff_doubles_and_caps() {
        let policy = BackoffPolicy::Exponential {
            base: Duration::from_millis(100),
            max: Duration::from_millis(500),
        };
        assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(400));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(500));
        assert_eq!(policy.delay_for_attempt(64), Duration::from_millis(500));
    }

    #[test]
    fn default_backoff_is_exponential() {
        let policy = BackoffPolicy::default();
        assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(500));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_for_attempt(20), Duration::from_secs(8));
    }

    #[test]
    fn none_backoff_zero_delay() {
        assert_eq!(BackoffPolicy::None.delay_for_attempt(7), Duration::ZERO);
    }
}
