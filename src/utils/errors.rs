//! Retrying and fault-tolerant execution of async operations

use std::{fmt, future::Future, sync::Arc, time::Duration};

use chrono::Utc;
use color_eyre::eyre::Report;
use tracing::{debug, error, warn};

use crate::Result;

type RetryIf = Arc<dyn Fn(&Report) -> bool + Send + Sync>;

/// How [`retry`] spaces out and gives up on attempts
///
/// The wait after attempt `n` (zero-based) is `backoff_factor * 2^n` plus up
/// to 10% jitter, capped at `max_backoff`.
#[derive(Clone)]
pub struct RetryConfig {
    /// Total attempts, the first one included; at least one is always made
    pub max_retries: u32,
    pub backoff_factor: Duration,
    pub max_backoff: Duration,
    retry_if: Option<RetryIf>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_factor: Duration::from_secs(1),
            max_backoff: Duration::from_secs(30),
            retry_if: None,
        }
    }
}

impl fmt::Debug for RetryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryConfig")
            .field("max_retries", &self.max_retries)
            .field("backoff_factor", &self.backoff_factor)
            .field("max_backoff", &self.max_backoff)
            .field("retry_if", &self.retry_if.is_some())
            .finish()
    }
}

impl RetryConfig {
    pub fn new(max_retries: u32, backoff_factor: Duration, max_backoff: Duration) -> Self {
        Self {
            max_retries,
            backoff_factor,
            max_backoff,
            retry_if: None,
        }
    }

    /// Only retry errors matching `predicate`; others fail immediately
    pub fn retry_if<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Report) -> bool + Send + Sync + 'static,
    {
        self.retry_if = Some(Arc::new(predicate));
        self
    }

    pub fn should_retry(&self, error: &Report) -> bool {
        self.retry_if
            .as_ref()
            .is_none_or(|predicate| predicate(error))
    }

    /// Wait after the zero-based `attempt`, with `jitter` in `0.0..1.0`
    pub fn delay(&self, attempt: u32, jitter: f64) -> Duration {
        let base = self
            .backoff_factor
            .saturating_mul(2u32.saturating_pow(attempt));
        let jittered = base.saturating_add(base.mul_f64(0.1 * jitter.clamp(0.0, 1.0)));
        jittered.min(self.max_backoff)
    }
}

fn jitter() -> f64 {
    f64::from(Utc::now().timestamp_subsec_nanos()) / 1e9
}

/// Run `operation` until it succeeds or the attempts of `config` run out
///
/// The last error is returned once every attempt failed; an error rejected by
/// [`RetryConfig::retry_if`] is returned right away.
pub async fn retry<T, F, Fut>(config: &RetryConfig, name: &str, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = config.max_retries.max(1);
    let mut attempt = 0;
    loop {
        let e = match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };
        attempt += 1;

        if !config.should_retry(&e) {
            return Err(e);
        }
        if attempt >= attempts {
            error!("All {attempts} attempts failed for {name}: {e}");
            return Err(e);
        }

        let wait = config.delay(attempt - 1, jitter());
        warn!(
            "Attempt {attempt}/{attempts} failed for {name}: {e}. Retrying in {:.2}s.",
            wait.as_secs_f64()
        );
        tokio::time::sleep(wait).await;
    }
}

/// Await `future`, logging a failure under `name` before passing it on
pub async fn error_boundary<T, Fut>(name: &str, future: Fut) -> Result<T>
where
    Fut: Future<Output = Result<T>>,
{
    future.await.inspect_err(|e| {
        error!("Error in {name}: {e}");
        debug!("Report for {name}:\n{e:?}");
    })
}

/// Await `future`, returning `fallback` instead of an error
pub async fn safe_execute<T, Fut>(future: Fut, fallback: T, log_error: bool) -> T
where
    Fut: Future<Output = Result<T>>,
{
    match future.await {
        Ok(value) => value,
        Err(e) => {
            if log_error {
                error!("Error in safe_execute: {e}");
            }
            fallback
        }
    }
}
