//! Bounded retry with a fixed delay and a fallback value.

use crate::console::Console;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Marker stored in place of a paragraph that could not be translated.
pub const PARAGRAPH_SENTINEL: &str = "[Translation Failed]";

/// Marker stored in place of a heading that could not be translated.
pub fn heading_sentinel(original: &str) -> String {
    format!("[Translation Failed for: {}]", original)
}

/// How many times to attempt a call and how long to wait between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }
}

/// Result of a retried call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// A call succeeded.
    Succeeded(T),
    /// Every attempt failed; holds the fallback.
    GaveUp(T),
}

impl<T> Outcome<T> {
    pub fn into_inner(self) -> T {
        match self {
            Outcome::Succeeded(v) | Outcome::GaveUp(v) => v,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded(_))
    }
}

/// Calls `op` until it succeeds or `policy.attempts` calls have failed.
///
/// Sleeps `policy.delay` between attempts but not after the last one.
/// `label` names the unit in retry warnings.
pub async fn retry_or<T, E, F, Fut>(
    policy: RetryPolicy,
    label: &str,
    fallback: T,
    console: &Console,
    mut op: F,
) -> Outcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let attempts = policy.attempts.max(1);

    for attempt in 1..=attempts {
        match op().await {
            Ok(value) => return Outcome::Succeeded(value),
            Err(e) => {
                if attempt < attempts {
                    console.warning(&format!(
                        "Failed to translate {} ({}). Retrying ({}/{})...",
                        label, e, attempt, attempts
                    ));
                    if !policy.delay.is_zero() {
                        tokio::time::sleep(policy.delay).await;
                    }
                } else {
                    console.error(&format!(
                        "Giving up on {} after {} attempts ({})",
                        label, attempts, e
                    ));
                }
            }
        }
    }

    Outcome::GaveUp(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn instant() -> RetryPolicy {
        RetryPolicy::new(5, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_exhausted_returns_fallback() {
        let calls = Cell::new(0);
        let console = Console::with_colors(false);

        let outcome = retry_or(instant(), "paragraph 1", PARAGRAPH_SENTINEL.to_string(), &console, || {
            calls.set(calls.get() + 1);
            async { Err::<String, _>("boom") }
        })
        .await;

        assert_eq!(calls.get(), 5);
        assert_eq!(outcome, Outcome::GaveUp("[Translation Failed]".to_string()));
    }

    #[tokio::test]
    async fn test_success_on_third_attempt_stops() {
        let calls = Cell::new(0);
        let console = Console::with_colors(false);

        let outcome = retry_or(instant(), "paragraph 1", String::new(), &console, || {
            calls.set(calls.get() + 1);
            let n = calls.get();
            async move {
                if n < 3 {
                    Err("not yet")
                } else {
                    Ok(format!("attempt {}", n))
                }
            }
        })
        .await;

        assert_eq!(calls.get(), 3);
        assert!(outcome.is_success());
        assert_eq!(outcome.into_inner(), "attempt 3");
    }

    #[tokio::test]
    async fn test_first_success_makes_one_call() {
        let calls = Cell::new(0);
        let console = Console::with_colors(false);

        let outcome = retry_or(instant(), "heading", 0, &console, || {
            calls.set(calls.get() + 1);
            async { Ok::<_, &str>(42) }
        })
        .await;

        assert_eq!(calls.get(), 1);
        assert_eq!(outcome, Outcome::Succeeded(42));
    }

    #[tokio::test]
    async fn test_zero_attempts_still_tries_once() {
        let calls = Cell::new(0);
        let console = Console::with_colors(false);

        let outcome = retry_or(RetryPolicy::new(0, Duration::ZERO), "x", 7, &console, || {
            calls.set(calls.get() + 1);
            async { Err::<i32, _>("no") }
        })
        .await;

        assert_eq!(calls.get(), 1);
        assert_eq!(outcome, Outcome::GaveUp(7));
    }

    #[test]
    fn test_heading_sentinel() {
        assert_eq!(heading_sentinel("Intro"), "[Translation Failed for: Intro]");
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts, 5);
        assert_eq!(policy.delay, Duration::from_secs(2));
    }
}
