//! Retry with exponential backoff for destination mutations.
//!
//! The destination service rate-limits and intermittently fails; every
//! mutating call goes through `retry` with one shared policy instead of
//! ad-hoc loops at each call site.

use std::thread;
use std::time::Duration;

use anyhow::Result;

/// Backoff policy: `attempts` tries, waiting `initial_delay` after the first
/// failure and multiplying the wait by `multiplier` after each subsequent one.
#[derive(Clone, Copy, Debug)]
pub struct Backoff {
    pub attempts: u32,
    pub initial_delay: Duration,
    pub multiplier: u32,
}

impl Default for Backoff {
    /// 10 attempts, 5 s initial wait, doubling: 5, 10, 20, ...
    fn default() -> Self {
        Self {
            attempts: 10,
            initial_delay: Duration::from_secs(5),
            multiplier: 2,
        }
    }
}

impl Backoff {
    /// Policy that never sleeps, for tests.
    pub fn immediate(attempts: u32) -> Self {
        Self {
            attempts,
            initial_delay: Duration::ZERO,
            multiplier: 1,
        }
    }
}

/// Run `op` until it succeeds or the policy is exhausted. Any error counts as
/// a failure. Returns the last error, annotated with the label, after the
/// final attempt.
pub fn retry<T>(policy: &Backoff, label: &str, mut op: impl FnMut() -> Result<T>) -> Result<T> {
    let mut delay = policy.initial_delay;
    let mut last_err = None;

    for attempt in 1..=policy.attempts.max(1) {
        match op() {
            Ok(value) => return Ok(value),
            Err(e) => {
                if attempt < policy.attempts {
                    eprintln!(
                        "ERROR: (retrying {label}) {e:#} in {:.0?}",
                        delay
                    );
                    if !delay.is_zero() {
                        thread::sleep(delay);
                    }
                    delay *= policy.multiplier;
                }
                last_err = Some(e);
            }
        }
    }

    Err(last_err
        .unwrap_or_else(|| anyhow::anyhow!("no attempts made"))
        .context(format!("{label} failed after {} attempts", policy.attempts)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_succeeds_first_try() {
        let calls = Cell::new(0);
        let result = retry(&Backoff::immediate(10), "op", || {
            calls.set(calls.get() + 1);
            Ok(42)
        });
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_recovers_after_transient_failures() {
        let calls = Cell::new(0);
        let result = retry(&Backoff::immediate(10), "op", || {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                anyhow::bail!("transient")
            }
            Ok("ok")
        });
        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_exhausts_after_attempts() {
        let calls = Cell::new(0);
        let result: Result<()> = retry(&Backoff::immediate(4), "doomed op", || {
            calls.set(calls.get() + 1);
            anyhow::bail!("still broken")
        });
        assert_eq!(calls.get(), 4);
        let msg = format!("{:#}", result.unwrap_err());
        assert!(msg.contains("doomed op failed after 4 attempts"));
        assert!(msg.contains("still broken"));
    }

    #[test]
    fn test_delay_doubles() {
        let policy = Backoff::default();
        assert_eq!(policy.attempts, 10);
        assert_eq!(policy.initial_delay, Duration::from_secs(5));
        assert_eq!(policy.initial_delay * policy.multiplier, Duration::from_secs(10));
    }
}
