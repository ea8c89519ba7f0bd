//! Time source behind cache freshness and request timeouts.
//!
//! The browser clock reads wall time through `chrono` and sleeps on
//! `gloo-timers`; tests drive a manual clock instead.

use futures::future::{self, Either, FutureExt, LocalBoxFuture};
use std::{future::Future, pin::pin, time::Duration};

/// Time source for cache freshness and fetch timeouts.
pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;

    /// Resolve after `duration` has elapsed.
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}

/// Wall clock and timers of the browser event loop.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserClock;

impl Clock for BrowserClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        gloo_timers::future::sleep(duration).boxed_local()
    }
}

/// Run `work` unless `duration` elapses first, in which case `None` is
/// returned and `work` is dropped.
pub async fn with_timeout<F>(clock: &dyn Clock, duration: Duration, work: F) -> Option<F::Output>
where
    F: Future,
{
    let work = pin!(work);
    match future::select(work, clock.sleep(duration)).await {
        Either::Left((output, _)) => Some(output),
        Either::Right(((), _)) => None,
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
pub(crate) mod testing {
    use super::Clock;
    use futures::future::{self, FutureExt, LocalBoxFuture};
    use std::{cell::Cell, rc::Rc, time::Duration};

    /// Manually driven clock. Sleeps either never finish or finish at once.
    #[derive(Debug, Clone, Default)]
    pub struct ManualClock {
        now: Rc<Cell<i64>>,
        expire_immediately: Rc<Cell<bool>>,
    }

    impl ManualClock {
        pub fn at(now_ms: i64) -> Self {
            let clock = Self::default();
            clock.now.set(now_ms);
            clock
        }

        pub fn advance(&self, by: Duration) {
            let millis = i64::try_from(by.as_millis()).unwrap_or(i64::MAX);
            self.now.set(self.now.get() + millis);
        }

        pub fn expire_timeouts(&self) {
            self.expire_immediately.set(true);
        }
    }

    impl Clock for ManualClock {
        fn now_ms(&self) -> i64 {
            self.now.get()
        }

        fn sleep(&self, _duration: Duration) -> LocalBoxFuture<'static, ()> {
            if self.expire_immediately.get() {
                future::ready(()).boxed_local()
            } else {
                future::pending().boxed_local()
            }
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::testing::ManualClock;
    use super::*;

    #[tokio::test]
    async fn test_with_timeout_returns_output() {
        let clock = ManualClock::at(0);
        let output = with_timeout(&clock, Duration::from_secs(1), async { 7 }).await;
        assert_eq!(output, Some(7));
    }

    #[tokio::test]
    async fn test_with_timeout_gives_up_when_timer_fires() {
        let clock = ManualClock::at(0);
        clock.expire_timeouts();
        let output = with_timeout(&clock, Duration::from_secs(1), future::pending::<u8>()).await;
        assert_eq!(output, None);
    }

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::at(1_000);
        clock.advance(Duration::from_millis(250));
        assert_eq!(clock.now_ms(), 1_250);
    }
}
