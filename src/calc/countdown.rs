use crate::calc::dates::CalendarInstant;
use chrono::NaiveDateTime;
use std::fmt;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::debug;

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;

/// Time left until an exam. Never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Countdown {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Countdown {
    pub fn is_zero(&self) -> bool {
        *self == Countdown::default()
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d {}h {}m {}s", self.days, self.hours, self.minutes, self.seconds)
    }
}

/// Each field is the remaining milliseconds floored to its unit, wrapped by
/// the next larger unit. Anything at or past the target is all zeros.
pub fn countdown<A: CalendarInstant, B: CalendarInstant>(target: A, now: B) -> Countdown {
    let remaining = (target.instant() - now.instant()).num_milliseconds();
    if remaining <= 0 {
        return Countdown::default();
    }
    let ms = remaining as u64;
    Countdown {
        days: ms / MS_PER_DAY,
        hours: (ms / MS_PER_HOUR) % 24,
        minutes: (ms / MS_PER_MINUTE) % 60,
        seconds: (ms / MS_PER_SECOND) % 60,
    }
}

/// Recomputes a countdown on a fixed interval on its own thread.
///
/// Every tick reads the clock afresh. `on_tick` returns `false` to stop the
/// ticker from inside; [`CountdownTicker::cancel`] or dropping the ticker
/// stops it from outside.
pub struct CountdownTicker {
    cancel: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl CountdownTicker {
    pub fn spawn<C, F>(
        target: NaiveDateTime,
        interval: Duration,
        clock: C,
        mut on_tick: F,
    ) -> std::io::Result<Self>
    where
        C: Fn() -> NaiveDateTime + Send + 'static,
        F: FnMut(Countdown) -> bool + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name("countdown".to_string())
            .spawn(move || {
                loop {
                    if !on_tick(countdown(target, clock())) {
                        debug!("countdown ticker finished");
                        break;
                    }
                    match rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => continue,
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                            debug!("countdown ticker cancelled");
                            break;
                        }
                    }
                }
            })?;
        Ok(CountdownTicker {
            cancel: Some(tx),
            handle: Some(handle),
        })
    }

    /// Stops future ticks and waits for the thread to exit.
    pub fn cancel(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(tx) = self.cancel.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for CountdownTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Arc;

    fn dt(y: i32, m: u32, day: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, day)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_countdown_equal_is_zero() {
        let t = dt(2025, 4, 15, 9, 30, 0);
        assert!(countdown(t, t).is_zero());
    }

    #[test]
    fn test_countdown_past_is_zero() {
        let c = countdown(dt(2025, 4, 15, 0, 0, 0), dt(2025, 4, 16, 12, 0, 0));
        assert_eq!(c, Countdown::default());
    }

    #[test]
    fn test_countdown_fields() {
        let c = countdown(dt(2025, 4, 17, 0, 0, 0), dt(2025, 4, 15, 21, 44, 30));
        assert_eq!(
            c,
            Countdown {
                days: 1,
                hours: 2,
                minutes: 15,
                seconds: 30
            }
        );
        assert_eq!(c.to_string(), "1d 2h 15m 30s");
    }

    #[test]
    fn test_countdown_to_bare_date_counts_to_midnight() {
        let exam_day = NaiveDate::from_ymd_opt(2025, 4, 17).unwrap();
        let c = countdown(exam_day, dt(2025, 4, 15, 0, 0, 0));
        assert_eq!(c.days, 2);
        assert_eq!(c.hours, 0);
    }

    #[test]
    fn test_countdown_sub_second_remaining_floors_to_zero_fields() {
        let now = dt(2025, 4, 15, 0, 0, 0);
        let target = now + chrono::Duration::milliseconds(400);
        assert!(countdown(target, now).is_zero());
    }

    #[test]
    fn test_ticker_recomputes_from_clock_each_tick() {
        let target = dt(2025, 4, 15, 0, 0, 10);
        let seconds = Arc::new(AtomicI64::new(0));
        let clock_seconds = Arc::clone(&seconds);
        let clock = move || {
            let s = clock_seconds.fetch_add(4, Ordering::SeqCst);
            dt(2025, 4, 15, 0, 0, 0) + chrono::Duration::seconds(s)
        };
        let (tx, rx) = mpsc::channel();
        let _ticker = CountdownTicker::spawn(target, Duration::from_millis(1), clock, move |c| {
            let _ = tx.send(c.seconds);
            !c.is_zero()
        })
        .unwrap();
        // The sender is dropped once the ticker stops itself, ending the iterator.
        let seen: Vec<u64> = rx.iter().collect();
        assert_eq!(seen, vec![10, 6, 2, 0]);
    }

    #[test]
    fn test_ticker_cancel_stops_ticks() {
        let target = dt(2030, 1, 1, 0, 0, 0);
        let now = dt(2025, 1, 1, 0, 0, 0);
        let (tx, rx) = mpsc::channel();
        let ticker = CountdownTicker::spawn(target, Duration::from_secs(3600), move || now, move |c| {
            let _ = tx.send(c);
            true
        })
        .unwrap();
        // First tick happens immediately, the next is an hour away.
        let first = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(first.days > 0);
        ticker.cancel();
        assert!(rx.try_recv().is_err());
    }

    proptest! {
        #[test]
        fn prop_countdown_fields_in_range(offset_ms in -10_000_000_000i64..10_000_000_000i64) {
            let now = dt(2025, 1, 1, 0, 0, 0);
            let target = now + chrono::Duration::milliseconds(offset_ms);
            let c = countdown(target, now);
            prop_assert!(c.hours < 24 && c.minutes < 60 && c.seconds < 60);
            if offset_ms <= 0 {
                prop_assert!(c.is_zero());
            } else {
                let total = c.days * MS_PER_DAY + c.hours * MS_PER_HOUR + c.minutes * MS_PER_MINUTE + c.seconds * MS_PER_SECOND;
                prop_assert_eq!(total / MS_PER_SECOND, offset_ms as u64 / MS_PER_SECOND);
            }
        }
    }
}
