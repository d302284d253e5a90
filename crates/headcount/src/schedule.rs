use std::ops::ControlFlow;
use std::thread;
use std::time::Duration;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::info;

/// Time source for the daily loop, injectable so the run decision can be
/// tested without real delays.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
    fn sleep(&self, duration: Duration);
}

/// Wall-clock time in the process time zone (honors `TZ`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// The next moment at `run_at` strictly after `now`: later today when the
/// time is still ahead, otherwise tomorrow.
pub fn next_run_after(now: NaiveDateTime, run_at: NaiveTime) -> NaiveDateTime {
    let today = now.date().and_time(run_at);
    if now < today {
        today
    } else {
        (now.date() + chrono::Duration::days(1)).and_time(run_at)
    }
}

/// Fire `job` once per day at `run_at` until it asks to stop.
///
/// The callback receives the date the run fired on and decides whether the
/// loop continues; a failed run is the callback's concern and never stops
/// the schedule by itself.
pub fn run_daily<C, F>(clock: &C, run_at: NaiveTime, mut job: F)
where
    C: Clock,
    F: FnMut(NaiveDate) -> ControlFlow<()>,
{
    loop {
        let now = clock.now();
        let next = next_run_after(now, run_at);
        let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
        info!(next_run = %next, wait_secs = wait.as_secs(), "sleeping until next run");
        clock.sleep(wait);

        if job(next.date()).is_break() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    fn eight() -> NaiveTime {
        NaiveTime::from_hms_opt(8, 0, 0).expect("valid time")
    }

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, day)
            .expect("valid date")
            .and_hms_opt(hour, minute, 0)
            .expect("valid time")
    }

    struct FakeClock {
        now: RefCell<NaiveDateTime>,
        slept: RefCell<Vec<Duration>>,
    }

    impl FakeClock {
        fn starting_at(now: NaiveDateTime) -> Self {
            Self {
                now: RefCell::new(now),
                slept: RefCell::new(Vec::new()),
            }
        }
    }

    impl Clock for FakeClock {
        fn now(&self) -> NaiveDateTime {
            *self.now.borrow()
        }

        fn sleep(&self, duration: Duration) {
            self.slept.borrow_mut().push(duration);
            let advance = chrono::Duration::from_std(duration).expect("duration fits");
            let mut now = self.now.borrow_mut();
            *now += advance;
        }
    }

    #[test]
    fn next_run_is_later_today_before_the_hour() {
        assert_eq!(next_run_after(at(24, 6, 30), eight()), at(24, 8, 0));
    }

    #[test]
    fn next_run_is_tomorrow_at_or_after_the_hour() {
        assert_eq!(next_run_after(at(24, 8, 0), eight()), at(25, 8, 0));
        assert_eq!(next_run_after(at(24, 14, 5), eight()), at(25, 8, 0));
    }

    #[test]
    fn daily_loop_fires_consecutive_dates() {
        let clock = FakeClock::starting_at(at(24, 6, 0));
        let fired = RefCell::new(Vec::new());

        run_daily(&clock, eight(), |day| {
            fired.borrow_mut().push(day);
            if fired.borrow().len() == 3 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });

        let fired = fired.into_inner();
        let days: Vec<u32> = fired
            .iter()
            .map(|date| chrono::Datelike::day(date))
            .collect();
        assert_eq!(days, vec![24, 25, 26]);

        let slept = clock.slept.into_inner();
        assert_eq!(slept[0], Duration::from_secs(2 * 3600));
        assert_eq!(slept[1], Duration::from_secs(24 * 3600));
    }
}
