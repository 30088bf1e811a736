//! Periodic task scheduling.
//!
//! Drives the three periodic sources of the fixture without async/await or
//! platform timers. The caller provides the current time and sleeps for the
//! returned duration between ticks.

use embassy_time::{Duration, Instant};

use crate::config::TickTimings;
use crate::event_queue::Receiver;
use crate::fixture::Fixture;
use crate::input::{ButtonPoller, ButtonPort, InputEvent};
use crate::sensor::AmbientSensor;
use crate::DriveSink;

/// Result of a scheduler tick.
#[derive(Debug, Clone, Copy)]
pub struct TickResult {
    /// The earliest deadline of any armed source.
    pub next_deadline: Instant,
    /// How long to wait until then (zero if behind schedule).
    pub sleep_duration: Duration,
}

/// Portable scheduler for the input, fade and ambient sources.
///
/// Sources run in fixed priority order within a tick: input poll, then fade
/// step, then ambient poll. Each runs to completion before the next starts.
///
/// # Usage
///
/// ```ignore
/// let mut scheduler = TickScheduler::new(fixture, poller, queue.receiver(), timings);
///
/// loop {
///     let result = scheduler.tick(Instant::from_millis(now_ms()));
///     sleep_ms(result.sleep_duration.as_millis());
/// }
/// ```
pub struct TickScheduler<'a, D, S, P, const SIZE: usize>
where
    D: DriveSink,
    S: AmbientSensor,
    P: ButtonPort,
{
    fixture: Fixture<D, S>,
    poller: ButtonPoller<'a, P, SIZE>,
    events: Receiver<'a, InputEvent, SIZE>,
    poll_interval: Duration,
    lux_interval: Duration,
    next_poll: Instant,
    next_fade: Option<Instant>,
    next_lux: Instant,
}

impl<'a, D, S, P, const SIZE: usize> TickScheduler<'a, D, S, P, SIZE>
where
    D: DriveSink,
    S: AmbientSensor,
    P: ButtonPort,
{
    /// Create a scheduler. The fade period is read from the fixture on
    /// every step, so runtime interval changes apply immediately.
    pub fn new(
        fixture: Fixture<D, S>,
        poller: ButtonPoller<'a, P, SIZE>,
        events: Receiver<'a, InputEvent, SIZE>,
        timings: TickTimings,
    ) -> Self {
        Self {
            fixture,
            poller,
            events,
            poll_interval: timings.poll,
            lux_interval: timings.lux,
            next_poll: Instant::from_millis(0),
            next_fade: None,
            next_lux: Instant::from_millis(0),
        }
    }

    /// Run every source that is due and return timing information.
    pub fn tick(&mut self, now: Instant) -> TickResult {
        if now >= self.next_poll {
            self.poller.poll();
            self.fixture.dispatch_pending(&self.events);
            self.next_poll = next_deadline(self.next_poll, self.poll_interval, now);
        }

        if self.fixture.is_fading() {
            // A freshly armed fade steps right away.
            let due = *self.next_fade.get_or_insert(now);
            if now >= due {
                self.fixture.on_fade_tick();
                let interval = self.fixture.state().fade.interval();
                self.next_fade = self
                    .fixture
                    .is_fading()
                    .then(|| next_deadline(due, interval, now));
            }
        } else {
            self.next_fade = None;
        }

        if now >= self.next_lux {
            self.fixture.on_lux_tick();
            self.next_lux = next_deadline(self.next_lux, self.lux_interval, now);
        }

        let mut next = if self.next_poll < self.next_lux {
            self.next_poll
        } else {
            self.next_lux
        };
        if let Some(fade) = self.next_fade {
            if fade < next {
                next = fade;
            }
        }

        let sleep_duration = if next.as_millis() > now.as_millis() {
            Duration::from_millis(next.as_millis() - now.as_millis())
        } else {
            Duration::from_millis(0)
        };

        TickResult {
            next_deadline: next,
            sleep_duration,
        }
    }

    pub fn fixture(&self) -> &Fixture<D, S> {
        &self.fixture
    }

    pub fn fixture_mut(&mut self) -> &mut Fixture<D, S> {
        &mut self.fixture
    }
}

/// Advance a deadline by one period.
///
/// If the caller has fallen more than two periods behind, the backlog is
/// skipped instead of replayed in a burst.
fn next_deadline(deadline: Instant, period: Duration, now: Instant) -> Instant {
    let max_drift = period.as_millis() * 2;
    if now.as_millis() > deadline.as_millis() + max_drift {
        return now + period;
    }
    deadline + period
}
