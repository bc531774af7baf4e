//! The timer seam behind auto-advance.
//!
//! A playback controller never owns a runtime. It asks a [`Scheduler`] for a
//! recurring timer and holds the returned handle inside a [`TimerGuard`],
//! which cancels the timer when dropped. Each timer is tagged with a
//! [`TickToken`]; the controller ignores fires whose token is not the one it
//! currently holds, so a tick that was already queued when the timer was
//! cancelled cannot mutate state.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Identifies one acquired timer. Unique for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TickToken(u64);

impl TickToken {
    pub fn next() -> Self {
        Self(NEXT_TOKEN.fetch_add(1, Ordering::Relaxed))
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

pub trait TimerHandle {
    /// Stop future fires. Calling it twice is a no-op.
    fn cancel(&mut self);
}

pub trait Scheduler {
    type Handle: TimerHandle;

    /// Start a timer that fires `token` every `interval` until cancelled.
    fn every(&mut self, interval: Duration, token: TickToken) -> Self::Handle;
}

/// Owns a live timer and cancels it on drop.
#[derive(Debug)]
pub struct TimerGuard<H: TimerHandle> {
    handle: H,
    token: TickToken,
    interval: Duration,
}

impl<H: TimerHandle> TimerGuard<H> {
    pub fn acquire<S>(scheduler: &mut S, interval: Duration) -> Self
    where
        S: Scheduler<Handle = H>,
    {
        let token = TickToken::next();
        let handle = scheduler.every(interval, token);
        Self {
            handle,
            token,
            interval,
        }
    }

    pub fn token(&self) -> TickToken {
        self.token
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl<H: TimerHandle> Drop for TimerGuard<H> {
    fn drop(&mut self) {
        self.handle.cancel();
    }
}

#[derive(Debug)]
struct VirtualTimer {
    id: u64,
    token: TickToken,
    interval_ms: u64,
    next_due_ms: u64,
}

#[derive(Debug, Default)]
struct VirtualClock {
    now_ms: u64,
    next_id: u64,
    timers: Vec<VirtualTimer>,
}

/// Deterministic scheduler driven by an explicit virtual clock.
///
/// Clones share the same clock, so a test can keep one clone while the
/// controller owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    clock: Rc<RefCell<VirtualClock>>,
}

#[derive(Debug)]
pub struct ManualHandle {
    id: u64,
    clock: Rc<RefCell<VirtualClock>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.borrow().now_ms
    }

    pub fn live_timers(&self) -> usize {
        self.clock.borrow().timers.len()
    }

    /// Move the clock forward and return every fire in due order.
    ///
    /// Fires of a timer cancelled after this call returns are still in the
    /// list; consumers drop them by token.
    pub fn advance(&self, ms: u64) -> Vec<TickToken> {
        let mut clock = self.clock.borrow_mut();
        let until = clock.now_ms + ms;
        let mut fired = Vec::new();
        loop {
            let due = clock
                .timers
                .iter_mut()
                .filter(|t| t.next_due_ms <= until)
                .min_by_key(|t| (t.next_due_ms, t.id));
            let Some(timer) = due else { break };
            let at = timer.next_due_ms;
            timer.next_due_ms += timer.interval_ms.max(1);
            fired.push((at, timer.token));
        }
        clock.now_ms = until;
        fired.into_iter().map(|(_, token)| token).collect()
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualHandle;

    fn every(&mut self, interval: Duration, token: TickToken) -> ManualHandle {
        let mut clock = self.clock.borrow_mut();
        let id = clock.next_id;
        clock.next_id += 1;
        let interval_ms = interval.as_millis().min(u64::MAX as u128) as u64;
        let next_due_ms = clock.now_ms + interval_ms.max(1);
        clock.timers.push(VirtualTimer {
            id,
            token,
            interval_ms,
            next_due_ms,
        });
        ManualHandle {
            id,
            clock: Rc::clone(&self.clock),
        }
    }
}

impl TimerHandle for ManualHandle {
    fn cancel(&mut self) {
        let id = self.id;
        self.clock.borrow_mut().timers.retain(|t| t.id != id);
    }
}
