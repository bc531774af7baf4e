//! Generic step-driven playback over a fixed example catalog.
//!
//! One controller type serves every panel. A [`Lesson`] supplies what differs
//! between panels: the example type, the display state, how an example's
//! delta is applied and what happens at the end of the sequence.
//!
//! The controller is either [`Mode::Idle`] or [`Mode::AutoAdvancing`]. It is
//! auto-advancing exactly when it holds a live [`TimerGuard`], so releasing
//! the guard (toggle-off, reset, speed change, drop) is the only way out of
//! that mode and always cancels the timer.

use crate::catalog::Catalog;
use crate::scheduler::{Scheduler, TickToken, TimerGuard};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What `step()` does once the last example is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EndPolicy {
    /// Stop auto-advance and return to the first example. The last example's
    /// delta is not applied.
    Wrap,
    /// Stop auto-advance and stay on the last example.
    Hold,
}

pub trait Lesson {
    type Example;
    type State: Clone;

    fn initial_state(&self) -> Self::State;

    fn apply(&self, example: &Self::Example, state: &mut Self::State);

    fn end_policy(&self) -> EndPolicy {
        EndPolicy::Wrap
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Mode {
    Idle,
    AutoAdvancing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Advanced { from: usize, to: usize },
    Wrapped,
    Held,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlaybackError {
    #[error("manual stepping is disabled while auto-advance is running")]
    AutoAdvanceActive,
    #[error("already showing the last example")]
    AtEnd,
}

/// Allowed auto-advance interval range, quantized to `step_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpeedBounds {
    pub min_ms: u32,
    pub max_ms: u32,
    pub step_ms: u32,
}

impl SpeedBounds {
    pub const fn new(min_ms: u32, max_ms: u32, step_ms: u32) -> Self {
        Self {
            min_ms,
            max_ms,
            step_ms,
        }
    }

    /// Clamp into `[min_ms, max_ms]` and snap to the nearest step above `min_ms`.
    pub fn clamp(&self, ms: u32) -> u32 {
        let (min, max) = if self.min_ms <= self.max_ms {
            (self.min_ms, self.max_ms)
        } else {
            (self.max_ms, self.min_ms)
        };
        let step = u64::from(self.step_ms.max(1));
        let offset = u64::from(ms.clamp(min, max) - min);
        let snapped = u64::from(min) + (offset + step / 2) / step * step;
        snapped.min(u64::from(max)) as u32
    }
}

impl Default for SpeedBounds {
    fn default() -> Self {
        Self::new(500, 5000, 500)
    }
}

/// Read-only view of the controller for presentation surfaces.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PlaybackSnapshot {
    pub catalog: String,
    pub position: usize,
    pub len: usize,
    pub mode: Mode,
    pub interval_ms: u32,
    pub bounds: SpeedBounds,
    pub progress: f32,
}

pub struct Playback<L: Lesson, S: Scheduler> {
    lesson: L,
    catalog: Arc<Catalog<L::Example>>,
    state: L::State,
    position: usize,
    interval_ms: u32,
    bounds: SpeedBounds,
    scheduler: S,
    timer: Option<TimerGuard<S::Handle>>,
}

impl<L: Lesson, S: Scheduler> Playback<L, S> {
    pub fn new(
        lesson: L,
        catalog: Arc<Catalog<L::Example>>,
        bounds: SpeedBounds,
        interval_ms: u32,
        scheduler: S,
    ) -> Self {
        let state = lesson.initial_state();
        Self {
            lesson,
            catalog,
            state,
            position: 0,
            interval_ms: bounds.clamp(interval_ms),
            bounds,
            scheduler,
            timer: None,
        }
    }

    pub fn lesson(&self) -> &L {
        &self.lesson
    }

    pub fn catalog(&self) -> &Catalog<L::Example> {
        &self.catalog
    }

    pub fn state(&self) -> &L::State {
        &self.state
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    pub fn current(&self) -> &L::Example {
        self.catalog.get(self.position)
    }

    pub fn mode(&self) -> Mode {
        if self.timer.is_some() {
            Mode::AutoAdvancing
        } else {
            Mode::Idle
        }
    }

    pub fn is_auto(&self) -> bool {
        self.timer.is_some()
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    pub fn bounds(&self) -> SpeedBounds {
        self.bounds
    }

    /// Token of the live timer, if auto-advancing.
    pub fn active_token(&self) -> Option<TickToken> {
        self.timer.as_ref().map(|t| t.token())
    }

    /// Fraction of the sequence reached, counting the current example.
    pub fn progress(&self) -> f32 {
        (self.position + 1) as f32 / self.catalog.len() as f32
    }

    /// Whether the manual "next" control is enabled.
    pub fn can_step_manually(&self) -> bool {
        if self.is_auto() {
            return false;
        }
        !(self.lesson.end_policy() == EndPolicy::Hold
            && self.position == self.catalog.last_index())
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            catalog: self.catalog.name().to_string(),
            position: self.position,
            len: self.catalog.len(),
            mode: self.mode(),
            interval_ms: self.interval_ms,
            bounds: self.bounds,
            progress: self.progress(),
        }
    }

    /// Advance by one example, applying the current example's delta.
    pub fn step(&mut self) -> StepOutcome {
        let from = self.position;
        if from < self.catalog.last_index() {
            self.lesson.apply(self.catalog.get(from), &mut self.state);
            self.position = from + 1;
            return StepOutcome::Advanced {
                from,
                to: self.position,
            };
        }

        self.stop_timer();
        match self.lesson.end_policy() {
            EndPolicy::Wrap => {
                self.position = 0;
                StepOutcome::Wrapped
            }
            EndPolicy::Hold => StepOutcome::Held,
        }
    }

    /// `step()` behind the same guard as the "next" control.
    pub fn manual_step(&mut self) -> Result<StepOutcome, PlaybackError> {
        if self.is_auto() {
            return Err(PlaybackError::AutoAdvanceActive);
        }
        if !self.can_step_manually() {
            return Err(PlaybackError::AtEnd);
        }
        Ok(self.step())
    }

    /// Timer entry point. Fires from any timer other than the live one are dropped.
    pub fn on_tick(&mut self, token: TickToken) -> Option<StepOutcome> {
        if self.active_token() != Some(token) {
            return None;
        }
        Some(self.step())
    }

    pub fn toggle_auto(&mut self) -> Mode {
        if self.timer.is_some() {
            self.stop_timer();
        } else {
            self.start_timer();
        }
        self.mode()
    }

    pub fn reset(&mut self) {
        self.stop_timer();
        self.position = 0;
        self.state = self.lesson.initial_state();
    }

    /// Clamp `ms` into the configured bounds and use it for future ticks.
    /// A running timer is restarted with the new interval.
    pub fn set_speed(&mut self, ms: u32) -> u32 {
        self.interval_ms = self.bounds.clamp(ms);
        if self.timer.is_some() {
            self.stop_timer();
            self.start_timer();
        }
        self.interval_ms
    }

    fn start_timer(&mut self) {
        let interval = Duration::from_millis(u64::from(self.interval_ms));
        self.timer = Some(TimerGuard::acquire(&mut self.scheduler, interval));
    }

    fn stop_timer(&mut self) {
        // Dropping the guard cancels the timer.
        self.timer = None;
    }
}
