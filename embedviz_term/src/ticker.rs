//! Tokio-backed timers for auto-advance.
//!
//! Each timer is a spawned task that pushes [`Tick`]s into the session's
//! channel. The main loop drains that channel on the same thread that handles
//! commands, so a tick never runs concurrently with a manual step.

use embedviz::panels::PanelKind;
use embedviz::scheduler::{Scheduler, TickToken, TimerHandle};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub panel: PanelKind,
    pub token: TickToken,
}

#[derive(Debug, Clone)]
pub struct TokioScheduler {
    panel: PanelKind,
    tx: UnboundedSender<Tick>,
}

impl TokioScheduler {
    pub fn new(panel: PanelKind, tx: UnboundedSender<Tick>) -> Self {
        Self { panel, tx }
    }
}

#[derive(Debug)]
pub struct TokioTimer {
    task: JoinHandle<()>,
}

impl Scheduler for TokioScheduler {
    type Handle = TokioTimer;

    fn every(&mut self, interval: Duration, token: TickToken) -> TokioTimer {
        let tx = self.tx.clone();
        let panel = self.panel;
        let interval = interval.max(Duration::from_millis(1));
        debug!(%panel, token = token.id(), ?interval, "timer started");
        let task = tokio::spawn(async move {
            let mut ticks = time::interval_at(time::Instant::now() + interval, interval);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                if tx.send(Tick { panel, token }).is_err() {
                    break;
                }
            }
        });
        TokioTimer { task }
    }
}

impl TimerHandle for TokioTimer {
    fn cancel(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedviz::scheduler::TimerGuard;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn fires_until_dropped() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut s = TokioScheduler::new(PanelKind::Learning, tx);
        let guard = TimerGuard::acquire(&mut s, Duration::from_millis(500));

        let first = rx.recv().await.unwrap();
        assert_eq!(first.token, guard.token());
        assert_eq!(first.panel, PanelKind::Learning);
        let second = rx.recv().await.unwrap();
        assert_eq!(second.token, guard.token());

        drop(guard);
        time::sleep(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn first_fire_waits_one_interval() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut s = TokioScheduler::new(PanelKind::Processing, tx);
        let _guard = TimerGuard::acquire(&mut s, Duration::from_millis(3000));

        time::sleep(Duration::from_millis(2999)).await;
        assert!(rx.try_recv().is_err());
        time::sleep(Duration::from_millis(2)).await;
        assert!(rx.try_recv().is_ok());
    }
}
