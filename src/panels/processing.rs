//! "How Words Become Numbers": four phases from token ids to converged
//! patterns. Playback holds on the last phase instead of wrapping.

use crate::catalog::Catalog;
use crate::config::VizConfig;
use crate::display::{Delta, WordVectors, VOCABULARY};
use crate::playback::{EndPolicy, Lesson, Playback};
use crate::scheduler::Scheduler;
use std::sync::{Arc, OnceLock};

#[cfg(feature = "serde")]
use serde::Serialize;

pub const DIMS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum WordKind {
    Animal,
    Object,
}

impl WordKind {
    pub fn label(self) -> &'static str {
        match self {
            WordKind::Animal => "animal",
            WordKind::Object => "object",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "phase", rename_all = "snake_case"))]
pub enum PhaseContent {
    Tokenization {
        tokens: Vec<(&'static str, u32)>,
    },
    Initialization {
        values: Vec<(&'static str, [f32; DIMS])>,
    },
    Training {
        word: &'static str,
        context: &'static str,
        before: [f32; DIMS],
        after: [f32; DIMS],
    },
    Convergence {
        values: Vec<(&'static str, [f32; DIMS], WordKind)>,
    },
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Phase {
    pub title: &'static str,
    pub description: &'static str,
    pub content: PhaseContent,
}

impl Phase {
    /// The vectors this phase puts on screen, as overwrites.
    pub fn delta(&self) -> Delta {
        let mut delta = Delta::new();
        match &self.content {
            PhaseContent::Tokenization { .. } => {}
            PhaseContent::Initialization { values } => {
                for (word, v) in values {
                    delta.set(*word, *v);
                }
            }
            PhaseContent::Training { word, after, .. } => delta.set(*word, *after),
            PhaseContent::Convergence { values } => {
                for (word, v, _) in values {
                    delta.set(*word, *v);
                }
            }
        }
        delta
    }
}

/// Display state starts at zero and accumulates the vectors of every phase
/// already stepped past. The current phase's own values come from its content.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessingLesson;

impl Lesson for ProcessingLesson {
    type Example = Phase;
    type State = WordVectors;

    fn initial_state(&self) -> WordVectors {
        WordVectors::uniform(&VOCABULARY, DIMS, 0.0)
    }

    fn apply(&self, example: &Phase, state: &mut WordVectors) {
        state.apply(&example.delta());
    }

    fn end_policy(&self) -> EndPolicy {
        EndPolicy::Hold
    }
}

pub type ProcessingPlayback<S> = Playback<ProcessingLesson, S>;

pub fn playback<S: Scheduler>(cfg: &VizConfig, scheduler: S) -> ProcessingPlayback<S> {
    Playback::new(
        ProcessingLesson,
        catalog(),
        cfg.speed,
        cfg.processing_interval_ms,
        scheduler,
    )
}

pub fn catalog() -> Arc<Catalog<Phase>> {
    static CATALOG: OnceLock<Arc<Catalog<Phase>>> = OnceLock::new();
    Arc::clone(CATALOG.get_or_init(|| Arc::new(build())))
}

fn build() -> Catalog<Phase> {
    let phases = vec![
        Phase {
            title: "1. Word to Token",
            description: "Words are converted into unique numbers (tokens)",
            content: PhaseContent::Tokenization {
                tokens: vec![("cat", 3752), ("dog", 2743), ("car", 1982), ("book", 1036)],
            },
        },
        Phase {
            title: "2. Random Initialization",
            description: "Each token starts with random values",
            content: PhaseContent::Initialization {
                values: vec![
                    ("cat", [0.23, 0.15, 0.67, 0.42]),
                    ("dog", [0.31, 0.45, 0.12, 0.89]),
                    ("car", [0.56, 0.78, 0.34, 0.21]),
                    ("book", [0.44, 0.91, 0.23, 0.65]),
                ],
            },
        },
        Phase {
            title: "3. Training Process",
            description: "Values adjust based on how words are used",
            content: PhaseContent::Training {
                word: "cat",
                context: "The cat chases the mouse",
                before: [0.23, 0.15, 0.67, 0.42],
                after: [0.45, 0.20, 0.80, 0.30],
            },
        },
        Phase {
            title: "4. Pattern Emergence",
            description: "Similar words develop similar patterns",
            content: PhaseContent::Convergence {
                values: vec![
                    ("cat", [0.8, 0.3, 0.9, 0.2], WordKind::Animal),
                    ("dog", [0.8, 0.4, 0.7, 0.2], WordKind::Animal),
                    ("car", [0.1, 0.6, 0.8, 0.9], WordKind::Object),
                    ("book", [0.1, 0.3, 0.1, 0.9], WordKind::Object),
                ],
            },
        },
    ];
    Catalog::from_static("processing", phases)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::{Mode, PlaybackError, StepOutcome};
    use crate::scheduler::ManualScheduler;

    #[test]
    fn catalog_is_valid() {
        let initial = ProcessingLesson.initial_state();
        for phase in catalog().iter() {
            initial.check(&phase.delta()).unwrap();
        }
        assert_eq!(catalog().len(), 4);
    }

    #[test]
    fn phases_in_order() {
        let titles: Vec<_> = catalog().iter().map(|p| p.title).collect();
        assert_eq!(
            titles,
            vec![
                "1. Word to Token",
                "2. Random Initialization",
                "3. Training Process",
                "4. Pattern Emergence"
            ]
        );
    }

    #[test]
    fn default_interval_is_three_seconds() {
        let p = playback(&VizConfig::default(), ManualScheduler::new());
        assert_eq!(p.interval_ms(), 3000);
    }

    #[test]
    fn auto_play_holds_on_last_phase() {
        let clock = ManualScheduler::new();
        let mut p = playback(&VizConfig::default(), clock.clone());
        p.toggle_auto();
        let mut outcomes = Vec::new();
        for token in clock.advance(3000 * 6) {
            if let Some(o) = p.on_tick(token) {
                outcomes.push(o);
            }
        }
        assert_eq!(outcomes.last(), Some(&StepOutcome::Held));
        assert_eq!(p.position(), 3);
        assert_eq!(p.mode(), Mode::Idle);
        assert_eq!(clock.live_timers(), 0);
        assert_eq!(p.progress(), 1.0);
    }

    #[test]
    fn next_is_disabled_on_last_phase() {
        let mut p = playback(&VizConfig::default(), ManualScheduler::new());
        for _ in 0..3 {
            p.manual_step().unwrap();
        }
        assert!(!p.can_step_manually());
        assert_eq!(p.manual_step(), Err(PlaybackError::AtEnd));
        p.reset();
        assert!(p.can_step_manually());
        assert_eq!(p.position(), 0);
    }

    #[test]
    fn training_phase_overwrites_cat() {
        let mut p = playback(&VizConfig::default(), ManualScheduler::new());
        p.step();
        p.step();
        assert_eq!(p.state().get("dog"), Some(&[0.31, 0.45, 0.12, 0.89][..]));
        p.step();
        assert_eq!(p.state().get("cat"), Some(&[0.45, 0.20, 0.80, 0.30][..]));
        assert_eq!(p.state().get("dog"), Some(&[0.31, 0.45, 0.12, 0.89][..]));
    }
}
