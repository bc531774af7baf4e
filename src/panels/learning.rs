//! "How AI Learns Word Meanings": eighteen scripted sentences, each
//! overwriting the focus word's four feature values.

use super::{SentenceExample, INITIAL_VALUE};
use crate::catalog::Catalog;
use crate::config::VizConfig;
use crate::display::{Delta, WordVectors, VOCABULARY};
use crate::playback::{Lesson, Playback};
use crate::scheduler::Scheduler;
use std::sync::{Arc, OnceLock};

pub const DIMS: usize = 4;

#[derive(Debug, Clone, Copy, Default)]
pub struct LearningLesson;

impl Lesson for LearningLesson {
    type Example = SentenceExample;
    type State = WordVectors;

    fn initial_state(&self) -> WordVectors {
        WordVectors::uniform(&VOCABULARY, DIMS, INITIAL_VALUE)
    }

    fn apply(&self, example: &SentenceExample, state: &mut WordVectors) {
        state.apply(&example.delta);
    }
}

pub type LearningPlayback<S> = Playback<LearningLesson, S>;

pub fn playback<S: Scheduler>(cfg: &VizConfig, scheduler: S) -> LearningPlayback<S> {
    Playback::new(
        LearningLesson,
        catalog(),
        cfg.speed,
        cfg.learning_interval_ms,
        scheduler,
    )
}

fn example(
    sentence: &'static str,
    focus: &'static str,
    explanation: &'static str,
    values: [f32; DIMS],
) -> SentenceExample {
    SentenceExample {
        sentence,
        focus,
        explanation,
        delta: Delta::new().with(focus, values),
    }
}

/// The shared, process-wide learning catalog.
pub fn catalog() -> Arc<Catalog<SentenceExample>> {
    static CATALOG: OnceLock<Arc<Catalog<SentenceExample>>> = OnceLock::new();
    Arc::clone(CATALOG.get_or_init(|| Arc::new(build())))
}

fn build() -> Catalog<SentenceExample> {
    let examples = vec![
        example(
            "The cat sleeps on the mat",
            "cat",
            "First, the AI sees a simple action - it learns cats are things that can rest",
            [0.6, 0.3, 0.2, 0.2],
        ),
        example(
            "The cat drinks milk",
            "cat",
            "Now it sees cats can do actions by themselves - this means they're living things",
            [0.7, 0.3, 0.4, 0.2],
        ),
        example(
            "The cat chases the mouse",
            "cat",
            "This shows cats can move quickly and interact with other animals",
            [0.8, 0.3, 0.9, 0.2],
        ),
        example(
            "The dog barks at the cat",
            "dog",
            "Dogs, like cats, are living things that make sounds",
            [0.8, 0.4, 0.7, 0.2],
        ),
        example(
            "The red car drives fast",
            "car",
            "Cars are non-living objects that move",
            [0.1, 0.6, 0.8, 0.9],
        ),
        example(
            "The book sits on the shelf",
            "book",
            "Books are still objects that don't move on their own",
            [0.1, 0.3, 0.1, 0.9],
        ),
        example(
            "The cat sleeps in the sun",
            "cat",
            "Cats are living things that rest and relax",
            [0.9, 0.3, 0.2, 0.2],
        ),
        example(
            "The dog plays with the ball",
            "dog",
            "Dogs are active living things that interact with objects",
            [0.9, 0.4, 0.8, 0.2],
        ),
        example(
            "The car sits in the garage",
            "car",
            "Cars can be stationary but are still objects",
            [0.1, 0.6, 0.2, 0.9],
        ),
        example(
            "The book teaches about history",
            "book",
            "Books contain information but are non-living objects",
            [0.1, 0.3, 0.1, 1.0],
        ),
        example(
            "The cat purrs quietly",
            "cat",
            "Cats are living things that make gentle sounds",
            [0.9, 0.3, 0.3, 0.2],
        ),
        example(
            "The dog guards the house",
            "dog",
            "Dogs are living things with purposeful behaviors",
            [0.9, 0.4, 0.6, 0.2],
        ),
        example(
            "The car breaks down",
            "car",
            "Cars are objects that can malfunction",
            [0.1, 0.6, 0.3, 0.9],
        ),
        example(
            "The book falls off the table",
            "book",
            "Books can move, but only when acted upon",
            [0.1, 0.3, 0.4, 0.9],
        ),
        example(
            "The cat hunts at night",
            "cat",
            "Cats are living things with predatory behavior",
            [0.9, 0.3, 0.8, 0.2],
        ),
        example(
            "The dog sniffs the ground",
            "dog",
            "Dogs are living things that explore with senses",
            [0.9, 0.4, 0.5, 0.2],
        ),
        example(
            "The car needs repairs",
            "car",
            "Cars are complex objects requiring maintenance",
            [0.1, 0.6, 0.1, 1.0],
        ),
        example(
            "The book opens to page one",
            "book",
            "Books are objects with specific functions",
            [0.1, 0.3, 0.2, 0.9],
        ),
    ];
    Catalog::from_static("learning", examples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::{Mode, StepOutcome};
    use crate::scheduler::ManualScheduler;

    fn fresh() -> (LearningPlayback<ManualScheduler>, ManualScheduler) {
        let clock = ManualScheduler::new();
        (playback(&VizConfig::default(), clock.clone()), clock)
    }

    #[test]
    fn catalog_is_valid() {
        let initial = LearningLesson.initial_state();
        let c = Catalog::new("learning", catalog().all().to_vec())
            .unwrap()
            .validate_with(|e| initial.check(&e.delta))
            .unwrap();
        assert_eq!(c.len(), 18);
        for e in c.iter() {
            assert_eq!(e.delta.words().collect::<Vec<_>>(), vec![e.focus]);
        }
    }

    #[test]
    fn catalog_is_shared() {
        assert!(Arc::ptr_eq(&catalog(), &catalog()));
    }

    #[test]
    fn first_example_sets_cat() {
        let (mut p, _) = fresh();
        assert_eq!(p.state().get("cat"), Some(&[0.1; 4][..]));
        p.step();
        assert_eq!(p.position(), 1);
        assert_eq!(p.state().get("cat"), Some(&[0.6, 0.3, 0.2, 0.2][..]));
        assert_eq!(p.state().get("dog"), Some(&[0.1; 4][..]));
    }

    #[test]
    fn every_step_overwrites_only_its_focus() {
        let (mut p, _) = fresh();
        for i in 0..p.len() - 1 {
            let before = p.state().clone();
            let focus = p.current().focus;
            p.step();
            assert_eq!(p.position(), i + 1);
            for (word, v) in p.state().iter() {
                if word == focus {
                    assert_eq!(Some(v), catalog().get(i).delta.get(word));
                } else {
                    assert_eq!(Some(v), before.get(word));
                }
            }
        }
    }

    #[test]
    fn full_pass_wraps_without_last_delta() {
        let (mut p, _) = fresh();
        for _ in 0..17 {
            p.step();
        }
        let before = p.state().clone();
        assert_eq!(p.step(), StepOutcome::Wrapped);
        assert_eq!(p.position(), 0);
        assert_eq!(p.state(), &before);
        assert_eq!(p.state().get("book"), Some(&[0.1, 0.3, 0.4, 0.9][..]));
    }

    #[test]
    fn auto_learn_runs_to_the_end() {
        let (mut p, clock) = fresh();
        p.toggle_auto();
        let mut steps = 0;
        while p.is_auto() {
            for token in clock.advance(u64::from(p.interval_ms())) {
                if p.on_tick(token).is_some() {
                    steps += 1;
                }
            }
        }
        assert_eq!(steps, 18);
        assert_eq!(p.position(), 0);
        assert_eq!(p.mode(), Mode::Idle);
        assert_eq!(clock.live_timers(), 0);
    }

    #[test]
    fn reset_restores_initial_vectors() {
        let (mut p, clock) = fresh();
        for _ in 0..5 {
            p.step();
        }
        p.toggle_auto();
        p.reset();
        assert_eq!(p.state(), &LearningLesson.initial_state());
        assert_eq!(p.position(), 0);
        assert_eq!(clock.live_timers(), 0);
    }
}
