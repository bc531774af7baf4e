//! "Word Patterns": the same words shown two ways.
//!
//! The simplified view has four readable features. The realistic view has
//! many unlabeled values in [-1, 1]. Each example overwrites the focus word in
//! both views; the realistic vector is drawn independently per example, so it
//! is display data rather than something that evolves.

use super::{SentenceExample, INITIAL_VALUE};
use crate::catalog::Catalog;
use crate::config::VizConfig;
use crate::display::{Delta, DeltaError, WordVectors, VOCABULARY};
use crate::playback::{Lesson, Playback};
use crate::prng::Prng;
use crate::scheduler::Scheduler;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const SIMPLIFIED_DIMS: usize = 4;

/// Display precision of realistic values.
pub const REALISTIC_DECIMALS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum View {
    #[default]
    Simplified,
    Realistic,
}

impl View {
    pub fn toggled(self) -> Self {
        match self {
            View::Simplified => View::Realistic,
            View::Realistic => View::Simplified,
        }
    }

    /// Label of the button that switches away from this view.
    pub fn toggle_label(self) -> &'static str {
        match self {
            View::Simplified => "Show Realistic View",
            View::Realistic => "Show Simplified View",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PatternExample {
    pub text: SentenceExample,
    /// Overwrites for the realistic view, parallel to `text.delta`.
    pub realistic: Delta,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PatternsState {
    pub simplified: WordVectors,
    pub realistic: WordVectors,
}

impl PatternsState {
    pub fn view(&self, view: View) -> &WordVectors {
        match view {
            View::Simplified => &self.simplified,
            View::Realistic => &self.realistic,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PatternsLesson {
    initial: PatternsState,
}

impl PatternsLesson {
    pub fn new(prng: &mut Prng, realistic_dims: usize) -> Self {
        let rows = VOCABULARY
            .iter()
            .map(|_| realistic_vector(prng, realistic_dims))
            .collect();
        let realistic = match WordVectors::from_rows(&VOCABULARY, rows) {
            Ok(v) => v,
            // One generated row per vocabulary word, all of the same length.
            Err(_) => WordVectors::uniform(&VOCABULARY, realistic_dims, 0.0),
        };
        Self {
            initial: PatternsState {
                simplified: WordVectors::uniform(&VOCABULARY, SIMPLIFIED_DIMS, INITIAL_VALUE),
                realistic,
            },
        }
    }

    pub fn realistic_dims(&self) -> usize {
        self.initial.realistic.dims()
    }

    pub fn check(&self, example: &PatternExample) -> Result<(), DeltaError> {
        self.initial.simplified.check(&example.text.delta)?;
        self.initial.realistic.check(&example.realistic)
    }
}

impl Lesson for PatternsLesson {
    type Example = PatternExample;
    type State = PatternsState;

    fn initial_state(&self) -> PatternsState {
        self.initial.clone()
    }

    fn apply(&self, example: &PatternExample, state: &mut PatternsState) {
        state.simplified.apply(&example.text.delta);
        state.realistic.apply(&example.realistic);
    }
}

fn realistic_vector(prng: &mut Prng, dims: usize) -> Vec<f32> {
    prng.vector(dims, -1.0, 1.0, REALISTIC_DECIMALS)
}

const SCRIPT: [(&str, &str, &str, Option<[f32; SIMPLIFIED_DIMS]>); 5] = [
    (
        "The cat chases the mouse",
        "cat",
        "Cats score high on living thing and movement",
        Some([0.8, 0.3, 0.9, 0.2]),
    ),
    (
        "The dog barks at the cat",
        "dog",
        "Dogs end up close to cats: both are active living things",
        Some([0.8, 0.4, 0.7, 0.2]),
    ),
    (
        "The red car drives fast",
        "car",
        "Cars move but are clearly objects",
        Some([0.1, 0.6, 0.8, 0.9]),
    ),
    (
        "The book sits on the shelf",
        "book",
        "Books are still objects, far from both animals",
        Some([0.1, 0.3, 0.1, 0.9]),
    ),
    (
        "Similar words end up with similar patterns",
        "cat",
        "The real numbers have no individual meaning - they work together to form patterns",
        None,
    ),
];

/// Build the catalog once per panel activation. Realistic overwrites are
/// drawn from `prng` here and never change afterwards.
pub fn catalog(prng: &mut Prng, realistic_dims: usize) -> Catalog<PatternExample> {
    let examples = SCRIPT
        .iter()
        .map(|&(sentence, focus, explanation, values)| {
            let (delta, realistic) = match values {
                Some(values) => (
                    Delta::new().with(focus, values),
                    Delta::new().with(focus, realistic_vector(prng, realistic_dims)),
                ),
                None => (Delta::new(), Delta::new()),
            };
            PatternExample {
                text: SentenceExample {
                    sentence,
                    focus,
                    explanation,
                    delta,
                },
                realistic,
            }
        })
        .collect();
    Catalog::from_static("patterns", examples)
}

pub type PatternsPlayback<S> = Playback<PatternsLesson, S>;

/// Playback plus the view toggle. The toggle never touches playback state.
pub struct PatternsPanel<S: Scheduler> {
    playback: PatternsPlayback<S>,
    view: View,
}

impl<S: Scheduler> PatternsPanel<S> {
    pub fn new(cfg: &VizConfig, prng: &mut Prng, scheduler: S) -> Self {
        let lesson = PatternsLesson::new(prng, cfg.realistic_dims);
        let catalog = Arc::new(catalog(prng, cfg.realistic_dims));
        Self {
            playback: Playback::new(
                lesson,
                catalog,
                cfg.speed,
                cfg.patterns_interval_ms,
                scheduler,
            ),
            view: View::default(),
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn toggle_view(&mut self) -> View {
        self.view = self.view.toggled();
        self.view
    }

    /// Vectors of the view currently selected.
    pub fn visible(&self) -> &WordVectors {
        self.playback.state().view(self.view)
    }

    pub fn playback(&self) -> &PatternsPlayback<S> {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut PatternsPlayback<S> {
        &mut self.playback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::StepOutcome;
    use crate::scheduler::ManualScheduler;

    fn panel() -> (PatternsPanel<ManualScheduler>, ManualScheduler) {
        let clock = ManualScheduler::new();
        let mut prng = Prng::new(11);
        (
            PatternsPanel::new(&VizConfig::default(), &mut prng, clock.clone()),
            clock,
        )
    }

    #[test]
    fn catalog_is_valid() {
        let mut prng = Prng::new(1);
        let lesson = PatternsLesson::new(&mut prng, 50);
        let c = catalog(&mut prng, 50);
        for e in c.iter() {
            lesson.check(e).unwrap();
        }
        assert_eq!(lesson.realistic_dims(), 50);
    }

    #[test]
    fn realistic_values_are_bounded() {
        let (p, _) = panel();
        for (_, v) in p.playback().state().realistic.iter() {
            assert_eq!(v.len(), 50);
            assert!(v.iter().all(|x| (-1.0..=1.0).contains(x)));
        }
    }

    #[test]
    fn step_overwrites_both_views() {
        let (mut p, _) = panel();
        let before = p.playback().state().realistic.get("cat").map(<[f32]>::to_vec);
        p.playback_mut().step();
        let s = p.playback().state();
        assert_eq!(s.simplified.get("cat"), Some(&[0.8, 0.3, 0.9, 0.2][..]));
        assert_ne!(s.realistic.get("cat").map(<[f32]>::to_vec), before);
        assert_eq!(
            s.realistic.get("cat"),
            p.playback().catalog().get(0).realistic.get("cat")
        );
    }

    #[test]
    fn full_pass_reaches_learned_patterns() {
        let (mut p, _) = panel();
        while p.playback().position() < p.playback().catalog().last_index() {
            p.playback_mut().step();
        }
        let s = &p.playback().state().simplified;
        assert_eq!(s.get("dog"), Some(&[0.8, 0.4, 0.7, 0.2][..]));
        assert_eq!(s.get("book"), Some(&[0.1, 0.3, 0.1, 0.9][..]));
        assert_eq!(p.playback_mut().step(), StepOutcome::Wrapped);
    }

    #[test]
    fn view_toggle_leaves_playback_alone() {
        let (mut p, _) = panel();
        p.playback_mut().step();
        p.playback_mut().toggle_auto();
        let position = p.playback().position();

        assert_eq!(p.toggle_view(), View::Realistic);
        assert_eq!(p.visible().dims(), 50);
        assert_eq!(p.toggle_view(), View::Simplified);
        assert_eq!(p.visible().dims(), 4);

        assert_eq!(p.playback().position(), position);
        assert!(p.playback().is_auto());
    }

    #[test]
    fn reset_restores_both_views() {
        let (mut p, _) = panel();
        let initial = p.playback().lesson().initial_state();
        p.playback_mut().step();
        p.playback_mut().step();
        assert_ne!(p.playback().state(), &initial);

        p.playback_mut().reset();
        assert_eq!(p.playback().state(), &initial);
        assert_eq!(p.playback().state().realistic.dims(), 50);
        assert_eq!(
            p.playback().state().simplified.get("cat"),
            Some(&[0.1; 4][..])
        );
    }

    #[test]
    fn same_seed_same_realistic_data() {
        let mut a = Prng::new(5);
        let mut b = Prng::new(5);
        let ca = catalog(&mut a, 8);
        let cb = catalog(&mut b, 8);
        assert_eq!(ca.all(), cb.all());
    }
}
