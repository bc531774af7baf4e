//! Values computed from the display state and the current example.
//!
//! Nothing here is cached. Callers recompute on every render.

use crate::display::WordVectors;
use hashbrown::HashMap;
use std::fmt;
use std::sync::OnceLock;

#[cfg(feature = "serde")]
use serde::Serialize;

/// `1 - mean absolute difference`. Identical vectors score exactly 1.
///
/// Both slices are expected to have the same length; extra values in the
/// longer one are ignored.
pub fn similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    let len = a.len().min(b.len());
    if len == 0 {
        return 1.0;
    }
    let distance: f32 = a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum();
    1.0 - distance / len as f32
}

/// Similarity of two vocabulary words in `state`.
pub fn word_similarity(state: &WordVectors, a: &str, b: &str) -> Option<f32> {
    Some(similarity(state.get(a)?, state.get(b)?))
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Hsl {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({}, {}%, {}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

/// Darker for more similar words: lightness runs from 100% down to 50%.
pub fn relationship_color(similarity: f32) -> Hsl {
    Hsl {
        hue: 200.0,
        saturation: 70.0,
        lightness: 100.0 - similarity * 50.0,
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RelationCell {
    pub a: &'static str,
    pub b: &'static str,
    pub similarity: f32,
    pub color: Hsl,
    /// Self-pairs are faded.
    pub opacity: f32,
}

/// Every ordered word pair, row-major in vocabulary order.
pub fn relationship_grid(state: &WordVectors) -> Vec<RelationCell> {
    let mut cells = Vec::with_capacity(state.len() * state.len());
    for (a, va) in state.iter() {
        for (b, vb) in state.iter() {
            let s = similarity(va, vb);
            cells.push(RelationCell {
                a,
                b,
                similarity: s,
                color: relationship_color(s),
                opacity: if a == b { 0.3 } else { 1.0 },
            });
        }
    }
    cells
}

/// Plain-language reading of a feature value.
pub fn strength_label(v: f32) -> &'static str {
    match v {
        v if v < 0.2 => "very low",
        v if v < 0.4 => "low",
        v if v < 0.6 => "medium",
        v if v < 0.8 => "high",
        _ => "very high",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Role {
    /// The focus word comes before the verb.
    Subject,
    /// The focus word comes after the verb.
    Object,
    Absent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum ActionKind {
    Rest,
    Motion,
    Sound,
    Consumption,
    Perception,
    Information,
    Malfunction,
    Other,
}

impl ActionKind {
    pub fn label(self) -> &'static str {
        match self {
            ActionKind::Rest => "resting",
            ActionKind::Motion => "moving",
            ActionKind::Sound => "making a sound",
            ActionKind::Consumption => "consuming",
            ActionKind::Perception => "sensing",
            ActionKind::Information => "carrying information",
            ActionKind::Malfunction => "needing repair",
            ActionKind::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Agency {
    /// The focus word starts the action itself.
    SelfDirected,
    ActedUpon,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Interaction {
    None,
    Living(&'static str),
    Thing(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Annotation {
    pub role: Role,
    pub verb: Option<&'static str>,
    pub action: ActionKind,
    pub agency: Agency,
    pub interaction: Interaction,
}

struct Verb {
    kind: ActionKind,
    self_initiated: bool,
}

fn verbs() -> &'static HashMap<&'static str, Verb> {
    static VERBS: OnceLock<HashMap<&'static str, Verb>> = OnceLock::new();
    VERBS.get_or_init(|| {
        use ActionKind::*;
        [
            ("sleeps", Rest, true),
            ("rests", Rest, true),
            ("sits", Rest, false),
            ("chases", Motion, true),
            ("plays", Motion, true),
            ("hunts", Motion, true),
            ("runs", Motion, true),
            ("drives", Motion, false),
            ("falls", Motion, false),
            ("barks", Sound, true),
            ("purrs", Sound, true),
            ("drinks", Consumption, true),
            ("eats", Consumption, true),
            ("sniffs", Perception, true),
            ("guards", Other, true),
            ("teaches", Information, false),
            ("opens", Information, false),
            ("breaks", Malfunction, false),
            ("needs", Malfunction, false),
        ]
        .into_iter()
        .map(|(word, kind, self_initiated)| {
            (
                word,
                Verb {
                    kind,
                    self_initiated,
                },
            )
        })
        .collect()
    })
}

/// Known nouns and whether they are living things.
fn nouns() -> &'static HashMap<&'static str, bool> {
    static NOUNS: OnceLock<HashMap<&'static str, bool>> = OnceLock::new();
    NOUNS.get_or_init(|| {
        [
            ("cat", true),
            ("dog", true),
            ("mouse", true),
            ("car", false),
            ("book", false),
            ("mat", false),
            ("milk", false),
            ("shelf", false),
            ("sun", false),
            ("ball", false),
            ("garage", false),
            ("history", false),
            ("house", false),
            ("table", false),
            ("ground", false),
            ("page", false),
            ("repairs", false),
        ]
        .into_iter()
        .collect()
    })
}

fn tokens(sentence: &str) -> Vec<String> {
    sentence
        .split_whitespace()
        .map(|t| {
            t.trim_matches(|c: char| !c.is_alphanumeric())
                .to_ascii_lowercase()
        })
        .filter(|t| !t.is_empty())
        .collect()
}

/// Categorical labels for the focus word of a sentence.
///
/// Pure lookups against fixed tables: the same input always gives the same
/// labels.
pub fn annotate(sentence: &str, focus: &str) -> Annotation {
    let words = tokens(sentence);
    let focus = focus.to_ascii_lowercase();
    let focus_at = words.iter().position(|w| *w == focus);

    let verb_at = words.iter().enumerate().find_map(|(i, w)| {
        verbs()
            .get_key_value(w.as_str())
            .map(|(key, verb)| (i, *key, verb))
    });

    let role = match (focus_at, verb_at) {
        (None, _) => Role::Absent,
        (Some(f), Some((v, _, _))) if f > v => Role::Object,
        (Some(_), _) => Role::Subject,
    };

    let action = verb_at.map_or(ActionKind::Other, |(_, _, v)| v.kind);
    let agency = match (role, verb_at) {
        (Role::Subject, Some((_, _, v))) if v.self_initiated => Agency::SelfDirected,
        (Role::Subject, Some(_)) | (Role::Object, _) => Agency::ActedUpon,
        _ => Agency::Unknown,
    };

    // Objects interact with whoever acts on them, subjects with what follows the verb.
    let partners = match (role, verb_at) {
        (Role::Object, Some((v, _, _))) => &words[..v],
        (_, Some((v, _, _))) => &words[v + 1..],
        (_, None) => &words[..],
    };
    let interaction = partners
        .iter()
        .filter(|w| **w != focus)
        .find_map(|w| nouns().get_key_value(w.as_str()))
        .map_or(Interaction::None, |(noun, living)| {
            if *living {
                Interaction::Living(*noun)
            } else {
                Interaction::Thing(*noun)
            }
        });

    Annotation {
        role,
        verb: verb_at.map(|(_, key, _)| key),
        action,
        agency,
        interaction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{Delta, VOCABULARY};

    fn learned_state() -> WordVectors {
        let mut s = WordVectors::uniform(&VOCABULARY, 4, 0.1);
        s.apply(
            &Delta::new()
                .with("cat", [0.8, 0.3, 0.9, 0.2])
                .with("dog", [0.8, 0.4, 0.7, 0.2])
                .with("car", [0.1, 0.6, 0.8, 0.9])
                .with("book", [0.1, 0.3, 0.1, 0.9]),
        );
        s
    }

    #[test]
    fn similarity_is_symmetric_and_reflexive() {
        let s = learned_state();
        for a in VOCABULARY {
            assert_eq!(word_similarity(&s, a, a), Some(1.0));
            for b in VOCABULARY {
                assert_eq!(word_similarity(&s, a, b), word_similarity(&s, b, a));
            }
        }
    }

    #[test]
    fn animals_closer_than_objects() {
        let s = learned_state();
        let cat_dog = word_similarity(&s, "cat", "dog").unwrap();
        let cat_book = word_similarity(&s, "cat", "book").unwrap();
        assert!(cat_dog > cat_book);
        assert!((cat_dog - 0.925).abs() < 1e-5);
    }

    #[test]
    fn color_darkens_with_similarity() {
        assert_eq!(relationship_color(1.0).lightness, 50.0);
        assert_eq!(relationship_color(0.0).lightness, 100.0);
        assert_eq!(relationship_color(0.5).to_string(), "hsl(200, 70%, 75%)");
    }

    #[test]
    fn grid_covers_every_pair() {
        let grid = relationship_grid(&learned_state());
        assert_eq!(grid.len(), 16);
        let diagonal: Vec<_> = grid.iter().filter(|c| c.a == c.b).collect();
        assert_eq!(diagonal.len(), 4);
        assert!(diagonal.iter().all(|c| c.opacity == 0.3 && c.similarity == 1.0));
    }

    #[test]
    fn strength_labels() {
        assert_eq!(strength_label(0.1), "very low");
        assert_eq!(strength_label(0.3), "low");
        assert_eq!(strength_label(0.5), "medium");
        assert_eq!(strength_label(0.7), "high");
        assert_eq!(strength_label(0.9), "very high");
    }

    #[test]
    fn annotate_subject_chasing() {
        let a = annotate("The cat chases the mouse", "cat");
        assert_eq!(a.role, Role::Subject);
        assert_eq!(a.verb, Some("chases"));
        assert_eq!(a.action, ActionKind::Motion);
        assert_eq!(a.agency, Agency::SelfDirected);
        assert_eq!(a.interaction, Interaction::Living("mouse"));
    }

    #[test]
    fn annotate_object_position() {
        let a = annotate("The dog barks at the cat", "cat");
        assert_eq!(a.role, Role::Object);
        assert_eq!(a.agency, Agency::ActedUpon);
        assert_eq!(a.interaction, Interaction::Living("dog"));

        let d = annotate("The dog barks at the cat", "dog");
        assert_eq!(d.role, Role::Subject);
        assert_eq!(d.action, ActionKind::Sound);
        assert_eq!(d.interaction, Interaction::Living("cat"));
    }

    #[test]
    fn annotate_passive_objects() {
        let a = annotate("The book falls off the table", "book");
        assert_eq!(a.agency, Agency::ActedUpon);
        assert_eq!(a.interaction, Interaction::Thing("table"));

        let c = annotate("The car breaks down", "car");
        assert_eq!(c.action, ActionKind::Malfunction);
        assert_eq!(c.interaction, Interaction::None);
    }

    #[test]
    fn annotate_missing_focus() {
        let a = annotate("The red car drives fast", "cat");
        assert_eq!(a.role, Role::Absent);
        assert_eq!(a.agency, Agency::Unknown);
    }

    #[test]
    fn annotate_is_deterministic() {
        let s = "The dog plays with the ball";
        assert_eq!(annotate(s, "dog"), annotate(s, "dog"));
    }
}
