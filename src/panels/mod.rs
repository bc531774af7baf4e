//! The concrete panels.
//!
//! Each playback panel pairs a fixed catalog with a [`Lesson`](crate::playback::Lesson)
//! and reuses the generic controller. The token initialization panel has no
//! playback; it only regenerates random values on request.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod learning;
pub mod patterns;
pub mod processing;
pub mod tokens;

/// Names of the four simplified feature dimensions.
pub const PATTERN_LABELS: [&str; 4] = ["Living Thing", "Size", "Movement", "Object-like"];

/// Value every simplified feature starts from before any example.
pub const INITIAL_VALUE: f32 = 0.1;

/// One sentence-driven step shared by the learning and patterns panels.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SentenceExample {
    pub sentence: &'static str,
    pub focus: &'static str,
    pub explanation: &'static str,
    pub delta: crate::display::Delta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PanelKind {
    Learning,
    Patterns,
    Processing,
    Tokens,
}

impl PanelKind {
    pub const ALL: [PanelKind; 4] = [
        PanelKind::Learning,
        PanelKind::Patterns,
        PanelKind::Processing,
        PanelKind::Tokens,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PanelKind::Learning => "learning",
            PanelKind::Patterns => "patterns",
            PanelKind::Processing => "processing",
            PanelKind::Tokens => "tokens",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            PanelKind::Learning => "How AI Learns Word Meanings",
            PanelKind::Patterns => "Word Patterns",
            PanelKind::Processing => "How Words Become Numbers",
            PanelKind::Tokens => "Understanding Token Initialization",
        }
    }

    pub fn has_playback(self) -> bool {
        !matches!(self, PanelKind::Tokens)
    }
}

impl fmt::Display for PanelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PanelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        PanelKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| format!("unknown panel `{s}` (expected learning|patterns|processing|tokens)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_names_round_trip() {
        for kind in PanelKind::ALL {
            assert_eq!(kind.name().parse::<PanelKind>(), Ok(kind));
        }
        assert_eq!(" Tokens ".parse::<PanelKind>(), Ok(PanelKind::Tokens));
        assert!("intro".parse::<PanelKind>().is_err());
    }
}
