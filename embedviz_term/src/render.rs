//! Plain-text rendering of the panels.
//!
//! Every function recomputes from the current state; nothing is cached
//! between frames.

use embedviz::derived::{annotate, relationship_grid, strength_label, Interaction};
use embedviz::display::WordVectors;
use embedviz::panels::learning::LearningPlayback;
use embedviz::panels::patterns::{PatternsPanel, View};
use embedviz::panels::processing::{PhaseContent, ProcessingPlayback};
use embedviz::panels::tokens::{opacity, TokenInit};
use embedviz::panels::{PanelKind, SentenceExample, PATTERN_LABELS};
use embedviz::playback::{Mode, PlaybackSnapshot};
use embedviz::scheduler::Scheduler;
use std::fmt::Write;

const BAR_WIDTH: usize = 10;

/// Realistic vectors are cut to this many values per row.
const REALISTIC_PREVIEW: usize = 10;

pub fn bar(value: f32, width: usize) -> String {
    let filled = (value.clamp(0.0, 1.0) * width as f32).round() as usize;
    let mut s = "█".repeat(filled);
    s.push_str(&"░".repeat(width - filled));
    s
}

fn seconds(ms: u32) -> String {
    format!("{:.1}s", ms as f32 / 1000.0)
}

/// Button row for a playback panel. Disabled controls are shown in parentheses.
pub fn controls(snap: &PlaybackSnapshot, can_next: bool) -> String {
    let next = if can_next { "[Next]" } else { "(Next)" };
    let auto = match snap.mode {
        Mode::Idle => "[Auto Learn]",
        Mode::AutoAdvancing => "[Pause]",
    };
    format!(
        "{next} {auto} [Start Over]  speed {} ({}..{})  example {}/{}",
        seconds(snap.interval_ms),
        seconds(snap.bounds.min_ms),
        seconds(snap.bounds.max_ms),
        snap.position + 1,
        snap.len
    )
}

fn header(out: &mut String, kind: PanelKind) {
    let _ = writeln!(out, "== {} ==", kind.title());
}

fn feature_table(out: &mut String, state: &WordVectors) {
    let _ = writeln!(
        out,
        "       {}",
        PATTERN_LABELS
            .iter()
            .map(|l| format!("{l:<17}"))
            .collect::<String>()
            .trim_end()
    );
    for (word, values) in state.iter() {
        let cells: String = values
            .iter()
            .map(|&v| format!("{} {v:.1}    ", bar(v, BAR_WIDTH)))
            .collect();
        let _ = writeln!(out, "  {word:<5}{}", cells.trim_end());
    }
}

fn realistic_table(out: &mut String, state: &WordVectors) {
    for (word, values) in state.iter() {
        let shown: Vec<String> = values
            .iter()
            .take(REALISTIC_PREVIEW)
            .map(|v| format!("{v:+.3}"))
            .collect();
        let rest = values.len().saturating_sub(REALISTIC_PREVIEW);
        let more = if rest > 0 {
            format!(" (+{rest} more)")
        } else {
            String::new()
        };
        let _ = writeln!(out, "  {word:<5}{}{more}", shown.join(" "));
    }
}

fn relationships(out: &mut String, state: &WordVectors) {
    let _ = writeln!(out, "relationships:");
    let _ = writeln!(
        out,
        "        {}",
        state
            .words()
            .iter()
            .map(|w| format!("{w:<7}"))
            .collect::<String>()
            .trim_end()
    );
    let n = state.len();
    for row in relationship_grid(state).chunks(n.max(1)) {
        let cells: String = row
            .iter()
            .map(|c| {
                if c.a == c.b {
                    "  --   ".to_string()
                } else {
                    format!("{:.2}   ", c.similarity)
                }
            })
            .collect();
        let _ = writeln!(out, "  {:<6}{}", row[0].a, cells.trim_end());
    }
}

fn sentence(out: &mut String, ex: &SentenceExample) {
    let _ = writeln!(out, "\"{}\"  (focus: {})", ex.sentence, ex.focus);
    let _ = writeln!(out, "  {}", ex.explanation);
}

fn context(out: &mut String, ex: &SentenceExample) {
    let note = annotate(ex.sentence, ex.focus);
    let partner = match note.interaction {
        Interaction::None => "nothing else".to_string(),
        Interaction::Living(noun) => format!("{noun} (living)"),
        Interaction::Thing(noun) => format!("{noun} (thing)"),
    };
    let _ = writeln!(
        out,
        "  context: {:?}, {}, {:?}, interacts with {partner}",
        note.role,
        note.action.label(),
        note.agency
    );
}

pub fn learning<S: Scheduler>(p: &LearningPlayback<S>) -> String {
    let mut out = String::new();
    header(&mut out, PanelKind::Learning);
    let ex = p.current();
    sentence(&mut out, ex);
    context(&mut out, ex);
    feature_table(&mut out, p.state());
    relationships(&mut out, p.state());
    if let Some(cat) = p.state().get("cat") {
        let legend: Vec<String> = PATTERN_LABELS
            .iter()
            .zip(cat)
            .map(|(l, &v)| format!("{l}: {}", strength_label(v)))
            .collect();
        let _ = writeln!(out, "cat reads as {}", legend.join(", "));
    }
    out.push_str(&controls(&p.snapshot(), p.can_step_manually()));
    out
}

pub fn patterns<S: Scheduler>(panel: &PatternsPanel<S>) -> String {
    let mut out = String::new();
    header(&mut out, PanelKind::Patterns);
    let p = panel.playback();
    sentence(&mut out, &p.current().text);
    match panel.view() {
        View::Simplified => feature_table(&mut out, panel.visible()),
        View::Realistic => realistic_table(&mut out, panel.visible()),
    }
    let _ = writeln!(out, "[{}]", panel.view().toggle_label());
    out.push_str(&controls(&p.snapshot(), p.can_step_manually()));
    out
}

pub fn processing<S: Scheduler>(p: &ProcessingPlayback<S>) -> String {
    let mut out = String::new();
    header(&mut out, PanelKind::Processing);
    let phase = p.current();
    let _ = writeln!(
        out,
        "{} {:>3.0}%",
        bar(p.progress(), 20),
        p.progress() * 100.0
    );
    let _ = writeln!(out, "{}", phase.title);
    let _ = writeln!(out, "  {}", phase.description);
    match &phase.content {
        PhaseContent::Tokenization { tokens } => {
            for (word, id) in tokens {
                let _ = writeln!(out, "  {word:<5} -> token {id}");
            }
        }
        PhaseContent::Initialization { values } => {
            for (word, v) in values {
                let _ = writeln!(out, "  {word:<5} {v:?}");
            }
        }
        PhaseContent::Training {
            word,
            context,
            before,
            after,
        } => {
            let _ = writeln!(out, "  \"{context}\"");
            let _ = writeln!(out, "  {word} before {before:?}");
            let _ = writeln!(out, "  {word} after  {after:?}");
        }
        PhaseContent::Convergence { values } => {
            for (word, v, kind) in values {
                let _ = writeln!(out, "  {word:<5} {v:?} {}", kind.label());
            }
        }
    }
    out.push_str(&controls(&p.snapshot(), p.can_step_manually()));
    out
}

pub fn tokens(init: &TokenInit) -> String {
    let mut out = String::new();
    header(&mut out, PanelKind::Tokens);
    for row in init.rows() {
        let cells: Vec<String> = row
            .values
            .iter()
            .map(|&v| format!("{v:.3}({:.0}%)", opacity(v) * 100.0))
            .collect();
        let _ = writeln!(
            out,
            "  {:<5} token {:>4}  {}",
            row.word,
            row.token_id,
            cells.join(" ")
        );
    }
    out.push_str("[Regenerate]");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedviz::config::VizConfig;
    use embedviz::panels::{learning, processing};
    use embedviz::prng::Prng;
    use embedviz::scheduler::ManualScheduler;

    #[test]
    fn bar_fills_proportionally() {
        assert_eq!(bar(0.0, 4), "░░░░");
        assert_eq!(bar(0.5, 4), "██░░");
        assert_eq!(bar(1.0, 4), "████");
        assert_eq!(bar(7.0, 4), "████");
    }

    #[test]
    fn controls_follow_mode() {
        let mut p = learning::playback(&VizConfig::default(), ManualScheduler::new());
        let idle = controls(&p.snapshot(), p.can_step_manually());
        assert!(idle.starts_with("[Next] [Auto Learn]"));
        assert!(idle.contains("speed 2.0s (0.5s..5.0s)"));
        assert!(idle.ends_with("example 1/18"));

        p.toggle_auto();
        let running = controls(&p.snapshot(), p.can_step_manually());
        assert!(running.starts_with("(Next) [Pause]"));
    }

    #[test]
    fn learning_frame_shows_sentence_and_grid() {
        let p = learning::playback(&VizConfig::default(), ManualScheduler::new());
        let frame = learning(&p);
        assert!(frame.contains(p.current().sentence));
        assert!(frame.contains("relationships:"));
        assert!(frame.contains("Living Thing"));
        assert!(frame.contains("1.00"));
    }

    #[test]
    fn realistic_rows_are_truncated() {
        let cfg = VizConfig::default();
        let mut prng = Prng::new(3);
        let mut panel = PatternsPanel::new(&cfg, &mut prng, ManualScheduler::new());
        assert!(patterns(&panel).contains("[Show Realistic View]"));
        panel.toggle_view();
        let frame = patterns(&panel);
        assert!(frame.contains("(+40 more)"));
        assert!(frame.contains("[Show Simplified View]"));
    }

    #[test]
    fn processing_next_disabled_on_last_phase() {
        let mut p = processing::playback(&VizConfig::default(), ManualScheduler::new());
        assert!(processing(&p).contains(" 25%"));
        for _ in 0..3 {
            p.step();
        }
        let frame = processing(&p);
        assert!(frame.contains("100%"));
        assert!(frame.contains("(Next)"));
        assert!(frame.contains("animal"));
    }

    #[test]
    fn tokens_frame_lists_every_word() {
        let mut prng = Prng::new(4);
        let init = TokenInit::generate(&mut prng, 8);
        let frame = tokens(&init);
        for w in ["cat", "dog", "car", "book"] {
            assert!(frame.contains(w));
        }
    }
}
