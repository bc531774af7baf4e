//! One interactive session: the active panel plus the shared config and PRNG.
//!
//! Only one panel is live at a time. Switching drops the old panel, which
//! cancels its timer, and builds the new one from scratch.

use crate::command::{Command, HELP};
use crate::render;
use crate::ticker::{Tick, TokioScheduler};
use embedviz::config::VizConfig;
use embedviz::derived::{annotate, relationship_grid, Annotation, RelationCell};
use embedviz::display::WordVectors;
use embedviz::panels::learning::{self, LearningPlayback};
use embedviz::panels::patterns::{PatternsPanel, View};
use embedviz::panels::processing::{self, Phase, ProcessingPlayback};
use embedviz::panels::tokens::TokenInit;
use embedviz::panels::{PanelKind, SentenceExample};
use embedviz::playback::{Mode, PlaybackSnapshot, StepOutcome};
use embedviz::prng::Prng;
use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

pub enum ActivePanel {
    Learning(LearningPlayback<TokioScheduler>),
    Patterns(PatternsPanel<TokioScheduler>),
    Processing(ProcessingPlayback<TokioScheduler>),
    Tokens(TokenInit),
}

impl ActivePanel {
    pub fn kind(&self) -> PanelKind {
        match self {
            ActivePanel::Learning(_) => PanelKind::Learning,
            ActivePanel::Patterns(_) => PanelKind::Patterns,
            ActivePanel::Processing(_) => PanelKind::Processing,
            ActivePanel::Tokens(_) => PanelKind::Tokens,
        }
    }

    fn mode(&self) -> Option<Mode> {
        match self {
            ActivePanel::Learning(p) => Some(p.mode()),
            ActivePanel::Patterns(p) => Some(p.playback().mode()),
            ActivePanel::Processing(p) => Some(p.mode()),
            ActivePanel::Tokens(_) => None,
        }
    }
}

/// What the front end should do after a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Render,
    Message(String),
    Json(String),
    Quit,
}

/// JSON view of the active panel for the `state` command.
#[derive(Serialize)]
#[serde(tag = "panel", rename_all = "snake_case")]
pub enum PanelSnapshot<'a> {
    Learning {
        playback: PlaybackSnapshot,
        example: &'a SentenceExample,
        vectors: &'a WordVectors,
        relationships: Vec<RelationCell>,
        annotation: Annotation,
    },
    Patterns {
        playback: PlaybackSnapshot,
        example: &'a SentenceExample,
        view: View,
        vectors: &'a WordVectors,
    },
    Processing {
        playback: PlaybackSnapshot,
        phase: &'a Phase,
        vectors: &'a WordVectors,
        can_step: bool,
    },
    Tokens {
        tokens: &'a TokenInit,
    },
}

pub struct Session {
    cfg: VizConfig,
    prng: Prng,
    ticks: UnboundedSender<Tick>,
    active: ActivePanel,
}

impl Session {
    /// Must be called inside a tokio runtime; timers are spawned tasks.
    pub fn new(cfg: VizConfig, ticks: UnboundedSender<Tick>, panel: PanelKind) -> Self {
        let mut prng = Prng::new(cfg.seed);
        let active = build_panel(&cfg, &mut prng, &ticks, panel);
        info!(%panel, "panel opened");
        Self {
            cfg,
            prng,
            ticks,
            active,
        }
    }

    pub fn kind(&self) -> PanelKind {
        self.active.kind()
    }

    pub fn switch(&mut self, panel: PanelKind) {
        let fresh = build_panel(&self.cfg, &mut self.prng, &self.ticks, panel);
        let old = std::mem::replace(&mut self.active, fresh);
        info!(from = %old.kind(), to = %panel, "panel switched");
        drop(old);
    }

    pub fn handle(&mut self, cmd: Command) -> Reply {
        match cmd {
            Command::Next => self.next(),
            Command::ToggleAuto => self.toggle_auto(),
            Command::Reset => {
                match &mut self.active {
                    ActivePanel::Learning(p) => p.reset(),
                    ActivePanel::Patterns(p) => p.playback_mut().reset(),
                    ActivePanel::Processing(p) => p.reset(),
                    ActivePanel::Tokens(_) => return self.no_playback(),
                }
                info!(panel = %self.kind(), "reset");
                Reply::Render
            }
            Command::SetSpeed { ms } => {
                let applied = match &mut self.active {
                    ActivePanel::Learning(p) => p.set_speed(ms),
                    ActivePanel::Patterns(p) => p.playback_mut().set_speed(ms),
                    ActivePanel::Processing(p) => p.set_speed(ms),
                    ActivePanel::Tokens(_) => return self.no_playback(),
                };
                if applied != ms {
                    info!(requested = ms, applied, "speed clamped");
                } else {
                    info!(ms = applied, "speed set");
                }
                Reply::Render
            }
            Command::ToggleView => match &mut self.active {
                ActivePanel::Patterns(p) => {
                    let view = p.toggle_view();
                    debug!(?view, "view toggled");
                    Reply::Render
                }
                _ => Reply::Message("the view toggle belongs to the patterns panel".to_string()),
            },
            Command::SwitchPanel { panel } => {
                self.switch(panel);
                Reply::Render
            }
            Command::Regenerate => match &mut self.active {
                ActivePanel::Tokens(t) => {
                    t.regenerate(&mut self.prng);
                    debug!("token values regenerated");
                    Reply::Render
                }
                _ => Reply::Message("regenerate belongs to the tokens panel".to_string()),
            },
            Command::GetState => match serde_json::to_string(&self.snapshot()) {
                Ok(json) => Reply::Json(json),
                Err(e) => Reply::Message(format!("could not serialize state: {e}")),
            },
            Command::Help => Reply::Message(HELP.to_string()),
            Command::Quit => Reply::Quit,
        }
    }

    fn no_playback(&self) -> Reply {
        Reply::Message(format!("the {} panel has no playback", self.kind()))
    }

    fn next(&mut self) -> Reply {
        let result = match &mut self.active {
            ActivePanel::Learning(p) => p.manual_step(),
            ActivePanel::Patterns(p) => p.playback_mut().manual_step(),
            ActivePanel::Processing(p) => p.manual_step(),
            ActivePanel::Tokens(_) => return self.no_playback(),
        };
        match result {
            Ok(outcome) => {
                debug!(?outcome, "manual step");
                Reply::Render
            }
            Err(e) => {
                debug!(%e, "next ignored");
                Reply::Message(e.to_string())
            }
        }
    }

    fn toggle_auto(&mut self) -> Reply {
        let mode = match &mut self.active {
            ActivePanel::Learning(p) => p.toggle_auto(),
            ActivePanel::Patterns(p) => p.playback_mut().toggle_auto(),
            ActivePanel::Processing(p) => p.toggle_auto(),
            ActivePanel::Tokens(_) => return self.no_playback(),
        };
        match mode {
            Mode::AutoAdvancing => info!(panel = %self.kind(), "auto-advance started"),
            Mode::Idle => info!(panel = %self.kind(), "auto-advance stopped"),
        }
        Reply::Render
    }

    /// Feed a timer tick to the active panel. Returns whether anything moved.
    pub fn on_tick(&mut self, tick: Tick) -> bool {
        if tick.panel != self.kind() {
            debug!(token = tick.token.id(), panel = %tick.panel, "tick for closed panel dropped");
            return false;
        }
        let outcome = match &mut self.active {
            ActivePanel::Learning(p) => p.on_tick(tick.token),
            ActivePanel::Patterns(p) => p.playback_mut().on_tick(tick.token),
            ActivePanel::Processing(p) => p.on_tick(tick.token),
            ActivePanel::Tokens(_) => None,
        };
        match outcome {
            None => {
                debug!(token = tick.token.id(), "stale tick dropped");
                false
            }
            Some(StepOutcome::Advanced { .. }) => true,
            Some(end @ (StepOutcome::Wrapped | StepOutcome::Held)) => {
                info!(panel = %self.kind(), ?end, "auto-advance finished");
                true
            }
        }
    }

    pub fn is_auto(&self) -> bool {
        self.active.mode() == Some(Mode::AutoAdvancing)
    }

    pub fn render(&self) -> String {
        match &self.active {
            ActivePanel::Learning(p) => render::learning(p),
            ActivePanel::Patterns(p) => render::patterns(p),
            ActivePanel::Processing(p) => render::processing(p),
            ActivePanel::Tokens(t) => render::tokens(t),
        }
    }

    pub fn snapshot(&self) -> PanelSnapshot<'_> {
        match &self.active {
            ActivePanel::Learning(p) => {
                let ex = p.current();
                PanelSnapshot::Learning {
                    playback: p.snapshot(),
                    example: ex,
                    vectors: p.state(),
                    relationships: relationship_grid(p.state()),
                    annotation: annotate(ex.sentence, ex.focus),
                }
            }
            ActivePanel::Patterns(p) => PanelSnapshot::Patterns {
                playback: p.playback().snapshot(),
                example: &p.playback().current().text,
                view: p.view(),
                vectors: p.visible(),
            },
            ActivePanel::Processing(p) => PanelSnapshot::Processing {
                playback: p.snapshot(),
                phase: p.current(),
                vectors: p.state(),
                can_step: p.can_step_manually(),
            },
            ActivePanel::Tokens(t) => PanelSnapshot::Tokens { tokens: t },
        }
    }
}

fn build_panel(
    cfg: &VizConfig,
    prng: &mut Prng,
    ticks: &UnboundedSender<Tick>,
    panel: PanelKind,
) -> ActivePanel {
    let scheduler = TokioScheduler::new(panel, ticks.clone());
    match panel {
        PanelKind::Learning => ActivePanel::Learning(learning::playback(cfg, scheduler)),
        PanelKind::Patterns => ActivePanel::Patterns(PatternsPanel::new(cfg, prng, scheduler)),
        PanelKind::Processing => ActivePanel::Processing(processing::playback(cfg, scheduler)),
        PanelKind::Tokens => ActivePanel::Tokens(TokenInit::generate(prng, cfg.token_dims)),
    }
}
