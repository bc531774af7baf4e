//! Front-end commands.
//!
//! A line of input is either a short text command (`next`, `speed 1500`, ...)
//! or a JSON object tagged by `type`, e.g. `{"type":"SetSpeed","ms":1500}`.

use embedviz::panels::PanelKind;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    Next,
    ToggleAuto,
    Reset,
    SetSpeed { ms: u32 },
    ToggleView,
    SwitchPanel { panel: PanelKind },
    Regenerate,
    GetState,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("`{command}` needs {what}")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },
    #[error("invalid value `{value}` for `{command}`")]
    InvalidArgument { command: &'static str, value: String },
    #[error("invalid request: {0}")]
    Json(String),
}

pub const HELP: &str = "\
commands:
  next | n            show the next example
  auto | a            start or pause auto-advance
  reset | r           back to the first example
  speed <ms|secs s>   auto-advance interval, e.g. `speed 1500` or `speed 1.5s`
  view | v            switch simplified/realistic (patterns panel)
  panel <name>        learning | patterns | processing | tokens
  regen               new random values (tokens panel)
  state               current state as JSON
  help                this text
  quit | q            exit
JSON requests are accepted too: {\"type\":\"SetSpeed\",\"ms\":1500}";

/// Accepts `1500`, `1500ms` or `1.5s`.
fn parse_speed(value: &str) -> Result<u32, CommandError> {
    let invalid = || CommandError::InvalidArgument {
        command: "speed",
        value: value.to_string(),
    };
    let value = value.trim();
    if let Some(ms) = value.strip_suffix("ms") {
        return ms.trim().parse::<u32>().map_err(|_| invalid());
    }
    if let Some(secs) = value.strip_suffix('s') {
        let secs: f32 = secs.trim().parse().map_err(|_| invalid())?;
        if !secs.is_finite() || secs < 0.0 {
            return Err(invalid());
        }
        return Ok((secs * 1000.0).round().min(u32::MAX as f32) as u32);
    }
    value.parse::<u32>().map_err(|_| invalid())
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.starts_with('{') {
            return serde_json::from_str(line).map_err(|e| CommandError::Json(e.to_string()));
        }

        let mut parts = line.split_whitespace();
        let head = parts.next().unwrap_or_default().to_ascii_lowercase();
        let arg = parts.next();
        match head.as_str() {
            "next" | "n" => Ok(Command::Next),
            "auto" | "a" | "play" | "pause" => Ok(Command::ToggleAuto),
            "reset" | "r" => Ok(Command::Reset),
            "speed" | "s" => {
                let value = arg.ok_or(CommandError::MissingArgument {
                    command: "speed",
                    what: "an interval",
                })?;
                Ok(Command::SetSpeed {
                    ms: parse_speed(value)?,
                })
            }
            "view" | "v" => Ok(Command::ToggleView),
            "panel" | "p" => {
                let name = arg.ok_or(CommandError::MissingArgument {
                    command: "panel",
                    what: "a panel name",
                })?;
                let panel = name.parse().map_err(|_| CommandError::InvalidArgument {
                    command: "panel",
                    value: name.to_string(),
                })?;
                Ok(Command::SwitchPanel { panel })
            }
            "regen" | "regenerate" => Ok(Command::Regenerate),
            "state" => Ok(Command::GetState),
            "help" | "h" | "?" => Ok(Command::Help),
            "quit" | "q" | "exit" => Ok(Command::Quit),
            _ => Err(CommandError::Unknown(line.to_string())),
        }
    }
}
