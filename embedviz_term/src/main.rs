//! embedviz-term: interactive terminal front end.
//!
//! Reads commands from stdin (text or JSON, one per line), drives the active
//! panel's playback with tokio timers and redraws the panel on stdout. Logs
//! go to stderr.

use embedviz::config::VizConfig;
use embedviz::panels::PanelKind;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

mod command;
mod paths;
mod render;
mod session;
mod ticker;

use command::Command;
use paths::AppPaths;
use session::{Reply, Session};

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    let i = args.iter().position(|a| a == flag)?;
    args.get(i + 1).map(String::as_str)
}

fn print_help() {
    println!("embedviz-term: interactive word-embedding panels");
    println!();
    println!("Usage: embedviz-term [--panel <name>] [--config <path>] [--seed <n>]");
    println!();
    println!("{}", command::HELP);
}

fn load_config(args: &[String]) -> VizConfig {
    let path = match arg_value(args, "--config") {
        Some(p) => Some(PathBuf::from(p)),
        None => match AppPaths::new() {
            Ok(paths) => Some(paths.config_file()),
            Err(e) => {
                warn!("{}", e);
                None
            }
        },
    };
    let Some(path) = path else {
        return VizConfig::default();
    };
    match VizConfig::load_or_default(&path) {
        Ok(cfg) => {
            info!(path = %path.display(), "config loaded");
            cfg
        }
        Err(e) => {
            warn!("{}; using defaults", e);
            VizConfig::default()
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let mut cfg = load_config(&args);
    if let Some(seed) = arg_value(&args, "--seed") {
        cfg.seed = seed.parse()?;
    }
    let cfg = cfg.validate();

    let panel = match arg_value(&args, "--panel") {
        Some(name) => name.parse::<PanelKind>()?,
        None => PanelKind::Learning,
    };

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut session = Session::new(cfg, tx, panel);
    println!("{}", session.render());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("stdin closed");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                let reply = match line.parse::<Command>() {
                    Ok(cmd) => session.handle(cmd),
                    Err(e) => Reply::Message(e.to_string()),
                };
                match reply {
                    Reply::Render => println!("\n{}", session.render()),
                    Reply::Message(msg) => println!("{msg}"),
                    Reply::Json(json) => println!("{json}"),
                    Reply::Quit => break,
                }
            }
            Some(tick) = rx.recv() => {
                if session.on_tick(tick) {
                    println!("\n{}", session.render());
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
        }
    }

    // Dropping the session cancels any running timer.
    drop(session);
    info!("session closed");
    Ok(())
}
