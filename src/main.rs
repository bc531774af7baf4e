//! Non-interactive runner: plays a panel's script to stdout.
//!
//! Time is virtual, so a full auto-advance pass finishes immediately while
//! still going through the same timer path as the interactive front end.

use embedviz::derived::{annotate, relationship_grid, strength_label};
use embedviz::display::WordVectors;
use embedviz::panels::{learning, patterns, processing, tokens, PanelKind, PATTERN_LABELS};
use embedviz::playback::StepOutcome;
use embedviz::prelude::*;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() >= 2 && (args[1] == "--help" || args[1] == "-h" || args[1] == "help") {
        print_help();
        return;
    }

    let mut cfg = VizConfig::default();
    if let Some(i) = args.iter().position(|a| a == "--seed") {
        match args.get(i + 1).and_then(|s| s.parse::<u64>().ok()) {
            Some(seed) => cfg.seed = seed,
            None => {
                eprintln!("--seed needs an integer");
                std::process::exit(2);
            }
        }
    }
    let cfg = cfg.validate();

    let panel = match args.get(1).filter(|a| !a.starts_with("--")) {
        None => PanelKind::Learning,
        Some(name) if name == "similarity" => {
            run_similarity(&cfg);
            return;
        }
        Some(name) => match name.parse::<PanelKind>() {
            Ok(kind) => kind,
            Err(e) => {
                eprintln!("{e}");
                print_help();
                std::process::exit(2);
            }
        },
    };

    match panel {
        PanelKind::Learning => run_learning(&cfg),
        PanelKind::Patterns => run_patterns(&cfg, args.iter().any(|a| a == "--realistic")),
        PanelKind::Processing => run_processing(&cfg),
        PanelKind::Tokens => run_tokens(&cfg),
    }
}

fn print_help() {
    println!("embedviz: word-embedding panels as plain text");
    println!();
    println!("Usage:");
    println!("  embedviz [learning]             auto-play the learning panel");
    println!("  embedviz patterns [--realistic] step through the patterns panel");
    println!("  embedviz processing             auto-play the four processing phases");
    println!("  embedviz tokens                 random token initialization");
    println!("  embedviz similarity             relationships after a full learning pass");
    println!();
    println!("Options:");
    println!("  --seed <n>   seed for the random display data");
}

fn print_vectors(state: &WordVectors) {
    for (word, values) in state.iter() {
        let cells: Vec<String> = values.iter().map(|v| format!("{v:.2}")).collect();
        println!("  {word:<5} [{}]", cells.join(", "));
    }
}

fn run_learning(cfg: &VizConfig) {
    let clock = ManualScheduler::new();
    let mut p = learning::playback(cfg, clock.clone());
    println!("{}", PanelKind::Learning.title());
    println!("features: {}", PATTERN_LABELS.join(", "));

    p.toggle_auto();
    while p.is_auto() {
        let ex = p.current();
        let note = annotate(ex.sentence, ex.focus);
        println!();
        println!(
            "[{}/{}] {} (focus: {})",
            p.position() + 1,
            p.len(),
            ex.sentence,
            ex.focus
        );
        println!("  {}", ex.explanation);
        println!(
            "  {:?}, {}, {:?}, {:?}",
            note.role,
            note.action.label(),
            note.agency,
            note.interaction
        );

        for token in clock.advance(u64::from(p.interval_ms())) {
            match p.on_tick(token) {
                Some(StepOutcome::Advanced { .. }) => print_vectors(p.state()),
                Some(StepOutcome::Wrapped) => println!("\nend of examples, back to the start"),
                Some(StepOutcome::Held) | None => {}
            }
        }
    }
}

fn run_patterns(cfg: &VizConfig, realistic: bool) {
    let mut prng = Prng::new(cfg.seed);
    let mut panel = patterns::PatternsPanel::new(cfg, &mut prng, ManualScheduler::new());
    if realistic {
        panel.toggle_view();
    }
    println!("{} ({:?} view)", PanelKind::Patterns.title(), panel.view());

    loop {
        let ex = &panel.playback().current().text;
        println!();
        println!("{} (focus: {})", ex.sentence, ex.focus);
        println!("  {}", ex.explanation);
        if panel.playback_mut().step() == StepOutcome::Wrapped {
            break;
        }
        print_vectors(panel.visible());
    }
}

fn run_processing(cfg: &VizConfig) {
    let clock = ManualScheduler::new();
    let mut p = processing::playback(cfg, clock.clone());
    println!("{}", PanelKind::Processing.title());

    p.toggle_auto();
    loop {
        let phase = p.current();
        println!();
        println!("{:>3.0}% {}", p.progress() * 100.0, phase.title);
        println!("  {}", phase.description);
        match &phase.content {
            processing::PhaseContent::Tokenization { tokens } => {
                for (word, id) in tokens {
                    println!("  {word:<5} -> {id}");
                }
            }
            processing::PhaseContent::Initialization { values } => {
                for (word, v) in values {
                    println!("  {word:<5} {v:?}");
                }
            }
            processing::PhaseContent::Training {
                word,
                context,
                before,
                after,
            } => {
                println!("  {word} in \"{context}\"");
                println!("  before {before:?}");
                println!("  after  {after:?}");
            }
            processing::PhaseContent::Convergence { values } => {
                for (word, v, kind) in values {
                    println!("  {word:<5} {v:?} {}", kind.label());
                }
            }
        }
        let mut moved = false;
        for token in clock.advance(u64::from(p.interval_ms())) {
            if let Some(StepOutcome::Advanced { .. }) = p.on_tick(token) {
                moved = true;
            }
        }
        if !moved {
            break;
        }
    }
}

fn run_tokens(cfg: &VizConfig) {
    let mut prng = Prng::new(cfg.seed);
    let init = tokens::TokenInit::generate(&mut prng, cfg.token_dims);
    println!("{}", PanelKind::Tokens.title());
    for row in init.rows() {
        let cells: Vec<String> = row.values.iter().map(|v| format!("{v:.3}")).collect();
        println!("  {:<5} token {:>4}  {}", row.word, row.token_id, cells.join(" "));
    }
}

fn run_similarity(cfg: &VizConfig) {
    let mut p = learning::playback(cfg, ManualScheduler::new());
    while p.position() < p.catalog().last_index() {
        p.step();
    }
    print_vectors(p.state());
    println!();
    for cell in relationship_grid(p.state()) {
        if cell.a < cell.b {
            println!(
                "  {:<4} - {:<4} {:.3} ({}) {}",
                cell.a,
                cell.b,
                cell.similarity,
                strength_label(cell.similarity),
                cell.color
            );
        }
    }
}
