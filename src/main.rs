//! Special Combination Resolver
//!
//! Reads a match region drawn as an ASCII pattern and prints how it resolves:
//! which cells form which special shapes, what bomb each spawns, and where.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use tracing_subscriber::EnvFilter;

use specials::arena::ScratchArena;
use specials::config::{GeneratorConfig, DEFAULT_EXACT_LIMIT, DEFAULT_LOCAL_SEARCH_ROUNDS};
use specials::pattern::{self, Pattern};
use specials::result::MatchGroup;
use specials::{Generator, Resolution};

/// Resolves match-3 regions into special shapes and bombs.
#[derive(Parser)]
#[command(name = "specials")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log pipeline decisions to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Seed for policies that fall back to random choices.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Largest tier group solved exactly.
    #[arg(long, global = true, default_value_t = DEFAULT_EXACT_LIMIT)]
    exact_limit: usize,

    /// Local-search rounds after solving; 0 disables.
    #[arg(long, global = true, default_value_t = DEFAULT_LOCAL_SEARCH_ROUNDS)]
    local_search_rounds: usize,
}

#[derive(Subcommand)]
enum Command {
    /// Print the resolved groups drawn over the pattern.
    Resolve {
        /// Pattern file: `#` cell, `@` focus cell, `.` empty.
        file: PathBuf,
    },
    /// Print every ranked candidate, marking the winners.
    Candidates {
        /// Pattern file: `#` cell, `@` focus cell, `.` empty.
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("specials=debug")
    } else {
        EnvFilter::new("specials=warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let generator = Generator::new(&GeneratorConfig {
        exact_limit: cli.exact_limit,
        local_search_rounds: cli.local_search_rounds,
    });
    let mut rng = cli.seed.map(SmallRng::seed_from_u64);

    match cli.command {
        Command::Resolve { file } => {
            let pattern = load(&file)?;
            let resolution = run(&generator, &pattern, rng.as_mut());
            println!("{}", format_groups(&pattern, &resolution.groups));
        }
        Command::Candidates { file } => {
            let pattern = load(&file)?;
            let resolution = run(&generator, &pattern, rng.as_mut());
            println!("{}", format_candidates(&resolution));
        }
    }

    Ok(())
}

fn load(path: &Path) -> anyhow::Result<Pattern> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read pattern {}", path.display()))?;
    pattern::parse(&text).with_context(|| format!("Invalid pattern in {}", path.display()))
}

fn run(generator: &Generator, pattern: &Pattern, rng: Option<&mut SmallRng>) -> Resolution {
    let rng = rng.map(|rng| rng as &mut dyn RngCore);
    generator.resolve(&pattern.component, &pattern.foci, rng, &ScratchArena::new())
}

/// The pattern with each group drawn in, followed by one line per group.
fn format_groups(pattern: &Pattern, groups: &[MatchGroup]) -> String {
    let mut output = pattern::render(&pattern.component, groups);
    output.push('\n');
    if groups.is_empty() {
        output.push_str("\nNo match");
    }
    for (i, group) in groups.iter().enumerate() {
        let label = (b'A' + (i % 26) as u8) as char;
        let bomb = group.bomb.map_or_else(|| "-".to_string(), |bomb| format!("{bomb:?}"));
        let origin = group.origin.map_or_else(|| "-".to_string(), |cell| cell.to_string());
        output.push_str(&format!(
            "\n{label}: {:?} bomb={bomb} origin={origin} cells={}",
            group.shape,
            group.cells.len()
        ));
    }
    output
}

/// One line per ranked candidate; winners are marked with `*`.
fn format_candidates(resolution: &Resolution) -> String {
    let mut lines = Vec::with_capacity(resolution.candidates.len());
    for (i, candidate) in resolution.candidates.iter().enumerate() {
        let marker = if resolution.winners.binary_search(&i).is_ok() {
            '*'
        } else {
            '-'
        };
        let cells: Vec<String> = candidate.cells.iter().map(ToString::to_string).collect();
        lines.push(format!(
            "{marker} {:?} weight={} cells={}",
            candidate.kind,
            candidate.weight,
            cells.join(" ")
        ));
    }
    if lines.is_empty() {
        lines.push("No candidates".to_string());
    }
    lines.join("\n")
}
