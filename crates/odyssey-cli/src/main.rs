//! `odyssey`: parse, render and reformat creature stat blocks and initiative
//! trackers kept in markdown notes.
//!
//!  odyssey creature parse <INPUT> [--complete]   markdown -> JSON
//!  odyssey creature render <INPUT>               JSON -> markdown
//!  odyssey creature fmt <INPUT> [--write]        markdown -> canonical markdown
//!  odyssey initiative parse|render|fmt <INPUT>   same for initiative tables
//!  odyssey modifier <SCORE>                      ability modifier
//!
//! `-` reads from stdin.

use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use odyssey_config::Config;
use odyssey_engine::{
    Creature, CreatureDraft, InitiativeState, ability_modifier, parse_creature_stat_block,
    parse_initiative_table, stringify_creature, stringify_initiative_table,
};
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(
    name = "odyssey",
    version,
    about = "Tabletop RPG stat blocks and initiative trackers in markdown"
)]
struct Cli {
    /// Path to a config.toml (default: ~/.config/odyssey/config.toml)
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Log recoverable parse gaps
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Creature stat blocks
    Creature {
        #[command(subcommand)]
        action: CreatureAction,
    },
    /// Initiative tracker tables
    Initiative {
        #[command(subcommand)]
        action: InitiativeAction,
    },
    /// Print the ability modifier for a score
    Modifier {
        #[arg(allow_negative_numbers = true)]
        score: i32,
    },
}

#[derive(Debug, Subcommand)]
enum CreatureAction {
    /// Parse a stat block and print it as JSON
    Parse {
        /// Markdown file, or `-` for stdin
        input: String,
        /// Fill missing required fields from the configured seed creature
        #[arg(long)]
        complete: bool,
    },
    /// Read a creature as JSON and print its stat block
    Render {
        /// JSON file, or `-` for stdin
        input: String,
    },
    /// Rewrite a stat block in canonical form
    Fmt {
        /// Markdown file, or `-` for stdin
        input: String,
        /// Overwrite the input file instead of printing
        #[arg(long)]
        write: bool,
    },
}

#[derive(Debug, Subcommand)]
enum InitiativeAction {
    /// Parse an initiative table and print it as JSON
    Parse {
        /// Markdown file, or `-` for stdin
        input: String,
    },
    /// Read a tracker as JSON and print its table
    Render {
        /// JSON file, or `-` for stdin
        input: String,
    },
    /// Rewrite an initiative table in turn order
    Fmt {
        /// Markdown file, or `-` for stdin
        input: String,
        /// Overwrite the input file instead of printing
        #[arg(long)]
        write: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let config = Config::load_or_default(cli.config.as_deref())?;
    log::debug!("using config {config:?}");

    match cli.command {
        Command::Creature { action } => run_creature(action, &config),
        Command::Initiative { action } => run_initiative(action, &config),
        Command::Modifier { score } => {
            println!("{}", ability_modifier(score));
            Ok(())
        }
    }
}

fn run_creature(action: CreatureAction, config: &Config) -> Result<()> {
    match action {
        CreatureAction::Parse { input, complete } => {
            let draft = parse_creature_stat_block(&read_input(&input)?);
            if complete {
                print_json(&draft.complete(&config.creature), config)
            } else {
                print_json(&draft, config)
            }
        }
        CreatureAction::Render { input } => {
            let creature = creature_from_json(&read_input(&input)?)?;
            print!("{}", stringify_creature(&creature));
            Ok(())
        }
        CreatureAction::Fmt { input, write } => {
            let draft = parse_creature_stat_block(&read_input(&input)?);
            let creature = Creature::try_from(draft)
                .with_context(|| format!("cannot format {input}: stat block is incomplete"))?;
            write_output(&input, &stringify_creature(&creature), write)
        }
    }
}

fn run_initiative(action: InitiativeAction, config: &Config) -> Result<()> {
    match action {
        InitiativeAction::Parse { input } => {
            print_json(&parse_initiative_table(&read_input(&input)?), config)
        }
        InitiativeAction::Render { input } => {
            let state: InitiativeState = serde_json::from_str(&read_input(&input)?)
                .context("Failed to read initiative tracker JSON")?;
            print!("{}", stringify_initiative_table(&state));
            Ok(())
        }
        InitiativeAction::Fmt { input, write } => {
            let state = parse_initiative_table(&read_input(&input)?);
            write_output(&input, &stringify_initiative_table(&state), write)
        }
    }
}

/// Creatures from JSON go through the draft so that a missing field is
/// reported by name.
fn creature_from_json(json: &str) -> Result<Creature> {
    let draft: CreatureDraft =
        serde_json::from_str(json).context("Failed to read creature JSON")?;
    Ok(Creature::try_from(draft)?)
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        Ok(text)
    } else {
        fs::read_to_string(input).with_context(|| format!("Failed to read {input}"))
    }
}

fn write_output(input: &str, text: &str, in_place: bool) -> Result<()> {
    if !in_place {
        print!("{text}");
        return Ok(());
    }
    if input == "-" {
        bail!("--write needs a file, not stdin");
    }
    fs::write(Path::new(input), text).with_context(|| format!("Failed to write {input}"))?;
    log::info!("rewrote {input}");
    Ok(())
}

fn print_json<T: Serialize>(value: &T, config: &Config) -> Result<()> {
    let json = if config.pretty_json {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}
