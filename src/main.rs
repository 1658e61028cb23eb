use holenav::main_handler;

use ansi_term::Color::*;
use clap::{builder::styling::*, Parser, Subcommand};
use std::path::PathBuf;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default())
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Yellow.on_default())
}

#[derive(Parser)]
#[command(
    version,
    about = format!("{} for a small typed functional language",
        Purple.bold().paint("Type-directed structured editing"),
    ),
    long_about = None,
    styles = styles(),
)]
struct Cli {
    /// The configuration file to use (.toml, blank for defaults)
    #[arg(short, long, value_name = "FILE", default_value = "")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Edit the starter code of an assignment interactively in the CLI
    Interact {
        /// The assignment to load
        #[arg(short, long, value_name = "N")]
        assignment: usize,

        /// The starter code variant to load
        #[arg(short, long, value_name = "N", default_value_t = 0)]
        variant: usize,

        /// Path to output JSON of the final program (blank for no output)
        #[arg(short, long, value_name = "FILE", default_value = "")]
        json: String,
    },

    /// Run the unit tests of an assignment on a program
    Check {
        /// The assignment whose unit tests to use
        #[arg(short, long, value_name = "N")]
        assignment: usize,

        /// The program to check (serialized JSON)
        #[arg(short, long, value_name = "FILE")]
        program: PathBuf,
    },

    /// Print the observation for the starter code of an assignment
    Observe {
        /// The assignment to load
        #[arg(short, long, value_name = "N")]
        assignment: usize,

        /// The starter code variant to load
        #[arg(short, long, value_name = "N", default_value_t = 0)]
        variant: usize,
    },
}

fn at_most_one_path(s: &str) -> Option<PathBuf> {
    if s.is_empty() {
        None
    } else {
        Some(PathBuf::from(s))
    }
}

impl Command {
    pub fn handle(self, config: Option<PathBuf>) -> Result<(), String> {
        let config = main_handler::config(config)?;
        match self {
            Self::Interact {
                assignment,
                variant,
                json,
            } => main_handler::interact(
                config,
                assignment,
                variant,
                at_most_one_path(&json),
            ),
            Self::Check {
                assignment,
                program,
            } => main_handler::check(config, assignment, program),
            Self::Observe {
                assignment,
                variant,
            } => main_handler::observe(config, assignment, variant),
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = cli.command.handle(at_most_one_path(&cli.config));

    match result {
        Ok(()) => (),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1)
        }
    }
}
