mod app;
mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "recall-cli", about = "Spaced-repetition drill for exam questions", version)]
struct Cli {
    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Import questions from a .csv/.tsv sheet or a generated .json quiz
    Import {
        /// File to import
        file: PathBuf,
        /// Provenance label (defaults to the file name)
        #[arg(long)]
        source: Option<String>,
    },

    /// List questions due for review now
    Due,

    /// Review due questions interactively
    Review {
        /// Maximum number of questions this session
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Record an answer outcome for one question
    Answer {
        /// Question ID
        id: i64,
        /// The learner answered correctly
        #[arg(long, conflicts_with = "incorrect", required_unless_present = "incorrect")]
        correct: bool,
        /// The learner answered incorrectly
        #[arg(long)]
        incorrect: bool,
    },

    /// Show one question with its review state
    Show {
        /// Question ID
        id: i64,
    },

    /// Permanently delete a question
    Delete {
        /// Question ID
        id: i64,
    },

    /// Show active, completed and due counts
    Stats,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let app = app::App::new(cli.config.as_deref())?;

    match cli.command {
        Command::Import { file, source } => {
            commands::import::run(&app, &file, source.as_deref(), &cli.format)?;
        }
        Command::Due => {
            commands::due::run(&app, &cli.format, use_color)?;
        }
        Command::Review { limit } => {
            commands::review::run(&app, limit, use_color)?;
        }
        Command::Answer { id, correct, incorrect: _ } => {
            commands::answer::run(&app, id, correct, &cli.format, use_color)?;
        }
        Command::Show { id } => {
            commands::show::run(&app, id, &cli.format, use_color)?;
        }
        Command::Delete { id } => {
            commands::delete::run(&app, id, &cli.format)?;
        }
        Command::Stats => {
            commands::stats::run(&app, &cli.format, use_color)?;
        }
    }

    Ok(())
}
