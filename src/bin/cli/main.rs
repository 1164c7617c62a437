mod app;
mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use language_learner_lib::vocabulary::SortOrder;

#[derive(Parser)]
#[command(
    name = "language-learner-cli",
    about = "Saved vocabulary and review schedule from the command line",
    version
)]
struct Cli {
    /// Data directory (default: $LANGUAGE_LEARNER_DATA_DIR, then the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

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

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum ExportKind {
    #[default]
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Command {
    /// Save a word, or record another encounter with a saved one
    Save {
        word: String,
        translation: String,
        /// Sentence the word appeared in
        #[arg(long)]
        context: Option<String>,
        /// Where the sentence came from, e.g. "YouTube"
        #[arg(long, default_value = "")]
        context_source: String,
        /// Title of the source video
        #[arg(long)]
        source: Option<String>,
        /// URL of the source video
        #[arg(long)]
        url: Option<String>,
        /// Playback position in seconds
        #[arg(long)]
        at: Option<f64>,
    },

    /// List saved words
    List {
        /// all, new, learning, reviewing, learned, or difficult
        #[arg(long, default_value = "all")]
        filter: String,
        /// Sort order
        #[arg(long, default_value = "recently-added", value_parser = parse_sort)]
        sort: SortOrder,
        /// Only words or translations containing this text
        #[arg(long)]
        search: Option<String>,
    },

    /// Show one word in full
    Show { word: String },

    /// Mark a word as practised and reschedule it
    Advance {
        word: String,
        /// Scale intervals by the wordProgressDays setting
        #[arg(long)]
        scaled: bool,
    },

    /// Count a view of a word
    View { word: String },

    /// Set a word's status explicitly
    Status {
        word: String,
        /// new, learning, reviewing, or learned
        status: String,
    },

    /// Toggle the difficult flag
    Difficult { word: String },

    /// Reset a word's progress to zero
    Reset { word: String },

    /// Delete a saved word
    Remove { word: String },

    /// Delete every saved word
    Clear {
        /// Skip the confirmation check
        #[arg(long)]
        yes: bool,
    },

    /// Words due for review
    Due,

    /// Promote words whose status has gone stale
    Promote,

    /// Vocabulary statistics and translation usage
    Stats,

    /// Translate text with the online service
    Translate {
        text: String,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        /// Save the word with its translation
        #[arg(long)]
        save: bool,
    },

    /// Export saved words
    Export {
        #[arg(default_value = "json")]
        kind: ExportKind,
        /// Output file (default: a dated file name in the current directory, "-" for stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Import words from a JSON export (use "-" to read from stdin)
    Import { path: String },

    /// Show or change settings
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Run a raw JSON request, e.g. '{"action":"getStats"}' (reads stdin when omitted)
    Dispatch { request: Option<String> },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print current settings
    Show,

    /// Set one setting, e.g. `config set translationLanguage de`
    Set {
        key: String,
        /// JSON value, or plain text for strings
        value: String,
    },

    /// Print the data directory
    Path,

    /// Forget every cached translation
    ClearCache,
}

fn parse_sort(value: &str) -> Result<SortOrder, String> {
    value.parse()
}

/// Read all of stdin
fn read_stdin() -> anyhow::Result<String> {
    let mut buf = String::new();
    std::io::Read::read_to_string(&mut std::io::stdin(), &mut buf)?;
    Ok(buf)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let mut app = app::App::new(cli.data_dir)?;
    let format = &cli.format;

    match cli.command {
        Command::Save { word, translation, context, context_source, source, url, at } => {
            commands::words::run_save(
                &mut app,
                commands::words::SaveArgs { word, translation, context, context_source, source, url, at },
                format,
                use_color,
            )?;
        }
        Command::List { filter, sort, search } => {
            commands::list::run(&mut app, &filter, sort, search, format, use_color)?;
        }
        Command::Show { word } => {
            commands::words::run_show(&mut app, &word, format, use_color)?;
        }
        Command::Advance { word, scaled } => {
            commands::words::run_advance(&mut app, &word, scaled, format, use_color)?;
        }
        Command::View { word } => {
            commands::words::run_view(&mut app, &word, format, use_color)?;
        }
        Command::Status { word, status } => {
            commands::words::run_status(&mut app, &word, &status, format, use_color)?;
        }
        Command::Difficult { word } => {
            commands::words::run_difficult(&mut app, &word, format, use_color)?;
        }
        Command::Reset { word } => {
            commands::words::run_reset(&mut app, &word, format, use_color)?;
        }
        Command::Remove { word } => {
            commands::words::run_remove(&mut app, &word, format)?;
        }
        Command::Clear { yes } => {
            commands::words::run_clear(&mut app, yes, format)?;
        }
        Command::Due => {
            commands::list::run_due(&mut app, format, use_color)?;
        }
        Command::Promote => {
            commands::list::run_promote(&mut app, format)?;
        }
        Command::Stats => {
            commands::stats::run(&mut app, format, use_color)?;
        }
        Command::Translate { text, from, to, save } => {
            commands::translate::run(&mut app, &text, from, to, save, format, use_color)?;
        }
        Command::Export { kind, output } => {
            commands::transfer::run_export(&mut app, kind, output, format)?;
        }
        Command::Import { path } => {
            let content = if path == "-" {
                read_stdin()?
            } else {
                std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path))?
            };
            commands::transfer::run_import(&mut app, content, format)?;
        }
        Command::Config(subcmd) => match subcmd {
            ConfigCommand::Show => commands::config::run_show(&app, format)?,
            ConfigCommand::Set { key, value } => {
                commands::config::run_set(&mut app, &key, &value, format)?;
            }
            ConfigCommand::Path => println!("{}", app.data_dir().display()),
            ConfigCommand::ClearCache => commands::config::run_clear_cache(&mut app, format)?,
        },
        Command::Dispatch { request } => {
            let request = match request {
                Some(request) => request,
                None => read_stdin()?,
            };
            commands::dispatch::run(&mut app, &request)?;
        }
    }

    Ok(())
}
