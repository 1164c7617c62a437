use anyhow::Result;
use chrono::Utc;

use language_learner_lib::commands::{Affected, Command};
use language_learner_lib::vocabulary::{SavedWord, SortOrder};

use crate::app::App;
use crate::render::terminal;
use crate::OutputFormat;

pub fn run(
    app: &mut App,
    filter: &str,
    sort: SortOrder,
    search: Option<String>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let words: Vec<SavedWord> = app.call(Command::QueryWords {
        filter: Some(filter.to_string()),
        search,
        sort: Some(sort),
    })?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&words)?),
        OutputFormat::Plain => {
            if words.is_empty() {
                println!("No saved words match.");
                return Ok(());
            }
            terminal::print_word_table(&words, Utc::now(), use_color);
            println!("\n{} words", words.len());
        }
    }

    Ok(())
}

pub fn run_due(app: &mut App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let words: Vec<SavedWord> = app.call(Command::GetDueWords)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&words)?),
        OutputFormat::Plain => {
            if words.is_empty() {
                println!("Nothing due for review.");
                return Ok(());
            }
            terminal::print_word_table(&words, Utc::now(), use_color);
            println!("\n{} words due", words.len());
        }
    }

    Ok(())
}

pub fn run_promote(app: &mut App, format: &OutputFormat) -> Result<()> {
    let promoted: Affected = app.call(Command::PromoteStale)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&promoted)?),
        OutputFormat::Plain => println!("Promoted {} words", promoted.count),
    }
    Ok(())
}
