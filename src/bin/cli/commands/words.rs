use anyhow::{bail, Result};
use chrono::Utc;

use language_learner_lib::commands::{Command, WordLookup};
use language_learner_lib::vocabulary::{
    IntervalPolicy, SaveRequest, SavedWord, SavedWords, SourceTimestamp,
};

use crate::app::App;
use crate::render::terminal::{self, Color};
use crate::OutputFormat;

/// Arguments of `save`
pub struct SaveArgs {
    pub word: String,
    pub translation: String,
    pub context: Option<String>,
    pub context_source: String,
    pub source: Option<String>,
    pub url: Option<String>,
    pub at: Option<f64>,
}

impl SaveArgs {
    fn into_request(self) -> SaveRequest {
        let mut request = SaveRequest::new(self.word, self.translation);
        if let Some(context) = self.context {
            request = request.with_context(context, self.context_source);
        }
        request.source = self.source;
        request.source_url = self.url;
        request.timestamp = self.at.map(SourceTimestamp::Position);
        request
    }
}

fn print_record(word: &SavedWord, format: &OutputFormat, use_color: bool) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(word)?),
        OutputFormat::Plain => terminal::print_word_detail(word, Utc::now(), use_color),
    }
    Ok(())
}

/// Print a one-line summary of a changed word
fn print_summary(verb: &str, word: &SavedWord, format: &OutputFormat, use_color: bool) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(word)?),
        OutputFormat::Plain => {
            println!(
                "{} \"{}\": {} {}% ({})",
                verb,
                word.word,
                terminal::progress_bar(word.learning_progress, 10),
                word.learning_progress,
                terminal::paint(word.status.label(), terminal::status_color(word.status), use_color)
            );
        }
    }
    Ok(())
}

pub fn run_save(app: &mut App, args: SaveArgs, format: &OutputFormat, use_color: bool) -> Result<()> {
    let is_new = !exists(app, &args.word)?;
    let word: SavedWord = app.call(Command::SaveWord(args.into_request()))?;
    print_summary(if is_new { "Saved" } else { "Updated" }, &word, format, use_color)
}

fn exists(app: &mut App, word: &str) -> Result<bool> {
    let lookup: WordLookup = app.call(Command::CheckWordExists { word: word.to_string() })?;
    Ok(lookup.exists)
}

pub fn run_show(app: &mut App, word: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let words: SavedWords = app.call(Command::GetSavedWords)?;
    match words.get(word.trim()) {
        Some(record) => print_record(record, format, use_color),
        None => bail!("Word not found: {}", word),
    }
}

pub fn run_advance(
    app: &mut App,
    word: &str,
    scaled: bool,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let policy = if scaled {
        Some(IntervalPolicy::ScaledProgressTier {
            progress_days: app.settings()?.word_progress_days,
        })
    } else {
        None
    };
    let record: SavedWord = app.call(Command::UpdateWordProgress {
        word: word.to_string(),
        policy,
    })?;
    print_summary("Advanced", &record, format, use_color)
}

pub fn run_view(app: &mut App, word: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let record: SavedWord = app.call(Command::RecordView { word: word.to_string() })?;
    print_record(&record, format, use_color)
}

pub fn run_status(
    app: &mut App,
    word: &str,
    status: &str,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let record: SavedWord = app.call(Command::UpdateWordStatus {
        word: word.to_string(),
        new_status: status.to_string(),
    })?;
    print_summary("Marked", &record, format, use_color)
}

pub fn run_difficult(app: &mut App, word: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let record: SavedWord = app.call(Command::ToggleDifficulty { word: word.to_string() })?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
        OutputFormat::Plain => {
            let label = terminal::paint(record.difficulty.label(), Color::RED, use_color);
            println!("\"{}\" is now {}", record.word, label);
        }
    }
    Ok(())
}

pub fn run_reset(app: &mut App, word: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let record: SavedWord = app.call(Command::ResetProgress { word: word.to_string() })?;
    print_summary("Reset", &record, format, use_color)
}

pub fn run_remove(app: &mut App, word: &str, format: &OutputFormat) -> Result<()> {
    let record: SavedWord = app.call(Command::RemoveWord { word: word.to_string() })?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
        OutputFormat::Plain => println!("Removed \"{}\"", record.word),
    }
    Ok(())
}

pub fn run_clear(app: &mut App, yes: bool, format: &OutputFormat) -> Result<()> {
    let words: SavedWords = app.call(Command::GetSavedWords)?;
    if !yes {
        bail!("Refusing to delete {} saved words without --yes", words.len());
    }
    app.call_unit(Command::ClearAllWords)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "cleared": words.len() })),
        OutputFormat::Plain => println!("Deleted {} saved words", words.len()),
    }
    Ok(())
}
