use anyhow::{bail, Result};

use language_learner_lib::commands::Command;
use language_learner_lib::translation::TranslationOutcome;
use language_learner_lib::vocabulary::{SaveRequest, SavedWord};

use crate::app::App;
use crate::render::terminal::{self, Color};
use crate::OutputFormat;

pub fn run(
    app: &mut App,
    text: &str,
    from: Option<String>,
    to: Option<String>,
    save: bool,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let response = app.dispatch(Command::TranslateWord {
        word: text.to_string(),
        from,
        to,
    });
    let outcome: TranslationOutcome = match response.data {
        Some(data) => serde_json::from_value(data)?,
        None => bail!("{}", response.error.unwrap_or_else(|| "Translation failed".to_string())),
    };
    if !outcome.success {
        bail!("{}", outcome.error.unwrap_or_else(|| "Translation failed".to_string()));
    }

    let saved = if save {
        let word: SavedWord = app.call(Command::SaveWord(SaveRequest::new(
            text.trim(),
            outcome.translation.clone(),
        )))?;
        Some(word)
    } else {
        None
    };

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "translation": outcome,
                "saved": saved,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!(
                "{} {} {}",
                text.trim(),
                terminal::paint("\u{2192}", Color::GRAY, use_color),
                terminal::paint(&outcome.translation, Color::BOLD, use_color)
            );
            if let Some(word) = saved {
                println!("Saved \"{}\" ({}%)", word.word, word.learning_progress);
            }
        }
    }

    Ok(())
}
