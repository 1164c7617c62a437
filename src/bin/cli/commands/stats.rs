use anyhow::Result;

use language_learner_lib::commands::Command;
use language_learner_lib::settings::ApiStatus;
use language_learner_lib::vocabulary::{VocabularyStats, WordStatus};

use crate::app::App;
use crate::render::terminal::{self, Color};
use crate::OutputFormat;

pub fn run(app: &mut App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let stats: VocabularyStats = app.call(Command::GetStats)?;
    let api: ApiStatus = app.call(Command::GetApiStatus)?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "words": stats,
                "api": api,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{}", terminal::paint("Vocabulary", Color::BOLD, use_color));
            println!("  Total:       {}", stats.total_words);
            for status in WordStatus::ALL {
                let count = match status {
                    WordStatus::New => stats.new_words,
                    WordStatus::Learning => stats.learning_words,
                    WordStatus::Reviewing => stats.reviewing_words,
                    WordStatus::Learned => stats.learned_words,
                };
                let label = format!("{:<12}", format!("{}:", status.label()));
                println!(
                    "  {} {:>4} ({}%)",
                    terminal::paint(&label, terminal::status_color(status), use_color),
                    count,
                    stats.percentage(status)
                );
            }
            println!("  Difficult:   {}", stats.difficult_words);
            println!("  Due now:     {}", stats.due_words);
            println!();
            println!("{}", terminal::paint("Activity", Color::BOLD, use_color));
            println!("  Added this week:    {}", stats.added_this_week);
            println!("  Active last week:   {}", stats.active_last_week);
            println!("  Viewed this month:  {}", stats.viewed_this_month);
            println!();
            println!("{}", terminal::paint("Translation API", Color::BOLD, use_color));
            println!(
                "  Calls today: {} / {} ({}%)",
                api.call_count,
                api.daily_limit,
                api.usage_percent()
            );
        }
    }

    Ok(())
}
