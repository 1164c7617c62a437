use chrono::{DateTime, Local, Utc};

use language_learner_lib::vocabulary::schedule::format_review_date;
use language_learner_lib::vocabulary::{Difficulty, SavedWord, SourceTimestamp, WordStatus};

/// ANSI color codes
#[allow(dead_code)]
pub struct Color;

#[allow(dead_code)]
impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const MAGENTA: &str = "\x1b[35m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

/// Wrap text in a color when colors are enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

pub fn status_color(status: WordStatus) -> &'static str {
    match status {
        WordStatus::New => Color::BLUE,
        WordStatus::Learning => Color::YELLOW,
        WordStatus::Reviewing => Color::MAGENTA,
        WordStatus::Learned => Color::GREEN,
    }
}

/// `[#####-----]` style bar for a 0-100 progress value
pub fn progress_bar(progress: u8, width: usize) -> String {
    let filled = (progress.min(100) as usize * width + 50) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Shorten to `width` characters, ending with "..." when cut
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

fn local_date(date: DateTime<Utc>) -> String {
    date.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

/// One line per word: word, translation, status, progress, views, next review
pub fn print_word_table(words: &[SavedWord], now: DateTime<Utc>, use_color: bool) {
    let word_width = words
        .iter()
        .map(|w| w.word.chars().count())
        .max()
        .unwrap_or(4)
        .clamp(4, 24);
    let translation_width = words
        .iter()
        .map(|w| w.translation.chars().count())
        .max()
        .unwrap_or(11)
        .clamp(11, 28);
    let status_width = 12;

    println!(
        "{:<ww$} {:<tw$} {:<sw$} {:<17} {:>5} {}",
        "Word", "Translation", "Status", "Progress", "Views", "Next review",
        ww = word_width, tw = translation_width, sw = status_width
    );
    println!(
        "{} {} {} {} {} {}",
        "\u{2500}".repeat(word_width),
        "\u{2500}".repeat(translation_width),
        "\u{2500}".repeat(status_width),
        "\u{2500}".repeat(17),
        "\u{2500}".repeat(5),
        "\u{2500}".repeat(11)
    );

    for word in words {
        let mut name = format!("{:<ww$}", truncate(&word.word, word_width), ww = word_width);
        if word.difficulty == Difficulty::Difficult {
            name = paint(&name, Color::RED, use_color);
        }
        let status = format!("{:<sw$}", word.status.label(), sw = status_width);
        let progress = format!("{} {:>3}%", progress_bar(word.learning_progress, 10), word.learning_progress);

        println!(
            "{} {:<tw$} {} {} {:>5} {}",
            name,
            truncate(&word.translation, translation_width),
            paint(&status, status_color(word.status), use_color),
            progress,
            word.view_count,
            format_review_date(word.next_review_date, now),
            tw = translation_width
        );
    }
}

/// Full record view
pub fn print_word_detail(word: &SavedWord, now: DateTime<Utc>, use_color: bool) {
    println!("{}", paint(&word.word, Color::BOLD, use_color));
    println!("  {}", word.translation);
    println!();
    println!(
        "  Status:      {}",
        paint(word.status.label(), status_color(word.status), use_color)
    );
    println!(
        "  Progress:    {} {}%",
        progress_bar(word.learning_progress, 20),
        word.learning_progress
    );
    println!("  Difficulty:  {}", word.difficulty.label());
    println!("  Reviews:     {}", word.review_count);
    println!("  Views:       {}", word.view_count);
    println!("  Added:       {}", local_date(word.date_added));
    if let Some(last_viewed) = word.last_viewed {
        println!("  Last viewed: {}", local_date(last_viewed));
    }
    println!("  Next review: {}", format_review_date(word.next_review_date, now));

    if !word.contexts.is_empty() {
        println!();
        println!("  {}", paint("Contexts", Color::BOLD, use_color));
        for context in &word.contexts {
            for line in wrap_lines(&format!("\"{}\"", context.text), "    ", 80) {
                println!("{}", line);
            }
            if !context.source.is_empty() {
                println!("    {}", paint(&format!("- {}", context.source), Color::DIM, use_color));
            }
        }
    }

    if !word.sources.is_empty() {
        println!();
        println!("  {}", paint("Sources", Color::BOLD, use_color));
        for source in &word.sources {
            let at = match &source.timestamp {
                SourceTimestamp::Position(seconds) => format_position(*seconds),
                SourceTimestamp::At(at) => local_date(*at),
            };
            println!("    {} ({})", source.name, at);
            if !source.url.is_empty() {
                println!("    {}", paint(&source.url, Color::GRAY, use_color));
            }
        }
    }
}

/// Playback position as `m:ss` or `h:mm:ss`
fn format_position(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Simple word-wrapping for terminal output
fn wrap_lines(text: &str, prefix: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let effective_width = max_width.saturating_sub(prefix.chars().count());

    let mut current_line = String::new();
    for word in text.split_whitespace() {
        if current_line.is_empty() {
            current_line = word.to_string();
        } else if current_line.chars().count() + 1 + word.chars().count() <= effective_width {
            current_line.push(' ');
            current_line.push_str(word);
        } else {
            lines.push(format!("{}{}", prefix, current_line));
            current_line = word.to_string();
        }
    }
    if !current_line.is_empty() {
        lines.push(format!("{}{}", prefix, current_line));
    }

    lines
}
