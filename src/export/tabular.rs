use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone, Utc};
use csv::{QuoteStyle, WriterBuilder};

use super::{ExportError, Result};
use crate::vocabulary::SavedWord;

pub const CSV_HEADER: [&str; 8] = [
    "Kelime",
    "Çeviri",
    "Durum",
    "Zorluk",
    "Görüntülenme",
    "Son Görüntülenme",
    "Bağlam",
    "Oluşturma Tarihi",
];

/// One row per word. Text columns are always quoted, the view count is not.
/// Dates are local calendar days.
pub fn export_csv(words: &[SavedWord]) -> Result<String> {
    export_csv_in(words, &Local)
}

/// [`export_csv`] with dates shown in `tz`
pub fn export_csv_in<Tz>(words: &[SavedWord], tz: &Tz) -> Result<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::NonNumeric)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for word in words {
        let view_count = word.view_count.to_string();
        let last_viewed = word
            .last_viewed
            .map(|at| calendar_date(at, tz))
            .unwrap_or_default();
        let context = word.contexts.first().map(|c| c.text.as_str()).unwrap_or("");
        let added = calendar_date(word.date_added, tz);

        writer.write_record([
            word.word.as_str(),
            word.translation.as_str(),
            word.status.label(),
            word.difficulty.label(),
            view_count.as_str(),
            last_viewed.as_str(),
            context,
            added.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| ExportError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

fn calendar_date<Tz>(date: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    date.with_timezone(tz).format("%Y-%m-%d").to_string()
}
