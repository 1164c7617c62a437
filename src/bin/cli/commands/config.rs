use anyhow::{bail, Result};
use serde_json::{Map, Value};

use language_learner_lib::commands::Command;
use language_learner_lib::settings::Settings;
use language_learner_lib::storage::DATA_DIR_ENV;

use crate::app::App;
use crate::OutputFormat;

pub fn run_show(app: &App, format: &OutputFormat) -> Result<()> {
    let settings = app.settings()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&settings)?),
        OutputFormat::Plain => {
            println!("Data directory: {}", app.data_dir().display());
            println!("  (override with --data-dir or ${})", DATA_DIR_ENV);
            println!();
            if let Value::Object(fields) = serde_json::to_value(&settings)? {
                let width = fields.keys().map(|k| k.len()).max().unwrap_or(0);
                for (key, value) in fields {
                    let value = match value {
                        Value::String(s) => s,
                        other => other.to_string(),
                    };
                    println!("{:<w$}  {}", key, value, w = width);
                }
            }
        }
    }

    Ok(())
}

/// Parse `value` as JSON, falling back to a plain string
fn parse_value(value: &str) -> Value {
    serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()))
}

pub fn run_set(app: &mut App, key: &str, value: &str, format: &OutputFormat) -> Result<()> {
    let known = match serde_json::to_value(Settings::default())? {
        Value::Object(fields) => fields.contains_key(key),
        _ => false,
    };
    if !known {
        bail!("Unknown setting '{}'. Run `config show` to list settings.", key);
    }

    let mut patch = Map::new();
    patch.insert(key.to_string(), parse_value(value));

    let settings: Settings = app.call(Command::SaveSettings {
        settings: Value::Object(patch),
    })?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&settings)?),
        OutputFormat::Plain => println!("Set {} = {}", key, value),
    }

    Ok(())
}

pub fn run_clear_cache(app: &mut App, format: &OutputFormat) -> Result<()> {
    app.call_unit(Command::ClearTranslationCache)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "cleared": true })),
        OutputFormat::Plain => println!("Translation cache cleared"),
    }

    Ok(())
}
