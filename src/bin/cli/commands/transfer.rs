use std::path::PathBuf;

use anyhow::{Context, Result};

use language_learner_lib::commands::{Affected, Command, ExportedFile};
use language_learner_lib::export::ExportFormat;

use crate::app::App;
use crate::{ExportKind, OutputFormat};

pub fn run_export(
    app: &mut App,
    kind: ExportKind,
    output: Option<PathBuf>,
    format: &OutputFormat,
) -> Result<()> {
    let export_format = match kind {
        ExportKind::Json => ExportFormat::Json,
        ExportKind::Csv => ExportFormat::Csv,
    };
    let file: ExportedFile = app.call(Command::ExportWords { format: export_format })?;

    if output.as_deref().map_or(false, |p| p.as_os_str() == "-") {
        print!("{}", file.content);
        return Ok(());
    }

    let path = output.unwrap_or_else(|| PathBuf::from(&file.file_name));
    std::fs::write(&path, &file.content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Wrote export to {}", path.display());

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "path": path.to_string_lossy(),
                "format": file.format,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => println!("Exported to {}", path.display()),
    }

    Ok(())
}

pub fn run_import(app: &mut App, content: String, format: &OutputFormat) -> Result<()> {
    let imported: Affected = app.call(Command::ImportWords { content })?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&imported)?),
        OutputFormat::Plain => println!("Imported {} words", imported.count),
    }
    Ok(())
}
