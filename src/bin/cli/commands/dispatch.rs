use anyhow::Result;

use crate::app::App;

/// Print the full `{success, error?, data?}` response as JSON
pub fn run(app: &mut App, request: &str) -> Result<()> {
    let response = app.dispatch_json(request.trim());
    println!("{}", serde_json::to_string_pretty(&response)?);
    if !response.success {
        std::process::exit(1);
    }
    Ok(())
}
