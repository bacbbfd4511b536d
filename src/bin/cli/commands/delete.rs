use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, id: i64, format: &OutputFormat) -> Result<()> {
    app.delete_question(id)?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({ "id": id, "deleted": true });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Deleted question #{}", id);
        }
    }

    Ok(())
}
