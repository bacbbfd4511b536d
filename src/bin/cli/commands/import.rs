use std::path::Path;

use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, file: &Path, source: Option<&str>, format: &OutputFormat) -> Result<()> {
    let report = app.import_file(file, source)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Plain => {
            println!("{} from {}", report.summary(), file.display());
            if report.skipped > 0 {
                println!("  Skipped {} rows with no question text", report.skipped);
            }
            for rejected in &report.rejected {
                println!("  Row {}: {}", rejected.row, rejected.reason);
            }
        }
    }

    Ok(())
}
