use anyhow::Result;

use recall_lib::questions::now_millis;

use crate::app::App;
use crate::render::terminal;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let due = app.due_questions()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&due)?);
        }
        OutputFormat::Plain => {
            if due.is_empty() {
                println!("Nothing due. Come back later.");
                return Ok(());
            }
            let now = now_millis();
            for record in &due {
                println!("{}", terminal::question_line(record, now, use_color));
            }
            println!("\n{} due", due.len());
        }
    }

    Ok(())
}
