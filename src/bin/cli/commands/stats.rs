use anyhow::Result;

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let stats = app.stats()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Plain => {
            println!("Active:    {}", stats.active);
            println!("Completed: {}", paint(&stats.completed.to_string(), Color::GREEN, use_color));
            let due_color = if stats.due_now > 0 { Color::YELLOW } else { Color::GRAY };
            println!("Due now:   {}", paint(&stats.due_now.to_string(), due_color, use_color));
        }
    }

    Ok(())
}
