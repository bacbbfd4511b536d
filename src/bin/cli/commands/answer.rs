use anyhow::Result;

use recall_lib::questions::algorithm::format_due;
use recall_lib::questions::{now_millis, QuestionStatus};

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub fn run(app: &App, id: i64, is_correct: bool, format: &OutputFormat, use_color: bool) -> Result<()> {
    let record = app.answer(id, is_correct)?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "isCorrect": is_correct,
                "question": record,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            let verdict = if is_correct {
                paint("Correct", Color::GREEN, use_color)
            } else {
                paint("Incorrect", Color::RED, use_color)
            };
            match record.status {
                QuestionStatus::Completed => {
                    println!("{}: question #{} completed", verdict, record.id);
                }
                QuestionStatus::Active => {
                    println!(
                        "{}: question #{} streak {}, next review {}",
                        verdict,
                        record.id,
                        record.streak,
                        format_due(record.next_review_date, now_millis())
                    );
                }
            }
        }
    }

    Ok(())
}
