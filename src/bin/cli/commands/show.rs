use anyhow::Result;

use recall_lib::questions::algorithm::{format_due, format_interval, preview_intervals};
use recall_lib::questions::{now_millis, QuestionStatus};

use crate::app::App;
use crate::render::terminal::{self, paint, Color};
use crate::OutputFormat;

pub fn run(app: &App, id: i64, format: &OutputFormat, use_color: bool) -> Result<()> {
    let record = app.get_question(id)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        OutputFormat::Plain => {
            for line in terminal::question_body(&record, use_color) {
                println!("{}", line);
            }
            println!();
            println!("Answer:  {}", paint(record.correct_answer.as_str(), Color::GREEN, use_color));
            println!("Streak:  {}", record.streak);
            println!("Created: {}", terminal::format_timestamp(record.created_at));

            match record.status {
                QuestionStatus::Completed => println!("Status:  completed"),
                QuestionStatus::Active => {
                    println!(
                        "Next:    {} ({})",
                        terminal::format_timestamp(record.next_review_date),
                        format_due(record.next_review_date, now_millis())
                    );
                    let (correct, incorrect) = preview_intervals(&record);
                    let correct = correct.map_or_else(|| "completes".to_string(), format_interval);
                    println!(
                        "{}",
                        paint(
                            &format!("If correct: {}  If incorrect: {}", correct, format_interval(incorrect)),
                            Color::DIM,
                            use_color
                        )
                    );
                }
            }

            let explanation = terminal::explanation(&record, use_color);
            if !explanation.is_empty() {
                println!();
                for line in explanation {
                    println!("{}", line);
                }
            }
        }
    }

    Ok(())
}
