use std::io::{self, BufRead, Write};

use anyhow::Result;

use recall_lib::ingest::parse_answer;
use recall_lib::questions::algorithm::format_due;
use recall_lib::questions::{now_millis, AnswerToken, QuestionStatus};

use crate::app::App;
use crate::render::terminal::{self, paint, Color};

enum Input {
    Answer(AnswerToken),
    Delete,
    Quit,
}

pub fn run(app: &App, limit: Option<usize>, use_color: bool) -> Result<()> {
    let mut session = app.start_review(limit)?;
    if session.is_empty() {
        println!("Nothing due. Come back later.");
        return Ok(());
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while let Some(record) = session.current().cloned() {
        let (position, total) = session.progress();
        println!();
        println!("{}", paint(&format!("[{}/{}]", position, total), Color::GRAY, use_color));
        for line in terminal::question_body(&record, use_color) {
            println!("{}", line);
        }

        let input = match read_input(&mut lines, record.correct_answer.is_choice())? {
            Some(input) => input,
            None => break,
        };

        match input {
            Input::Quit => break,
            Input::Delete => {
                print!("Delete question #{} permanently? [y/N] ", record.id);
                io::stdout().flush()?;
                let confirmed = matches!(
                    lines.next().transpose()?.as_deref().map(str::trim),
                    Some("y") | Some("Y")
                );
                if confirmed {
                    session.delete_current()?;
                    println!("Deleted question #{}", record.id);
                }
            }
            Input::Answer(given) => {
                let outcome = session.answer(given, now_millis())?;
                if outcome.is_correct {
                    println!("{}", paint("Correct", Color::GREEN, use_color));
                } else {
                    println!(
                        "{} (answer: {})",
                        paint("Incorrect", Color::RED, use_color),
                        record.correct_answer
                    );
                }
                for line in terminal::explanation(&outcome.record, use_color) {
                    println!("{}", line);
                }
                let next = match outcome.record.status {
                    QuestionStatus::Completed => "Completed".to_string(),
                    QuestionStatus::Active => {
                        format!("Next review {}", format_due(outcome.record.next_review_date, now_millis()))
                    }
                };
                println!("{}", paint(&next, Color::DIM, use_color));
            }
        }
    }

    let summary = session.summary();
    println!();
    println!(
        "Answered {} ({} correct), deleted {}",
        summary.answered, summary.correct, summary.deleted
    );

    Ok(())
}

/// Prompt until the learner enters an answer or a command; `None` on end of input
fn read_input<B: BufRead>(lines: &mut io::Lines<B>, is_choice: bool) -> Result<Option<Input>> {
    let prompt = if is_choice {
        "Answer [1-5], d = delete, q = quit: "
    } else {
        "Answer [o/x], d = delete, q = quit: "
    };

    loop {
        print!("{}", prompt);
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => return Ok(None),
        };

        match line.trim() {
            "" => continue,
            "q" | "Q" => return Ok(Some(Input::Quit)),
            "d" | "D" => return Ok(Some(Input::Delete)),
            other => match parse_answer(other) {
                Ok(token) => return Ok(Some(Input::Answer(token))),
                Err(e) => println!("{}", e),
            },
        }
    }
}
