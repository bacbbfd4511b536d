use chrono::{Local, TimeZone};
use recall_lib::questions::algorithm::format_due;
use recall_lib::questions::{QuestionRecord, QuestionStatus, Timestamp};

/// ANSI color codes
#[allow(dead_code)]
pub struct Color;

#[allow(dead_code)]
impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

/// Wrap `text` in `color` when colors are enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Local date and time for an epoch-millisecond timestamp
pub fn format_timestamp(ts: Timestamp) -> String {
    match Local.timestamp_millis_opt(ts).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => ts.to_string(),
    }
}

/// One-line summary used by listings
pub fn question_line(record: &QuestionRecord, now: Timestamp, use_color: bool) -> String {
    let first_line = record.text.lines().next().unwrap_or("");
    let title = truncate(first_line, 60);
    let due = match record.status {
        QuestionStatus::Completed => "completed".to_string(),
        QuestionStatus::Active => format_due(record.next_review_date, now),
    };

    format!(
        "{:>6}  {}  {}",
        paint(&format!("#{}", record.id), Color::CYAN, use_color),
        title,
        paint(&format!("[streak {}, {}]", record.streak, due), Color::GRAY, use_color),
    )
}

/// Full question text as presented for answering
pub fn question_body(record: &QuestionRecord, use_color: bool) -> Vec<String> {
    let mut lines = vec![paint(&format!("Question #{}", record.id), Color::BOLD, use_color)];
    lines.extend(wrap_lines(&record.text, "  ", 80));
    if !record.source.is_empty() {
        lines.push(paint(&format!("  Source: {}", record.source), Color::DIM, use_color));
    }
    lines
}

/// Explanation block shown after an answer
pub fn explanation(record: &QuestionRecord, use_color: bool) -> Vec<String> {
    if record.explanation.trim().is_empty() {
        return Vec::new();
    }
    let mut lines = vec![paint("Explanation", Color::BOLD, use_color)];
    lines.extend(wrap_lines(&record.explanation, "  ", 80));
    lines
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", cut)
}

/// Word-wrap text to `max_width` columns, keeping explicit line breaks
pub fn wrap_lines(text: &str, prefix: &str, max_width: usize) -> Vec<String> {
    let width = max_width.saturating_sub(prefix.len()).max(20);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();
            let current_len = current.chars().count();
            if current_len > 0 && current_len + 1 + word_len > width {
                lines.push(format!("{}{}", prefix, current));
                current.clear();
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        if !current.is_empty() {
            lines.push(format!("{}{}", prefix, current));
        }
    }

    lines
}
