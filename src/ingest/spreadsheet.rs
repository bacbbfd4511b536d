//! Spreadsheet rows to questions
//!
//! Sheets exported from question banks usually carry a header row somewhere
//! near the top ("問題", "正解", "解説" or their English equivalents). When no
//! header is found the first three columns are taken as question, answer and
//! explanation, and every row is data.

use std::io::Read;

use crate::questions::NewQuestion;

use super::normalize::parse_answer;
use super::IngestBatch;

/// How many leading rows are searched for a header
const HEADER_SCAN_ROWS: usize = 10;

/// Column positions of the fields we read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub text: usize,
    pub answer: Option<usize>,
    pub explanation: Option<usize>,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            text: 0,
            answer: Some(1),
            explanation: Some(2),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderKind {
    Text,
    Answer,
    Explanation,
}

/// English header cells must match one of these names exactly, ignoring case
const ENGLISH_TEXT_HEADERS: &[&str] = &["question", "questions", "question text"];
const ENGLISH_ANSWER_HEADERS: &[&str] = &["answer", "correct answer", "correct_answer", "correct"];
const ENGLISH_EXPLANATION_HEADERS: &[&str] = &["explanation", "explanations", "commentary"];

fn header_kind(cell: &str) -> Option<HeaderKind> {
    let cell = cell.trim();
    let lower = cell.to_lowercase();
    let english = |names: &[&str]| names.iter().any(|name| *name == lower);

    if cell.contains("問題") || english(ENGLISH_TEXT_HEADERS) {
        Some(HeaderKind::Text)
    } else if cell.contains("正解") || cell == "答え" || english(ENGLISH_ANSWER_HEADERS) {
        Some(HeaderKind::Answer)
    } else if cell.contains("解説") || english(ENGLISH_EXPLANATION_HEADERS) {
        Some(HeaderKind::Explanation)
    } else {
        None
    }
}

/// Find the header row among the first rows.
///
/// Returns the header's row index and the column layout it describes. A row
/// only counts as a header if it names the question column.
pub fn detect_header(rows: &[Vec<String>]) -> Option<(usize, ColumnMap)> {
    for (row_idx, row) in rows.iter().take(HEADER_SCAN_ROWS).enumerate() {
        let mut text = None;
        let mut answer = None;
        let mut explanation = None;

        for (col, cell) in row.iter().enumerate() {
            match header_kind(cell) {
                Some(HeaderKind::Text) => text = Some(col),
                Some(HeaderKind::Answer) => answer = Some(col),
                Some(HeaderKind::Explanation) => explanation = Some(col),
                None => {}
            }
        }

        if let Some(text) = text {
            return Some((
                row_idx,
                ColumnMap {
                    text,
                    answer,
                    explanation,
                },
            ));
        }
    }

    None
}

fn cell(row: &[String], col: Option<usize>) -> &str {
    col.and_then(|c| row.get(c)).map(String::as_str).unwrap_or("")
}

/// Normalize spreadsheet rows into questions labelled with `source`
pub fn rows_to_questions(rows: &[Vec<String>], source: &str) -> IngestBatch {
    let (first_data_row, columns) = match detect_header(rows) {
        Some((header_idx, columns)) => (header_idx + 1, columns),
        None => (0, ColumnMap::default()),
    };

    let mut batch = IngestBatch::default();

    for (row_idx, row) in rows.iter().enumerate().skip(first_data_row) {
        if row.iter().all(|c| c.trim().is_empty()) {
            continue;
        }

        let text = cell(row, Some(columns.text));
        if text.trim().is_empty() {
            batch.skipped += 1;
            continue;
        }

        match parse_answer(cell(row, columns.answer)) {
            Ok(correct_answer) => batch.questions.push(
                NewQuestion::new(text, correct_answer)
                    .with_explanation(cell(row, columns.explanation))
                    .with_source(source),
            ),
            Err(reason) => batch.reject(row_idx + 1, reason),
        }
    }

    batch
}

/// Read delimited text into rows of cells. Rows may have differing lengths.
pub fn read_delimited<R: Read>(reader: R, delimiter: u8) -> Result<Vec<Vec<String>>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::ValidationError;
    use crate::questions::AnswerToken;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_japanese_header_after_title_rows() {
        let data = rows(&[
            &["行政法 過去問"],
            &[],
            &["No.", "解説", "問題文", "正解"],
            &["1", "判例", "処分性は認められる。", "○"],
            &["2", "", "取消訴訟の被告は国である。", "×"],
        ]);

        let (header_idx, columns) = detect_header(&data).unwrap();
        assert_eq!(header_idx, 2);
        assert_eq!(
            columns,
            ColumnMap { text: 2, answer: Some(3), explanation: Some(1) }
        );

        let batch = rows_to_questions(&data, "gyosei.csv");
        assert_eq!(batch.questions.len(), 2);
        assert_eq!(batch.questions[0].correct_answer, AnswerToken::O);
        assert_eq!(batch.questions[0].explanation, "判例");
        assert_eq!(batch.questions[1].correct_answer, AnswerToken::X);
        assert_eq!(batch.questions[1].source, "gyosei.csv");
    }

    #[test]
    fn test_answer_header_exact_match() {
        let data = rows(&[&["問題", "答え"], &["Q", "３"]]);
        let batch = rows_to_questions(&data, "");
        assert_eq!(batch.questions[0].correct_answer, AnswerToken::Three);
        assert_eq!(batch.questions[0].explanation, "");
    }

    #[test]
    fn test_english_header() {
        let data = rows(&[
            &["Question", "Correct answer", "Explanation"],
            &["Q1", "x", "because"],
        ]);
        let batch = rows_to_questions(&data, "en.csv");
        assert_eq!(batch.questions.len(), 1);
        assert_eq!(batch.questions[0].correct_answer, AnswerToken::X);
        assert_eq!(batch.questions[0].explanation, "because");
    }

    #[test]
    fn test_english_prose_is_not_a_header() {
        let data = rows(&[
            &["Which question type is barred by statute?", "2", "See Art. 5"],
            &["The answer to this one is?", "o"],
        ]);
        assert!(detect_header(&data).is_none());

        let batch = rows_to_questions(&data, "plain.csv");
        assert_eq!(batch.questions.len(), 2);
        assert_eq!(batch.questions[0].text, "Which question type is barred by statute?");
        assert_eq!(batch.questions[0].correct_answer, AnswerToken::Two);
        assert_eq!(batch.questions[1].correct_answer, AnswerToken::O);
    }

    #[test]
    fn test_default_columns_without_header() {
        let data = rows(&[&["Q1", "1", "E1"], &["Q2", "o"]]);
        assert!(detect_header(&data).is_none());

        let batch = rows_to_questions(&data, "plain.csv");
        assert_eq!(batch.questions.len(), 2);
        assert_eq!(batch.questions[0].text, "Q1");
        assert_eq!(batch.questions[0].correct_answer, AnswerToken::One);
        assert_eq!(batch.questions[0].explanation, "E1");
        assert_eq!(batch.questions[1].explanation, "");
    }

    #[test]
    fn test_blank_text_skipped_and_bad_answers_rejected() {
        let data = rows(&[
            &["問題", "正解"],
            &["", "1"],
            &["Q2", "yes"],
            &["Q3", ""],
            &["Q4", "2"],
        ]);

        let batch = rows_to_questions(&data, "");
        assert_eq!(batch.questions.len(), 1);
        assert_eq!(batch.skipped, 1);
        assert_eq!(batch.rejected.len(), 2);
        assert_eq!(batch.rejected[0].row, 3);
        assert_eq!(
            batch.rejected[0].reason,
            ValidationError::UnrecognizedAnswer("yes".to_string())
        );
        assert_eq!(batch.rejected[1].reason, ValidationError::MissingAnswer);
    }

    #[test]
    fn test_header_without_answer_column_rejects_rows() {
        let data = rows(&[&["問題", "解説"], &["Q", "E"]]);
        let batch = rows_to_questions(&data, "");
        assert!(batch.questions.is_empty());
        assert_eq!(batch.rejected[0].reason, ValidationError::MissingAnswer);
    }

    #[test]
    fn test_read_delimited() {
        let input = "問題,正解\n\"a, with comma\",1\nshort\n";
        let rows = read_delimited(input.as_bytes(), b',').unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1][0], "a, with comma");
        assert_eq!(rows[2], vec!["short".to_string()]);

        let tsv = read_delimited("Q\t5\n".as_bytes(), b'\t').unwrap();
        assert_eq!(tsv[0], vec!["Q".to_string(), "5".to_string()]);
    }
}
