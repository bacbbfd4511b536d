//! Questions produced by a generative model
//!
//! Two payload shapes come back from generation:
//! - Multiple choice: `{question, options, correctIndex, explanation, reference}`
//!   with a 0-based `correctIndex`
//! - Extraction from a photo or document: `{text, correctAnswer, explanation}`
//!
//! Either may arrive as a single object or an array.

use serde::Deserialize;
use serde_json::Value;

use crate::questions::{AnswerToken, NewQuestion};

use super::normalize::parse_answer;
use super::{IngestBatch, IngestError, ValidationError};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuiz {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    /// Kept raw so a missing or mistyped index is reported, not dropped
    #[serde(default)]
    pub correct_index: Option<Value>,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub reference: String,
}

impl GeneratedQuiz {
    /// Question text with numbered options appended, one per line
    fn text(&self) -> String {
        let mut text = self.question.clone();
        for (i, option) in self.options.iter().enumerate() {
            text.push_str(&format!("\n{}. {}", i + 1, option));
        }
        text
    }

    fn explanation(&self) -> String {
        match (self.explanation.trim().is_empty(), self.reference.trim().is_empty()) {
            (_, true) => self.explanation.clone(),
            (true, false) => format!("Reference: {}", self.reference),
            (false, false) => format!("{}\n\nReference: {}", self.explanation, self.reference),
        }
    }

    fn answer(&self) -> Result<AnswerToken, ValidationError> {
        let index = match &self.correct_index {
            None | Some(Value::Null) => return Err(ValidationError::MissingAnswer),
            Some(value) => value
                .as_i64()
                .ok_or_else(|| ValidationError::UnrecognizedAnswer(value.to_string()))?,
        };

        let out_of_range = || ValidationError::ChoiceOutOfRange {
            index,
            options: self.options.len(),
        };

        if !self.options.is_empty() && index >= self.options.len() as i64 {
            return Err(out_of_range());
        }
        u8::try_from(index.saturating_add(1))
            .ok()
            .and_then(AnswerToken::from_choice)
            .ok_or_else(out_of_range)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedQuestion {
    #[serde(default)]
    pub text: String,
    /// String or number, whichever the model chose to emit
    #[serde(default)]
    pub correct_answer: Value,
    #[serde(default)]
    pub explanation: String,
}

impl ExtractedQuestion {
    fn answer(&self) -> Result<AnswerToken, ValidationError> {
        match &self.correct_answer {
            Value::String(raw) => parse_answer(raw),
            Value::Number(number) => parse_answer(&number.to_string()),
            Value::Null => Err(ValidationError::MissingAnswer),
            other => Err(ValidationError::UnrecognizedAnswer(other.to_string())),
        }
    }
}

/// Text, explanation and answer of one item, whichever shape it came in
type ItemParts = (String, String, Result<AnswerToken, ValidationError>);

fn normalize_item(item: Value) -> Result<ItemParts, serde_json::Error> {
    // Multiple choice items are recognized by their `question` key
    if item.get("question").is_some() {
        let quiz: GeneratedQuiz = serde_json::from_value(item)?;
        Ok((quiz.text(), quiz.explanation(), quiz.answer()))
    } else {
        let extracted: ExtractedQuestion = serde_json::from_value(item)?;
        let answer = extracted.answer();
        Ok((extracted.text, extracted.explanation, answer))
    }
}

/// Parse a generation payload and normalize it into questions labelled with `source`
pub fn parse_generated_json(json: &str, source: &str) -> Result<IngestBatch, IngestError> {
    let items = match serde_json::from_str::<Value>(json)? {
        Value::Array(items) => items,
        item => vec![item],
    };

    let mut batch = IngestBatch::default();

    for (idx, item) in items.into_iter().enumerate() {
        let (text, explanation, answer) = match normalize_item(item) {
            Ok(parts) => parts,
            Err(e) => {
                batch.reject(idx + 1, ValidationError::MalformedItem(e.to_string()));
                continue;
            }
        };

        if text.trim().is_empty() {
            batch.skipped += 1;
            continue;
        }

        match answer {
            Ok(correct_answer) => batch.questions.push(
                NewQuestion::new(text, correct_answer)
                    .with_explanation(explanation)
                    .with_source(source),
            ),
            Err(reason) => batch.reject(idx + 1, reason),
        }
    }

    Ok(batch)
}
