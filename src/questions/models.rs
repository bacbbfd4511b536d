//! Data models for the question review system

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Milliseconds since the Unix epoch
pub type Timestamp = i64;

/// One day in milliseconds
pub const DAY_MS: i64 = 86_400_000;

/// Current wall-clock time as a [`Timestamp`]
pub fn now_millis() -> Timestamp {
    Utc::now().timestamp_millis()
}

/// Store-assigned identifier of a question, never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub i64);

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for QuestionId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("not a canonical answer token: {0:?}")]
pub struct InvalidAnswerToken(pub String);

/// Canonical answer a question accepts.
///
/// True/false questions use `O` (correct statement) and `X` (incorrect
/// statement); multiple choice questions use the option number 1-5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AnswerToken {
    O,
    X,
    One,
    Two,
    Three,
    Four,
    Five,
}

impl AnswerToken {
    pub const ALL: [AnswerToken; 7] = [
        AnswerToken::O,
        AnswerToken::X,
        AnswerToken::One,
        AnswerToken::Two,
        AnswerToken::Three,
        AnswerToken::Four,
        AnswerToken::Five,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::O => "O",
            Self::X => "X",
            Self::One => "1",
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::Five => "5",
        }
    }

    /// Token for a 1-based option number
    pub fn from_choice(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            3 => Some(Self::Three),
            4 => Some(Self::Four),
            5 => Some(Self::Five),
            _ => None,
        }
    }

    /// Whether this answers a multiple choice (1-5) rather than a true/false question
    pub fn is_choice(self) -> bool {
        !matches!(self, Self::O | Self::X)
    }
}

impl fmt::Display for AnswerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AnswerToken {
    type Error = InvalidAnswerToken;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|token| token.as_str() == value)
            .ok_or_else(|| InvalidAnswerToken(value.to_string()))
    }
}

impl TryFrom<String> for AnswerToken {
    type Error = InvalidAnswerToken;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<AnswerToken> for String {
    fn from(token: AnswerToken) -> Self {
        token.as_str().to_string()
    }
}

/// Lifecycle state of a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionStatus {
    /// Still being scheduled for review
    #[default]
    Active,
    /// Cleared every step of the ladder; never due again
    Completed,
}

impl QuestionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// A normalized question handed to the store by ingestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuestion {
    pub text: String,
    pub correct_answer: AnswerToken,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub source: String,
}

impl NewQuestion {
    pub fn new(text: impl Into<String>, correct_answer: AnswerToken) -> Self {
        Self {
            text: text.into(),
            correct_answer,
            explanation: String::new(),
            source: String::new(),
        }
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }
}

/// A persisted question together with its review state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub id: QuestionId,
    pub text: String,
    pub correct_answer: AnswerToken,
    pub explanation: String,
    pub source: String,
    pub status: QuestionStatus,
    /// Consecutive correct answers since creation or the last miss
    pub streak: u32,
    /// Earliest instant the question may be reviewed again
    pub next_review_date: Timestamp,
    pub created_at: Timestamp,
}

impl QuestionRecord {
    /// Build the initial record for a freshly inserted question
    pub fn from_new(id: QuestionId, question: NewQuestion, now: Timestamp) -> Self {
        Self {
            id,
            text: question.text,
            correct_answer: question.correct_answer,
            explanation: question.explanation,
            source: question.source,
            status: QuestionStatus::Active,
            streak: 0,
            next_review_date: now,
            created_at: now,
        }
    }

    /// Check if the question is due for review at `now`
    pub fn is_due(&self, now: Timestamp) -> bool {
        self.status == QuestionStatus::Active && self.next_review_date <= now
    }

    pub fn is_completed(&self) -> bool {
        self.status == QuestionStatus::Completed
    }
}

/// Dashboard counts over the whole store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub active: usize,
    pub completed: usize,
    pub due_now: usize,
}
