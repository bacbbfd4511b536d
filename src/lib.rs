//! Spaced-repetition review engine for multiple-choice exam questions.
//!
//! Questions enter through [`ingest`], live in a [`questions::QuestionStore`],
//! and are rescheduled on a fixed ladder of intervals every time the learner
//! answers them.

pub mod config;
pub mod ingest;
pub mod questions;
