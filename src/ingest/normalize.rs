//! Answer token normalization
//!
//! Question sources write answers in many ways: circle and cross glyphs in
//! several widths, Latin letters, ASCII or full-width digits. Each raw value
//! is classified into a [`RawAnswer`] and only recognized forms map to an
//! [`AnswerToken`].

use crate::questions::AnswerToken;

use super::ValidationError;

const CIRCLE_FORMS: &[&str] = &["O", "o", "○", "◯", "〇", "⭕", "Ｏ", "ｏ"];
const CROSS_FORMS: &[&str] = &["X", "x", "×", "☓", "✕", "✖", "❌", "Ｘ", "ｘ"];

/// Emoji presentation selector that often trails ⭕ and ❌
const VARIATION_SELECTOR: char = '\u{fe0f}';

/// Recognized shape of a raw answer cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawAnswer<'a> {
    /// True statement marker
    Circle,
    /// False statement marker
    Cross,
    /// Option number 1-5
    Choice(u8),
    /// Anything else, trimmed
    Unrecognized(&'a str),
}

impl<'a> RawAnswer<'a> {
    pub fn classify(raw: &'a str) -> Self {
        let value = raw.trim();
        let glyph = value.trim_end_matches(VARIATION_SELECTOR);

        if CIRCLE_FORMS.contains(&glyph) {
            return Self::Circle;
        }
        if CROSS_FORMS.contains(&glyph) {
            return Self::Cross;
        }
        match choice_number(value) {
            Some(number) => Self::Choice(number),
            None => Self::Unrecognized(value),
        }
    }

    pub fn token(self) -> Option<AnswerToken> {
        match self {
            Self::Circle => Some(AnswerToken::O),
            Self::Cross => Some(AnswerToken::X),
            Self::Choice(number) => AnswerToken::from_choice(number),
            Self::Unrecognized(_) => None,
        }
    }
}

/// A single ASCII or full-width digit in 1-5
fn choice_number(value: &str) -> Option<u8> {
    let mut chars = value.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }

    let digit = match c {
        '1'..='5' => c as u32 - '0' as u32,
        '１'..='５' => c as u32 - '０' as u32,
        _ => return None,
    };
    u8::try_from(digit).ok()
}

/// Normalize a raw answer to its canonical spelling.
///
/// Unrecognized input comes back trimmed but otherwise unchanged, so the
/// result must still go through [`parse_answer`] before it is stored.
pub fn normalize_correct_answer(raw: &str) -> String {
    match RawAnswer::classify(raw) {
        RawAnswer::Unrecognized(value) => value.to_string(),
        recognized => recognized
            .token()
            .map_or_else(|| raw.trim().to_string(), |token| token.as_str().to_string()),
    }
}

/// Parse a raw answer into a canonical token, rejecting anything unrecognized
pub fn parse_answer(raw: &str) -> Result<AnswerToken, ValidationError> {
    match RawAnswer::classify(raw) {
        RawAnswer::Unrecognized("") => Err(ValidationError::MissingAnswer),
        RawAnswer::Unrecognized(value) => Err(ValidationError::UnrecognizedAnswer(value.to_string())),
        recognized => recognized
            .token()
            .ok_or_else(|| ValidationError::UnrecognizedAnswer(raw.trim().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_forms() {
        for raw in ["○", "◯", "o", "O", " o ", "Ｏ", "⭕", "⭕\u{fe0f}"] {
            assert_eq!(normalize_correct_answer(raw), "O", "input {:?}", raw);
        }
    }

    #[test]
    fn test_cross_forms() {
        for raw in ["×", "☓", "x", "X", "ｘ", "❌"] {
            assert_eq!(normalize_correct_answer(raw), "X", "input {:?}", raw);
        }
    }

    #[test]
    fn test_digits() {
        assert_eq!(normalize_correct_answer("５"), "5");
        assert_eq!(normalize_correct_answer("１"), "1");
        assert_eq!(normalize_correct_answer("3"), "3");
        assert_eq!(RawAnswer::classify("４"), RawAnswer::Choice(4));
    }

    #[test]
    fn test_unrecognized_passes_through() {
        assert_eq!(normalize_correct_answer("yes"), "yes");
        assert_eq!(normalize_correct_answer(" 6 "), "6");
        assert_eq!(normalize_correct_answer("0"), "0");
        assert_eq!(normalize_correct_answer("12"), "12");
        assert_eq!(RawAnswer::classify(" maybe "), RawAnswer::Unrecognized("maybe"));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            "○", "◯", "o", "O", "×", "☓", "x", "X", "1", "３", "５", "yes", " 7 ", "", "❌",
        ];
        for raw in inputs {
            let once = normalize_correct_answer(raw);
            assert_eq!(normalize_correct_answer(&once), once, "input {:?}", raw);
        }
    }

    #[test]
    fn test_parse_answer() {
        assert_eq!(parse_answer("○"), Ok(AnswerToken::O));
        assert_eq!(parse_answer("５"), Ok(AnswerToken::Five));
        assert_eq!(parse_answer("   "), Err(ValidationError::MissingAnswer));
        assert_eq!(
            parse_answer("yes"),
            Err(ValidationError::UnrecognizedAnswer("yes".to_string()))
        );
    }

    #[test]
    fn test_normalized_tokens_parse_strictly() {
        for raw in ["o", "×", "２"] {
            let normalized = normalize_correct_answer(raw);
            assert!(AnswerToken::try_from(normalized.as_str()).is_ok());
        }
        assert!(AnswerToken::try_from(normalize_correct_answer("yes").as_str()).is_err());
    }
}
