//! Validation of user-submitted text.

use thiserror::Error;

/// Default upper bound on submitted text, in characters.
pub const DEFAULT_MAX_CHARS: usize = 1000;

/// Errors for text that cannot be checked.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("გთხოვ შეიყვანე ტექსტი შესამოწმებლად.")]
    Empty,

    #[error("ტექსტი ძალიან გრძელია: {actual} სიმბოლო (მაქს. {max})")]
    TooLong { actual: usize, max: usize },
}

/// Text accepted for verification.
///
/// The text is kept exactly as submitted; it is forwarded unmodified to
/// every evidence source and into the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedText(String);

impl SubmittedText {
    /// Validate raw input against a character limit.
    ///
    /// Whitespace-only input is rejected. Length is counted in Unicode
    /// scalar values, not bytes, since Georgian script is multi-byte.
    pub fn parse(raw: impl Into<String>, max_chars: usize) -> Result<Self, InputError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(InputError::Empty);
        }

        let actual = raw.chars().count();
        if actual > max_chars {
            return Err(InputError::TooLong {
                actual,
                max: max_chars,
            });
        }

        Ok(Self(raw))
    }

    /// The submitted text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

}

impl AsRef<str> for SubmittedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_text_rejected() {
        assert_eq!(SubmittedText::parse("", 10), Err(InputError::Empty));
        assert_eq!(SubmittedText::parse(" \n\t ", 10), Err(InputError::Empty));
    }

    #[test]
    fn test_length_counts_characters() {
        // 5 Georgian letters, 15 bytes
        let text = "თბილისი".chars().take(5).collect::<String>();
        assert!(SubmittedText::parse(text.clone(), 5).is_ok());
        assert_eq!(
            SubmittedText::parse(text, 4),
            Err(InputError::TooLong { actual: 5, max: 4 })
        );
    }

    #[test]
    fn test_text_is_not_trimmed() {
        let text = SubmittedText::parse("  საქართველო  ", DEFAULT_MAX_CHARS).unwrap();
        assert_eq!(text.as_str(), "  საქართველო  ");
    }
}
