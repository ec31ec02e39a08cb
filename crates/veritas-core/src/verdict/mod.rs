//! Verdicts derived from the model's free-text answer.

mod parser;

pub use parser::{parse_verdict, DEFAULT_CONFIDENCE, DISINFORMATION_MARKER, REAL_MARKER};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Text shown in place of a verdict when the completion call fails.
pub const FALLBACK_VERDICT_TEXT: &str = "შეცდომა მოხდა შეფასების პროცესში.";

/// Categorical assessment of the submitted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    /// Authentic information
    Real,
    /// Disinformation
    Disinformation,
    /// Neither marker was found
    Uncertain,
}

impl Label {
    /// User-facing Georgian label.
    pub fn display_name(&self) -> &'static str {
        match self {
            Label::Real => "რეალური ინფორმაცია",
            Label::Disinformation => "დეზინფორმაცია",
            Label::Uncertain => "გაურკვეველია",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// The structured outcome of one verification.
///
/// `raw_text` is the source of truth. `label` and `confidence` are
/// heuristic projections of it and may disagree with its content when the
/// model ignored the requested format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Full model response
    pub raw_text: String,

    /// Projected label
    pub label: Label,

    /// Projected confidence in [0, 100]
    pub confidence: u8,
}

impl Verdict {
    /// Parse a verdict from the model's response.
    pub fn from_raw(raw_text: impl Into<String>) -> Self {
        let raw_text = raw_text.into();
        let (confidence, label) = parse_verdict(&raw_text);
        Self {
            raw_text,
            label,
            confidence,
        }
    }

    /// The verdict used when no model answer could be obtained.
    pub fn fallback() -> Self {
        Self {
            raw_text: FALLBACK_VERDICT_TEXT.to_string(),
            label: Label::Uncertain,
            confidence: DEFAULT_CONFIDENCE,
        }
    }

    /// Confidence clamped to [0, 100].
    ///
    /// Parsed verdicts are already in range; deserialized ones may not be.
    pub fn score(&self) -> u8 {
        self.confidence.min(100)
    }

    /// Share of the confidence chart attributed to the opposite reading.
    pub fn complement(&self) -> u8 {
        100 - self.score()
    }
}
