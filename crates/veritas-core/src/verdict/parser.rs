//! Best-effort extraction of label and confidence from model output.
//!
//! This is heuristic text matching, not semantic parsing. Failure to find
//! either field is not an error: defaults are returned silently.

use lazy_static::lazy_static;
use regex::Regex;

use super::Label;

/// Marker word for authentic information.
pub const REAL_MARKER: &str = "რეალური";

/// Marker word for disinformation.
pub const DISINFORMATION_MARKER: &str = "დეზინფორმაცია";

/// Confidence used when no percentage is present.
pub const DEFAULT_CONFIDENCE: u8 = 50;

lazy_static! {
    /// One to three ASCII digits immediately followed by a percent sign.
    static ref PERCENT_PATTERN: Regex = Regex::new(r"([0-9]{1,3})%").unwrap();
}

/// Extract `(confidence, label)` from a raw verdict.
///
/// - Confidence is the first percentage in the text, capped at 100, or
///   [`DEFAULT_CONFIDENCE`] if there is none.
/// - Label checks [`REAL_MARKER`] first, then [`DISINFORMATION_MARKER`],
///   case-sensitively; the real marker wins when both occur.
pub fn parse_verdict(raw_text: &str) -> (u8, Label) {
    (extract_confidence(raw_text), extract_label(raw_text))
}

fn extract_confidence(raw_text: &str) -> u8 {
    PERCENT_PATTERN
        .captures(raw_text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u16>().ok())
        .map(|value| value.min(100) as u8)
        .unwrap_or(DEFAULT_CONFIDENCE)
}

fn extract_label(raw_text: &str) -> Label {
    if raw_text.contains(REAL_MARKER) {
        Label::Real
    } else if raw_text.contains(DISINFORMATION_MARKER) {
        Label::Disinformation
    } else {
        Label::Uncertain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_extracts_first_percentage() {
        assert_eq!(extract_confidence("... 82% ..."), 82);
        assert_eq!(extract_confidence("დონე: 7% და შემდეგ 90%"), 7);
        assert_eq!(extract_confidence("100%"), 100);
        assert_eq!(extract_confidence("0%"), 0);
    }

    #[test]
    fn test_missing_percentage_defaults() {
        assert_eq!(extract_confidence("no percent sign here"), DEFAULT_CONFIDENCE);
        assert_eq!(extract_confidence("82 %"), DEFAULT_CONFIDENCE);
        assert_eq!(extract_confidence(""), DEFAULT_CONFIDENCE);
    }

    #[test]
    fn test_long_digit_runs_match_last_three() {
        // Leftmost match that is followed by '%' starts inside the run
        assert_eq!(extract_confidence("1234%"), 100);
        assert_eq!(extract_confidence("1045%"), 45);
    }

    #[test]
    fn test_out_of_range_is_capped() {
        assert_eq!(extract_confidence("დონე: 250%"), 100);
    }

    #[test]
    fn test_label_markers() {
        assert_eq!(extract_label("შეფასება: რეალური ინფორმაცია"), Label::Real);
        assert_eq!(extract_label("შეფასება: დეზინფორმაცია"), Label::Disinformation);
        assert_eq!(extract_label("შეფასება: გაურკვეველია"), Label::Uncertain);
    }

    #[test]
    fn test_real_marker_takes_precedence() {
        assert_eq!(extract_label("დეზინფორმაცია ... რეალური"), Label::Real);
        assert_eq!(extract_label("რეალური ... დეზინფორმაცია"), Label::Real);
    }

    #[test]
    fn test_parse_verdict_full_response() {
        let raw = "📊 შეფასება: დეზინფორმაცია\n🔢 დონე: 91%\n🧾 არგუმენტირებული აღწერა: ...\n🔗 წყაროები: ...";
        assert_eq!(parse_verdict(raw), (91, Label::Disinformation));
    }

    #[test]
    fn test_marker_match_is_case_sensitive() {
        // Mtavruli (uppercase) spelling of the real marker
        assert_eq!(extract_label("ᲠᲔᲐᲚᲣᲠᲘ ᲘᲜᲤᲝᲠᲛᲐᲪᲘᲐ"), Label::Uncertain);
    }

    proptest! {
        #[test]
        fn prop_confidence_in_range(text in ".{0,120}") {
            let (confidence, _) = parse_verdict(&text);
            prop_assert!(confidence <= 100);
        }

        #[test]
        fn prop_real_marker_always_wins(prefix in "[a-z ]{0,20}", suffix in "[a-z ]{0,20}", disinfo_first in any::<bool>()) {
            let text = if disinfo_first {
                format!("{prefix}{DISINFORMATION_MARKER}{suffix}{REAL_MARKER}")
            } else {
                format!("{prefix}{REAL_MARKER}{suffix}{DISINFORMATION_MARKER}")
            };
            prop_assert_eq!(extract_label(&text), Label::Real);
        }

        #[test]
        fn prop_percentage_is_extracted(n in 0u8..=100, prefix in "[a-z ]{0,20}") {
            let text = format!("{prefix} {n}% rest");
            prop_assert_eq!(extract_confidence(&text), n);
        }
    }
}
