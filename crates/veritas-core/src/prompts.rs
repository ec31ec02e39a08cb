//! Prompt templates for the verdict request.
//!
//! Two templates exist and exactly one is chosen per request, based only on
//! whether any evidence was found:
//! 1. Evidence-grounded: evidence dump first, then the text to assess
//! 2. Evidence-free: the text alone, with an explicit "no sources" answer
//!
//! Both ask for the same four-field answer so the verdict parser can treat
//! them identically.

use serde::{Deserialize, Serialize};

use crate::evidence::{EvidenceSet, ProviderEvidence};

/// Persona shared by both templates.
pub const PERSONA: &str = "შენ ხარ ნეიტრალური, მკაცრი და აკადემიური ქართული ენის ხელოვნური ინტელექტი.";

/// Instructions when evidence is available: summarize, then judge.
pub const GROUNDED_INSTRUCTIONS: &str = "\
პირველ რიგში შეაჯამე ქვემოთ მოყვანილი წყაროებიდან მიღებული ინფორმაცია ობიექტურად.
შემდეგ შეაფასე ტექსტი დეზინფორმაციაა თუ არა, წყაროებზე დაყრდნობით.";

/// Instructions when no evidence was found: judge from the text alone.
pub const UNGROUNDED_INSTRUCTIONS: &str =
    "წყაროები არ მოიძებნა, ამიტომ მხოლოდ ტექსტის საფუძველზე შეაფასე ტექსტი დეზინფორმაციაა თუ არა.";

/// The phrase the model must use when no credible source exists.
pub const NO_CREDIBLE_SOURCE: &str = "სანდო ღია წყარო ვერ მოიძებნა";

/// Heading above the evidence dump. It always occupies a line of its own;
/// the response format's sources field shares the word but not the line.
pub const SOURCES_HEADING: &str = "წყაროები:";

/// Heading above the submitted text.
pub const TEXT_HEADING: &str = "📄 შესაფასებელი ტექსტი:";

/// The first three response fields, common to both templates.
const RESPONSE_FORMAT_HEAD: &str = "\
შედეგი ფორმატით:

📊 შეფასება: რეალური ინფორმაცია / დეზინფორმაცია / გაურკვეველია
🔢 დონე: 0-100%
🧾 არგუმენტირებული აღწერა: დეტალურად ახსენი შენი დასკვნა";

/// Which template a prompt was rendered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptTemplate {
    /// Evidence dump plus text; sources must be cited
    EvidenceGrounded,
    /// Text only; sources field states none were found
    EvidenceFree,
}

impl PromptTemplate {
    /// Choose the template from the sufficiency flag.
    pub fn select(has_sufficient_evidence: bool) -> Self {
        if has_sufficient_evidence {
            Self::EvidenceGrounded
        } else {
            Self::EvidenceFree
        }
    }

    /// The sources line of the response format.
    fn sources_field(self) -> String {
        match self {
            Self::EvidenceGrounded => format!(
                "🔗 წყაროები: მინიმუმ 2 წყარო, ან მიუთითე: \"{}\".",
                NO_CREDIBLE_SOURCE
            ),
            Self::EvidenceFree => format!("🔗 წყაროები: \"{}\".", NO_CREDIBLE_SOURCE),
        }
    }
}

/// Render the verdict prompt.
///
/// Pure: identical inputs always yield byte-identical output. The template
/// is chosen by `has_sufficient_evidence` alone; `evidence` is ignored by the
/// evidence-free template.
pub fn build_prompt(text: &str, evidence: &EvidenceSet, has_sufficient_evidence: bool) -> String {
    let template = PromptTemplate::select(has_sufficient_evidence);

    let mut prompt = String::new();
    prompt.push_str(PERSONA);
    prompt.push_str("\n\n");

    match template {
        PromptTemplate::EvidenceGrounded => {
            prompt.push_str(GROUNDED_INSTRUCTIONS);
            prompt.push_str("\n\n");
            prompt.push_str(SOURCES_HEADING);
            prompt.push('\n');
            prompt.push_str(&render_evidence(evidence));
            prompt.push_str("\n\n");
        }
        PromptTemplate::EvidenceFree => {
            prompt.push_str(UNGROUNDED_INSTRUCTIONS);
            prompt.push_str("\n\n");
        }
    }

    prompt.push_str(TEXT_HEADING);
    prompt.push('\n');
    prompt.push_str(text);
    prompt.push_str("\n\n");
    prompt.push_str(RESPONSE_FORMAT_HEAD);
    prompt.push('\n');
    prompt.push_str(&template.sources_field());
    prompt.push('\n');
    prompt
}

/// Serialize every provider group under its heading, in set order.
pub fn render_evidence(evidence: &EvidenceSet) -> String {
    evidence
        .groups()
        .iter()
        .map(render_group)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_group(group: &ProviderEvidence) -> String {
    // Plain string fields only, serialization cannot fail
    let items = serde_json::to_string_pretty(&group.items).unwrap_or_else(|_| "[]".to_string());
    format!("{}\n{}", group.heading, items)
}
