//! # veritas-core
//!
//! Deterministic building blocks for evidence-grounded disinformation checks.
//!
//! This crate answers, without any I/O:
//! - Is there enough evidence to ground a verdict?
//! - What exactly do we ask the model?
//! - What did the model conclude?
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: the same text and evidence always render the same prompt
//! 2. **No network calls**: search and completion live in `veritas-runtime`
//! 3. **Total**: verdict parsing never fails, it falls back to defaults
//!
//! ## Example
//!
//! ```rust
//! use veritas_core::{build_prompt, EvidenceSet, Label, Verdict};
//!
//! let evidence = EvidenceSet::default();
//! let prompt = build_prompt("თბილისი საქართველოს დედაქალაქია.", &evidence, evidence.has_sufficient_evidence());
//! assert!(prompt.contains("წყაროები არ მოიძებნა"));
//!
//! let verdict = Verdict::from_raw("📊 შეფასება: რეალური ინფორმაცია\n🔢 დონე: 95%");
//! assert_eq!(verdict.label, Label::Real);
//! assert_eq!(verdict.confidence, 95);
//! ```

pub mod evidence;
pub mod input;
pub mod prompts;
pub mod verdict;

// Re-export main types at crate root
pub use evidence::{EvidenceItem, EvidenceSet, ProviderEvidence, MISSING_TITLE};
pub use input::{InputError, SubmittedText, DEFAULT_MAX_CHARS};
pub use prompts::{build_prompt, PromptTemplate};
pub use verdict::{parse_verdict, Label, Verdict, FALLBACK_VERDICT_TEXT};
