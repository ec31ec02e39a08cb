//! Terminal rendering of a verification report.

use veritas_core::{EvidenceItem, Label, ProviderEvidence, Verdict};
use veritas_runtime::VerificationReport;

/// Shown under a provider that returned nothing.
pub const NO_RESULTS: &str = "შედეგი ვერ მოიძებნა.";

const BAR_WIDTH: usize = 20;

/// Render the full report: model answer, label with score, score chart,
/// then sources per provider.
pub fn render_report(report: &VerificationReport) -> String {
    let verdict = &report.verdict;

    let mut out = String::from("### 📄 AI შეფასება:\n");
    out.push_str(verdict.raw_text.trim_end());
    out.push_str("\n\n");
    out.push_str(&format!("შეფასება: {} ({}%)\n", verdict.label, verdict.score()));
    out.push_str(&render_chart(verdict));
    out.push_str("\n---\n");

    for group in report.evidence.groups() {
        out.push('\n');
        out.push_str(&render_group(group));
    }

    out
}

/// Two-bar split of the score against its complement.
pub fn render_chart(verdict: &Verdict) -> String {
    let rows = [
        (Label::Real.display_name(), verdict.score()),
        (Label::Disinformation.display_name(), verdict.complement()),
    ];
    let width = rows.iter().map(|(name, _)| name.chars().count()).max().unwrap_or(0);

    rows.iter()
        .map(|(name, pct)| format!("{:<width$}  {}  {:>3}%\n", name, bar(*pct), pct))
        .collect()
}

fn bar(pct: u8) -> String {
    let filled = (usize::from(pct) * BAR_WIDTH + 50) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn render_group(group: &ProviderEvidence) -> String {
    let mut out = format!("### 🔗 {} წყაროები:\n", group.title);

    if group.is_empty() {
        out.push_str(&format!("_{}_\n", NO_RESULTS));
        return out;
    }

    for item in &group.items {
        out.push_str(&render_item(item));
    }
    out
}

fn render_item(item: &EvidenceItem) -> String {
    let mut out = format!("- {}\n", item.title);
    if !item.url.is_empty() {
        out.push_str(&format!("  {}\n", item.url));
    }
    if !item.snippet.is_empty() {
        out.push_str(&format!("  📄 {}\n", item.snippet));
    }
    out
}
