//! Evidence gathered from external search providers.
//!
//! Evidence is transient: it is built fresh for every submitted text and
//! dropped once the verdict has been rendered.

use serde::{Deserialize, Serialize};

/// Title used when a provider returns a result without one.
pub const MISSING_TITLE: &str = "სათაური არ არის";

/// One search result normalized to title/url/snippet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EvidenceItem {
    /// Display title (placeholder if the source omitted it)
    pub title: String,

    /// Link to the source, may be empty
    pub url: String,

    /// Short descriptive text, may be empty
    pub snippet: String,
}

impl EvidenceItem {
    /// Create an evidence item.
    pub fn new(title: impl Into<String>, url: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
        }
    }

    /// Build an item from optional upstream fields.
    ///
    /// A missing or blank title becomes [`MISSING_TITLE`]; missing url and
    /// snippet become empty strings.
    pub fn from_parts(title: Option<String>, url: Option<String>, snippet: Option<String>) -> Self {
        let title = title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| MISSING_TITLE.to_string());

        Self {
            title,
            url: url.unwrap_or_default(),
            snippet: snippet.unwrap_or_default(),
        }
    }
}

/// Evidence contributed by a single provider.
///
/// An empty `items` list is the only representation of "no evidence";
/// there is no separate absent state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderEvidence {
    /// Stable provider id (e.g. "google")
    pub provider: String,

    /// Heading shown above this provider's results in the prompt
    pub heading: String,

    /// Name used when presenting this provider's sources
    pub title: String,

    /// Results in upstream order
    pub items: Vec<EvidenceItem>,
}

impl ProviderEvidence {
    /// Create a provider group. The title defaults to the provider id.
    pub fn new(provider: impl Into<String>, heading: impl Into<String>, items: Vec<EvidenceItem>) -> Self {
        let provider = provider.into();
        Self {
            title: provider.clone(),
            provider,
            heading: heading.into(),
            items,
        }
    }

    /// Set the presentation title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Create an empty provider group.
    pub fn empty(provider: impl Into<String>, heading: impl Into<String>) -> Self {
        Self::new(provider, heading, Vec::new())
    }

    /// Whether this provider returned nothing.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items from this provider.
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// The per-query union of evidence, grouped by provider.
///
/// Groups keep the order in which providers were registered. Items are
/// never interleaved or re-ranked across providers.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EvidenceSet {
    groups: Vec<ProviderEvidence>,
}

impl EvidenceSet {
    /// Create an evidence set from ordered provider groups.
    pub fn new(groups: Vec<ProviderEvidence>) -> Self {
        Self { groups }
    }

    /// Provider groups in declared order.
    pub fn groups(&self) -> &[ProviderEvidence] {
        &self.groups
    }

    /// Look up a provider's group by id.
    pub fn provider(&self, provider: &str) -> Option<&ProviderEvidence> {
        self.groups.iter().find(|g| g.provider == provider)
    }

    /// True iff at least one provider returned at least one item.
    ///
    /// This is a pure non-emptiness test; the content of the items is
    /// not inspected.
    pub fn has_sufficient_evidence(&self) -> bool {
        self.groups.iter().any(|g| !g.is_empty())
    }

    /// Total number of items across all providers.
    pub fn total_items(&self) -> usize {
        self.groups.iter().map(ProviderEvidence::len).sum()
    }

    /// Same provider layout with every group emptied.
    ///
    /// Used when the verdict could not be produced and the evidence
    /// must not be presented.
    pub fn cleared(&self) -> Self {
        Self {
            groups: self
                .groups
                .iter()
                .map(|g| ProviderEvidence::empty(g.provider.clone(), g.heading.clone()).with_title(g.title.clone()))
                .collect(),
        }
    }
}
