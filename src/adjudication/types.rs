use serde::{Deserialize, Serialize};

/// Binary adjudication outcome for one billed line. No partial or uncertain
/// state is exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Accepted,
    Disputed,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Disputed => "disputed",
        }
    }
}

/// A billed line after extraction but before review: code, optional
/// description/revenue code, and a successfully parsed non-negative charge.
/// Lines whose charge could not be parsed never become candidates.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateLineItem {
    pub code: String,
    pub description: Option<String>,
    pub revenue_code: Option<String>,
    pub billed_charge: f64,
}

/// One adjudicated line from the bill. A code value may legitimately repeat
/// across items (same procedure billed twice); identity is per line, not
/// per code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingLineItem {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue_code: Option<String>,
    pub verdict: Verdict,
    /// Human-readable justification, always non-empty, tied to the verdict.
    pub reasoning: String,
    pub billed_charge: f64,
}

/// The aggregate adjudication outcome for one bill/summary pair.
/// Immutable once built; never cached or persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjudicationResult {
    /// Discovery order on the bill; never re-sorted.
    pub line_items: Vec<BillingLineItem>,
    /// Always `disputed_total(&line_items)`, recomputed locally.
    pub total_savings: f64,
    pub appeal_draft: String,
    pub overall_reasoning: String,
}

/// Exact sum of billed charges across disputed items. The engine recomputes
/// the savings figure with this; it is never taken from the model.
pub fn disputed_total(items: &[BillingLineItem]) -> f64 {
    items
        .iter()
        .filter(|item| item.verdict == Verdict::Disputed)
        .map(|item| item.billed_charge)
        .sum()
}
