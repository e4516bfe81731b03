//! Projection of the canonical adjudication result onto the wire shape the
//! presentation layer consumes. No decision logic lives here.

use serde::{Deserialize, Serialize};

use crate::adjudication::{AdjudicationResult, Verdict};

/// One adjudicated code as rendered to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeAnalysis {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue_code: Option<String>,
    pub status: Verdict,
    pub reasoning: String,
    pub billed_charge: f64,
}

/// Success response for `POST /bill/analyze`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub codes: Vec<CodeAnalysis>,
    pub savings: f64,
    pub appeal_draft: String,
    pub overall_reasoning: String,
    /// Echoed unmodified for display; never consulted during adjudication.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurance_plan: Option<String>,
}

/// Map the engine's result onto the wire shape, preserving line order.
pub fn project(result: &AdjudicationResult, insurance_plan: Option<String>) -> AnalyzeResponse {
    AnalyzeResponse {
        codes: result
            .line_items
            .iter()
            .map(|item| CodeAnalysis {
                code: item.code.clone(),
                description: item.description.clone(),
                revenue_code: item.revenue_code.clone(),
                status: item.verdict,
                reasoning: item.reasoning.clone(),
                billed_charge: item.billed_charge,
            })
            .collect(),
        savings: result.total_savings,
        appeal_draft: result.appeal_draft.clone(),
        overall_reasoning: result.overall_reasoning.clone(),
        insurance_plan,
    }
}
