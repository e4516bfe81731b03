use std::collections::HashMap;

use crate::document::DocumentRole;

use super::llm::LlmClient;
use super::parser::{
    parse_charge, parse_response, AppealResponse, CodeReview, CodeSheetResponse, ReviewResponse,
};
use super::prompt::{
    build_appeal_prompt, build_code_extraction_prompt, build_review_prompt,
    APPEAL_SYSTEM_PROMPT, CODE_EXTRACTION_SYSTEM_PROMPT, REVIEW_SYSTEM_PROMPT,
};
use super::types::{
    disputed_total, AdjudicationResult, BillingLineItem, CandidateLineItem, Verdict,
};
use super::AdjudicationError;

/// Reasoning substituted when the model accepts a code without explanation,
/// or omits it from the review entirely.
const ACCEPTED_FALLBACK_REASONING: &str = "No documentation issues identified for this code.";

/// Reasoning substituted when the model disputes a code without explanation.
const DISPUTED_FALLBACK_REASONING: &str =
    "The after-care documentation does not support this charge.";

/// Appeal text when nothing is disputed; composed without a model call.
const NO_DISPUTE_APPEAL: &str =
    "No disputed charges were identified on this bill. No appeal letter is needed.";

/// Adjudicates a bill against its after-care documentation.
///
/// Three model passes — extract billed codes, review each against the
/// summary, draft the appeal — with all aggregation (savings total, letter
/// completeness, overall summary) recomputed locally. The decision model is
/// a trait object so tests run against scripted responses.
pub struct BillAdjudicator {
    llm: Box<dyn LlmClient + Send + Sync>,
    extraction_model: String,
    review_model: String,
}

impl BillAdjudicator {
    pub fn new(
        llm: Box<dyn LlmClient + Send + Sync>,
        extraction_model: &str,
        review_model: &str,
    ) -> Self {
        Self {
            llm,
            extraction_model: extraction_model.to_string(),
            review_model: review_model.to_string(),
        }
    }

    /// Adjudicate one (bill, summary) text pair. All-or-nothing: any model
    /// or parse failure aborts the request; no partial result is returned.
    pub fn adjudicate(
        &self,
        bill_text: &str,
        summary_text: &str,
    ) -> Result<AdjudicationResult, AdjudicationError> {
        if bill_text.trim().is_empty() {
            return Err(AdjudicationError::EmptyInput(DocumentRole::Bill));
        }
        if summary_text.trim().is_empty() {
            return Err(AdjudicationError::EmptyInput(DocumentRole::Summary));
        }

        tracing::info!(
            bill_chars = bill_text.len(),
            summary_chars = summary_text.len(),
            "Starting adjudication"
        );

        let candidates = self.extract_candidates(bill_text)?;
        tracing::info!(candidates = candidates.len(), "Billed codes extracted");

        if candidates.is_empty() {
            return Ok(AdjudicationResult {
                line_items: vec![],
                total_savings: 0.0,
                appeal_draft: NO_DISPUTE_APPEAL.to_string(),
                overall_reasoning:
                    "No billable procedure codes with charges could be identified on the bill."
                        .to_string(),
            });
        }

        let review = self.review_candidates(bill_text, summary_text, &candidates)?;
        let line_items = assemble_line_items(&candidates, &review.validations);

        let total_savings = disputed_total(&line_items);
        let disputed: Vec<&BillingLineItem> = line_items
            .iter()
            .filter(|item| item.verdict == Verdict::Disputed)
            .collect();

        tracing::info!(
            accepted = line_items.len() - disputed.len(),
            disputed = disputed.len(),
            total_savings,
            "Review complete"
        );

        let overall_reasoning =
            overall_summary(&review.overall_reasoning, &line_items, total_savings);

        let appeal_draft = if disputed.is_empty() {
            NO_DISPUTE_APPEAL.to_string()
        } else {
            let draft = self.compose_appeal(&disputed, &overall_reasoning, total_savings)?;
            finalize_appeal(draft, &line_items, &disputed, total_savings)
        };

        Ok(AdjudicationResult {
            line_items,
            total_savings,
            appeal_draft,
            overall_reasoning,
        })
    }

    /// Pass 1: extract candidate lines from the bill. Lines without a
    /// parseable non-negative charge are dropped, never zero-filled.
    fn extract_candidates(
        &self,
        bill_text: &str,
    ) -> Result<Vec<CandidateLineItem>, AdjudicationError> {
        let prompt = build_code_extraction_prompt(bill_text);
        let response =
            self.llm
                .generate(&self.extraction_model, &prompt, CODE_EXTRACTION_SYSTEM_PROMPT)?;
        let sheet: CodeSheetResponse = parse_response(&response)?;

        let mut candidates = Vec::with_capacity(sheet.codes.len());
        for line in sheet.codes {
            let code = line.code.trim().to_string();
            if code.is_empty() {
                tracing::warn!("Dropping extracted line with empty code");
                continue;
            }

            let Some(billed_charge) = parse_charge(line.charge.as_ref()) else {
                tracing::warn!(code = %code, "Dropping line with missing or unparseable charge");
                continue;
            };

            candidates.push(CandidateLineItem {
                code,
                description: line.description.filter(|d| !d.trim().is_empty()),
                revenue_code: line.revenue_code.filter(|r| !r.trim().is_empty()),
                billed_charge,
            });
        }

        Ok(candidates)
    }

    /// Pass 2: verdict + reasoning per candidate, with duplicate-count
    /// context so repeated codes are reviewed knowingly.
    fn review_candidates(
        &self,
        bill_text: &str,
        summary_text: &str,
        candidates: &[CandidateLineItem],
    ) -> Result<ReviewResponse, AdjudicationError> {
        let duplicates = count_duplicates(candidates);

        let context: Vec<serde_json::Value> = candidates
            .iter()
            .map(|c| {
                let mut entry = serde_json::json!({
                    "code": c.code,
                    "description": c.description,
                    "revenue_code": c.revenue_code,
                    "billed_charge": c.billed_charge,
                });
                if let Some(count) = duplicates.get(&c.code) {
                    entry["duplicate_warning"] = serde_json::Value::String(format!(
                        "this code appears {count} times on the bill"
                    ));
                }
                entry
            })
            .collect();

        let candidates_json = serde_json::to_string_pretty(&context)
            .map_err(|e| AdjudicationError::JsonParsing(e.to_string()))?;

        let prompt = build_review_prompt(bill_text, summary_text, &candidates_json);
        let response = self
            .llm
            .generate(&self.review_model, &prompt, REVIEW_SYSTEM_PROMPT)?;
        parse_response(&response)
    }

    /// Pass 3: draft the appeal letter over the disputed subset.
    fn compose_appeal(
        &self,
        disputed: &[&BillingLineItem],
        overall_reasoning: &str,
        total_savings: f64,
    ) -> Result<String, AdjudicationError> {
        let info: Vec<serde_json::Value> = disputed
            .iter()
            .map(|item| {
                serde_json::json!({
                    "code": item.code,
                    "description": item.description,
                    "charge": item.billed_charge,
                    "reasoning": item.reasoning,
                })
            })
            .collect();

        let disputed_json = serde_json::to_string_pretty(&info)
            .map_err(|e| AdjudicationError::JsonParsing(e.to_string()))?;

        let prompt = build_appeal_prompt(&disputed_json, overall_reasoning, total_savings);
        let response = self
            .llm
            .generate(&self.extraction_model, &prompt, APPEAL_SYSTEM_PROMPT)?;
        let parsed: AppealResponse = parse_response(&response)?;
        Ok(parsed.appeal_draft)
    }
}

/// Join candidates with their reviews, in discovery order. Codes the review
/// pass skipped default to accepted with fallback reasoning; blank
/// reasoning is never allowed through.
fn assemble_line_items(
    candidates: &[CandidateLineItem],
    validations: &[CodeReview],
) -> Vec<BillingLineItem> {
    let mut review_by_code: HashMap<&str, &CodeReview> = HashMap::new();
    for review in validations {
        // First entry wins when the model reviews the same code twice.
        review_by_code.entry(review.code.as_str()).or_insert(review);
    }

    candidates
        .iter()
        .map(|candidate| {
            let review = review_by_code.get(candidate.code.as_str());

            let verdict = match review {
                Some(r) if r.status.trim().eq_ignore_ascii_case("disputed") => Verdict::Disputed,
                // Unknown statuses degrade to accepted: never inflate savings.
                _ => Verdict::Accepted,
            };

            let reasoning = review
                .map(|r| r.reasoning.trim())
                .filter(|r| !r.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| match verdict {
                    Verdict::Accepted => ACCEPTED_FALLBACK_REASONING.to_string(),
                    Verdict::Disputed => DISPUTED_FALLBACK_REASONING.to_string(),
                });

            BillingLineItem {
                code: candidate.code.clone(),
                description: candidate.description.clone(),
                revenue_code: candidate.revenue_code.clone(),
                verdict,
                reasoning,
                billed_charge: candidate.billed_charge,
            }
        })
        .collect()
}

/// Occurrence counts for codes that repeat across lines.
fn count_duplicates(candidates: &[CandidateLineItem]) -> HashMap<String, usize> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for candidate in candidates {
        *counts.entry(candidate.code.clone()).or_default() += 1;
    }
    counts.retain(|_, count| *count > 1);
    counts
}

/// The overall summary may never contradict the per-item verdicts. A blank
/// model summary, or one that acknowledges no disputed code while disputes
/// exist (e.g. "no issues found"), is replaced with a computed summary that
/// names the disputed codes.
fn overall_summary(model_summary: &str, items: &[BillingLineItem], total: f64) -> String {
    let disputed: Vec<&BillingLineItem> = items
        .iter()
        .filter(|i| i.verdict == Verdict::Disputed)
        .collect();

    let summary = model_summary.trim();
    let acknowledges_disputes = disputed.iter().any(|i| summary.contains(&i.code));
    if !summary.is_empty() && (disputed.is_empty() || acknowledges_disputes) {
        return summary.to_string();
    }

    if disputed.is_empty() {
        "All billed codes are supported by the after-care documentation.".to_string()
    } else {
        let codes: Vec<&str> = disputed.iter().map(|i| i.code.as_str()).collect();
        format!(
            "{} of {} billed codes ({}) are not supported by the after-care documentation; ${total:.2} in charges is disputed.",
            disputed.len(),
            items.len(),
            codes.join(", ")
        )
    }
}

/// Enforce the letter's content contract: it must name every disputed code
/// and must not name a code that is only accepted. A draft that drags an
/// accepted-only code into the dispute is discarded for a locally composed
/// letter rather than patched in place.
fn finalize_appeal(
    draft: String,
    items: &[BillingLineItem],
    disputed: &[&BillingLineItem],
    total_savings: f64,
) -> String {
    let disputed_codes: std::collections::HashSet<&str> =
        disputed.iter().map(|item| item.code.as_str()).collect();

    let accepted_only = items.iter().any(|item| {
        item.verdict == Verdict::Accepted
            && !disputed_codes.contains(item.code.as_str())
            && draft.contains(&item.code)
    });

    if accepted_only {
        tracing::warn!("Appeal draft referenced accepted codes; composing letter locally");
        return compose_fallback_letter(disputed, total_savings);
    }

    with_disputed_schedule(draft, disputed)
}

/// Deterministic letter built from the disputed items alone, used when the
/// drafted letter violates the content contract.
fn compose_fallback_letter(disputed: &[&BillingLineItem], total_savings: f64) -> String {
    let mut letter = String::from(
        "To the Billing Department,\n\n\
         I am writing to formally dispute the following charges on my \
         itemized statement, which are not supported by the after-care \
         documentation for this visit:\n\n",
    );
    for item in disputed {
        letter.push_str(&format!(
            "- Code {}: ${:.2}. {}\n",
            item.code, item.billed_charge, item.reasoning
        ));
    }
    letter.push_str(&format!(
        "\nI request a formal review and adjustment of these charges, \
         totaling ${total_savings:.2}. Please respond in writing to the \
         address on file.\n\nSincerely,\n[Patient Name]\n[Account Number]\n[Date]"
    ));
    letter
}

/// Guarantee the letter references every disputed code: any the model
/// dropped are appended as an itemized schedule.
fn with_disputed_schedule(letter: String, disputed: &[&BillingLineItem]) -> String {
    let missing: Vec<&&BillingLineItem> = disputed
        .iter()
        .filter(|item| !letter.contains(&item.code))
        .collect();

    if missing.is_empty() {
        return letter;
    }

    tracing::warn!(
        missing = missing.len(),
        "Appeal draft omitted disputed codes; appending schedule"
    );

    let mut out = letter;
    out.push_str("\n\nDisputed charges under appeal:\n");
    for item in missing {
        out.push_str(&format!(
            "- Code {}: ${:.2} — {}\n",
            item.code, item.billed_charge, item.reasoning
        ));
    }
    out
}
