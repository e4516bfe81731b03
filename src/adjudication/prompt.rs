//! Prompt templates for the three adjudication passes:
//! code extraction → documentation review → appeal letter.

pub const CODE_EXTRACTION_SYSTEM_PROMPT: &str = r#"
You are a medical coding assistant. Extract HCPCS/CPT procedure codes from
the provided hospital bill text. HCPCS codes include CPT codes (numeric
codes for procedures) and alphanumeric codes for supplies, drugs, and
services.

RULES:
1. Extract ONLY codes that appear in the bill text.
2. Report each billed line separately, even when the same code repeats.
3. Copy charges verbatim as printed (e.g. "$1,234.56"); use null when a
   line has no visible charge.
4. Use null for any missing field. Never invent values.
5. Output ONLY a JSON block wrapped in ```json``` fences.
"#;

/// Build the code-extraction prompt for one bill.
pub fn build_code_extraction_prompt(bill_text: &str) -> String {
    format!(
        r#"<bill>
{bill_text}
</bill>

List every billed procedure line from the above bill in this JSON structure,
in the order the lines appear:

```json
{{
  "codes": [
    {{
      "code": "99213",
      "description": "description as printed or null",
      "charge": "$150.00 or null",
      "units": "1 or null",
      "revenue_code": "0510 or null"
    }}
  ]
}}
```"#
    )
}

pub const REVIEW_SYSTEM_PROMPT: &str = r#"
You are a medical billing auditor. For each billed procedure code you are
given, decide whether the charge is supported by the patient's after-care
summary.

Mark a code "disputed" when:
- The after-care summary contains no documentation consistent with the
  billed service.
- The code is duplicated beyond what the documentation supports.
- The description contradicts the documented care.

Mark a code "accepted" when the documentation plausibly supports it.

RULES:
1. Every code gets exactly one status: "accepted" or "disputed".
2. Give specific, factual reasoning for every code, citing the
   documentation (or its absence).
3. Base decisions only on the provided texts. Do not diagnose.
4. Output ONLY a JSON block wrapped in ```json``` fences.
"#;

/// Build the review prompt: both normalized texts plus the candidate lines
/// (with duplicate-count context) as JSON.
pub fn build_review_prompt(
    bill_text: &str,
    summary_text: &str,
    candidates_json: &str,
) -> String {
    format!(
        r#"<bill>
{bill_text}
</bill>

<after_care_summary>
{summary_text}
</after_care_summary>

Billed lines to review:
{candidates_json}

Render a verdict for each line in this JSON structure:

```json
{{
  "validations": [
    {{
      "code": "99213",
      "status": "accepted | disputed",
      "reasoning": "specific, factual justification"
    }}
  ],
  "overall_reasoning": "short summary of the review as a whole"
}}
```"#
    )
}

pub const APPEAL_SYSTEM_PROMPT: &str = r#"
You are a professional medical billing advocate drafting an appeal letter
to a hospital billing department.

The letter must:
- Be addressed to the billing department.
- List every disputed code with its billed amount and the specific reason
  it is disputed.
- Request formal review and adjustment of the disputed charges.
- Keep a professional, respectful, firm tone.
- Use placeholders like [Patient Name], [Account Number], [Date] for
  personal details.
- Output ONLY a JSON block wrapped in ```json``` fences.
"#;

/// Build the appeal-letter prompt from the disputed subset.
pub fn build_appeal_prompt(
    disputed_json: &str,
    overall_reasoning: &str,
    total_disputed: f64,
) -> String {
    format!(
        r#"Overall review finding: {overall_reasoning}

Disputed charges (total ${total_disputed:.2}):
{disputed_json}

Draft a complete appeal letter ready to send. Reference each disputed code
exactly once. Respond in this JSON structure:

```json
{{
  "appeal_draft": "full letter body"
}}
```"#
    )
}
