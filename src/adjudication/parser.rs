//! Parsing of the model's fenced-JSON responses and of printed charge
//! strings.

use serde::Deserialize;

use super::AdjudicationError;

/// One extracted bill line, as the model reports it. Fields are verbatim
/// strings; nothing is trusted until parsed.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCodeLine {
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub charge: Option<ChargeField>,
    #[serde(default)]
    pub units: Option<String>,
    #[serde(default)]
    pub revenue_code: Option<String>,
}

/// Models emit charges either as JSON numbers or as printed strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ChargeField {
    Number(f64),
    Text(String),
}

#[derive(Debug, Deserialize)]
pub struct CodeSheetResponse {
    pub codes: Vec<RawCodeLine>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CodeReview {
    pub code: String,
    pub status: String,
    #[serde(default)]
    pub reasoning: String,
}

#[derive(Debug, Deserialize)]
pub struct ReviewResponse {
    pub validations: Vec<CodeReview>,
    #[serde(default)]
    pub overall_reasoning: String,
}

#[derive(Debug, Deserialize)]
pub struct AppealResponse {
    pub appeal_draft: String,
}

/// Pull the JSON payload out of a model response. Prefers a ```json fenced
/// block; falls back to treating the whole trimmed response as JSON.
pub fn extract_json_block(response: &str) -> Result<&str, AdjudicationError> {
    if let Some(start) = response.find("```json") {
        let after_fence = &response[start + 7..];
        if let Some(end) = after_fence.find("```") {
            return Ok(after_fence[..end].trim());
        }
        return Err(AdjudicationError::MalformedResponse(
            "unterminated ```json fence".into(),
        ));
    }

    let trimmed = response.trim();
    if trimmed.starts_with('{') {
        Ok(trimmed)
    } else {
        Err(AdjudicationError::MalformedResponse(
            "no JSON block in response".into(),
        ))
    }
}

/// Deserialize a fenced-JSON response into `T`.
pub fn parse_response<T: serde::de::DeserializeOwned>(
    response: &str,
) -> Result<T, AdjudicationError> {
    let json = extract_json_block(response)?;
    serde_json::from_str(json).map_err(|e| AdjudicationError::JsonParsing(e.to_string()))
}

/// Parse a printed charge like "$1,234.56" into a non-negative amount.
///
/// Returns `None` for anything missing, unparseable, negative, or
/// non-finite — callers drop such lines rather than defaulting the charge
/// to zero, which would corrupt the savings total.
pub fn parse_charge(charge: Option<&ChargeField>) -> Option<f64> {
    let value = match charge? {
        ChargeField::Number(n) => *n,
        ChargeField::Text(text) => {
            let cleaned: String = text
                .chars()
                .filter(|c| !matches!(c, '$' | ',' | ' '))
                .collect();
            if cleaned.is_empty() {
                return None;
            }
            cleaned.parse().ok()?
        }
    };

    (value.is_finite() && value >= 0.0).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_fenced_json() {
        let response = "Here you go:\n```json\n{\"codes\": []}\n```\nDone.";
        assert_eq!(extract_json_block(response).unwrap(), "{\"codes\": []}");
    }

    #[test]
    fn bare_json_object_accepted() {
        assert_eq!(
            extract_json_block("  {\"a\": 1}  ").unwrap(),
            "{\"a\": 1}"
        );
    }

    #[test]
    fn prose_without_json_rejected() {
        let err = extract_json_block("I could not find any codes.").unwrap_err();
        assert!(matches!(err, AdjudicationError::MalformedResponse(_)));
    }

    #[test]
    fn unterminated_fence_rejected() {
        let err = extract_json_block("```json\n{\"a\": 1}").unwrap_err();
        assert!(matches!(err, AdjudicationError::MalformedResponse(_)));
    }

    #[test]
    fn parses_code_sheet() {
        let response = r#"```json
{
  "codes": [
    {"code": "99213", "description": "Office visit", "charge": "$150.00", "units": "1", "revenue_code": null},
    {"code": "71046", "charge": 200.0}
  ]
}
```"#;
        let sheet: CodeSheetResponse = parse_response(response).unwrap();
        assert_eq!(sheet.codes.len(), 2);
        assert_eq!(sheet.codes[0].code, "99213");
        assert_eq!(sheet.codes[0].description.as_deref(), Some("Office visit"));
        assert!(sheet.codes[1].description.is_none());
    }

    #[test]
    fn invalid_json_is_a_parsing_error() {
        let err = parse_response::<CodeSheetResponse>("```json\n{broken\n```").unwrap_err();
        assert!(matches!(err, AdjudicationError::JsonParsing(_)));
    }

    #[test]
    fn charge_parsing_table() {
        let text = |s: &str| Some(ChargeField::Text(s.to_string()));
        let cases: &[(Option<ChargeField>, Option<f64>)] = &[
            (text("$150.00"), Some(150.0)),
            (text("$1,234.56"), Some(1234.56)),
            (text("200"), Some(200.0)),
            (text(" $ 49.50 "), Some(49.50)),
            (text("N/A"), None),
            (text(""), None),
            (text("-50"), None),
            (Some(ChargeField::Number(75.25)), Some(75.25)),
            (Some(ChargeField::Number(-1.0)), None),
            (Some(ChargeField::Number(f64::NAN)), None),
            (None, None),
        ];

        for (input, expected) in cases {
            let got = parse_charge(input.as_ref());
            match (got, expected) {
                (Some(g), Some(e)) => assert!((g - e).abs() < f64::EPSILON, "{input:?}"),
                (None, None) => {}
                _ => panic!("charge {input:?}: got {got:?}, expected {expected:?}"),
            }
        }
    }
}
