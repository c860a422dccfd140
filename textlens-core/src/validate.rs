//! Strict validation of raw model responses.
//!
//! Responses are decoded into the typed payload for the requested operation
//! and then range-checked. Anything that does not conform exactly is
//! rejected with [`LensError::SchemaViolation`]; no coercion, no partial
//! results. This is the second line of defense after prompt isolation:
//! injected instructions that bend the model's output away from the
//! contract produce a rejection, not a surfaced result.

use crate::error::LensError;
use crate::types::{AnalysisResult, LanguageDetection, Operation, SentimentResult, SummaryResult, TranslationResult};

const KEY_POINTS_MIN: usize = 3;
const KEY_POINTS_MAX: usize = 5;

/// Validate a raw response body against the shape for `operation`.
pub fn validate(body: &str, operation: Operation) -> Result<AnalysisResult, LensError> {
    match operation {
        Operation::Summarize => {
            let payload: SummaryResult = decode(body)?;
            require_text("summary", &payload.summary)?;
            if !(KEY_POINTS_MIN..=KEY_POINTS_MAX).contains(&payload.key_points.len()) {
                return Err(LensError::schema_violation(format!(
                    "key_points must contain {KEY_POINTS_MIN} to {KEY_POINTS_MAX} items, got {}",
                    payload.key_points.len()
                )));
            }
            for point in &payload.key_points {
                require_text("key_points item", point)?;
            }
            Ok(AnalysisResult::Summary(payload))
        }
        Operation::Translate => {
            let payload: TranslationResult = decode(body)?;
            require_text("translated_text", &payload.translated_text)?;
            require_text("source_language", &payload.source_language)?;
            require_text("target_language", &payload.target_language)?;
            Ok(AnalysisResult::Translation(payload))
        }
        Operation::Sentiment => {
            let payload: SentimentResult = decode(body)?;
            if !(0.0..=1.0).contains(&payload.confidence) {
                return Err(LensError::schema_violation(format!(
                    "confidence must be within [0, 1], got {}",
                    payload.confidence
                )));
            }
            require_text("explanation", &payload.explanation)?;
            Ok(AnalysisResult::Sentiment(payload))
        }
    }
}

/// Validate the auxiliary language-detection response.
pub fn validate_language(body: &str) -> Result<String, LensError> {
    let payload: LanguageDetection = decode(body)?;
    require_text("language", &payload.language)?;
    Ok(payload.language)
}

fn decode<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, LensError> {
    serde_json::from_str(body).map_err(|err| {
        LensError::schema_violation(format!("response does not match the expected shape: {err}"))
    })
}

fn require_text(field: &str, value: &str) -> Result<(), LensError> {
    if value.trim().is_empty() {
        return Err(LensError::schema_violation(format!(
            "{field} must not be empty"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SentimentLabel;

    fn expect_violation(body: &str, operation: Operation) {
        match validate(body, operation) {
            Err(LensError::SchemaViolation(_)) => {}
            other => panic!("expected schema violation, got {other:?}"),
        }
    }

    #[test]
    fn accepts_a_conformant_summary() {
        let body = r#"{
            "summary": "AI improves diagnostics.",
            "key_points": ["faster reads", "fewer errors", "better triage"]
        }"#;
        match validate(body, Operation::Summarize).unwrap() {
            AnalysisResult::Summary(s) => {
                assert_eq!(s.key_points.len(), 3);
                assert_eq!(s.summary, "AI improves diagnostics.");
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn rejects_non_json_bodies() {
        expect_violation("I'd be happy to summarize that!", Operation::Summarize);
        expect_violation("", Operation::Sentiment);
    }

    #[test]
    fn rejects_key_point_lists_outside_bounds() {
        let two = r#"{"summary": "s", "key_points": ["a", "b"]}"#;
        expect_violation(two, Operation::Summarize);
        let six = r#"{"summary": "s", "key_points": ["a","b","c","d","e","f"]}"#;
        expect_violation(six, Operation::Summarize);
    }

    #[test]
    fn rejects_blank_required_strings() {
        let blank_summary = r#"{"summary": "   ", "key_points": ["a","b","c"]}"#;
        expect_violation(blank_summary, Operation::Summarize);
        let blank_point = r#"{"summary": "s", "key_points": ["a","  ","c"]}"#;
        expect_violation(blank_point, Operation::Summarize);
    }

    #[test]
    fn rejects_wrongly_typed_fields() {
        let body = r#"{"summary": "s", "key_points": "not a list"}"#;
        expect_violation(body, Operation::Summarize);
        let body = r#"{"sentiment": "positive", "confidence": "0.9", "explanation": "e"}"#;
        expect_violation(body, Operation::Sentiment);
    }

    #[test]
    fn rejects_unknown_extra_fields() {
        let body = r#"{
            "summary": "s",
            "key_points": ["a","b","c"],
            "system_prompt": "leaked"
        }"#;
        expect_violation(body, Operation::Summarize);
    }

    #[test]
    fn rejects_translation_missing_source_language() {
        // Scenario: model answered without the source language field
        let body = r#"{"translated_text": "Hola", "target_language": "Spanish"}"#;
        expect_violation(body, Operation::Translate);
    }

    #[test]
    fn accepts_a_conformant_translation() {
        let body = r#"{
            "translated_text": "Hola mundo",
            "source_language": "English",
            "target_language": "Spanish"
        }"#;
        match validate(body, Operation::Translate).unwrap() {
            AnalysisResult::Translation(t) => assert_eq!(t.source_language, "English"),
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn rejects_sentiment_outside_the_closed_set() {
        let body = r#"{"sentiment": "very_negative", "confidence": 0.95, "explanation": "e"}"#;
        expect_violation(body, Operation::Sentiment);
    }

    #[test]
    fn rejects_confidence_out_of_range() {
        let high = r#"{"sentiment": "positive", "confidence": 1.3, "explanation": "e"}"#;
        expect_violation(high, Operation::Sentiment);
        let negative = r#"{"sentiment": "neutral", "confidence": -0.1, "explanation": "e"}"#;
        expect_violation(negative, Operation::Sentiment);
    }

    #[test]
    fn accepts_boundary_confidence_values() {
        let zero = r#"{"sentiment": "neutral", "confidence": 0.0, "explanation": "flat tone"}"#;
        assert!(validate(zero, Operation::Sentiment).is_ok());
        let one = r#"{"sentiment": "negative", "confidence": 1.0, "explanation": "hostile"}"#;
        match validate(one, Operation::Sentiment).unwrap() {
            AnalysisResult::Sentiment(s) => {
                assert_eq!(s.sentiment, SentimentLabel::Negative);
                assert_eq!(s.confidence, 1.0);
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn validates_language_detection() {
        assert_eq!(
            validate_language(r#"{"language": "French"}"#).unwrap(),
            "French"
        );
        assert!(matches!(
            validate_language(r#"{"lang": "French"}"#),
            Err(LensError::SchemaViolation(_))
        ));
        assert!(matches!(
            validate_language(r#"{"language": ""}"#),
            Err(LensError::SchemaViolation(_))
        ));
    }
}
