//! Response parsing: turns a model text payload into a typed record.
//!
//! Providers sometimes wrap JSON in a markdown fence even when asked for
//! `application/json`; the fence is stripped before decoding.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::error;

use super::schema::Schema;
use super::LlmError;

const FENCE: &str = "```";

/// How much of the declared response schema is enforced after decoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationMode {
    /// Only JSON decodability is checked. Missing fields take empty values.
    #[default]
    Lenient,
    /// The decoded value must satisfy the schema sent to the provider.
    Strict,
}

/// Field deserializer for model payloads: an explicit `null` decodes the same
/// as an absent field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Strips a ```` ``` ```` fence (with optional language tag) from `raw`.
pub fn strip_json_fences(raw: &str) -> &str {
    let mut cleaned = raw.trim();

    if cleaned.starts_with(FENCE) {
        if let Some(newline) = cleaned.find('\n') {
            cleaned = &cleaned[newline + 1..];
        }
        if let Some(stripped) = cleaned.strip_suffix(FENCE) {
            cleaned = stripped;
        }
        cleaned = cleaned.trim();
    }

    cleaned
}

/// Strips fences and decodes `raw` as JSON into `T`.
pub fn parse_json_response<T: DeserializeOwned>(raw: &str) -> Result<T, LlmError> {
    let cleaned = strip_json_fences(raw);

    serde_json::from_str(cleaned).map_err(|e| {
        error!(raw = %raw, cleaned = %cleaned, error = %e, "Failed to parse model response");
        LlmError::MalformedResponse(e)
    })
}

/// Decodes `raw`, checks it against `schema` when `mode` is strict, then
/// converts it into `T`.
pub fn parse_validated<T: DeserializeOwned>(
    raw: &str,
    schema: &Schema,
    mode: ValidationMode,
) -> Result<T, LlmError> {
    let value: Value = parse_json_response(raw)?;

    if mode == ValidationMode::Strict {
        let violations = schema.violations(&value);
        if !violations.is_empty() {
            error!(?violations, "Model response violates the declared schema");
            return Err(LlmError::SchemaViolation(violations));
        }
    }

    serde_json::from_value(value).map_err(|e| {
        error!(raw = %raw, error = %e, "Model response has the wrong shape");
        LlmError::MalformedResponse(e)
    })
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Nullable {
        #[serde(default, deserialize_with = "null_as_default")]
        a: i64,
        #[serde(default, deserialize_with = "null_as_default")]
        b: Vec<String>,
    }

    #[test]
    fn test_null_fields_decode_as_absent() {
        let decoded: Nullable =
            parse_validated(r#"{"a": null, "b": null}"#, &nullable_schema(), ValidationMode::Lenient)
                .unwrap();
        assert_eq!(decoded, Nullable { a: 0, b: vec![] });

        let decoded: Nullable =
            parse_validated(r#"{"a": 3, "b": ["x"]}"#, &nullable_schema(), ValidationMode::Lenient)
                .unwrap();
        assert_eq!(decoded, Nullable { a: 3, b: vec!["x".to_string()] });
    }

    #[test]
    fn test_strict_mode_still_rejects_null_fields() {
        let result: Result<Nullable, _> =
            parse_validated(r#"{"a": null, "b": []}"#, &nullable_schema(), ValidationMode::Strict);
        assert!(matches!(result, Err(LlmError::SchemaViolation(_))));
    }

    fn nullable_schema() -> Schema {
        Schema::object([("a", Schema::integer()), ("b", Schema::array(Schema::string()))])
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Pair {
        #[serde(default)]
        a: i64,
        #[serde(default)]
        b: String,
    }

    fn pair_schema() -> Schema {
        Schema::object([("a", Schema::integer()), ("b", Schema::string())])
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "  {\"key\": \"value\"}\n";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_missing_closing_fence() {
        let input = "```json\n{\"key\": 1}";
        assert_eq!(strip_json_fences(input), "{\"key\": 1}");
    }

    #[test]
    fn test_fenced_and_bare_payloads_decode_equal() {
        let fenced: Value = parse_json_response("```json\n{\"a\":1}\n```").unwrap();
        let bare: Value = parse_json_response("{\"a\":1}").unwrap();
        assert_eq!(fenced, json!({"a": 1}));
        assert_eq!(fenced, bare);
    }

    #[test]
    fn test_non_json_is_malformed_response() {
        let result: Result<Value, _> = parse_json_response("```\nnot json\n```");
        match result {
            Err(err @ LlmError::MalformedResponse(_)) => {
                assert_eq!(err.to_string(), "The AI response was not valid JSON.");
            }
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[test]
    fn test_lenient_mode_accepts_missing_fields() {
        let pair: Pair = parse_validated(r#"{"a": 7}"#, &pair_schema(), ValidationMode::Lenient)
            .unwrap();
        assert_eq!(pair, Pair { a: 7, b: String::new() });
    }

    #[test]
    fn test_strict_mode_rejects_missing_fields() {
        let result: Result<Pair, _> =
            parse_validated(r#"{"a": 7}"#, &pair_schema(), ValidationMode::Strict);
        match result {
            Err(LlmError::SchemaViolation(violations)) => {
                assert_eq!(violations, vec!["b: missing required field".to_string()]);
            }
            other => panic!("expected SchemaViolation, got {other:?}"),
        }
    }

    #[test]
    fn test_strict_mode_accepts_conforming_payload() {
        let pair: Pair = parse_validated(
            "```json\n{\"a\": 1, \"b\": \"x\"}\n```",
            &pair_schema(),
            ValidationMode::Strict,
        )
        .unwrap();
        assert_eq!(pair, Pair { a: 1, b: "x".to_string() });
    }

    #[test]
    fn test_wrongly_typed_field_is_malformed_even_when_lenient() {
        let result: Result<Pair, _> =
            parse_validated(r#"{"a": "seven"}"#, &pair_schema(), ValidationMode::Lenient);
        assert!(matches!(result, Err(LlmError::MalformedResponse(_))));
    }
}
