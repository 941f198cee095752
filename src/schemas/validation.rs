use crate::{
    error::{Result, TravelError},
    schemas::{CompletionSchema, SchemaHandle},
};
use serde_json::{Map, Value};
use tracing::debug;

const MAX_SCHEMA_ERRORS: usize = 3;

/// Validate a structured payload against a schema
pub fn validate_structured_payload(schema: &SchemaHandle, payload: &Value) -> Result<()> {
    let Err(errors) = schema.compiled().validate(payload) else {
        return Ok(());
    };

    let mut details = Vec::new();
    let mut truncated = false;

    for (idx, error) in errors.enumerate() {
        if idx < MAX_SCHEMA_ERRORS {
            let mut path = error.instance_path.to_string();
            if path.is_empty() {
                path = "<root>".to_string();
            }
            details.push(format!("{}: {}", path, error));
        } else {
            truncated = true;
            break;
        }
    }

    let mut detail_str = if details.is_empty() {
        "structured payload failed schema validation".to_string()
    } else {
        details.join("; ")
    };

    if truncated {
        detail_str.push_str("; additional errors truncated");
    }

    debug!(
        target: "voyage::schema",
        schema = schema.schema_name(),
        errors = %detail_str,
        payload = %payload
    );

    Err(TravelError::Validation(format!(
        "payload does not match `{}` schema: {}",
        schema.schema_name(),
        detail_str
    )))
}

/// Check `payload` against `T`'s schema, then deserialize it with path-aware errors.
pub fn decode_structured<T: CompletionSchema>(payload: &Value) -> Result<T> {
    let schema = T::schema();
    validate_structured_payload(schema, payload)?;

    serde_path_to_error::deserialize(payload).map_err(|err| {
        let path = err.path().to_string();
        let location = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        TravelError::Validation(format!(
            "failed to deserialize `{}` at {}: {}",
            schema.schema_name(),
            location,
            err.inner()
        ))
    })
}

/// Read model text as a JSON object.
///
/// Empty text reads as `{}`. Text that is not JSON is retried without
/// markdown fences, then as the first balanced `{...}` it contains.
pub fn parse_model_object(text: &str) -> Result<Map<String, Value>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Map::new());
    }

    let value = serde_json::from_str::<Value>(trimmed)
        .ok()
        .or_else(|| serde_json::from_str::<Value>(strip_code_fence(trimmed)).ok())
        .or_else(|| {
            extract_first_json_object(trimmed)
                .and_then(|candidate| serde_json::from_str::<Value>(candidate).ok())
        })
        .ok_or_else(|| {
            TravelError::UpstreamFormat(format!(
                "model output is not valid JSON: {}",
                preview(trimmed)
            ))
        })?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(TravelError::UpstreamFormat(format!(
            "expected a JSON object from the model, got {}",
            json_kind(&other)
        ))),
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

/// First top-level `{...}` substring, skipping braces inside JSON strings.
fn extract_first_json_object(text: &str) -> Option<&str> {
    let mut start = None;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' if start.is_some() => in_string = true,
            '{' => {
                start.get_or_insert(idx);
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return start.map(|st| &text[st..=idx]);
                }
            }
            _ => {}
        }
    }

    None
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn preview(text: &str) -> String {
    const LIMIT: usize = 120;
    match text.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
