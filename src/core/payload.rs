use crate::utils::error::ValidationError;
use serde_json::Value;

/// Returns the non-empty `features` array of a request body.
///
/// `expected` completes the "Features must be ..." message for callers that
/// describe their input differently.
pub fn extract_features<'a>(
    payload: &'a Value,
    expected: &'static str,
) -> Result<&'a [Value], ValidationError> {
    let features = payload.get("features").ok_or(ValidationError::MissingKey)?;

    let items = features
        .as_array()
        .ok_or(ValidationError::WrongType { expected })?;

    if items.is_empty() {
        return Err(ValidationError::EmptyInput);
    }

    Ok(items)
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
