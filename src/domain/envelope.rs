// Response envelope unwrapping
//
// The BroiLink API has wrapped its payloads three different ways over time:
// `{data: {data: T}}`, `{data: T}` and bare `T`. Everything that reads an API
// body goes through `unwrap` first, then picks domain keys with `lookup`.
use serde_json::Value;

/// Return the most deeply nested conventional payload of `body`.
///
/// Never fails: a body without a `data` key (or a non-object body, including
/// `null`) is returned unchanged. A primitive `data` is the payload itself.
pub fn unwrap(body: &Value) -> &Value {
    match body.get("data") {
        Some(inner @ (Value::Object(_) | Value::Array(_))) => inner.get("data").unwrap_or(inner),
        Some(inner) => inner,
        None => body,
    }
}

/// Owning variant of [`unwrap`].
pub fn unwrap_owned(body: Value) -> Value {
    match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Object(mut inner)) => match inner.remove("data") {
                Some(payload) => payload,
                None => Value::Object(inner),
            },
            Some(inner) => inner,
            None => Value::Object(map),
        },
        other => other,
    }
}

/// First candidate key whose value is an array or object.
pub fn lookup<'a>(payload: &'a Value, candidates: &[&str]) -> Option<&'a Value> {
    let map = payload.as_object()?;
    candidates
        .iter()
        .filter_map(|key| map.get(*key))
        .find(|value| value.is_array() || value.is_object())
}

/// Like [`lookup`] but only accepts arrays; yields an empty slice otherwise.
pub fn lookup_array<'a>(payload: &'a Value, candidates: &[&str]) -> &'a [Value] {
    payload
        .as_object()
        .and_then(|map| {
            candidates
                .iter()
                .filter_map(|key| map.get(*key))
                .find_map(|value| value.as_array())
        })
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
