//! Projection of option bags onto URL query parameters.

use serde_json::Value;

use crate::options::Options;

/// Ordered `name=value` pairs for a request's query string.
pub type QueryParams = Vec<(String, String)>;

/// Query parameters accepted by `GET /containers/json`.
pub const LIST_CONTAINERS: &[&str] = &["all", "limit", "since", "before", "size"];
/// Query parameters accepted by `GET /images/json`.
pub const LIST_IMAGES: &[&str] = &["all"];
/// Query parameters accepted by `POST /containers/create`.
pub const CREATE_CONTAINER: &[&str] = &["name"];
/// Query parameters accepted by `POST /containers/{id}/stop` and `/restart`.
pub const STOP_CONTAINER: &[&str] = &["t"];
/// Query parameters accepted by `DELETE /containers/{id}`.
pub const DELETE_CONTAINER: &[&str] = &["v"];
/// Query parameters accepted by `GET /containers/{id}/logs`.
pub const CONTAINER_LOGS: &[&str] = &["stdout", "stderr", "follow", "tail", "timestamps"];

/// Returns the whitelisted options that are present and truthy, in
/// whitelist order.
///
/// `null`, `false` and the empty string count as absent. Everything else is
/// rendered without further validation.
#[must_use]
pub fn extract_query(whitelist: &[&str], options: &Options) -> QueryParams {
    whitelist
        .iter()
        .filter_map(|&name| {
            let value = options.get(name)?;
            render(value).map(|v| (name.to_string(), v))
        })
        .collect()
}

fn render(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}
