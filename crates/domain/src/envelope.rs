use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The `{ success, data, message }` wrapper most endpoints answer with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

/// Pull a human-readable `message` out of an error body, if the server sent one.
pub fn server_message(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_tolerates_missing_fields() {
        let env: Envelope<Value> = serde_json::from_value(json!({ "success": true })).unwrap();
        assert!(env.success);
        assert!(env.data.is_none());
    }

    #[test]
    fn server_message_ignores_blank_and_non_string() {
        assert_eq!(
            server_message(&json!({ "message": "Title is required" })).as_deref(),
            Some("Title is required")
        );
        assert_eq!(server_message(&json!({ "message": "  " })), None);
        assert_eq!(server_message(&json!({ "message": 3 })), None);
        assert_eq!(server_message(&json!("plain text")), None);
    }
}
