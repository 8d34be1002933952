use serde::Serialize;

// --- Central API types ---

/// Request body for attaching a profile to a scope
#[derive(Debug, Clone, Serialize)]
pub struct ScopeMapCreate {
    pub profile: String,
    pub persona: String,
    pub scope_type: String,
    pub scope_name: String,
}

/// Nest a profile payload under its bulk key, the form the
/// bulk-creation endpoints expect: `{"<bulk_key>": [<payload>]}`
pub fn bulk_body(bulk_key: &str, payload: &serde_json::Value) -> serde_json::Value {
    serde_json::json!({ bulk_key: [payload] })
}
