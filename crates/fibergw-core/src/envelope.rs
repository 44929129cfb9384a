use serde::Serialize;

/// Canonical failure envelope relayed to the web client.
///
/// Field order is wire-visible and must stay `success`, `result`,
/// `error`.
#[derive(Debug, Serialize)]
pub struct ResponseEnvelope {
    pub success: bool,
    pub result: String,
    pub error: String,
}

/// Build the canonical error envelope JSON for `message`.
pub fn error_envelope(message: &str) -> String {
    let envelope = ResponseEnvelope {
        success: false,
        result: String::new(),
        error: message.to_string(),
    };
    serde_json::to_string(&envelope).unwrap_or_else(|_| "{}".to_string())
}
