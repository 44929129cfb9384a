use std::io;

use serde::Serialize;

/// Errors produced by the one-shot transport client.
///
/// The `Display` strings are wire-visible: callers embed them verbatim in
/// the error payloads relayed to the web client, so the wordings must stay
/// identical to what the deployed gateway emits.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The endpoint address is empty or unusable as a pipe name.
    #[error("Invalid pipe name specified for connection")]
    InvalidPipeName,

    /// The endpoint address is empty or unusable as a socket path.
    #[error("Invalid socket name specified for connection")]
    InvalidSocketName,

    /// `socket(2)` failed before any connection attempt.
    #[error("Couldn't create socket for the session handler")]
    SocketCreate(#[source] io::Error),

    /// `connect(2)` to the handler socket failed.
    #[error("Couldn't connect to the socket of the session handler")]
    SocketConnect(#[source] io::Error),

    /// Opening the handler's named pipe failed.
    #[error("Couldn't communicate with the session handler")]
    PipeOpen(#[source] io::Error),

    /// The host OS maps to no known local transport.
    #[error("Unrecognized Server OS")]
    Unsupported,

    /// I/O failure after the channel was established.
    #[error("transport I/O error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Serialize)]
struct ErrorPayload {
    error: String,
}

#[derive(Serialize)]
struct UnsupportedPayload {
    #[serde(rename = "Result")]
    result: &'static str,
    #[serde(rename = "Error")]
    error: &'static str,
}

impl TransportError {
    /// Render the legacy JSON payload for this error.
    ///
    /// Callers treat the payload as if it were a response body and inspect
    /// its `error` field, so the shapes are wire-compatible with the
    /// deployed gateway: `{"error": ...}` for channel failures, and the
    /// historical `{"Result":"","Error":...}` for an unsupported host.
    pub fn to_payload(&self) -> String {
        match self {
            TransportError::Unsupported => serde_json::to_string(&UnsupportedPayload {
                result: "",
                error: "Unrecognized Server OS",
            }),
            other => serde_json::to_string(&ErrorPayload {
                error: other.to_string(),
            }),
        }
        .unwrap_or_else(|_| "{}".to_string())
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
