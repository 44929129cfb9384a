use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `requestType` value for session-management requests.
pub const SESSION_MGMT: &str = "SESSION_MGMT";
/// `requestType` value for service requests.
pub const SERVICE_REQUEST: &str = "SERVICE_REQUEST";

/// Sentinel session name when the client supplies none.
pub const NULL_SESSION: &str = "NULL";
/// Default session type when the client supplies none.
pub const CORE_SESSION_TYPE: &str = "CORE";

/// Classification of an inbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Goes straight to the control channel.
    SessionMgmt,
    /// Needs a handler discovery round-trip first.
    Service,
}

/// One inbound gateway request.
///
/// The fields the gateway itself reads are typed; every other payload
/// field rides along in `extra` and is re-serialized untouched when the
/// request is forwarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    #[serde(rename = "requestType", skip_serializing_if = "Option::is_none")]
    request_type: Option<String>,
    #[serde(rename = "sessionName", skip_serializing_if = "Option::is_none")]
    session_name: Option<String>,
    #[serde(rename = "sessionType", skip_serializing_if = "Option::is_none")]
    session_type: Option<String>,
    #[serde(rename = "clientIP", skip_serializing_if = "Option::is_none")]
    client_ip: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Request {
    /// Parse one request from its JSON text.
    pub fn from_json_str(input: &str) -> serde_json::Result<Self> {
        serde_json::from_str(input)
    }

    /// Classify by `requestType`; `None` means not dispatchable.
    pub fn kind(&self) -> Option<RequestKind> {
        match self.request_type.as_deref() {
            Some(SESSION_MGMT) => Some(RequestKind::SessionMgmt),
            Some(SERVICE_REQUEST) => Some(RequestKind::Service),
            _ => None,
        }
    }

    /// Session name with the defaulting rule: absent or empty becomes the
    /// `"NULL"` sentinel.
    pub fn session_name(&self) -> &str {
        match self.session_name.as_deref() {
            None | Some("") => NULL_SESSION,
            Some(name) => name,
        }
    }

    /// Session type. Only absence defaults to `"CORE"`; an explicitly
    /// empty string is forwarded as-is.
    pub fn session_type(&self) -> &str {
        self.session_type.as_deref().unwrap_or(CORE_SESSION_TYPE)
    }

    /// Record the address the web client connected from.
    pub fn set_client_ip(&mut self, client_ip: impl Into<String>) {
        self.client_ip = Some(client_ip.into());
    }

    /// Serialize for forwarding. Typed and extra fields all round-trip.
    pub fn to_wire(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
