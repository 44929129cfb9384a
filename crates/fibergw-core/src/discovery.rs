use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use fibergw_transport::Transport;

/// Control message asking which handler owns a session.
#[derive(Debug, Serialize)]
pub struct HandlerQuery<'a> {
    #[serde(rename = "requestType")]
    request_type: &'static str,
    #[serde(rename = "sessionName")]
    session_name: &'a str,
    #[serde(rename = "sessionType")]
    session_type: &'a str,
}

impl<'a> HandlerQuery<'a> {
    pub fn new(session_name: &'a str, session_type: &'a str) -> Self {
        Self {
            request_type: "HANDLER",
            session_name,
            session_type,
        }
    }
}

/// Ask the control channel which handler serves the session.
///
/// Returns the handler's endpoint name, or the empty string when
/// discovery fails for any reason. Control-side errors are logged, never
/// raised; the caller reacts to the empty string only.
pub fn discover_handler<T: Transport>(
    transport: &mut T,
    control_endpoint: &str,
    session_name: &str,
    session_type: &str,
) -> String {
    let query = HandlerQuery::new(session_name, session_type);
    let message = match serde_json::to_string(&query) {
        Ok(message) => message,
        Err(err) => {
            warn!("could not encode handler query: {err}");
            return String::new();
        }
    };

    let response = match transport.send(control_endpoint, message.as_bytes()) {
        Ok(response) => response,
        Err(err) => {
            warn!("querying for handler failed: {err}");
            return String::new();
        }
    };

    let Ok(result) = serde_json::from_slice::<Value>(&response) else {
        warn!("handler query returned a non-JSON response");
        return String::new();
    };

    let handler_name = result
        .get("handlerName")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    if let Some(error) = result.get("error").and_then(Value::as_str) {
        warn!("querying for handler returned error {{{error}}}");
    }

    handler_name
}
