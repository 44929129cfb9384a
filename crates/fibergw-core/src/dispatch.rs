use tracing::{debug, info};

use fibergw_transport::{Transport, TransportError};

use crate::config::GatewayConfig;
use crate::discovery::discover_handler;
use crate::envelope::error_envelope;
use crate::request::{Request, RequestKind};

/// Footer marker delimiting service-request messages for handlers.
///
/// Appended to the serialized payload with no separator; handlers use it
/// as the message boundary on their end of the channel.
pub const FIBER_FOOTER: &str = "<-FIBERFOOTER->";

/// Client-safe wording for control-channel connectivity failures. The
/// transport-level details stay in the server log only.
const COMMUNICATION_ERROR: &str = "Couldn't communicate with Fiber. See server error log.";
const INVALID_REQUEST: &str = "Invalid request message.";
const HUNG_UP: &str = "Fiber hung up with out any response";

/// Routes one request to the control channel or a discovered handler.
///
/// Owns its transport and configuration for the lifetime of a single
/// invocation; nothing is shared across requests. Dispatch is total: it
/// always produces exactly one response text and never returns an error.
pub struct Gateway<T> {
    transport: T,
    config: GatewayConfig,
}

impl<T: Transport> Gateway<T> {
    pub fn new(transport: T, config: GatewayConfig) -> Self {
        Self { transport, config }
    }

    /// Dispatch one request and produce exactly one response.
    ///
    /// The returned bytes are either the peer's response verbatim or one
    /// well-formed JSON envelope, never anything else.
    pub fn dispatch(&mut self, request: &Request) -> Vec<u8> {
        let kind = request.kind();
        debug!(?kind, "classified request");
        match kind {
            Some(RequestKind::SessionMgmt) => self.manage_session(request),
            Some(RequestKind::Service) => self.invoke_service(request),
            None => error_envelope(INVALID_REQUEST).into_bytes(),
        }
    }

    fn manage_session(&mut self, request: &Request) -> Vec<u8> {
        let Ok(message) = request.to_wire() else {
            return error_envelope(INVALID_REQUEST).into_bytes();
        };
        // Session management payloads are safe to log in full.
        info!("Requesting : {message}");

        match self
            .transport
            .send(&self.config.control_endpoint, message.as_bytes())
        {
            Ok(response) => response,
            Err(TransportError::PipeOpen(_) | TransportError::SocketConnect(_)) => {
                error_envelope(COMMUNICATION_ERROR).into_bytes()
            }
            Err(err) => err.to_payload().into_bytes(),
        }
    }

    fn invoke_service(&mut self, request: &Request) -> Vec<u8> {
        let handler = discover_handler(
            &mut self.transport,
            &self.config.control_endpoint,
            request.session_name(),
            request.session_type(),
        );
        if handler.is_empty() {
            return error_envelope(COMMUNICATION_ERROR).into_bytes();
        }

        let Ok(serialized) = request.to_wire() else {
            return error_envelope(INVALID_REQUEST).into_bytes();
        };
        let message = format!("{serialized}{FIBER_FOOTER}");

        info!(handler = %handler, "contacting handler");
        let response = match self.transport.send(&handler, message.as_bytes()) {
            Ok(response) => response,
            Err(err) => return err.to_payload().into_bytes(),
        };
        if response.is_empty() {
            return error_envelope(HUNG_UP).into_bytes();
        }
        info!("responding to client");
        response
    }
}
