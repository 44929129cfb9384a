use fibergw_transport::TransportKind;

/// Well-known control channel address on Windows.
pub const CONTROL_PIPE: &str = r"\\.\pipe\Fiber";
/// Well-known control channel address on Unix platforms.
pub const CONTROL_SOCKET: &str = "/tmp/Fiber";

/// Per-invocation gateway settings.
///
/// Constructed once by the shell and passed down by value; no settings
/// live in process-wide state.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Address of the control channel.
    pub control_endpoint: String,
}

impl GatewayConfig {
    /// Platform-conventional configuration for `kind`.
    ///
    /// Unsupported hosts still get the Unix address; the transport layer
    /// refuses them before the address is ever used.
    pub fn for_kind(kind: TransportKind) -> Self {
        let control_endpoint = match kind {
            TransportKind::Pipe => CONTROL_PIPE,
            TransportKind::Socket | TransportKind::Unsupported => CONTROL_SOCKET,
        };
        Self {
            control_endpoint: control_endpoint.to_string(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::for_kind(TransportKind::host())
    }
}
