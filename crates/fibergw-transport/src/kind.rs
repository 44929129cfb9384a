/// Local transport family available on a host.
///
/// This is the single place where the operating system decides how the
/// gateway reaches its local endpoints; everything downstream switches on
/// the variant, never on an OS string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Named pipe (Windows).
    Pipe,
    /// Unix domain socket (Linux/macOS).
    Socket,
    /// No local transport exists for this platform.
    Unsupported,
}

impl TransportKind {
    /// Classify an OS name as reported by [`std::env::consts::OS`].
    pub fn from_os(os: &str) -> Self {
        match os {
            "windows" => TransportKind::Pipe,
            "linux" | "macos" => TransportKind::Socket,
            _ => TransportKind::Unsupported,
        }
    }

    /// Transport family of the running host.
    pub fn host() -> Self {
        Self::from_os(std::env::consts::OS)
    }
}
