use std::io::Read;
use std::time::Duration;

use tracing::debug;

use crate::error::{Result, TransportError};
use crate::kind::TransportKind;

/// One blocking round-trip to a local endpoint.
///
/// Implemented by [`LocalClient`] and by test doubles that fake the wire.
pub trait Transport {
    /// Send `message` to `endpoint` and return the peer's full response.
    fn send(&mut self, endpoint: &str, message: &[u8]) -> Result<Vec<u8>>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, endpoint: &str, message: &[u8]) -> Result<Vec<u8>> {
        (**self).send(endpoint, message)
    }
}

/// Blocking one-shot client over the host's local transport.
///
/// Every call opens a fresh channel, writes the whole message, reads until
/// the peer closes, and drops the channel. One connection attempt, no
/// retries, no pooling.
pub struct LocalClient {
    kind: TransportKind,
    read_timeout: Option<Duration>,
}

impl LocalClient {
    /// Client for the running host's transport family.
    pub fn new() -> Self {
        Self::with_kind(TransportKind::host())
    }

    /// Client for an explicit transport family.
    pub fn with_kind(kind: TransportKind) -> Self {
        Self {
            kind,
            read_timeout: None,
        }
    }

    /// Set an optional read deadline (socket transport only).
    ///
    /// The default is `None`: the read loop blocks until the peer closes
    /// the channel, matching the historical gateway behavior.
    #[must_use]
    pub fn with_read_timeout(mut self, read_timeout: Option<Duration>) -> Self {
        self.read_timeout = read_timeout;
        self
    }
}

impl Default for LocalClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for LocalClient {
    fn send(&mut self, endpoint: &str, message: &[u8]) -> Result<Vec<u8>> {
        match self.kind {
            TransportKind::Pipe => pipe_send(endpoint, message),
            TransportKind::Socket => socket_send(endpoint, message, self.read_timeout),
            TransportKind::Unsupported => Err(TransportError::Unsupported),
        }
    }
}

/// Accumulate response bytes until the peer closes the channel.
fn read_to_close<R: Read>(stream: &mut R) -> Result<Vec<u8>> {
    let mut response = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let read = match stream.read(&mut chunk) {
            Ok(read) => read,
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(TransportError::Io(err)),
        };
        if read == 0 {
            break;
        }
        response.extend_from_slice(&chunk[..read]);
    }
    Ok(response)
}

#[cfg(unix)]
fn socket_send(endpoint: &str, message: &[u8], read_timeout: Option<Duration>) -> Result<Vec<u8>> {
    use std::io::Write;

    if endpoint.is_empty() {
        return Err(TransportError::InvalidSocketName);
    }

    let mut stream = connect_unix(endpoint)?;
    if read_timeout.is_some() {
        stream.set_read_timeout(read_timeout)?;
    }

    debug!(endpoint, "about to send request to session");
    stream.write_all(message)?;
    debug!(endpoint, "finished sending request to session");

    let response = read_to_close(&mut stream)?;
    debug!(
        endpoint,
        bytes = response.len(),
        "finished fetching response from session"
    );
    Ok(response)
}

/// Two-phase connect so create-failure and connect-failure stay distinct
/// error kinds, as the gateway reports them separately.
#[cfg(unix)]
fn connect_unix(endpoint: &str) -> Result<std::os::unix::net::UnixStream> {
    use std::os::fd::FromRawFd;

    let mut addr: libc::sockaddr_un = unsafe { std::mem::zeroed() };
    addr.sun_family = libc::AF_UNIX as libc::sa_family_t;
    let path = endpoint.as_bytes();
    if path.len() >= addr.sun_path.len() {
        return Err(TransportError::InvalidSocketName);
    }
    for (dst, src) in addr.sun_path.iter_mut().zip(path) {
        *dst = *src as libc::c_char;
    }

    // SAFETY: plain socket(2) call; the descriptor is checked before use.
    let fd = unsafe { libc::socket(libc::AF_UNIX, libc::SOCK_STREAM, 0) };
    if fd < 0 {
        return Err(TransportError::SocketCreate(std::io::Error::last_os_error()));
    }

    let len = std::mem::size_of::<libc::sockaddr_un>() as libc::socklen_t;
    // SAFETY: `addr` is a fully initialized sockaddr_un and `fd` is the
    // socket created above.
    let rc = unsafe { libc::connect(fd, std::ptr::addr_of!(addr).cast::<libc::sockaddr>(), len) };
    if rc != 0 {
        let err = std::io::Error::last_os_error();
        // SAFETY: `fd` is owned by this function until handed to UnixStream.
        unsafe { libc::close(fd) };
        return Err(TransportError::SocketConnect(err));
    }

    // SAFETY: the descriptor is a connected stream socket owned by nobody else.
    Ok(unsafe { std::os::unix::net::UnixStream::from_raw_fd(fd) })
}

#[cfg(not(unix))]
fn socket_send(endpoint: &str, _message: &[u8], _read_timeout: Option<Duration>) -> Result<Vec<u8>> {
    let _ = endpoint;
    Err(TransportError::SocketCreate(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "unix domain sockets are not available on this host",
    )))
}

#[cfg(windows)]
fn pipe_send(endpoint: &str, message: &[u8]) -> Result<Vec<u8>> {
    use std::io::Write;

    if endpoint.is_empty() {
        return Err(TransportError::InvalidPipeName);
    }

    // CreateFile on a \\.\pipe\ path; duplex, byte-stream semantics.
    let mut pipe = std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .open(endpoint)
        .map_err(TransportError::PipeOpen)?;

    debug!(endpoint, "about to send request to session");
    pipe.write_all(message)?;
    debug!(endpoint, "finished sending request to session");

    let response = read_to_close(&mut pipe)?;
    debug!(
        endpoint,
        bytes = response.len(),
        "finished fetching response from session"
    );
    Ok(response)
}

#[cfg(not(windows))]
fn pipe_send(endpoint: &str, _message: &[u8]) -> Result<Vec<u8>> {
    let _ = endpoint;
    Err(TransportError::PipeOpen(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "named pipes are not available on this host",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_to_close_accumulates_until_eof() {
        let mut stream = std::io::Cursor::new(b"chunked response".to_vec());
        let out = read_to_close(&mut stream).expect("read should succeed");
        assert_eq!(out, b"chunked response");
    }

    #[test]
    fn unsupported_host_sends_nothing() {
        let mut client = LocalClient::with_kind(TransportKind::from_os("solaris"));
        let err = client
            .send("/tmp/anything", b"{}")
            .expect_err("unsupported platform must not attempt transport");
        assert!(matches!(err, TransportError::Unsupported));
        assert_eq!(
            err.to_payload(),
            r#"{"Result":"","Error":"Unrecognized Server OS"}"#
        );
    }

    #[cfg(unix)]
    mod unix_wire {
        use std::io::{Read, Write};
        use std::os::unix::net::UnixListener;

        use super::*;

        fn temp_sock(tag: &str) -> std::path::PathBuf {
            let dir = std::env::temp_dir().join(format!(
                "fibergw-{tag}-{}-{}",
                std::process::id(),
                std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .expect("time should be after epoch")
                    .as_nanos()
            ));
            std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
            dir.join("endpoint.sock")
        }

        #[test]
        fn round_trip_over_unix_socket() {
            let sock_path = temp_sock("roundtrip");
            let listener = UnixListener::bind(&sock_path).expect("listener should bind");

            let server = std::thread::spawn(move || {
                let (mut stream, _) = listener.accept().expect("listener should accept");
                let mut buf = [0u8; 4096];
                let read = stream.read(&mut buf).expect("server should read request");
                assert_eq!(&buf[..read], b"{\"ping\":true}");
                stream
                    .write_all(b"{\"pong\":true}")
                    .expect("server should respond");
            });

            let mut client = LocalClient::with_kind(TransportKind::Socket);
            let response = client
                .send(sock_path.to_str().expect("path should be utf-8"), b"{\"ping\":true}")
                .expect("round trip should succeed");
            assert_eq!(response, b"{\"pong\":true}");

            server.join().expect("server thread should complete");
            let _ = std::fs::remove_file(&sock_path);
        }

        #[test]
        fn silent_peer_yields_empty_response() {
            let sock_path = temp_sock("silent");
            let listener = UnixListener::bind(&sock_path).expect("listener should bind");

            let server = std::thread::spawn(move || {
                let (mut stream, _) = listener.accept().expect("listener should accept");
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf).expect("server should read request");
                // Hang up without responding.
            });

            let mut client = LocalClient::with_kind(TransportKind::Socket);
            let response = client
                .send(sock_path.to_str().expect("path should be utf-8"), b"{}")
                .expect("send should succeed even when the peer stays silent");
            assert!(response.is_empty());

            server.join().expect("server thread should complete");
            let _ = std::fs::remove_file(&sock_path);
        }

        #[test]
        fn read_timeout_bounds_a_stalled_peer() {
            let sock_path = temp_sock("stall");
            let listener = UnixListener::bind(&sock_path).expect("listener should bind");

            let server = std::thread::spawn(move || {
                let (mut stream, _) = listener.accept().expect("listener should accept");
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf).expect("server should read request");
                // Stall with the channel open; the client must give up first.
                std::thread::sleep(Duration::from_millis(1500));
            });

            let mut client = LocalClient::with_kind(TransportKind::Socket)
                .with_read_timeout(Some(Duration::from_millis(100)));
            let err = client
                .send(sock_path.to_str().expect("path should be utf-8"), b"{}")
                .expect_err("stalled peer must trip the read deadline");
            assert!(matches!(err, TransportError::Io(_)));

            server.join().expect("server thread should complete");
            let _ = std::fs::remove_file(&sock_path);
        }

        #[test]
        fn empty_endpoint_is_an_invalid_socket_name() {
            let mut client = LocalClient::with_kind(TransportKind::Socket);
            let err = client.send("", b"{}").expect_err("empty endpoint must fail");
            assert!(matches!(err, TransportError::InvalidSocketName));
        }

        #[test]
        fn missing_endpoint_is_a_connect_failure() {
            let mut client = LocalClient::with_kind(TransportKind::Socket);
            let err = client
                .send("/tmp/fibergw-definitely-not-bound.sock", b"{}")
                .expect_err("connecting to a missing socket must fail");
            assert!(matches!(err, TransportError::SocketConnect(_)));
            assert_eq!(
                err.to_payload(),
                r#"{"error":"Couldn't connect to the socket of the session handler"}"#
            );
        }

        #[test]
        fn overlong_endpoint_is_an_invalid_socket_name() {
            let long_path = "/tmp/".to_string() + &"a".repeat(200) + ".sock";
            let mut client = LocalClient::with_kind(TransportKind::Socket);
            let err = client
                .send(&long_path, b"{}")
                .expect_err("overlong path must fail before any syscall");
            assert!(matches!(err, TransportError::InvalidSocketName));
        }
    }
}
