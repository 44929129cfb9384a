//! Core gateway logic for Fiber.
//!
//! Classifies one inbound JSON request, resolves the handler that owns
//! its session, forwards the payload over the local transport, and
//! normalizes failures into the canonical response envelope. Everything
//! here is synchronous and owns exactly one request at a time.

pub mod config;
pub mod discovery;
pub mod dispatch;
pub mod envelope;
pub mod request;

pub use config::GatewayConfig;
pub use dispatch::Gateway;
pub use envelope::error_envelope;
pub use request::{Request, RequestKind};
