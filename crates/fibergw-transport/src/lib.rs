//! Local transport for the Fiber gateway.
//!
//! Provides a single blocking request/response primitive over the host's
//! local IPC mechanism:
//! - Unix domain sockets (Linux/macOS)
//! - Named pipes (Windows)
//!
//! This is the lowest layer of the gateway. The dispatcher and discovery
//! code talk to it only through the [`Transport`] trait.

pub mod client;
pub mod error;
pub mod kind;

pub use client::{LocalClient, Transport};
pub use error::{Result, TransportError};
pub use kind::TransportKind;
