//! Byte-stream transports for console sessions.
//!
//! A transport only moves bytes. Line framing, settle delays and decoding
//! live in the [`channel`](crate::channel) layer.

pub mod config;
mod scripted;
pub mod serial;

pub use config::{FlowControl, Parity, SerialConfig};
pub use scripted::{ScriptStep, ScriptedTransport};
pub use serial::SerialTransport;

use std::future::Future;

use bytes::Bytes;

use crate::error::Result;

/// A reliable, in-order byte stream to a device console.
pub trait Transport: Send {
    /// Write all bytes to the device.
    fn write(&mut self, data: &[u8]) -> impl Future<Output = Result<()>> + Send;

    /// Return every byte currently available without waiting for more.
    ///
    /// Returns an empty buffer if nothing has arrived.
    fn read_available(&mut self) -> impl Future<Output = Result<Bytes>> + Send;

    /// Release the endpoint.
    fn close(&mut self) -> impl Future<Output = Result<()>> + Send;
}
