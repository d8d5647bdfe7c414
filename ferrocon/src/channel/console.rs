//! Line-oriented console channel over a transport.

use std::time::Duration;

use log::{debug, trace};

use super::buffer::ResponseBuffer;
use crate::error::Result;
use crate::transport::Transport;

/// Configuration for channel behavior.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Pause after sending a line before reading the response.
    pub settle_delay: Duration,

    /// Terminator appended to each line.
    pub line_ending: String,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_secs(1),
            line_ending: "\n".to_string(),
        }
    }
}

/// Console channel: writes lines, polls for whatever the device printed.
pub struct ConsoleChannel<T> {
    transport: T,
    buffer: ResponseBuffer,
    config: ChannelConfig,
}

impl<T: Transport> ConsoleChannel<T> {
    /// Wrap a transport.
    pub fn new(transport: T, config: ChannelConfig) -> Self {
        Self {
            transport,
            buffer: ResponseBuffer::new(),
            config,
        }
    }

    /// Send a line with the configured terminator.
    pub async fn send(&mut self, line: &str) -> Result<()> {
        debug!("send: {:?}", line);
        self.write_line(line).await
    }

    /// Send a line without logging its content (passwords).
    pub async fn send_hidden(&mut self, line: &str) -> Result<()> {
        debug!("send: <hidden>");
        self.write_line(line).await
    }

    async fn write_line(&mut self, line: &str) -> Result<()> {
        let mut data = Vec::with_capacity(line.len() + self.config.line_ending.len());
        data.extend_from_slice(line.as_bytes());
        data.extend_from_slice(self.config.line_ending.as_bytes());
        self.transport.write(&data).await
    }

    /// Wait the default settle delay, then return everything that arrived.
    pub async fn poll(&mut self) -> Result<String> {
        self.poll_with(self.config.settle_delay).await
    }

    /// Wait `settle`, then return everything that arrived.
    ///
    /// Returns an empty string if the device printed nothing.
    pub async fn poll_with(&mut self, settle: Duration) -> Result<String> {
        if !settle.is_zero() {
            tokio::time::sleep(settle).await;
        }

        let data = self.transport.read_available().await?;
        trace!("read {} bytes", data.len());
        self.buffer.extend(&data);

        let text = self.buffer.take_text();
        debug!("recv: {:?}", text);
        Ok(text)
    }

    /// Send a line and poll for its response.
    pub async fn exchange(&mut self, line: &str) -> Result<String> {
        self.send(line).await?;
        self.poll().await
    }

    /// Get the default settle delay.
    pub fn settle_delay(&self) -> Duration {
        self.config.settle_delay
    }

    /// Get a reference to the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get a mutable reference to the transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Close the underlying transport.
    pub async fn close(&mut self) -> Result<()> {
        self.transport.close().await
    }
}
