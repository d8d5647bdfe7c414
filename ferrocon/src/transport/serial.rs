//! Serial transport using the `serialport` crate.

use std::io::{self, Read, Write};

use bytes::{Bytes, BytesMut};
use log::{debug, info};
use serialport::SerialPort;

use super::Transport;
use super::config::SerialConfig;
use crate::error::{Result, TransportError};

/// List the serial ports present on this machine.
pub fn available_ports() -> Result<Vec<String>> {
    let ports = serialport::available_ports().map_err(TransportError::Serial)?;
    Ok(ports.into_iter().map(|p| p.port_name).collect())
}

/// Console transport over a local serial port.
pub struct SerialTransport {
    /// Open port handle (None once closed).
    port: Option<Box<dyn SerialPort>>,

    /// Device path, kept for logging.
    name: String,
}

impl SerialTransport {
    /// Open the serial port described by `config`.
    pub fn open(config: &SerialConfig) -> Result<Self> {
        let port = config
            .port_builder()?
            .open()
            .map_err(|source| TransportError::OpenFailed {
                port: config.port.clone(),
                source,
            })?;

        info!(
            "Opened serial port {} at {} baud",
            config.port, config.baud_rate
        );

        Ok(Self {
            port: Some(port),
            name: config.port.clone(),
        })
    }

    /// Device path of this transport.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn port_mut(&mut self) -> Result<&mut Box<dyn SerialPort>> {
        Ok(self.port.as_mut().ok_or(TransportError::Closed)?)
    }
}

impl Transport for SerialTransport {
    async fn write(&mut self, data: &[u8]) -> Result<()> {
        let port = self.port_mut()?;
        port.write_all(data).map_err(TransportError::Io)?;
        port.flush().map_err(TransportError::Io)?;
        Ok(())
    }

    async fn read_available(&mut self) -> Result<Bytes> {
        let port = self.port_mut()?;

        let available = port.bytes_to_read().map_err(TransportError::Serial)? as usize;
        if available == 0 {
            return Ok(Bytes::new());
        }

        let mut buf = BytesMut::zeroed(available);
        let n = match port.read(&mut buf) {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::TimedOut => 0,
            Err(e) => return Err(TransportError::Io(e).into()),
        };
        buf.truncate(n);

        Ok(buf.freeze())
    }

    async fn close(&mut self) -> Result<()> {
        if self.port.take().is_some() {
            debug!("Closed serial port {}", self.name);
        }
        Ok(())
    }
}
