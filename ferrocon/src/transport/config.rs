//! Serial link configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{DriverError, Result};

/// Parity setting for the serial link.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    #[default]
    None,
    Even,
    Odd,
}

/// Flow control setting for the serial link.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowControl {
    #[default]
    None,
    Software,
    Hardware,
}

/// Serial link configuration.
///
/// Defaults match a typical appliance console: 9600 baud, 8 data bits,
/// no parity, one stop bit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Device path (e.g. `/dev/ttyUSB0` or `COM3`).
    pub port: String,

    /// Baud rate.
    pub baud_rate: u32,

    /// Data bits (5-8).
    pub data_bits: u8,

    /// Parity.
    pub parity: Parity,

    /// Stop bits (1 or 2).
    pub stop_bits: u8,

    /// Flow control.
    pub flow_control: FlowControl,

    /// Driver-level read/write timeout in milliseconds.
    pub timeout_ms: u64,
}

impl SerialConfig {
    /// Create a config for the given port with default framing.
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            ..Self::default()
        }
    }

    /// Set the baud rate.
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Driver-level timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Build a `serialport` builder, validating the framing parameters.
    pub fn port_builder(&self) -> Result<serialport::SerialPortBuilder> {
        let data_bits = match self.data_bits {
            5 => serialport::DataBits::Five,
            6 => serialport::DataBits::Six,
            7 => serialport::DataBits::Seven,
            8 => serialport::DataBits::Eight,
            other => return Err(invalid(format!("invalid data bits: {other}"))),
        };

        let stop_bits = match self.stop_bits {
            1 => serialport::StopBits::One,
            2 => serialport::StopBits::Two,
            other => return Err(invalid(format!("invalid stop bits: {other}"))),
        };

        let parity = match self.parity {
            Parity::None => serialport::Parity::None,
            Parity::Even => serialport::Parity::Even,
            Parity::Odd => serialport::Parity::Odd,
        };

        let flow_control = match self.flow_control {
            FlowControl::None => serialport::FlowControl::None,
            FlowControl::Software => serialport::FlowControl::Software,
            FlowControl::Hardware => serialport::FlowControl::Hardware,
        };

        if self.port.is_empty() {
            return Err(invalid("serial port path is empty".to_string()));
        }

        Ok(serialport::new(&self.port, self.baud_rate)
            .data_bits(data_bits)
            .stop_bits(stop_bits)
            .parity(parity)
            .flow_control(flow_control)
            .timeout(self.timeout()))
    }
}

fn invalid(message: String) -> crate::error::Error {
    DriverError::InvalidConfig { message }.into()
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: String::new(),
            baud_rate: 9600,
            data_bits: 8,
            parity: Parity::None,
            stop_bits: 1,
            flow_control: FlowControl::None,
            timeout_ms: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SerialConfig::new("/dev/ttyUSB0");
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.data_bits, 8);
        assert_eq!(config.parity, Parity::None);
        assert_eq!(config.stop_bits, 1);
        assert_eq!(config.timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_port_builder_validates_framing() {
        let mut config = SerialConfig::new("/dev/ttyUSB0");
        assert!(config.port_builder().is_ok());

        config.data_bits = 9;
        assert!(config.port_builder().is_err());

        config.data_bits = 8;
        config.stop_bits = 3;
        assert!(config.port_builder().is_err());
    }

    #[test]
    fn test_empty_port_rejected() {
        assert!(SerialConfig::default().port_builder().is_err());
    }
}
