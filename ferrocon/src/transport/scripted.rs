//! Scripted transport that replays canned device output.
//!
//! Each call to `read_available` consumes one step of the script, which makes
//! console exchanges deterministic for tests and dry runs.

use std::collections::VecDeque;
use std::io;

use bytes::Bytes;

use super::Transport;
use crate::error::{Result, TransportError};

/// One step of a transport script.
#[derive(Debug, Clone)]
pub enum ScriptStep {
    /// Bytes returned by the next read.
    Output(Bytes),

    /// The next read fails with an I/O error of this kind.
    Fault(io::ErrorKind),
}

/// In-memory transport driven by a script of reads.
///
/// Once the script runs out, reads return nothing.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: VecDeque<ScriptStep>,
    written: Vec<String>,
    reads: usize,
    closed: bool,
    close_fault: Option<io::ErrorKind>,
}

impl ScriptedTransport {
    /// Create a transport that returns `outputs` on successive reads.
    pub fn new<I, S>(outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut transport = Self::default();
        for output in outputs {
            transport = transport.then_output(output);
        }
        transport
    }

    /// Append an output step.
    pub fn then_output(mut self, output: impl Into<String>) -> Self {
        self.script
            .push_back(ScriptStep::Output(Bytes::from(output.into())));
        self
    }

    /// Append a read fault.
    pub fn then_fault(mut self, kind: io::ErrorKind) -> Self {
        self.script.push_back(ScriptStep::Fault(kind));
        self
    }

    /// Make `close` fail with an I/O error of this kind.
    pub fn with_close_fault(mut self, kind: io::ErrorKind) -> Self {
        self.close_fault = Some(kind);
        self
    }

    /// Lines written so far, without their terminators.
    pub fn written(&self) -> &[String] {
        &self.written
    }

    /// Number of reads performed.
    pub fn reads(&self) -> usize {
        self.reads
    }

    /// Steps not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    /// Whether `close` was called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Transport for ScriptedTransport {
    async fn write(&mut self, data: &[u8]) -> Result<()> {
        if self.closed {
            return Err(TransportError::Closed.into());
        }
        let line = String::from_utf8_lossy(data);
        self.written
            .push(line.trim_end_matches(['\r', '\n']).to_string());
        Ok(())
    }

    async fn read_available(&mut self) -> Result<Bytes> {
        if self.closed {
            return Err(TransportError::Closed.into());
        }
        self.reads += 1;
        match self.script.pop_front() {
            Some(ScriptStep::Output(data)) => Ok(data),
            Some(ScriptStep::Fault(kind)) => {
                Err(TransportError::Io(io::Error::new(kind, "scripted fault")).into())
            }
            None => Ok(Bytes::new()),
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.closed = true;
        match self.close_fault {
            Some(kind) => Err(TransportError::Io(io::Error::new(kind, "scripted close fault")).into()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_follow_script() {
        let mut transport = ScriptedTransport::new(["first", "second"]);

        assert_eq!(transport.read_available().await.unwrap(), "first");
        assert_eq!(transport.read_available().await.unwrap(), "second");
        assert!(transport.read_available().await.unwrap().is_empty());
        assert_eq!(transport.reads(), 3);
    }

    #[tokio::test]
    async fn test_records_written_lines() {
        let mut transport = ScriptedTransport::default();
        transport.write(b"show version\n").await.unwrap();
        transport.write(b"\r\n").await.unwrap();

        assert_eq!(transport.written(), ["show version", ""]);
    }

    #[tokio::test]
    async fn test_fault_step() {
        let mut transport = ScriptedTransport::default().then_fault(io::ErrorKind::BrokenPipe);
        let err = transport.read_available().await.unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Transport(TransportError::Io(_))
        ));
    }

    #[tokio::test]
    async fn test_closed_transport_rejects_io() {
        let mut transport = ScriptedTransport::new(["data"]);
        transport.close().await.unwrap();

        assert!(transport.is_closed());
        assert!(transport.read_available().await.is_err());
        assert!(transport.write(b"x\n").await.is_err());
    }
}
