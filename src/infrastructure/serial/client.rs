use crate::core::console::ConsoleTransport;
use crate::domain::config::SerialConfig;
use crate::domain::error::{BoardComError, BoardComResult};
use serialport::{ClearBuffer, SerialPort};
use std::io::{Read, Write};
use std::time::Duration;
use tracing::{debug, info};

/// `ConsoleTransport` implementation over a real serial port.
///
/// Bytes read past the last line terminator are buffered internally, so a
/// `read_line` call returns at most one line and blocks for at most one
/// per-read timeout when no full line is buffered yet.
pub struct SerialTransport {
    path: String,
    baud_rate: u32,
    read_timeout: Duration,
    port: Option<Box<dyn SerialPort>>,
    pending: Vec<u8>,
}

impl SerialTransport {
    /// Create a transport for the port at `path` using the configured baud
    /// rate and per-read timeout. The port is not opened until `open`.
    pub fn new(path: &str, config: &SerialConfig) -> Self {
        Self {
            path: path.to_string(),
            baud_rate: config.baud_rate,
            read_timeout: config.read_timeout(),
            pending: Vec::new(),
            port: None,
        }
    }

    /// Port path this transport targets
    pub fn path(&self) -> &str {
        &self.path
    }

    fn port_mut(&mut self) -> BoardComResult<&mut Box<dyn SerialPort>> {
        self.port.as_mut().ok_or(BoardComError::NotConnected)
    }

    /// Pop one full line (terminator included) off the pending buffer
    fn take_line(&mut self) -> Option<Vec<u8>> {
        let end = self.pending.iter().position(|&b| b == b'\n')?;
        let line: Vec<u8> = self.pending.drain(..=end).collect();
        Some(line)
    }
}

impl ConsoleTransport for SerialTransport {
    fn open(&mut self) -> BoardComResult<()> {
        if self.port.is_some() {
            return Ok(());
        }
        let port = serialport::new(&self.path, self.baud_rate)
            .timeout(self.read_timeout)
            .open()?;
        info!(port = %self.path, baud = self.baud_rate, "serial port opened");
        self.port = Some(port);
        Ok(())
    }

    fn close(&mut self) -> BoardComResult<()> {
        if self.port.take().is_some() {
            debug!(port = %self.path, "serial port closed");
        }
        self.pending.clear();
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> BoardComResult<()> {
        let port = self.port_mut()?;
        port.write_all(data)?;
        port.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> BoardComResult<Vec<u8>> {
        if let Some(line) = self.take_line() {
            return Ok(line);
        }
        let port = self.port_mut()?;
        let mut buf = [0u8; 256];
        match port.read(&mut buf) {
            Ok(0) => Ok(Vec::new()),
            Ok(n) => {
                self.pending.extend_from_slice(&buf[..n]);
                Ok(self.take_line().unwrap_or_default())
            }
            Err(ref e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn flush_input(&mut self) -> BoardComResult<()> {
        self.pending.clear();
        self.port_mut()?.clear(ClearBuffer::Input)?;
        Ok(())
    }

    fn set_dtr(&mut self, level: bool) -> BoardComResult<()> {
        self.port_mut()?.write_data_terminal_ready(level)?;
        Ok(())
    }

    fn set_rts(&mut self, level: bool) -> BoardComResult<()> {
        self.port_mut()?.write_request_to_send(level)?;
        Ok(())
    }
}
