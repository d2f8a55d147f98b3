//! BoardCom Library
//!
//! Client for the interactive text console embedded device boards expose
//! over their serial link: session establishment with prompt detection,
//! echo-confirmed commands with bounded retry, response extraction with
//! terminal-noise filtering, and derived device/sub-device discovery.

pub mod cli;
pub mod core;
pub mod domain;
pub mod infrastructure;

pub use crate::core::console::{ConsoleSession, ConsoleTiming, ConsoleTransport};
pub use domain::config::BoardComConfig;
pub use domain::device::{DeviceInfo, ProbedDevice, SlaveDescriptor, SlaveId};
pub use domain::error::{BoardComError, BoardComResult};
pub use infrastructure::serial::{list_console_ports, PortDescriptor, SerialTransport};
