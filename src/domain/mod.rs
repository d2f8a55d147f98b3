// Domain module - Core types shared across the crate
pub mod config;
pub mod device;
pub mod error;

pub use config::BoardComConfig;
pub use device::{DeviceInfo, ProbedDevice, SlaveDescriptor, SlaveId};
pub use error::{BoardComError, BoardComResult};
