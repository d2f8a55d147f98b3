// Infrastructure module - External dependencies and adapters
pub mod config;
pub mod logging;
pub mod serial;

pub use config::ConfigManager;
pub use serial::{list_console_ports, PortDescriptor, SerialTransport};
