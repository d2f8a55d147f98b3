// Serial module - Serial port transport and discovery
pub mod client;
pub mod discovery;

pub use client::SerialTransport;
pub use discovery::{list_console_ports, PortDescriptor};
