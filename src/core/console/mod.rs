// Console module - Device console transaction protocol
pub mod sanitize;
pub mod session;
pub mod transport;

pub use session::{ConsoleSession, ConsoleTiming};
pub use transport::ConsoleTransport;
