// Core module - Protocol logic
pub mod console;

pub use console::{ConsoleSession, ConsoleTiming, ConsoleTransport};
