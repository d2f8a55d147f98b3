use thiserror::Error;

/// BoardCom unified error type
#[derive(Error, Debug)]
pub enum BoardComError {
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Device not connected")]
    NotConnected,

    #[error("Device unresponsive after {attempts} attempts")]
    Unresponsive { attempts: u32 },

    #[error("Invalid data format: {0}")]
    InvalidData(String),

    #[error("Communication error: {message}")]
    Communication { message: String },

    #[error("Output error: {0}")]
    Output(String),
}

pub type BoardComResult<T> = Result<T, BoardComError>;
