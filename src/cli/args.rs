use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};

/// Command line arguments for BoardCom
#[derive(Parser, Debug)]
#[command(
    name = "boardcom",
    version = env!("CARGO_PKG_VERSION"),
    about = "Serial console client for embedded device boards",
    long_about = "Talks to board firmware over its interactive serial console: device \
                  discovery, identity management, sub-device enumeration and raw console \
                  commands, with text, JSON or table output."
)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress log output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    pub output: OutputFormat,

    /// Command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Probe every matching port and report the connected boards
    List {
        /// Probe all serial ports, not just the configured USB vendor
        #[arg(short, long)]
        all: bool,
    },
    /// Enumerate serial ports without connecting to them
    Ports {
        /// Include ports that do not match the configured USB vendor
        #[arg(short, long)]
        all: bool,
    },
    /// Query the identity of the board on a port
    Info(PortArgs),
    /// Discover the sub-devices behind the board on a port
    Slaves(PortArgs),
    /// Read the board id
    GetId(PortArgs),
    /// Write the board id and verify it
    SetId {
        #[command(flatten)]
        port: PortArgs,
        /// Id to assign
        id: i64,
    },
    /// Set the verbosity of the board-side console logger
    LogLevel {
        #[command(flatten)]
        port: PortArgs,
        /// Level understood by the firmware (e.g. none, error, info, debug)
        level: String,
    },
    /// Put a sub-device into program mode for an external flashing tool
    Program {
        #[command(flatten)]
        port: PortArgs,
        /// Sub-device board type
        board_type: String,
        /// Sub-device serial number
        sn: String,
    },
    /// Send a raw console command
    Send {
        #[command(flatten)]
        port: PortArgs,
        /// Command line to send, without terminator
        command: String,
        /// Only confirm the echo, do not wait for a response line
        #[arg(long)]
        no_reply: bool,
    },
    /// Display version information
    Version,
}

/// Target port selection
#[derive(ClapArgs, Debug)]
pub struct PortArgs {
    /// Serial port path (e.g. /dev/ttyUSB0, COM8)
    #[arg(short, long)]
    pub port: String,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output
    Json,
    /// Table output
    Table,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Text
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Table => write!(f, "table"),
        }
    }
}
