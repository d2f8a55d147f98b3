use crate::cli::args::{Args, Command};
use crate::cli::output::{ConsoleWriter, OutputWriter};
use crate::core::console::{ConsoleSession, ConsoleTiming};
use crate::domain::config::BoardComConfig;
use crate::domain::device::{DeviceInfo, ProbedDevice};
use crate::domain::error::{BoardComError, BoardComResult};
use crate::infrastructure::config::ConfigManager;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::serial::{list_console_ports, SerialTransport};
use std::path::Path;
use tracing::info;

/// Execute CLI command
pub fn execute_command(args: Args) -> BoardComResult<()> {
    let writer = ConsoleWriter::new(args.output.clone());

    let config_manager = ConfigManager::new()?;
    let config = if let Some(config_path) = &args.config {
        config_manager.load_config_from_path(Path::new(config_path))?
    } else {
        config_manager.load_config()?
    };

    if !args.quiet {
        init_logging(&config.global.log_level, args.verbose).map_err(|e| {
            BoardComError::Config {
                message: format!("Failed to initialize logging: {}", e),
            }
        })?;
    }

    match args.command {
        Command::List { all } => execute_list(all, &writer, &config),
        Command::Ports { all } => {
            let vendor_filter = if all { None } else { Some(config.global.vendor_id) };
            let ports = list_console_ports(vendor_filter)?;
            writer.write_ports(&ports)?;
            Ok(())
        }
        Command::Info(port_args) => {
            let mut session = open_session(&port_args.port, &config)?;
            let info = session.get_info();
            session.disconnect();
            writer.write_device_info(&info)?;
            Ok(())
        }
        Command::Slaves(port_args) => {
            let mut session = open_session(&port_args.port, &config)?;
            let slaves = session.get_slaves();
            session.disconnect();
            writer.write_slaves(&slaves)?;
            Ok(())
        }
        Command::GetId(port_args) => {
            let mut session = open_session(&port_args.port, &config)?;
            let result = session.device_id();
            session.disconnect();
            writer.write_device_id(result?)?;
            Ok(())
        }
        Command::SetId { port, id } => {
            let mut session = open_session(&port.port, &config)?;
            let result = session.set_device_id(id);
            session.disconnect();
            result?;
            writer.write_message(&format!("Device id set to {}", id))?;
            Ok(())
        }
        Command::LogLevel { port, level } => {
            let mut session = open_session(&port.port, &config)?;
            let result = session.set_log_level(&level);
            session.disconnect();
            result?;
            writer.write_message(&format!("Console log level set to {}", level))?;
            Ok(())
        }
        Command::Program {
            port,
            board_type,
            sn,
        } => {
            let mut session = open_session(&port.port, &config)?;
            let result = session.enter_program_mode(&board_type, &sn);
            session.disconnect();
            result?;
            writer.write_message(&format!("Sub-device {} {} is in program mode", board_type, sn))?;
            Ok(())
        }
        Command::Send {
            port,
            command,
            no_reply,
        } => {
            let mut session = open_session(&port.port, &config)?;
            let result = if no_reply {
                session.send_msg(&command).map(|_| String::new())
            } else {
                session.send_msg_with_return(&command)
            };
            session.disconnect();
            let response = result?;
            if no_reply {
                writer.write_message("Command accepted")?;
            } else {
                writer.write_response(&response)?;
            }
            Ok(())
        }
        Command::Version => {
            writer.write_message(&format!("boardcom {}", env!("CARGO_PKG_VERSION")))?;
            Ok(())
        }
    }
}

/// Probe every matching port: best effort, one record per port, undefined
/// fields when a board does not answer.
fn execute_list(
    all: bool,
    writer: &ConsoleWriter,
    config: &BoardComConfig,
) -> BoardComResult<()> {
    let vendor_filter = if all { None } else { Some(config.global.vendor_id) };
    let ports = list_console_ports(vendor_filter)?;
    info!(count = ports.len(), "probing candidate ports");

    let mut devices = Vec::with_capacity(ports.len());
    for port in &ports {
        let mut session = build_session(&port.name, config);
        let info = if session.connect() {
            let info = session.get_info();
            session.disconnect();
            info
        } else {
            DeviceInfo::default()
        };
        devices.push(ProbedDevice {
            port: port.name.clone(),
            info,
        });
    }

    writer.write_probes(&devices)?;
    Ok(())
}

fn build_session(port: &str, config: &BoardComConfig) -> ConsoleSession<SerialTransport> {
    let transport = SerialTransport::new(port, &config.serial);
    ConsoleSession::with_timing(transport, ConsoleTiming::from(&config.protocol))
}

/// Build a session and establish the console, failing loudly when the
/// board does not answer.
fn open_session(
    port: &str,
    config: &BoardComConfig,
) -> BoardComResult<ConsoleSession<SerialTransport>> {
    let mut session = build_session(port, config);
    if !session.connect() {
        return Err(BoardComError::Communication {
            message: format!("Failed to connect to the console on {}", port),
        });
    }
    Ok(session)
}
