use crate::cli::args::OutputFormat;
use crate::domain::device::{DeviceInfo, ProbedDevice};
use crate::infrastructure::serial::PortDescriptor;
use std::io;
use tabled::{Table, Tabled};

/// Output writer trait for different formats
pub trait OutputWriter {
    fn write_ports(&self, ports: &[PortDescriptor]) -> Result<(), OutputError>;
    fn write_probes(&self, devices: &[ProbedDevice]) -> Result<(), OutputError>;
    fn write_device_info(&self, info: &DeviceInfo) -> Result<(), OutputError>;
    fn write_slaves(&self, slaves: &[DeviceInfo]) -> Result<(), OutputError>;
    fn write_device_id(&self, id: i64) -> Result<(), OutputError>;
    fn write_response(&self, response: &str) -> Result<(), OutputError>;
    fn write_message(&self, message: &str) -> Result<(), OutputError>;
    fn write_error(&self, error: &str) -> Result<(), OutputError>;
}

/// Output formatting errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl From<OutputError> for crate::domain::error::BoardComError {
    fn from(err: OutputError) -> Self {
        Self::Output(err.to_string())
    }
}

/// Console output writer
pub struct ConsoleWriter {
    format: OutputFormat,
}

impl ConsoleWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

#[derive(Tabled)]
struct PortRow {
    #[tabled(rename = "Port")]
    name: String,
    #[tabled(rename = "VID")]
    vendor_id: String,
    #[tabled(rename = "PID")]
    product_id: String,
    #[tabled(rename = "Product")]
    product: String,
}

impl From<&PortDescriptor> for PortRow {
    fn from(port: &PortDescriptor) -> Self {
        let hex = |id: Option<u16>| match id {
            Some(id) => format!("{:04x}", id),
            None => "-".to_string(),
        };
        Self {
            name: port.name.clone(),
            vendor_id: hex(port.vendor_id),
            product_id: hex(port.product_id),
            product: port.product.clone().unwrap_or_else(|| "-".to_string()),
        }
    }
}

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Port")]
    port: String,
    #[tabled(rename = "Type")]
    board_type: String,
    #[tabled(rename = "Serial")]
    serial_num: String,
    #[tabled(rename = "Hardware")]
    hardware_var: String,
    #[tabled(rename = "Firmware")]
    version_fw: String,
}

impl DeviceRow {
    fn new(port: &str, info: &DeviceInfo) -> Self {
        Self {
            port: port.to_string(),
            board_type: info.board_type.clone(),
            serial_num: info.serial_num.clone(),
            hardware_var: info.hardware_var.clone(),
            version_fw: info.version_fw.clone(),
        }
    }
}

fn print_device_text(info: &DeviceInfo) {
    println!("  Type: {}", info.board_type);
    println!("  Serial number: {}", info.serial_num);
    println!("  Hardware variant: {}", info.hardware_var);
    println!("  Firmware version: {}", info.version_fw);
}

impl OutputWriter for ConsoleWriter {
    fn write_ports(&self, ports: &[PortDescriptor]) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Text => {
                for port in ports {
                    match (&port.vendor_id, &port.product) {
                        (Some(vid), Some(product)) => {
                            println!("{} ({:04x}, {})", port.name, vid, product)
                        }
                        _ => println!("{}", port.name),
                    }
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(ports)?);
            }
            OutputFormat::Table => {
                if !ports.is_empty() {
                    let rows: Vec<PortRow> = ports.iter().map(PortRow::from).collect();
                    println!("{}", Table::new(rows));
                }
            }
        }
        Ok(())
    }

    fn write_probes(&self, devices: &[ProbedDevice]) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Text => {
                for device in devices {
                    println!("{}:", device.port);
                    print_device_text(&device.info);
                }
            }
            OutputFormat::Json => {
                let output = serde_json::json!({ "devices": devices });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                if !devices.is_empty() {
                    let rows: Vec<DeviceRow> = devices
                        .iter()
                        .map(|d| DeviceRow::new(&d.port, &d.info))
                        .collect();
                    println!("{}", Table::new(rows));
                }
            }
        }
        Ok(())
    }

    fn write_device_info(&self, info: &DeviceInfo) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Text => print_device_text(info),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(info)?),
            OutputFormat::Table => {
                println!("{}", Table::new(vec![DeviceRow::new("-", info)]));
            }
        }
        Ok(())
    }

    fn write_slaves(&self, slaves: &[DeviceInfo]) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Text => {
                if slaves.is_empty() {
                    println!("No sub-devices found");
                }
                for (index, slave) in slaves.iter().enumerate() {
                    println!("Sub-device {}:", index);
                    print_device_text(slave);
                }
            }
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(slaves)?),
            OutputFormat::Table => {
                if !slaves.is_empty() {
                    let rows: Vec<DeviceRow> = slaves
                        .iter()
                        .enumerate()
                        .map(|(index, slave)| DeviceRow::new(&index.to_string(), slave))
                        .collect();
                    println!("{}", Table::new(rows));
                }
            }
        }
        Ok(())
    }

    fn write_device_id(&self, id: i64) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::json!({ "id": id }));
            }
            _ => println!("{}", id),
        }
        Ok(())
    }

    fn write_response(&self, response: &str) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::json!({ "response": response }));
            }
            _ => println!("{}", response),
        }
        Ok(())
    }

    fn write_message(&self, message: &str) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::json!({ "message": message }));
            }
            _ => println!("{}", message),
        }
        Ok(())
    }

    fn write_error(&self, error: &str) -> Result<(), OutputError> {
        eprintln!("Error: {}", error);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_row_formats_ids_as_hex() {
        let port = PortDescriptor {
            name: "/dev/ttyUSB0".to_string(),
            vendor_id: Some(0x10c4),
            product_id: Some(0xea60),
            usb_serial: None,
            product: None,
        };
        let row = PortRow::from(&port);
        assert_eq!(row.vendor_id, "10c4");
        assert_eq!(row.product_id, "ea60");
        assert_eq!(row.product, "-");
    }

    #[test]
    fn test_writers_do_not_error() {
        let writer = ConsoleWriter::new(OutputFormat::Json);
        assert!(writer.write_device_info(&DeviceInfo::default()).is_ok());
        assert!(writer.write_slaves(&[]).is_ok());
        assert!(writer.write_device_id(7).is_ok());
        assert!(writer.write_message("done").is_ok());
    }
}
