use crate::domain::error::{BoardComError, BoardComResult};
use serde::{Deserialize, Serialize};
use serialport::{SerialPortInfo, SerialPortType};
use tracing::debug;

/// Enumerated serial port, with USB metadata when available
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortDescriptor {
    /// Port path (e.g. `/dev/ttyUSB0`, `COM8`)
    pub name: String,
    /// USB vendor id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<u16>,
    /// USB product id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<u16>,
    /// USB serial number string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usb_serial: Option<String>,
    /// USB product string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
}

impl From<&SerialPortInfo> for PortDescriptor {
    fn from(info: &SerialPortInfo) -> Self {
        let (vendor_id, product_id, usb_serial, product) = match &info.port_type {
            SerialPortType::UsbPort(usb) => (
                Some(usb.vid),
                Some(usb.pid),
                usb.serial_number.clone(),
                usb.product.clone(),
            ),
            _ => (None, None, None, None),
        };
        Self {
            name: info.port_name.clone(),
            vendor_id,
            product_id,
            usb_serial,
            product,
        }
    }
}

/// Enumerate serial ports. With `vendor_id` set, only USB ports carrying
/// that vendor id (the USB-UART bridge the boards ship with) are returned;
/// with `None`, every port is.
pub fn list_console_ports(vendor_id: Option<u16>) -> BoardComResult<Vec<PortDescriptor>> {
    let ports = serialport::available_ports().map_err(|e| BoardComError::Communication {
        message: format!("Failed to list serial ports: {}", e),
    })?;
    let descriptors: Vec<PortDescriptor> = ports
        .iter()
        .map(PortDescriptor::from)
        .filter(|port| match vendor_id {
            Some(vid) => port.vendor_id == Some(vid),
            None => true,
        })
        .collect();
    debug!(count = descriptors.len(), "serial ports enumerated");
    Ok(descriptors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serialport::{SerialPortType, UsbPortInfo};

    fn usb_port(name: &str, vid: u16) -> SerialPortInfo {
        SerialPortInfo {
            port_name: name.to_string(),
            port_type: SerialPortType::UsbPort(UsbPortInfo {
                vid,
                pid: 0xea60,
                serial_number: Some("0001".to_string()),
                manufacturer: Some("Silicon Labs".to_string()),
                product: Some("CP2102N USB to UART Bridge Controller".to_string()),
            }),
        }
    }

    #[test]
    fn test_descriptor_from_usb_port() {
        let descriptor = PortDescriptor::from(&usb_port("/dev/ttyUSB0", 0x10c4));
        assert_eq!(descriptor.name, "/dev/ttyUSB0");
        assert_eq!(descriptor.vendor_id, Some(0x10c4));
        assert_eq!(descriptor.product_id, Some(0xea60));
        assert_eq!(descriptor.usb_serial.as_deref(), Some("0001"));
    }

    #[test]
    fn test_descriptor_from_non_usb_port() {
        let info = SerialPortInfo {
            port_name: "/dev/ttyS0".to_string(),
            port_type: SerialPortType::Unknown,
        };
        let descriptor = PortDescriptor::from(&info);
        assert_eq!(descriptor.name, "/dev/ttyS0");
        assert_eq!(descriptor.vendor_id, None);
        assert_eq!(descriptor.product, None);
    }

    #[test]
    fn test_list_console_ports_does_not_error() {
        // Whatever the host has, enumeration itself should succeed.
        let result = list_console_ports(Some(0x10c4));
        assert!(result.is_ok());
    }
}
