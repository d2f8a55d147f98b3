use serde::{Deserialize, Serialize};

/// Sentinel value for fields whose query did not succeed
pub const UNDEFINED: &str = "undefined";

/// Device identity record assembled from up to four independent
/// `get-board-info` (or `get-slave-info`) queries. Each field defaults to
/// the `"undefined"` sentinel and is populated only when its query succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Board type
    #[serde(rename = "type")]
    pub board_type: String,
    /// Board serial number
    #[serde(rename = "serialNum")]
    pub serial_num: String,
    /// Hardware variant
    #[serde(rename = "hardwareVar")]
    pub hardware_var: String,
    /// Firmware version
    #[serde(rename = "versionFw")]
    pub version_fw: String,
}

impl Default for DeviceInfo {
    fn default() -> Self {
        Self {
            board_type: UNDEFINED.to_string(),
            serial_num: UNDEFINED.to_string(),
            hardware_var: UNDEFINED.to_string(),
            version_fw: UNDEFINED.to_string(),
        }
    }
}

/// Transient sub-device address descriptor returned by `discover-slaves`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlaveDescriptor {
    /// Sub-device board type
    #[serde(rename = "type")]
    pub board_type: String,
    /// Sub-device serial number, string or integer depending on firmware
    pub sn: SlaveId,
}

/// Serial number as returned by the discovery command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlaveId {
    Number(u64),
    Text(String),
}

impl std::fmt::Display for SlaveId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlaveId::Number(n) => write!(f, "{}", n),
            SlaveId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Device info attached to the port it was probed on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbedDevice {
    /// Serial port path
    pub port: String,
    /// Identity record, all-undefined when the probe failed
    #[serde(flatten)]
    pub info: DeviceInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_info_defaults_to_sentinel() {
        let info = DeviceInfo::default();
        assert_eq!(info.board_type, UNDEFINED);
        assert_eq!(info.serial_num, UNDEFINED);
        assert_eq!(info.hardware_var, UNDEFINED);
        assert_eq!(info.version_fw, UNDEFINED);
    }

    #[test]
    fn test_device_info_json_keys() {
        let info = DeviceInfo {
            board_type: "CoreBoard".to_string(),
            serial_num: "0000008".to_string(),
            hardware_var: "AD01".to_string(),
            version_fw: "1.0.1".to_string(),
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["type"], "CoreBoard");
        assert_eq!(json["serialNum"], "0000008");
        assert_eq!(json["hardwareVar"], "AD01");
        assert_eq!(json["versionFw"], "1.0.1");
    }

    #[test]
    fn test_slave_descriptor_integer_sn() {
        let list: Vec<SlaveDescriptor> =
            serde_json::from_str(r#"[{"type":"StepperBoard","sn":1}]"#).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].board_type, "StepperBoard");
        assert_eq!(list[0].sn, SlaveId::Number(1));
        assert_eq!(list[0].sn.to_string(), "1");
    }

    #[test]
    fn test_slave_descriptor_string_sn() {
        let list: Vec<SlaveDescriptor> =
            serde_json::from_str(r#"[{"type":"DiscreteBoard","sn":"0000010"}]"#).unwrap();
        assert_eq!(list[0].sn, SlaveId::Text("0000010".to_string()));
        assert_eq!(list[0].sn.to_string(), "0000010");
    }

    #[test]
    fn test_probed_device_flattens_info() {
        let probed = ProbedDevice {
            port: "/dev/ttyUSB0".to_string(),
            info: DeviceInfo::default(),
        };
        let json = serde_json::to_value(&probed).unwrap();
        assert_eq!(json["port"], "/dev/ttyUSB0");
        assert_eq!(json["type"], UNDEFINED);
    }
}
