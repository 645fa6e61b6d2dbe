//! Hardware facts

use serde::Serialize;

/// DMI product information
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostInfo {
    pub product_family: String,
    pub product_name: String,
    pub product_version: String,
    pub product_sku: String,
    pub sys_vendor: String,
}

/// Firmware information from DMI
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BiosInfo {
    pub date: String,
    pub release: String,
    pub vendor: String,
    pub version: String,
    /// `UEFI` or `BIOS`
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuInfo {
    pub name: String,
    pub vendor: String,
    pub cores_physical: u32,
    pub cores_logical: u32,
    /// Highest advertised frequency in GHz, 0 when unknown
    pub frequency_max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GpuType {
    Integrated,
    Discrete,
    Unknown,
}

impl GpuType {
    pub fn as_str(self) -> &'static str {
        match self {
            GpuType::Integrated => "Integrated",
            GpuType::Discrete => "Discrete",
            GpuType::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GpuInfo {
    pub vendor: String,
    pub name: String,
    #[serde(rename = "type")]
    pub gpu_type: GpuType,
}

/// Used and total bytes of RAM or swap
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryInfo {
    pub used: u64,
    pub total: u64,
}

impl MemoryInfo {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.used as f64 * 100.0 / self.total as f64
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskInfo {
    pub mountpoint: String,
    pub filesystem: String,
    pub bytes_used: u64,
    pub bytes_available: u64,
    pub bytes_total: u64,
}

impl DiskInfo {
    pub fn percent(&self) -> f64 {
        if self.bytes_total == 0 {
            0.0
        } else {
            self.bytes_used as f64 * 100.0 / self.bytes_total as f64
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatteryInfo {
    pub name: String,
    pub manufacturer: String,
    pub model_name: String,
    /// Charge in percent
    pub capacity: f64,
    pub status: String,
    /// Degrees Celsius, when the battery reports it
    pub temperature: Option<f64>,
}

/// A connected monitor
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayInfo {
    /// Connector name, e.g. `eDP-1`
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Hz; 0 when unknown
    pub refresh_rate: f64,
    /// `built-in` or `external`
    #[serde(rename = "type")]
    pub kind: String,
    pub primary: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentages_handle_empty_totals() {
        assert_eq!(MemoryInfo::default().percent(), 0.0);
        let memory = MemoryInfo { used: 1, total: 4 };
        assert_eq!(memory.percent(), 25.0);
        let disk = DiskInfo {
            bytes_used: 3,
            bytes_total: 4,
            ..DiskInfo::default()
        };
        assert_eq!(disk.percent(), 75.0);
    }
}
