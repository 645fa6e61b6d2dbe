//! Sensors and power supplies (battery, temperature)

use crate::data::BatteryInfo;
use crate::error::{QuickfetchError, Result};
use crate::utils::file::read_first_line;
use std::fs;
use std::path::Path;

/// hwmon drivers that report the CPU package temperature
const CPU_SENSORS: &[&str] = &["k10temp", "coretemp", "zenpower", "cpu_thermal", "fam15h_power"];

/// Every battery under /sys/class/power_supply
pub fn collect_batteries() -> Result<Vec<BatteryInfo>> {
    let mut batteries = Vec::new();
    for entry in fs::read_dir("/sys/class/power_supply")?.flatten() {
        let path = entry.path();
        let is_battery = read_first_line(path.join("type"))
            .map(|kind| kind == "Battery")
            .unwrap_or_else(|_| entry.file_name().to_string_lossy().starts_with("BAT"));
        // Peripheral batteries (mice, headsets) report scope=Device
        let is_device = read_first_line(path.join("scope"))
            .map(|scope| scope == "Device")
            .unwrap_or(false);
        if is_battery && !is_device {
            if let Some(battery) = read_battery(&path) {
                batteries.push(battery);
            }
        }
    }

    if batteries.is_empty() {
        return Err(QuickfetchError::Detection("No batteries found".to_string()));
    }
    batteries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(batteries)
}

fn read_battery(path: &Path) -> Option<BatteryInfo> {
    let capacity: f64 = read_first_line(path.join("capacity")).ok()?.parse().ok()?;
    let read = |file: &str| read_first_line(path.join(file)).unwrap_or_default();
    // Reported in tenths of a degree
    let temperature = read("temp").parse::<f64>().ok().map(|t| t / 10.0);

    Some(BatteryInfo {
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        manufacturer: read("manufacturer"),
        model_name: read("model_name"),
        capacity,
        status: read("status"),
        temperature,
    })
}

/// CPU temperature in degrees Celsius from hwmon
pub fn cpu_temperature() -> Result<f64> {
    for entry in fs::read_dir("/sys/class/hwmon")?.flatten() {
        let path = entry.path();
        let Ok(name) = read_first_line(path.join("name")) else {
            continue;
        };
        if !CPU_SENSORS.contains(&name.as_str()) {
            continue;
        }
        if let Some(celsius) = read_millidegrees(&path.join("temp1_input")) {
            return Ok(celsius);
        }
    }
    Err(QuickfetchError::Detection("No CPU temperature sensor found".to_string()))
}

fn read_millidegrees(path: &Path) -> Option<f64> {
    let raw: f64 = read_first_line(path).ok()?.parse().ok()?;
    Some(raw / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn battery_directory_is_parsed() {
        let dir = TempDir::new().unwrap();
        let bat = dir.path().join("BAT0");
        fs::create_dir(&bat).unwrap();
        fs::write(bat.join("capacity"), "87\n").unwrap();
        fs::write(bat.join("status"), "Discharging\n").unwrap();
        fs::write(bat.join("temp"), "301\n").unwrap();
        fs::write(bat.join("manufacturer"), "ACME\n").unwrap();

        let battery = read_battery(&bat).unwrap();
        assert_eq!(battery.name, "BAT0");
        assert_eq!(battery.capacity, 87.0);
        assert_eq!(battery.status, "Discharging");
        assert_eq!(battery.temperature, Some(30.1));
        assert_eq!(battery.manufacturer, "ACME");
        assert!(battery.model_name.is_empty());
    }

    #[test]
    fn battery_without_capacity_is_skipped() {
        let dir = TempDir::new().unwrap();
        assert!(read_battery(dir.path()).is_none());
    }

    #[test]
    fn millidegrees() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("temp1_input");
        fs::write(&input, "45500\n").unwrap();
        assert_eq!(read_millidegrees(&input), Some(45.5));
    }
}
