//! String parsing and pretty-printing utilities

use crate::config::{BinaryPrefix, TemperatureUnit};

/// Extract value after a colon and space
pub fn extract_after_colon(line: &str) -> Option<String> {
    line.split_once(':')
        .map(|(_, value)| value.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Human readable byte size, honoring the prefix family and digit settings
pub fn format_size(bytes: u64, prefix: BinaryPrefix, ndigits: u8, max_prefix: u8) -> String {
    let (base, units): (f64, [&str; 9]) = match prefix {
        BinaryPrefix::Iec => (1024.0, ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB", "ZiB", "YiB"]),
        BinaryPrefix::Si => (1000.0, ["B", "kB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"]),
        BinaryPrefix::Jedec => (1024.0, ["B", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"]),
    };

    let max_prefix = usize::from(max_prefix).min(units.len() - 1);
    let mut value = bytes as f64;
    let mut counter = 0;
    while value >= base && counter < max_prefix {
        value /= base;
        counter += 1;
    }

    if counter == 0 {
        format!("{} {}", bytes, units[0])
    } else {
        format!("{:.*} {}", usize::from(ndigits), value, units[counter])
    }
}

pub fn format_percent(percent: f64, ndigits: u8) -> String {
    format!("{:.*}%", usize::from(ndigits), percent)
}

pub fn format_temperature(celsius: f64, unit: TemperatureUnit, ndigits: u8) -> String {
    let ndigits = usize::from(ndigits);
    match unit {
        TemperatureUnit::Celsius => format!("{:.*}°C", ndigits, celsius),
        TemperatureUnit::Fahrenheit => format!("{:.*}°F", ndigits, celsius * 1.8 + 32.0),
        TemperatureUnit::Kelvin => format!("{:.*} K", ndigits, celsius + 273.15),
    }
}

/// Uptime split into calendar-ish components
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UptimeParts {
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub milliseconds: u32,
}

pub fn split_uptime(uptime_ms: u64) -> UptimeParts {
    let mut rest = uptime_ms;
    let milliseconds = (rest % 1000) as u32;
    rest /= 1000;
    let seconds = (rest % 60) as u32;
    rest /= 60;
    let minutes = (rest % 60) as u32;
    rest /= 60;
    let hours = (rest % 24) as u32;
    rest /= 24;

    UptimeParts {
        days: rest as u32,
        hours,
        minutes,
        seconds,
        milliseconds,
    }
}

/// Format uptime the long way: `1 day, 2 hours, 3 mins`
pub fn format_uptime(uptime_ms: u64) -> String {
    let parts = split_uptime(uptime_ms);

    if parts.days == 0 && parts.hours == 0 && parts.minutes == 0 {
        return format!("{} seconds", parts.seconds);
    }

    let mut segments = Vec::with_capacity(3);
    if parts.days > 0 {
        let mut day = format!("{} day{}", parts.days, plural(parts.days));
        if parts.days >= 100 {
            day.push_str("(!)");
        }
        segments.push(day);
    }
    if parts.hours > 0 {
        segments.push(format!("{} hour{}", parts.hours, plural(parts.hours)));
    }
    if parts.minutes > 0 {
        segments.push(format!("{} min{}", parts.minutes, plural(parts.minutes)));
    }
    segments.join(", ")
}

fn plural(n: u32) -> &'static str {
    if n > 1 {
        "s"
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_follow_prefix_family() {
        assert_eq!(format_size(512, BinaryPrefix::Iec, 2, 8), "512 B");
        assert_eq!(format_size(1536, BinaryPrefix::Iec, 2, 8), "1.50 KiB");
        assert_eq!(format_size(1_500_000, BinaryPrefix::Si, 1, 8), "1.5 MB");
        assert_eq!(format_size(1024 * 1024 * 1024, BinaryPrefix::Jedec, 0, 8), "1 GB");
    }

    #[test]
    fn max_prefix_caps_the_unit() {
        assert_eq!(format_size(4 * 1024 * 1024 * 1024, BinaryPrefix::Iec, 0, 2), "4096 MiB");
    }

    #[test]
    fn uptime_prose() {
        assert_eq!(format_uptime(42_000), "42 seconds");
        assert_eq!(format_uptime(90_000_000), "1 day, 1 hour");
        assert_eq!(format_uptime((2 * 3600 + 5 * 60) * 1000), "2 hours, 5 mins");
        assert_eq!(format_uptime(100 * 86_400_000), "100 days(!)");
    }

    #[test]
    fn uptime_components() {
        let parts = split_uptime(90_061_001);
        assert_eq!(parts.days, 1);
        assert_eq!(parts.hours, 1);
        assert_eq!(parts.minutes, 1);
        assert_eq!(parts.seconds, 1);
        assert_eq!(parts.milliseconds, 1);
    }

    #[test]
    fn temperatures_convert() {
        assert_eq!(format_temperature(50.0, TemperatureUnit::Celsius, 1), "50.0°C");
        assert_eq!(format_temperature(100.0, TemperatureUnit::Fahrenheit, 0), "212°F");
        assert_eq!(format_temperature(0.0, TemperatureUnit::Kelvin, 2), "273.15 K");
    }

    #[test]
    fn colon_values() {
        assert_eq!(extract_after_colon("model name\t: Ryzen"), Some("Ryzen".into()));
        assert_eq!(extract_after_colon("flags:"), None);
    }
}
