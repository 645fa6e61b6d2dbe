//! Operating system and session facts

use serde::Serialize;

/// Who is logged in where; feeds the Title module
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleInfo {
    pub user_name: String,
    pub host_name: String,
    /// Host name with its domain, when one is configured
    pub fqdn: String,
    pub home_dir: String,
    pub exe_path: String,
    pub user_shell: String,
}

/// Parsed os-release
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OsInfo {
    pub name: String,
    pub pretty_name: String,
    pub id: String,
    pub id_like: String,
    pub version: String,
    pub version_id: String,
    pub codename: String,
    pub architecture: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KernelInfo {
    pub name: String,
    pub release: String,
    pub version: String,
    pub architecture: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UptimeInfo {
    /// Milliseconds since boot
    pub uptime: u64,
    /// Boot time, milliseconds since the Unix epoch
    pub boot_time: u64,
}

/// Installed package counts per manager
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageInfo {
    pub pacman: u32,
    pub dpkg: u32,
    pub rpm: u32,
    pub xbps: u32,
    pub emerge: u32,
    pub nix: u32,
    pub flatpak: u32,
}

impl PackageInfo {
    pub fn all(&self) -> u32 {
        self.pacman + self.dpkg + self.rpm + self.xbps + self.emerge + self.nix + self.flatpak
    }

    /// Non-zero counts with their manager names, in display order
    pub fn counts(&self) -> Vec<(&'static str, u32)> {
        [
            ("pacman", self.pacman),
            ("dpkg", self.dpkg),
            ("rpm", self.rpm),
            ("xbps", self.xbps),
            ("emerge", self.emerge),
            ("nix", self.nix),
            ("flatpak", self.flatpak),
        ]
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellInfo {
    pub process_name: String,
    pub exe: String,
    pub pretty_name: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminalInfo {
    pub process_name: String,
    pub pretty_name: String,
}

/// Font configured in the terminal emulator
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminalFontInfo {
    pub name: String,
    /// Point size as the terminal stores it
    pub size: String,
    pub pretty: String,
}

impl TerminalFontInfo {
    pub fn new(name: &str, size: &str) -> Self {
        let name = name.trim().trim_matches(|c| c == '"' || c == '\'');
        let size = size.trim();
        let pretty = if size.is_empty() {
            name.to_string()
        } else {
            format!("{} ({}pt)", name, size)
        };
        TerminalFontInfo {
            name: name.to_string(),
            size: size.to_string(),
            pretty,
        }
    }
}

/// One login session from utmp
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub name: String,
    /// Remote host, empty for local logins
    pub host_name: String,
    pub tty: String,
    /// Milliseconds since the Unix epoch
    pub login_time: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorInfo {
    pub name: String,
    pub path: String,
}

/// Window manager or desktop session
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WmInfo {
    pub process_name: String,
    pub pretty_name: String,
    /// `Wayland`, `X11` or `TTY`
    pub protocol_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitSystemInfo {
    pub name: String,
    pub exe: String,
    pub pid: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_counts_skip_empty_managers() {
        let packages = PackageInfo {
            pacman: 900,
            flatpak: 12,
            ..PackageInfo::default()
        };
        assert_eq!(packages.all(), 912);
        assert_eq!(packages.counts(), vec![("pacman", 900), ("flatpak", 12)]);
    }

    #[test]
    fn serializes_camel_case() {
        let uptime = UptimeInfo {
            uptime: 5,
            boot_time: 7,
        };
        assert_eq!(
            serde_json::to_value(uptime).unwrap(),
            serde_json::json!({"uptime": 5, "bootTime": 7})
        );
    }

    #[test]
    fn font_pretty_name_includes_the_size() {
        assert_eq!(TerminalFontInfo::new(" \"Fira Code\" ", "11").pretty, "Fira Code (11pt)");
        assert_eq!(TerminalFontInfo::new("monospace", "").pretty, "monospace");
    }
}
