//! Installed package counts

use crate::data::PackageInfo;
use crate::error::{QuickfetchError, Result};
use crate::utils::{command::*, file::*};
use std::fs;
use std::path::Path;

/// Count packages of every manager found on the system
pub fn collect_packages(timeout_ms: u32) -> Result<PackageInfo> {
    // Databases are independent, so read the slow ones in parallel
    let ((pacman, dpkg), ((rpm, xbps), (emerge, (nix, flatpak)))) = rayon::join(
        || (count_pacman(), count_dpkg()),
        || {
            rayon::join(
                || (count_rpm(timeout_ms), count_xbps()),
                || (count_emerge(), rayon::join(|| count_nix(timeout_ms), count_flatpak)),
            )
        },
    );

    let info = PackageInfo {
        pacman,
        dpkg,
        rpm,
        xbps,
        emerge,
        nix,
        flatpak,
    };
    if info.all() == 0 {
        return Err(QuickfetchError::Detection("No packages from known package managers found".to_string()));
    }
    Ok(info)
}

fn count_dirs(path: &Path) -> u32 {
    fs::read_dir(path)
        .map(|entries| entries.flatten().filter(|e| e.path().is_dir()).count() as u32)
        .unwrap_or(0)
}

fn count_pacman() -> u32 {
    count_dirs(Path::new("/var/lib/pacman/local"))
}

fn count_dpkg() -> u32 {
    read_file_safe("/var/lib/dpkg/status")
        .map(|status| count_dpkg_status(&status))
        .unwrap_or(0)
}

/// Number of installed entries in a dpkg status database
pub fn count_dpkg_status(status: &str) -> u32 {
    status
        .lines()
        .filter(|line| line.starts_with("Status: ") && line.ends_with(" installed"))
        .count() as u32
}

fn count_rpm(timeout_ms: u32) -> u32 {
    if !file_exists("/var/lib/rpm") || !command_exists("rpm") {
        return 0;
    }
    run_command("rpm", &["-qa"], timeout_ms)
        .map(|output| output.lines().filter(|line| !line.is_empty()).count() as u32)
        .unwrap_or(0)
}

fn count_xbps() -> u32 {
    // Package metadata lives in one plist per package
    let Ok(entries) = fs::read_dir("/var/db/xbps") else {
        return 0;
    };
    entries
        .flatten()
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with("pkgdb") || name.ends_with(".plist"))
        })
        .count() as u32
}

fn count_emerge() -> u32 {
    // /var/db/pkg/<category>/<package>
    let Ok(categories) = fs::read_dir("/var/db/pkg") else {
        return 0;
    };
    categories
        .flatten()
        .filter(|entry| entry.path().is_dir())
        .map(|entry| count_dirs(&entry.path()))
        .sum()
}

fn count_nix(timeout_ms: u32) -> u32 {
    if !file_exists("/run/current-system/sw") || !command_exists("nix-store") {
        return 0;
    }
    run_command(
        "nix-store",
        &["--query", "--requisites", "/run/current-system/sw"],
        timeout_ms,
    )
    .map(|output| output.lines().count() as u32)
    .unwrap_or(0)
}

fn count_flatpak() -> u32 {
    let mut count = count_dirs(Path::new("/var/lib/flatpak/app"));
    if let Some(data) = dirs::data_dir() {
        count += count_dirs(&data.join("flatpak/app"));
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn dpkg_counts_only_installed() {
        let status = "Package: a\nStatus: install ok installed\n\nPackage: b\nStatus: deinstall ok config-files\n\nPackage: c\nStatus: install ok installed\n";
        assert_eq!(count_dpkg_status(status), 2);
    }

    #[test]
    fn counts_directories_only() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("bash-5.2")).unwrap();
        fs::create_dir(dir.path().join("zsh-5.9")).unwrap();
        fs::write(dir.path().join("ALPM_DB_VERSION"), "9").unwrap();
        assert_eq!(count_dirs(dir.path()), 2);
        assert_eq!(count_dirs(&dir.path().join("missing")), 0);
    }
}
