//! Hardware information collection (host, CPU, GPU, memory, disk)

use crate::data::{BiosInfo, CpuInfo, DiskInfo, GpuInfo, GpuType, HostInfo, MemoryInfo};
use crate::error::{QuickfetchError, Result};
use crate::utils::{command::*, file::*, parsing::*};
use std::collections::HashSet;
use std::ffi::CString;
use std::fs;
use std::path::Path;

const DMI_DIRS: &[&str] = &["/sys/devices/virtual/dmi/id", "/sys/class/dmi/id"];

/// Placeholder strings firmware vendors leave in DMI fields
const DMI_JUNK: &[&str] = &[
    "to be filled by o.e.m.",
    "to be filled by oem",
    "default string",
    "not applicable",
    "not specified",
    "system product name",
    "system version",
    "system manufacturer",
    "none",
    "undefined",
    "o.e.m.",
    "oem",
    "0x0000",
    "0123456789",
    "n/a",
    "x.x",
];

fn is_junk(value: &str) -> bool {
    let lowered = value.trim().to_lowercase();
    lowered.is_empty() || DMI_JUNK.contains(&lowered.as_str())
}

fn read_dmi(file: &str) -> String {
    DMI_DIRS
        .iter()
        .filter_map(|dir| read_first_line(Path::new(dir).join(file)).ok())
        .find(|value| !is_junk(value))
        .unwrap_or_default()
}

pub fn collect_host() -> Result<HostInfo> {
    let mut host = HostInfo {
        product_family: read_dmi("product_family"),
        product_name: read_dmi("product_name"),
        product_version: read_dmi("product_version"),
        product_sku: read_dmi("product_sku"),
        sys_vendor: read_dmi("sys_vendor"),
    };

    if host.product_name.is_empty() {
        // Device tree boards (Raspberry Pi and friends)
        if let Ok(model) = read_first_line("/sys/firmware/devicetree/base/model") {
            host.product_name = model.trim_end_matches('\0').to_string();
        }
    }
    if host.product_name.is_empty() {
        return Err(QuickfetchError::Detection("Failed to read the product name".to_string()));
    }
    if host.product_name.starts_with("Standard PC") {
        host.product_name = format!("KVM/QEMU {}", host.product_name);
    }
    Ok(host)
}

pub fn collect_bios() -> Result<BiosInfo> {
    let bios = BiosInfo {
        date: read_dmi("bios_date"),
        release: read_dmi("bios_release"),
        vendor: read_dmi("bios_vendor"),
        version: read_dmi("bios_version"),
        kind: firmware_kind(Path::new("/sys/firmware")).to_string(),
    };
    if bios.version.is_empty() && bios.vendor.is_empty() {
        return Err(QuickfetchError::Detection("Failed to read the BIOS information".to_string()));
    }
    Ok(bios)
}

/// `UEFI` when the kernel booted through EFI
fn firmware_kind(firmware: &Path) -> &'static str {
    if firmware.join("efi").is_dir() || firmware.join("acpi/tables/UEFI").is_file() {
        "UEFI"
    } else {
        "BIOS"
    }
}

pub fn collect_cpu() -> Result<CpuInfo> {
    let text = read_file_safe("/proc/cpuinfo")?;
    let mut cpu = parse_cpuinfo(&text);
    if cpu.name.is_empty() {
        return Err(QuickfetchError::Detection("CPU info not found".to_string()));
    }

    let max_khz = read_first_line("/sys/devices/system/cpu/cpu0/cpufreq/cpuinfo_max_freq")
        .ok()
        .and_then(|v| v.parse::<f64>().ok());
    if let Some(khz) = max_khz {
        cpu.frequency_max = khz / 1_000_000.0;
    }
    Ok(cpu)
}

pub fn parse_cpuinfo(text: &str) -> CpuInfo {
    let mut cpu = CpuInfo::default();
    let mut cores = HashSet::new();
    let mut physical_id = String::new();
    let mut highest_mhz: f64 = 0.0;

    for line in text.lines() {
        let Some((key, _)) = line.split_once(':') else {
            continue;
        };
        let value = extract_after_colon(line).unwrap_or_default();
        match key.trim() {
            "processor" => cpu.cores_logical += 1,
            "model name" | "Model" | "Hardware" if cpu.name.is_empty() => {
                cpu.name = clean_cpu_name(&value)
            }
            "vendor_id" if cpu.vendor.is_empty() => cpu.vendor = value,
            "physical id" => physical_id = value,
            "core id" => {
                cores.insert((physical_id.clone(), value));
            }
            "cpu MHz" => {
                if let Ok(mhz) = value.parse::<f64>() {
                    highest_mhz = highest_mhz.max(mhz);
                }
            }
            _ => {}
        }
    }

    cpu.cores_physical = if cores.is_empty() {
        cpu.cores_logical
    } else {
        cores.len() as u32
    };
    cpu.frequency_max = highest_mhz / 1000.0;
    cpu
}

/// "AMD Ryzen 7 5800X 8-Core Processor" -> "AMD Ryzen 7 5800X"
fn clean_cpu_name(name: &str) -> String {
    let mut name = name
        .replace("(R)", "")
        .replace("(TM)", "")
        .replace(" CPU", "")
        .replace(" Processor", "");
    if let Some(pos) = name.find(" @ ") {
        name.truncate(pos);
    }
    let mut words: Vec<&str> = name.split_whitespace().collect();
    if words
        .last()
        .is_some_and(|w| w.ends_with("-Core") || w.ends_with("-Cores"))
    {
        words.pop();
    }
    words.join(" ")
}

pub fn collect_memory() -> Result<MemoryInfo> {
    let text = read_file_safe("/proc/meminfo")?;
    let (memory, _) = parse_meminfo(&text);
    if memory.total == 0 {
        return Err(QuickfetchError::Detection("MemTotal not found".to_string()));
    }
    Ok(memory)
}

pub fn collect_swap() -> Result<MemoryInfo> {
    let text = read_file_safe("/proc/meminfo")?;
    Ok(parse_meminfo(&text).1)
}

/// RAM and swap usage from /proc/meminfo, in bytes
pub fn parse_meminfo(text: &str) -> (MemoryInfo, MemoryInfo) {
    let mut total = 0;
    let mut available = None;
    let mut free = 0;
    let mut buffers = 0;
    let mut cached = 0;
    let mut swap_total = 0;
    let mut swap_free = 0;

    for line in text.lines() {
        let Some((key, _)) = line.split_once(':') else {
            continue;
        };
        let kib = extract_memory_from_line(line);
        match key {
            "MemTotal" => total = kib,
            "MemAvailable" => available = Some(kib),
            "MemFree" => free = kib,
            "Buffers" => buffers = kib,
            "Cached" => cached = kib,
            "SwapTotal" => swap_total = kib,
            "SwapFree" => swap_free = kib,
            _ => {}
        }
    }

    // Kernels before 3.14 have no MemAvailable
    let available = available.unwrap_or(free + buffers + cached);
    (
        MemoryInfo {
            used: total.saturating_sub(available) * 1024,
            total: total * 1024,
        },
        MemoryInfo {
            used: swap_total.saturating_sub(swap_free) * 1024,
            total: swap_total * 1024,
        },
    )
}

fn extract_memory_from_line(line: &str) -> u64 {
    extract_after_colon(line)
        .and_then(|value| value.trim_end_matches("kB").trim().parse().ok())
        .unwrap_or(0)
}

/// Usage of the file systems holding `folders`
pub fn collect_disks(folders: &[String]) -> Result<Vec<DiskInfo>> {
    let mounts = fs::read_to_string("/proc/mounts").unwrap_or_default();
    let mut disks = Vec::with_capacity(folders.len());
    for folder in folders {
        match statvfs(folder) {
            Ok((bytes_total, bytes_available, bytes_free)) => disks.push(DiskInfo {
                mountpoint: folder.clone(),
                filesystem: filesystem_of(&mounts, folder),
                bytes_used: bytes_total.saturating_sub(bytes_free),
                bytes_available,
                bytes_total,
            }),
            Err(e) => log::debug!("statvfs({}) failed: {}", folder, e),
        }
    }
    if disks.is_empty() {
        return Err(QuickfetchError::Detection("No disks found".to_string()));
    }
    Ok(disks)
}

/// (total, available to users, free) in bytes
fn statvfs(path: &str) -> Result<(u64, u64, u64)> {
    let path = CString::new(path).map_err(|_| QuickfetchError::Parse("Invalid path".to_string()))?;
    // SAFETY: `path` is NUL-terminated and `stat` is a plain struct statvfs fills in
    let stat = unsafe {
        let mut stat: libc::statvfs = std::mem::zeroed();
        if libc::statvfs(path.as_ptr(), &mut stat) != 0 {
            return Err(std::io::Error::last_os_error().into());
        }
        stat
    };
    let frsize = stat.f_frsize as u64;
    Ok((
        (stat.f_blocks as u64).wrapping_mul(frsize),
        (stat.f_bavail as u64).wrapping_mul(frsize),
        (stat.f_bfree as u64).wrapping_mul(frsize),
    ))
}

fn filesystem_of(mounts: &str, mountpoint: &str) -> String {
    mounts
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let _device = fields.next()?;
            let target = fields.next()?;
            let fs_type = fields.next()?;
            (target == mountpoint).then(|| fs_type.to_string())
        })
        .last()
        .unwrap_or_default()
}

pub fn collect_gpus(timeout_ms: u32) -> Result<Vec<GpuInfo>> {
    let mut gpus = detect_gpus_sysfs();
    if gpus.is_empty() {
        // lspci names GPUs better than sysfs, but costs a process spawn
        if let Ok(output) = run_command("lspci", &[], timeout_ms) {
            gpus = output.lines().filter_map(parse_gpu_from_lspci).collect();
        }
    }
    if gpus.is_empty() {
        return Err(QuickfetchError::Detection("No GPUs found".to_string()));
    }
    // Discrete first
    gpus.sort_by_key(|gpu| gpu.gpu_type != GpuType::Discrete);
    Ok(gpus)
}

fn detect_gpus_sysfs() -> Vec<GpuInfo> {
    let Ok(entries) = fs::read_dir("/sys/class/drm") else {
        return Vec::new();
    };
    let mut gpus = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        // card0, not card0-HDMI-A-1
        if !name.starts_with("card") || name.contains('-') {
            continue;
        }
        let vendor_id = read_first_line(path.join("device/vendor")).unwrap_or_default();
        let Ok(device_name) = read_first_line(path.join("device/name")) else {
            continue;
        };
        if device_name.is_empty() {
            continue;
        }
        let gpu_type = if is_integrated_gpu(&path, &vendor_id) {
            GpuType::Integrated
        } else {
            GpuType::Discrete
        };
        gpus.push(GpuInfo {
            vendor: vendor_name(&vendor_id).to_string(),
            name: device_name,
            gpu_type,
        });
    }
    gpus
}

fn vendor_name(pci_id: &str) -> &'static str {
    match pci_id {
        "0x8086" => "Intel",
        "0x1002" | "0x1022" => "AMD",
        "0x10de" => "NVIDIA",
        "0x1af4" => "Red Hat",
        "0x15ad" => "VMware",
        _ => "",
    }
}

fn is_integrated_gpu(card_path: &Path, vendor_id: &str) -> bool {
    // Intel GPUs are usually integrated
    if vendor_id == "0x8086" {
        return true;
    }
    // Integrated GPUs usually sit on bus 00:02.0
    fs::read_link(card_path.join("device"))
        .map(|target| target.to_string_lossy().contains("0000:00:02"))
        .unwrap_or(false)
}

pub fn parse_gpu_from_lspci(line: &str) -> Option<GpuInfo> {
    if !(line.contains("VGA compatible controller")
        || line.contains("3D controller")
        || line.contains("Display controller"))
    {
        return None;
    }
    // "00:02.0 VGA compatible controller: Intel Corporation ... (rev 0c)"
    let (_, description) = line.split_once(": ")?;
    let cleaned = description
        .split(" (rev ")
        .next()
        .unwrap_or(description)
        .trim();

    let (vendor, name) = if cleaned.contains("AMD") || cleaned.contains("Advanced Micro Devices") {
        ("AMD", parse_amd_gpu(cleaned))
    } else if cleaned.contains("NVIDIA") || cleaned.contains("GeForce") {
        ("NVIDIA", parse_nvidia_gpu(cleaned))
    } else if cleaned.contains("Intel") {
        ("Intel", parse_intel_gpu(cleaned))
    } else {
        ("", last_bracket(cleaned).unwrap_or(cleaned).to_string())
    };

    let gpu_type = detect_gpu_type(line, &name);
    Some(GpuInfo {
        vendor: vendor.to_string(),
        name,
        gpu_type,
    })
}

/// Content of the last `[...]` group, skipping vendor tags like `[AMD/ATI]`
fn last_bracket(text: &str) -> Option<&str> {
    let start = text.rfind('[')?;
    let end = text[start..].find(']')?;
    let content = &text[start + 1..start + end];
    let vendor_tag = content.contains('/') && !content.contains(' ');
    (!vendor_tag && content.len() > 2).then_some(content)
}

fn parse_amd_gpu(description: &str) -> String {
    if let Some(bracket) = last_bracket(description) {
        if bracket.contains("Radeon") {
            // "Radeon RX 7700 XT / 7800 XT" names two cards sharing a chip
            let model = bracket.split(" / ").next().unwrap_or(bracket).trim();
            return format!("AMD {}", model);
        }
    }
    if let Some(pos) = description.find("Radeon") {
        let model = description[pos..]
            .split(" [")
            .next()
            .and_then(|s| s.split(" (").next())
            .unwrap_or(&description[pos..]);
        return format!("AMD {}", model.trim());
    }
    match last_bracket(description) {
        Some(codename) => format!("AMD {}", codename),
        None => "AMD GPU".to_string(),
    }
}

fn parse_nvidia_gpu(description: &str) -> String {
    if let Some(bracket) = last_bracket(description) {
        if bracket.contains("GeForce") || bracket.contains("RTX") || bracket.contains("GTX") {
            return format!("NVIDIA {}", bracket.trim_start_matches("NVIDIA "));
        }
    }
    if let Some(pos) = description.find("GeForce") {
        let model = description[pos..]
            .split(" [")
            .next()
            .unwrap_or(&description[pos..])
            .trim_end_matches(']');
        return format!("NVIDIA {}", model.trim());
    }
    "NVIDIA GPU".to_string()
}

fn parse_intel_gpu(description: &str) -> String {
    let cleaned = description.replace("Intel Corporation ", "");
    let model = cleaned.split(" [").next().unwrap_or(&cleaned).trim();
    format!("Intel {}", model)
}

fn detect_gpu_type(lspci_line: &str, gpu_name: &str) -> GpuType {
    let line = lspci_line.to_lowercase();
    let name = gpu_name.to_lowercase();
    let integrated_hints = ["integrated", "raphael", "renoir", "cezanne", "barcelo", "iris", "uhd", "hd graphics"];
    if integrated_hints.iter().any(|hint| name.contains(hint))
        || line.contains("integrated")
        || (lspci_line.starts_with("00:02.0") && line.contains("intel"))
    {
        GpuType::Integrated
    } else {
        GpuType::Discrete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn junk_dmi_values_are_dropped() {
        assert!(is_junk("To be filled by O.E.M."));
        assert!(is_junk("  Default string "));
        assert!(!is_junk("ThinkPad X1 Carbon Gen 9"));
    }

    #[test]
    fn efi_directory_means_uefi() {
        let dir = tempfile::TempDir::new().unwrap();
        assert_eq!(firmware_kind(dir.path()), "BIOS");
        fs::create_dir_all(dir.path().join("acpi/tables")).unwrap();
        fs::write(dir.path().join("acpi/tables/UEFI"), b"").unwrap();
        assert_eq!(firmware_kind(dir.path()), "UEFI");
    }

    #[test]
    fn cpuinfo_counts_cores() {
        let text = "processor\t: 0\nvendor_id\t: AuthenticAMD\nmodel name\t: AMD Ryzen 7 5800X 8-Core Processor\nphysical id\t: 0\ncore id\t\t: 0\ncpu MHz\t\t: 3800.000\n\n\
                    processor\t: 1\nphysical id\t: 0\ncore id\t\t: 0\ncpu MHz\t\t: 4850.000\n\n\
                    processor\t: 2\nphysical id\t: 0\ncore id\t\t: 1\n";
        let cpu = parse_cpuinfo(text);
        assert_eq!(cpu.name, "AMD Ryzen 7 5800X");
        assert_eq!(cpu.vendor, "AuthenticAMD");
        assert_eq!((cpu.cores_physical, cpu.cores_logical), (2, 3));
        assert_eq!(cpu.frequency_max, 4.85);
    }

    #[test]
    fn intel_names_lose_trademarks_and_clock() {
        assert_eq!(
            clean_cpu_name("Intel(R) Core(TM) i7-8550U CPU @ 1.80GHz"),
            "Intel Core i7-8550U"
        );
    }

    #[test]
    fn meminfo_in_bytes() {
        let text = "MemTotal:       16000000 kB\nMemFree:         1000000 kB\nMemAvailable:    6000000 kB\nSwapTotal:       2000000 kB\nSwapFree:        1500000 kB\n";
        let (memory, swap) = parse_meminfo(text);
        assert_eq!(memory.total, 16_000_000 * 1024);
        assert_eq!(memory.used, 10_000_000 * 1024);
        assert_eq!(swap.used, 500_000 * 1024);
    }

    #[test]
    fn lspci_lines() {
        let amd = parse_gpu_from_lspci(
            "03:00.0 VGA compatible controller: Advanced Micro Devices, Inc. [AMD/ATI] Navi 32 [Radeon RX 7700 XT / 7800 XT] (rev c8)",
        )
        .unwrap();
        assert_eq!(amd.name, "AMD Radeon RX 7700 XT");
        assert_eq!(amd.gpu_type, GpuType::Discrete);

        let intel = parse_gpu_from_lspci(
            "00:02.0 VGA compatible controller: Intel Corporation UHD Graphics 620 (rev 07)",
        )
        .unwrap();
        assert_eq!(intel.name, "Intel UHD Graphics 620");
        assert_eq!(intel.gpu_type, GpuType::Integrated);

        assert!(parse_gpu_from_lspci("00:1f.3 Audio device: Intel Corporation Sunrise Point").is_none());
    }

    #[test]
    fn mount_table_lookup() {
        let mounts = "/dev/nvme0n1p2 / ext4 rw 0 0\n/dev/nvme0n1p1 /boot vfat rw 0 0\n";
        assert_eq!(filesystem_of(mounts, "/"), "ext4");
        assert_eq!(filesystem_of(mounts, "/home"), "");
    }

    #[test]
    fn root_disk_is_measured() {
        let disks = collect_disks(&["/".to_string()]).unwrap();
        assert_eq!(disks[0].mountpoint, "/");
        assert!(disks[0].bytes_total >= disks[0].bytes_used);
    }
}
