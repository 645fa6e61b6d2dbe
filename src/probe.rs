//! The seam between modules and the operating system.
//!
//! Modules ask a [`Probe`] for facts and only ever see a value or an error
//! message. [`SystemProbe`] answers from the collectors and caches every
//! answer, so a fact detected ahead of time by [`Probe::prewarm`] is free
//! when the module prints.

use crate::collectors::{desktop, hardware, packages, sensors, system};
use crate::config::GeneralOptions;
use crate::data::*;
use crate::error::Result;
use log::debug;
use rayon::prelude::*;
use std::sync::OnceLock;
use std::time::Instant;

/// A detected value or the message to print in its place
pub type DetectResult<T> = std::result::Result<T, String>;

pub const UNSUPPORTED: &str = "Not supported on this platform";

fn unsupported<T>() -> DetectResult<T> {
    Err(UNSUPPORTED.to_string())
}

/// Source of detected facts. Every method defaults to "not supported".
pub trait Probe: Sync {
    fn title(&self) -> DetectResult<TitleInfo> {
        unsupported()
    }
    fn os(&self) -> DetectResult<OsInfo> {
        unsupported()
    }
    fn host(&self) -> DetectResult<HostInfo> {
        unsupported()
    }
    fn kernel(&self) -> DetectResult<KernelInfo> {
        unsupported()
    }
    fn uptime(&self) -> DetectResult<UptimeInfo> {
        unsupported()
    }
    fn packages(&self) -> DetectResult<PackageInfo> {
        unsupported()
    }
    fn shell(&self) -> DetectResult<ShellInfo> {
        unsupported()
    }
    fn terminal(&self) -> DetectResult<TerminalInfo> {
        unsupported()
    }
    fn editor(&self) -> DetectResult<EditorInfo> {
        unsupported()
    }
    fn wm(&self) -> DetectResult<WmInfo> {
        unsupported()
    }
    fn init_system(&self) -> DetectResult<InitSystemInfo> {
        unsupported()
    }
    fn cpu(&self) -> DetectResult<CpuInfo> {
        unsupported()
    }
    /// Degrees Celsius
    fn cpu_temperature(&self) -> DetectResult<f64> {
        unsupported()
    }
    fn gpus(&self) -> DetectResult<Vec<GpuInfo>> {
        unsupported()
    }
    fn memory(&self) -> DetectResult<MemoryInfo> {
        unsupported()
    }
    fn swap(&self) -> DetectResult<MemoryInfo> {
        unsupported()
    }
    /// Usage of the file systems mounted at `folders`
    fn disks(&self, _folders: &[String]) -> DetectResult<Vec<DiskInfo>> {
        unsupported()
    }
    fn batteries(&self) -> DetectResult<Vec<BatteryInfo>> {
        unsupported()
    }
    fn bios(&self) -> DetectResult<BiosInfo> {
        unsupported()
    }
    fn displays(&self) -> DetectResult<Vec<DisplayInfo>> {
        unsupported()
    }
    fn terminal_font(&self) -> DetectResult<TerminalFontInfo> {
        unsupported()
    }
    fn users(&self) -> DetectResult<Vec<UserInfo>> {
        unsupported()
    }

    /// Detect what the named modules need before printing starts
    fn prewarm(&self, _modules: &[&str]) {}
}

/// Probe backed by the real system, caching each fact for the process lifetime
#[derive(Debug, Default)]
pub struct SystemProbe {
    timeout_ms: u32,
    os_file: String,
    title: OnceLock<DetectResult<TitleInfo>>,
    os: OnceLock<DetectResult<OsInfo>>,
    host: OnceLock<DetectResult<HostInfo>>,
    kernel: OnceLock<DetectResult<KernelInfo>>,
    uptime: OnceLock<DetectResult<UptimeInfo>>,
    packages: OnceLock<DetectResult<PackageInfo>>,
    shell: OnceLock<DetectResult<ShellInfo>>,
    terminal: OnceLock<DetectResult<TerminalInfo>>,
    editor: OnceLock<DetectResult<EditorInfo>>,
    wm: OnceLock<DetectResult<WmInfo>>,
    init_system: OnceLock<DetectResult<InitSystemInfo>>,
    cpu: OnceLock<DetectResult<CpuInfo>>,
    cpu_temperature: OnceLock<DetectResult<f64>>,
    gpus: OnceLock<DetectResult<Vec<GpuInfo>>>,
    memory: OnceLock<DetectResult<MemoryInfo>>,
    swap: OnceLock<DetectResult<MemoryInfo>>,
    batteries: OnceLock<DetectResult<Vec<BatteryInfo>>>,
    bios: OnceLock<DetectResult<BiosInfo>>,
    displays: OnceLock<DetectResult<Vec<DisplayInfo>>>,
    terminal_font: OnceLock<DetectResult<TerminalFontInfo>>,
    users: OnceLock<DetectResult<Vec<UserInfo>>>,
}

fn cached<T: Clone>(
    name: &str,
    cell: &OnceLock<DetectResult<T>>,
    detect: impl FnOnce() -> Result<T>,
) -> DetectResult<T> {
    cell.get_or_init(|| {
        let start = Instant::now();
        let result = detect().map_err(|e| e.to_string());
        debug!("detected {} in {:?}", name, start.elapsed());
        result
    })
    .clone()
}

impl SystemProbe {
    pub fn new(general: &GeneralOptions) -> Self {
        SystemProbe {
            timeout_ms: u32::try_from(general.processing_timeout).unwrap_or(0),
            os_file: general.os_file.clone(),
            ..SystemProbe::default()
        }
    }

    fn warm(&self, module: &str) {
        let ok = match module.to_ascii_lowercase().as_str() {
            "title" => self.title().is_ok(),
            "os" => self.os().is_ok(),
            "host" => self.host().is_ok(),
            "kernel" => self.kernel().is_ok(),
            "uptime" => self.uptime().is_ok(),
            "packages" => self.packages().is_ok(),
            "shell" => self.shell().is_ok(),
            "terminal" => self.terminal().is_ok(),
            "editor" => self.editor().is_ok(),
            "wm" => self.wm().is_ok(),
            "initsystem" => self.init_system().is_ok(),
            "cpu" => self.cpu().is_ok(),
            "gpu" => self.gpus().is_ok(),
            "memory" => self.memory().is_ok(),
            "swap" => self.swap().is_ok(),
            "battery" => self.batteries().is_ok(),
            "bios" => self.bios().is_ok(),
            "display" => self.displays().is_ok(),
            "terminalfont" => self.terminal_font().is_ok(),
            "users" => self.users().is_ok(),
            _ => return,
        };
        debug!("prewarmed {}: {}", module, if ok { "ok" } else { "failed" });
    }
}

impl Probe for SystemProbe {
    fn title(&self) -> DetectResult<TitleInfo> {
        cached("title", &self.title, system::collect_title)
    }
    fn os(&self) -> DetectResult<OsInfo> {
        cached("os", &self.os, || system::collect_os(&self.os_file))
    }
    fn host(&self) -> DetectResult<HostInfo> {
        cached("host", &self.host, hardware::collect_host)
    }
    fn kernel(&self) -> DetectResult<KernelInfo> {
        cached("kernel", &self.kernel, system::collect_kernel)
    }
    fn uptime(&self) -> DetectResult<UptimeInfo> {
        cached("uptime", &self.uptime, system::collect_uptime)
    }
    fn packages(&self) -> DetectResult<PackageInfo> {
        cached("packages", &self.packages, || packages::collect_packages(self.timeout_ms))
    }
    fn shell(&self) -> DetectResult<ShellInfo> {
        cached("shell", &self.shell, || system::collect_shell(self.timeout_ms))
    }
    fn terminal(&self) -> DetectResult<TerminalInfo> {
        cached("terminal", &self.terminal, system::collect_terminal)
    }
    fn editor(&self) -> DetectResult<EditorInfo> {
        cached("editor", &self.editor, system::collect_editor)
    }
    fn wm(&self) -> DetectResult<WmInfo> {
        cached("wm", &self.wm, desktop::collect_wm)
    }
    fn init_system(&self) -> DetectResult<InitSystemInfo> {
        cached("init system", &self.init_system, system::collect_init_system)
    }
    fn cpu(&self) -> DetectResult<CpuInfo> {
        cached("cpu", &self.cpu, hardware::collect_cpu)
    }
    fn cpu_temperature(&self) -> DetectResult<f64> {
        cached("cpu temperature", &self.cpu_temperature, sensors::cpu_temperature)
    }
    fn gpus(&self) -> DetectResult<Vec<GpuInfo>> {
        cached("gpus", &self.gpus, || hardware::collect_gpus(self.timeout_ms))
    }
    fn memory(&self) -> DetectResult<MemoryInfo> {
        cached("memory", &self.memory, hardware::collect_memory)
    }
    fn swap(&self) -> DetectResult<MemoryInfo> {
        cached("swap", &self.swap, hardware::collect_swap)
    }
    fn disks(&self, folders: &[String]) -> DetectResult<Vec<DiskInfo>> {
        hardware::collect_disks(folders).map_err(|e| e.to_string())
    }
    fn batteries(&self) -> DetectResult<Vec<BatteryInfo>> {
        cached("batteries", &self.batteries, sensors::collect_batteries)
    }
    fn bios(&self) -> DetectResult<BiosInfo> {
        cached("bios", &self.bios, hardware::collect_bios)
    }
    fn displays(&self) -> DetectResult<Vec<DisplayInfo>> {
        cached("displays", &self.displays, || desktop::collect_displays(self.timeout_ms))
    }
    fn terminal_font(&self) -> DetectResult<TerminalFontInfo> {
        let terminal = self.terminal()?;
        cached("terminal font", &self.terminal_font, || {
            desktop::collect_terminal_font(&terminal, self.timeout_ms)
        })
    }
    fn users(&self) -> DetectResult<Vec<UserInfo>> {
        cached("users", &self.users, system::collect_users)
    }

    fn prewarm(&self, modules: &[&str]) {
        let start = Instant::now();
        modules.par_iter().for_each(|module| self.warm(module));
        debug!("prewarmed {} modules in {:?}", modules.len(), start.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Nothing;
    impl Probe for Nothing {}

    #[test]
    fn unimplemented_facts_are_unsupported() {
        assert_eq!(Nothing.uptime(), Err(UNSUPPORTED.to_string()));
        assert_eq!(Nothing.disks(&["/".to_string()]), Err(UNSUPPORTED.to_string()));
    }

    #[test]
    fn cache_runs_detection_once() {
        let cell = OnceLock::new();
        let mut calls = 0;
        let first = cached("test", &cell, || {
            calls += 1;
            Ok(7u32)
        });
        let second = cached("test", &cell, || Ok(8u32));
        assert_eq!((first, second, calls), (Ok(7), Ok(7), 1));
    }

    #[test]
    fn errors_become_messages() {
        let cell: OnceLock<DetectResult<u32>> = OnceLock::new();
        let result = cached("test", &cell, || {
            Err(crate::error::QuickfetchError::Detection("permission denied".into()))
        });
        assert_eq!(result, Err("permission denied".to_string()));
    }
}
