//! Every module the registry knows, one file each

mod battery;
mod bios;
mod colors;
mod cpu;
mod custom;
mod disk;
mod display;
mod editor;
mod gpu;
mod host;
mod initsystem;
mod kernel;
mod linebreak;
mod memory;
mod os;
mod packages;
mod separator;
mod shell;
mod swap;
mod terminal;
mod terminalfont;
mod title;
mod uptime;
mod users;
mod version;
mod wm;

use crate::display::PrintContext;
use crate::probe::DetectResult;
use crate::utils::parsing::{format_percent, format_size, format_temperature};
use serde::Serialize;
use serde_json::Value;

pub use battery::BatteryModule;
pub use bios::BiosModule;
pub use colors::ColorsModule;
pub use cpu::CpuModule;
pub use custom::CustomModule;
pub use disk::DiskModule;
pub use display::DisplayModule;
pub use editor::EditorModule;
pub use gpu::GpuModule;
pub use host::HostModule;
pub use initsystem::InitSystemModule;
pub use kernel::KernelModule;
pub use linebreak::BreakModule;
pub use memory::MemoryModule;
pub use os::OsModule;
pub use packages::PackagesModule;
pub use separator::SeparatorModule;
pub use shell::ShellModule;
pub use swap::SwapModule;
pub use terminal::TerminalModule;
pub use terminalfont::TerminalFontModule;
pub use title::TitleModule;
pub use uptime::UptimeModule;
pub use users::UsersModule;
pub use version::{version_line, VersionModule, VERSION};
pub use wm::WmModule;

use crate::registry::ModuleDescriptor;

pub static ALL: &[&ModuleDescriptor] = &[
    &battery::DESCRIPTOR,
    &bios::DESCRIPTOR,
    &linebreak::DESCRIPTOR,
    &colors::DESCRIPTOR,
    &cpu::DESCRIPTOR,
    &custom::DESCRIPTOR,
    &disk::DESCRIPTOR,
    &display::DESCRIPTOR,
    &editor::DESCRIPTOR,
    &gpu::DESCRIPTOR,
    &host::DESCRIPTOR,
    &initsystem::DESCRIPTOR,
    &kernel::DESCRIPTOR,
    &memory::DESCRIPTOR,
    &os::DESCRIPTOR,
    &packages::DESCRIPTOR,
    &separator::DESCRIPTOR,
    &shell::DESCRIPTOR,
    &swap::DESCRIPTOR,
    &terminal::DESCRIPTOR,
    &terminalfont::DESCRIPTOR,
    &title::DESCRIPTOR,
    &uptime::DESCRIPTOR,
    &users::DESCRIPTOR,
    &version::DESCRIPTOR,
    &wm::DESCRIPTOR,
];

/// Serialize a detection result for `--format json`
pub(crate) fn json<T: Serialize>(result: DetectResult<T>) -> Option<DetectResult<Value>> {
    Some(result.and_then(|value| serde_json::to_value(value).map_err(|e| e.to_string())))
}

pub(crate) fn size(ctx: &PrintContext<'_>, bytes: u64) -> String {
    let display = &ctx.config.display;
    format_size(bytes, display.binary_prefix, display.size_ndigits, display.size_max_prefix)
}

pub(crate) fn percent(ctx: &PrintContext<'_>, value: f64) -> String {
    format_percent(value, ctx.config.display.percent_ndigits)
}

pub(crate) fn temperature(ctx: &PrintContext<'_>, celsius: f64) -> String {
    let display = &ctx.config.display;
    format_temperature(celsius, display.temperature_unit, display.temperature_ndigits)
}

/// Index printed after the key when a module yields several lines
pub(crate) fn instance_index(position: usize, count: usize) -> u32 {
    if count > 1 {
        u32::try_from(position + 1).unwrap_or(u32::MAX)
    } else {
        0
    }
}
