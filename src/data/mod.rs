//! Detection results, one struct per fact

pub mod hardware;
pub mod system;

pub use hardware::{
    BatteryInfo, BiosInfo, CpuInfo, DiskInfo, DisplayInfo, GpuInfo, GpuType, HostInfo, MemoryInfo,
};
pub use system::{
    EditorInfo, InitSystemInfo, KernelInfo, OsInfo, PackageInfo, ShellInfo, TerminalFontInfo,
    TerminalInfo, TitleInfo, UptimeInfo, UserInfo, WmInfo,
};
