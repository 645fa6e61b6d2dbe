use crate::config::options::ModuleArgs;
use crate::config::Configuration;
use crate::data::MemoryInfo;
use crate::display::PrintContext;
use crate::format::FormatArg;
use crate::probe::{DetectResult, Probe};
use crate::registry::{create, Module, ModuleDescriptor};
use serde_json::Value;

pub static DESCRIPTOR: ModuleDescriptor = ModuleDescriptor {
    name: "Memory",
    description: "Print RAM usage",
    create: create::<MemoryModule>,
    format_args: &[
        ("used", "Used size"),
        ("total", "Total size"),
        ("percentage", "Percentage used"),
    ],
};

#[derive(Debug, Clone, Default)]
pub struct MemoryModule {
    args: ModuleArgs,
}

/// Shared by Memory and Swap: format args and the `used / total (pct)` line
pub(super) fn usage(ctx: &PrintContext<'_>, info: &MemoryInfo) -> ([FormatArg<'static>; 3], String) {
    let used = super::size(ctx, info.used);
    let total = super::size(ctx, info.total);
    let percent = super::percent(ctx, info.percent());
    let pretty = format!("{} / {} ({})", used, total, percent);
    (
        [FormatArg::Text(used), FormatArg::Text(total), FormatArg::Text(percent)],
        pretty,
    )
}

impl Module for MemoryModule {
    fn descriptor(&self) -> &'static ModuleDescriptor {
        &DESCRIPTOR
    }

    fn args(&self) -> &ModuleArgs {
        &self.args
    }

    fn args_mut(&mut self) -> &mut ModuleArgs {
        &mut self.args
    }

    fn clone_box(&self) -> Box<dyn Module> {
        Box::new(self.clone())
    }

    fn print(&self, ctx: &mut PrintContext<'_>) {
        let info = match ctx.probe.memory() {
            Ok(info) => info,
            Err(e) => return ctx.print_error(DESCRIPTOR.name, 0, &self.args, &e),
        };
        let (format_args, pretty) = usage(ctx, &info);
        ctx.print_result(DESCRIPTOR.name, 0, &self.args, &[], &format_args, &pretty);
    }

    fn json_result(&self, _config: &Configuration, probe: &dyn Probe) -> Option<DetectResult<Value>> {
        super::json(probe.memory())
    }
}
