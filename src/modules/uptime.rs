use crate::config::options::ModuleArgs;
use crate::config::Configuration;
use crate::display::PrintContext;
use crate::format::FormatArg;
use crate::probe::{DetectResult, Probe};
use crate::registry::{create, Module, ModuleDescriptor};
use crate::utils::parsing::{format_uptime, split_uptime};
use serde_json::Value;

pub static DESCRIPTOR: ModuleDescriptor = ModuleDescriptor {
    name: "Uptime",
    description: "Print how long the system has been running",
    create: create::<UptimeModule>,
    format_args: &[
        ("days", "Days"),
        ("hours", "Hours"),
        ("minutes", "Minutes"),
        ("seconds", "Seconds"),
        ("milliseconds", "Milliseconds"),
        ("uptime", "Uptime in milliseconds"),
        ("boot-time", "Boot time in milliseconds since the epoch"),
    ],
};

#[derive(Debug, Clone, Default)]
pub struct UptimeModule {
    args: ModuleArgs,
}

impl Module for UptimeModule {
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
        let info = match ctx.probe.uptime() {
            Ok(info) => info,
            Err(e) => return ctx.print_error(DESCRIPTOR.name, 0, &self.args, &e),
        };
        let parts = split_uptime(info.uptime);
        let format_args = [
            FormatArg::Uint(parts.days),
            FormatArg::Uint(parts.hours),
            FormatArg::Uint(parts.minutes),
            FormatArg::Uint(parts.seconds),
            FormatArg::Uint(parts.milliseconds),
            FormatArg::Uint64(info.uptime),
            FormatArg::Uint64(info.boot_time),
        ];
        ctx.print_result(
            DESCRIPTOR.name,
            0,
            &self.args,
            &[],
            &format_args,
            &format_uptime(info.uptime),
        );
    }

    fn json_result(&self, _config: &Configuration, probe: &dyn Probe) -> Option<DetectResult<Value>> {
        super::json(probe.uptime())
    }
}
