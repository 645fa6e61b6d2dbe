use super::memory::usage;
use crate::config::options::ModuleArgs;
use crate::config::Configuration;
use crate::display::PrintContext;
use crate::probe::{DetectResult, Probe};
use crate::registry::{create, Module, ModuleDescriptor};
use serde_json::Value;

pub static DESCRIPTOR: ModuleDescriptor = ModuleDescriptor {
    name: "Swap",
    description: "Print swap usage",
    create: create::<SwapModule>,
    format_args: &[
        ("used", "Used size"),
        ("total", "Total size"),
        ("percentage", "Percentage used"),
    ],
};

#[derive(Debug, Clone, Default)]
pub struct SwapModule {
    args: ModuleArgs,
}

impl Module for SwapModule {
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
        let info = match ctx.probe.swap() {
            Ok(info) => info,
            Err(e) => return ctx.print_error(DESCRIPTOR.name, 0, &self.args, &e),
        };
        let (format_args, pretty) = usage(ctx, &info);
        let pretty = if info.total == 0 { "Disabled".to_string() } else { pretty };
        ctx.print_result(DESCRIPTOR.name, 0, &self.args, &[], &format_args, &pretty);
    }

    fn json_result(&self, _config: &Configuration, probe: &dyn Probe) -> Option<DetectResult<Value>> {
        super::json(probe.swap())
    }
}
