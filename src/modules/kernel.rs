use crate::config::options::ModuleArgs;
use crate::config::Configuration;
use crate::display::PrintContext;
use crate::format::FormatArg;
use crate::probe::{DetectResult, Probe};
use crate::registry::{create, Module, ModuleDescriptor};
use serde_json::Value;

pub static DESCRIPTOR: ModuleDescriptor = ModuleDescriptor {
    name: "Kernel",
    description: "Print the kernel name and release",
    create: create::<KernelModule>,
    format_args: &[
        ("sysname", "Sysname"),
        ("release", "Release"),
        ("version", "Version"),
        ("arch", "Architecture"),
    ],
};

#[derive(Debug, Clone, Default)]
pub struct KernelModule {
    args: ModuleArgs,
}

impl Module for KernelModule {
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
        let info = match ctx.probe.kernel() {
            Ok(info) => info,
            Err(e) => return ctx.print_error(DESCRIPTOR.name, 0, &self.args, &e),
        };
        let format_args = [
            FormatArg::Str(&info.name),
            FormatArg::Str(&info.release),
            FormatArg::Str(&info.version),
            FormatArg::Str(&info.architecture),
        ];
        let pretty = format!("{} {}", info.name, info.release);
        ctx.print_result(DESCRIPTOR.name, 0, &self.args, &[], &format_args, pretty.trim());
    }

    fn json_result(&self, _config: &Configuration, probe: &dyn Probe) -> Option<DetectResult<Value>> {
        super::json(probe.kernel())
    }
}
