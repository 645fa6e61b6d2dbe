use crate::config::options::ModuleArgs;
use crate::config::Configuration;
use crate::display::PrintContext;
use crate::format::FormatArg;
use crate::probe::{DetectResult, Probe};
use crate::registry::{create, Module, ModuleDescriptor};
use serde_json::Value;

pub static DESCRIPTOR: ModuleDescriptor = ModuleDescriptor {
    name: "InitSystem",
    description: "Print the init system (PID 1)",
    create: create::<InitSystemModule>,
    format_args: &[
        ("name", "Init system name"),
        ("exe", "Init system executable path"),
        ("pid", "Init system pid"),
    ],
};

#[derive(Debug, Clone, Default)]
pub struct InitSystemModule {
    args: ModuleArgs,
}

impl Module for InitSystemModule {
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
        let info = match ctx.probe.init_system() {
            Ok(info) => info,
            Err(e) => return ctx.print_error(DESCRIPTOR.name, 0, &self.args, &e),
        };
        let format_args = [
            FormatArg::Str(&info.name),
            FormatArg::Str(&info.exe),
            FormatArg::Uint(info.pid),
        ];
        ctx.print_result(DESCRIPTOR.name, 0, &self.args, &[], &format_args, &info.name);
    }

    fn json_result(&self, _config: &Configuration, probe: &dyn Probe) -> Option<DetectResult<Value>> {
        super::json(probe.init_system())
    }
}
