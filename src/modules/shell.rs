use crate::config::options::ModuleArgs;
use crate::config::Configuration;
use crate::display::PrintContext;
use crate::format::FormatArg;
use crate::probe::{DetectResult, Probe};
use crate::registry::{create, Module, ModuleDescriptor};
use serde_json::Value;

pub static DESCRIPTOR: ModuleDescriptor = ModuleDescriptor {
    name: "Shell",
    description: "Print the shell this program was started from",
    create: create::<ShellModule>,
    format_args: &[
        ("process-name", "Shell process name"),
        ("exe", "Path of the shell executable"),
        ("pretty-name", "Shell pretty name"),
        ("version", "Shell version"),
    ],
};

#[derive(Debug, Clone, Default)]
pub struct ShellModule {
    args: ModuleArgs,
}

impl Module for ShellModule {
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
        let info = match ctx.probe.shell() {
            Ok(info) => info,
            Err(e) => return ctx.print_error(DESCRIPTOR.name, 0, &self.args, &e),
        };
        let format_args = [
            FormatArg::Str(&info.process_name),
            FormatArg::Str(&info.exe),
            FormatArg::Str(&info.pretty_name),
            FormatArg::Str(&info.version),
        ];
        let pretty = if info.version.is_empty() {
            info.pretty_name.clone()
        } else {
            format!("{} {}", info.pretty_name, info.version)
        };
        ctx.print_result(DESCRIPTOR.name, 0, &self.args, &[], &format_args, &pretty);
    }

    fn json_result(&self, _config: &Configuration, probe: &dyn Probe) -> Option<DetectResult<Value>> {
        super::json(probe.shell())
    }
}
