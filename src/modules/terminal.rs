use crate::config::options::ModuleArgs;
use crate::config::Configuration;
use crate::display::PrintContext;
use crate::format::FormatArg;
use crate::probe::{DetectResult, Probe};
use crate::registry::{create, Module, ModuleDescriptor};
use serde_json::Value;

pub static DESCRIPTOR: ModuleDescriptor = ModuleDescriptor {
    name: "Terminal",
    description: "Print the terminal emulator",
    create: create::<TerminalModule>,
    format_args: &[
        ("process-name", "Terminal process name"),
        ("pretty-name", "Terminal pretty name"),
    ],
};

#[derive(Debug, Clone, Default)]
pub struct TerminalModule {
    args: ModuleArgs,
}

impl Module for TerminalModule {
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
        let info = match ctx.probe.terminal() {
            Ok(info) => info,
            Err(e) => return ctx.print_error(DESCRIPTOR.name, 0, &self.args, &e),
        };
        let format_args = [
            FormatArg::Str(&info.process_name),
            FormatArg::Str(&info.pretty_name),
        ];
        ctx.print_result(DESCRIPTOR.name, 0, &self.args, &[], &format_args, &info.pretty_name);
    }

    fn json_result(&self, _config: &Configuration, probe: &dyn Probe) -> Option<DetectResult<Value>> {
        super::json(probe.terminal())
    }
}
