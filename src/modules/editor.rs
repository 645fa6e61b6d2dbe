use crate::config::options::ModuleArgs;
use crate::config::Configuration;
use crate::display::PrintContext;
use crate::format::FormatArg;
use crate::probe::{DetectResult, Probe};
use crate::registry::{create, Module, ModuleDescriptor};
use serde_json::Value;

pub static DESCRIPTOR: ModuleDescriptor = ModuleDescriptor {
    name: "Editor",
    description: "Print the default text editor ($VISUAL or $EDITOR)",
    create: create::<EditorModule>,
    format_args: &[("name", "Editor name"), ("path", "Full path of the editor")],
};

#[derive(Debug, Clone, Default)]
pub struct EditorModule {
    args: ModuleArgs,
}

impl Module for EditorModule {
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
        let info = match ctx.probe.editor() {
            Ok(info) => info,
            Err(e) => return ctx.print_error(DESCRIPTOR.name, 0, &self.args, &e),
        };
        let format_args = [FormatArg::Str(&info.name), FormatArg::Str(&info.path)];
        ctx.print_result(DESCRIPTOR.name, 0, &self.args, &[], &format_args, &info.name);
    }

    fn json_result(&self, _config: &Configuration, probe: &dyn Probe) -> Option<DetectResult<Value>> {
        super::json(probe.editor())
    }
}
