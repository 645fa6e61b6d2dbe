use crate::config::options::ModuleArgs;
use crate::config::Configuration;
use crate::display::PrintContext;
use crate::format::FormatArg;
use crate::probe::{DetectResult, Probe};
use crate::registry::{create, Module, ModuleDescriptor};
use serde_json::Value;

pub static DESCRIPTOR: ModuleDescriptor = ModuleDescriptor {
    name: "TerminalFont",
    description: "Print the font of the current terminal emulator",
    create: create::<TerminalFontModule>,
    format_args: &[
        ("name", "Terminal font name"),
        ("size", "Terminal font size"),
        ("pretty", "Terminal font name and size"),
    ],
};

#[derive(Debug, Clone, Default)]
pub struct TerminalFontModule {
    args: ModuleArgs,
}

impl Module for TerminalFontModule {
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
        let font = match ctx.probe.terminal_font() {
            Ok(font) => font,
            Err(e) => return ctx.print_error(DESCRIPTOR.name, 0, &self.args, &e),
        };
        let format_args = [
            FormatArg::Str(&font.name),
            FormatArg::Str(&font.size),
            FormatArg::Str(&font.pretty),
        ];
        ctx.print_result(DESCRIPTOR.name, 0, &self.args, &[], &format_args, &font.pretty);
    }

    fn json_result(&self, _config: &Configuration, probe: &dyn Probe) -> Option<DetectResult<Value>> {
        super::json(probe.terminal_font())
    }
}
