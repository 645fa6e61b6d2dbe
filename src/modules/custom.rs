use crate::config::options::ModuleArgs;
use crate::display::PrintContext;
use crate::registry::{create, Module, ModuleDescriptor};

pub static DESCRIPTOR: ModuleDescriptor = ModuleDescriptor {
    name: "Custom",
    description: "Print its format string as is, with an optional key",
    create: create::<CustomModule>,
    format_args: &[],
};

#[derive(Debug, Clone, Default)]
pub struct CustomModule {
    args: ModuleArgs,
}

impl Module for CustomModule {
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
        // The key is optional here, so the format is evaluated by hand
        let text = ctx.evaluate(&self.args.output_format, &[]);
        if self.args.key.is_empty() {
            ctx.print_line(&text);
        } else {
            ctx.print_key_value(DESCRIPTOR.name, 0, &self.args, &[], &text);
        }
    }
}
