use crate::config::options::ModuleArgs;
use crate::display::PrintContext;
use crate::registry::{create, Module, ModuleDescriptor};

pub static DESCRIPTOR: ModuleDescriptor = ModuleDescriptor {
    name: "Break",
    description: "Print an empty line",
    create: create::<BreakModule>,
    format_args: &[],
};

#[derive(Debug, Clone, Default)]
pub struct BreakModule {
    args: ModuleArgs,
}

impl Module for BreakModule {
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
        ctx.print_line("");
    }
}
