use crate::config::options::ModuleArgs;
use crate::config::Configuration;
use crate::display::PrintContext;
use crate::format::FormatArg;
use crate::probe::{DetectResult, Probe};
use crate::registry::{create, Module, ModuleDescriptor};
use serde_json::{json, Value};

pub static DESCRIPTOR: ModuleDescriptor = ModuleDescriptor {
    name: "Version",
    description: "Print the version of this program",
    create: create::<VersionModule>,
    format_args: &[
        ("project-name", "Project name"),
        ("version", "Version"),
        ("arch", "Architecture"),
        ("build-type", "Build type (debug or release)"),
    ],
};

pub const PROJECT_NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn build_type() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}

/// `quickfetch 0.2.0 (x86_64)`
pub fn version_line() -> String {
    format!("{} {} ({})", PROJECT_NAME, VERSION, std::env::consts::ARCH)
}

#[derive(Debug, Clone, Default)]
pub struct VersionModule {
    args: ModuleArgs,
}

impl Module for VersionModule {
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
        let format_args = [
            FormatArg::Str(PROJECT_NAME),
            FormatArg::Str(VERSION),
            FormatArg::Str(std::env::consts::ARCH),
            FormatArg::Str(build_type()),
        ];
        ctx.print_result(DESCRIPTOR.name, 0, &self.args, &[], &format_args, &version_line());
    }

    fn json_result(&self, _config: &Configuration, _probe: &dyn Probe) -> Option<DetectResult<Value>> {
        Some(Ok(json!({
            "projectName": PROJECT_NAME,
            "version": VERSION,
            "architecture": std::env::consts::ARCH,
            "buildType": build_type(),
        })))
    }
}
