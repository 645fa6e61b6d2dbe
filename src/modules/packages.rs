use crate::config::options::ModuleArgs;
use crate::config::Configuration;
use crate::data::PackageInfo;
use crate::display::PrintContext;
use crate::format::FormatArg;
use crate::probe::{DetectResult, Probe};
use crate::registry::{create, Module, ModuleDescriptor};
use serde_json::Value;

pub static DESCRIPTOR: ModuleDescriptor = ModuleDescriptor {
    name: "Packages",
    description: "Print the number of installed packages per package manager",
    create: create::<PackagesModule>,
    format_args: &[
        ("all", "Number of all packages"),
        ("pacman", "Number of pacman packages"),
        ("dpkg", "Number of dpkg packages"),
        ("rpm", "Number of rpm packages"),
        ("xbps", "Number of xbps packages"),
        ("emerge", "Number of emerge packages"),
        ("nix", "Number of nix packages"),
        ("flatpak", "Number of flatpak apps"),
    ],
};

#[derive(Debug, Clone, Default)]
pub struct PackagesModule {
    args: ModuleArgs,
}

/// `1234 (pacman), 12 (flatpak)`
fn pretty_packages(info: &PackageInfo) -> String {
    info.counts()
        .into_iter()
        .map(|(manager, count)| format!("{} ({})", count, manager))
        .collect::<Vec<_>>()
        .join(", ")
}

impl Module for PackagesModule {
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
        let info = match ctx.probe.packages() {
            Ok(info) => info,
            Err(e) => return ctx.print_error(DESCRIPTOR.name, 0, &self.args, &e),
        };
        let format_args = [
            FormatArg::Uint(info.all()),
            FormatArg::Uint(info.pacman),
            FormatArg::Uint(info.dpkg),
            FormatArg::Uint(info.rpm),
            FormatArg::Uint(info.xbps),
            FormatArg::Uint(info.emerge),
            FormatArg::Uint(info.nix),
            FormatArg::Uint(info.flatpak),
        ];
        ctx.print_result(DESCRIPTOR.name, 0, &self.args, &[], &format_args, &pretty_packages(&info));
    }

    fn json_result(&self, _config: &Configuration, probe: &dyn Probe) -> Option<DetectResult<Value>> {
        super::json(probe.packages())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_non_empty_managers() {
        let info = PackageInfo {
            pacman: 1234,
            flatpak: 12,
            ..PackageInfo::default()
        };
        assert_eq!(pretty_packages(&info), "1234 (pacman), 12 (flatpak)");
    }
}
