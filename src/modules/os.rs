use crate::config::options::ModuleArgs;
use crate::config::Configuration;
use crate::data::OsInfo;
use crate::display::PrintContext;
use crate::format::FormatArg;
use crate::probe::{DetectResult, Probe};
use crate::registry::{create, Module, ModuleDescriptor};
use serde_json::Value;

pub static DESCRIPTOR: ModuleDescriptor = ModuleDescriptor {
    name: "OS",
    description: "Print the operating system name and version",
    create: create::<OsModule>,
    format_args: &[
        ("name", "Name"),
        ("pretty-name", "Pretty name"),
        ("id", "ID"),
        ("id-like", "ID like"),
        ("version", "Version"),
        ("version-id", "Version ID"),
        ("codename", "Version codename"),
        ("arch", "Architecture"),
    ],
};

#[derive(Debug, Clone, Default)]
pub struct OsModule {
    args: ModuleArgs,
}

/// `Arch Linux x86_64`, `Debian GNU/Linux 12 (bookworm) x86_64`
pub fn pretty_os(info: &OsInfo) -> String {
    let mut text = if !info.pretty_name.is_empty() {
        info.pretty_name.clone()
    } else if info.version_id.is_empty() {
        info.name.clone()
    } else {
        format!("{} {}", info.name, info.version_id)
    };
    if !info.architecture.is_empty() {
        text.push(' ');
        text.push_str(&info.architecture);
    }
    text
}

impl Module for OsModule {
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
        let info = match ctx.probe.os() {
            Ok(info) => info,
            Err(e) => return ctx.print_error(DESCRIPTOR.name, 0, &self.args, &e),
        };
        let format_args = [
            FormatArg::Str(&info.name),
            FormatArg::Str(&info.pretty_name),
            FormatArg::Str(&info.id),
            FormatArg::Str(&info.id_like),
            FormatArg::Str(&info.version),
            FormatArg::Str(&info.version_id),
            FormatArg::Str(&info.codename),
            FormatArg::Str(&info.architecture),
        ];
        ctx.print_result(DESCRIPTOR.name, 0, &self.args, &[], &format_args, &pretty_os(&info));
    }

    fn json_result(&self, _config: &Configuration, probe: &dyn Probe) -> Option<DetectResult<Value>> {
        super::json(probe.os())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_name_wins() {
        let info = OsInfo {
            name: "Debian GNU/Linux".into(),
            pretty_name: "Debian GNU/Linux 12 (bookworm)".into(),
            version_id: "12".into(),
            architecture: "x86_64".into(),
            ..OsInfo::default()
        };
        assert_eq!(pretty_os(&info), "Debian GNU/Linux 12 (bookworm) x86_64");
        let bare = OsInfo {
            name: "Gentoo".into(),
            version_id: "2.15".into(),
            ..OsInfo::default()
        };
        assert_eq!(pretty_os(&bare), "Gentoo 2.15");
    }
}
