use crate::config::options::ModuleArgs;
use crate::config::Configuration;
use crate::data::HostInfo;
use crate::display::PrintContext;
use crate::format::FormatArg;
use crate::probe::{DetectResult, Probe};
use crate::registry::{create, Module, ModuleDescriptor};
use serde_json::Value;

pub static DESCRIPTOR: ModuleDescriptor = ModuleDescriptor {
    name: "Host",
    description: "Print the product name of the machine",
    create: create::<HostModule>,
    format_args: &[
        ("family", "Product family"),
        ("name", "Product name"),
        ("version", "Product version"),
        ("sku", "Product SKU"),
        ("vendor", "Product vendor"),
    ],
};

#[derive(Debug, Clone, Default)]
pub struct HostModule {
    args: ModuleArgs,
}

fn pretty_host(info: &HostInfo) -> String {
    if info.product_version.is_empty() || info.product_name.contains(&info.product_version) {
        info.product_name.clone()
    } else {
        format!("{} ({})", info.product_name, info.product_version)
    }
}

impl Module for HostModule {
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
        let info = match ctx.probe.host() {
            Ok(info) => info,
            Err(e) => return ctx.print_error(DESCRIPTOR.name, 0, &self.args, &e),
        };
        let format_args = [
            FormatArg::Str(&info.product_family),
            FormatArg::Str(&info.product_name),
            FormatArg::Str(&info.product_version),
            FormatArg::Str(&info.product_sku),
            FormatArg::Str(&info.sys_vendor),
        ];
        ctx.print_result(DESCRIPTOR.name, 0, &self.args, &[], &format_args, &pretty_host(&info));
    }

    fn json_result(&self, _config: &Configuration, probe: &dyn Probe) -> Option<DetectResult<Value>> {
        super::json(probe.host())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_appended_once() {
        let mut info = HostInfo {
            product_name: "ThinkPad X1".into(),
            product_version: "Gen 9".into(),
            ..HostInfo::default()
        };
        assert_eq!(pretty_host(&info), "ThinkPad X1 (Gen 9)");
        info.product_name = "ThinkPad X1 Gen 9".into();
        assert_eq!(pretty_host(&info), "ThinkPad X1 Gen 9");
    }
}
