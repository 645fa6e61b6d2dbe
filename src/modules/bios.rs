use crate::config::options::ModuleArgs;
use crate::config::Configuration;
use crate::data::BiosInfo;
use crate::display::PrintContext;
use crate::format::FormatArg;
use crate::probe::{DetectResult, Probe};
use crate::registry::{create, Module, ModuleDescriptor};
use serde_json::Value;

pub static DESCRIPTOR: ModuleDescriptor = ModuleDescriptor {
    name: "BIOS",
    description: "Print the firmware version and type",
    create: create::<BiosModule>,
    format_args: &[
        ("date", "Bios date"),
        ("release", "Bios release"),
        ("vendor", "Bios vendor"),
        ("version", "Bios version"),
        ("type", "Firmware type"),
    ],
};

#[derive(Debug, Clone, Default)]
pub struct BiosModule {
    args: ModuleArgs,
}

fn pretty(bios: &BiosInfo) -> String {
    let version = if bios.version.is_empty() { &bios.vendor } else { &bios.version };
    if bios.kind.is_empty() {
        version.clone()
    } else {
        format!("{} ({})", version, bios.kind)
    }
}

impl Module for BiosModule {
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
        let bios = match ctx.probe.bios() {
            Ok(bios) => bios,
            Err(e) => return ctx.print_error(DESCRIPTOR.name, 0, &self.args, &e),
        };
        let format_args = [
            FormatArg::Str(&bios.date),
            FormatArg::Str(&bios.release),
            FormatArg::Str(&bios.vendor),
            FormatArg::Str(&bios.version),
            FormatArg::Str(&bios.kind),
        ];
        ctx.print_result(DESCRIPTOR.name, 0, &self.args, &[], &format_args, &pretty(&bios));
    }

    fn json_result(&self, _config: &Configuration, probe: &dyn Probe) -> Option<DetectResult<Value>> {
        super::json(probe.bios())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_with_firmware_type() {
        let mut bios = BiosInfo {
            vendor: "LENOVO".into(),
            version: "N3HET87W (1.59 )".into(),
            kind: "UEFI".into(),
            ..BiosInfo::default()
        };
        assert_eq!(pretty(&bios), "N3HET87W (1.59 ) (UEFI)");
        bios.version.clear();
        bios.kind.clear();
        assert_eq!(pretty(&bios), "LENOVO");
    }
}
