use crate::config::options::{parse_string, ModuleArgs};
use crate::config::Configuration;
use crate::display::PrintContext;
use crate::error::Result;
use crate::format::FormatArg;
use crate::probe::{DetectResult, Probe};
use crate::registry::{create, Module, ModuleDescriptor};
use serde_json::Value;

pub static DESCRIPTOR: ModuleDescriptor = ModuleDescriptor {
    name: "Disk",
    description: "Print the usage of the file systems holding the given folders",
    create: create::<DiskModule>,
    format_args: &[
        ("size-used", "Size used"),
        ("size-total", "Size total"),
        ("size-percentage", "Size percentage used"),
        ("filesystem", "Filesystem type"),
        ("mountpoint", "Mount point"),
        ("size-available", "Size available to unprivileged users"),
    ],
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskModule {
    args: ModuleArgs,
    /// Semicolon separated mount points
    pub folders: String,
}

impl Default for DiskModule {
    fn default() -> Self {
        DiskModule {
            args: ModuleArgs::default(),
            folders: "/".to_string(),
        }
    }
}

impl DiskModule {
    pub fn folder_list(&self) -> Vec<String> {
        self.folders
            .split(';')
            .map(str::trim)
            .filter(|folder| !folder.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Module for DiskModule {
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

    fn set_option(&mut self, name: &str, key: &str, value: Option<&str>) -> Result<bool> {
        match name {
            "folders" => self.folders = parse_string(key, value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn option_values(&self) -> Vec<(&'static str, Value)> {
        vec![("folders", Value::from(self.folders.as_str()))]
    }

    fn print(&self, ctx: &mut PrintContext<'_>) {
        let disks = match ctx.probe.disks(&self.folder_list()) {
            Ok(disks) => disks,
            Err(e) => return ctx.print_error(DESCRIPTOR.name, 0, &self.args, &e),
        };
        for (position, disk) in disks.iter().enumerate() {
            let index = super::instance_index(position, disks.len());
            let used = super::size(ctx, disk.bytes_used);
            let total = super::size(ctx, disk.bytes_total);
            let percent = super::percent(ctx, disk.percent());
            let mut pretty = format!("{} / {} ({})", used, total, percent);
            if !disk.filesystem.is_empty() {
                pretty.push_str(&format!(" - {}", disk.filesystem));
            }
            let format_args = [
                FormatArg::Text(used),
                FormatArg::Text(total),
                FormatArg::Text(percent),
                FormatArg::Str(&disk.filesystem),
                FormatArg::Str(&disk.mountpoint),
                FormatArg::Text(super::size(ctx, disk.bytes_available)),
            ];
            let key_args = [FormatArg::Str(&disk.mountpoint), FormatArg::Str(&disk.filesystem)];
            ctx.print_result(DESCRIPTOR.name, index, &self.args, &key_args, &format_args, &pretty);
        }
    }

    fn json_result(&self, _config: &Configuration, probe: &dyn Probe) -> Option<DetectResult<Value>> {
        super::json(probe.disks(&self.folder_list()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folders_split_on_semicolons() {
        let mut module = DiskModule::default();
        assert_eq!(module.folder_list(), ["/"]);
        module.parse_flag("--disk-folders", "folders", Some("/; /home;")).unwrap();
        assert_eq!(module.folder_list(), ["/", "/home"]);
        assert_eq!(module.generate_json_config()["folders"], "/; /home;");
    }
}
