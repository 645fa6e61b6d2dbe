use crate::config::options::{parse_bool, ModuleArgs};
use crate::config::Configuration;
use crate::data::{GpuInfo, GpuType};
use crate::display::PrintContext;
use crate::error::Result;
use crate::format::FormatArg;
use crate::probe::{DetectResult, Probe};
use crate::registry::{create, Module, ModuleDescriptor};
use serde_json::Value;

pub static DESCRIPTOR: ModuleDescriptor = ModuleDescriptor {
    name: "GPU",
    description: "Print every graphics card, discrete ones first",
    create: create::<GpuModule>,
    format_args: &[
        ("vendor", "GPU vendor"),
        ("name", "GPU name"),
        ("type", "GPU type (Integrated or Discrete)"),
    ],
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GpuModule {
    args: ModuleArgs,
    /// Drop the `[Integrated]` / `[Discrete]` suffix
    pub hide_type: bool,
}

impl GpuModule {
    fn pretty(&self, gpu: &GpuInfo) -> String {
        let mut text = if gpu.vendor.is_empty() || gpu.name.starts_with(&gpu.vendor) {
            gpu.name.clone()
        } else {
            format!("{} {}", gpu.vendor, gpu.name)
        };
        if !self.hide_type && gpu.gpu_type != GpuType::Unknown {
            text.push_str(&format!(" [{}]", gpu.gpu_type.as_str()));
        }
        text
    }
}

impl Module for GpuModule {
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
            "hide-type" => self.hide_type = parse_bool(key, value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn option_values(&self) -> Vec<(&'static str, Value)> {
        vec![("hideType", Value::from(self.hide_type))]
    }

    fn print(&self, ctx: &mut PrintContext<'_>) {
        let gpus = match ctx.probe.gpus() {
            Ok(gpus) => gpus,
            Err(e) => return ctx.print_error(DESCRIPTOR.name, 0, &self.args, &e),
        };
        for (position, gpu) in gpus.iter().enumerate() {
            let index = super::instance_index(position, gpus.len());
            let format_args = [
                FormatArg::Str(&gpu.vendor),
                FormatArg::Str(&gpu.name),
                FormatArg::Str(gpu.gpu_type.as_str()),
            ];
            let key_args = [FormatArg::Str(&gpu.name)];
            ctx.print_result(DESCRIPTOR.name, index, &self.args, &key_args, &format_args, &self.pretty(gpu));
        }
    }

    fn json_result(&self, _config: &Configuration, probe: &dyn Probe) -> Option<DetectResult<Value>> {
        super::json(probe.gpus())
    }
}
