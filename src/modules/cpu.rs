use crate::config::options::{parse_bool, ModuleArgs};
use crate::config::Configuration;
use crate::data::CpuInfo;
use crate::display::PrintContext;
use crate::error::Result;
use crate::format::FormatArg;
use crate::probe::{DetectResult, Probe};
use crate::registry::{create, Module, ModuleDescriptor};
use serde_json::{json, Value};

pub static DESCRIPTOR: ModuleDescriptor = ModuleDescriptor {
    name: "CPU",
    description: "Print the CPU name, core count and frequency",
    create: create::<CpuModule>,
    format_args: &[
        ("name", "Name"),
        ("vendor", "Vendor"),
        ("cores-physical", "Physical core count"),
        ("cores-logical", "Logical core count"),
        ("freq-max", "Max frequency in GHz"),
        ("temperature", "Temperature (requires `--cpu-temp`)"),
    ],
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CpuModule {
    args: ModuleArgs,
    /// Append the package temperature
    pub temp: bool,
}

fn pretty_cpu(info: &CpuInfo) -> String {
    let mut text = info.name.clone();
    if info.cores_logical > 0 {
        text.push_str(&format!(" ({})", info.cores_logical));
    }
    if info.frequency_max > 0.0 {
        text.push_str(&format!(" @ {:.2} GHz", info.frequency_max));
    }
    text
}

impl Module for CpuModule {
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
            "temp" => self.temp = parse_bool(key, value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn option_values(&self) -> Vec<(&'static str, Value)> {
        vec![("temp", Value::from(self.temp))]
    }

    fn print(&self, ctx: &mut PrintContext<'_>) {
        let info = match ctx.probe.cpu() {
            Ok(info) => info,
            Err(e) => return ctx.print_error(DESCRIPTOR.name, 0, &self.args, &e),
        };
        let temperature = if self.temp {
            ctx.probe.cpu_temperature().ok()
        } else {
            None
        };
        let temperature_text = temperature
            .map(|celsius| super::temperature(ctx, celsius))
            .unwrap_or_default();

        let format_args = [
            FormatArg::Str(&info.name),
            FormatArg::Str(&info.vendor),
            FormatArg::Uint(info.cores_physical),
            FormatArg::Uint(info.cores_logical),
            FormatArg::Double(info.frequency_max),
            FormatArg::Str(&temperature_text),
        ];
        let mut pretty = pretty_cpu(&info);
        if !temperature_text.is_empty() {
            pretty.push_str(" - ");
            pretty.push_str(&temperature_text);
        }
        ctx.print_result(DESCRIPTOR.name, 0, &self.args, &[], &format_args, &pretty);
    }

    fn json_result(&self, _config: &Configuration, probe: &dyn Probe) -> Option<DetectResult<Value>> {
        let mut result = super::json(probe.cpu())?;
        if self.temp {
            if let Ok(Value::Object(object)) = &mut result {
                let temperature = probe.cpu_temperature().ok();
                object.insert("temperature".to_string(), json!(temperature));
            }
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cores_and_frequency() {
        let info = CpuInfo {
            name: "AMD Ryzen 7 5800X".into(),
            cores_logical: 16,
            frequency_max: 4.85,
            ..CpuInfo::default()
        };
        assert_eq!(pretty_cpu(&info), "AMD Ryzen 7 5800X (16) @ 4.85 GHz");
    }
}
