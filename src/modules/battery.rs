use crate::config::options::{parse_bool, ModuleArgs};
use crate::config::Configuration;
use crate::data::BatteryInfo;
use crate::display::PrintContext;
use crate::error::Result;
use crate::format::FormatArg;
use crate::probe::{DetectResult, Probe};
use crate::registry::{create, Module, ModuleDescriptor};
use serde_json::Value;

pub static DESCRIPTOR: ModuleDescriptor = ModuleDescriptor {
    name: "Battery",
    description: "Print the charge and status of each battery",
    create: create::<BatteryModule>,
    format_args: &[
        ("manufacturer", "Battery manufacturer"),
        ("model-name", "Battery model name"),
        ("capacity", "Battery capacity (percentage)"),
        ("status", "Battery status"),
        ("temperature", "Battery temperature (requires `--battery-temp`)"),
        ("name", "Battery device name"),
    ],
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatteryModule {
    args: ModuleArgs,
    pub temp: bool,
}

impl BatteryModule {
    fn pretty(&self, battery: &BatteryInfo, capacity: &str, temperature: &str) -> String {
        let mut text = capacity.to_string();
        if !battery.status.is_empty() {
            text.push_str(&format!(" [{}]", battery.status));
        }
        if !temperature.is_empty() {
            text.push_str(&format!(" - {}", temperature));
        }
        text
    }
}

impl Module for BatteryModule {
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
        let batteries = match ctx.probe.batteries() {
            Ok(batteries) => batteries,
            Err(e) => return ctx.print_error(DESCRIPTOR.name, 0, &self.args, &e),
        };
        for (position, battery) in batteries.iter().enumerate() {
            let index = super::instance_index(position, batteries.len());
            let capacity = super::percent(ctx, battery.capacity);
            let temperature = match battery.temperature {
                Some(celsius) if self.temp => super::temperature(ctx, celsius),
                _ => String::new(),
            };
            let pretty = self.pretty(battery, &capacity, &temperature);
            let format_args = [
                FormatArg::Str(&battery.manufacturer),
                FormatArg::Str(&battery.model_name),
                FormatArg::Text(capacity),
                FormatArg::Str(&battery.status),
                FormatArg::Text(temperature),
                FormatArg::Str(&battery.name),
            ];
            let key_args = [FormatArg::Str(&battery.name)];
            ctx.print_result(DESCRIPTOR.name, index, &self.args, &key_args, &format_args, &pretty);
        }
    }

    fn json_result(&self, _config: &Configuration, probe: &dyn Probe) -> Option<DetectResult<Value>> {
        super::json(probe.batteries())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_and_temperature() {
        let battery = BatteryInfo {
            status: "Charging".into(),
            ..BatteryInfo::default()
        };
        let module = BatteryModule::default();
        assert_eq!(module.pretty(&battery, "80%", ""), "80% [Charging]");
        assert_eq!(module.pretty(&battery, "80%", "30.1°C"), "80% [Charging] - 30.1°C");
    }
}
