use crate::config::options::{parse_bool, ModuleArgs};
use crate::config::Configuration;
use crate::data::DisplayInfo;
use crate::display::PrintContext;
use crate::error::Result;
use crate::format::FormatArg;
use crate::probe::{DetectResult, Probe};
use crate::registry::{create, Module, ModuleDescriptor};
use serde_json::Value;

pub static DESCRIPTOR: ModuleDescriptor = ModuleDescriptor {
    name: "Display",
    description: "Print the resolution and refresh rate of each connected display",
    create: create::<DisplayModule>,
    format_args: &[
        ("width", "Screen width (in pixels)"),
        ("height", "Screen height (in pixels)"),
        ("refresh-rate", "Refresh rate (in Hz)"),
        ("name", "Display name"),
        ("type", "Display type (built-in or external)"),
        ("is-primary", "True if the display is primary"),
    ],
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayModule {
    args: ModuleArgs,
    pub precise_refresh_rate: bool,
}

impl DisplayModule {
    fn refresh_rate(&self, hz: f64) -> String {
        if self.precise_refresh_rate {
            let text = format!("{:.3}", hz);
            text.trim_end_matches('0').trim_end_matches('.').to_string()
        } else {
            format!("{}", hz.round())
        }
    }

    fn pretty(&self, display: &DisplayInfo) -> String {
        let mut text = format!("{}x{}", display.width, display.height);
        if display.refresh_rate > 0.0 {
            text.push_str(&format!(" @ {} Hz", self.refresh_rate(display.refresh_rate)));
        }
        if display.kind == "built-in" {
            text.push_str(" [Built-in]");
        }
        text
    }
}

impl Module for DisplayModule {
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
            "precise-refresh-rate" => self.precise_refresh_rate = parse_bool(key, value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn option_values(&self) -> Vec<(&'static str, Value)> {
        vec![("preciseRefreshRate", Value::from(self.precise_refresh_rate))]
    }

    fn print(&self, ctx: &mut PrintContext<'_>) {
        let displays = match ctx.probe.displays() {
            Ok(displays) => displays,
            Err(e) => return ctx.print_error(DESCRIPTOR.name, 0, &self.args, &e),
        };
        for (position, display) in displays.iter().enumerate() {
            let index = super::instance_index(position, displays.len());
            let format_args = [
                FormatArg::Uint(display.width),
                FormatArg::Uint(display.height),
                FormatArg::Double(display.refresh_rate),
                FormatArg::Str(&display.name),
                FormatArg::Str(&display.kind),
                FormatArg::Str(if display.primary { "true" } else { "" }),
            ];
            let key_args = [FormatArg::Str(&display.name), FormatArg::Str(&display.kind)];
            let pretty = self.pretty(display);
            ctx.print_result(DESCRIPTOR.name, index, &self.args, &key_args, &format_args, &pretty);
        }
    }

    fn json_result(&self, _config: &Configuration, probe: &dyn Probe) -> Option<DetectResult<Value>> {
        super::json(probe.displays())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::Printer;
    use crate::logo::Logo;

    struct Desk;
    impl Probe for Desk {
        fn displays(&self) -> DetectResult<Vec<DisplayInfo>> {
            Ok(vec![
                DisplayInfo {
                    name: "eDP-1".into(),
                    width: 2880,
                    height: 1800,
                    refresh_rate: 120.0,
                    kind: "built-in".into(),
                    primary: true,
                },
                DisplayInfo {
                    name: "DP-2".into(),
                    width: 3840,
                    height: 2160,
                    refresh_rate: 59.997,
                    kind: "external".into(),
                    primary: false,
                },
            ])
        }
    }

    fn print(module: &DisplayModule) -> String {
        let config = Configuration::new();
        let logo = Logo::none();
        let mut out = Vec::new();
        {
            let mut ctx = PrintContext::new(&config, &Desk, Printer::new(&mut out, &logo, false));
            module.print(&mut ctx);
            ctx.into_printer().finish().unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn one_line_per_display() {
        assert_eq!(
            print(&DisplayModule::default()),
            "Display 1: 2880x1800 @ 120 Hz [Built-in]\nDisplay 2: 3840x2160 @ 60 Hz\n"
        );
    }

    #[test]
    fn precise_refresh_rate_is_a_json_option() {
        let mut module = DisplayModule::default();
        module
            .parse_flag("--display-precise-refresh-rate", "precise-refresh-rate", Some("true"))
            .unwrap();
        assert_eq!(module.refresh_rate(59.997), "59.997");
        assert_eq!(module.refresh_rate(120.0), "120");
        assert_eq!(module.generate_json_config()["preciseRefreshRate"], true);
        assert!(DisplayModule::default().generate_json_config().is_empty());
    }

    #[test]
    fn key_can_name_the_connector() {
        let mut module = DisplayModule::default();
        module.parse_flag("--display-key", "key", Some("Display ({2})")).unwrap();
        module.parse_flag("--display-format", "format", Some("{1}x{2}")).unwrap();
        assert_eq!(print(&module), "Display (eDP-1): 2880x1800\nDisplay (DP-2): 3840x2160\n");
    }
}
