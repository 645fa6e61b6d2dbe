use crate::config::options::{parse_bool, parse_color_option, ModuleArgs};
use crate::config::Configuration;
use crate::data::TitleInfo;
use crate::display::PrintContext;
use crate::error::Result;
use crate::format::FormatArg;
use crate::probe::{DetectResult, Probe};
use crate::registry::{create, Module, ModuleDescriptor};
use crate::utils::color::RESET;
use serde_json::Value;

pub static DESCRIPTOR: ModuleDescriptor = ModuleDescriptor {
    name: "Title",
    description: "Print the user name and host name",
    create: create::<TitleModule>,
    format_args: &[
        ("user-name", "User name"),
        ("host-name", "Host name"),
        ("home-dir", "Home directory"),
        ("exe-path", "Executable path of the current process"),
        ("user-shell", "Login shell of the user"),
        ("user-name-colored", "User name, colored"),
        ("at-symbol-colored", "@ symbol, colored"),
        ("host-name-colored", "Host name, colored"),
    ],
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleModule {
    args: ModuleArgs,
    /// Print the fully qualified domain name instead of the host name
    pub fqdn: bool,
    pub color_user: String,
    pub color_at: String,
    pub color_host: String,
}

impl TitleModule {
    fn host<'i>(&self, info: &'i TitleInfo) -> &'i str {
        if self.fqdn && !info.fqdn.is_empty() {
            &info.fqdn
        } else {
            &info.host_name
        }
    }

    /// User name, `@` and host name, each with its color and reset
    fn colored_parts(&self, ctx: &PrintContext<'_>, info: &TitleInfo) -> [String; 3] {
        let fallback = if ctx.config.display.color_title.is_empty() {
            ctx.main_color()
        } else {
            ctx.config.display.color_title.clone()
        };
        let pick = |color: &str| {
            if color.is_empty() {
                ctx.paint(&fallback)
            } else {
                ctx.paint(color)
            }
        };
        let reset = if ctx.colors() { RESET } else { "" };
        let at = if self.color_at.is_empty() { String::new() } else { ctx.paint(&self.color_at) };
        [
            format!("{}{}{}", pick(&self.color_user), info.user_name, reset),
            format!("{}@{}", at, reset),
            format!("{}{}{}", pick(&self.color_host), self.host(info), reset),
        ]
    }

    /// `user@host` with its colors
    pub fn title_text(&self, ctx: &PrintContext<'_>, info: &TitleInfo) -> String {
        self.colored_parts(ctx, info).concat()
    }

    /// Display width of `user@host`, used by Separator
    pub fn title_width(&self, info: &TitleInfo) -> usize {
        use unicode_width::UnicodeWidthStr;
        UnicodeWidthStr::width(info.user_name.as_str()) + 1 + UnicodeWidthStr::width(self.host(info))
    }
}

impl Module for TitleModule {
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
            "fqdn" => self.fqdn = parse_bool(key, value)?,
            "color-user" => self.color_user = parse_color_option(key, value)?,
            "color-at" => self.color_at = parse_color_option(key, value)?,
            "color-host" => self.color_host = parse_color_option(key, value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn option_values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("fqdn", Value::from(self.fqdn)),
            ("color.user", Value::from(self.color_user.as_str())),
            ("color.at", Value::from(self.color_at.as_str())),
            ("color.host", Value::from(self.color_host.as_str())),
        ]
    }

    fn print(&self, ctx: &mut PrintContext<'_>) {
        let info = match ctx.probe.title() {
            Ok(info) => info,
            Err(e) => return ctx.print_error(DESCRIPTOR.name, 0, &self.args, &e),
        };
        if !self.args.output_format.is_empty() {
            let [user, at, host] = self.colored_parts(ctx, &info);
            let format_args = [
                FormatArg::Str(&info.user_name),
                FormatArg::Str(self.host(&info)),
                FormatArg::Str(&info.home_dir),
                FormatArg::Str(&info.exe_path),
                FormatArg::Str(&info.user_shell),
                FormatArg::Text(user),
                FormatArg::Text(at),
                FormatArg::Text(host),
            ];
            return ctx.print_format(&self.args, &format_args);
        }
        let text = self.title_text(ctx, &info);
        if self.args.key.is_empty() {
            ctx.print_line(&text);
        } else {
            ctx.print_key_value(DESCRIPTOR.name, 0, &self.args, &[], &text);
        }
    }

    fn json_result(&self, _config: &Configuration, probe: &dyn Probe) -> Option<DetectResult<Value>> {
        super::json(probe.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::Printer;
    use crate::logo::Logo;

    struct Host;
    impl Probe for Host {
        fn title(&self) -> DetectResult<TitleInfo> {
            Ok(TitleInfo {
                user_name: "ada".into(),
                host_name: "engine".into(),
                fqdn: "engine.example.org".into(),
                ..TitleInfo::default()
            })
        }
    }

    fn print(module: &TitleModule) -> String {
        print_with_colors(module, false)
    }

    fn print_with_colors(module: &TitleModule, colors: bool) -> String {
        let config = Configuration::new();
        let logo = Logo::none();
        let mut out = Vec::new();
        {
            let mut ctx = PrintContext::new(&config, &Host, Printer::new(&mut out, &logo, colors));
            module.print(&mut ctx);
            ctx.into_printer().finish().unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn prints_without_a_key() {
        assert_eq!(print(&TitleModule::default()), "ada@engine\n");
    }

    #[test]
    fn fqdn_replaces_the_host_name() {
        let mut module = TitleModule::default();
        module.parse_flag("--title-fqdn", "fqdn", None).unwrap();
        assert_eq!(print(&module), "ada@engine.example.org\n");
        assert_eq!(module.title_width(&Host.title().unwrap()), 22);
    }

    #[test]
    fn colors_are_written_back_as_nested_objects() {
        let mut module = TitleModule::default();
        module.parse_flag("--title-color-user", "color-user", Some("red")).unwrap();
        let generated = module.generate_json_config();
        assert_eq!(generated["color"]["user"], "31");
    }

    #[test]
    fn colored_parts_are_format_arguments() {
        let mut module = TitleModule::default();
        module.parse_flag("--title-format", "format", Some("{6}{7}{8} in {3}")).unwrap();
        module.parse_flag("--title-color-user", "color-user", Some("red")).unwrap();
        module.parse_flag("--title-color-host", "color-host", Some("blue")).unwrap();
        assert_eq!(print(&module), "ada@engine in \n");
        assert_eq!(
            print_with_colors(&module, true),
            "\x1b[1;31mada\x1b[0m@\x1b[0m\x1b[1;34mengine\x1b[0m in \n"
        );
    }
}
