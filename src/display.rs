//! Low level output: logo column, key column and module lines

use crate::config::options::ModuleArgs;
use crate::config::Configuration;
use crate::format::{format_template, FormatArg};
use crate::logo::Logo;
use crate::probe::Probe;
use crate::utils::color::{sgr, RESET};
use log::{debug, warn};
use std::io::{self, Write};
use unicode_width::UnicodeWidthStr;

/// Writes report lines, each prefixed by the next logo line
pub struct Printer<'a> {
    out: &'a mut dyn Write,
    logo: &'a Logo,
    next_logo_line: usize,
    colors: bool,
    error: Option<io::Error>,
}

impl<'a> Printer<'a> {
    pub fn new(out: &'a mut dyn Write, logo: &'a Logo, colors: bool) -> Self {
        Printer {
            out,
            logo,
            next_logo_line: 0,
            colors,
            error: None,
        }
    }

    pub fn colors(&self) -> bool {
        self.colors
    }

    pub fn logo(&self) -> &Logo {
        self.logo
    }

    /// Write `text` verbatim; the first I/O error is kept for [`Printer::finish`]
    pub fn write_raw(&mut self, text: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.out.write_all(text.as_bytes()) {
            self.error = Some(e);
        }
    }

    /// One report line after the logo column
    pub fn write_line(&mut self, text: &str) {
        let prefix = match self.logo.lines().get(self.next_logo_line) {
            Some(line) => {
                self.next_logo_line += 1;
                line.clone()
            }
            None => " ".repeat(self.logo.width()),
        };
        self.write_raw(&format!("{}{}\n", prefix, text));
    }

    /// Print what is left of the logo and flush
    pub fn finish(mut self) -> io::Result<()> {
        if self.logo.print_remaining() {
            while self.next_logo_line < self.logo.lines().len() {
                let line = self.logo.lines()[self.next_logo_line].trim_end().to_string();
                self.next_logo_line += 1;
                self.write_raw(&format!("{}\n", line));
            }
        }
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()
    }
}

/// Everything a module needs while printing
pub struct PrintContext<'a> {
    pub config: &'a Configuration,
    pub probe: &'a dyn Probe,
    printer: Printer<'a>,
}

impl<'a> PrintContext<'a> {
    pub fn new(config: &'a Configuration, probe: &'a dyn Probe, printer: Printer<'a>) -> Self {
        PrintContext {
            config,
            probe,
            printer,
        }
    }

    pub fn into_printer(self) -> Printer<'a> {
        self.printer
    }

    pub fn colors(&self) -> bool {
        self.printer.colors()
    }

    /// Color used for keys and the title when nothing more specific is set
    pub fn main_color(&self) -> String {
        let configured = &self.config.display.color_keys;
        if configured.is_empty() {
            self.printer.logo().main_color().to_string()
        } else {
            configured.clone()
        }
    }

    /// SGR sequence for `code`, honoring `brightColor`; empty when colors are off
    pub fn paint(&self, code: &str) -> String {
        if !self.colors() || code.is_empty() {
            return String::new();
        }
        if self.config.display.bright_color {
            sgr(&format!("1;{}", code))
        } else {
            sgr(code)
        }
    }

    /// Evaluate a user template, logging what went wrong with it
    pub fn evaluate(&self, template: &str, args: &[FormatArg<'_>]) -> String {
        let formatted = format_template(template, args, self.colors());
        for warning in &formatted.warnings {
            if self.config.display.show_errors {
                warn!("format `{}`: {}", template, warning);
            } else {
                debug!("format `{}`: {}", template, warning);
            }
        }
        formatted.text
    }

    fn key_text(&self, name: &str, index: u32, args: &ModuleArgs, key_args: &[FormatArg<'_>]) -> String {
        if args.key.is_empty() {
            return if index > 0 {
                format!("{} {}", name, index)
            } else {
                name.to_string()
            };
        }
        let mut all = Vec::with_capacity(key_args.len() + 1);
        all.push(FormatArg::Uint(index));
        all.extend(key_args.iter().cloned());
        self.evaluate(&args.key, &all)
    }

    /// Key, separator and padding up to the key width
    fn key_column(&self, name: &str, index: u32, args: &ModuleArgs, key_args: &[FormatArg<'_>]) -> String {
        let key = self.key_text(name, index, args, key_args);
        let display = &self.config.display;
        let color = if args.key_color.is_empty() {
            self.main_color()
        } else {
            args.key_color.clone()
        };

        let painted = self.paint(&color);
        let mut column = if painted.is_empty() {
            key.clone()
        } else {
            format!("{}{}{}", painted, key, RESET)
        };
        column.push_str(&display.separator);

        let width = (if args.key_width > 0 { args.key_width } else { display.key_width }) as usize;
        let used = UnicodeWidthStr::width(key.as_str()) + UnicodeWidthStr::width(display.separator.as_str());
        if width > used {
            column.push_str(&" ".repeat(width - used));
        }
        column
    }

    fn colored_value(&self, args: &ModuleArgs, value: &str) -> String {
        let color = if args.output_color.is_empty() {
            &self.config.display.color_output
        } else {
            &args.output_color
        };
        if !self.colors() || color.is_empty() {
            value.to_string()
        } else {
            format!("{}{}{}", sgr(color), value, RESET)
        }
    }

    /// `<key><separator><value>`
    pub fn print_key_value(
        &mut self,
        name: &str,
        index: u32,
        args: &ModuleArgs,
        key_args: &[FormatArg<'_>],
        value: &str,
    ) {
        let line = format!(
            "{}{}",
            self.key_column(name, index, args, key_args),
            self.colored_value(args, value)
        );
        self.printer.write_line(&line);
    }

    /// Evaluate the user format and print the result without a key
    pub fn print_format(&mut self, args: &ModuleArgs, format_args: &[FormatArg<'_>]) {
        let text = self.evaluate(&args.output_format, format_args);
        let line = self.colored_value(args, &text);
        self.printer.write_line(&line);
    }

    /// The pretty value under a key, or the user format if one is set
    pub fn print_result(
        &mut self,
        name: &str,
        index: u32,
        args: &ModuleArgs,
        key_args: &[FormatArg<'_>],
        format_args: &[FormatArg<'_>],
        pretty: &str,
    ) {
        if args.output_format.is_empty() {
            self.print_key_value(name, index, args, key_args, pretty);
        } else {
            self.print_format(args, format_args);
        }
    }

    /// Detection failure line; hidden when `showErrors` is off
    pub fn print_error(&mut self, name: &str, index: u32, args: &ModuleArgs, message: &str) {
        if !self.config.display.show_errors {
            debug!("{}: {}", name, message);
            return;
        }
        let line = format!("{}{}", self.key_column(name, index, args, &[]), message);
        self.printer.write_line(&line);
    }

    /// A line with no key column
    pub fn print_line(&mut self, text: &str) {
        self.printer.write_line(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::Probe;

    struct Nothing;
    impl Probe for Nothing {}

    fn render(config: &Configuration, logo: &Logo, colors: bool, body: impl FnOnce(&mut PrintContext<'_>)) -> String {
        let mut out = Vec::new();
        {
            let printer = Printer::new(&mut out, logo, colors);
            let mut ctx = PrintContext::new(config, &Nothing, printer);
            body(&mut ctx);
            ctx.into_printer().finish().unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn default_key_and_index_suffix() {
        let config = Configuration::new();
        let args = ModuleArgs::default();
        let text = render(&config, &Logo::none(), false, |ctx| {
            ctx.print_key_value("Disk", 0, &args, &[], "1 GiB");
            ctx.print_key_value("Disk", 2, &args, &[], "2 GiB");
        });
        assert_eq!(text, "Disk: 1 GiB\nDisk 2: 2 GiB\n");
    }

    #[test]
    fn key_templates_get_the_index_first() {
        let config = Configuration::new();
        let args = ModuleArgs::with_key("GPU #{1} ({2})");
        let text = render(&config, &Logo::none(), false, |ctx| {
            ctx.print_key_value("GPU", 1, &args, &[FormatArg::Str("AMD")], "Radeon");
        });
        assert_eq!(text, "GPU #1 (AMD): Radeon\n");
    }

    #[test]
    fn key_width_pads_after_the_separator() {
        let mut config = Configuration::new();
        config.display.key_width = 8;
        let args = ModuleArgs::default();
        let text = render(&config, &Logo::none(), false, |ctx| {
            ctx.print_key_value("OS", 0, &args, &[], "Arch");
        });
        assert_eq!(text, "OS:     Arch\n");
    }

    #[test]
    fn keys_are_painted_when_colors_are_on() {
        let mut config = Configuration::new();
        config.display.bright_color = false;
        let args = ModuleArgs {
            key_color: "31".to_string(),
            ..ModuleArgs::default()
        };
        let text = render(&config, &Logo::none(), true, |ctx| {
            ctx.print_key_value("OS", 0, &args, &[], "Arch");
        });
        assert_eq!(text, "\x1b[31mOS\x1b[0m: Arch\n");
    }

    #[test]
    fn format_replaces_the_key_column() {
        let config = Configuration::new();
        let mut args = ModuleArgs::default();
        args.output_format = "{2} on {1}".to_string();
        let text = render(&config, &Logo::none(), false, |ctx| {
            ctx.print_result("OS", 0, &args, &[], &[FormatArg::Str("x86_64"), FormatArg::Str("Arch")], "unused");
        });
        assert_eq!(text, "Arch on x86_64\n");
    }

    #[test]
    fn hidden_errors() {
        let mut config = Configuration::new();
        let args = ModuleArgs::default();
        let shown = render(&config, &Logo::none(), false, |ctx| ctx.print_error("Swap", 0, &args, "nope"));
        assert_eq!(shown, "Swap: nope\n");
        config.display.show_errors = false;
        let hidden = render(&config, &Logo::none(), false, |ctx| ctx.print_error("Swap", 0, &args, "nope"));
        assert_eq!(hidden, "");
    }

    #[test]
    fn logo_column_and_remaining_lines() {
        let config = Configuration::new();
        let options = crate::config::LogoOptions {
            padding_right: 1,
            ..Default::default()
        };
        let logo = Logo::from_art("AA\nBB\nCC", &[], &options, false);
        let text = render(&config, &logo, false, |ctx| ctx.print_line("one"));
        assert_eq!(text, "AA one\nBB\nCC\n");

        let long = render(&config, &logo, false, |ctx| {
            for line in ["1", "2", "3", "4"] {
                ctx.print_line(line);
            }
        });
        assert_eq!(long, "AA 1\nBB 2\nCC 3\n   4\n");
    }
}
