use super::TitleModule;
use crate::config::options::{parse_string, parse_u32, ModuleArgs};
use crate::display::PrintContext;
use crate::error::Result;
use crate::registry::{create, Module, ModuleDescriptor};
use serde_json::Value;
use unicode_width::UnicodeWidthStr;

pub static DESCRIPTOR: ModuleDescriptor = ModuleDescriptor {
    name: "Separator",
    description: "Print a separator line, as wide as the title by default",
    create: create::<SeparatorModule>,
    format_args: &[],
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeparatorModule {
    args: ModuleArgs,
    pub string: String,
    /// Zero follows the title width
    pub length: u32,
}

impl Default for SeparatorModule {
    fn default() -> Self {
        SeparatorModule {
            args: ModuleArgs::default(),
            string: "-".to_string(),
            length: 0,
        }
    }
}

impl SeparatorModule {
    /// `string` repeated until `width` columns are filled
    pub fn line(&self, width: usize) -> String {
        let unit = UnicodeWidthStr::width(self.string.as_str());
        if unit == 0 {
            return String::new();
        }
        let mut line = self.string.repeat(width / unit);
        // Fill the rest with a prefix of the string
        let mut used = (width / unit) * unit;
        for c in self.string.chars() {
            let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
            if used + w > width {
                break;
            }
            line.push(c);
            used += w;
        }
        line
    }
}

impl Module for SeparatorModule {
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
            "string" => self.string = parse_string(key, value)?,
            "length" => self.length = parse_u32(key, value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn option_values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("string", Value::from(self.string.as_str())),
            ("length", Value::from(self.length)),
        ]
    }

    fn print(&self, ctx: &mut PrintContext<'_>) {
        let width = if self.length > 0 {
            self.length as usize
        } else {
            match ctx.probe.title() {
                Ok(info) => TitleModule::default().title_width(&info),
                Err(_) => 0,
            }
        };
        let line = self.line(width);
        let painted = ctx.paint(&self.args.output_color);
        if painted.is_empty() {
            ctx.print_line(&line);
        } else {
            ctx.print_line(&format!("{}{}{}", painted, line, crate::utils::color::RESET));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeats_to_the_width() {
        let module = SeparatorModule::default();
        assert_eq!(module.line(5), "-----");
        let module = SeparatorModule {
            string: "=-".to_string(),
            ..SeparatorModule::default()
        };
        assert_eq!(module.line(5), "=-=-=");
    }

    #[test]
    fn fills_by_display_width() {
        let module = SeparatorModule {
            string: "─━".to_string(),
            ..SeparatorModule::default()
        };
        assert_eq!(module.line(3), "─━─");
        let module = SeparatorModule {
            string: "世".to_string(),
            ..SeparatorModule::default()
        };
        // Two columns per character; a half cell is left empty
        assert_eq!(module.line(5), "世世");
        let module = SeparatorModule {
            string: "世-".to_string(),
            ..SeparatorModule::default()
        };
        assert_eq!(module.line(7), "世-世-");
    }
}
