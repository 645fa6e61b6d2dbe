use crate::config::options::{enum_name, parse_enum, parse_u32, ModuleArgs};
use crate::display::PrintContext;
use crate::error::Result;
use crate::registry::{create, Module, ModuleDescriptor};
use crate::utils::color::RESET;
use serde_json::Value;

pub static DESCRIPTOR: ModuleDescriptor = ModuleDescriptor {
    name: "Colors",
    description: "Print the eight terminal colors",
    create: create::<ColorsModule>,
    format_args: &[],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSymbol {
    #[default]
    Block,
    Circle,
}

const SYMBOLS: &[(&str, ColorSymbol)] = &[("block", ColorSymbol::Block), ("circle", ColorSymbol::Circle)];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorsModule {
    args: ModuleArgs,
    pub symbol: ColorSymbol,
    pub padding_left: u32,
}

impl ColorsModule {
    /// Two rows: normal then bright colors
    pub fn rows(&self) -> [String; 2] {
        let symbol = match self.symbol {
            ColorSymbol::Block => "███",
            ColorSymbol::Circle => "● ",
        };
        let padding = " ".repeat(self.padding_left as usize);
        let row = |base: u32| {
            let mut line = padding.clone();
            for i in 0..8 {
                line.push_str(&format!("\x1b[{}m{}", base + i, symbol));
            }
            line.push_str(RESET);
            line
        };
        [row(30), row(90)]
    }
}

impl Module for ColorsModule {
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
            "symbol" => self.symbol = parse_enum(key, value, SYMBOLS)?,
            "padding-left" => self.padding_left = parse_u32(key, value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn option_values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("symbol", Value::from(enum_name(SYMBOLS, &self.symbol))),
            ("paddingLeft", Value::from(self.padding_left)),
        ]
    }

    fn print(&self, ctx: &mut PrintContext<'_>) {
        // Nothing to show without escape sequences
        if !ctx.colors() {
            return;
        }
        for row in self.rows() {
            ctx.print_line(&row);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_cover_normal_and_bright() {
        let module = ColorsModule {
            padding_left: 2,
            ..ColorsModule::default()
        };
        let [normal, bright] = module.rows();
        assert!(normal.starts_with("  \x1b[30m███"));
        assert!(bright.contains("\x1b[97m███"));
    }

    #[test]
    fn symbol_round_trips_through_json() {
        let mut module = ColorsModule::default();
        module.parse_flag("--colors-symbol", "symbol", Some("Circle")).unwrap();
        assert_eq!(module.generate_json_config()["symbol"], "circle");
    }
}
