//! Walks the structure and prints every entry in order

use crate::config::options::ModuleArgs;
use crate::config::{Configuration, OutputMode, StructureEntry};
use crate::display::{PrintContext, Printer};
use crate::error::Result;
use crate::logo::Logo;
use crate::probe::Probe;
use log::debug;
use serde_json::{Map, Value};
use std::io::Write;
use std::time::Instant;

const UNKNOWN_MODULE: &str = "Unknown module";

/// Print the report for `config`. `colors` turns escape sequences on; the
/// caller decides it from `--pipe` and whether stdout is a terminal.
pub fn render(
    config: &Configuration,
    probe: &dyn Probe,
    logo: &Logo,
    out: &mut dyn Write,
    colors: bool,
) -> Result<()> {
    let structure = config.effective_structure();

    if config.general.multithreading {
        let names: Vec<&str> = structure
            .iter()
            .filter_map(|entry| match entry {
                StructureEntry::Module(module) => Some(module.name()),
                StructureEntry::Unknown(_) => None,
            })
            .collect();
        probe.prewarm(&names);
    }

    if config.output == OutputMode::Json {
        return render_json(config, probe, &structure, out);
    }

    let display = &config.display;
    let mut printer = Printer::new(out, logo, colors);
    if colors {
        if display.hide_cursor {
            printer.write_raw("\x1b[?25l");
        }
        if display.disable_linewrap {
            printer.write_raw("\x1b[?7l");
        }
    }

    let mut ctx = PrintContext::new(config, probe, printer);
    for entry in &structure {
        let start = Instant::now();
        match entry {
            StructureEntry::Module(module) => {
                module.print(&mut ctx);
                debug!("printed {} in {:?}", module.name(), start.elapsed());
            }
            StructureEntry::Unknown(name) => {
                ctx.print_error(name, 0, &ModuleArgs::default(), UNKNOWN_MODULE)
            }
        }
    }

    let mut printer = ctx.into_printer();
    if colors {
        if display.disable_linewrap {
            printer.write_raw("\x1b[?7h");
        }
        if display.hide_cursor {
            printer.write_raw("\x1b[?25h");
        }
    }
    printer.finish()?;
    Ok(())
}

/// `--format json`: one array with an object per entry that has data
fn render_json(
    config: &Configuration,
    probe: &dyn Probe,
    structure: &[StructureEntry],
    out: &mut dyn Write,
) -> Result<()> {
    let mut items = Vec::with_capacity(structure.len());
    for entry in structure {
        let (name, result) = match entry {
            StructureEntry::Module(module) => match module.json_result(config, probe) {
                Some(result) => (module.name().to_string(), result),
                None => continue,
            },
            StructureEntry::Unknown(name) => (name.clone(), Err(UNKNOWN_MODULE.to_string())),
        };
        let mut item = Map::new();
        item.insert("type".to_string(), Value::from(name));
        match result {
            Ok(value) => item.insert("result".to_string(), value),
            Err(message) => item.insert("error".to_string(), Value::from(message)),
        };
        items.push(Value::Object(item));
    }

    let text = serde_json::to_string_pretty(&Value::Array(items))?;
    writeln!(out, "{}", text)?;
    out.flush()?;
    Ok(())
}
