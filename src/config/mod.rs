//! Run configuration
//!
//! A [`Configuration`] is built once in `main` from config files and flags,
//! then handed by reference to the renderer. Nothing here is global.

pub mod flags;
pub mod json;
pub mod jsonc;
pub mod loader;
pub mod options;

use crate::error::Result;
use crate::registry::{self, Module, ModuleDescriptor};
use log::warn;
use options::{
    enum_name, parse_bool, parse_color_option, parse_enum, parse_i32, parse_string, parse_u32,
    parse_u8, OptionSection,
};
use serde_json::Value;
use std::collections::BTreeMap;

pub const DEFAULT_STRUCTURE: &str = "Title;Separator;OS;Host;Kernel;Uptime;Packages;Shell;WM;\
                                     Terminal;CPU;GPU;Memory;Swap;Disk;Battery;Break;Colors";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Default,
    Json,
}

pub const OUTPUT_MODES: &[(&str, OutputMode)] =
    &[("default", OutputMode::Default), ("json", OutputMode::Json)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BinaryPrefix {
    #[default]
    Iec,
    Si,
    Jedec,
}

pub const BINARY_PREFIXES: &[(&str, BinaryPrefix)] = &[
    ("iec", BinaryPrefix::Iec),
    ("si", BinaryPrefix::Si),
    ("jedec", BinaryPrefix::Jedec),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
    Kelvin,
}

pub const TEMPERATURE_UNITS: &[(&str, TemperatureUnit)] = &[
    ("C", TemperatureUnit::Celsius),
    ("F", TemperatureUnit::Fahrenheit),
    ("K", TemperatureUnit::Kelvin),
    ("celsius", TemperatureUnit::Celsius),
    ("fahrenheit", TemperatureUnit::Fahrenheit),
    ("kelvin", TemperatureUnit::Kelvin),
];

/// Largest unit `format_size` may scale to, as an index into its unit table
pub const SIZE_PREFIXES: &[(&str, u8)] = &[
    ("B", 0),
    ("kB", 1),
    ("MB", 2),
    ("GB", 3),
    ("TB", 4),
    ("PB", 5),
    ("EB", 6),
    ("ZB", 7),
    ("YB", 8),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogoType {
    #[default]
    Auto,
    Builtin,
    File,
    Data,
    None,
}

pub const LOGO_TYPES: &[(&str, LogoType)] = &[
    ("auto", LogoType::Auto),
    ("builtin", LogoType::Builtin),
    ("file", LogoType::File),
    ("data", LogoType::Data),
    ("none", LogoType::None),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneralOptions {
    pub multithreading: bool,
    /// Milliseconds a spawned helper process may run
    pub processing_timeout: i32,
    /// Replaces `/etc/os-release` when non-empty
    pub os_file: String,
}

impl Default for GeneralOptions {
    fn default() -> Self {
        GeneralOptions {
            multithreading: true,
            processing_timeout: 1000,
            os_file: String::new(),
        }
    }
}

impl OptionSection for GeneralOptions {
    fn set(&mut self, name: &str, key: &str, value: Option<&str>) -> Result<bool> {
        match name {
            "thread" | "multithreading" => self.multithreading = parse_bool(key, value)?,
            "processing-timeout" => self.processing_timeout = parse_i32(key, value)?,
            "os-file" => self.os_file = parse_string(key, value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("thread", Value::from(self.multithreading)),
            ("processingTimeout", Value::from(self.processing_timeout)),
            ("osFile", Value::from(self.os_file.as_str())),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayOptions {
    pub show_errors: bool,
    pub pipe: bool,
    pub disable_linewrap: bool,
    pub hide_cursor: bool,
    pub separator: String,
    pub color_keys: String,
    pub color_title: String,
    pub color_output: String,
    pub bright_color: bool,
    pub key_width: u32,
    pub binary_prefix: BinaryPrefix,
    pub size_ndigits: u8,
    pub size_max_prefix: u8,
    pub temperature_unit: TemperatureUnit,
    pub temperature_ndigits: u8,
    pub percent_ndigits: u8,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        DisplayOptions {
            show_errors: true,
            pipe: false,
            disable_linewrap: true,
            hide_cursor: true,
            separator: ": ".to_string(),
            color_keys: String::new(),
            color_title: String::new(),
            color_output: String::new(),
            bright_color: true,
            key_width: 0,
            binary_prefix: BinaryPrefix::Iec,
            size_ndigits: 2,
            size_max_prefix: 8,
            temperature_unit: TemperatureUnit::Celsius,
            temperature_ndigits: 1,
            percent_ndigits: 0,
        }
    }
}

impl OptionSection for DisplayOptions {
    fn set(&mut self, name: &str, key: &str, value: Option<&str>) -> Result<bool> {
        match name {
            "show-errors" => self.show_errors = parse_bool(key, value)?,
            "pipe" => self.pipe = parse_bool(key, value)?,
            "disable-linewrap" => self.disable_linewrap = parse_bool(key, value)?,
            "hide-cursor" => self.hide_cursor = parse_bool(key, value)?,
            "separator" => self.separator = parse_string(key, value)?,
            "color" => {
                let color = parse_color_option(key, value)?;
                self.color_keys = color.clone();
                self.color_title = color;
            }
            "color-keys" => self.color_keys = parse_color_option(key, value)?,
            "color-title" => self.color_title = parse_color_option(key, value)?,
            "color-output" => self.color_output = parse_color_option(key, value)?,
            "bright-color" => self.bright_color = parse_bool(key, value)?,
            "key-width" => self.key_width = parse_u32(key, value)?,
            "binary-prefix" | "size-binary-prefix" => {
                self.binary_prefix = parse_enum(key, value, BINARY_PREFIXES)?
            }
            "size-ndigits" => self.size_ndigits = parse_u8(key, value)?,
            "size-max-prefix" => self.size_max_prefix = parse_enum(key, value, SIZE_PREFIXES)?,
            "temperature-unit" | "temp-unit" => {
                self.temperature_unit = parse_enum(key, value, TEMPERATURE_UNITS)?
            }
            "temperature-ndigits" | "temp-ndigits" => {
                self.temperature_ndigits = parse_u8(key, value)?
            }
            "percent-ndigits" => self.percent_ndigits = parse_u8(key, value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("showErrors", Value::from(self.show_errors)),
            ("pipe", Value::from(self.pipe)),
            ("disableLinewrap", Value::from(self.disable_linewrap)),
            ("hideCursor", Value::from(self.hide_cursor)),
            ("separator", Value::from(self.separator.as_str())),
            ("color.keys", Value::from(self.color_keys.as_str())),
            ("color.title", Value::from(self.color_title.as_str())),
            ("color.output", Value::from(self.color_output.as_str())),
            ("brightColor", Value::from(self.bright_color)),
            ("key.width", Value::from(self.key_width)),
            ("size.binaryPrefix", Value::from(enum_name(BINARY_PREFIXES, &self.binary_prefix))),
            ("size.ndigits", Value::from(self.size_ndigits)),
            ("size.maxPrefix", Value::from(enum_name(SIZE_PREFIXES, &self.size_max_prefix))),
            ("temp.unit", Value::from(enum_name(TEMPERATURE_UNITS, &self.temperature_unit))),
            ("temp.ndigits", Value::from(self.temperature_ndigits)),
            ("percent.ndigits", Value::from(self.percent_ndigits)),
        ]
    }
}

const LOGO_COLOR_PATHS: [&str; 9] = [
    "color.1", "color.2", "color.3", "color.4", "color.5", "color.6", "color.7", "color.8",
    "color.9",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoOptions {
    pub logo_type: LogoType,
    /// Builtin logo name, file path or inline data depending on `logo_type`
    pub source: String,
    /// Replacements for `$1`..`$9`; empty keeps the logo's own color
    pub colors: [String; 9],
    pub padding_top: u32,
    pub padding_left: u32,
    pub padding_right: u32,
    pub print_remaining: bool,
}

impl Default for LogoOptions {
    fn default() -> Self {
        LogoOptions {
            logo_type: LogoType::Auto,
            source: String::new(),
            colors: Default::default(),
            padding_top: 0,
            padding_left: 0,
            padding_right: 4,
            print_remaining: true,
        }
    }
}

impl OptionSection for LogoOptions {
    fn set(&mut self, name: &str, key: &str, value: Option<&str>) -> Result<bool> {
        if let Some(n) = name.strip_prefix("color-") {
            let slot = match n.parse::<usize>() {
                Ok(n @ 1..=9) => n - 1,
                _ => return Ok(false),
            };
            self.colors[slot] = parse_color_option(key, value)?;
            return Ok(true);
        }
        match name {
            "type" => self.logo_type = parse_enum(key, value, LOGO_TYPES)?,
            "source" => self.source = parse_string(key, value)?,
            "padding-top" => self.padding_top = parse_u32(key, value)?,
            "padding-left" => self.padding_left = parse_u32(key, value)?,
            "padding-right" => self.padding_right = parse_u32(key, value)?,
            "print-remaining" => self.print_remaining = parse_bool(key, value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn values(&self) -> Vec<(&'static str, Value)> {
        let mut values = vec![
            ("type", Value::from(enum_name(LOGO_TYPES, &self.logo_type))),
            ("source", Value::from(self.source.as_str())),
        ];
        for (path, color) in LOGO_COLOR_PATHS.iter().zip(&self.colors) {
            values.push((*path, Value::from(color.as_str())));
        }
        values.extend([
            ("padding.top", Value::from(self.padding_top)),
            ("padding.left", Value::from(self.padding_left)),
            ("padding.right", Value::from(self.padding_right)),
            ("printRemaining", Value::from(self.print_remaining)),
        ]);
        values
    }
}

/// Library path overrides handed through to probes that load them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryOptions {
    pub pci: String,
    pub vulkan: String,
    pub wayland: String,
    pub x11: String,
    pub dbus: String,
}

impl OptionSection for LibraryOptions {
    fn set(&mut self, name: &str, key: &str, value: Option<&str>) -> Result<bool> {
        let slot = match name {
            "pci" => &mut self.pci,
            "vulkan" => &mut self.vulkan,
            "wayland" => &mut self.wayland,
            "x11" => &mut self.x11,
            "dbus" => &mut self.dbus,
            _ => return Ok(false),
        };
        *slot = parse_string(key, value)?;
        Ok(true)
    }

    fn values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("pci", Value::from(self.pci.as_str())),
            ("vulkan", Value::from(self.vulkan.as_str())),
            ("wayland", Value::from(self.wayland.as_str())),
            ("x11", Value::from(self.x11.as_str())),
            ("dbus", Value::from(self.dbus.as_str())),
        ]
    }
}

/// One entry of the print order
#[derive(Debug, Clone)]
pub enum StructureEntry {
    Module(Box<dyn Module>),
    /// A name the registry does not know; printed as an error line
    Unknown(String),
}

#[derive(Debug, Clone, Default)]
pub struct Configuration {
    pub general: GeneralOptions,
    pub display: DisplayOptions,
    pub logo: LogoOptions,
    pub library: LibraryOptions,
    pub output: OutputMode,
    /// Options set through `--<module>-*` flags or legacy config lines,
    /// shared by every structure entry of that module created afterwards
    pub modules: BTreeMap<&'static str, Box<dyn Module>>,
    /// `None` until a JSON `modules` list or `--structure` sets it
    pub structure: Option<Vec<StructureEntry>>,
}

impl Configuration {
    pub fn new() -> Self {
        Configuration::default()
    }

    /// Shared options for `descriptor`, created with defaults on first use
    pub fn module_options_mut(&mut self, descriptor: &'static ModuleDescriptor) -> &mut Box<dyn Module> {
        self.modules
            .entry(descriptor.name)
            .or_insert_with(descriptor.create)
    }

    /// A fresh structure entry carrying the shared options
    pub fn new_module(&self, descriptor: &'static ModuleDescriptor) -> Box<dyn Module> {
        match self.modules.get(descriptor.name) {
            Some(shared) => shared.clone(),
            None => (descriptor.create)(),
        }
    }

    pub fn parse_structure(&self, text: &str) -> Vec<StructureEntry> {
        text.split(';')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| match registry::lookup(name) {
                Some(descriptor) => StructureEntry::Module(self.new_module(descriptor)),
                None => {
                    warn!("structure: unknown module `{}`", name);
                    StructureEntry::Unknown(name.to_string())
                }
            })
            .collect()
    }

    /// Replace the print order, e.g. from `--structure`
    pub fn set_structure(&mut self, text: &str) {
        self.structure = Some(self.parse_structure(text));
    }

    /// The structure in effect: the configured one or the built-in default
    pub fn effective_structure(&self) -> Vec<StructureEntry> {
        match &self.structure {
            Some(structure) => structure.clone(),
            None => self.parse_structure(DEFAULT_STRUCTURE),
        }
    }

    /// Apply `--<module>-<subkey>` to the shared options and to every
    /// structure entry of that module already loaded, so flags win over
    /// JSON. `key` is the lowercase flag without leading dashes.
    pub fn apply_module_flag(&mut self, key: &str, value: Option<&str>) -> Result<bool> {
        let Some((descriptor, subkey)) = registry::registry().match_flag(key) else {
            return Ok(false);
        };
        let flag = format!("--{}", key);
        if !self
            .module_options_mut(descriptor)
            .parse_flag(&flag, subkey, value)?
        {
            return Ok(false);
        }
        if let Some(structure) = &mut self.structure {
            for entry in structure.iter_mut() {
                if let StructureEntry::Module(module) = entry {
                    if module.name() == descriptor.name {
                        module.parse_flag(&flag, subkey, value)?;
                    }
                }
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn display_aliases_share_one_field() {
        let mut display = DisplayOptions::default();
        display.set("binary-prefix", "--binary-prefix", Some("si")).unwrap();
        assert_eq!(display.binary_prefix, BinaryPrefix::Si);
        display.set("size-binary-prefix", "binaryPrefix", Some("JEDEC")).unwrap();
        assert_eq!(display.binary_prefix, BinaryPrefix::Jedec);
        display.set("temp-unit", "unit", Some("f")).unwrap();
        assert_eq!(display.temperature_unit, TemperatureUnit::Fahrenheit);
    }

    #[test]
    fn color_sets_keys_and_title() {
        let mut display = DisplayOptions::default();
        display.set("color", "--color", Some("blue")).unwrap();
        assert_eq!(display.color_keys, "34");
        assert_eq!(display.color_title, "34");
    }

    #[test]
    fn logo_color_slots() {
        let mut logo = LogoOptions::default();
        assert!(logo.set("color-3", "--logo-color-3", Some("red")).unwrap());
        assert!(!logo.set("color-10", "--logo-color-10", Some("red")).unwrap());
        assert_eq!(logo.colors[2], "31");
    }

    #[test]
    fn unknown_structure_names_are_kept() {
        let config = Configuration::new();
        let entries = config.parse_structure("Title; Frobnicator ;;uptime");
        assert_eq!(entries.len(), 3);
        assert!(matches!(&entries[1], StructureEntry::Unknown(name) if name == "Frobnicator"));
        assert!(matches!(&entries[2], StructureEntry::Module(m) if m.name() == "Uptime"));
    }

    /// Keeps every log line so tests can look for warnings
    struct Capture(Mutex<Vec<String>>);

    impl log::Log for Capture {
        fn enabled(&self, _: &log::Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &log::Record<'_>) {
            if let Ok(mut lines) = self.0.lock() {
                lines.push(format!("{} {}", record.level(), record.args()));
            }
        }

        fn flush(&self) {}
    }

    static CAPTURE: Capture = Capture(Mutex::new(Vec::new()));

    #[test]
    fn unknown_structure_names_are_logged() {
        // Another test may have installed the logger already
        let _ = log::set_logger(&CAPTURE);
        log::set_max_level(log::LevelFilter::Trace);

        let config = Configuration::new();
        config.parse_structure("Title;Gizmotron");
        let lines = CAPTURE.0.lock().unwrap();
        assert!(lines.iter().any(|line| line == "WARN structure: unknown module `Gizmotron`"));
    }

    #[test]
    fn module_flags_reach_existing_entries() {
        let mut config = Configuration::new();
        config.set_structure("Uptime;Kernel;Uptime");
        assert!(config.apply_module_flag("uptime-key", Some("Up")).unwrap());
        assert!(!config.apply_module_flag("uptime-bogus", Some("x")).unwrap());
        let keys: Vec<String> = config
            .structure
            .as_ref()
            .unwrap()
            .iter()
            .map(|e| match e {
                StructureEntry::Module(m) => m.args().key.clone(),
                StructureEntry::Unknown(_) => String::new(),
            })
            .collect();
        assert_eq!(keys, vec!["Up", "", "Up"]);
        let later = config.parse_structure("Uptime");
        assert!(matches!(&later[0], StructureEntry::Module(m) if m.args().key == "Up"));
    }
}
