//! Loading and generating the JSONC config document
//!
//! Loading is forgiving: anything unknown or malformed inside a valid
//! document is skipped with a warning. Generation writes only what differs
//! from a default configuration.

use super::options::{diff_values, flatten_json_field, OptionSection};
use super::{Configuration, GeneralOptions, DisplayOptions, LibraryOptions, LogoOptions, StructureEntry};
use crate::error::Result;
use crate::registry;
use log::warn;
use serde_json::{Map, Value};

/// Apply a parsed document on top of `config`
pub fn load_document(config: &mut Configuration, doc: &Value) {
    let Some(root) = doc.as_object() else {
        warn!("config: the root of a JSON config must be an object");
        return;
    };

    for (key, value) in root {
        match key.as_str() {
            "$schema" => {}
            "logo" if value.is_string() => {
                apply_field(&mut config.logo, "logo", "source", value);
            }
            "logo" => apply_section(&mut config.logo, "logo", value),
            "general" => apply_section(&mut config.general, "general", value),
            "display" => apply_section(&mut config.display, "display", value),
            "library" => apply_section(&mut config.library, "library", value),
            "modules" => load_modules(config, value),
            _ => warn!("config: unknown top-level key `{}`", key),
        }
    }
}

fn apply_section(section: &mut dyn OptionSection, name: &str, value: &Value) {
    let Some(object) = value.as_object() else {
        warn!("config: `{}` must be an object", name);
        return;
    };
    for (key, value) in object {
        apply_field(section, name, key, value);
    }
}

fn apply_field(section: &mut dyn OptionSection, section_name: &str, key: &str, value: &Value) {
    let mut fields = Vec::new();
    flatten_json_field(key, value, &mut fields);
    for (name, value) in fields {
        match section.set(&name, key, value.as_deref()) {
            Ok(true) => {}
            Ok(false) => warn!("config: unknown key `{}.{}`", section_name, key),
            Err(e) => warn!("config: {}.{}: {}", section_name, key, e),
        }
    }
}

fn load_modules(config: &mut Configuration, value: &Value) {
    let Some(items) = value.as_array() else {
        warn!("config: `modules` must be an array");
        return;
    };

    let mut structure = Vec::with_capacity(items.len());
    for item in items {
        let (name, object) = match item {
            Value::String(name) => (name.as_str(), None),
            Value::Object(object) => match object.get("type").and_then(Value::as_str) {
                Some(name) => (name, Some(object)),
                None => {
                    warn!("config: module entry without a `type`");
                    continue;
                }
            },
            _ => {
                warn!("config: module entries must be strings or objects");
                continue;
            }
        };

        match registry::lookup(name) {
            Some(descriptor) => {
                let mut module = config.new_module(descriptor);
                if let Some(object) = object {
                    module.parse_json(object);
                }
                structure.push(StructureEntry::Module(module));
            }
            None => {
                warn!("config: unknown module type `{}`", name);
                structure.push(StructureEntry::Unknown(name.to_string()));
            }
        }
    }
    config.structure = Some(structure);
}

fn section_diff<S: OptionSection + Default>(current: &S) -> Option<Value> {
    let mut map = Map::new();
    diff_values(current.values(), S::default().values(), &mut map);
    (!map.is_empty()).then_some(Value::Object(map))
}

/// Build the smallest document that loads back into `config`
pub fn generate_document(config: &Configuration) -> Value {
    let mut root = Map::new();
    let sections = [
        ("logo", section_diff::<LogoOptions>(&config.logo)),
        ("display", section_diff::<DisplayOptions>(&config.display)),
        ("general", section_diff::<GeneralOptions>(&config.general)),
        ("library", section_diff::<LibraryOptions>(&config.library)),
    ];
    for (name, diff) in sections {
        if let Some(diff) = diff {
            root.insert(name.to_string(), diff);
        }
    }

    let modules = config
        .effective_structure()
        .iter()
        .map(|entry| match entry {
            StructureEntry::Unknown(name) => Value::from(name.as_str()),
            StructureEntry::Module(module) => {
                let diff = module.generate_json_config();
                let type_name = module.name().to_lowercase();
                if diff.is_empty() {
                    Value::from(type_name)
                } else {
                    let mut object = Map::new();
                    object.insert("type".to_string(), Value::from(type_name));
                    object.extend(diff);
                    Value::Object(object)
                }
            }
        })
        .collect();
    root.insert("modules".to_string(), Value::Array(modules));
    Value::Object(root)
}

/// Pretty printed document with a trailing newline
pub fn to_config_text(doc: &Value) -> Result<String> {
    let mut text = serde_json::to_string_pretty(doc)?;
    text.push('\n');
    Ok(text)
}
