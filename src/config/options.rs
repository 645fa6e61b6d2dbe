//! Option setters shared by the flag parser and the JSON config engine.
//!
//! Every option has exactly one setter keyed by its kebab-case flag name.
//! JSON keys are translated into the same names (`keyColor` -> `key-color`,
//! `{"size": {"ndigits": 2}}` -> `size-ndigits`) before the setter runs, so a
//! flag and a JSON field always produce the same in-memory state.

use crate::error::{QuickfetchError, Result};
use crate::utils::color::parse_color;
use serde_json::{Map, Value};

/// A group of options that can be set by name and dumped as JSON paths
pub trait OptionSection {
    /// Apply one option. `name` is the kebab-case name without any section
    /// prefix, `key` the user-facing key used in error messages.
    /// Returns `Ok(false)` when the name is not an option of this section.
    fn set(&mut self, name: &str, key: &str, value: Option<&str>) -> Result<bool>;

    /// Current values keyed by JSON path; `.` separates nested objects.
    fn values(&self) -> Vec<(&'static str, Value)>;
}

const TRUE_SPELLINGS: &[&str] = &["true", "yes", "on", "1"];
const FALSE_SPELLINGS: &[&str] = &["false", "no", "off", "0"];

/// Boolean flag; a missing value means `true`
pub fn parse_bool(key: &str, value: Option<&str>) -> Result<bool> {
    let Some(value) = value else {
        return Ok(true);
    };
    let lowered = value.trim().to_lowercase();
    if lowered.is_empty() || TRUE_SPELLINGS.contains(&lowered.as_str()) {
        Ok(true)
    } else if FALSE_SPELLINGS.contains(&lowered.as_str()) {
        Ok(false)
    } else {
        Err(QuickfetchError::invalid(key, value, "true or false"))
    }
}

pub fn parse_string(key: &str, value: Option<&str>) -> Result<String> {
    value
        .map(str::to_string)
        .ok_or_else(|| QuickfetchError::missing(key, "<str>"))
}

pub fn parse_u32(key: &str, value: Option<&str>) -> Result<u32> {
    let value = value.ok_or_else(|| QuickfetchError::missing(key, "<num>"))?;
    value
        .trim()
        .parse()
        .map_err(|_| QuickfetchError::invalid(key, value, "a non-negative integer"))
}

pub fn parse_u8(key: &str, value: Option<&str>) -> Result<u8> {
    let value = value.ok_or_else(|| QuickfetchError::missing(key, "<num>"))?;
    value
        .trim()
        .parse()
        .map_err(|_| QuickfetchError::invalid(key, value, "an integer between 0 and 255"))
}

pub fn parse_i32(key: &str, value: Option<&str>) -> Result<i32> {
    let value = value.ok_or_else(|| QuickfetchError::missing(key, "<num>"))?;
    value
        .trim()
        .parse()
        .map_err(|_| QuickfetchError::invalid(key, value, "an integer"))
}

/// Look `value` up in a fixed name table, case-insensitively
pub fn parse_enum<T: Copy>(key: &str, value: Option<&str>, table: &[(&str, T)]) -> Result<T> {
    let value = value.ok_or_else(|| QuickfetchError::missing(key, "<value>"))?;
    table
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(value.trim()))
        .map(|(_, variant)| *variant)
        .ok_or_else(|| {
            let names: Vec<&str> = table.iter().map(|(name, _)| *name).collect();
            QuickfetchError::invalid(key, value, &format!("one of {}", names.join(", ")))
        })
}

/// Canonical (first listed) name of an enum value
pub fn enum_name<T: PartialEq>(table: &[(&'static str, T)], value: &T) -> &'static str {
    table
        .iter()
        .find(|(_, variant)| variant == value)
        .map(|(name, _)| *name)
        .unwrap_or("")
}

pub fn parse_color_option(key: &str, value: Option<&str>) -> Result<String> {
    let value = value.ok_or_else(|| QuickfetchError::missing(key, "<color>"))?;
    Ok(parse_color(value))
}

/// Options every module understands
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleArgs {
    pub key: String,
    pub key_color: String,
    pub key_width: u32,
    pub output_format: String,
    pub output_color: String,
}

impl ModuleArgs {
    pub fn with_key(key: &str) -> Self {
        ModuleArgs {
            key: key.to_string(),
            ..ModuleArgs::default()
        }
    }
}

impl OptionSection for ModuleArgs {
    fn set(&mut self, name: &str, key: &str, value: Option<&str>) -> Result<bool> {
        match name {
            "key" => self.key = parse_string(key, value)?,
            "key-color" => self.key_color = parse_color_option(key, value)?,
            "key-width" => self.key_width = parse_u32(key, value)?,
            "format" => self.output_format = parse_string(key, value)?,
            "output-color" => self.output_color = parse_color_option(key, value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("key", Value::from(self.key.as_str())),
            ("keyColor", Value::from(self.key_color.as_str())),
            ("keyWidth", Value::from(self.key_width)),
            ("format", Value::from(self.output_format.as_str())),
            ("outputColor", Value::from(self.output_color.as_str())),
        ]
    }
}

/// `paddingLeft` -> `padding-left`
pub fn camel_to_kebab(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            if !out.is_empty() {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Flatten a JSON field into `(option name, value)` pairs; nested objects
/// join their keys with `-`, arrays of scalars join with `;`.
pub fn flatten_json_field(key: &str, value: &Value, out: &mut Vec<(String, Option<String>)>) {
    let name = camel_to_kebab(key);
    match value {
        Value::Object(object) => {
            for (child_key, child) in object {
                flatten_json_field(&format!("{}-{}", name, child_key), child, out);
            }
        }
        Value::Array(items) => {
            let joined: Vec<String> = items.iter().filter_map(scalar_to_string).collect();
            out.push((name, Some(joined.join(";"))));
        }
        scalar => out.push((name, scalar_to_string(scalar))),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Keep only entries of `current` whose value differs from `default`,
/// nesting dotted paths into objects.
pub fn diff_values(
    current: Vec<(&'static str, Value)>,
    default: Vec<(&'static str, Value)>,
    out: &mut Map<String, Value>,
) {
    for ((path, value), (_, default_value)) in current.into_iter().zip(default) {
        if value != default_value {
            insert_path(out, path, value);
        }
    }
}

fn insert_path(out: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            out.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let child = out
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Value::Object(child) = child {
                insert_path(child, rest, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn booleans_accept_known_spellings_only() {
        assert!(parse_bool("--x", None).unwrap());
        assert!(parse_bool("--x", Some("Yes")).unwrap());
        assert!(!parse_bool("--x", Some("off")).unwrap());
        assert!(!parse_bool("--x", Some("0")).unwrap());
        assert!(parse_bool("--x", Some("maybe")).is_err());
    }

    #[test]
    fn enums_are_validated() {
        let table = [("iec", 0u8), ("si", 1), ("jedec", 2)];
        assert_eq!(parse_enum("--p", Some("SI"), &table).unwrap(), 1);
        let err = parse_enum("--p", Some("metric"), &table).unwrap_err();
        assert!(err.to_string().contains("one of iec, si, jedec"));
        assert_eq!(err.exit_code(), 4);
        assert_eq!(enum_name(&table, &2), "jedec");
    }

    #[test]
    fn strings_require_a_value() {
        let err = parse_string("--separator", None).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn module_args_by_flag_name() {
        let mut args = ModuleArgs::default();
        assert!(args.set("format", "--cpu-format", Some("{1}")).unwrap());
        assert!(args.set("key-color", "--cpu-key-color", Some("RED")).unwrap());
        assert!(!args.set("fqdn", "--cpu-fqdn", None).unwrap());
        assert_eq!(args.output_format, "{1}");
        assert_eq!(args.key_color, "31");
    }

    #[test]
    fn kebab_conversion() {
        assert_eq!(camel_to_kebab("keyColor"), "key-color");
        assert_eq!(camel_to_kebab("processingTimeout"), "processing-timeout");
        assert_eq!(camel_to_kebab("format"), "format");
    }

    #[test]
    fn nested_json_flattens_to_flag_names() {
        let mut out = Vec::new();
        flatten_json_field("size", &json!({"binaryPrefix": "si", "ndigits": 1}), &mut out);
        flatten_json_field("folders", &json!(["/", "/home"]), &mut out);
        flatten_json_field("pipe", &json!(true), &mut out);
        assert_eq!(
            out,
            vec![
                ("size-binary-prefix".to_string(), Some("si".to_string())),
                ("size-ndigits".to_string(), Some("1".to_string())),
                ("folders".to_string(), Some("/;/home".to_string())),
                ("pipe".to_string(), Some("true".to_string())),
            ]
        );
    }

    #[test]
    fn diff_keeps_changed_leaves_only() {
        let mut out = Map::new();
        diff_values(
            vec![("separator", json!(" -> ")), ("size.ndigits", json!(1)), ("pipe", json!(false))],
            vec![("separator", json!(": ")), ("size.ndigits", json!(2)), ("pipe", json!(false))],
            &mut out,
        );
        assert_eq!(Value::Object(out), json!({"separator": " -> ", "size": {"ndigits": 1}}));
    }
}
