//! Module registry
//!
//! Every printable fact is a [`Module`]: an options struct that knows how to
//! parse its own flags, dump its own JSON config and print itself. Each
//! module type has one static [`ModuleDescriptor`]; the registry indexes the
//! descriptors by the first letter of their name.

use crate::config::options::{diff_values, flatten_json_field, ModuleArgs, OptionSection};
use crate::config::Configuration;
use crate::display::PrintContext;
use crate::error::Result;
use crate::modules;
use crate::probe::{DetectResult, Probe};
use log::warn;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::OnceLock;

/// Static description of one module type
pub struct ModuleDescriptor {
    /// Display name; lookups compare it case-insensitively
    pub name: &'static str,
    pub description: &'static str,
    /// Build the options with their default values
    pub create: fn() -> Box<dyn Module>,
    /// `(name, description)` of each format argument, in placeholder order
    pub format_args: &'static [(&'static str, &'static str)],
}

impl fmt::Debug for ModuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleDescriptor")
            .field("name", &self.name)
            .finish()
    }
}

/// `create` helper for modules whose defaults come from `Default`
pub fn create<M: Module + Default + 'static>() -> Box<dyn Module> {
    Box::new(M::default())
}

/// Options and behavior of one module instance
pub trait Module: fmt::Debug + Send + Sync {
    fn descriptor(&self) -> &'static ModuleDescriptor;

    fn args(&self) -> &ModuleArgs;

    fn args_mut(&mut self) -> &mut ModuleArgs;

    /// Module specific option by kebab-case name; common args never reach here
    fn set_option(&mut self, _name: &str, _key: &str, _value: Option<&str>) -> Result<bool> {
        Ok(false)
    }

    /// Module specific option values keyed by JSON path
    fn option_values(&self) -> Vec<(&'static str, Value)> {
        Vec::new()
    }

    /// Detect and print one or more lines
    fn print(&self, ctx: &mut PrintContext<'_>);

    /// Detection result for `--format json`; `None` for modules with no data
    fn json_result(&self, _config: &Configuration, _probe: &dyn Probe) -> Option<DetectResult<Value>> {
        None
    }

    fn clone_box(&self) -> Box<dyn Module>;

    fn name(&self) -> &'static str {
        self.descriptor().name
    }

    /// Apply `--<module>-<subkey>`; `key` is the full flag for error messages
    fn parse_flag(&mut self, key: &str, subkey: &str, value: Option<&str>) -> Result<bool> {
        if self.args_mut().set(subkey, key, value)? {
            return Ok(true);
        }
        self.set_option(subkey, key, value)
    }

    /// Apply every field of a `modules` entry; bad fields are skipped with a warning
    fn parse_json(&mut self, object: &Map<String, Value>) {
        for (key, value) in object {
            if key.eq_ignore_ascii_case("type") {
                continue;
            }
            let mut fields = Vec::new();
            flatten_json_field(key, value, &mut fields);
            for (name, value) in fields {
                match self.parse_flag(key, &name, value.as_deref()) {
                    Ok(true) => {}
                    Ok(false) => warn!("{}: unknown JSON key `{}`", self.name(), key),
                    Err(e) => warn!("{}: {}", self.name(), e),
                }
            }
        }
    }

    /// Fields that differ from the defaults, ready for a `modules` entry
    fn generate_json_config(&self) -> Map<String, Value> {
        let default = (self.descriptor().create)();
        let mut map = Map::new();
        diff_values(self.args().values(), default.args().values(), &mut map);
        diff_values(self.option_values(), default.option_values(), &mut map);
        map
    }
}

impl Clone for Box<dyn Module> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Descriptors partitioned by the lowercase first letter of their name
pub struct Registry {
    buckets: [Vec<&'static ModuleDescriptor>; 26],
}

static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// The process-wide registry, built on first use
pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(|| Registry::new(modules::ALL))
}

pub fn lookup(name: &str) -> Option<&'static ModuleDescriptor> {
    registry().lookup(name)
}

fn bucket_index(name: &str) -> Option<usize> {
    let first = name.chars().next()?.to_ascii_lowercase();
    first
        .is_ascii_lowercase()
        .then(|| usize::from(first as u8 - b'a'))
}

impl Registry {
    pub fn new(descriptors: &[&'static ModuleDescriptor]) -> Self {
        let mut buckets: [Vec<&'static ModuleDescriptor>; 26] = std::array::from_fn(|_| Vec::new());
        for descriptor in descriptors {
            if let Some(index) = bucket_index(descriptor.name) {
                buckets[index].push(descriptor);
            }
        }
        for bucket in &mut buckets {
            bucket.sort_by_key(|d| d.name.to_ascii_lowercase());
        }
        Registry { buckets }
    }

    pub fn lookup(&self, name: &str) -> Option<&'static ModuleDescriptor> {
        let index = bucket_index(name)?;
        self.buckets[index]
            .iter()
            .copied()
            .find(|d| d.name.eq_ignore_ascii_case(name))
    }

    pub fn bucket(&self, letter: char) -> &[&'static ModuleDescriptor] {
        let mut buf = [0u8; 4];
        match bucket_index(letter.encode_utf8(&mut buf)) {
            Some(index) => &self.buckets[index],
            None => &[],
        }
    }

    /// All descriptors in alphabetical order
    pub fn iter(&self) -> impl Iterator<Item = &'static ModuleDescriptor> + '_ {
        self.buckets.iter().flatten().copied()
    }

    /// Split a lowercase `<module>-<subkey>` flag into its module and subkey.
    /// The longest matching module name wins.
    pub fn match_flag<'k>(&self, key: &'k str) -> Option<(&'static ModuleDescriptor, &'k str)> {
        let index = bucket_index(key)?;
        self.buckets[index]
            .iter()
            .copied()
            .filter_map(|d| {
                let len = d.name.len();
                let head = key.get(..len)?;
                let rest = key.get(len..)?.strip_prefix('-')?;
                (head.eq_ignore_ascii_case(d.name) && !rest.is_empty()).then_some((d, rest))
            })
            .max_by_key(|(d, _)| d.name.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique_and_bucketed() {
        let reg = registry();
        let names: Vec<String> = reg.iter().map(|d| d.name.to_lowercase()).collect();
        let mut deduped = names.clone();
        deduped.dedup();
        assert_eq!(names, deduped);
        for d in reg.iter() {
            let first = d.name.chars().next().unwrap();
            assert!(reg.bucket(first).iter().any(|b| b.name == d.name));
        }
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(lookup("uptime").map(|d| d.name), Some("Uptime"));
        assert_eq!(lookup("CPU").map(|d| d.name), Some("CPU"));
        assert!(lookup("Frobnicator").is_none());
        assert!(lookup("").is_none());
        assert!(lookup("3d").is_none());
    }

    #[test]
    fn flags_split_into_module_and_subkey() {
        let reg = registry();
        let (d, sub) = reg.match_flag("title-color-user").unwrap();
        assert_eq!((d.name, sub), ("Title", "color-user"));
        let (d, sub) = reg.match_flag("initsystem-format").unwrap();
        assert_eq!((d.name, sub), ("InitSystem", "format"));
        let (d, sub) = reg.match_flag("terminalfont-key").unwrap();
        assert_eq!((d.name, sub), ("TerminalFont", "key"));
        let (d, sub) = reg.match_flag("terminal-key").unwrap();
        assert_eq!((d.name, sub), ("Terminal", "key"));
        assert!(reg.match_flag("title").is_none());
        assert!(reg.match_flag("titles-format").is_none());
    }

    #[test]
    fn defaults_generate_an_empty_diff() {
        for d in registry().iter() {
            let module = (d.create)();
            assert_eq!(module.name(), d.name);
            assert!(module.generate_json_config().is_empty(), "{}", d.name);
        }
    }
}
