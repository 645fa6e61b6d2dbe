//! Informative commands: help texts and the `--list-*` family

use crate::config::flags::InfoCommand;
use crate::config::loader::{ConfigPaths, APP_DIR};
use crate::config::{Configuration, StructureEntry};
use crate::error::{QuickfetchError, Result};
use crate::logo;
use crate::modules::{version_line, VERSION};
use crate::registry::{self, ModuleDescriptor};
use std::fs;
use std::io::Write;

const USAGE: &str = "\
Usage: quickfetch <options>

Informative options:
  -h, --help [<command>]         Show this message, or help for <command>
                                 (`format`, `color` or `<module>-format`)
  -v, --version                  Show the version
      --version-raw              Show the bare version number
      --list-modules             List every available module
      --list-presets             List presets found in the data directories
      --list-config-paths        List the config files that are searched
      --list-data-paths          List the data directories
      --list-logos               List the builtin logos
      --print-structure          Print the structure in effect

Config options:
  -c, --load-config <file>       Load a preset or config file (.jsonc or legacy)
      --gen-config [<path>|-]    Write the current configuration as JSONC
      --gen-config-force [<path>|-]
                                 Same, overwriting an existing file
      --load-user-config <bool>  Whether to read the user config files
  -s, --structure <structure>    Modules to print, separated by `;`
      --format <default|json>    Output format

Logo options:
  -l, --logo <name|none>         Builtin logo, or none
      --file <path>              Read the logo from a file
      --data <text>              Use the given text as logo
      --logo-type <type>         auto, builtin, file, data or none
      --logo-color-[1-9] <color> Replace `$N` in the logo
      --logo-padding-top <n>
      --logo-padding-left <n>
      --logo-padding-right <n>
      --logo-print-remaining <bool>

Display options:
      --separator <str>          Separator between key and value
      --color <color>            Color of keys and title
      --color-keys <color>
      --color-title <color>
      --color-output <color>
      --bright-color <bool>
      --key-width <n>
      --show-errors <bool>
      --pipe <bool>              Disable colors and the logo
      --disable-linewrap <bool>
      --hide-cursor <bool>
      --binary-prefix <iec|si|jedec>
      --size-ndigits <n>
      --size-max-prefix <B|kB|MB|GB|TB|PB|EB|ZB|YB>
      --temperature-unit <C|F|K>
      --temperature-ndigits <n>
      --percent-ndigits <n>

General options:
      --thread <bool>            Detect in parallel before printing
      --processing-timeout <ms>  Limit for spawned helper programs
      --os-file <path>           Read this file instead of /etc/os-release
      --lib-<pci|vulkan|wayland|x11|dbus> <path>

Module options:
      --<module>-key <str>       Key template; {1} is the instance index
      --<module>-key-color <color>
      --<module>-key-width <n>
      --<module>-format <str>    See `quickfetch -h <module>-format`
      --<module>-output-color <color>
";

const FORMAT_HELP: &str = "\
A format string is printed as is, except for placeholders in braces:
  {n}          Argument n, counting from 1
  {n.m}        Argument n with m decimals (numbers), m digits (integers)
               or at most m characters (text)
  {{ and }}    Literal braces
  {#color}     Switch to a color, e.g. {#red} or {#1;34}; {#} resets
  {?n}...{?}   Only printed if argument n is set
  {/n}...{/}   Only printed if argument n is not set
Placeholders out of range print nothing.
The arguments of a module are listed by `quickfetch -h <module>-format`.
";

const COLOR_HELP: &str = "\
Colors are a list of words separated by spaces or `;`:
  attributes   reset, bold, dim, italic, underline, blink, inverse, hidden, strike
  colors       black, red, green, yellow, blue, magenta, cyan, white, default
  bright       bright_black (gray), bright_red, ..., bright_white
  numbers      raw SGR codes such as 38;5;208
  hex          #rrggbb
";

/// Print what `command` asks for
pub fn run_info(command: &InfoCommand, config: &Configuration, paths: &ConfigPaths, out: &mut dyn Write) -> Result<()> {
    match command {
        InfoCommand::Help(None) => write!(out, "{}", USAGE)?,
        InfoCommand::Help(Some(topic)) => print_topic(topic, out)?,
        InfoCommand::Version => writeln!(out, "{}", version_line())?,
        InfoCommand::VersionRaw => writeln!(out, "{}", VERSION)?,
        InfoCommand::ListModules => list_modules(out)?,
        InfoCommand::ListPresets => list_presets(paths, out)?,
        InfoCommand::ListConfigPaths => {
            for dir in &paths.config_dirs {
                for extension in ["jsonc", "conf"] {
                    let path = ConfigPaths::config_file(dir, extension);
                    let marker = if path.exists() { " (*)" } else { "" };
                    writeln!(out, "{}{}", path.display(), marker)?;
                }
            }
        }
        InfoCommand::ListDataPaths => {
            for dir in &paths.data_dirs {
                writeln!(out, "{}", dir.join(APP_DIR).display())?;
            }
        }
        InfoCommand::ListLogos => {
            for name in logo::builtin_names() {
                writeln!(out, "{}", name)?;
            }
        }
        InfoCommand::PrintStructure => writeln!(out, "{}", structure_string(config))?,
    }
    Ok(())
}

fn print_topic(topic: &str, out: &mut dyn Write) -> Result<()> {
    let lowered = topic.to_ascii_lowercase();
    match lowered.as_str() {
        "format" => write!(out, "{}", FORMAT_HELP)?,
        "color" => write!(out, "{}", COLOR_HELP)?,
        _ => {
            let descriptor = lowered
                .strip_suffix("-format")
                .and_then(registry::lookup)
                .ok_or_else(|| QuickfetchError::invalid("--help", topic, "format, color or <module>-format"))?;
            print_format_help(descriptor, out)?;
        }
    }
    Ok(())
}

/// Arguments a module passes to its format string
pub fn print_format_help(descriptor: &ModuleDescriptor, out: &mut dyn Write) -> Result<()> {
    let flag = descriptor.name.to_ascii_lowercase();
    writeln!(out, "--{}-format:", flag)?;
    writeln!(out, "Sets the format string for {} output.", descriptor.name)?;
    writeln!(out, "To see how a format string works, see `quickfetch -h format`.")?;
    if descriptor.format_args.is_empty() {
        writeln!(out, "{} passes no arguments.", descriptor.name)?;
        return Ok(());
    }
    writeln!(out, "The following values are passed:")?;
    for (i, (name, description)) in descriptor.format_args.iter().enumerate() {
        writeln!(out, "{:>5}: {} [{}]", format!("{{{}}}", i + 1), description, name)?;
    }
    Ok(())
}

fn list_modules(out: &mut dyn Write) -> Result<()> {
    for (i, descriptor) in registry::registry().iter().enumerate() {
        writeln!(out, "{:>2}) {:<12}: {}", i + 1, descriptor.name, descriptor.description)?;
    }
    Ok(())
}

fn list_presets(paths: &ConfigPaths, out: &mut dyn Write) -> Result<()> {
    for dir in paths.preset_dirs() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        let mut names: Vec<String> = entries
            .flatten()
            .filter(|entry| entry.path().is_file())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        if names.is_empty() {
            continue;
        }
        names.sort();
        writeln!(out, "{}", dir.display())?;
        for name in names {
            writeln!(out, "  {}", name)?;
        }
    }
    Ok(())
}

/// Module names of the structure in effect, `;` separated
pub fn structure_string(config: &Configuration) -> String {
    config
        .effective_structure()
        .iter()
        .map(|entry| match entry {
            StructureEntry::Module(module) => module.name(),
            StructureEntry::Unknown(name) => name.as_str(),
        })
        .collect::<Vec<_>>()
        .join(";")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn run(command: InfoCommand, config: &Configuration, paths: &ConfigPaths) -> String {
        let mut out = Vec::new();
        run_info(&command, config, paths, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn module_format_help_lists_arguments() {
        let text = run(
            InfoCommand::Help(Some("Uptime-format".into())),
            &Configuration::new(),
            &ConfigPaths::default(),
        );
        assert!(text.starts_with("--uptime-format:\n"));
        assert!(text.contains("  {1}: Days [days]\n"));
        assert!(text.contains("  {7}: Boot time in milliseconds since the epoch"));
    }

    #[test]
    fn unknown_help_topic_is_a_usage_error() {
        let mut out = Vec::new();
        let err = run_info(
            &InfoCommand::Help(Some("frobnicator-format".into())),
            &Configuration::new(),
            &ConfigPaths::default(),
            &mut out,
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn structure_is_printed_in_order() {
        let mut config = Configuration::new();
        config.set_structure("title;Frobnicator;cpu");
        let text = run(InfoCommand::PrintStructure, &config, &ConfigPaths::default());
        assert_eq!(text, "Title;Frobnicator;CPU\n");
    }

    #[test]
    fn existing_config_files_are_marked() {
        let dir = TempDir::new().unwrap();
        let paths = ConfigPaths {
            config_dirs: vec![dir.path().to_path_buf()],
            data_dirs: vec![PathBuf::from("/nonexistent")],
            exe_dir: None,
        };
        let file = ConfigPaths::config_file(dir.path(), "jsonc");
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(&file, "{}").unwrap();
        let text = run(InfoCommand::ListConfigPaths, &Configuration::new(), &paths);
        assert!(text.contains("config.jsonc (*)\n"));
        assert!(text.contains("config.conf\n"));
    }

    #[test]
    fn modules_are_numbered() {
        let text = run(InfoCommand::ListModules, &Configuration::new(), &ConfigPaths::default());
        assert!(text.starts_with(" 1) Battery"));
        assert_eq!(text.lines().count(), registry::registry().iter().count());
    }
}
