//! Command line flags and legacy `key value` config lines
//!
//! Both sources end up in [`parse_option`], which routes each option to the
//! same section setters the JSON engine uses.

use super::options::{parse_bool, parse_enum, parse_string, OptionSection};
use super::{Configuration, LogoType, OUTPUT_MODES};
use crate::error::{QuickfetchError, Result};

/// Commands that print something and exit without rendering a report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfoCommand {
    Help(Option<String>),
    Version,
    VersionRaw,
    ListModules,
    ListPresets,
    ListConfigPaths,
    ListDataPaths,
    ListLogos,
    PrintStructure,
}

/// What the caller has to do after an option was parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagOutcome {
    Applied,
    Info(InfoCommand),
    LoadConfig(String),
    GenConfig { path: Option<String>, force: bool },
    LoadUserConfig(bool),
}

/// Options whose value may itself start with `-`
const DASH_VALUE_OPTIONS: &[&str] = &["--separator", "--separator-string"];

/// Pair every option with its value. The next argument is a value unless it
/// starts with `-`; a lone `-` is a value (stdout for `--gen-config`).
pub fn tokenize(args: &[String]) -> Result<Vec<(String, Option<String>)>> {
    let mut pairs = Vec::with_capacity(args.len());
    let mut iter = args.iter().peekable();
    while let Some(key) = iter.next() {
        if !key.starts_with('-') {
            return Err(QuickfetchError::UnknownOption(format!(
                "{} (an option must start with `-`)",
                key
            )));
        }
        let takes_dash = DASH_VALUE_OPTIONS
            .iter()
            .any(|option| option.eq_ignore_ascii_case(key));
        let value = match iter.peek() {
            Some(next) if takes_dash || !next.starts_with('-') || next.as_str() == "-" => {
                iter.next().cloned()
            }
            _ => None,
        };
        pairs.push((key.clone(), value));
    }
    Ok(pairs)
}

fn info_command(key: &str, value: Option<&str>) -> Option<InfoCommand> {
    let command = match key {
        "-h" | "--help" => InfoCommand::Help(value.map(str::to_string)),
        "-v" | "--version" => InfoCommand::Version,
        "--version-raw" => InfoCommand::VersionRaw,
        "--list-modules" => InfoCommand::ListModules,
        "--list-presets" => InfoCommand::ListPresets,
        "--list-config-paths" => InfoCommand::ListConfigPaths,
        "--list-data-paths" => InfoCommand::ListDataPaths,
        "--list-logos" => InfoCommand::ListLogos,
        "--print-structure" => InfoCommand::PrintStructure,
        _ => return None,
    };
    Some(command)
}

/// Informative command that needs no configuration at all
pub fn early_info_command(key: &str, value: Option<&str>) -> Option<InfoCommand> {
    info_command(&key.to_ascii_lowercase(), value)
        .filter(|command| *command != InfoCommand::PrintStructure)
}

/// Apply one option to `config`. Option names are case-insensitive.
pub fn parse_option(config: &mut Configuration, key: &str, value: Option<&str>) -> Result<FlagOutcome> {
    let lowered = key.to_ascii_lowercase();
    if let Some(command) = info_command(&lowered, value) {
        return Ok(FlagOutcome::Info(command));
    }

    match lowered.as_str() {
        "-c" | "--load-config" | "--config" => {
            let path = parse_string(key, value).map_err(|_| QuickfetchError::missing(key, "<file>"))?;
            if path.is_empty() {
                return Err(QuickfetchError::missing(key, "<file>"));
            }
            return Ok(FlagOutcome::LoadConfig(path));
        }
        "--gen-config" | "--gen-config-force" => {
            return Ok(FlagOutcome::GenConfig {
                path: value.map(str::to_string),
                force: lowered == "--gen-config-force",
            });
        }
        "--load-user-config" => return Ok(FlagOutcome::LoadUserConfig(parse_bool(key, value)?)),
        "-s" | "--structure" => config.set_structure(&parse_string(key, value)?),
        "--format" => config.output = parse_enum(key, value, OUTPUT_MODES)?,
        "-l" | "--logo" => {
            let source = parse_string(key, value)?;
            if source.eq_ignore_ascii_case("none") {
                config.logo.logo_type = LogoType::None;
            } else {
                config.logo.source = source;
            }
        }
        "--file" => {
            config.logo.source = parse_string(key, value)?;
            config.logo.logo_type = LogoType::File;
        }
        "--data" => {
            config.logo.source = parse_string(key, value)?;
            config.logo.logo_type = LogoType::Data;
        }
        _ => {
            if !apply_section_option(config, &lowered, key, value)? {
                return Err(QuickfetchError::UnknownOption(key.to_string()));
            }
        }
    }
    Ok(FlagOutcome::Applied)
}

fn apply_section_option(
    config: &mut Configuration,
    lowered: &str,
    key: &str,
    value: Option<&str>,
) -> Result<bool> {
    if let Some(name) = lowered.strip_prefix("--logo-") {
        return config.logo.set(name, key, value);
    }
    if let Some(name) = lowered.strip_prefix("--lib-") {
        return config.library.set(name, key, value);
    }
    let Some(name) = lowered.strip_prefix("--") else {
        return Ok(false);
    };
    if config.general.set(name, key, value)? || config.display.set(name, key, value)? {
        return Ok(true);
    }
    config.apply_module_flag(name, value)
}

/// Split a legacy config file into `(key, value)` pairs.
///
/// One option per line; `#` starts a comment line. The value is everything
/// after the first whitespace, optionally wrapped in double quotes, with
/// `\n`, `\t`, `\e` and `\\` unescaped.
pub fn parse_config_lines(text: &str) -> Vec<(String, Option<String>)> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| match line.split_once(char::is_whitespace) {
            None => (line.to_string(), None),
            Some((key, value)) => {
                let value = value.trim();
                let value = value
                    .strip_prefix('"')
                    .and_then(|v| v.strip_suffix('"'))
                    .unwrap_or(value);
                (key.to_string(), Some(unescape(value)))
            }
        })
        .collect()
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('e') => out.push('\x1b'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BinaryPrefix;
    use pretty_assertions::assert_eq;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn values_are_paired_with_keys() {
        let pairs = tokenize(&strings(&["--pipe", "--separator", "-> ", "--logo", "arch", "--gen-config", "-"])).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("--pipe".to_string(), None),
                ("--separator".to_string(), Some("-> ".to_string())),
                ("--logo".to_string(), Some("arch".to_string())),
                ("--gen-config".to_string(), Some("-".to_string())),
            ]
        );
    }

    #[test]
    fn bare_words_are_rejected() {
        let err = tokenize(&strings(&["uptime"])).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn options_reach_their_sections() {
        let mut config = Configuration::new();
        for (key, value) in [
            ("--Binary-Prefix", Some("si")),
            ("--thread", Some("false")),
            ("--logo-padding-left", Some("3")),
            ("--lib-pci", Some("/opt/libpci.so")),
            ("--uptime-format", Some("{1}d")),
        ] {
            assert_eq!(parse_option(&mut config, key, value).unwrap(), FlagOutcome::Applied);
        }
        assert_eq!(config.display.binary_prefix, BinaryPrefix::Si);
        assert!(!config.general.multithreading);
        assert_eq!(config.logo.padding_left, 3);
        assert_eq!(config.library.pci, "/opt/libpci.so");
        assert_eq!(config.modules["Uptime"].args().output_format, "{1}d");
    }

    #[test]
    fn usage_errors_have_their_own_codes() {
        let mut config = Configuration::new();
        let unknown = parse_option(&mut config, "--frobnicate", None).unwrap_err();
        assert_eq!(unknown.exit_code(), 2);
        let missing = parse_option(&mut config, "--separator", None).unwrap_err();
        assert_eq!(missing.exit_code(), 3);
        let invalid = parse_option(&mut config, "--temperature-unit", Some("rankine")).unwrap_err();
        assert_eq!(invalid.exit_code(), 4);
        let missing_file = parse_option(&mut config, "-c", None).unwrap_err();
        assert_eq!(missing_file.exit_code(), 3);
    }

    #[test]
    fn informative_and_action_outcomes() {
        let mut config = Configuration::new();
        assert_eq!(
            parse_option(&mut config, "-h", Some("cpu-format")).unwrap(),
            FlagOutcome::Info(InfoCommand::Help(Some("cpu-format".to_string())))
        );
        assert_eq!(
            parse_option(&mut config, "--gen-config-force", None).unwrap(),
            FlagOutcome::GenConfig { path: None, force: true }
        );
        assert_eq!(
            parse_option(&mut config, "--load-user-config", Some("no")).unwrap(),
            FlagOutcome::LoadUserConfig(false)
        );
        assert_eq!(early_info_command("--print-structure", None), None);
    }

    #[test]
    fn legacy_lines() {
        let text = "# comment\n\n  --separator \" -> \"\n--pipe\n--title-format \"\\e[1m{1}\\tx\\\\\"\n";
        assert_eq!(
            parse_config_lines(text),
            vec![
                ("--separator".to_string(), Some(" -> ".to_string())),
                ("--pipe".to_string(), None),
                ("--title-format".to_string(), Some("\x1b[1m{1}\tx\\".to_string())),
            ]
        );
    }
}
