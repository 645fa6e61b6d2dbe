//! Config discovery and load order
//!
//! 1. The JSONC document: the last `--load-config <x>.jsonc` on the command
//!    line, otherwise the first `quickfetch/config.jsonc` found in the config
//!    directories. Without one, every legacy `quickfetch/config.conf` is
//!    applied, lowest priority directory first.
//! 2. Command line options, in order. Legacy files named by `--load-config`
//!    are applied where they appear.
//!
//! Flags therefore always win over the JSON document.

use super::flags::{early_info_command, parse_config_lines, parse_option, tokenize, FlagOutcome, InfoCommand};
use super::{json, jsonc, Configuration};
use crate::error::{QuickfetchError, Result};
use log::{debug, warn};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_DIR: &str = "quickfetch";

/// Legacy files may load each other; stop runaway recursion
const MAX_CONFIG_DEPTH: usize = 8;

/// Directories searched for config files and presets, highest priority first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigPaths {
    pub config_dirs: Vec<PathBuf>,
    pub data_dirs: Vec<PathBuf>,
    /// Directory of the running executable; `presets/` next to it is searched last
    pub exe_dir: Option<PathBuf>,
}

impl ConfigPaths {
    pub fn detect() -> Self {
        let mut config_dirs = Vec::new();
        if let Some(dir) = dirs::config_dir() {
            config_dirs.push(dir);
        }
        if let Some(home) = dirs::home_dir() {
            config_dirs.push(home.join(".config"));
        }
        config_dirs.push(PathBuf::from("/etc/xdg"));
        config_dirs.push(PathBuf::from("/etc"));
        config_dirs.dedup();

        let mut data_dirs = Vec::new();
        if let Some(dir) = dirs::data_dir() {
            data_dirs.push(dir);
        }
        if let Some(home) = dirs::home_dir() {
            data_dirs.push(home.join(".local/share"));
        }
        data_dirs.push(PathBuf::from("/usr/local/share"));
        data_dirs.push(PathBuf::from("/usr/share"));
        data_dirs.dedup();

        let exe_dir = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));

        ConfigPaths {
            config_dirs,
            data_dirs,
            exe_dir,
        }
    }

    pub fn config_file(dir: &Path, extension: &str) -> PathBuf {
        dir.join(APP_DIR).join(format!("config.{}", extension))
    }

    /// Where `--gen-config` writes when no path is given
    pub fn default_config_file(&self) -> Option<PathBuf> {
        self.config_dirs
            .first()
            .map(|dir| Self::config_file(dir, "jsonc"))
    }

    pub fn preset_dirs(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = self
            .data_dirs
            .iter()
            .map(|dir| dir.join(APP_DIR).join("presets"))
            .collect();
        if let Some(exe_dir) = &self.exe_dir {
            dirs.push(exe_dir.join("presets"));
        }
        dirs
    }

    pub fn logo_dirs(&self) -> Vec<PathBuf> {
        self.data_dirs
            .iter()
            .map(|dir| dir.join(APP_DIR).join("logos"))
            .collect()
    }
}

/// What `main` should do with the loaded configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Render,
    Info(InfoCommand),
    GenConfig { path: Option<String>, force: bool },
}

/// Load the configuration for `args` (without the program name).
/// `NO_CONFIG` in the environment skips the user config files.
pub fn load(args: &[String], paths: &ConfigPaths) -> Result<(Configuration, Action)> {
    let load_user_config = env::var_os("NO_CONFIG").is_none();
    load_with(args, paths, load_user_config)
}

pub fn load_with(
    args: &[String],
    paths: &ConfigPaths,
    mut load_user_config: bool,
) -> Result<(Configuration, Action)> {
    let pairs = tokenize(args)?;
    let mut config = Configuration::new();

    for (key, value) in &pairs {
        if let Some(command) = early_info_command(key, value.as_deref()) {
            return Ok((config, Action::Info(command)));
        }
        if key.eq_ignore_ascii_case("--load-user-config") {
            load_user_config = super::options::parse_bool(key, value.as_deref())?;
        }
    }

    let explicit_jsonc = pairs
        .iter()
        .filter(|(key, _)| is_load_config(key))
        .filter_map(|(_, value)| value.as_deref())
        .filter(|value| is_jsonc(value))
        .last();

    if let Some(value) = explicit_jsonc {
        let (path, text) = resolve_config(value, paths)?;
        load_jsonc_text(&mut config, &path, &text)?;
    } else if load_user_config {
        load_user_files(&mut config, paths)?;
    }

    let mut action = Action::Render;
    for (key, value) in &pairs {
        match parse_option(&mut config, key, value.as_deref())? {
            FlagOutcome::Applied | FlagOutcome::LoadUserConfig(_) => {}
            FlagOutcome::Info(command) => return Ok((config, Action::Info(command))),
            FlagOutcome::LoadConfig(value) if is_jsonc(&value) => {}
            FlagOutcome::LoadConfig(value) => {
                let (path, text) = resolve_config(&value, paths)?;
                apply_legacy_text(&mut config, &path, &text, paths, 0)?;
            }
            FlagOutcome::GenConfig { path, force } => action = Action::GenConfig { path, force },
        }
    }
    Ok((config, action))
}

fn is_load_config(key: &str) -> bool {
    ["-c", "--load-config", "--config"]
        .iter()
        .any(|k| k.eq_ignore_ascii_case(key))
}

fn is_jsonc(value: &str) -> bool {
    value.len() > ".jsonc".len() && value.to_ascii_lowercase().ends_with(".jsonc")
}

fn load_user_files(config: &mut Configuration, paths: &ConfigPaths) -> Result<()> {
    for dir in &paths.config_dirs {
        let path = ConfigPaths::config_file(dir, "jsonc");
        if let Some(text) = read_candidate(&path) {
            return load_jsonc_text(config, &path, &text);
        }
    }

    for dir in paths.config_dirs.iter().rev() {
        let path = ConfigPaths::config_file(dir, "conf");
        if let Some(text) = read_candidate(&path) {
            apply_legacy_text(config, &path, &text, paths, 0)?;
        }
    }
    Ok(())
}

/// Unreadable files count as absent
fn read_candidate(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(text) => {
            debug!("config: using {}", path.display());
            Some(text)
        }
        Err(e) => {
            if path.exists() {
                warn!("config: skipping unreadable {}: {}", path.display(), e);
            }
            None
        }
    }
}

/// Find a config named on the command line: as given, with `~` and
/// environment variables expanded, then inside the preset directories.
pub fn resolve_config(value: &str, paths: &ConfigPaths) -> Result<(PathBuf, String)> {
    let mut candidates = vec![PathBuf::from(value)];
    if let Ok(expanded) = shellexpand::full(value) {
        if expanded != value {
            candidates.push(PathBuf::from(expanded.as_ref()));
        }
    }
    candidates.extend(paths.preset_dirs().into_iter().map(|dir| dir.join(value)));

    candidates
        .into_iter()
        .filter(|path| path.is_file())
        .find_map(|path| read_candidate(&path).map(|text| (path, text)))
        .ok_or_else(|| QuickfetchError::ConfigNotFound(value.to_string()))
}

fn load_jsonc_text(config: &mut Configuration, path: &Path, text: &str) -> Result<()> {
    let doc = jsonc::parse(text).map_err(|e| QuickfetchError::ConfigSyntax {
        path: path.display().to_string(),
        offset: e.offset,
        message: e.message,
    })?;
    json::load_document(config, &doc);
    Ok(())
}

fn apply_legacy_text(
    config: &mut Configuration,
    path: &Path,
    text: &str,
    paths: &ConfigPaths,
    depth: usize,
) -> Result<()> {
    for (key, value) in parse_config_lines(text) {
        match parse_option(config, &key, value.as_deref())? {
            FlagOutcome::Applied | FlagOutcome::LoadUserConfig(_) => {}
            FlagOutcome::LoadConfig(nested) if depth < MAX_CONFIG_DEPTH => {
                let (nested_path, nested_text) = resolve_config(&nested, paths)?;
                if is_jsonc(&nested) {
                    load_jsonc_text(config, &nested_path, &nested_text)?;
                } else {
                    apply_legacy_text(config, &nested_path, &nested_text, paths, depth + 1)?;
                }
            }
            FlagOutcome::LoadConfig(nested) => {
                warn!("{}: not loading {}, config files nest too deep", path.display(), nested)
            }
            FlagOutcome::Info(_) | FlagOutcome::GenConfig { .. } => {
                warn!("{}: `{}` is ignored in config files", path.display(), key)
            }
        }
    }
    Ok(())
}
