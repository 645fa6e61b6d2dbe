//! quickfetch library
//!
//! A fast system information fetch tool. Modules detect facts through a
//! [`Probe`], a [`Configuration`] built from JSONC files and flags decides
//! what they print, and [`render`] writes the report.

pub mod collectors;
pub mod config;
pub mod data;
pub mod display;
pub mod error;
pub mod format;
pub mod help;
pub mod logo;
pub mod modules;
pub mod probe;
pub mod registry;
pub mod render;
pub mod utils;

pub use config::Configuration;
pub use error::{QuickfetchError, Result};
pub use logo::Logo;
pub use probe::{Probe, SystemProbe};
pub use render::render;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write the JSONC document for `config`.
///
/// `target` of `-` means `out`; `None` means `default_path`. Existing files
/// are only replaced when `force` is set.
pub fn write_generated_config(
    config: &Configuration,
    target: Option<&str>,
    default_path: Option<&Path>,
    force: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let text = config::json::to_config_text(&config::json::generate_document(config))?;
    if target == Some("-") {
        out.write_all(text.as_bytes())?;
        return Ok(());
    }

    let path = match target {
        Some(target) => PathBuf::from(shellexpand::tilde(target).as_ref()),
        None => default_path
            .map(Path::to_path_buf)
            .ok_or_else(|| QuickfetchError::ConfigNotFound("no config directory found".to_string()))?,
    };
    if path.exists() && !force {
        return Err(QuickfetchError::ConfigExists(path.display().to_string()));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, text)?;
    writeln!(out, "The generated config file has been written in `{}`", path.display())?;
    Ok(())
}
