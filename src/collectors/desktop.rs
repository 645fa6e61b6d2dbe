//! Desktop environment and window manager detection

use crate::data::{DisplayInfo, TerminalFontInfo, TerminalInfo, WmInfo};
use crate::error::{QuickfetchError, Result};
use crate::utils::command::{command_exists, run_command};
use crate::utils::file::read_first_line;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Process names of window managers and compositors, with display names
const KNOWN_WMS: &[(&str, &str)] = &[
    ("sway", "Sway"),
    ("hyprland", "Hyprland"),
    ("Hyprland", "Hyprland"),
    ("kwin_wayland", "KWin"),
    ("kwin_x11", "KWin"),
    ("niri", "niri"),
    ("mutter", "Mutter"),
    ("gnome-shell", "Mutter"),
    ("xfwm4", "Xfwm4"),
    ("openbox", "Openbox"),
    ("i3", "i3"),
    ("bspwm", "bspwm"),
    ("awesome", "awesome"),
    ("weston", "Weston"),
    ("river", "river"),
    ("labwc", "labwc"),
    ("dwm", "dwm"),
];

/// Detect the current window manager or desktop session
pub fn collect_wm() -> Result<WmInfo> {
    let protocol_name = detect_protocol().to_string();

    if let Some((process_name, pretty_name)) = scan_processes() {
        return Ok(WmInfo {
            process_name,
            pretty_name,
            protocol_name,
        });
    }

    // No known process visible; fall back to what the session advertises
    let session = env::var("XDG_CURRENT_DESKTOP")
        .or_else(|_| env::var("DESKTOP_SESSION"))
        .ok()
        .and_then(|value| value.split(':').next().map(str::to_string))
        .filter(|value| !value.is_empty());
    match session {
        Some(session) => Ok(WmInfo {
            pretty_name: capitalize_first_letter(&session),
            process_name: session,
            protocol_name,
        }),
        None => Err(QuickfetchError::Detection("No window manager found".to_string())),
    }
}

fn detect_protocol() -> &'static str {
    let session_type = env::var("XDG_SESSION_TYPE").unwrap_or_default();
    if env::var_os("WAYLAND_DISPLAY").is_some() || session_type.eq_ignore_ascii_case("wayland") {
        "Wayland"
    } else if env::var_os("DISPLAY").is_some() || session_type.eq_ignore_ascii_case("x11") {
        "X11"
    } else {
        "TTY"
    }
}

fn scan_processes() -> Option<(String, String)> {
    let entries = fs::read_dir("/proc").ok()?;
    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let Some(pid) = file_name.to_str() else {
            continue;
        };
        if pid.parse::<u32>().is_err() {
            continue;
        }
        // comm is cheaper to read than cmdline
        let Ok(comm) = fs::read_to_string(entry.path().join("comm")) else {
            continue;
        };
        if let Some(found) = match_wm(comm.trim()) {
            return Some(found);
        }
    }
    None
}

fn match_wm(comm: &str) -> Option<(String, String)> {
    if comm == "gnome-session" || comm.starts_with("gnome-session-") {
        return Some((comm.to_string(), "GNOME".to_string()));
    }
    KNOWN_WMS
        .iter()
        .find(|(process, _)| comm == *process)
        .map(|(process, pretty)| (process.to_string(), pretty.to_string()))
}

pub fn capitalize_first_letter(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Connected monitors: xrandr on X11, the DRM connectors otherwise
pub fn collect_displays(timeout_ms: u32) -> Result<Vec<DisplayInfo>> {
    let mut displays = Vec::new();
    if env::var_os("DISPLAY").is_some() && command_exists("xrandr") {
        match run_command("xrandr", &["--current"], timeout_ms) {
            Ok(output) => displays = parse_xrandr(&output),
            Err(e) => log::debug!("xrandr failed: {}", e),
        }
    }
    if displays.is_empty() {
        displays = displays_from_drm(Path::new("/sys/class/drm"));
    }
    if displays.is_empty() {
        return Err(QuickfetchError::Detection("Couldn't detect display".to_string()));
    }
    Ok(displays)
}

fn connector_kind(name: &str) -> &'static str {
    if ["eDP", "LVDS", "DSI"].iter().any(|prefix| name.starts_with(prefix)) {
        "built-in"
    } else {
        "external"
    }
}

/// "1920x1080" or "1920x1080+0+0"
fn parse_resolution(text: &str) -> Option<(u32, u32)> {
    let (width, rest) = text.split_once('x')?;
    let height = rest.split('+').next()?;
    let width = width.parse().ok()?;
    let height = height.parse().ok()?;
    (width > 0 && height > 0).then_some((width, height))
}

pub fn parse_xrandr(output: &str) -> Vec<DisplayInfo> {
    let mut displays: Vec<DisplayInfo> = Vec::new();
    // Mode lines belong to the last connected output with a geometry
    let mut in_active_output = false;

    for line in output.lines() {
        if !line.starts_with(char::is_whitespace) {
            let words: Vec<&str> = line.split_whitespace().collect();
            in_active_output = false;
            if words.get(1) != Some(&"connected") {
                continue;
            }
            let Some((width, height)) = words.iter().find_map(|w| w.contains('+').then(|| parse_resolution(w)).flatten())
            else {
                continue;
            };
            displays.push(DisplayInfo {
                name: words[0].to_string(),
                width,
                height,
                refresh_rate: 0.0,
                kind: connector_kind(words[0]).to_string(),
                primary: words.contains(&"primary"),
            });
            in_active_output = true;
        } else if in_active_output {
            let current = line.split_whitespace().skip(1).find(|w| w.contains('*'));
            if let (Some(rate), Some(display)) = (current, displays.last_mut()) {
                display.refresh_rate = rate.trim_end_matches(['*', '+']).parse().unwrap_or(0.0);
            }
        }
    }
    displays
}

/// Preferred mode of every connected DRM connector
fn displays_from_drm(drm: &Path) -> Vec<DisplayInfo> {
    let Ok(entries) = fs::read_dir(drm) else {
        return Vec::new();
    };
    let mut connectors: Vec<PathBuf> = entries.flatten().map(|entry| entry.path()).collect();
    connectors.sort();

    connectors
        .iter()
        .filter(|path| read_first_line(path.join("status")).is_ok_and(|status| status == "connected"))
        .filter_map(|path| {
            let (width, height) = parse_resolution(&read_first_line(path.join("modes")).ok()?)?;
            let file_name = path.file_name()?.to_string_lossy();
            // card0-eDP-1 -> eDP-1
            let name = file_name.split_once('-').map_or(&*file_name, |(_, name)| name).to_string();
            Some(DisplayInfo {
                kind: connector_kind(&name).to_string(),
                name,
                width,
                height,
                refresh_rate: 0.0,
                primary: false,
            })
        })
        .collect()
}

/// Font of the terminal emulator `terminal`, read from its own configuration
pub fn collect_terminal_font(terminal: &TerminalInfo, timeout_ms: u32) -> Result<TerminalFontInfo> {
    let config = dirs::config_dir().unwrap_or_default();
    let process = terminal.process_name.to_ascii_lowercase();
    let read = |relative: &str| fs::read_to_string(config.join(relative)).unwrap_or_default();

    let font = match process.as_str() {
        "kitty" => {
            let text = read("kitty/kitty.conf");
            TerminalFontInfo::new(
                &property(&text, "font_family").unwrap_or_else(|| "monospace".to_string()),
                &property(&text, "font_size").unwrap_or_else(|| "11.0".to_string()),
            )
        }
        name if name.starts_with("alacritty") => alacritty_font(&read("alacritty/alacritty.toml")),
        "foot" => foot_font(&read("foot/foot.ini")),
        "konsole" | "yakuake" => {
            let profile = property(&read(&format!("{}rc", process)), "DefaultProfile")
                .filter(|profile| !profile.is_empty())
                .ok_or_else(|| QuickfetchError::Detection("Built-in profile is used".to_string()))?;
            let data = dirs::data_dir().unwrap_or_default().join("konsole").join(&profile);
            let text = fs::read_to_string(&data).unwrap_or_default();
            let font = property(&text, "Font")
                .ok_or_else(|| QuickfetchError::Detection(format!("Couldn't find Font in {}", data.display())))?;
            qt_font(&font)
        }
        "xfce4-terminal" => {
            let text = read("xfce4/terminal/terminalrc");
            if property(&text, "FontUseSystem").is_some_and(|v| v.eq_ignore_ascii_case("true")) {
                return Err(QuickfetchError::Detection("The system monospace font is used".to_string()));
            }
            pango_font(&property(&text, "FontName").ok_or_else(|| {
                QuickfetchError::Detection("Couldn't find FontName in xfce4/terminal/terminalrc".to_string())
            })?)
        }
        "lxterminal" => pango_font(&property(&read("lxterminal/lxterminal.conf"), "fontname").ok_or_else(|| {
            QuickfetchError::Detection("Couldn't find fontname in lxterminal/lxterminal.conf".to_string())
        })?),
        "qterminal" => {
            let text = read("qterminal.org/qterminal.ini");
            TerminalFontInfo::new(
                &property(&text, "fontFamily").unwrap_or_else(|| "monospace".to_string()),
                &property(&text, "fontSize").unwrap_or_else(|| "12".to_string()),
            )
        }
        "xterm" => {
            let home = dirs::home_dir().unwrap_or_default();
            let text = fs::read_to_string(home.join(".Xresources")).unwrap_or_default();
            TerminalFontInfo::new(
                &property(&text, "xterm*faceName").unwrap_or_else(|| "fixed".to_string()),
                &property(&text, "xterm*faceSize").unwrap_or_else(|| "8.0".to_string()),
            )
        }
        "gnome-terminal" | "kgx" => gnome_terminal_font(&process, timeout_ms)?,
        _ => {
            return Err(QuickfetchError::Detection(format!(
                "Unsupported terminal: {}",
                terminal.pretty_name
            )))
        }
    };
    Ok(font)
}

/// Last `key = value`, `key: value` or `key value` line; quotes are stripped
fn property(text: &str, key: &str) -> Option<String> {
    text.lines()
        .filter_map(|line| {
            let rest = line.trim().strip_prefix(key)?;
            let separated = rest.is_empty() || rest.starts_with([' ', '\t', '=', ':']);
            separated.then(|| {
                rest.trim_start()
                    .trim_start_matches(['=', ':'])
                    .trim()
                    .trim_matches(|c| c == '"' || c == '\'')
                    .to_string()
            })
        })
        .last()
}

/// "Fira Code Bold 11" -> ("Fira Code Bold", "11")
pub fn pango_font(description: &str) -> TerminalFontInfo {
    let description = description.trim().trim_matches('\'');
    match description.rsplit_once(' ') {
        Some((name, size)) if size.parse::<f64>().is_ok() => TerminalFontInfo::new(name, size),
        _ => TerminalFontInfo::new(description, ""),
    }
}

/// "Hack,10,-1,5,50,0,0,0,0,0" -> ("Hack", "10")
pub fn qt_font(description: &str) -> TerminalFontInfo {
    let mut fields = description.split(',');
    let name = fields.next().unwrap_or_default();
    let size = fields.next().unwrap_or_default();
    TerminalFontInfo::new(name, size)
}

/// "Sarasa Term SC Nerd:size=8"
fn foot_font(config: &str) -> TerminalFontInfo {
    let Some(font) = property(config, "font").filter(|font| !font.is_empty()) else {
        return TerminalFontInfo::new("monospace", "8");
    };
    // Only the primary font of a fallback list
    let primary = font.split(',').next().unwrap_or_default();
    let (name, attributes) = primary.split_once(':').unwrap_or((primary, ""));
    let size = attributes
        .split(':')
        .find_map(|attribute| attribute.trim().strip_prefix("size="))
        .unwrap_or("8");
    TerminalFontInfo::new(name, size)
}

fn alacritty_font(config: &str) -> TerminalFontInfo {
    let mut section = String::new();
    let mut family = None;
    let mut size = None;
    for line in config.lines().map(str::trim) {
        if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            section = header.trim().to_string();
            continue;
        }
        match section.as_str() {
            "font.normal" if family.is_none() => family = property(line, "family"),
            "font" if size.is_none() => size = property(line, "size"),
            _ => {}
        }
    }
    TerminalFontInfo::new(
        family.as_deref().unwrap_or("alacritty"),
        size.as_deref().unwrap_or("11"),
    )
}

fn gsettings(args: &[&str], timeout_ms: u32) -> Option<String> {
    let value = run_command("gsettings", args, timeout_ms).ok()?;
    let value = value.trim().trim_matches('\'').to_string();
    (!value.is_empty()).then_some(value)
}

fn gnome_terminal_font(process: &str, timeout_ms: u32) -> Result<TerminalFontInfo> {
    let system_font = || {
        gsettings(&["get", "org.gnome.desktop.interface", "monospace-font-name"], timeout_ms)
            .map(|font| pango_font(&font))
            .ok_or_else(|| QuickfetchError::Detection("Couldn't get the system monospace font".to_string()))
    };

    if process == "kgx" {
        let custom = gsettings(&["get", "org.gnome.Console", "use-system-font"], timeout_ms)
            .is_some_and(|value| value == "false");
        return match custom {
            true => gsettings(&["get", "org.gnome.Console", "custom-font"], timeout_ms)
                .map(|font| pango_font(&font))
                .ok_or_else(|| QuickfetchError::Detection("Couldn't get org.gnome.Console custom-font".to_string())),
            false => system_font(),
        };
    }

    let profile = gsettings(&["get", "org.gnome.Terminal.ProfilesList", "default"], timeout_ms)
        .ok_or_else(|| QuickfetchError::Detection("Couldn't get the default gnome-terminal profile".to_string()))?;
    let schema = format!(
        "org.gnome.Terminal.Legacy.Profile:/org/gnome/terminal/legacy/profiles:/:{}/",
        profile
    );
    let uses_system_font = gsettings(&["get", &schema, "use-system-font"], timeout_ms)
        .map_or(true, |value| value == "true");
    if uses_system_font {
        return system_font();
    }
    gsettings(&["get", &schema, "font"], timeout_ms)
        .map(|font| pango_font(&font))
        .ok_or_else(|| QuickfetchError::Detection(format!("Couldn't get the font of profile {}", profile)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn xrandr_outputs_with_current_modes() {
        let output = "\
Screen 0: minimum 320 x 200, current 4480 x 1440, maximum 16384 x 16384
eDP-1 connected primary 1920x1080+0+0 (normal left inverted right x axis y axis) 344mm x 194mm
   1920x1080     60.01*+  59.97    48.00
   1680x1050     59.95
HDMI-1 disconnected (normal left inverted right x axis y axis)
DP-1 connected 2560x1440+1920+0 (normal left inverted right x axis y axis) 597mm x 336mm
   2560x1440     59.95 +  143.91*
DP-2 connected (normal left inverted right x axis y axis)
   1920x1080     60.00 +
";
        let displays = parse_xrandr(output);
        assert_eq!(displays.len(), 2);
        assert_eq!(
            displays[0],
            DisplayInfo {
                name: "eDP-1".into(),
                width: 1920,
                height: 1080,
                refresh_rate: 60.01,
                kind: "built-in".into(),
                primary: true,
            }
        );
        assert_eq!((displays[1].width, displays[1].refresh_rate), (2560, 143.91));
        assert_eq!(displays[1].kind, "external");
        assert!(!displays[1].primary);
    }

    #[test]
    fn drm_connectors_report_their_preferred_mode() {
        let drm = tempfile::TempDir::new().unwrap();
        for (connector, status, modes) in [
            ("card0-eDP-1", "connected", "2880x1800\n1920x1200\n"),
            ("card0-HDMI-A-1", "disconnected", ""),
            ("card0-DP-2", "connected", "3840x2160\n"),
        ] {
            let dir = drm.path().join(connector);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("status"), format!("{}\n", status)).unwrap();
            fs::write(dir.join("modes"), modes).unwrap();
        }
        fs::create_dir_all(drm.path().join("card0")).unwrap();

        let displays = displays_from_drm(drm.path());
        let summary: Vec<(&str, u32, &str)> = displays
            .iter()
            .map(|d| (d.name.as_str(), d.width, d.kind.as_str()))
            .collect();
        assert_eq!(summary, vec![("DP-2", 3840, "external"), ("eDP-1", 2880, "built-in")]);
    }

    #[test]
    fn config_properties() {
        let text = "# font_family Ignored\nfont_family      Fira Code\nfont_size 12.5\nfont_family_x nope\n";
        assert_eq!(property(text, "font_family").as_deref(), Some("Fira Code"));
        assert_eq!(property(text, "font_size").as_deref(), Some("12.5"));
        assert_eq!(property("FontName=Monospace 10", "FontName").as_deref(), Some("Monospace 10"));
        assert_eq!(property("xterm*faceName: Hack", "xterm*faceName").as_deref(), Some("Hack"));
        assert_eq!(property("nothing here", "font"), None);
    }

    #[test]
    fn font_descriptions() {
        assert_eq!(pango_font("'Fira Code Bold 11'"), TerminalFontInfo::new("Fira Code Bold", "11"));
        assert_eq!(pango_font("Monospace"), TerminalFontInfo::new("Monospace", ""));
        assert_eq!(qt_font("Hack,10,-1,5,50,0,0,0,0,0"), TerminalFontInfo::new("Hack", "10"));
        assert_eq!(foot_font("font=Sarasa Term SC Nerd:size=9,Noto Emoji"), TerminalFontInfo::new("Sarasa Term SC Nerd", "9"));
        assert_eq!(foot_font("[main]\n"), TerminalFontInfo::new("monospace", "8"));
    }

    #[test]
    fn alacritty_sections() {
        let config = "[font]\nsize = 13.0\n\n[font.normal]\nfamily = \"JetBrains Mono\"\nstyle = \"Regular\"\n\n[window]\nsize = 99\n";
        assert_eq!(alacritty_font(config), TerminalFontInfo::new("JetBrains Mono", "13.0"));
        assert_eq!(alacritty_font(""), TerminalFontInfo::new("alacritty", "11"));
    }

    #[test]
    fn known_processes_map_to_pretty_names() {
        assert_eq!(match_wm("kwin_wayland"), Some(("kwin_wayland".into(), "KWin".into())));
        assert_eq!(match_wm("gnome-session-binary").map(|m| m.1), Some("GNOME".into()));
        assert_eq!(match_wm("i3bar"), None);
    }

    #[test]
    fn capitalizes_unicode_safely() {
        assert_eq!(capitalize_first_letter("plasma"), "Plasma");
        assert_eq!(capitalize_first_letter("élan"), "Élan");
        assert_eq!(capitalize_first_letter(""), "");
    }
}
