//! System information collection (OS, kernel, uptime, session)

use crate::data::{
    EditorInfo, InitSystemInfo, KernelInfo, OsInfo, ShellInfo, TerminalInfo, TitleInfo, UptimeInfo, UserInfo,
};
use crate::error::{QuickfetchError, Result};
use crate::utils::{command::*, file::*};
use std::collections::HashSet;
use std::env;
use std::ffi::CStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

const OS_RELEASE_PATHS: &[&str] = &["/etc/os-release", "/usr/lib/os-release"];

/// Fields of `uname(2)`
#[derive(Debug, Clone, Default)]
pub struct Uname {
    pub sysname: String,
    pub nodename: String,
    pub release: String,
    pub version: String,
    pub machine: String,
}

pub fn uname() -> Result<Uname> {
    // SAFETY: utsname is plain old data and uname fills it completely on success
    let buf = unsafe {
        let mut buf: libc::utsname = std::mem::zeroed();
        if libc::uname(&mut buf) != 0 {
            return Err(std::io::Error::last_os_error().into());
        }
        buf
    };
    let field = |raw: &[libc::c_char]| {
        // SAFETY: uname NUL-terminates every field
        unsafe { CStr::from_ptr(raw.as_ptr()) }
            .to_string_lossy()
            .into_owned()
    };
    Ok(Uname {
        sysname: field(&buf.sysname),
        nodename: field(&buf.nodename),
        release: field(&buf.release),
        version: field(&buf.version),
        machine: field(&buf.machine),
    })
}

pub fn collect_title() -> Result<TitleInfo> {
    let passwd = passwd_entry(unsafe { libc::getuid() });
    let user_name = env::var("USER")
        .or_else(|_| env::var("LOGNAME"))
        .ok()
        .filter(|name| !name.is_empty())
        .or_else(|| passwd.as_ref().map(|p| p.name.clone()))
        .ok_or_else(|| QuickfetchError::Detection("Failed to get user name".to_string()))?;

    let host_name = read_first_line("/proc/sys/kernel/hostname").or_else(|_| uname().map(|u| u.nodename))?;
    let fqdn = match read_first_line("/proc/sys/kernel/domainname") {
        Ok(domain) if !domain.is_empty() && domain != "(none)" && !host_name.contains('.') => {
            format!("{}.{}", host_name, domain)
        }
        _ => host_name.clone(),
    };

    let home_dir = dirs::home_dir()
        .map(|p| p.display().to_string())
        .or_else(|| passwd.as_ref().map(|p| p.home.clone()))
        .unwrap_or_default();
    let user_shell = env::var("SHELL")
        .ok()
        .or_else(|| passwd.as_ref().map(|p| p.shell.clone()))
        .unwrap_or_default();
    let exe_path = env::current_exe()
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    Ok(TitleInfo {
        user_name,
        host_name,
        fqdn,
        home_dir,
        exe_path,
        user_shell,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PasswdEntry {
    name: String,
    home: String,
    shell: String,
}

fn passwd_entry(uid: libc::uid_t) -> Option<PasswdEntry> {
    let text = fs::read_to_string("/etc/passwd").ok()?;
    parse_passwd(&text, uid)
}

fn parse_passwd(text: &str, uid: libc::uid_t) -> Option<PasswdEntry> {
    text.lines().find_map(|line| {
        let fields: Vec<&str> = line.split(':').collect();
        if fields.len() < 7 || fields[2].parse::<libc::uid_t>().ok()? != uid {
            return None;
        }
        Some(PasswdEntry {
            name: fields[0].to_string(),
            home: fields[5].to_string(),
            shell: fields[6].to_string(),
        })
    })
}

/// Read os-release from `os_file`, or the standard locations when empty
pub fn collect_os(os_file: &str) -> Result<OsInfo> {
    let candidates: Vec<&str> = if os_file.is_empty() {
        OS_RELEASE_PATHS.to_vec()
    } else {
        vec![os_file]
    };
    let text = candidates
        .iter()
        .find_map(|path| fs::read_to_string(path).ok())
        .ok_or_else(|| QuickfetchError::Detection("Failed to read os-release".to_string()))?;

    let mut os = parse_os_release(&text);
    os.architecture = uname().map(|u| u.machine).unwrap_or_default();
    if os.name.is_empty() && os.pretty_name.is_empty() {
        os.name = "Linux".to_string();
    }
    Ok(os)
}

pub fn parse_os_release(text: &str) -> OsInfo {
    let mut os = OsInfo::default();
    for line in text.lines() {
        let Some((key, value)) = line.trim().split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches(|c| c == '"' || c == '\'').to_string();
        match key {
            "NAME" => os.name = value,
            "PRETTY_NAME" => os.pretty_name = value,
            "ID" => os.id = value,
            "ID_LIKE" => os.id_like = value,
            "VERSION" => os.version = value,
            "VERSION_ID" => os.version_id = value,
            "VERSION_CODENAME" => os.codename = value,
            _ => {}
        }
    }
    os
}

pub fn collect_kernel() -> Result<KernelInfo> {
    let uname = uname()?;
    Ok(KernelInfo {
        name: uname.sysname,
        release: uname.release,
        version: uname.version,
        architecture: uname.machine,
    })
}

pub fn collect_uptime() -> Result<UptimeInfo> {
    // /proc/uptime is a single line: "<uptime secs> <idle secs>"
    let line = read_first_line("/proc/uptime")?;
    let seconds: f64 = line
        .split_whitespace()
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| QuickfetchError::Parse(format!("unexpected /proc/uptime content: {}", line)))?;
    let uptime = (seconds * 1000.0) as u64;
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    Ok(UptimeInfo {
        uptime,
        boot_time: now.saturating_sub(uptime),
    })
}

pub fn collect_shell(timeout_ms: u32) -> Result<ShellInfo> {
    let (process_name, exe) = find_parent_shell()
        .or_else(|| {
            let shell = env::var("SHELL").ok()?;
            let name = Path::new(&shell).file_name()?.to_string_lossy().into_owned();
            Some((name, PathBuf::from(shell)))
        })
        .ok_or_else(|| QuickfetchError::Detection("Failed to find the parent shell".to_string()))?;

    let version = match process_name.as_str() {
        "bash" | "zsh" | "fish" | "nu" | "ksh" => run_command(&exe.to_string_lossy(), &["--version"], timeout_ms)
            .map(|out| parse_version(&out))
            .unwrap_or_default(),
        _ => String::new(),
    };

    Ok(ShellInfo {
        pretty_name: process_name.clone(),
        process_name,
        exe: exe.display().to_string(),
        version,
    })
}

/// First dotted number in `--version` output: "GNU bash, version 5.2.15(1)-release" -> "5.2.15"
pub fn parse_version(output: &str) -> String {
    output
        .lines()
        .next()
        .unwrap_or("")
        .split(|c: char| c.is_whitespace() || c == ',')
        .find(|token| token.starts_with(|c: char| c.is_ascii_digit()))
        .map(|token| {
            token
                .split(|c: char| !(c.is_ascii_digit() || c == '.'))
                .next()
                .unwrap_or("")
                .trim_end_matches('.')
                .to_string()
        })
        .unwrap_or_default()
}

fn parent_pid(pid: &str) -> Option<u32> {
    let stat = fs::read_to_string(format!("/proc/{}/stat", pid)).ok()?;
    // The command name may contain spaces; fields after it are fixed
    let after_comm = &stat[stat.rfind(')')? + 1..];
    after_comm.split_whitespace().nth(1)?.parse().ok()
}

/// Walk up the process tree until a known shell shows up
fn find_parent_shell() -> Option<(String, PathBuf)> {
    let known_shells: HashSet<&str> = [
        "bash", "zsh", "fish", "nu", "nushell", "ksh", "mksh", "csh", "tcsh", "elvish", "xonsh", "oil", "dash",
    ]
    .into_iter()
    .collect();

    let mut pid = parent_pid("self")?;
    // Bounded walk in case the tree loops back on itself
    for _ in 0..10 {
        if pid <= 1 {
            break;
        }
        let exe = fs::read_link(format!("/proc/{}/exe", pid)).ok();
        let name = exe
            .as_ref()
            .and_then(|exe| exe.file_name())
            .map(|n| n.to_string_lossy().to_lowercase())
            .or_else(|| read_first_line(format!("/proc/{}/comm", pid)).ok());

        if let Some(name) = name {
            if known_shells.contains(name.as_str()) {
                return Some((name, exe.unwrap_or_default()));
            }
        }
        pid = parent_pid(&pid.to_string())?;
    }
    None
}

pub fn collect_terminal() -> Result<TerminalInfo> {
    let hints = [
        ("TERM_PROGRAM", None),
        ("KITTY_WINDOW_ID", Some("kitty")),
        ("ALACRITTY_WINDOW_ID", Some("alacritty")),
        ("WEZTERM_EXECUTABLE", Some("wezterm")),
        ("KONSOLE_VERSION", Some("konsole")),
        ("GNOME_TERMINAL_SCREEN", Some("gnome-terminal")),
        ("TMUX", Some("tmux")),
    ];
    for (var, name) in hints {
        if let Ok(value) = env::var(var) {
            let process_name = name.map(str::to_string).unwrap_or(value);
            if !process_name.is_empty() {
                return Ok(terminal_info(process_name));
            }
        }
    }

    match env::var("TERM") {
        Ok(term) if !term.is_empty() && term != "linux" => Ok(terminal_info(term.replace("xterm-", ""))),
        Ok(term) if term == "linux" => Ok(terminal_info("tty".to_string())),
        _ => Err(QuickfetchError::Detection("Failed to detect the terminal".to_string())),
    }
}

fn terminal_info(process_name: String) -> TerminalInfo {
    let pretty_name = match process_name.as_str() {
        "vscode" => "Visual Studio Code".to_string(),
        "Apple_Terminal" => "Apple Terminal".to_string(),
        "gnome-terminal" => "GNOME Terminal".to_string(),
        "konsole" => "Konsole".to_string(),
        "WezTerm" | "wezterm" => "WezTerm".to_string(),
        other => other.to_string(),
    };
    TerminalInfo {
        process_name,
        pretty_name,
    }
}

pub fn collect_editor() -> Result<EditorInfo> {
    let value = ["VISUAL", "EDITOR"]
        .iter()
        .find_map(|var| env::var(var).ok().filter(|v| !v.trim().is_empty()))
        .ok_or_else(|| QuickfetchError::Detection("$VISUAL or $EDITOR not set".to_string()))?;

    // "code --wait" style values carry arguments
    let command = value.split_whitespace().next().unwrap_or(&value);
    let name = Path::new(command)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| command.to_string());
    let path = if command.contains('/') {
        command.to_string()
    } else {
        find_in_path(command)
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    };
    Ok(EditorInfo { name, path })
}

fn find_in_path(program: &str) -> Option<PathBuf> {
    let path = env::var_os("PATH")?;
    env::split_paths(&path)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}

pub fn collect_init_system() -> Result<InitSystemInfo> {
    if let Ok(name) = read_first_line("/proc/1/comm") {
        if !name.is_empty() {
            let exe = fs::read_link("/proc/1/exe")
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            return Ok(InitSystemInfo { name, exe, pid: 1 });
        }
    }

    // /proc/1 can be hidden (hidepid); fall back to well known locations
    let name = if file_exists("/run/systemd/system") || command_exists("systemctl") {
        "systemd"
    } else if file_exists("/sbin/openrc") || file_exists("/usr/sbin/openrc") {
        "openrc"
    } else if file_exists("/etc/runit") {
        "runit"
    } else if file_exists("/etc/s6") {
        "s6"
    } else if file_exists("/etc/init.d") {
        "sysvinit"
    } else {
        return Err(QuickfetchError::Detection("Failed to detect the init system".to_string()));
    };
    Ok(InitSystemInfo {
        name: name.to_string(),
        exe: String::new(),
        pid: 1,
    })
}

/// Login sessions from the utmp database
pub fn collect_users() -> Result<Vec<UserInfo>> {
    let mut users = Vec::new();
    // SAFETY: the utmpx iteration is confined to this block and every entry is copied out
    // before the next getutxent call reuses the static buffer
    unsafe {
        libc::setutxent();
        loop {
            let entry = libc::getutxent();
            if entry.is_null() {
                break;
            }
            let entry = &*entry;
            if entry.ut_type != libc::USER_PROCESS {
                continue;
            }
            users.push(UserInfo {
                name: c_chars(&entry.ut_user),
                host_name: c_chars(&entry.ut_host),
                tty: c_chars(&entry.ut_line),
                login_time: (entry.ut_tv.tv_sec as i64 * 1000 + entry.ut_tv.tv_usec as i64 / 1000).max(0) as u64,
            });
        }
        libc::endutxent();
    }

    if users.is_empty() {
        return Err(QuickfetchError::Detection("Unable to detect users".to_string()));
    }
    Ok(users)
}

/// utmp strings fill their array without a terminator when they are full
fn c_chars(raw: &[libc::c_char]) -> String {
    let bytes: Vec<u8> = raw.iter().take_while(|&&c| c != 0).map(|&c| c as u8).collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utmp_strings_stop_at_nul_or_the_end() {
        let raw = |text: &[u8]| text.iter().map(|&b| b as libc::c_char).collect::<Vec<_>>();
        assert_eq!(c_chars(&raw(b"ada\0\0garbage")), "ada");
        assert_eq!(c_chars(&raw(b"pts/0")), "pts/0");
        assert_eq!(c_chars(&raw(b"\0")), "");
    }

    #[test]
    fn os_release_fields() {
        let os = parse_os_release(
            "NAME=\"Arch Linux\"\nPRETTY_NAME=\"Arch Linux\"\nID=arch\n# comment\nBUILD_ID=rolling\nVERSION_ID='2024.01'\n",
        );
        assert_eq!(os.name, "Arch Linux");
        assert_eq!(os.id, "arch");
        assert_eq!(os.version_id, "2024.01");
        assert!(os.codename.is_empty());
    }

    #[test]
    fn shell_versions() {
        assert_eq!(parse_version("GNU bash, version 5.2.15(1)-release (x86_64-pc-linux-gnu)\n"), "5.2.15");
        assert_eq!(parse_version("zsh 5.9 (x86_64-pc-linux-gnu)"), "5.9");
        assert_eq!(parse_version("fish, version 3.6.1"), "3.6.1");
        assert_eq!(parse_version("no digits here"), "");
    }

    #[test]
    fn passwd_lookup_by_uid() {
        let text = "root:x:0:0:root:/root:/bin/bash\nalice:x:1000:1000::/home/alice:/usr/bin/zsh\n";
        let entry = parse_passwd(text, 1000).unwrap();
        assert_eq!(entry.name, "alice");
        assert_eq!(entry.shell, "/usr/bin/zsh");
        assert!(parse_passwd(text, 42).is_none());
    }

    #[test]
    fn kernel_comes_from_uname() {
        let kernel = collect_kernel().unwrap();
        assert!(!kernel.name.is_empty());
        assert!(!kernel.release.is_empty());
    }
}
