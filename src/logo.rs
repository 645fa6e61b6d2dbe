//! ASCII logos printed to the left of the report
//!
//! Logo text may contain `$1`..`$9`, replaced by the logo colors, and `$$`
//! for a literal dollar sign.

use crate::config::loader::ConfigPaths;
use crate::config::{LogoOptions, LogoType};
use crate::error::{QuickfetchError, Result};
use crate::probe::Probe;
use crate::utils::color::{sgr, RESET};
use std::fs;
use std::path::PathBuf;
use unicode_width::UnicodeWidthStr;

/// A builtin logo: names it answers to, art, default colors
struct Builtin {
    names: &'static [&'static str],
    art: &'static str,
    colors: &'static [&'static str],
}

const ARCH: &str = r#"$1                  -`
$1                 .o+`
$1                `ooo/
$1               `+oooo:
$1              `+oooooo:
$1              -+oooooo+:
$1            `/:-:++oooo+:
$1           `/++++/+++++++:
$1          `/++++++++++++++:
$1         `/+++ooooooooooooo/`
$1        ./ooosssso++osssssso+`
$1       .oossssso-````/ossssss+`
$1      -osssssso.      :ssssssso.
$1     :osssssss/        osssso+++.
$1    /ossssssss/        +ssssooo/-
$1  `/ossssso+/:-        -:/+osssso+-
$1 `+sso+:-`                 `.-/+oso:
$1`++:.                           `-/+/
$1.`                                 `/"#;

const DEBIAN: &str = r#"$1  _____
$1 /  __ \
$1|  /    |
$1|  \___-
$1-_
$1  --_"#;

const UBUNTU: &str = r#"$1         _
$1     ---(_)
$1 _/  ---  \
$1(_) |   |
$1  \  --- _/
$1     ---(_)"#;

const FEDORA: &str = r#"$1        ,'''''.
$1       |   ,.  |
$1       |  |  '_'
$1  ,....|  |..
$1.'  ,_;|   ..'
$1|  |   |  |
$1|  ',_,'  |
$1 '.     ,'
$1   '''''"#;

const NIXOS: &str = r#"$1  \\  \\ //
$1 ==\\__\\/ //
$1   //   \\//
$1==//     //==
$1 //\\___//
$1// /\\  \\==
$1  // \\  \\"#;

const LINUX: &str = r#"$2    ___
$2   ($1.. $2|
$2   ($3<> $2|
$2  / $1__  $2\
$2 ( $1/  \ $2/|
$3_$2/\ $1__)$2/$3_$2)
$3\/$2-____$3\/"#;

const BUILTINS: &[Builtin] = &[
    Builtin {
        names: &["arch", "archlinux"],
        art: ARCH,
        colors: &["36"],
    },
    Builtin {
        names: &["debian"],
        art: DEBIAN,
        colors: &["31"],
    },
    Builtin {
        names: &["fedora"],
        art: FEDORA,
        colors: &["34"],
    },
    Builtin {
        names: &["linux", "tux"],
        art: LINUX,
        colors: &["37", "90", "33"],
    },
    Builtin {
        names: &["nixos", "nix"],
        art: NIXOS,
        colors: &["34"],
    },
    Builtin {
        names: &["ubuntu"],
        art: UBUNTU,
        colors: &["31"],
    },
];

fn builtin(name: &str) -> Option<&'static Builtin> {
    BUILTINS
        .iter()
        .find(|logo| logo.names.iter().any(|n| n.eq_ignore_ascii_case(name)))
}

/// Names accepted by `--logo`, for `--list-logos`
pub fn builtin_names() -> impl Iterator<Item = &'static str> {
    BUILTINS.iter().map(|logo| logo.names[0])
}

/// A logo laid out for printing: every line already padded to one width
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Logo {
    lines: Vec<String>,
    /// Columns taken by each line, paddings included
    width: usize,
    /// SGR code of the first logo color; the default key color
    main_color: String,
    print_remaining: bool,
}

impl Logo {
    /// No logo; report lines start at column zero
    pub fn none() -> Self {
        Logo::default()
    }

    /// Lay out `art` with `$n` replaced by `colors[n - 1]`
    pub fn from_art(art: &str, colors: &[String], options: &LogoOptions, use_colors: bool) -> Self {
        let parsed: Vec<(String, usize)> = art
            .lines()
            .map(|line| substitute_colors(line, colors, use_colors))
            .collect();
        let art_width = parsed.iter().map(|(_, width)| *width).max().unwrap_or(0);
        let left = " ".repeat(options.padding_left as usize);
        let right = " ".repeat(options.padding_right as usize);
        let width = options.padding_left as usize + art_width + options.padding_right as usize;

        let mut lines = vec![" ".repeat(width); options.padding_top as usize];
        for (text, text_width) in parsed {
            let fill = " ".repeat(art_width - text_width);
            let reset = if use_colors { RESET } else { "" };
            lines.push(format!("{}{}{}{}{}", left, text, reset, fill, right));
        }

        Logo {
            lines,
            width,
            main_color: colors.first().cloned().unwrap_or_default(),
            print_remaining: options.print_remaining,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn main_color(&self) -> &str {
        &self.main_color
    }

    pub fn print_remaining(&self) -> bool {
        self.print_remaining
    }
}

/// Replace color markers; returns the text and its display width
fn substitute_colors(line: &str, colors: &[String], use_colors: bool) -> (String, usize) {
    let mut out = String::with_capacity(line.len());
    let mut plain = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            plain.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('$') => {
                chars.next();
                out.push('$');
                plain.push('$');
            }
            Some(digit @ '1'..='9') => {
                chars.next();
                let index = digit as usize - '1' as usize;
                if use_colors {
                    out.push_str(RESET);
                    if let Some(color) = colors.get(index) {
                        out.push_str(&sgr(color));
                    }
                }
            }
            _ => {
                out.push('$');
                plain.push('$');
            }
        }
    }
    let width = UnicodeWidthStr::width(plain.as_str());
    (out, width)
}

/// Merge user colors over the logo's own
fn merge_colors(defaults: &[&str], overrides: &[String; 9]) -> Vec<String> {
    overrides
        .iter()
        .enumerate()
        .map(|(i, user)| {
            if user.is_empty() {
                defaults.get(i).map(|c| c.to_string()).unwrap_or_default()
            } else {
                user.clone()
            }
        })
        .collect()
}

/// Build the logo the options ask for. `auto` picks a builtin by OS id,
/// falling back to the generic Linux logo.
pub fn load(options: &LogoOptions, probe: &dyn Probe, paths: &ConfigPaths, use_colors: bool) -> Result<Logo> {
    let from_builtin = |logo: &Builtin| {
        Logo::from_art(logo.art, &merge_colors(logo.colors, &options.colors), options, use_colors)
    };
    let user_art = |art: &str| {
        Logo::from_art(art, &merge_colors(&[], &options.colors), options, use_colors)
    };

    match options.logo_type {
        LogoType::None => Ok(Logo::none()),
        LogoType::Builtin => builtin(&options.source)
            .map(from_builtin)
            .ok_or_else(|| QuickfetchError::invalid("--logo", &options.source, "a builtin logo name")),
        LogoType::Data => Ok(user_art(&options.source.replace("\\n", "\n"))),
        LogoType::File => {
            let art = read_logo_file(&options.source, paths)?;
            Ok(user_art(&art))
        }
        LogoType::Auto => {
            if !options.source.is_empty() {
                if let Some(logo) = builtin(&options.source) {
                    return Ok(from_builtin(logo));
                }
                if let Ok(art) = read_logo_file(&options.source, paths) {
                    return Ok(user_art(&art));
                }
                log::warn!("Logo `{}` not found, using the OS logo", options.source);
            }
            let os = probe.os().unwrap_or_default();
            let logo = std::iter::once(os.id.as_str())
                .chain(os.id_like.split_whitespace())
                .find_map(builtin)
                .or_else(|| builtin("linux"));
            Ok(logo.map(from_builtin).unwrap_or_default())
        }
    }
}

fn read_logo_file(source: &str, paths: &ConfigPaths) -> Result<String> {
    let expanded = shellexpand::tilde(source);
    let mut candidates = vec![PathBuf::from(expanded.as_ref())];
    candidates.extend(paths.logo_dirs().into_iter().map(|dir| dir.join(source)));
    candidates
        .iter()
        .find_map(|path| fs::read_to_string(path).ok())
        .ok_or_else(|| QuickfetchError::Detection(format!("Failed to load logo file `{}`", source)))
}
