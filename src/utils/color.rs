//! Color option parsing shared by flags, JSON config and format strings.
//!
//! Colors are stored as SGR parameter strings (`"1;31"`), so the same value
//! can be written back into a generated config and parsed again unchanged.

use log::warn;

pub const RESET: &str = "\x1b[0m";

/// Escape sequence for an SGR parameter string; empty input yields nothing.
pub fn sgr(code: &str) -> String {
    if code.is_empty() {
        String::new()
    } else {
        format!("\x1b[{}m", code)
    }
}

/// Convert a user color spec (`"bold red"`, `"#ff8800"`, `"1;34"`) into SGR parameters
pub fn parse_color(value: &str) -> String {
    let mut codes: Vec<String> = Vec::new();

    for word in value.split(|c: char| c.is_whitespace() || c == ';' || c == ',') {
        if word.is_empty() {
            continue;
        }
        if word.chars().all(|c| c.is_ascii_digit()) {
            codes.push(word.to_string());
            continue;
        }
        if let Some(code) = hex_to_sgr(word) {
            codes.push(code);
            continue;
        }
        match named_color_code(word) {
            Some(code) => codes.push(code.to_string()),
            None => warn!("Unknown color '{}', ignoring", word),
        }
    }

    codes.join(";")
}

fn hex_to_sgr(hex: &str) -> Option<String> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some(format!("38;2;{};{};{}", r, g, b))
}

fn named_color_code(color_name: &str) -> Option<&'static str> {
    let name = color_name.to_lowercase().replace('-', "_");
    let code = match name.as_str() {
        // Attributes
        "reset" => "0",
        "bold" => "1",
        "dim" => "2",
        "italic" => "3",
        "underline" => "4",
        "blink" => "5",
        "inverse" => "7",
        "hidden" => "8",
        "strike" => "9",

        // Standard 8 colors (30-37)
        "black" => "30",
        "red" => "31",
        "green" => "32",
        "yellow" => "33",
        "blue" => "34",
        "magenta" => "35",
        "cyan" => "36",
        "white" => "37",
        "default" => "39",

        // Bright colors (90-97)
        "bright_black" | "gray" | "grey" => "90",
        "bright_red" | "light_red" => "91",
        "bright_green" | "light_green" => "92",
        "bright_yellow" | "light_yellow" => "93",
        "bright_blue" | "light_blue" => "94",
        "bright_magenta" | "light_magenta" => "95",
        "bright_cyan" | "light_cyan" => "96",
        "bright_white" | "light_white" => "97",

        // Additional aliases
        "orange" => "91",
        "purple" => "35",
        "violet" => "95",

        _ => return None,
    };
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_hex_and_raw_codes() {
        assert_eq!(parse_color("red"), "31");
        assert_eq!(parse_color("bold bright_blue"), "1;94");
        assert_eq!(parse_color("#ff8000"), "38;2;255;128;0");
        assert_eq!(parse_color("1;31"), "1;31");
    }

    #[test]
    fn casing_does_not_matter() {
        assert_eq!(parse_color("RED"), parse_color("red"));
        assert_eq!(parse_color("Bright-Green"), "92");
    }

    #[test]
    fn parsed_colors_parse_to_themselves() {
        for spec in ["bold red", "#123456", "gray", "4;35"] {
            let once = parse_color(spec);
            assert_eq!(parse_color(&once), once);
        }
    }

    #[test]
    fn unknown_words_are_dropped() {
        assert_eq!(parse_color("sparkly red"), "31");
        assert_eq!(parse_color(""), "");
    }

    #[test]
    fn sgr_wraps_codes() {
        assert_eq!(sgr("31"), "\x1b[31m");
        assert_eq!(sgr(""), "");
    }
}
