//! Format-string interpreter used by `--<module>-format` and key templates.
//!
//! Grammar, scanned once left to right:
//!
//! * `{n}` / `{n.m}`: 1-based argument `n`, optional sub-format `m`
//!   (decimals for doubles, zero-padded width for integers, max chars for text)
//! * `{{` and `}}`: literal braces; a lone `}` is also kept as-is
//! * `{#spec}`: color escape (`{#}` resets), dropped when colors are off
//! * `{?n}..{?}`: body kept only if argument `n` is set
//! * `{/n}..{/}`: body kept only if argument `n` is not set
//!
//! Arguments are substituted after the template is tokenized, so argument
//! text is never interpreted as template syntax. Anything malformed renders
//! empty and is reported through [`Formatted::warnings`].

use crate::utils::color::{parse_color, sgr};
use std::fmt;

/// One substitutable slot exposed by a module
#[derive(Debug, Clone, PartialEq)]
pub enum FormatArg<'a> {
    Str(&'a str),
    Text(String),
    Uint(u32),
    Uint64(u64),
    Double(f64),
}

impl FormatArg<'_> {
    /// Whether `{?n}` conditionals treat this argument as present
    pub fn is_set(&self) -> bool {
        match self {
            FormatArg::Str(s) => !s.is_empty(),
            FormatArg::Text(s) => !s.is_empty(),
            FormatArg::Uint(n) => *n != 0,
            FormatArg::Uint64(n) => *n != 0,
            FormatArg::Double(n) => *n != 0.0,
        }
    }

    fn render(&self, sub_format: Option<usize>, out: &mut String) {
        match self {
            FormatArg::Str(s) => push_text(s, sub_format, out),
            FormatArg::Text(s) => push_text(s, sub_format, out),
            FormatArg::Uint(n) => push_unsigned(u64::from(*n), sub_format, out),
            FormatArg::Uint64(n) => push_unsigned(*n, sub_format, out),
            FormatArg::Double(n) => {
                out.push_str(&format!("{:.*}", sub_format.unwrap_or(2), n));
            }
        }
    }
}

fn push_text(s: &str, max_chars: Option<usize>, out: &mut String) {
    match max_chars {
        Some(max) => out.extend(s.chars().take(max)),
        None => out.push_str(s),
    }
}

fn push_unsigned(n: u64, width: Option<usize>, out: &mut String) {
    match width {
        Some(width) => out.push_str(&format!("{:0width$}", n, width = width)),
        None => out.push_str(&n.to_string()),
    }
}

impl<'a> From<&'a str> for FormatArg<'a> {
    fn from(value: &'a str) -> Self {
        FormatArg::Str(value)
    }
}

impl<'a> From<&'a String> for FormatArg<'a> {
    fn from(value: &'a String) -> Self {
        FormatArg::Str(value.as_str())
    }
}

impl From<String> for FormatArg<'_> {
    fn from(value: String) -> Self {
        FormatArg::Text(value)
    }
}

impl From<u32> for FormatArg<'_> {
    fn from(value: u32) -> Self {
        FormatArg::Uint(value)
    }
}

impl From<u64> for FormatArg<'_> {
    fn from(value: u64) -> Self {
        FormatArg::Uint64(value)
    }
}

impl From<f64> for FormatArg<'_> {
    fn from(value: f64) -> Self {
        FormatArg::Double(value)
    }
}

/// Soft problems found while evaluating a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatWarning {
    IndexOutOfRange { index: usize, available: usize },
    InvalidPlaceholder(String),
    Unterminated { offset: usize },
    UnbalancedConditional,
}

impl fmt::Display for FormatWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatWarning::IndexOutOfRange { index, available } => write!(
                f,
                "placeholder {{{}}} is out of range ({} arguments available)",
                index, available
            ),
            FormatWarning::InvalidPlaceholder(content) => {
                write!(f, "invalid placeholder {{{}}}", content)
            }
            FormatWarning::Unterminated { offset } => {
                write!(f, "unterminated placeholder at byte {}", offset)
            }
            FormatWarning::UnbalancedConditional => write!(f, "unbalanced conditional block"),
        }
    }
}

/// Result of evaluating a template
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Formatted {
    pub text: String,
    pub warnings: Vec<FormatWarning>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token<'t> {
    Literal(&'t str),
    Arg { index: usize, sub_format: Option<usize> },
    Color(&'t str),
    If { index: usize, negate: bool },
    EndIf,
    Invalid(&'t str),
}

/// Largest `m` in `{n.m}`; wider paddings or precisions are rejected
const MAX_SUB_FORMAT: usize = 255;

fn classify(content: &str) -> Token<'_> {
    if let Some(spec) = content.strip_prefix('#') {
        return Token::Color(spec);
    }
    if content == "?" || content == "/" {
        return Token::EndIf;
    }
    for (prefix, negate) in [('?', false), ('/', true)] {
        if let Some(index) = content.strip_prefix(prefix) {
            return match parse_index(index) {
                Some(index) => Token::If { index, negate },
                None => Token::Invalid(content),
            };
        }
    }

    let (index, sub_format) = match content.split_once('.') {
        Some((index, sub)) => (index, Some(sub)),
        None => (content, None),
    };
    match (parse_index(index), sub_format.map(parse_index)) {
        (Some(index), None) => Token::Arg { index, sub_format: None },
        (Some(index), Some(Some(sub))) if sub <= MAX_SUB_FORMAT => {
            Token::Arg { index, sub_format: Some(sub) }
        }
        _ => Token::Invalid(content),
    }
}

fn parse_index(digits: &str) -> Option<usize> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn tokenize<'t>(template: &'t str, warnings: &mut Vec<FormatWarning>) -> Vec<Token<'t>> {
    let bytes = template.as_bytes();
    let mut tokens = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' => {
                if literal_start < i {
                    tokens.push(Token::Literal(&template[literal_start..i]));
                }
                if bytes.get(i + 1) == Some(&b'{') {
                    tokens.push(Token::Literal(&template[i..i + 1]));
                    i += 2;
                } else if let Some(close) = template[i + 1..].find('}') {
                    tokens.push(classify(&template[i + 1..i + 1 + close]));
                    i += close + 2;
                } else {
                    warnings.push(FormatWarning::Unterminated { offset: i });
                    tokens.push(Token::Literal(&template[i..]));
                    i = bytes.len();
                }
                literal_start = i;
            }
            b'}' => {
                if literal_start < i {
                    tokens.push(Token::Literal(&template[literal_start..i]));
                }
                tokens.push(Token::Literal(&template[i..i + 1]));
                i += if bytes.get(i + 1) == Some(&b'}') { 2 } else { 1 };
                literal_start = i;
            }
            _ => i += 1,
        }
    }

    if literal_start < bytes.len() {
        tokens.push(Token::Literal(&template[literal_start..]));
    }
    tokens
}

/// Evaluate `template` against `args`. `colors` controls whether `{#..}` emits escapes.
pub fn format_template(template: &str, args: &[FormatArg<'_>], colors: bool) -> Formatted {
    let mut warnings = Vec::new();
    let tokens = tokenize(template, &mut warnings);
    let mut text = String::with_capacity(template.len());

    let lookup = |index: usize, warnings: &mut Vec<FormatWarning>| {
        let arg = index.checked_sub(1).and_then(|i| args.get(i));
        if arg.is_none() {
            warnings.push(FormatWarning::IndexOutOfRange {
                index,
                available: args.len(),
            });
        }
        arg
    };

    let mut skip_depth = 0usize;
    let mut open_blocks = 0usize;

    for token in tokens {
        if skip_depth > 0 {
            match token {
                Token::If { .. } => skip_depth += 1,
                Token::EndIf => skip_depth -= 1,
                _ => {}
            }
            continue;
        }

        match token {
            Token::Literal(s) => text.push_str(s),
            Token::Arg { index, sub_format } => {
                if let Some(arg) = lookup(index, &mut warnings) {
                    arg.render(sub_format, &mut text);
                }
            }
            Token::Color(spec) => {
                if colors {
                    let code = if spec.is_empty() { "0".to_string() } else { parse_color(spec) };
                    text.push_str(&sgr(&code));
                }
            }
            Token::If { index, negate } => {
                let set = lookup(index, &mut warnings).map_or(false, FormatArg::is_set);
                if set == negate {
                    skip_depth = 1;
                } else {
                    open_blocks += 1;
                }
            }
            Token::EndIf => {
                if open_blocks == 0 {
                    warnings.push(FormatWarning::UnbalancedConditional);
                } else {
                    open_blocks -= 1;
                }
            }
            Token::Invalid(content) => {
                warnings.push(FormatWarning::InvalidPlaceholder(content.to_string()));
            }
        }
    }

    if skip_depth > 0 || open_blocks > 0 {
        warnings.push(FormatWarning::UnbalancedConditional);
    }

    Formatted { text, warnings }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fmt(template: &str, args: &[FormatArg<'_>]) -> Formatted {
        format_template(template, args, true)
    }

    #[test]
    fn literal_text_passes_through() {
        for template in ["", "plain text", "ünïcødé ✓ 日本", "a: b; c"] {
            let out = fmt(template, &[]);
            assert_eq!(out.text, template);
            assert!(out.warnings.is_empty());
        }
    }

    #[test]
    fn single_placeholders_stringify_their_argument() {
        let args = [
            FormatArg::Str("hello"),
            FormatArg::Text("owned".to_string()),
            FormatArg::Uint(7),
            FormatArg::Uint64(90_000_000),
            FormatArg::Double(1.5),
        ];
        assert_eq!(fmt("{1}", &args).text, "hello");
        assert_eq!(fmt("{2}", &args).text, "owned");
        assert_eq!(fmt("{3}", &args).text, "7");
        assert_eq!(fmt("{4}", &args).text, "90000000");
        assert_eq!(fmt("{5}", &args).text, "1.50");
    }

    #[test]
    fn out_of_range_renders_empty_with_warning() {
        let out = fmt("a{3}b{0}c", &[FormatArg::Uint(1)]);
        assert_eq!(out.text, "abc");
        assert_eq!(
            out.warnings,
            vec![
                FormatWarning::IndexOutOfRange { index: 3, available: 1 },
                FormatWarning::IndexOutOfRange { index: 0, available: 1 },
            ]
        );
    }

    #[test]
    fn sub_formats() {
        let args = [FormatArg::Double(3.14159), FormatArg::Uint(7), FormatArg::Str("abcdef")];
        assert_eq!(fmt("{1.3}", &args).text, "3.142");
        assert_eq!(fmt("{1.0}", &args).text, "3");
        assert_eq!(fmt("{2.3}", &args).text, "007");
        assert_eq!(fmt("{3.2}", &args).text, "ab");
    }

    #[test]
    fn oversized_sub_formats_render_empty() {
        let args = [FormatArg::Uint(7), FormatArg::Double(1.5), FormatArg::Str("abc")];
        for template in ["{1.70000}", "{1.99999999999}", "{2.256}", "{3.99999999999999999999999}"] {
            let out = fmt(template, &args);
            assert_eq!(out.text, "");
            assert_eq!(
                out.warnings,
                vec![FormatWarning::InvalidPlaceholder(template[1..template.len() - 1].to_string())]
            );
        }
        assert_eq!(fmt("{1.255}", &args).text.len(), 255);
        assert_eq!(fmt("{2.255}", &args).text.len(), 257);
    }

    #[test]
    fn doubled_braces_escape() {
        let out = fmt("{{{1}}} }", &[FormatArg::Str("x")]);
        assert_eq!(out.text, "{x} }");
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn argument_text_is_not_reinterpreted() {
        let out = fmt("[{1}]", &[FormatArg::Str("{2}{#red}")]);
        assert_eq!(out.text, "[{2}{#red}]");
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn unterminated_placeholder_is_kept_literally() {
        let out = fmt("value {1", &[FormatArg::Uint(3)]);
        assert_eq!(out.text, "value {1");
        assert_eq!(out.warnings, vec![FormatWarning::Unterminated { offset: 6 }]);
    }

    #[test]
    fn unknown_placeholder_renders_empty() {
        let out = fmt("<{abc}>", &[]);
        assert_eq!(out.text, "<>");
        assert_eq!(out.warnings, vec![FormatWarning::InvalidPlaceholder("abc".into())]);
    }

    #[test]
    fn colors_follow_the_switch() {
        let args = [FormatArg::Str("x")];
        assert_eq!(fmt("{#red}{1}{#}", &args).text, "\x1b[31mx\x1b[0m");
        assert_eq!(format_template("{#red}{1}{#}", &args, false).text, "x");
    }

    #[test]
    fn conditionals_and_negations() {
        let args = [FormatArg::Str("ssd"), FormatArg::Str(""), FormatArg::Uint(0)];
        assert_eq!(fmt("a{?1} [{1}]{?}", &args).text, "a [ssd]");
        assert_eq!(fmt("a{?2} [{2}]{?}", &args).text, "a");
        assert_eq!(fmt("{/2}none{/}", &args).text, "none");
        assert_eq!(fmt("{/3}zero{/}{?3}nonzero{?}", &args).text, "zero");
    }

    #[test]
    fn nested_conditionals_skip_as_a_block() {
        let args = [FormatArg::Str(""), FormatArg::Str("y")];
        let out = fmt("<{?1}a{?2}b{?}c{?}>", &args);
        assert_eq!(out.text, "<>");
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn unbalanced_conditionals_warn() {
        let out = fmt("{?1}open", &[FormatArg::Str("x")]);
        assert_eq!(out.text, "open");
        assert_eq!(out.warnings, vec![FormatWarning::UnbalancedConditional]);
    }
}
