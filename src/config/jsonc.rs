//! JSON with comments and trailing commas
//!
//! Comments and trailing commas are overwritten with spaces before the text
//! is handed to `serde_json`, so byte offsets in error messages still point
//! into the original document.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsoncError {
    /// Byte offset into the original text
    pub offset: usize,
    pub message: String,
}

pub fn parse(text: &str) -> Result<Value, JsoncError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut bytes = text.as_bytes().to_vec();
    blank_comments(&mut bytes);
    blank_trailing_commas(&mut bytes);

    // Only ASCII bytes were replaced by ASCII spaces
    let cleaned = String::from_utf8_lossy(&bytes);
    serde_json::from_str(&cleaned).map_err(|e| JsoncError {
        offset: line_column_to_offset(text, e.line(), e.column()),
        message: e.to_string(),
    })
}

fn blank_comments(bytes: &mut [u8]) {
    let mut i = 0;
    let mut in_string = false;
    while i < bytes.len() {
        let b = bytes[i];
        if in_string {
            match b {
                b'\\' => i += 1,
                b'"' => in_string = false,
                _ => {}
            }
            i += 1;
            continue;
        }
        match (b, bytes.get(i + 1)) {
            (b'"', _) => {
                in_string = true;
                i += 1;
            }
            (b'/', Some(b'/')) => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    bytes[i] = b' ';
                    i += 1;
                }
            }
            (b'/', Some(b'*')) => {
                bytes[i] = b' ';
                bytes[i + 1] = b' ';
                i += 2;
                while i < bytes.len() {
                    if bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/') {
                        bytes[i] = b' ';
                        bytes[i + 1] = b' ';
                        i += 2;
                        break;
                    }
                    if bytes[i] != b'\n' {
                        bytes[i] = b' ';
                    }
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }
}

/// Runs after comments are gone, so only whitespace can follow a trailing comma
fn blank_trailing_commas(bytes: &mut [u8]) {
    let mut in_string = false;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if in_string {
            match b {
                b'\\' => i += 1,
                b'"' => in_string = false,
                _ => {}
            }
        } else if b == b'"' {
            in_string = true;
        } else if b == b',' {
            let next = bytes[i + 1..]
                .iter()
                .find(|c| !c.is_ascii_whitespace())
                .copied();
            if matches!(next, Some(b'}') | Some(b']')) {
                bytes[i] = b' ';
            }
        }
        i += 1;
    }
}

fn line_column_to_offset(text: &str, line: usize, column: usize) -> usize {
    if line == 0 {
        return 0;
    }
    let line_start: usize = text
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn comments_and_trailing_commas() {
        let text = r#"
            // leading comment
            {
                "display": { "separator": " // not a comment ", }, /* block
                spanning lines */
                "modules": ["title", "uptime",],
            }
        "#;
        assert_eq!(
            parse(text).unwrap(),
            json!({
                "display": {"separator": " // not a comment "},
                "modules": ["title", "uptime"]
            })
        );
    }

    #[test]
    fn escaped_quotes_stay_inside_strings() {
        let value = parse(r#"{"key": "a \"/* b */\" c",}"#).unwrap();
        assert_eq!(value, json!({"key": "a \"/* b */\" c"}));
    }

    #[test]
    fn errors_carry_a_byte_offset() {
        let text = "{\n  \"a\": 1,\n  \"b\" 2\n}";
        let err = parse(text).unwrap_err();
        // third line spans bytes 12..20
        assert!((12..=20).contains(&err.offset), "{}", err.offset);
        assert!(err.message.contains("line 3"));
    }

    #[test]
    fn non_ascii_text_in_comments_is_fine() {
        let value = parse("{ /* ünïcödé ✓ */ \"a\": \"ü\" }").unwrap();
        assert_eq!(value, json!({"a": "ü"}));
    }
}
