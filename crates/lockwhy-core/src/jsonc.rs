//! Relaxed-JSON parsing for the lockfile.
//!
//! The lockfile dialect permits `//` and `/* */` comments plus trailing
//! commas before `}` or `]`. Parsing is two-stage: comments are always
//! stripped first, then the text goes through a strict `serde_json` parse.
//! Trailing commas are only stripped if that strict parse fails, so strings
//! that legitimately contain comma-bracket sequences are never corrupted.

use serde::de::DeserializeOwned;

/// Parse relaxed-JSON text into `T`.
pub fn from_str<T: DeserializeOwned>(text: &str) -> Result<T, serde_json::Error> {
    let stripped = strip_comments(text);
    match serde_json::from_str(&stripped) {
        Ok(value) => Ok(value),
        Err(_) => serde_json::from_str(&strip_trailing_commas(&stripped)),
    }
}

/// Replace `//` and `/* */` comments with spaces, leaving string literals
/// (double- or single-quoted) untouched. Spaces keep byte offsets stable so
/// parse errors still point at the right spot.
fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string: Option<char> = None;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if let Some(quote) = in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == quote {
                in_string = None;
            }
            continue;
        }

        match c {
            '"' | '\'' => {
                in_string = Some(c);
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                chars.next();
                out.push_str("  ");
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    chars.next();
                    out.push(' ');
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                out.push_str("  ");
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                    } else {
                        out.push(' ');
                    }
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            _ => out.push(c),
        }
    }

    out
}

/// Remove commas whose next non-whitespace character is `}` or `]`,
/// outside string literals.
fn strip_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string: Option<char> = None;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if let Some(quote) = in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == quote {
                in_string = None;
            }
            continue;
        }

        match c {
            '"' | '\'' => {
                in_string = Some(c);
                out.push(c);
            }
            ',' => {
                // A comma whose next non-whitespace is a closer is trailing.
                let next = chars[i + 1..].iter().find(|n| !n.is_whitespace());
                if !matches!(next, Some('}' | ']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }

    out
}
