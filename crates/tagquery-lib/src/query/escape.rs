//! String literal escapes.

use std::ops::Range;

/// Bad escape sequence at a byte range relative to the raw string content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidEscape {
    pub range: Range<usize>,
    pub sequence: String,
}

/// Resolves `\\ \" \n \t \r \0` in the raw content between quotes.
pub fn unescape(raw: &str) -> Result<String, InvalidEscape> {
    if !raw.contains('\\') {
        return Ok(raw.to_string());
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.char_indices();
    while let Some((i, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some((j, escaped)) = chars.next() else {
            return Err(InvalidEscape {
                range: i..raw.len(),
                sequence: "\\".to_string(),
            });
        };
        let resolved = match escaped {
            '\\' => '\\',
            '"' => '"',
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            other => {
                return Err(InvalidEscape {
                    range: i..j + other.len_utf8(),
                    sequence: format!("\\{other}"),
                });
            }
        };
        out.push(resolved);
    }
    Ok(out)
}
