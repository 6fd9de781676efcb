use super::escape::{InvalidEscape, unescape};

#[test]
fn plain_text_is_unchanged() {
    assert_eq!(unescape("class").unwrap(), "class");
    assert_eq!(unescape("").unwrap(), "");
}

#[test]
fn known_escapes() {
    assert_eq!(unescape(r#"a\"b"#).unwrap(), "a\"b");
    assert_eq!(unescape(r"^#\\s*").unwrap(), r"^#\s*");
    assert_eq!(unescape(r"\n\t\r\0").unwrap(), "\n\t\r\0");
}

#[test]
fn non_ascii_passes_through() {
    assert_eq!(unescape(r"é\n").unwrap(), "é\n");
}

#[test]
fn unknown_escape() {
    assert_eq!(
        unescape(r"ab\qc"),
        Err(InvalidEscape {
            range: 2..4,
            sequence: r"\q".to_string(),
        })
    );
}

#[test]
fn unknown_escape_with_wide_char() {
    let err = unescape(r"\é").unwrap_err();
    assert_eq!(err.range, 0..3);
    assert_eq!(err.sequence, r"\é");
}

#[test]
fn trailing_backslash() {
    let err = unescape(r"abc\").unwrap_err();
    assert_eq!(err.range, 3..4);
    assert_eq!(err.sequence, r"\");
}
