/// Whether `name` is "boring": starts with an ASCII letter or underscore,
/// followed only by ASCII letters, digits, or underscores. Boring names never
/// need bracket-escaping.
pub fn is_boring_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Identifier form used when probing a table via `PRAGMA table_info(...)`:
/// boring names pass through verbatim, anything else is wrapped in square
/// brackets. This mirrors the reference implementation's historical (and
/// slightly inconsistent) escaping, which only ever bracket-escapes
/// identifiers headed into a `PRAGMA` call.
pub fn bracket_escape_for_pragma(name: &str) -> String {
    if is_boring_identifier(name) {
        name.to_string()
    } else {
        format!("[{name}]")
    }
}

/// Identifier form used everywhere else (FROM clauses, WHERE column
/// references): always double-quoted, with embedded quotes doubled per SQL's
/// own escaping rule.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boring_names_pass_through() {
        assert!(is_boring_identifier("widgets"));
        assert!(is_boring_identifier("_private"));
        assert!(is_boring_identifier("table_1"));
        assert_eq!(bracket_escape_for_pragma("widgets"), "widgets");
    }

    #[test]
    fn names_starting_with_digits_are_not_boring() {
        assert!(!is_boring_identifier("123_starts_with_digits"));
        assert_eq!(
            bracket_escape_for_pragma("123_starts_with_digits"),
            "[123_starts_with_digits]"
        );
    }

    #[test]
    fn quote_ident_doubles_embedded_quotes() {
        assert_eq!(quote_ident("widgets"), "\"widgets\"");
        assert_eq!(quote_ident("weird\"name"), "\"weird\"\"name\"");
    }
}
