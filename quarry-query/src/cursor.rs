use percent_encoding::percent_decode_str;

/// Percent-encodes a single cursor component the way a form-urlencoded value
/// would be: letters, digits and `-_.~` pass through, a space becomes `+`,
/// everything else becomes `%XX`.
fn quote_plus(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Inverse of [`quote_plus`]: `+` becomes a space, then the remainder is
/// percent-decoded.
pub fn unquote_plus(value: &str) -> String {
    let with_spaces = value.replace('+', " ");
    percent_decode_str(&with_spaces).decode_utf8_lossy().into_owned()
}

/// Builds the opaque `after` cursor token from a row's primary-key tuple (or
/// its rowid, when the table has none). Components are comma-joined after
/// each is percent-encoded, so primary-key values containing a literal comma
/// round-trip correctly.
pub fn encode_cursor(components: &[String]) -> String {
    components
        .iter()
        .map(|c| quote_plus(c))
        .collect::<Vec<_>>()
        .join(",")
}

/// Splits and percent-decodes a cursor token back into its components. Does
/// not know how many components to expect; the caller compares the result's
/// length against the table's primary-key count.
pub fn decode_cursor(token: &str) -> Vec<String> {
    token.split(',').map(unquote_plus).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_simple_values() {
        let components = vec!["1".to_string()];
        let token = encode_cursor(&components);
        assert_eq!(decode_cursor(&token), components);
    }

    #[test]
    fn round_trips_compound_values_with_commas_and_spaces() {
        let components = vec!["a, b".to_string(), "c".to_string(), "d e".to_string()];
        let token = encode_cursor(&components);
        assert_eq!(decode_cursor(&token), components);
    }

    #[test]
    fn space_becomes_plus() {
        assert_eq!(quote_plus("a b"), "a+b");
        assert_eq!(unquote_plus("a+b"), "a b");
    }
}
