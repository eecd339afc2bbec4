//! Record name normalization and TXT value cleanup.
//!
//! Case and dot-termination differences between the name we store and
//! the name a resolver expects are a common source of false negatives,
//! so every query goes through [`normalize_record_name`] first.

/// Lower-case a DNS name and enforce exactly one trailing dot.
#[must_use]
pub fn normalize_record_name(name: &str) -> String {
    let trimmed = name.trim().trim_end_matches('.');
    let mut normalized = trimmed.to_ascii_lowercase();
    normalized.push('.');
    normalized
}

/// Build the verification host for a domain, e.g.
/// `record_host("_domainverify", "Example.com")` is
/// `_domainverify.example.com.`.
#[must_use]
pub fn record_host(label: &str, domain: &str) -> String {
    let label = label.trim().trim_matches('.');
    let domain = domain.trim().trim_matches('.');
    normalize_record_name(&format!("{label}.{domain}"))
}

/// Strip transport artifacts from a TXT value.
///
/// DoH JSON encodings present TXT data as one or more quoted
/// character-strings (`"abc"` or `"part1" "part2"`). Quoted segments are
/// decoded and concatenated; unquoted values are only trimmed. The token
/// itself is never case-folded.
#[must_use]
pub fn clean_txt_value(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') {
        if let Some(joined) = join_quoted_segments(trimmed) {
            return joined;
        }
    }
    trimmed.trim_matches('"').trim().to_string()
}

/// Decode `"a" "b"` into `ab`. Returns `None` on unbalanced quotes or
/// stray text between segments.
fn join_quoted_segments(data: &str) -> Option<String> {
    let mut out = String::with_capacity(data.len());
    let mut chars = data.chars();

    loop {
        // Skip whitespace between segments.
        let next = loop {
            match chars.next() {
                Some(c) if c.is_whitespace() => continue,
                other => break other,
            }
        };

        match next {
            None => return Some(out),
            Some('"') => {}
            Some(_) => return None,
        }

        loop {
            match chars.next()? {
                '"' => break,
                '\\' => out.push(decode_escape(&mut chars)?),
                c => out.push(c),
            }
        }
    }
}

/// Decode the character after a backslash: `\DDD` decimal or a literal.
fn decode_escape(chars: &mut std::str::Chars<'_>) -> Option<char> {
    let first = chars.next()?;
    if !first.is_ascii_digit() {
        return Some(first);
    }

    let mut digits = String::from(first);
    for _ in 0..2 {
        let c = chars.next()?;
        if !c.is_ascii_digit() {
            return None;
        }
        digits.push(c);
    }
    digits.parse::<u8>().ok().map(char::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_trailing_dot() {
        assert_eq!(
            normalize_record_name("_DomainVerify.Example.COM"),
            "_domainverify.example.com."
        );
        assert_eq!(
            normalize_record_name("_domainverify.example.com."),
            "_domainverify.example.com."
        );
        assert_eq!(
            normalize_record_name(" _domainverify.example.com.. "),
            "_domainverify.example.com."
        );
    }

    #[test]
    fn builds_record_host() {
        assert_eq!(
            record_host("_domainverify", "Example.com"),
            "_domainverify.example.com."
        );
        assert_eq!(
            record_host("_domainverify", "example.com."),
            "_domainverify.example.com."
        );
    }

    #[test]
    fn strips_quotes_from_doh_values() {
        assert_eq!(clean_txt_value("\"abc123XYZ\""), "abc123XYZ");
        assert_eq!(clean_txt_value("  abc123XYZ "), "abc123XYZ");
        assert_eq!(clean_txt_value("abc123XYZ"), "abc123XYZ");
    }

    #[test]
    fn joins_multi_segment_values() {
        assert_eq!(clean_txt_value("\"abc\" \"123\""), "abc123");
        assert_eq!(clean_txt_value("\"say \\\"hi\\\"\""), "say \"hi\"");
        assert_eq!(clean_txt_value("\"a\\059b\""), "a;b");
    }

    #[test]
    fn keeps_case_of_token() {
        assert_eq!(clean_txt_value("\"AbC\""), "AbC");
    }

    #[test]
    fn unbalanced_quotes_fall_back_to_trim() {
        assert_eq!(clean_txt_value("\"abc"), "abc");
    }
}
