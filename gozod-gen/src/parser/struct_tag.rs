//! Go struct tag access.
//!
//! Struct tags are conventionally a space-separated list of `key:"value"`
//! pairs. [`lookup`] follows the standard library's lookup rules exactly,
//! including its handling of malformed tags: scanning stops at the first
//! pair that does not fit the convention.

/// Returns the value stored under `key`, or `None` when the key is absent
/// or the tag is malformed before reaching it.
pub fn lookup(tag: &str, key: &str) -> Option<String> {
    let mut rest = tag.as_bytes();
    loop {
        let skip = rest.iter().take_while(|&&b| b == b' ').count();
        rest = &rest[skip..];
        if rest.is_empty() {
            return None;
        }

        let name_len = rest
            .iter()
            .take_while(|&&b| b > b' ' && b != b':' && b != b'"' && b != 0x7f)
            .count();
        if name_len == 0
            || name_len + 1 >= rest.len()
            || rest[name_len] != b':'
            || rest[name_len + 1] != b'"'
        {
            return None;
        }
        let name = &rest[..name_len];
        rest = &rest[name_len + 1..];

        let mut i = 1;
        while i < rest.len() && rest[i] != b'"' {
            if rest[i] == b'\\' {
                i += 1;
            }
            i += 1;
        }
        if i >= rest.len() {
            return None;
        }
        let quoted = &rest[..=i];
        rest = &rest[i + 1..];

        if name == key.as_bytes() {
            return std::str::from_utf8(quoted).ok().and_then(unquote);
        }
    }
}

/// Decodes a Go string literal: interpreted (`"…"`) or raw (`` `…` ``).
pub fn unquote(literal: &str) -> Option<String> {
    if let Some(raw) = literal
        .strip_prefix('`')
        .and_then(|s| s.strip_suffix('`'))
    {
        if raw.contains('`') {
            return None;
        }
        return Some(raw.replace('\r', ""));
    }

    let body = literal.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' | '\n' => return None,
            '\\' => out.push(unescape(&mut chars)?),
            other => out.push(other),
        }
    }
    Some(out)
}

fn unescape(chars: &mut std::str::Chars<'_>) -> Option<char> {
    let c = chars.next()?;
    Some(match c {
        'a' => '\u{7}',
        'b' => '\u{8}',
        'f' => '\u{c}',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'v' => '\u{b}',
        '\\' => '\\',
        '"' => '"',
        'x' => char::from(u8::try_from(hex_digits(chars, 2)?).ok()?),
        'u' => char::from_u32(hex_digits(chars, 4)?)?,
        'U' => char::from_u32(hex_digits(chars, 8)?)?,
        '0'..='7' => {
            let mut value = c.to_digit(8)?;
            for _ in 0..2 {
                value = value * 8 + chars.next()?.to_digit(8)?;
            }
            char::from(u8::try_from(value).ok()?)
        }
        _ => return None,
    })
}

fn hex_digits(chars: &mut std::str::Chars<'_>, count: usize) -> Option<u32> {
    let mut value = 0u32;
    for _ in 0..count {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    Some(value)
}
