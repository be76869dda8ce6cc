//! Text canonicalization for feed fields.

/// A text value as delivered by the feed.
///
/// Feeds occasionally ship fields in a legacy `=XX` byte-escaped form. Those
/// arrive as `Encoded` and are decoded exactly once, when resolved; `Plain`
/// text is never decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextField {
    Plain(String),
    Encoded(String),
}

impl TextField {
    /// The field's text with any legacy escapes decoded.
    pub fn resolve(&self) -> String {
        match self {
            TextField::Plain(text) => text.clone(),
            TextField::Encoded(raw) => decode_legacy_escapes(raw),
        }
    }
}

impl From<&str> for TextField {
    fn from(text: &str) -> Self {
        TextField::Plain(text.to_string())
    }
}

/// Canonicalize whitespace: CRLF becomes LF, every whitespace run collapses
/// to a single space, and the result is trimmed.
pub fn normalize(input: &str) -> String {
    input
        .replace("\r\n", "\n")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// `normalize` for an optional value; absent input yields empty text.
pub fn normalize_opt(input: Option<&str>) -> String {
    input.map(normalize).unwrap_or_default()
}

/// Decode `=XX` byte escapes (hex, case-insensitive).
///
/// An `=` that is not followed by two hex digits is kept as is. Decoded bytes
/// are read as UTF-8; if they do not form valid UTF-8 each escaped byte is
/// taken as its Latin-1 character instead.
pub fn decode_legacy_escapes(text: &str) -> String {
    if !text.contains('=') {
        return text.to_string();
    }

    let bytes = text.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'='
            && i + 2 < bytes.len()
            && let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2]))
        {
            decoded.push((hi << 4) | lo);
            i += 3;
            continue;
        }
        decoded.push(bytes[i]);
        i += 1;
    }

    match String::from_utf8(decoded) {
        Ok(s) => s,
        Err(_) => {
            tracing::debug!(text, "legacy escapes are not UTF-8, decoding as Latin-1");
            decode_latin1(text)
        }
    }
}

/// Each `=XX` becomes the char with that code point; other text is kept.
fn decode_latin1(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find('=') {
        result.push_str(&rest[..pos]);
        let tail = rest[pos..].as_bytes();

        if tail.len() >= 3
            && let (Some(hi), Some(lo)) = (hex_value(tail[1]), hex_value(tail[2]))
        {
            result.push(char::from((hi << 4) | lo));
            rest = &rest[pos + 3..];
        } else {
            result.push('=');
            rest = &rest[pos + 1..];
        }
    }
    result.push_str(rest);

    result
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
