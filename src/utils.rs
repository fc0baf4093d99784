use http::header::HeaderValue;
use memchr::memchr_iter;

pub(crate) const DASHES: [u8; 2] = [b'-', b'-']; // `--`
pub(crate) const CRLFS: [u8; 4] = [b'\r', b'\n', b'\r', b'\n']; // `\r\n\r\n`

pub(crate) fn parse_content_type(header: Option<&HeaderValue>) -> Option<mime::Mime> {
    header
        .map(HeaderValue::to_str)
        .and_then(Result::ok)
        .map(str::parse)
        .and_then(Result::ok)
}

/// Bytes stripped from both ends of parts, bodies and header lines.
fn is_blank(b: &u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\0' | 0x0B)
}

pub(crate) fn trim(bytes: &[u8]) -> &[u8] {
    let Some(start) = bytes.iter().position(|b| !is_blank(b)) else {
        return &[];
    };
    // `start` found a non-blank byte, so `rposition` does too
    let end = bytes.iter().rposition(|b| !is_blank(b)).unwrap_or(start);
    &bytes[start..=end]
}

pub(crate) fn is_blank_slice(bytes: &[u8]) -> bool {
    bytes.iter().all(is_blank)
}

/// Splits once on the first blank line: `\r\n\r\n`, `\n\n`, `\r\n\n` or `\n\r\n`.
pub(crate) fn split_blank_line(bytes: &[u8]) -> Option<(&[u8], &[u8])> {
    for i in memchr_iter(b'\n', bytes) {
        let rest = &bytes[i + 1..];
        let skip = if rest.starts_with(b"\n") {
            1
        } else if rest.starts_with(b"\r\n") {
            2
        } else {
            continue;
        };
        let end = if i > 0 && bytes[i - 1] == b'\r' { i - 1 } else { i };
        return Some((&bytes[..end], &rest[skip..]));
    }
    None
}

/// Splits on `\r\n` or `\n`.
pub(crate) fn lines(bytes: &[u8]) -> impl Iterator<Item = &[u8]> {
    bytes
        .split(|b| *b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
}
