use bytes::Bytes;
use indexmap::IndexMap;
use memchr::memmem;
use tracing::trace;

use crate::{
    header::HeaderValue,
    utils::{is_blank_slice, lines, split_blank_line, trim, CRLFS, DASHES},
    Error, FileUpload, Result,
};

pub(crate) const CONTENT_DISPOSITION: &str = "Content-Disposition";
pub(crate) const CONTENT_TYPE: &str = "Content-Type";

const NAME: &str = "name";
const FILE_NAME: &str = "filename";

/// Finds the boundary on the first line of a body.
///
/// The line must start with `--`; the rest of it is taken verbatim.
#[must_use]
pub fn find_boundary(body: &[u8]) -> Option<String> {
    let line = lines(body).next().map(trim)?;
    let token = line.strip_prefix(&DASHES)?;

    if token.is_empty() {
        return None;
    }

    Some(String::from_utf8_lossy(token).into_owned())
}

/// Splits a body into raw parts on `--boundary`.
///
/// Blank segments are dropped, and so is the trailing segment after the
/// closing delimiter.
#[must_use]
pub fn split(body: &Bytes, boundary: &str) -> Vec<Bytes> {
    let delimiter = [&DASHES[..], boundary.as_bytes()].concat();

    let mut segments = Vec::new();
    let mut start = 0;

    for n in memmem::find_iter(body, &delimiter) {
        segments.push(body.slice(start..n));
        start = n + delimiter.len();
    }
    segments.push(body.slice(start..));

    segments.retain(|s| !is_blank_slice(s));
    segments.pop();

    trace!("split {} parts", segments.len());

    segments
}

/// One segment of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Headers keyed by name as written, the last of repeated names wins.
    pub headers: IndexMap<String, HeaderValue>,
    /// The body, trimmed.
    pub body: Bytes,
    /// The upload, once materialized.
    pub file: Option<FileUpload>,
}

impl Part {
    /// Parses a raw segment produced by [`split`].
    ///
    /// # Errors
    ///
    /// A header line without `:` is [`Error::InvalidHeader`].
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let mut buf = trim(raw).to_vec();
        buf.extend_from_slice(&CRLFS);

        let Some((block, body)) = split_blank_line(&buf) else {
            return Err(Error::InvalidHeader(String::from_utf8_lossy(&buf).into_owned()));
        };

        let mut headers = IndexMap::new();

        for line in lines(block) {
            let Some(n) = memchr::memchr(b':', line) else {
                return Err(Error::InvalidHeader(String::from_utf8_lossy(line).into_owned()));
            };

            let name = String::from_utf8_lossy(&line[..n]).into_owned();
            let value = String::from_utf8_lossy(&line[n + 1..]);

            trace!("parse header {}", name);

            headers.insert(name, HeaderValue::parse(Some(&value)));
        }

        Ok(Self {
            headers,
            body: Bytes::copy_from_slice(trim(body)),
            file: None,
        })
    }

    /// Gets a header by name, case-sensitive.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&HeaderValue> {
        self.headers.get(name)
    }

    /// Gets the `name` of `Content-Disposition`.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.header(CONTENT_DISPOSITION).and_then(|h| h.get(NAME))
    }

    /// Gets the `filename` of `Content-Disposition`.
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.header(CONTENT_DISPOSITION)
            .and_then(|h| h.get(FILE_NAME))
    }

    /// Gets the main value of `Content-Type`.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE).and_then(HeaderValue::main_value)
    }

    /// A part is a file when `Content-Disposition` has a `filename`, even an empty one.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.header(CONTENT_DISPOSITION)
            .is_some_and(|h| h.contains(FILE_NAME))
    }
}
