use std::{fmt, io::Read};

use bytes::{Bytes, BytesMut};
use http::header::{HeaderMap, CONTENT_TYPE};
use tempfile::TempPath;
use tracing::{debug, trace, warn};

use crate::{
    entry::{append, insert},
    part::{find_boundary, split},
    process_file,
    utils::parse_content_type,
    Error, FieldMap, FileMap, Limits, Part, Result,
};

const MAX_FILE_SIZE: &str = "MAX_FILE_SIZE";
const ARRAY: &str = "[]";

/// The parts of one request body.
///
/// A `FormData` is the request scope of its uploads: stored files are
/// removed when it is dropped.
pub struct FormData {
    parts: Vec<Part>,
    temp_files: Vec<TempPath>,
}

impl FormData {
    /// Parses a body, finding the boundary on its first line when not given.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidBoundary`] when there is no boundary, [`Error::InvalidHeader`]
    /// when a part header is malformed.
    pub fn parse<B: Into<Bytes>>(body: B, boundary: Option<&str>) -> Result<Self> {
        let body = body.into();

        let boundary = match boundary {
            Some(b) => b.to_string(),
            None => find_boundary(&body).ok_or(Error::InvalidBoundary)?,
        };

        if boundary.is_empty() {
            return Err(Error::InvalidBoundary);
        }

        trace!("parse form-data with boundary {}", boundary);

        let parts = split(&body, &boundary)
            .iter()
            .map(|raw| Part::parse(raw))
            .collect::<Result<Vec<_>>>()?;

        debug!("parsed {} parts", parts.len());

        Ok(Self {
            parts,
            temp_files: Vec::new(),
        })
    }

    /// Parses a request body by its `Content-Type` and stores its files.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidContentType`] unless the content type is
    /// `multipart/form-data`, otherwise as [`FormData::parse`].
    pub fn from_headers<B: Into<Bytes>>(headers: &HeaderMap, body: B, limits: &Limits) -> Result<Self> {
        let header = headers.get(CONTENT_TYPE);

        let m = parse_content_type(header)
            .filter(|m| m.type_() == mime::MULTIPART && m.subtype() == mime::FORM_DATA)
            .ok_or_else(|| {
                Error::InvalidContentType(
                    header
                        .map(|h| String::from_utf8_lossy(h.as_bytes()).into_owned())
                        .unwrap_or_default(),
                )
            })?;

        let boundary = m.get_param(mime::BOUNDARY).map(|b| b.as_str().to_string());

        let mut form = Self::parse(body, boundary.as_deref())?;
        form.process_files(limits);
        Ok(form)
    }

    /// Reads a body in `buffer_size` chunks, then parses it.
    ///
    /// # Errors
    ///
    /// [`Error::PayloadTooLarge`] past `stream_size`, IO errors of the reader,
    /// otherwise as [`FormData::parse`].
    pub fn from_reader<R: Read>(mut reader: R, boundary: Option<&str>, limits: &Limits) -> Result<Self> {
        let mut body = BytesMut::new();
        let mut buf = vec![0; limits.buffer_size];

        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }

            if let Some(max) = limits.checked_stream_size((body.len() + n) as u64) {
                return Err(Error::PayloadTooLarge(max));
            }

            body.extend_from_slice(&buf[..n]);
            trace!("read bytes {}/{}", n, body.len());
        }

        Self::parse(body.freeze(), boundary)
    }

    /// Gets the parts in body order.
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Gets the parts mutably.
    pub fn parts_mut(&mut self) -> &mut [Part] {
        &mut self.parts
    }

    /// Counts the parts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Has no parts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Classifies and stores every file part.
    ///
    /// `MAX_FILE_SIZE` is read from the submitted fields by its leading digits,
    /// so `3.9` is `3`; a value without leading digits is ignored.
    pub fn process_files(&mut self, limits: &Limits) {
        let max_declared_size = self
            .fields()
            .get(MAX_FILE_SIZE)
            .and_then(|e| e.as_single())
            .and_then(|v| leading_integer(v));

        trace!("max declared size {:?}", max_declared_size);

        for part in self.parts.iter_mut().filter(|p| p.is_file()) {
            if let Some(path) = process_file(part, max_declared_size, limits) {
                self.temp_files.push(path);
            }
        }
    }

    /// Collects the non-file parts.
    ///
    /// A name ending with `[]` collects values into a list under the name
    /// without the brackets. Parts without a name are skipped.
    #[must_use]
    pub fn fields(&self) -> FieldMap {
        let mut fields = FieldMap::new();

        for part in self.parts.iter().filter(|p| !p.is_file()) {
            let name = part.name().unwrap_or_default();
            let (name, is_array) = match name.strip_suffix(ARRAY) {
                Some(name) => (name, true),
                None => (name, false),
            };

            if name.is_empty() {
                trace!("skip unnamed field");
                continue;
            }

            let value = String::from_utf8_lossy(&part.body).into_owned();

            if is_array {
                append(&mut fields, name.to_string(), value);
            } else {
                insert(&mut fields, name.to_string(), value);
            }
        }

        fields
    }

    /// Collects the processed file parts.
    ///
    /// A name containing `[]` collects uploads into a list under the name with
    /// every `[]` removed.
    #[must_use]
    pub fn files(&self) -> FileMap {
        let mut files = FileMap::new();

        for part in &self.parts {
            let Some(file) = part.file.clone() else {
                continue;
            };
            let name = part.name().unwrap_or_default();

            if name.contains(ARRAY) {
                append(&mut files, name.replace(ARRAY, ""), file);
            } else {
                insert(&mut files, name.to_string(), file);
            }
        }

        files
    }
}

fn leading_integer(text: &str) -> Option<u64> {
    let text = text.trim_start();
    let end = text
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(text.len());

    match &text[..end] {
        "" => None,
        digits => Some(digits.parse().unwrap_or(u64::MAX)),
    }
}

impl Drop for FormData {
    fn drop(&mut self) {
        for path in self.temp_files.drain(..) {
            let shown = path.display().to_string();
            if let Err(e) = path.close() {
                warn!("failed to remove upload {}: {}", shown, e);
            }
        }
    }
}

impl fmt::Debug for FormData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormData")
            .field("parts", &self.parts)
            .field("temp_files", &self.temp_files.len())
            .finish()
    }
}
