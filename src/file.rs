use std::{
    fmt,
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde::Serialize;
use tempfile::TempPath;
use tracing::{debug, warn};

use crate::{Limits, Part};

/// Outcome of an upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum UploadError {
    /// Stored
    #[default]
    Ok,
    /// Larger than the server ceiling
    IniSize,
    /// Larger than the size declared by the form
    FormSize,
    /// Nothing was submitted
    NoFile,
    /// No upload directory
    NoTmpDir,
    /// The file could not be written
    CantWrite,
}

impl UploadError {
    /// The conventional numeric code of the outcome.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::IniSize => 1,
            Self::FormSize => 2,
            Self::NoFile => 4,
            Self::NoTmpDir => 6,
            Self::CantWrite => 7,
        }
    }

    /// Is `Ok`.
    #[must_use]
    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ok => "ok",
            Self::IniSize => "file exceeds the server upload limit",
            Self::FormSize => "file exceeds the size declared by the form",
            Self::NoFile => "no file was uploaded",
            Self::NoTmpDir => "missing upload directory",
            Self::CantWrite => "failed to write file",
        })
    }
}

/// An uploaded file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileUpload {
    /// The submitted filename, may be empty.
    pub declared_name: String,
    /// The main value of the part `Content-Type`, may be empty.
    pub declared_type: String,
    /// The body length.
    pub size: u64,
    /// Where the body was stored, only set when `error` is `Ok`.
    pub storage_path: Option<PathBuf>,
    /// The outcome.
    pub error: UploadError,
}

impl FileUpload {
    /// Creates a pending upload.
    #[must_use]
    pub fn new(declared_name: impl Into<String>, declared_type: impl Into<String>, size: u64) -> Self {
        Self {
            declared_name: declared_name.into(),
            declared_type: declared_type.into(),
            size,
            storage_path: None,
            error: UploadError::Ok,
        }
    }
}

/// Parses a size string like `8M`, `512K`, `1.5m` or `100B` into bytes.
///
/// Only the integer part counts: `1.5K` is 1024 bytes and a bare unit is 0.
///
/// ```
/// use raw_form_data::parse_size;
///
/// assert_eq!(parse_size("8M"), Some(8 * 1024 * 1024));
/// assert_eq!(parse_size("1.5K"), Some(1024));
/// assert_eq!(parse_size("8G"), None);
/// ```
#[must_use]
pub fn parse_size(text: &str) -> Option<u64> {
    let exp = match text.as_bytes().last()?.to_ascii_uppercase() {
        b'B' => 0,
        b'K' => 1,
        b'M' => 2,
        _ => return None,
    };
    let number = &text[..text.len() - 1];

    let (int, fraction) = match number.split_once('.') {
        Some((int, fraction)) => (int, Some(fraction)),
        None => (number, None),
    };

    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !digits(int) || fraction.is_some_and(|f| f.is_empty() || !digits(f)) {
        return None;
    }

    let amount = match int {
        "" => 0,
        int => int.parse::<u64>().unwrap_or(u64::MAX),
    };

    Some(amount.saturating_mul(1024_u64.pow(exp)))
}

struct Candidate<'a> {
    upload: &'a FileUpload,
    limits: &'a Limits,
    max_declared_size: Option<u64>,
}

type Check = fn(&Candidate<'_>) -> bool;

fn exceeds_server_limit(c: &Candidate<'_>) -> bool {
    c.limits.checked_file_size(c.upload.size).is_some()
}

fn exceeds_declared_limit(c: &Candidate<'_>) -> bool {
    c.max_declared_size.is_some_and(|max| c.upload.size > max)
}

fn is_missing(c: &Candidate<'_>) -> bool {
    c.upload.declared_name.is_empty() && c.upload.size == 0
}

fn lacks_tmp_dir(c: &Candidate<'_>) -> bool {
    tmp_dir(c.limits).is_none()
}

/// Evaluated in order, the first match classifies the upload.
const CHECKS: [(Check, UploadError); 4] = [
    (exceeds_server_limit, UploadError::IniSize),
    (exceeds_declared_limit, UploadError::FormSize),
    (is_missing, UploadError::NoFile),
    (lacks_tmp_dir, UploadError::NoTmpDir),
];

fn tmp_dir(limits: &Limits) -> Option<&Path> {
    limits
        .upload_tmp_dir
        .as_deref()
        .filter(|dir| !dir.as_os_str().is_empty() && dir.is_dir())
}

fn store(limits: &Limits, body: &[u8]) -> io::Result<TempPath> {
    let dir = tmp_dir(limits).ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;
    let mut file = tempfile::Builder::new().prefix("upload").tempfile_in(dir)?;
    file.write_all(body)?;
    file.flush()?;
    Ok(file.into_temp_path())
}

/// Classifies a file part and stores its body when every check passes.
///
/// `max_declared_size` comes from the submitted form and is only a hint; the
/// server ceiling in `limits` is always checked first.
///
/// The returned [`TempPath`] owns the stored file: dropping it removes the
/// file. Callers keep it for as long as the request is being handled.
#[must_use = "dropping the returned path removes the stored file"]
pub fn process_file(part: &mut Part, max_declared_size: Option<u64>, limits: &Limits) -> Option<TempPath> {
    let mut upload = FileUpload::new(
        part.filename().unwrap_or_default(),
        part.content_type().unwrap_or_default(),
        part.body.len() as u64,
    );

    let failed = {
        let candidate = Candidate {
            upload: &upload,
            limits,
            max_declared_size,
        };
        CHECKS
            .iter()
            .find(|(check, _)| check(&candidate))
            .map(|(_, error)| *error)
    };

    let stored = match failed {
        Some(error) => {
            upload.error = error;
            None
        }
        None => match store(limits, &part.body) {
            Ok(path) => {
                upload.storage_path = Some(path.to_path_buf());
                Some(path)
            }
            Err(e) => {
                warn!("failed to store upload {}: {}", upload.declared_name, e);
                upload.error = UploadError::CantWrite;
                None
            }
        },
    };

    debug!(
        "upload {} {} bytes: {}",
        upload.declared_name, upload.size, upload.error
    );

    part.file.replace(upload);

    stored
}
