use std::{env, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::parse_size;

/// Server-side limits on incoming data
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Limits {
    /// Max size of one uploaded file, as a size string like `2M`
    pub upload_max_filesize: String,
    /// Directory for accepted uploads
    pub upload_tmp_dir: Option<PathBuf>,
    /// Max number of whole stream
    pub stream_size: Option<u64>,
    /// Max number of buffer size
    pub buffer_size: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            upload_max_filesize: Self::DEFAULT_UPLOAD_MAX_FILESIZE.to_string(),
            upload_tmp_dir: Some(env::temp_dir()),
            stream_size: Some(Self::DEFAULT_STREAM_SIZE),
            buffer_size: Self::DEFAULT_BUFFER_SIZE,
        }
    }
}

impl Limits {
    /// Max size of one uploaded file, defaults to 2MB.
    pub const DEFAULT_UPLOAD_MAX_FILESIZE: &'static str = "2M";

    /// Max number of stream size, defaults to 8MB.
    pub const DEFAULT_STREAM_SIZE: u64 = 8 * 1024 * 1024;

    /// Max number of buffer size, defaults to 8KB
    pub const DEFAULT_BUFFER_SIZE: usize = 8 * 1024;

    /// Reads `UPLOAD_MAX_FILESIZE`, `UPLOAD_TMP_DIR` and `POST_MAX_SIZE`
    /// over the defaults.
    ///
    /// An empty `UPLOAD_TMP_DIR` leaves the upload directory unconfigured.
    #[must_use]
    pub fn from_env() -> Self {
        let mut limits = Self::default();

        if let Ok(size) = env::var("UPLOAD_MAX_FILESIZE") {
            limits.upload_max_filesize = size;
        }

        if let Some(dir) = env::var_os("UPLOAD_TMP_DIR") {
            limits.upload_tmp_dir = Some(PathBuf::from(dir)).filter(|d| !d.as_os_str().is_empty());
        }

        if let Ok(size) = env::var("POST_MAX_SIZE") {
            limits.stream_size = parse_size(&size);
        }

        tracing::debug!("limits {:?}", limits);

        limits
    }

    /// Max size of one uploaded file
    #[must_use]
    pub fn upload_max_filesize(mut self, max: impl Into<String>) -> Self {
        self.upload_max_filesize = max.into();
        self
    }

    /// Directory for accepted uploads, `None` leaves it unconfigured
    #[must_use]
    pub fn upload_tmp_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.upload_tmp_dir = dir;
        self
    }

    /// Max number of buffer size
    ///
    /// # Panics
    ///
    /// If `max` is smaller than `Limits::DEFAULT_BUFFER_SIZE`.
    #[must_use]
    pub fn buffer_size(mut self, max: usize) -> Self {
        assert!(
            max >= Self::DEFAULT_BUFFER_SIZE,
            "The max_buffer_size cannot be smaller than {}.",
            Self::DEFAULT_BUFFER_SIZE,
        );

        self.buffer_size = max;
        self
    }

    /// Max number of whole stream size
    #[must_use]
    pub fn stream_size(mut self, max: u64) -> Self {
        self.stream_size.replace(max);
        self
    }

    /// The upload ceiling in bytes, `None` when it does not parse.
    #[must_use]
    pub fn upload_max_filesize_bytes(&self) -> Option<u64> {
        parse_size(&self.upload_max_filesize)
    }

    /// Check stream size
    #[must_use]
    pub fn checked_stream_size(&self, rhs: u64) -> Option<u64> {
        self.stream_size.filter(|max| rhs > *max)
    }

    /// Check file size against the upload ceiling
    #[must_use]
    pub fn checked_file_size(&self, rhs: u64) -> Option<u64> {
        self.upload_max_filesize_bytes().filter(|max| rhs > *max)
    }
}
