//! Parses raw `multipart/form-data` bodies into fields and file uploads.
//!
//! The body is split on its boundary, each part is parsed into headers and a
//! body, file parts are checked against [`Limits`] and stored in temporary
//! files, then the parts are collected into a [`FieldMap`] and a [`FileMap`].
//!
//! # Example
//!
//! ```rust
//! use anyhow::Result;
//! use raw_form_data::{FormData, Limits, UploadError};
//!
//! fn main() -> Result<()> {
//!     let dir = tempfile::tempdir()?;
//!     let limits = Limits::default().upload_tmp_dir(Some(dir.path().to_path_buf()));
//!
//!     let body = "--XYZ\r\n\
//!         Content-Disposition: form-data; name=\"field1\"\r\n\
//!         \r\n\
//!         hello\r\n\
//!         --XYZ\r\n\
//!         Content-Disposition: form-data; name=\"upload\"; filename=\"a.txt\"\r\n\
//!         Content-Type: text/plain\r\n\
//!         \r\n\
//!         hi\r\n\
//!         --XYZ--\r\n";
//!
//!     let mut form = FormData::parse(body, None)?;
//!     form.process_files(&limits);
//!
//!     let fields = form.fields();
//!     assert_eq!(fields["field1"].as_single().map(String::as_str), Some("hello"));
//!
//!     let files = form.files();
//!     let upload = files["upload"].as_single().unwrap();
//!     assert_eq!(upload.declared_name, "a.txt");
//!     assert_eq!(upload.size, 2);
//!     assert_eq!(upload.error, UploadError::Ok);
//!
//!     let path = upload.storage_path.clone().unwrap();
//!     assert_eq!(std::fs::read(&path)?, b"hi");
//!
//!     // stored files live as long as the form
//!     drop(form);
//!     assert!(!path.exists());
//!
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![deny(nonstandard_style)]
#![warn(missing_docs, unreachable_pub)]

mod entry;
mod error;
mod file;
mod form;
pub mod header;
mod limits;
mod part;
mod utils;

use indexmap::IndexMap;

pub use entry::Entry;

pub use error::Error;

pub use file::{parse_size, process_file, FileUpload, UploadError};

pub use form::FormData;

pub use limits::Limits;

pub use part::{find_boundary, split, Part};

/// Submitted fields by name.
pub type FieldMap = IndexMap<String, Entry<String>>;

/// Uploaded files by name.
pub type FileMap = IndexMap<String, Entry<FileUpload>>;

pub(crate) type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(feature = "async")]
mod r#async;
