//!
//! ```
//! RUST_LOG=trace cargo test --test stream-body -- --nocapture
//! ```

use std::{convert::Infallible, io};

use anyhow::Result;
use bytes::Bytes;
use futures_util::stream;
use tempfile::tempdir;

use raw_form_data::*;

#[path = "./lib/mod.rs"]
mod lib;

use lib::{body, field, file, tracing_init, Limited};

fn payload() -> String {
    body(
        "------------------------d74496d66958873e",
        &[
            &field("person", "anonymous"),
            &file("secret", "foo bar.txt", "text/plain", "contents of the file"),
        ],
    )
}

fn check(form: &FormData) {
    assert_eq!(form.len(), 2);

    let fields = form.fields();
    assert_eq!(fields["person"], Entry::Single("anonymous".to_string()));

    let part = &form.parts()[1];
    assert_eq!(part.name(), Some("secret"));
    assert_eq!(part.filename(), Some("foo bar.txt"));
    assert_eq!(part.content_type(), Some("text/plain"));
    assert_eq!(part.body, "contents of the file");
}

#[tokio::test]
async fn from_bytes_stream() -> Result<()> {
    tracing_init().ok();

    let raw = payload();
    let body = Limited::random(raw.clone());
    tracing::trace!(limit = body.limit());

    let form = FormData::from_stream(body, None, &Limits::default()).await?;
    check(&form);

    Ok(())
}

#[tokio::test]
async fn from_tiny_chunks() -> Result<()> {
    let dir = tempdir()?;
    let limits = Limits::default().upload_tmp_dir(Some(dir.path().to_path_buf()));

    let body = Limited::new(payload(), 1);
    let mut form = FormData::from_stream(body, Some("------------------------d74496d66958873e"), &limits).await?;
    check(&form);

    form.process_files(&limits);
    let files = form.files();
    let upload = files["secret"].as_single().unwrap();
    assert_eq!(upload.size, 20);
    assert_eq!(upload.error, UploadError::Ok);

    Ok(())
}

#[tokio::test]
async fn empty_stream() -> Result<()> {
    let body = stream::iter(Vec::<Result<Bytes, Infallible>>::new());

    assert!(matches!(
        FormData::from_stream(body, None, &Limits::default()).await,
        Err(Error::InvalidBoundary)
    ));

    let body = stream::iter(Vec::<Result<Bytes, Infallible>>::new());
    let form = FormData::from_stream(body, Some("XYZ"), &Limits::default()).await?;
    assert!(form.is_empty());

    Ok(())
}

#[tokio::test]
async fn stream_too_large() -> Result<()> {
    let body = Limited::random_with(payload(), 64);
    let limits = Limits::default().stream_size(100);

    assert!(matches!(
        FormData::from_stream(body, None, &limits).await,
        Err(Error::PayloadTooLarge(100))
    ));

    Ok(())
}

#[tokio::test]
async fn stream_error() -> Result<()> {
    let body = stream::iter(vec![
        Ok(Bytes::from_static(b"--XYZ\r\n")),
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
    ]);

    assert!(matches!(
        FormData::from_stream(body, None, &Limits::default()).await,
        Err(Error::BoxError(_))
    ));

    Ok(())
}

#[test]
fn from_reader() -> Result<()> {
    let body = Limited::random_with(payload(), 256);
    tracing::trace!(limit = body.limit());

    let form = FormData::from_reader(body, None, &Limits::default())?;
    check(&form);

    Ok(())
}

#[test]
fn reader_too_large() {
    let body = Limited::random_with(payload(), 64);
    let limits = Limits::default().stream_size(100);

    assert!(matches!(
        FormData::from_reader(body, None, &limits),
        Err(Error::PayloadTooLarge(100))
    ));
}
