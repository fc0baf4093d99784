use bytes::{Bytes, BytesMut};
use futures_util::stream::{Stream, StreamExt};
use tracing::trace;

use crate::{Error, FormData, Limits, Result};

impl FormData {
    /// Collects a body from a stream of chunks, then parses it.
    ///
    /// # Errors
    ///
    /// [`Error::PayloadTooLarge`] past `stream_size`, errors yielded by the
    /// stream, otherwise as [`FormData::parse`].
    pub async fn from_stream<T, O, E>(
        mut stream: T,
        boundary: Option<&str>,
        limits: &Limits,
    ) -> Result<Self>
    where
        T: Stream<Item = Result<O, E>> + Unpin,
        O: Into<Bytes>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let mut body = BytesMut::new();

        while let Some(chunk) = stream.next().await {
            let chunk: Bytes = chunk.map_err(|e| Error::BoxError(e.into()))?.into();

            if let Some(max) = limits.checked_stream_size((body.len() + chunk.len()) as u64) {
                return Err(Error::PayloadTooLarge(max));
            }

            body.extend_from_slice(&chunk);
            trace!("polled bytes {}/{}", chunk.len(), body.len());
        }

        Self::parse(body.freeze(), boundary)
    }
}
