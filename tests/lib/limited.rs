use std::fmt;
use std::io::{self, Read};

use bytes::Bytes;
use rand::Rng;

#[cfg(feature = "async")]
use futures_util::stream::Stream;
#[cfg(feature = "async")]
use std::{
    pin::Pin,
    task::{Context, Poll},
};

pub const LIMITED: usize = 8 * 1024;

/// Hands out a body in chunks of at most `limit` bytes.
pub struct Limited {
    body: Bytes,
    limit: usize,
    length: u64,
}

impl Limited {
    pub fn new(body: impl Into<Bytes>, limit: usize) -> Self {
        tracing::info!("Limited stream by {}", limit);

        Self {
            body: body.into(),
            limit,
            length: 0,
        }
    }

    pub fn random(body: impl Into<Bytes>) -> Self {
        Self::new(body, rand::thread_rng().gen_range(1..LIMITED))
    }

    pub fn random_with(body: impl Into<Bytes>, max: usize) -> Self {
        Self::new(body, rand::thread_rng().gen_range(1..max))
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> u64 {
        self.length
    }

    fn chunk(&mut self, max: usize) -> Bytes {
        let n = self.limit.min(max).min(self.body.len());
        self.length += n as u64;
        self.body.split_to(n)
    }
}

impl fmt::Debug for Limited {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Limited")
            .field("limit", &self.limit)
            .field("length", &self.length)
            .field("remaining", &self.body.len())
            .finish()
    }
}

#[cfg(feature = "async")]
impl Stream for Limited {
    type Item = Result<Bytes, io::Error>;

    fn poll_next(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.body.is_empty() {
            return Poll::Ready(None);
        }
        Poll::Ready(Some(Ok(self.chunk(usize::MAX))))
    }
}

impl Read for Limited {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, io::Error> {
        let chunk = self.chunk(buf.len());
        buf[..chunk.len()].copy_from_slice(&chunk);
        Ok(chunk.len())
    }
}
