//! Test doubles shared by the unit tests of this crate.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::{error::FetchError, transport::Transport};

pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::new(width, height);
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png)
        .expect("encode png");
    buf.into_inner()
}

pub(crate) fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::new(width, height);
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Jpeg)
        .expect("encode jpeg");
    buf.into_inner()
}

#[derive(Clone)]
pub(crate) enum Reply {
    /// A PNG of the given size.
    Image(u32, u32),
    /// Arbitrary body bytes.
    Body(Vec<u8>),
    /// Transport-level failure with the given status.
    Status(u16),
    /// Reports a timeout without waiting.
    Timeout,
    /// Never resolves.
    Hang,
}

/// Deterministic transport. Unknown URLs answer 404.
pub(crate) struct StubTransport {
    replies: HashMap<String, Reply>,
    delay: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl StubTransport {
    pub(crate) fn new() -> Self {
        Self {
            replies: HashMap::new(),
            delay: Duration::from_millis(2),
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    pub(crate) fn reply(mut self, url: &str, reply: Reply) -> Self {
        self.replies.insert(url.to_string(), reply);
        self
    }

    pub(crate) fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of concurrent `get` calls observed.
    pub(crate) fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn get(
        &self,
        url: &str,
        timeout: Duration,
        _max_bytes: u64,
    ) -> Result<Bytes, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        tokio::time::sleep(self.delay).await;

        match self.replies.get(url).cloned() {
            Some(Reply::Image(w, h)) => Ok(Bytes::from(png_bytes(w, h))),
            Some(Reply::Body(body)) => Ok(Bytes::from(body)),
            Some(Reply::Status(code)) => Err(FetchError::Status(code)),
            Some(Reply::Timeout) => Err(FetchError::Timeout(timeout)),
            Some(Reply::Hang) => std::future::pending().await,
            None => Err(FetchError::Status(404)),
        }
    }
}
