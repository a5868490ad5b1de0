//! Asynchronous image decoding.
//!
//! Requests return immediately; a worker thread reads and decodes the
//! file and posts the outcome onto a channel. The owner drains completed
//! loads at frame boundaries with [`ImageLoader::poll`] and is responsible
//! for checking that the target panel still exists before applying the
//! result. Outcomes are two-state (decoded or failed); no retry happens.

use std::fs;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use tracing::{debug, warn};

use crate::AssetError;

/// Handle identifying one in-flight image request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageRequest(u64);

impl ImageRequest {
    /// Raw numeric value, for logging.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// A decoded RGBA8 image.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Tightly packed RGBA8 pixel data, row-major.
    pub pixels: Vec<u8>,
}

/// Completion record for one request.
#[derive(Debug)]
pub struct ImageLoadResult {
    /// The request this completes.
    pub request: ImageRequest,
    /// The URI that was requested.
    pub uri: String,
    /// Decoded image, or the error that stopped it.
    pub outcome: Result<DecodedImage, AssetError>,
}

/// Issues image-decode requests and collects their completions.
pub struct ImageLoader {
    tx: Sender<ImageLoadResult>,
    // None after shutdown; polls then return nothing.
    rx: Option<Receiver<ImageLoadResult>>,
    next_request: u64,
}

impl Default for ImageLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageLoader {
    /// Create a loader with no requests in flight.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx: Some(rx),
            next_request: 0,
        }
    }

    /// Start decoding `uri`. Returns immediately; the outcome arrives via
    /// [`ImageLoader::poll`] on a later frame.
    pub fn request(&mut self, uri: &str) -> ImageRequest {
        let request = ImageRequest(self.next_request);
        self.next_request += 1;
        debug!(request = request.raw(), %uri, "image decode requested");

        let tx = self.tx.clone();
        let uri = uri.to_string();
        thread::spawn(move || {
            let outcome = decode_file(&uri);
            // The receiver may already be shut down; a failed send just
            // means nobody is listening anymore.
            let _ = tx.send(ImageLoadResult {
                request,
                uri,
                outcome,
            });
        });
        request
    }

    /// Drain every completion that has arrived since the last poll.
    pub fn poll(&mut self) -> Vec<ImageLoadResult> {
        let Some(rx) = self.rx.as_ref() else {
            return Vec::new();
        };
        let mut completed = Vec::new();
        while let Ok(result) = rx.try_recv() {
            completed.push(result);
        }
        completed
    }

    /// Stop accepting completions. Outstanding workers finish quietly and
    /// their results are dropped. Idempotent.
    pub fn shutdown(&mut self) {
        if self.rx.take().is_some() {
            debug!("image loader shut down");
        }
    }
}

fn decode_file(uri: &str) -> Result<DecodedImage, AssetError> {
    let bytes = fs::read(uri)?;
    let decoded = image::load_from_memory(&bytes)?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(DecodedImage {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

impl Drop for ImageLoader {
    fn drop(&mut self) {
        if self.rx.is_some() {
            warn!("image loader dropped without shutdown");
        }
    }
}
