//! In-memory image payloads.
//!
//! Mirrors the front-end's upload step: decode whatever the user supplied,
//! normalize it to PNG, and keep both the bytes (for the chat request body)
//! and a named temp file (a stable path for display layers) alive for the
//! payload's lifetime. The temp file is removed when the payload is dropped.

use crate::Result;
use base64::Engine as _;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::Path;
use tempfile::NamedTempFile;

#[derive(Debug)]
pub struct ImagePayload {
    png_bytes: Vec<u8>,
    width: u32,
    height: u32,
    file: NamedTempFile,
}

impl ImagePayload {
    /// Decode raw image bytes (JPEG, PNG, ...) into a payload.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_image(image::load_from_memory(bytes)?)
    }

    /// Read and decode an image file.
    pub fn from_path(path: &Path) -> Result<Self> {
        Self::from_bytes(&std::fs::read(path)?)
    }

    /// Build a payload from an already-decoded raster.
    pub fn from_image(decoded: DynamicImage) -> Result<Self> {
        let (width, height) = (decoded.width(), decoded.height());

        let mut png_bytes = Vec::new();
        decoded.write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)?;

        let file = tempfile::Builder::new().suffix(".png").tempfile()?;
        std::fs::write(file.path(), &png_bytes)?;

        tracing::debug!(
            "Prepared {}x{} image payload at {}",
            width,
            height,
            file.path().display()
        );

        Ok(Self {
            png_bytes,
            width,
            height,
            file,
        })
    }

    /// Base64 of the normalized PNG, as the chat endpoint expects.
    pub fn base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.png_bytes)
    }

    /// Stable on-disk reference, valid while the payload is alive.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
