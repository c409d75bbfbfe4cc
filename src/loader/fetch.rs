//! Blocking fetch and decode, run off the UI thread.

use std::io::{Cursor, Read};

use image::{DynamicImage, ImageDecoder, ImageReader};
use node_host::ImageHandle;

use crate::config::ServerConfig;
use crate::error::PreviewError;
use crate::files::Resource;

/// Reads image bytes from HTTP or disk with a size limit.
#[derive(Clone)]
pub struct Fetcher {
    agent: ureq::Agent,
    max_bytes: u64,
}

impl Fetcher {
    pub fn new(agent: ureq::Agent, max_bytes: u64) -> Self {
        Self { agent, max_bytes }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.agent(), config.max_image_bytes)
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Fetch the raw bytes of `resource`.
    pub fn fetch(&self, resource: &Resource) -> Result<Vec<u8>, PreviewError> {
        match resource {
            Resource::Http(url) => {
                let response = self.agent.get(url).call()?;
                self.read_limited(response.into_reader())
            }
            Resource::Path(path) => {
                let len = std::fs::metadata(path)?.len();
                if len > self.max_bytes {
                    return Err(PreviewError::TooLarge {
                        limit: self.max_bytes,
                    });
                }
                Ok(std::fs::read(path)?)
            }
        }
    }

    /// Fetch and decode in one step.
    pub fn load(&self, resource: &Resource) -> Result<ImageHandle, PreviewError> {
        let bytes = self.fetch(resource)?;
        decode_image(&bytes)
    }

    fn read_limited(&self, reader: impl Read) -> Result<Vec<u8>, PreviewError> {
        let mut bytes = Vec::new();
        reader
            .take(self.max_bytes.saturating_add(1))
            .read_to_end(&mut bytes)?;
        if bytes.len() as u64 > self.max_bytes {
            return Err(PreviewError::TooLarge {
                limit: self.max_bytes,
            });
        }
        Ok(bytes)
    }
}

impl std::fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher")
            .field("max_bytes", &self.max_bytes)
            .finish_non_exhaustive()
    }
}

/// Decode any supported image format to RGBA8, upright per its EXIF orientation.
pub fn decode_image(bytes: &[u8]) -> Result<ImageHandle, PreviewError> {
    let mut decoder = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_decoder()?;
    let orientation = decoder.orientation()?;
    let mut decoded = DynamicImage::from_decoder(decoder)?;
    decoded.apply_orientation(orientation);

    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    ImageHandle::from_rgba8(rgba.into_raw(), width, height)
        .ok_or_else(|| PreviewError::InvalidImage(format!("{}x{} pixel buffer", width, height)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::support::png_bytes;

    fn fetcher(max_bytes: u64) -> Fetcher {
        Fetcher::new(ureq::AgentBuilder::new().build(), max_bytes)
    }

    #[test]
    fn test_decode_png() {
        let image = decode_image(&png_bytes(3, 2)).unwrap();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(&image.data()[..4], &[1, 2, 3, 255]);
    }

    /// JPEG with an EXIF APP1 segment carrying `orientation`.
    fn jpeg_with_orientation(width: u32, height: u32, orientation: u8) -> Vec<u8> {
        let mut jpeg = Vec::new();
        DynamicImage::ImageRgb8(image::RgbImage::new(width, height))
            .write_to(&mut Cursor::new(&mut jpeg), image::ImageFormat::Jpeg)
            .unwrap();

        let mut tiff = vec![b'M', b'M', 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08];
        tiff.extend_from_slice(&[0x00, 0x01]);
        tiff.extend_from_slice(&[0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01]);
        tiff.extend_from_slice(&[0x00, orientation, 0x00, 0x00]);
        tiff.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

        let mut app1 = b"Exif\0\0".to_vec();
        app1.extend_from_slice(&tiff);
        let len = (app1.len() + 2) as u16;

        let mut out = jpeg[..2].to_vec();
        out.extend_from_slice(&[0xFF, 0xE1]);
        out.extend_from_slice(&len.to_be_bytes());
        out.extend_from_slice(&app1);
        out.extend_from_slice(&jpeg[2..]);
        out
    }

    #[test]
    fn test_decode_applies_exif_rotation() {
        let image = decode_image(&jpeg_with_orientation(40, 10, 6)).unwrap();
        assert_eq!(image.dimensions(), (10, 40));
    }

    #[test]
    fn test_decode_upright_jpeg_keeps_size() {
        let image = decode_image(&jpeg_with_orientation(40, 10, 1)).unwrap();
        assert_eq!(image.dimensions(), (40, 10));
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(decode_image(b"definitely not an image").is_err());
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        std::fs::write(&path, png_bytes(4, 4)).unwrap();

        let image = fetcher(1 << 20).load(&Resource::Path(path)).unwrap();
        assert_eq!(image.dimensions(), (4, 4));
    }

    #[test]
    fn test_size_limit_on_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        std::fs::write(&path, png_bytes(4, 4)).unwrap();

        let result = fetcher(8).fetch(&Resource::Path(path));
        assert!(matches!(result, Err(PreviewError::TooLarge { limit: 8 })));
    }

    #[test]
    fn test_size_limit_on_stream() {
        let result = fetcher(4).read_limited(&b"0123456789"[..]);
        assert!(matches!(result, Err(PreviewError::TooLarge { limit: 4 })));
        assert_eq!(fetcher(10).read_limited(&b"0123456789"[..]).unwrap().len(), 10);
    }

    #[test]
    fn test_missing_path_is_io_error() {
        let result = fetcher(1024).fetch(&Resource::Path("/no/such/file.png".into()));
        assert!(matches!(result, Err(PreviewError::Io(_))));
    }
}
