//! Decoded RGBA8 images shared between caches and surfaces.

use std::sync::Arc;

/// A handle to a decoded image.
///
/// The pixel data is shared, so cloning a handle is cheap and a cache and a
/// surface can hold the same image without copying it.
#[derive(Clone, Debug)]
pub struct ImageHandle {
    /// The raw RGBA8 image data
    data: Arc<Vec<u8>>,
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
}

impl ImageHandle {
    /// Create a new image handle from RGBA8 data.
    ///
    /// Returns `None` if `data.len() != width * height * 4`.
    pub fn from_rgba8(data: Vec<u8>, width: u32, height: u32) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        if data.len() != expected {
            return None;
        }

        Some(Self {
            data: Arc::new(data),
            width,
            height,
        })
    }

    /// Get the image data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get the image width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Natural dimensions as `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// True when both handles point at the same pixel buffer.
    pub fn ptr_eq(&self, other: &ImageHandle) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_mismatch_rejected() {
        assert!(ImageHandle::from_rgba8(vec![0; 15], 2, 2).is_none());
        assert!(ImageHandle::from_rgba8(vec![0; 16], 2, 2).is_some());
    }

    #[test]
    fn test_clone_shares_pixels() {
        let a = ImageHandle::from_rgba8(vec![255; 4], 1, 1).unwrap();
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        assert_eq!(b.dimensions(), (1, 1));
    }
}
