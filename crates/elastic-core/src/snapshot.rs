use std::sync::Arc;

use image::RgbaImage;

/// Rasterized appearance of a view at transition start.
///
/// Straight (non-premultiplied) sRGB RGBA8. Cloning shares the pixels.
#[derive(Debug, Clone)]
pub struct Snapshot(Arc<RgbaImage>);

impl Snapshot {
    pub fn new(image: RgbaImage) -> Self {
        Self(Arc::new(image))
    }

    /// Solid-colour snapshot; handy for hosts that cannot capture a view.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self::new(RgbaImage::from_pixel(width, height, image::Rgba(rgba)))
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.0.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.0.height()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    #[inline]
    pub fn image(&self) -> &RgbaImage {
        &self.0
    }

    /// Raw RGBA8 rows, tightly packed.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        self.0.as_raw()
    }

    /// True if both handles share the same pixel buffer.
    #[inline]
    pub fn ptr_eq(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<RgbaImage> for Snapshot {
    fn from(image: RgbaImage) -> Self {
        Self::new(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_pixels() {
        let a = Snapshot::solid(4, 2, [255, 0, 0, 255]);
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        assert_eq!(b.pixels().len(), 4 * 2 * 4);
    }

    #[test]
    fn zero_sized_snapshot_is_empty() {
        assert!(Snapshot::solid(0, 10, [0; 4]).is_empty());
        assert!(!Snapshot::solid(1, 1, [0; 4]).is_empty());
    }
}
