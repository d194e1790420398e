use image::{DynamicImage, GenericImageView};
use serde::Serialize;

/// The region spans 20%..80% of each dimension
const NEAR_EDGE: f64 = 0.2;
const FAR_EDGE: f64 = 0.8;

/// Centered sub-rectangle of a frame where the user aims the label.
///
/// Bounds are half-open: rows `top..bottom`, columns `left..right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegionOfInterest {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl RegionOfInterest {
    /// The centered 60% x 60% area of a `width` x `height` frame
    pub fn centered(width: u32, height: u32) -> Self {
        let h = height as f64;
        let w = width as f64;
        Self {
            top: (NEAR_EDGE * h) as u32,
            bottom: (FAR_EDGE * h) as u32,
            left: (NEAR_EDGE * w) as u32,
            right: (FAR_EDGE * w) as u32,
        }
    }

    pub fn of(image: &DynamicImage) -> Self {
        let (width, height) = image.dimensions();
        Self::centered(width, height)
    }

    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Copy the region out of `image`
    pub fn crop(&self, image: &DynamicImage) -> DynamicImage {
        image.crop_imm(self.left, self.top, self.width(), self.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn test_bounds_are_twenty_to_eighty_percent() {
        let roi = RegionOfInterest::centered(1000, 500);
        assert_eq!(roi.top, 100);
        assert_eq!(roi.bottom, 400);
        assert_eq!(roi.left, 200);
        assert_eq!(roi.right, 800);
    }

    #[test]
    fn test_bounds_truncate() {
        // 0.2 * 7 = 1.4, 0.8 * 7 = 5.6; 0.2 * 13 = 2.6, 0.8 * 13 = 10.4
        let roi = RegionOfInterest::centered(13, 7);
        assert_eq!((roi.top, roi.bottom), (1, 5));
        assert_eq!((roi.left, roi.right), (2, 10));
    }

    #[test]
    fn test_crop_has_region_dimensions() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(640, 480));
        let roi = RegionOfInterest::of(&img);
        let cropped = roi.crop(&img);
        assert_eq!(cropped.width(), roi.width());
        assert_eq!(cropped.height(), roi.height());
        assert_eq!((cropped.width(), cropped.height()), (384, 288));
    }

    #[test]
    fn test_tiny_frame_has_empty_region() {
        let roi = RegionOfInterest::centered(1, 1);
        assert!(roi.is_empty());
    }
}
