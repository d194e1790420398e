use image::DynamicImage;
use imageproc::filter::laplacian_filter;

/// Variance of the Laplacian response over the image intensity.
///
/// Flat or defocused frames have little high-frequency content and score
/// near zero; crisp edges push the variance up. Empty images score 0.
///
/// The 3x3 kernel repeats edge pixels past the border instead of mirroring
/// them (reflect-101), so the outermost rows and columns respond more weakly
/// than under a mirroring filter. On small regions this can move a score
/// that sits close to the blur threshold.
pub fn laplacian_variance(image: &DynamicImage) -> f64 {
    let gray = image.to_luma8();
    if gray.width() == 0 || gray.height() == 0 {
        return 0.0;
    }

    let response = laplacian_filter(&gray);
    let count = (response.width() as u64 * response.height() as u64) as f64;

    let (sum, sum_sq) = response.pixels().fold((0.0f64, 0.0f64), |(s, sq), p| {
        let v = p.0[0] as f64;
        (s + v, sq + v * v)
    });

    let mean = sum / count;
    ((sum_sq / count) - mean * mean).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    #[test]
    fn test_flat_image_scores_zero() {
        let img = RgbImage::from_pixel(200, 200, Rgb([128, 128, 128]));
        assert_eq!(laplacian_variance(&DynamicImage::ImageRgb8(img)), 0.0);
    }

    #[test]
    fn test_checkerboard_is_sharp() {
        let img = GrayImage::from_fn(64, 64, |x, y| {
            if (x / 4 + y / 4) % 2 == 0 {
                Luma([0])
            } else {
                Luma([255])
            }
        });
        assert!(laplacian_variance(&DynamicImage::ImageLuma8(img)) > 100.0);
    }

    #[test]
    fn test_smooth_gradient_is_blurry() {
        // A linear ramp has zero second derivative away from the border
        let img = GrayImage::from_fn(100, 100, |x, _| Luma([(x * 2) as u8]));
        assert!(laplacian_variance(&DynamicImage::ImageLuma8(img)) < 100.0);
    }

    #[test]
    fn test_border_pixels_are_repeated() {
        // Columns 0 and 255: every pixel sees one opposite neighbor, so the
        // response is +-255. Mirroring would give two and +-510.
        let img = GrayImage::from_fn(2, 2, |x, _| Luma([if x == 0 { 0 } else { 255 }]));
        assert_eq!(laplacian_variance(&DynamicImage::ImageLuma8(img)), 65025.0);
    }

    #[test]
    fn test_empty_image_scores_zero() {
        let img = GrayImage::new(0, 0);
        assert_eq!(laplacian_variance(&DynamicImage::ImageLuma8(img)), 0.0);
    }
}
