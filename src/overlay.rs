//! Capture-frame overlay for presentation layers

use crate::analysis::RegionOfInterest;
use crate::classifier::CaptureState;
use crate::error::CaptureError;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use std::io::Cursor;

const FRAME_THICKNESS: u32 = 3;

pub fn state_rgb(state: CaptureState) -> Rgb<u8> {
    match state {
        CaptureState::Blurry => Rgb([0xE5, 0x39, 0x35]),
        CaptureState::SharpNoText => Rgb([0xFD, 0xD8, 0x35]),
        CaptureState::SharpWithText => Rgb([0x43, 0xA0, 0x47]),
    }
}

/// Draw the region of interest on a copy of `image` in the state color
pub fn annotate(image: &DynamicImage, roi: &RegionOfInterest, state: CaptureState) -> RgbImage {
    let mut canvas = image.to_rgb8();
    let color = state_rgb(state);

    for inset in 0..FRAME_THICKNESS {
        let width = roi.width().saturating_sub(2 * inset);
        let height = roi.height().saturating_sub(2 * inset);
        if width == 0 || height == 0 {
            break;
        }
        let rect =
            Rect::at((roi.left + inset) as i32, (roi.top + inset) as i32).of_size(width, height);
        draw_hollow_rect_mut(&mut canvas, rect, color);
    }

    canvas
}

pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, CaptureError> {
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| CaptureError::Internal(format!("Failed to encode PNG: {}", e)))?;
    Ok(out.into_inner())
}
