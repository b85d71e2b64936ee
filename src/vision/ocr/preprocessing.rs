// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Tensor preparation for the OCR models

use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use ndarray::Array4;

/// Input size of the detection model (square)
pub const DET_INPUT_SIZE: u32 = 640;

/// Input height of the recognition model
pub const REC_INPUT_HEIGHT: u32 = 48;

/// Maximum recognition input width
pub const REC_MAX_WIDTH: u32 = 320;

/// Normalization mean (ImageNet)
pub const MEAN: [f32; 3] = [0.485, 0.456, 0.406];

/// Normalization std (ImageNet)
pub const STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Geometry of the letterbox applied for detection, used to map detected
/// boxes back into original image coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Letterbox {
    pub scale: f32,
    pub offset_x: u32,
    pub offset_y: u32,
}

impl Letterbox {
    /// Map a point from detection-input space back to original image space
    pub fn to_image(&self, x: f32, y: f32) -> (f32, f32) {
        (
            (x - self.offset_x as f32) / self.scale,
            (y - self.offset_y as f32) / self.scale,
        )
    }
}

/// Build the `[1, 3, 640, 640]` detection input: scale to fit, center on a
/// gray canvas, normalize.
pub fn detection_tensor(image: &DynamicImage) -> (Array4<f32>, Letterbox) {
    let (orig_w, orig_h) = image.dimensions();

    if orig_w == 0 || orig_h == 0 {
        let gray = RgbImage::from_pixel(DET_INPUT_SIZE, DET_INPUT_SIZE, Rgb([128, 128, 128]));
        let letterbox = Letterbox {
            scale: 1.0,
            offset_x: 0,
            offset_y: 0,
        };
        return (normalized_nchw(&gray), letterbox);
    }

    let scale = (DET_INPUT_SIZE as f32 / orig_w as f32).min(DET_INPUT_SIZE as f32 / orig_h as f32);
    let new_w = ((orig_w as f32 * scale).round() as u32).max(1);
    let new_h = ((orig_h as f32 * scale).round() as u32).max(1);

    let resized = image
        .resize_exact(new_w, new_h, image::imageops::FilterType::Lanczos3)
        .to_rgb8();

    let offset_x = (DET_INPUT_SIZE - new_w) / 2;
    let offset_y = (DET_INPUT_SIZE - new_h) / 2;

    let mut canvas = RgbImage::from_pixel(DET_INPUT_SIZE, DET_INPUT_SIZE, Rgb([128, 128, 128]));
    for y in 0..new_h {
        for x in 0..new_w {
            canvas.put_pixel(x + offset_x, y + offset_y, *resized.get_pixel(x, y));
        }
    }

    let letterbox = Letterbox {
        scale,
        offset_x,
        offset_y,
    };

    (normalized_nchw(&canvas), letterbox)
}

/// Build the `[1, 3, 48, W]` recognition input for a cropped text region.
///
/// Width is dynamic (aspect-preserving, capped at [`REC_MAX_WIDTH`]).
pub fn recognition_tensor(region: &DynamicImage) -> Array4<f32> {
    let (orig_w, orig_h) = region.dimensions();

    let scale = REC_INPUT_HEIGHT as f32 / orig_h.max(1) as f32;
    let new_w = ((orig_w as f32 * scale).round() as u32)
        .clamp(4, REC_MAX_WIDTH);

    let resized = region
        .resize_exact(new_w, REC_INPUT_HEIGHT, image::imageops::FilterType::Lanczos3)
        .to_rgb8();

    normalized_nchw(&resized)
}

/// Convert an RGB image to a normalized NCHW tensor: `(pixel/255 - mean) / std`
fn normalized_nchw(rgb: &RgbImage) -> Array4<f32> {
    let (w, h) = rgb.dimensions();
    let mut tensor = Array4::zeros((1, 3, h as usize, w as usize));

    for (x, y, pixel) in rgb.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] =
                (pixel[c] as f32 / 255.0 - MEAN[c]) / STD[c];
        }
    }

    tensor
}
