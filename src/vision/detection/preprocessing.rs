// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for the YOLO detector

use image::{imageops::FilterType, DynamicImage, GenericImageView, Rgb, RgbImage};
use ndarray::Array4;

/// Square input size of the YOLOv8 export
pub const DETECTOR_INPUT_SIZE: u32 = 640;

/// Letterbox padding value used by the upstream detector
pub const PAD_VALUE: u8 = 114;

/// Geometry of a letterbox resize, needed to map boxes back to the original image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub scale: f32,
    pub pad_x: f32,
    pub pad_y: f32,
    pub original_width: u32,
    pub original_height: u32,
}

impl Letterbox {
    /// Compute the letterbox for an image of the given size
    pub fn new(width: u32, height: u32, target_size: u32) -> Self {
        let scale = (target_size as f32 / width.max(1) as f32)
            .min(target_size as f32 / height.max(1) as f32);
        let new_w = ((width as f32 * scale).round() as u32).clamp(1, target_size);
        let new_h = ((height as f32 * scale).round() as u32).clamp(1, target_size);

        Self {
            scale,
            pad_x: ((target_size - new_w) / 2) as f32,
            pad_y: ((target_size - new_h) / 2) as f32,
            original_width: width,
            original_height: height,
        }
    }

    /// Resized (unpadded) content size
    pub fn content_size(&self) -> (u32, u32) {
        (
            ((self.original_width as f32 * self.scale).round() as u32).max(1),
            ((self.original_height as f32 * self.scale).round() as u32).max(1),
        )
    }

    /// Map an x coordinate in model space back to the original image, clamped
    pub fn unmap_x(&self, x: f32) -> f32 {
        ((x - self.pad_x) / self.scale).clamp(0.0, self.original_width as f32)
    }

    /// Map a y coordinate in model space back to the original image, clamped
    pub fn unmap_y(&self, y: f32) -> f32 {
        ((y - self.pad_y) / self.scale).clamp(0.0, self.original_height as f32)
    }
}

/// Preprocess an image for the detector
///
/// Steps:
/// 1. Resize keeping aspect ratio so the long side is DETECTOR_INPUT_SIZE
/// 2. Pad to square with gray (114)
/// 3. Scale RGB values to [0, 1]
/// 4. Convert to NCHW tensor format [1, 3, H, W]
pub fn preprocess_for_detection(image: &DynamicImage) -> (Array4<f32>, Letterbox) {
    let (orig_w, orig_h) = image.dimensions();
    let letterbox = Letterbox::new(orig_w, orig_h, DETECTOR_INPUT_SIZE);
    let (new_w, new_h) = letterbox.content_size();

    let resized = image.resize_exact(new_w, new_h, FilterType::Triangle).to_rgb8();

    let mut canvas = RgbImage::from_pixel(
        DETECTOR_INPUT_SIZE,
        DETECTOR_INPUT_SIZE,
        Rgb([PAD_VALUE, PAD_VALUE, PAD_VALUE]),
    );
    image::imageops::replace(
        &mut canvas,
        &resized,
        letterbox.pad_x as i64,
        letterbox.pad_y as i64,
    );

    let size = DETECTOR_INPUT_SIZE as usize;
    let mut tensor = Array4::zeros((1, 3, size, size));
    for (x, y, pixel) in canvas.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] = pixel[c] as f32 / 255.0;
        }
    }

    (tensor, letterbox)
}
