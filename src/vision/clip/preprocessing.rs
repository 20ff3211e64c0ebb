// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for the CLIP visual encoder

use image::{imageops::FilterType, DynamicImage, GenericImageView};
use ndarray::Array4;

/// Square input size of the ViT-B/32 visual tower
pub const CLIP_INPUT_SIZE: u32 = 224;

/// CLIP normalization mean values (OpenAI / LAION checkpoints)
pub const CLIP_MEAN: [f32; 3] = [0.48145466, 0.4578275, 0.40821073];

/// CLIP normalization std values
pub const CLIP_STD: [f32; 3] = [0.26862954, 0.26130258, 0.27577711];

/// Preprocess an image for the CLIP visual encoder
///
/// Steps:
/// 1. Resize so the shortest side is CLIP_INPUT_SIZE (bicubic)
/// 2. Center crop to CLIP_INPUT_SIZE x CLIP_INPUT_SIZE
/// 3. Normalize with CLIP mean/std: (pixel/255 - mean) / std
/// 4. Convert to NCHW tensor format [1, 3, H, W]
pub fn preprocess_for_clip(image: &DynamicImage) -> Array4<f32> {
    let cropped = resize_and_center_crop(image, CLIP_INPUT_SIZE);
    let rgb = cropped.to_rgb8();

    let size = CLIP_INPUT_SIZE as usize;
    let mut tensor = Array4::zeros((1, 3, size, size));
    for (x, y, pixel) in rgb.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] =
                (pixel[c] as f32 / 255.0 - CLIP_MEAN[c]) / CLIP_STD[c];
        }
    }
    tensor
}

/// Shortest-side resize followed by a center crop
pub fn resize_and_center_crop(image: &DynamicImage, target_size: u32) -> DynamicImage {
    let (orig_w, orig_h) = image.dimensions();
    let scale = target_size as f32 / orig_w.min(orig_h).max(1) as f32;

    let new_w = ((orig_w as f32 * scale).round() as u32).max(target_size);
    let new_h = ((orig_h as f32 * scale).round() as u32).max(target_size);

    let resized = image.resize_exact(new_w, new_h, FilterType::CatmullRom);

    let crop_x = (new_w - target_size) / 2;
    let crop_y = (new_h - target_size) / 2;
    resized.crop_imm(crop_x, crop_y, target_size, target_size)
}
