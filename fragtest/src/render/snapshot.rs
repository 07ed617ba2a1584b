use super::*;
use image::{GrayImage, ImageBuffer, Luma};

/// Stencil values as 8-bit gray levels.
pub fn stencil_to_image(buffer: &Buffer<u8>) -> GrayImage {
    let (width, height) = (buffer.width as u32, buffer.height as u32);
    if buffer.stride == buffer.width
        && let Some(image) = ImageBuffer::<Luma<u8>, _>::from_raw(width, height, buffer.as_u8_slice().to_vec())
    {
        return image;
    }
    GrayImage::from_fn(width, height, |x, y| Luma([buffer.at(x as usize, y as usize)]))
}

/// Depth values mapped linearly from `near..far` to black..white, clamped outside of the range.
pub fn depth_to_image(buffer: &Buffer<f32>, near: f32, far: f32) -> GrayImage {
    assert!(far != near, "empty depth range: {}..{}", near, far);
    let scale = 1.0 / (far - near);
    GrayImage::from_fn(buffer.width as u32, buffer.height as u32, |x, y| {
        let t = ((buffer.at(x as usize, y as usize) - near) * scale).clamp(0.0, 1.0);
        Luma([(t * 255.0).round() as u8])
    })
}

impl BufferStore {
    pub fn stencil_image(&self) -> GrayImage {
        stencil_to_image(self.stencil())
    }

    pub fn depth_image(&self, near: f32, far: f32) -> GrayImage {
        depth_to_image(self.depth(), near, far)
    }
}
