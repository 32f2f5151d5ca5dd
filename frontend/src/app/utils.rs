use slint::{Rgb8Pixel, SharedPixelBuffer};

/// Wrap a plotters RGB pixel buffer in a Slint image for in-window display.
pub fn rgb_buffer_to_image(pixels: &[u8], width: u32, height: u32) -> slint::Image {
    let pixel_buffer = SharedPixelBuffer::<Rgb8Pixel>::clone_from_slice(pixels, width, height);
    slint::Image::from_rgb8(pixel_buffer)
}
