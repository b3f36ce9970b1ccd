//! PNG dump helpers for visually inspecting pipeline buffers.

use image::ImageEncoder;

/// Writes a row-major RGBA buffer to `name` as a PNG.
pub fn save(name: &str, width: u32, height: u32, buffer: &[u8]) -> Result<(), image::ImageError> {
    let output = std::fs::File::create(name)?;
    let encoder = image::codecs::png::PngEncoder::new(output);

    encoder.write_image(buffer, width, height, image::ExtendedColorType::Rgba8)?;

    Ok(())
}

/// Writes a single-channel buffer (an intensity map, or a magnitude map
/// already squashed to bytes) to `name` as a grayscale PNG.
pub fn save_gray(
    name: &str,
    width: u32,
    height: u32,
    buffer: &[u8],
) -> Result<(), image::ImageError> {
    let output = std::fs::File::create(name)?;
    let encoder = image::codecs::png::PngEncoder::new(output);

    encoder.write_image(buffer, width, height, image::ExtendedColorType::L8)?;

    Ok(())
}
