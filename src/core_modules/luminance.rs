// THEORY:
// The `luminance` module is the first stage of the detection pipeline. It
// collapses a raw RGBA frame buffer into a single-channel intensity buffer,
// one byte per pixel, which is the only representation the gradient operator
// understands.
//
// Key architectural principles:
// 1.  **Plain channel average**: intensity is `(R + G + B) / 3`. The engine
//     deliberately does not use a perceptual weighting (Rec. 601 / 709); the
//     downstream threshold was tuned against the plain average, and changing
//     the formula shifts every gradient magnitude in the image.
// 2.  **Alpha is ignored**: the alpha byte is read past but contributes
//     nothing. Transparency carries no edge information here.
// 3.  **Fail fast on shape**: the buffer length must be exactly
//     width * height * 4. A mismatched buffer is a caller error and is
//     rejected up front rather than silently truncated or read out of bounds.

use crate::error::VisionError;

/// Number of interleaved channels per pixel in a frame buffer (RGBA).
pub const CHANNELS: usize = 4;

/// Converts an RGBA frame buffer into a row-major intensity buffer.
///
/// Each output byte is the plain average of the pixel's red, green and blue
/// channels. The sum of three 8-bit channels divided by three always fits in
/// a byte, so the cast cannot overflow.
pub fn to_intensity(frame_buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, VisionError> {
    let pixel_count = width as usize * height as usize;
    let expected = pixel_count * CHANNELS;
    if frame_buffer.len() != expected {
        return Err(VisionError::InvalidDimensions {
            expected,
            actual: frame_buffer.len(),
            width,
            height,
        });
    }

    let mut intensity = Vec::with_capacity(pixel_count);
    for pixel in frame_buffer.chunks_exact(CHANNELS) {
        let sum = pixel[0] as u16 + pixel[1] as u16 + pixel[2] as u16;
        intensity.push((sum / 3) as u8);
    }

    Ok(intensity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_red_averages_to_85() {
        let width = 4u32;
        let height = 3u32;
        let frame: Vec<u8> = std::iter::repeat([255u8, 0, 0, 255])
            .take((width * height) as usize)
            .flatten()
            .collect();

        let intensity = to_intensity(&frame, width, height).unwrap();

        assert_eq!(intensity.len(), (width * height) as usize);
        assert!(intensity.iter().all(|&value| value == 85));
    }

    #[test]
    fn white_pixel_stays_white() {
        let frame = vec![255u8; 4];
        let intensity = to_intensity(&frame, 1, 1).unwrap();
        assert_eq!(intensity, vec![255]);
    }

    #[test]
    fn alpha_does_not_affect_intensity() {
        let opaque = to_intensity(&[30, 60, 90, 255], 1, 1).unwrap();
        let transparent = to_intensity(&[30, 60, 90, 0], 1, 1).unwrap();
        assert_eq!(opaque, transparent);
        assert_eq!(opaque, vec![60]);
    }

    #[test]
    fn rejects_mismatched_buffer_length() {
        let frame = vec![0u8; 15];
        let result = to_intensity(&frame, 2, 2);
        assert!(matches!(
            result,
            Err(VisionError::InvalidDimensions {
                expected: 16,
                actual: 15,
                ..
            })
        ));
    }
}
