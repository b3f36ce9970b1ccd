// THEORY:
// The `gradient` module is the analytical heart of the engine. It convolves
// the intensity buffer with the classic 3x3 Sobel kernel pair and emits a
// per-pixel gradient magnitude, the local "edge strength" that the
// bounding-box extractor later thresholds.
//
// Key architectural principles:
// 1.  **Direct convolution**: a plain 9-tap loop per interior pixel, no FFT,
//     no separable fast path. The buffers involved are small enough that the
//     simple form wins on clarity and is still O(width * height).
// 2.  **Untouched border**: the outer one-pixel frame is never visited, so
//     it keeps the buffer's zero initialization. There is no reflection,
//     clamping, or wraparound. This matters downstream: a real edge touching
//     the image border produces its magnitude one pixel inside, and the
//     extracted box reflects that.
// 3.  **Row independence**: every output row depends only on the read-only
//     input, so interior rows can be processed in parallel bands. The
//     parallel operator must be bit-identical to the serial one.

use crate::error::VisionError;

type Kernel3 = [[i32; 3]; 3];

const SOBEL_KERNEL_X: Kernel3 = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];
const SOBEL_KERNEL_Y: Kernel3 = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]];

/// Computes the Sobel gradient-magnitude map of a row-major intensity buffer.
///
/// Every interior pixel receives `sqrt(sum_x^2 + sum_y^2)`; the one-pixel
/// outer border is left at zero. Images narrower or shorter than three
/// pixels have no interior and come back all zero.
pub fn gradient_magnitude(
    intensity: &[u8],
    width: u32,
    height: u32,
) -> Result<Vec<f64>, VisionError> {
    let mut magnitude = zeroed_output(intensity, width, height)?;

    let width = width as usize;
    let height = height as usize;
    if width < 3 || height < 3 {
        return Ok(magnitude);
    }

    for y in 1..height - 1 {
        let row = &mut magnitude[y * width..(y + 1) * width];
        for x in 1..width - 1 {
            row[x] = magnitude_at(intensity, width, x, y);
        }
    }

    Ok(magnitude)
}

/// Row-parallel variant of [`gradient_magnitude`].
///
/// The interior rows are split into contiguous bands, one scoped worker
/// thread per band, each writing only its own slice of the output while all
/// of them read the shared intensity buffer. Output is identical to the
/// serial operator.
pub fn gradient_magnitude_parallel(
    intensity: &[u8],
    width: u32,
    height: u32,
) -> Result<Vec<f64>, VisionError> {
    let mut magnitude = zeroed_output(intensity, width, height)?;

    let width = width as usize;
    let height = height as usize;
    if width < 3 || height < 3 {
        return Ok(magnitude);
    }

    let interior_rows = height - 2;
    let workers = num_cpus::get().clamp(1, interior_rows);
    let rows_per_band = interior_rows.div_ceil(workers);

    // Rows 1..height-1 of the output, as one contiguous slice.
    let interior = &mut magnitude[width..width * (height - 1)];

    std::thread::scope(|scope| {
        for (band_index, band) in interior.chunks_mut(rows_per_band * width).enumerate() {
            let first_row = 1 + band_index * rows_per_band;
            scope.spawn(move || {
                for (row_offset, row) in band.chunks_mut(width).enumerate() {
                    let y = first_row + row_offset;
                    for x in 1..width - 1 {
                        row[x] = magnitude_at(intensity, width, x, y);
                    }
                }
            });
        }
    });

    Ok(magnitude)
}

/// Validates the buffer shape and allocates the zero-initialized output.
fn zeroed_output(intensity: &[u8], width: u32, height: u32) -> Result<Vec<f64>, VisionError> {
    let expected = width as usize * height as usize;
    if intensity.len() != expected {
        return Err(VisionError::InvalidDimensions {
            expected,
            actual: intensity.len(),
            width,
            height,
        });
    }
    Ok(vec![0.0; expected])
}

/// The 9-tap dot product of both kernels at one interior pixel.
fn magnitude_at(intensity: &[u8], width: usize, x: usize, y: usize) -> f64 {
    let mut sum_x = 0i32;
    let mut sum_y = 0i32;

    for ky in 0..3 {
        let row_start = (y + ky - 1) * width;
        for kx in 0..3 {
            let sample = intensity[row_start + x + kx - 1] as i32;
            sum_x += SOBEL_KERNEL_X[ky][kx] * sample;
            sum_y += SOBEL_KERNEL_Y[ky][kx] * sample;
        }
    }

    ((sum_x * sum_x + sum_y * sum_y) as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interior_pixels(magnitude: &[f64], width: usize, height: usize) -> Vec<(usize, usize, f64)> {
        let mut pixels = Vec::new();
        for y in 1..height - 1 {
            for x in 1..width - 1 {
                pixels.push((x, y, magnitude[y * width + x]));
            }
        }
        pixels
    }

    #[test]
    fn flat_field_has_no_edges() {
        let intensity = vec![137u8; 8 * 6];
        let magnitude = gradient_magnitude(&intensity, 8, 6).unwrap();
        assert!(magnitude.iter().all(|&value| value == 0.0));
    }

    #[test]
    fn border_is_never_written() {
        let intensity: Vec<u8> = (0..7 * 5).map(|i| (i * 13 % 256) as u8).collect();
        let magnitude = gradient_magnitude(&intensity, 7, 5).unwrap();

        for x in 0..7 {
            assert_eq!(magnitude[x], 0.0);
            assert_eq!(magnitude[4 * 7 + x], 0.0);
        }
        for y in 0..5 {
            assert_eq!(magnitude[y * 7], 0.0);
            assert_eq!(magnitude[y * 7 + 6], 0.0);
        }
    }

    #[test]
    fn vertical_step_edge_lights_up_the_boundary_columns() {
        // Left two columns 0, right three columns 255, on a 5x5 grid.
        let width = 5usize;
        let height = 5usize;
        let mut intensity = vec![0u8; width * height];
        for y in 0..height {
            for x in 2..width {
                intensity[y * width + x] = 255;
            }
        }

        let magnitude = gradient_magnitude(&intensity, width as u32, height as u32).unwrap();

        for (x, y, value) in interior_pixels(&magnitude, width, height) {
            if x == 1 || x == 2 {
                assert!(value > 0.0, "expected edge response at ({x},{y})");
            } else {
                assert_eq!(value, 0.0, "expected flat response at ({x},{y})");
            }
        }
    }

    #[test]
    fn images_without_an_interior_come_back_all_zero() {
        let magnitude = gradient_magnitude(&[10, 200, 10, 200], 2, 2).unwrap();
        assert_eq!(magnitude, vec![0.0; 4]);
    }

    #[test]
    fn rejects_mismatched_buffer_length() {
        let result = gradient_magnitude(&[0u8; 11], 4, 3);
        assert!(matches!(result, Err(VisionError::InvalidDimensions { .. })));
    }

    #[test]
    fn parallel_operator_matches_serial() {
        let width = 33u32;
        let height = 17u32;
        let intensity: Vec<u8> = (0..width as usize * height as usize)
            .map(|i| ((i * 31 + i / 7) % 256) as u8)
            .collect();

        let serial = gradient_magnitude(&intensity, width, height).unwrap();
        let parallel = gradient_magnitude_parallel(&intensity, width, height).unwrap();

        assert_eq!(serial, parallel);
    }
}
