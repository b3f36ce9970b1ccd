// THEORY:
// The `surface` module is the engine's only window onto the outside world.
// The pipeline never decodes images or touches pixels directly; it drives a
// `RenderSurface`, which bundles the three capabilities the orchestrator
// needs: decoding an image locator, holding a drawable pixel canvas, and
// stroking vector paths over it.
//
// Key architectural principles:
// 1.  **Explicit handle**: the surface is constructed by the host and handed
//     to the pipeline. There is no global lookup by element id; whoever owns
//     the pipeline decides what it draws on.
// 2.  **Asynchronous decode**: `load_image` is the single suspension point
//     of a pipeline run. It resolves with the image's natural dimensions on
//     success and a `DecodeFailure` otherwise; a decode that never resolves
//     simply leaves the run suspended.
// 3.  **Canvas semantics**: `resize` clears the canvas to transparent black,
//     `draw_image` blits the decoded image at the origin, and the path
//     primitives accumulate subpaths that only touch pixels on `stroke`.
//     `PixelCanvas` implements those semantics in memory on an `image`
//     RGBA buffer, which is all the core pipeline and its tests need; other
//     hosts bring their own implementation.

use crate::error::VisionError;

use image::{Rgba, RgbaImage, imageops};

/// The drawing-and-decoding contract the pipeline orchestrator runs against.
#[allow(async_fn_in_trait)]
pub trait RenderSurface {
    /// Decodes the image behind `locator`, retaining it for `draw_image`,
    /// and resolves with its natural `(width, height)`.
    async fn load_image(&mut self, locator: &str) -> Result<(u32, u32), VisionError>;

    /// Resizes the canvas, clearing it to transparent black.
    fn resize(&mut self, width: u32, height: u32);

    /// Draws the most recently decoded image at the canvas origin.
    fn draw_image(&mut self);

    /// Reads back the RGBA pixels of the given region, row-major.
    fn read_pixels(&self, x: u32, y: u32, width: u32, height: u32) -> Vec<u8>;

    /// Sets the stroke color and width used by [`RenderSurface::stroke`].
    fn set_stroke(&mut self, color: [u8; 4], width: u32);

    /// Drops any accumulated subpaths and starts a new path.
    fn begin_path(&mut self);

    /// Starts a new subpath at the given position.
    fn move_to(&mut self, x: f64, y: f64);

    /// Extends the current subpath with a straight segment.
    fn line_to(&mut self, x: f64, y: f64);

    /// Marks the current subpath as closed back to its starting point.
    fn close_path(&mut self);

    /// Rasterizes every accumulated subpath with the current stroke.
    fn stroke(&mut self);
}

/// One polyline accumulated between `move_to`/`line_to` calls.
#[derive(Debug, Clone, Default)]
struct Subpath {
    points: Vec<(f64, f64)>,
    closed: bool,
}

/// An in-memory render surface backed by an RGBA pixel buffer.
///
/// Decodes filesystem locators through the `image` crate. Stroking uses a
/// Bresenham walk with a square brush of the configured stroke width.
pub struct PixelCanvas {
    canvas: RgbaImage,
    decoded: Option<RgbaImage>,
    stroke_color: Rgba<u8>,
    stroke_width: u32,
    subpaths: Vec<Subpath>,
}

impl PixelCanvas {
    pub fn new() -> Self {
        Self {
            canvas: RgbaImage::new(0, 0),
            decoded: None,
            stroke_color: Rgba([255, 0, 0, 255]),
            stroke_width: 1,
            subpaths: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    pub fn height(&self) -> u32 {
        self.canvas.height()
    }

    /// The full canvas as a row-major RGBA byte slice.
    pub fn pixels(&self) -> &[u8] {
        self.canvas.as_raw()
    }

    fn draw_segment(&mut self, from: (f64, f64), to: (f64, f64)) {
        let mut x0 = from.0.round() as i64;
        let mut y0 = from.1.round() as i64;
        let x1 = to.0.round() as i64;
        let y1 = to.1.round() as i64;

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let step_x = if x0 < x1 { 1 } else { -1 };
        let step_y = if y0 < y1 { 1 } else { -1 };
        let mut error = dx + dy;

        loop {
            self.plot_brush(x0, y0);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let doubled = 2 * error;
            if doubled >= dy {
                error += dy;
                x0 += step_x;
            }
            if doubled <= dx {
                error += dx;
                y0 += step_y;
            }
        }
    }

    /// Stamps a square brush of the stroke width centered on (cx, cy),
    /// clipped to the canvas.
    fn plot_brush(&mut self, cx: i64, cy: i64) {
        let side = self.stroke_width.max(1) as i64;
        let offset = (side - 1) / 2;
        for dy in 0..side {
            for dx in 0..side {
                let x = cx - offset + dx;
                let y = cy - offset + dy;
                if x >= 0
                    && y >= 0
                    && (x as u32) < self.canvas.width()
                    && (y as u32) < self.canvas.height()
                {
                    self.canvas.put_pixel(x as u32, y as u32, self.stroke_color);
                }
            }
        }
    }
}

impl Default for PixelCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSurface for PixelCanvas {
    async fn load_image(&mut self, locator: &str) -> Result<(u32, u32), VisionError> {
        let path = locator.to_owned();
        let decode_result = tokio::task::spawn_blocking(move || image::open(path)).await;

        let decoded = match decode_result {
            Ok(Ok(decoded)) => decoded.into_rgba8(),
            Ok(Err(source)) => {
                return Err(VisionError::DecodeFailure {
                    locator: locator.to_owned(),
                    source,
                });
            }
            Err(join_error) => {
                return Err(VisionError::DecodeFailure {
                    locator: locator.to_owned(),
                    source: image::ImageError::IoError(std::io::Error::other(join_error)),
                });
            }
        };

        let dimensions = decoded.dimensions();
        tracing::debug!(locator, width = dimensions.0, height = dimensions.1, "image decoded");
        self.decoded = Some(decoded);
        Ok(dimensions)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.canvas = RgbaImage::new(width, height);
    }

    fn draw_image(&mut self) {
        if let Some(decoded) = &self.decoded {
            imageops::replace(&mut self.canvas, decoded, 0, 0);
        }
    }

    fn read_pixels(&self, x: u32, y: u32, width: u32, height: u32) -> Vec<u8> {
        imageops::crop_imm(&self.canvas, x, y, width, height)
            .to_image()
            .into_raw()
    }

    fn set_stroke(&mut self, color: [u8; 4], width: u32) {
        self.stroke_color = Rgba(color);
        self.stroke_width = width;
    }

    fn begin_path(&mut self) {
        self.subpaths.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.subpaths.push(Subpath {
            points: vec![(x, y)],
            closed: false,
        });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        if let Some(subpath) = self.subpaths.last_mut() {
            if !subpath.closed {
                subpath.points.push((x, y));
                return;
            }
        }
        // line_to without an open subpath starts one, canvas-style.
        self.move_to(x, y);
    }

    fn close_path(&mut self) {
        if let Some(subpath) = self.subpaths.last_mut() {
            subpath.closed = true;
        }
    }

    fn stroke(&mut self) {
        let subpaths = std::mem::take(&mut self.subpaths);
        for subpath in &subpaths {
            for segment in subpath.points.windows(2) {
                self.draw_segment(segment[0], segment[1]);
            }
            if subpath.closed && subpath.points.len() > 2 {
                let last = subpath.points[subpath.points.len() - 1];
                self.draw_segment(last, subpath.points[0]);
            }
        }
        self.subpaths = subpaths;
    }
}
