// THEORY:
// The `pipeline` module is the final, top-level API for the engine. It
// sequences the three pure stages (luminance conversion, Sobel gradient,
// bounding-box extraction) against one freshly decoded image, and renders
// the detected box as a stroked overlay on the render surface. It is the
// only component that talks to collaborators (the render surface and the
// trigger bridge); the core stages stay pure and synchronous.
//
// Protocol per trigger:
// 1.  Gate     - at most one run at a time owns the surface. A trigger
//                arriving mid-run is dropped, not queued: the trigger
//                contract is fire-and-forget and a second overlapping run
//                would interleave Sizing/Overlay on the shared canvas.
// 2.  Loading  - ask the surface to decode the locator. This is the only
//                suspension point. A failed decode abandons the run with a
//                log line and nothing else; no error travels back through
//                the bridge.
// 3.  Sizing   - resize the canvas to the image's natural dimensions and
//                draw the raw image at the origin.
// 4.  Processing - read the pixels back and run the three stages with the
//                configured threshold.
// 5.  Overlay  - stroke the closed four-corner polygon of the detection.
//                An empty detection draws nothing.

use crate::bridge::TriggerReceiver;
use crate::core_modules::bounding_box;
use crate::core_modules::{gradient, luminance};
use crate::error::VisionError;
use crate::surface::RenderSurface;

use tokio::sync::Mutex;

// Re-export key data structures for the public API.
pub use crate::core_modules::bounding_box::{BoundingBox, Point};

/// Reference magnitude threshold; edges weaker than this are background.
pub const DEFAULT_MAGNITUDE_THRESHOLD: f64 = 100.0;

/// Configuration for the OutlinePipeline, allowing for tunable behavior.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// A gradient magnitude must strictly exceed this to count as an edge.
    pub magnitude_threshold: f64,
    /// RGBA stroke color of the overlay rectangle.
    pub stroke_color: [u8; 4],
    /// Stroke width of the overlay rectangle, in pixels.
    pub stroke_width: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            magnitude_threshold: DEFAULT_MAGNITUDE_THRESHOLD,
            stroke_color: [255, 0, 0, 255],
            stroke_width: 2,
        }
    }
}

/// How a single pipeline run ended. Returned for observability only; the
/// trigger source never sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The full protocol ran; `detection` is `None` when no pixel beat the
    /// threshold (no overlay is drawn in that case).
    Completed { detection: Option<BoundingBox> },
    /// The run stopped early (decode failure or a surface that returned a
    /// malformed buffer). No overlay, no diagnostic beyond the log.
    Abandoned,
    /// A run already owned the surface; this trigger was discarded.
    Dropped,
}

/// The main, top-level struct for the edge-framing engine.
pub struct OutlinePipeline<S> {
    surface: Mutex<S>,
    config: PipelineConfig,
}

impl<S: RenderSurface> OutlinePipeline<S> {
    /// Builds a pipeline around an explicit render surface handle.
    pub fn new(surface: S, config: PipelineConfig) -> Self {
        Self {
            surface: Mutex::new(surface),
            config,
        }
    }

    /// Runs the full protocol for one trigger.
    pub async fn process_trigger(&self, locator: &str) -> RunOutcome {
        // --- 1. Gate ---
        let Ok(mut surface) = self.surface.try_lock() else {
            tracing::debug!(locator, "run already in flight, dropping trigger");
            return RunOutcome::Dropped;
        };
        self.run(&mut surface, locator).await
    }

    async fn run(&self, surface: &mut S, locator: &str) -> RunOutcome {
        // --- 2. Loading ---
        let (width, height) = match surface.load_image(locator).await {
            Ok(dimensions) => dimensions,
            Err(error) => {
                tracing::warn!(locator, %error, "decode failed, abandoning run");
                return RunOutcome::Abandoned;
            }
        };

        // --- 3. Sizing ---
        surface.resize(width, height);
        surface.draw_image();

        // --- 4. Processing ---
        let frame_buffer = surface.read_pixels(0, 0, width, height);
        let detection = match self.detect(&frame_buffer, width, height) {
            Ok(detection) => detection,
            Err(error) => {
                tracing::error!(locator, %error, "surface returned a malformed buffer");
                return RunOutcome::Abandoned;
            }
        };

        // --- 5. Overlay ---
        if let Some(bounding_box) = &detection {
            self.draw_overlay(surface, bounding_box);
        }
        tracing::info!(locator, detected = detection.is_some(), "run complete");

        RunOutcome::Completed { detection }
    }

    /// The three pure stages, in order, with the configured threshold.
    fn detect(
        &self,
        frame_buffer: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Option<BoundingBox>, VisionError> {
        let intensity = luminance::to_intensity(frame_buffer, width, height)?;
        let magnitude = gradient::gradient_magnitude(&intensity, width, height)?;
        Ok(bounding_box::find_bounding_box(
            &magnitude,
            width,
            height,
            self.config.magnitude_threshold,
        ))
    }

    /// Strokes the closed corner polygon of a detection onto the surface.
    fn draw_overlay(&self, surface: &mut S, bounding_box: &BoundingBox) {
        surface.set_stroke(self.config.stroke_color, self.config.stroke_width);
        surface.begin_path();
        let [top_left, top_right, bottom_right, bottom_left] = bounding_box.corners();
        surface.move_to(top_left.x as f64, top_left.y as f64);
        surface.line_to(top_right.x as f64, top_right.y as f64);
        surface.line_to(bottom_right.x as f64, bottom_right.y as f64);
        surface.line_to(bottom_left.x as f64, bottom_left.y as f64);
        surface.close_path();
        surface.stroke();
    }

    /// Drains the trigger bridge until the host drops its sender, running
    /// the protocol once per delivered locator.
    pub async fn run_listener(&self, mut receiver: TriggerReceiver) {
        while let Some(locator) = receiver.recv().await {
            let outcome = self.process_trigger(&locator).await;
            tracing::info!(%locator, ?outcome, "pipeline run finished");
        }
    }

    /// Consumes the pipeline and hands the surface back to the host, e.g.
    /// to save or present the annotated canvas.
    pub fn into_surface(self) -> S {
        self.surface.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::PixelCanvas;

    /// A 5x5 intensity layout with two dark columns and three bright ones:
    /// the detected box must straddle the column boundary (the two columns
    /// whose 3x3 window crosses the step) and span the full interior rows.
    #[test]
    fn step_edge_detection_spans_the_column_boundary() {
        let width = 5u32;
        let height = 5u32;
        let mut intensity = vec![0u8; 25];
        for y in 0..5 {
            for x in 2..5 {
                intensity[y * 5 + x] = 255;
            }
        }

        let magnitude = gradient::gradient_magnitude(&intensity, width, height).unwrap();
        let detection =
            bounding_box::find_bounding_box(&magnitude, width, height, 100.0).unwrap();

        assert_eq!(detection.top_left, Point { x: 1, y: 1 });
        assert_eq!(detection.bottom_right, Point { x: 2, y: 3 });
    }

    #[tokio::test]
    async fn decode_failure_abandons_the_run() {
        let pipeline = OutlinePipeline::new(PixelCanvas::new(), PipelineConfig::default());
        let outcome = pipeline.process_trigger("/nonexistent/trigger.png").await;
        assert_eq!(outcome, RunOutcome::Abandoned);

        // The canvas was never sized or drawn.
        let canvas = pipeline.into_surface();
        assert_eq!(canvas.width(), 0);
        assert_eq!(canvas.height(), 0);
    }
}
