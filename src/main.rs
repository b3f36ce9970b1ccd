// Demo runner for the `outline_vision` library: frames the strongest edges
// of one image from the command line and saves the annotated canvas.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use outline_vision::bridge;
use outline_vision::core_modules::utils::image_helper;
use outline_vision::pipeline::{OutlinePipeline, PipelineConfig};
use outline_vision::surface::PixelCanvas;

#[tokio::main]
async fn main() -> Result<()> {
    // --- 1. Logging & Argument Parsing ---
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "outline_vision=info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        println!("Usage: outline_vision <input_image> [annotated_output.png]");
        return Ok(());
    }
    let input_path = &args[1];

    // --- 2. Pipeline Initialization ---
    let config = PipelineConfig::default();
    let pipeline = OutlinePipeline::new(PixelCanvas::new(), config);

    // --- 3. Trigger Delivery ---
    // One locator, delivered over the bridge exactly as a host would; the
    // dropped sender closes the channel so the listener drains and returns.
    let (trigger, receiver) = bridge::trigger_channel(4);
    trigger
        .send(input_path.as_str())
        .await
        .context("trigger bridge closed before the run started")?;
    drop(trigger);

    // --- 4. Run ---
    pipeline.run_listener(receiver).await;

    // --- 5. Save the Annotated Canvas ---
    if let Some(output_path) = args.get(2) {
        let canvas = pipeline.into_surface();
        image_helper::save(output_path, canvas.width(), canvas.height(), canvas.pixels())
            .with_context(|| format!("failed to save annotated canvas to {output_path}"))?;
        println!("Annotated canvas saved to {output_path}");
    }

    Ok(())
}
