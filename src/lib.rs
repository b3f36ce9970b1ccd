// THEORY:
// This file is the main entry point for the `outline_vision` library crate.
// It follows the standard Rust convention of using `lib.rs` to define the
// public API that will be exposed to external consumers (like the demo
// runner binary or a host embedding the engine).
//
// The primary goal is to export the `OutlinePipeline` and its associated
// data structures (`PipelineConfig`, `RunOutcome`, the geometry types) as
// the clean, high-level interface for the engine, together with the two
// collaborator seams a host has to provide or drive: the `RenderSurface`
// implementation it draws on and the trigger bridge it delivers image
// locators through. The pure algorithmic stages live in `core_modules` and
// are exported as well; they are useful on their own for callers that
// already hold a pixel buffer and only want the math.

pub mod bridge;
pub mod core_modules;
pub mod error;
pub mod pipeline;
pub mod surface;
