//! Rendering module root.
//!
//! The `render` module owns the window/event-loop integration and the GPU side:
//! everything above it (`scene`, `text`, `particles`, `driver`) is plain CPU code.
//!
//! Current entrypoint: `render::app::run_with_builder(...)` with `state::MagnusState`.

pub mod app;

/// Device/surface/depth-buffer wrapper.
pub mod gpu;

/// Pod vertex and uniform layouts.
pub mod primitives;

/// Line + triangle renderer for a frame's draw list.
pub mod scene_renderer;

/// The demo's `AppState`.
pub mod state;

/// Frame pacing.
pub mod util;
