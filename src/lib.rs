//! `magnus` library crate root.
//!
//! Renders the word "MAGNUS" as wireframe-extruded 3D text surrounded by glowing particles
//! that orbit the origin and leave fading trails, under a slowly circling camera.
//!
//! Layout:
//! - `scene`, `text`, `particles`, `driver`: CPU-side simulation and geometry (no GPU, unit
//!   tested headlessly)
//! - `render`: winit event loop, wgpu device/surface, pipelines and frame pacing
//! - `config`: the fixed scene constants
//!
//! The binary target stays thin and calls `run_app`.

pub mod config;
pub mod driver;
pub mod particles;
pub mod render;
pub mod scene;
pub mod text;

use config::SceneConfig;
use render::app::AppConfig;

/// Run the demo with the default scene until a key is pressed or the window is closed.
///
/// Note: This function does **not** initialize logging; callers can decide their own
/// logging setup.
pub fn run_app() -> anyhow::Result<()> {
    run_with_config(AppConfig::default(), SceneConfig::default())
}

/// Run the demo with explicit window and scene configuration.
pub fn run_with_config(app: AppConfig, scene: SceneConfig) -> anyhow::Result<()> {
    scene.validate()?;
    let app = AppConfig {
        target_fps: scene.target_fps,
        ..app
    };
    render::app::run_with_builder(app, move |window| async move {
        render::state::MagnusState::new(window, scene).await
    })
}
