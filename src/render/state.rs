//! The demo's `AppState`: a `FrameDriver` plus the GPU objects that draw its frames.
//!
//! Per frame:
//! - build the frame's draw list (camera, text, particles)
//! - acquire the surface texture, clear color + depth, draw, present
//! - bump the driver's rotation counter
//!
//! Surface hiccups (outdated/lost/timeout) skip the frame without advancing the scene.

use std::sync::Arc;

use anyhow::Context as _;
use log::debug;
use winit::window::Window;

use crate::config::SceneConfig;
use crate::driver::{FrameDriver, InputEvent};
use crate::render::{app::AppState, gpu::Gpu, scene_renderer::SceneRenderer};
use crate::scene::{DrawList, Rgba};

const CLEAR: Rgba = Rgba::BLACK;

pub struct MagnusState {
    pub window: Arc<Window>,
    pub gpu: Gpu,
    pub renderer: SceneRenderer,
    pub driver: FrameDriver,

    draw_list: DrawList,
}

impl MagnusState {
    pub async fn new(window: Arc<Window>, config: SceneConfig) -> anyhow::Result<Self> {
        let gpu = Gpu::new(window.clone()).await?;
        let renderer = SceneRenderer::new(&gpu, config.lighting.clone())?;
        let driver = FrameDriver::new(config, &mut rand::thread_rng())
            .context("scene: invalid configuration")?;

        Ok(Self {
            window,
            gpu,
            renderer,
            driver,
            draw_list: DrawList::new(),
        })
    }

    pub fn render(&mut self) -> anyhow::Result<()> {
        if self.gpu.is_minimized() {
            return Ok(());
        }

        // Acquire first so a skipped frame leaves the simulation untouched.
        let (surface_texture, view) = match self.gpu.acquire_frame() {
            Ok(v) => v,
            Err(wgpu::SurfaceError::Outdated)
            | Err(wgpu::SurfaceError::Lost)
            | Err(wgpu::SurfaceError::Other) => {
                debug!("surface outdated/lost; reconfiguring");
                self.gpu.resize(self.gpu.size);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                debug!("surface timeout; skipping frame");
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err(anyhow::anyhow!("wgpu SurfaceError::OutOfMemory"));
            }
        };

        let Some(camera) = self.driver.build_frame_into(&mut self.draw_list) else {
            return Ok(());
        };
        self.renderer.prepare(&self.gpu, &camera, &self.draw_list);

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Main Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: CLEAR.r as f64,
                            g: CLEAR.g as f64,
                            b: CLEAR.b as f64,
                            a: CLEAR.a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.gpu.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            self.renderer.draw(&mut pass, &self.draw_list);
        }

        self.gpu.queue.submit(Some(encoder.finish()));
        self.window.pre_present_notify();
        surface_texture.present();

        self.driver.end_frame();
        Ok(())
    }
}

impl AppState for MagnusState {
    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.gpu.resize(new_size);
    }

    fn render(&mut self) -> anyhow::Result<()> {
        Self::render(self)
    }

    fn request_redraw(&self) {
        self.window.request_redraw();
    }

    fn handle_input(&mut self, input: InputEvent) {
        self.driver.handle_input(input);
    }

    fn is_running(&self) -> bool {
        self.driver.is_running()
    }
}
