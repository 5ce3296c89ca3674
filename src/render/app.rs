//! App entrypoint for the rendering layer.
//!
//! This module owns:
//! - the winit application lifecycle + event loop
//! - creating the (borderless fullscreen) window
//! - translating window input into `driver::InputEvent`
//! - frame pacing via `ControlFlow::WaitUntil`
//! - delegating everything else to an injected async state builder
//!
//! Design:
//! - The app runner is generic over a user-defined state type `S: AppState`.
//! - The builder is async and receives the created window.
//! - When the state reports it stopped, the runner drops it (releasing GPU resources) and
//!   exits the event loop.

use std::{future::Future, pin::Pin, sync::Arc, time::Instant};

use anyhow::Context as _;
use log::{debug, error, info};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, StartCause, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Fullscreen, Window, WindowAttributes, WindowId},
};

use crate::driver::InputEvent;
use crate::render::util::FramePacer;

/// App-facing configuration for running the winit event loop.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Window title.
    pub title: String,
    /// Borderless fullscreen on the current monitor; otherwise a decorated window.
    pub fullscreen: bool,
    /// Frame rate cap.
    pub target_fps: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "3D MAGNUS".to_string(),
            fullscreen: true,
            target_fps: 60,
        }
    }
}

impl AppConfig {
    fn window_attributes(&self) -> WindowAttributes {
        let attrs = WindowAttributes::default().with_title(self.title.as_str());
        if self.fullscreen {
            attrs
                .with_decorations(false)
                .with_fullscreen(Some(Fullscreen::Borderless(None)))
        } else {
            attrs
        }
    }
}

/// Map a window event to demo input, if it is one.
pub fn input_from_window_event(event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::CloseRequested => Some(InputEvent::QuitRequested),
        WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
            Some(InputEvent::KeyPressed)
        }
        _ => None,
    }
}

/// Minimal trait a state must implement to be driven by the app runner.
pub trait AppState: 'static {
    /// Handle window resize.
    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>);

    /// Render one frame.
    fn render(&mut self) -> anyhow::Result<()>;

    /// Request a redraw on the underlying window.
    fn request_redraw(&self);

    /// Feed one input event.
    fn handle_input(&mut self, input: InputEvent);

    /// `false` once the state has stopped; the runner then exits.
    fn is_running(&self) -> bool;
}

/// Run the winit event loop with an injected async state builder.
///
/// Notes:
/// - The builder is called once when the app is resumed (after the window is created).
/// - The builder runs on the current thread using `pollster::block_on`.
/// - Builder failures end the event loop and are returned from here.
pub fn run_with_builder<S, B, Fut>(config: AppConfig, builder: B) -> anyhow::Result<()>
where
    S: AppState,
    B: FnOnce(Arc<Window>) -> Fut + 'static,
    Fut: Future<Output = anyhow::Result<S>> + 'static,
{
    let event_loop = EventLoop::new().context("winit: failed to create EventLoop")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::<S>::new_with_builder(config, builder);
    event_loop
        .run_app(&mut app)
        .context("winit: run_app failed")?;

    match app.fatal.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Type-erased async builder for creating a state `S` from a created window.
///
/// The future is pinned and boxed so `pollster::block_on(...)` can drive it
/// (`dyn Future` is not `Unpin`).
type BoxedStateBuilder<S> = Box<
    dyn FnOnce(Arc<Window>) -> Pin<Box<dyn Future<Output = anyhow::Result<S>> + 'static>> + 'static,
>;

/// Application state used by winit.
struct App<S: AppState> {
    config: AppConfig,
    builder: Option<BoxedStateBuilder<S>>,
    state: Option<S>,
    pacer: FramePacer,
    /// Startup error to hand back from `run_with_builder`.
    fatal: Option<anyhow::Error>,
}

impl<S: AppState> App<S> {
    fn new_with_builder<B, Fut>(config: AppConfig, builder: B) -> Self
    where
        B: FnOnce(Arc<Window>) -> Fut + 'static,
        Fut: Future<Output = anyhow::Result<S>> + 'static,
    {
        let pacer = FramePacer::new(config.target_fps, Instant::now());
        Self {
            config,
            builder: Some(Box::new(|window| Box::pin(builder(window)))),
            state: None,
            pacer,
            fatal: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        error!("{err:#}");
        self.fatal = Some(err);
        self.state = None;
        event_loop.exit();
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window = Arc::new(
            event_loop
                .create_window(self.config.window_attributes())
                .context("winit: failed to create window")?,
        );

        let builder = self
            .builder
            .take()
            .context("app state builder can only be consumed once")?;
        let state = pollster::block_on(builder(window)).context("failed to initialize renderer")?;

        info!(
            "running at {} fps; press any key to exit",
            self.config.target_fps
        );
        self.pacer = FramePacer::new(self.config.target_fps, Instant::now());
        state.request_redraw();
        self.state = Some(state);
        Ok(())
    }
}

impl<S: AppState> ApplicationHandler for App<S> {
    fn new_events(&mut self, _event_loop: &ActiveEventLoop, cause: StartCause) {
        if let StartCause::ResumeTimeReached { .. } = cause {
            if let Some(state) = self.state.as_ref() {
                state.request_redraw();
            }
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // Only the first resume creates the window; later ones (mobile) keep the state.
        if self.builder.is_none() {
            return;
        }
        if let Err(err) = self.init(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        if let Some(input) = input_from_window_event(&event) {
            state.handle_input(input);
            if !state.is_running() {
                info!("stopped; releasing GPU resources");
                self.state = None;
                event_loop.exit();
            }
            return;
        }

        match event {
            WindowEvent::Resized(size) => {
                state.resize(size);
            }
            WindowEvent::RedrawRequested => {
                if !state.is_running() {
                    return;
                }
                match state.render() {
                    Ok(()) => {}
                    Err(err) => {
                        self.fail(event_loop, err.context("render failed"));
                        return;
                    }
                }
                self.pacer.frame_presented(Instant::now());
                if self.pacer.frames() % 600 == 0 {
                    debug!("{} frames presented", self.pacer.frames());
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(state) = self.state.as_ref() else {
            return;
        };
        if self.pacer.is_due(Instant::now()) {
            state.request_redraw();
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.pacer.deadline()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_request_maps_to_quit() {
        assert_eq!(
            input_from_window_event(&WindowEvent::CloseRequested),
            Some(InputEvent::QuitRequested)
        );
    }

    #[test]
    fn unrelated_window_events_are_ignored() {
        assert_eq!(input_from_window_event(&WindowEvent::Focused(true)), None);
        assert_eq!(input_from_window_event(&WindowEvent::RedrawRequested), None);
    }

    #[test]
    fn default_window_is_borderless_fullscreen() {
        let attrs = AppConfig::default().window_attributes();
        assert!(!attrs.decorations);
        assert!(matches!(attrs.fullscreen, Some(Fullscreen::Borderless(None))));
        assert_eq!(attrs.title, "3D MAGNUS");
    }
}
