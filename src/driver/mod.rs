//! Frame driver: the two-state render loop logic, independent of any window or GPU.
//!
//! Per frame while running:
//! - input has already been fed through `handle_input` (may stop the loop)
//! - `build_frame` places the camera from the rotation counter, draws the text, then
//!   advances and draws every particle in a fixed order
//! - the caller presents the frame and waits for the next deadline
//! - `end_frame` bumps the rotation counter
//!
//! Once stopped, `build_frame` returns `None` and nothing moves any more.

use log::info;
use rand::Rng;

use crate::config::{ConfigError, SceneConfig};
use crate::particles::{LightFalloff, Particle};
use crate::scene::{Camera3D, DrawList, Mesh3D};
use crate::text::Text3D;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RunState {
    Running,
    Stopped,
}

/// Input that matters to the demo. Everything else is ignored by the runner.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputEvent {
    KeyPressed,
    QuitRequested,
}

/// One frame's worth of renderer input.
#[derive(Debug, Clone)]
pub struct Frame {
    pub camera: Camera3D,
    pub draw_list: DrawList,
}

pub struct FrameDriver {
    config: SceneConfig,
    text: Text3D,
    particles: Vec<Particle>,
    /// Unit sphere shared by every particle core.
    sphere: Mesh3D,
    rotation: u64,
    state: RunState,
}

impl FrameDriver {
    /// Validate `config` and create the text and all particles.
    pub fn new<R: Rng>(config: SceneConfig, rng: &mut R) -> Result<Self, ConfigError> {
        config.validate()?;

        let text = Text3D::new(config.text.clone(), config.letter_spacing, config.extrude_depth);
        let particles = (0..config.particle_count)
            .map(|_| Particle::new(&config, rng))
            .collect::<Vec<_>>();
        let sphere = Mesh3D::uv_sphere(1.0, config.sphere_slices, config.sphere_stacks);

        info!(
            "scene: text {:?}, {} particles",
            config.text,
            particles.len()
        );

        Ok(Self {
            config,
            text,
            particles,
            sphere,
            rotation: 0,
            state: RunState::Running,
        })
    }

    #[inline]
    pub fn state(&self) -> RunState {
        self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    #[inline]
    pub fn rotation(&self) -> u64 {
        self.rotation
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[inline]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Apply one input event. Both kinds stop the loop; stopping is permanent.
    pub fn handle_input(&mut self, event: InputEvent) {
        if self.state == RunState::Stopped {
            return;
        }
        info!("{event:?}; stopping after {} frames", self.rotation);
        self.state = RunState::Stopped;
    }

    /// Camera for the current rotation tick.
    pub fn camera(&self) -> Camera3D {
        let c = &self.config;
        Camera3D::orbiting(self.rotation, c.camera_distance, c.camera_height, c.camera_rate)
            .with_projection(c.fov_y_degrees.to_radians(), c.z_near, c.z_far)
    }

    /// Simulate and collect geometry for one frame; `None` once stopped.
    pub fn build_frame(&mut self) -> Option<Frame> {
        let mut draw_list = DrawList::new();
        self.build_frame_into(&mut draw_list)?;
        Some(Frame {
            camera: self.camera(),
            draw_list,
        })
    }

    /// Like `build_frame`, reusing `out`'s allocations. Returns the camera.
    pub fn build_frame_into(&mut self, out: &mut DrawList) -> Option<Camera3D> {
        if !self.is_running() {
            return None;
        }
        out.clear();

        let camera = self.camera();
        self.text.draw(out);

        let falloff = LightFalloff {
            constant: self.config.lighting.point_constant_attenuation,
            linear: self.config.lighting.point_linear_attenuation,
        };
        for particle in &mut self.particles {
            particle.advance();
            particle.draw(&self.sphere, falloff, out);
        }

        Some(camera)
    }

    /// Finish the current frame: advance the camera rotation by one tick.
    pub fn end_frame(&mut self) {
        if self.is_running() {
            self.rotation += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn driver(particles: usize) -> FrameDriver {
        let config = SceneConfig {
            particle_count: particles,
            ..Default::default()
        };
        FrameDriver::new(config, &mut StdRng::seed_from_u64(1)).unwrap()
    }

    #[test]
    fn starts_running_at_rotation_zero() {
        let d = driver(40);
        assert_eq!(d.state(), RunState::Running);
        assert_eq!(d.rotation(), 0);
        assert_eq!(d.particles().len(), 40);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SceneConfig {
            particle_count: 0,
            ..Default::default()
        };
        assert!(matches!(
            FrameDriver::new(config, &mut StdRng::seed_from_u64(1)),
            Err(ConfigError::NoParticles)
        ));
    }

    #[test]
    fn frame_contains_text_and_every_particle() {
        let mut d = driver(3);
        let frame = d.build_frame().unwrap();

        let mut text_only = DrawList::new();
        Text3D::new("MAGNUS", 1.0, 0.2).draw(&mut text_only);
        // First frame: every trail has a single point, so only the text draws lines.
        assert_eq!(frame.draw_list.segment_count(), text_only.segment_count());
        assert_eq!(
            frame.draw_list.triangles.vertices.len(),
            3 * Mesh3D::uv_sphere(1.0, 8, 8).vertices.len()
        );

        // The shared light belongs to the last particle drawn.
        let last = d.particles().last().unwrap();
        let light = frame.draw_list.dynamic_light.unwrap();
        assert_eq!(light.position, last.position());
        assert_eq!(light.diffuse, last.colors().core);
    }

    #[test]
    fn particles_move_once_per_frame_in_order() {
        let mut d = driver(5);
        for _ in 0..7 {
            d.build_frame().unwrap();
            d.end_frame();
        }
        assert_eq!(d.rotation(), 7);
        for p in d.particles() {
            assert_eq!(p.trail().len(), 7);
        }
    }

    #[test]
    fn camera_follows_rotation_counter() {
        let mut d = driver(1);
        let first = d.build_frame().unwrap().camera;
        d.end_frame();
        let second = d.build_frame().unwrap().camera;
        assert_ne!(first.eye, second.eye);
        let expected = Camera3D::orbiting(1, 10.0, 3.0, 0.01).with_projection(
            45f32.to_radians(),
            0.1,
            50.0,
        );
        assert_eq!(second, expected);
    }

    #[test]
    fn key_press_stops_before_the_next_frame() {
        let mut d = driver(2);
        d.build_frame().unwrap();
        d.end_frame();
        let trail = d.particles()[0].trail().clone();

        d.handle_input(InputEvent::KeyPressed);
        assert_eq!(d.state(), RunState::Stopped);
        assert!(d.build_frame().is_none());
        d.end_frame();

        assert_eq!(d.rotation(), 1);
        assert_eq!(d.particles()[0].trail(), &trail);
    }

    #[test]
    fn quit_request_stops_and_stays_stopped() {
        let mut d = driver(2);
        d.handle_input(InputEvent::QuitRequested);
        d.handle_input(InputEvent::KeyPressed);
        assert_eq!(d.state(), RunState::Stopped);
        assert!(!d.is_running());
        assert!(d.build_frame().is_none());
    }
}
