//! Scene constants.
//!
//! The demo has no runtime configuration surface: everything here is fixed at compile time
//! through `SceneConfig::default()`. Keeping the numbers in one struct lets tests build
//! smaller or deterministic scenes without touching the render loop.

use std::ops::RangeInclusive;

/// Invalid scene configuration.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("range `{name}` is empty or inverted ({min} > {max})")]
    InvertedRange { name: &'static str, min: f32, max: f32 },

    #[error("trail length range is inverted ({min} > {max})")]
    InvertedTrailRange { min: usize, max: usize },

    #[error("trail length must be at least 1")]
    ZeroTrailLength,

    #[error("`{name}` must be positive (got {value})")]
    NotPositive { name: &'static str, value: f32 },

    #[error("particle count must be at least 1")]
    NoParticles,

    #[error("target frame rate must be at least 1")]
    ZeroFrameRate,
}

/// Ranges the particle orbit parameters are drawn from on `reset`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitRanges {
    pub radius: RangeInclusive<f32>,
    pub base_y: RangeInclusive<f32>,
    pub phase: RangeInclusive<f32>,
    pub speed: RangeInclusive<f32>,
    pub size: RangeInclusive<f32>,
}

impl Default for OrbitRanges {
    fn default() -> Self {
        Self {
            radius: 3.0..=8.0,
            base_y: -3.0..=3.0,
            phase: 0.0..=100.0,
            speed: 0.02..=0.06,
            size: 0.05..=0.15,
        }
    }
}

/// Fixed lighting setup.
///
/// `key_*` is a positional light expressed in eye space (it rides with the camera).
/// `point_*` is the attenuation of the shared dynamic light that particles overwrite.
#[derive(Debug, Clone, PartialEq)]
pub struct LightingConfig {
    pub global_ambient: f32,
    pub key_position_eye: [f32; 3],
    pub key_ambient: f32,
    pub key_diffuse: f32,
    pub point_constant_attenuation: f32,
    pub point_linear_attenuation: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            global_ambient: 0.2,
            key_position_eye: [0.0, 5.0, 5.0],
            key_ambient: 0.2,
            key_diffuse: 0.5,
            point_constant_attenuation: 0.1,
            point_linear_attenuation: 0.3,
        }
    }
}

/// Everything the frame driver needs to build the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub text: String,
    pub letter_spacing: f32,
    pub extrude_depth: f32,

    pub particle_count: usize,
    pub orbit: OrbitRanges,
    pub trail_length: RangeInclusive<usize>,
    pub sphere_slices: u32,
    pub sphere_stacks: u32,

    pub camera_distance: f32,
    pub camera_height: f32,
    /// Radians of camera orbit per rotation-counter tick.
    pub camera_rate: f32,
    pub fov_y_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,

    pub lighting: LightingConfig,
    pub target_fps: u32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            text: "MAGNUS".to_string(),
            letter_spacing: 1.0,
            extrude_depth: 0.2,

            particle_count: 40,
            orbit: OrbitRanges::default(),
            trail_length: 15..=30,
            sphere_slices: 8,
            sphere_stacks: 8,

            camera_distance: 10.0,
            camera_height: 3.0,
            camera_rate: 0.01,
            fov_y_degrees: 45.0,
            z_near: 0.1,
            z_far: 50.0,

            lighting: LightingConfig::default(),
            target_fps: 60,
        }
    }
}

fn check_range(name: &'static str, r: &RangeInclusive<f32>) -> Result<(), ConfigError> {
    if r.start() > r.end() || r.start().is_nan() || r.end().is_nan() {
        return Err(ConfigError::InvertedRange {
            name,
            min: *r.start(),
            max: *r.end(),
        });
    }
    Ok(())
}

fn check_positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

impl SceneConfig {
    /// Reject configurations the driver cannot build a scene from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("orbit.radius", &self.orbit.radius)?;
        check_range("orbit.base_y", &self.orbit.base_y)?;
        check_range("orbit.phase", &self.orbit.phase)?;
        check_range("orbit.speed", &self.orbit.speed)?;
        check_range("orbit.size", &self.orbit.size)?;

        if self.trail_length.start() > self.trail_length.end() {
            return Err(ConfigError::InvertedTrailRange {
                min: *self.trail_length.start(),
                max: *self.trail_length.end(),
            });
        }
        if *self.trail_length.start() == 0 {
            return Err(ConfigError::ZeroTrailLength);
        }
        if self.particle_count == 0 {
            return Err(ConfigError::NoParticles);
        }
        if self.target_fps == 0 {
            return Err(ConfigError::ZeroFrameRate);
        }

        check_positive("letter_spacing", self.letter_spacing)?;
        check_positive("camera_distance", self.camera_distance)?;
        check_positive("fov_y_degrees", self.fov_y_degrees)?;
        check_positive("z_near", self.z_near)?;
        check_positive("z_far - z_near", self.z_far - self.z_near)?;

        Ok(())
    }
}
