//! Orbiting glow particles.
//!
//! A particle circles the vertical axis at a fixed radius, bobbing up and down at twice its
//! orbital frequency. It remembers its last few positions as a trail (oldest first) and is
//! drawn as a fading line strip plus a small unlit sphere. Drawing also claims the shared
//! dynamic light slot, so the last particle drawn in a frame lights the scene.

use std::collections::VecDeque;

use glam::Vec3;
use rand::Rng;

use crate::config::{OrbitRanges, SceneConfig};
use crate::scene::{DrawList, Mesh3D, PointLight, Rgba, SceneVertex};

/// Trail/core color pair.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorScheme {
    pub trail: Rgba,
    pub core: Rgba,
}

/// Palette particles pick from at creation.
pub const PALETTE: [ColorScheme; 4] = [
    // blue-cyan
    ColorScheme {
        trail: Rgba::rgb(0.0, 0.8, 1.0),
        core: Rgba::rgb(0.5, 1.0, 1.0),
    },
    // deep blue
    ColorScheme {
        trail: Rgba::rgb(0.0, 0.4, 1.0),
        core: Rgba::rgb(0.3, 0.7, 1.0),
    },
    // cyan
    ColorScheme {
        trail: Rgba::rgb(0.0, 1.0, 0.8),
        core: Rgba::rgb(0.4, 1.0, 0.9),
    },
    // purple-blue
    ColorScheme {
        trail: Rgba::rgb(0.5, 0.0, 1.0),
        core: Rgba::rgb(0.7, 0.4, 1.0),
    },
];

/// Motion parameters set by `Particle::reset`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Orbit {
    pub radius: f32,
    pub base_y: f32,
    pub phase: f32,
    pub speed: f32,
    pub size: f32,
}

impl Orbit {
    /// Draw every parameter independently and uniformly from `ranges`.
    pub fn random<R: Rng>(ranges: &OrbitRanges, rng: &mut R) -> Self {
        Self {
            radius: rng.gen_range(ranges.radius.clone()),
            base_y: rng.gen_range(ranges.base_y.clone()),
            phase: rng.gen_range(ranges.phase.clone()),
            speed: rng.gen_range(ranges.speed.clone()),
            size: rng.gen_range(ranges.size.clone()),
        }
    }

    /// Position on the orbit for the current phase.
    #[inline]
    pub fn position_at(&self, phase: f32) -> Vec3 {
        let (s, c) = phase.sin_cos();
        Vec3::new(
            c * self.radius,
            self.base_y + (phase * 2.0).sin() * 0.5,
            s * self.radius,
        )
    }
}

/// Light attenuation applied when a particle claims the shared light.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LightFalloff {
    pub constant: f32,
    pub linear: f32,
}

#[derive(Debug, Clone)]
pub struct Particle {
    position: Vec3,
    orbit: Orbit,
    trail: VecDeque<Vec3>,
    max_trail_len: usize,
    colors: ColorScheme,
}

impl Particle {
    /// Create a particle with a random trail length, color scheme and orbit.
    pub fn new<R: Rng>(config: &SceneConfig, rng: &mut R) -> Self {
        let max_trail_len = rng.gen_range(config.trail_length.clone());
        let colors = PALETTE[rng.gen_range(0..PALETTE.len())];
        let mut particle = Self::with_orbit(Orbit::default(), max_trail_len, colors);
        particle.reset(&config.orbit, rng);
        particle
    }

    /// Create a particle with explicit motion parameters.
    ///
    /// `max_trail_len` is clamped to at least 1.
    pub fn with_orbit(orbit: Orbit, max_trail_len: usize, colors: ColorScheme) -> Self {
        let max_trail_len = max_trail_len.max(1);
        Self {
            position: orbit.position_at(orbit.phase),
            orbit,
            trail: VecDeque::with_capacity(max_trail_len + 1),
            max_trail_len,
            colors,
        }
    }

    /// Re-randomize the orbit.
    ///
    /// The starting position uses its own random angle on the new radius; the orbit takes
    /// over from the first `advance`. The trail and colors are kept.
    pub fn reset<R: Rng>(&mut self, ranges: &OrbitRanges, rng: &mut R) {
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        self.orbit = Orbit::random(ranges, rng);
        let (s, c) = angle.sin_cos();
        self.position = Vec3::new(
            c * self.orbit.radius,
            self.orbit.base_y,
            s * self.orbit.radius,
        );
    }

    /// Step the orbit by one frame and record the new position.
    pub fn advance(&mut self) {
        self.orbit.phase += self.orbit.speed;
        self.position = self.orbit.position_at(self.orbit.phase);

        self.trail.push_back(self.position);
        if self.trail.len() > self.max_trail_len {
            self.trail.pop_front();
        }
    }

    /// Per-vertex trail alpha, 0 at the oldest point rising linearly to 1 at the newest.
    pub fn trail_alphas(&self) -> impl Iterator<Item = f32> + '_ {
        let n = self.trail.len();
        (0..n).map(move |i| if n > 1 { i as f32 / (n - 1) as f32 } else { 1.0 })
    }

    /// Append the trail strip and the core sphere, and claim the shared light.
    pub fn draw(&self, sphere: &Mesh3D, falloff: LightFalloff, out: &mut DrawList) {
        let trail_color = self.colors.trail;
        out.line_strip(
            self.trail
                .iter()
                .zip(self.trail_alphas())
                .map(|(&p, a)| SceneVertex::line(p, trail_color.with_alpha(a), true)),
        );

        out.set_dynamic_light(PointLight {
            position: self.position,
            diffuse: self.colors.core,
            constant_attenuation: falloff.constant,
            linear_attenuation: falloff.linear,
        });

        // `sphere` is a unit-radius template.
        out.triangles.append_placed(
            sphere,
            self.position,
            self.orbit.size,
            self.colors.core,
            false,
        );
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn orbit(&self) -> &Orbit {
        &self.orbit
    }

    #[inline]
    pub fn trail(&self) -> &VecDeque<Vec3> {
        &self.trail
    }

    #[inline]
    pub fn max_trail_len(&self) -> usize {
        self.max_trail_len
    }

    #[inline]
    pub fn colors(&self) -> ColorScheme {
        self.colors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    const EPS: f32 = 1e-4;

    fn fixed(radius: f32, base_y: f32, phase: f32, speed: f32, trail: usize) -> Particle {
        Particle::with_orbit(
            Orbit {
                radius,
                base_y,
                phase,
                speed,
                size: 0.1,
            },
            trail,
            PALETTE[0],
        )
    }

    #[test]
    fn single_step_matches_reference_values() {
        let mut p = fixed(5.0, 1.0, 0.0, 0.02, 20);
        p.advance();
        assert!((p.orbit().phase - 0.02).abs() < 1e-7);
        let pos = p.position();
        assert!((pos.x - 5.0 * 0.02f32.cos()).abs() < EPS);
        assert!((pos.x - 4.999).abs() < 1e-3);
        assert!((pos.y - (1.0 + 0.04f32.sin() * 0.5)).abs() < EPS);
        assert!((pos.z - 0.09999).abs() < EPS);
    }

    #[test]
    fn horizontal_motion_stays_on_circle_and_bob_is_bounded() {
        let mut rng = StdRng::seed_from_u64(7);
        let cfg = SceneConfig::default();
        for _ in 0..10 {
            let mut p = Particle::new(&cfg, &mut rng);
            let o = *p.orbit();
            for _ in 0..500 {
                p.advance();
                let pos = p.position();
                let r2 = pos.x * pos.x + pos.z * pos.z;
                assert!((r2 - o.radius * o.radius).abs() < 1e-3 * o.radius * o.radius);
                assert!((pos.y - o.base_y).abs() <= 0.5 + 1e-6);
            }
        }
    }

    #[test]
    fn trail_is_capped_and_ordered_oldest_first() {
        let mut p = fixed(4.0, 0.0, 0.0, 0.05, 15);
        for step in 1..=100 {
            p.advance();
            assert!(p.trail().len() <= 15);
            assert_eq!(p.trail().len(), step.min(15));
            assert_eq!(*p.trail().back().unwrap(), p.position());
        }
        // Oldest-first means phases increase along the trail.
        let angles: Vec<f32> = p.trail().iter().map(|v| v.z.atan2(v.x)).collect();
        let expected_oldest = 0.05 * (100 - 15 + 1) as f32;
        let (s, c) = expected_oldest.sin_cos();
        assert!((angles[0] - s.atan2(c)).abs() < EPS);
    }

    #[test]
    fn trail_alpha_fades_from_zero_to_one() {
        let mut p = fixed(4.0, 0.0, 0.0, 0.05, 5);
        p.advance();
        assert_eq!(p.trail_alphas().collect::<Vec<_>>(), vec![1.0]);
        for _ in 0..10 {
            p.advance();
        }
        let a: Vec<f32> = p.trail_alphas().collect();
        assert_eq!(a, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn reset_draws_within_ranges() {
        let mut rng = StdRng::seed_from_u64(42);
        let cfg = SceneConfig::default();
        for _ in 0..200 {
            let p = Particle::new(&cfg, &mut rng);
            let o = p.orbit();
            assert!(cfg.orbit.radius.contains(&o.radius));
            assert!(cfg.orbit.base_y.contains(&o.base_y));
            assert!(cfg.orbit.phase.contains(&o.phase));
            assert!(cfg.orbit.speed.contains(&o.speed));
            assert!(cfg.orbit.size.contains(&o.size));
            assert!(cfg.trail_length.contains(&p.max_trail_len()));
            assert!(PALETTE.contains(&p.colors()));

            let pos = p.position();
            let r = (pos.x * pos.x + pos.z * pos.z).sqrt();
            assert!((r - o.radius).abs() < EPS);
            assert_eq!(pos.y, o.base_y);
        }
    }

    #[test]
    fn reset_keeps_trail_and_colors() {
        let mut rng = StdRng::seed_from_u64(3);
        let cfg = SceneConfig::default();
        let mut p = Particle::new(&cfg, &mut rng);
        p.advance();
        p.advance();
        let colors = p.colors();
        p.reset(&cfg.orbit, &mut rng);
        assert_eq!(p.trail().len(), 2);
        assert_eq!(p.colors(), colors);
    }

    #[test]
    fn draw_emits_fading_trail_unlit_core_and_light() {
        let sphere = Mesh3D::uv_sphere(1.0, 8, 8);
        let falloff = LightFalloff {
            constant: 0.1,
            linear: 0.3,
        };
        let mut p = fixed(5.0, 0.0, 0.0, 0.03, 10);
        for _ in 0..4 {
            p.advance();
        }

        let mut dl = DrawList::new();
        p.draw(&sphere, falloff, &mut dl);

        assert_eq!(dl.segment_count(), 3);
        assert_eq!(dl.lines.first().unwrap().color.a, 0.0);
        assert_eq!(dl.lines.last().unwrap().color.a, 1.0);

        assert_eq!(dl.triangles.vertices.len(), sphere.vertices.len());
        for v in &dl.triangles.vertices {
            assert!(!v.lit);
            assert_eq!(v.color, PALETTE[0].core);
            assert!(((v.position - p.position()).length() - 0.1).abs() < EPS);
        }

        let light = dl.dynamic_light.unwrap();
        assert_eq!(light.position, p.position());
        assert_eq!(light.diffuse, PALETTE[0].core);
    }
}
