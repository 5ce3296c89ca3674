//! Renderer-agnostic scene types.
//!
//! Every frame the driver rebuilds a `DrawList` from scratch: text strokes and particle
//! trails become line segments, particle cores become triangles, and the shared dynamic
//! light is whatever the last particle wrote. The GPU side only ever sees this flattened
//! list plus a `Camera3D`.
//!
//! Notes:
//! - This module does not depend on wgpu; vertex packing happens in `render::primitives`.
//! - World space is right-handed, +Y up, the text sits on the XY plane at the origin.

use glam::{Mat4, Vec3};

/// Simple RGBA color (linear space assumed; the renderer targets an sRGB view).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    #[inline]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Perspective camera orbiting the origin.
///
/// The eye moves on a horizontal circle of radius `distance` at height `height`, always
/// looking at the origin with +Y up.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera3D {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_rad: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for Camera3D {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 3.0, 10.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y_rad: 45f32.to_radians(),
            z_near: 0.1,
            z_far: 50.0,
        }
    }
}

impl Camera3D {
    /// Place the eye for rotation tick `rotation`.
    ///
    /// `eye = (sin(rotation*rate)*distance, height, cos(rotation*rate)*distance)`
    pub fn orbiting(rotation: u64, distance: f32, height: f32, rate: f32) -> Self {
        // Go through f64 so the angle stays precise after long runs.
        let angle = (rotation as f64 * rate as f64) as f32;
        let (s, c) = angle.sin_cos();
        Self {
            eye: Vec3::new(s * distance, height, c * distance),
            ..Default::default()
        }
    }

    #[inline]
    pub fn with_projection(mut self, fov_y_rad: f32, z_near: f32, z_far: f32) -> Self {
        self.fov_y_rad = fov_y_rad;
        self.z_near = z_near;
        self.z_far = z_far;
        self
    }

    /// World -> eye transform.
    #[inline]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Eye -> clip transform (wgpu depth range 0..1).
    #[inline]
    pub fn projection(&self, aspect: f32) -> Mat4 {
        let aspect = if aspect.is_finite() && aspect > 0.0 {
            aspect
        } else {
            1.0
        };
        Mat4::perspective_rh(self.fov_y_rad, aspect, self.z_near, self.z_far)
    }

    #[inline]
    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view()
    }
}

/// The one dynamic point light slot shared by every particle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointLight {
    /// World-space position.
    pub position: Vec3,
    pub diffuse: Rgba,
    pub constant_attenuation: f32,
    pub linear_attenuation: f32,
}

/// One CPU-side vertex.
///
/// `normal == Vec3::ZERO` means "no surface orientation" (lines); the shader treats such
/// vertices as fully facing every light.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SceneVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub color: Rgba,
    pub lit: bool,
}

impl SceneVertex {
    #[inline]
    pub fn line(position: Vec3, color: Rgba, lit: bool) -> Self {
        Self {
            position,
            normal: Vec3::ZERO,
            color,
            lit,
        }
    }
}

/// Indexed triangle mesh.
#[derive(Debug, Clone, Default)]
pub struct Mesh3D {
    pub vertices: Vec<SceneVertex>,
    pub indices: Vec<u32>,
}

impl Mesh3D {
    #[inline]
    pub fn with_capacity(v: usize, i: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(v),
            indices: Vec::with_capacity(i),
        }
    }

    /// Append `other` scaled by `scale` and moved to `offset`, overriding color and
    /// lighting. Indices are offset automatically.
    pub fn append_placed(
        &mut self,
        other: &Mesh3D,
        offset: Vec3,
        scale: f32,
        color: Rgba,
        lit: bool,
    ) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(other.vertices.iter().map(|v| SceneVertex {
            position: offset + v.position * scale,
            normal: v.normal,
            color,
            lit,
        }));
        self.indices
            .extend(other.indices.iter().copied().map(|idx| base + idx));
    }

    /// UV sphere centered at the origin, built from `stacks` latitude bands.
    ///
    /// Each band is a strip of `slices + 1` vertex pairs (lower ring, upper ring); every
    /// quad in the strip becomes two triangles. Normals are the outward unit directions.
    /// Vertices are white and lit; callers recolor via `append_placed`.
    pub fn uv_sphere(radius: f32, slices: u32, stacks: u32) -> Self {
        use std::f32::consts::{PI, TAU};

        let slices = slices.max(3);
        let stacks = stacks.max(2);
        let ring = (slices + 1) as usize;
        let mut mesh =
            Self::with_capacity(stacks as usize * ring * 2, (stacks * slices * 6) as usize);

        for i in 0..stacks {
            let lat0 = PI * (-0.5 + i as f32 / stacks as f32);
            let lat1 = PI * (-0.5 + (i + 1) as f32 / stacks as f32);
            let (z0, zr0) = lat0.sin_cos();
            let (z1, zr1) = lat1.sin_cos();

            let band_base = mesh.vertices.len() as u32;
            for j in 0..=slices {
                let lng = TAU * j as f32 / slices as f32;
                let (y, x) = lng.sin_cos();

                for (z, zr) in [(z0, zr0), (z1, zr1)] {
                    let n = Vec3::new(x * zr, y * zr, z);
                    mesh.vertices.push(SceneVertex {
                        position: n * radius,
                        normal: n,
                        color: Rgba::WHITE,
                        lit: true,
                    });
                }
            }

            // Strip vertex k: lower ring at 2k, upper ring at 2k+1.
            for j in 0..slices {
                let a = band_base + 2 * j;
                let b = a + 1;
                let c = a + 2;
                let d = a + 3;
                mesh.indices.extend_from_slice(&[a, c, b, b, c, d]);
            }
        }

        mesh
    }
}

/// Everything drawn in one frame.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    /// Line segments as vertex pairs.
    pub lines: Vec<SceneVertex>,
    pub triangles: Mesh3D,
    /// Shared dynamic light slot; the last writer wins.
    pub dynamic_light: Option<PointLight>,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.lines.clear();
        self.triangles.vertices.clear();
        self.triangles.indices.clear();
        self.dynamic_light = None;
    }

    /// Append one segment.
    #[inline]
    pub fn line(&mut self, a: SceneVertex, b: SceneVertex) {
        self.lines.push(a);
        self.lines.push(b);
    }

    /// Append a connected strip; fewer than two vertices draw nothing.
    pub fn line_strip<I>(&mut self, vertices: I)
    where
        I: IntoIterator<Item = SceneVertex>,
    {
        let mut prev: Option<SceneVertex> = None;
        for v in vertices {
            if let Some(p) = prev {
                self.line(p, v);
            }
            prev = Some(v);
        }
    }

    #[inline]
    pub fn set_dynamic_light(&mut self, light: PointLight) {
        self.dynamic_light = Some(light);
    }

    #[inline]
    pub fn segment_count(&self) -> usize {
        self.lines.len() / 2
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.triangles.indices.is_empty()
    }
}
