//! GPU-side vertex and uniform layouts.
//!
//! Coordinate convention:
//! - Vertex positions and normals are in world space.
//! - `SceneUniforms::view` maps world -> eye space (where lighting happens),
//!   `SceneUniforms::view_proj` maps world -> clip space.
//!
//! Everything is `#[repr(C)]` + `bytemuck::Pod` so it can be uploaded with
//! `Queue::write_buffer` directly. Uniform members are all `vec4`/`mat4` sized, so the
//! Rust layout matches WGSL uniform alignment rules without manual padding.

use std::mem;

use glam::{Vec3, Vec4};

use crate::config::LightingConfig;
use crate::scene::{Camera3D, PointLight, SceneVertex};

/// Vertex with position, normal, color and a lit flag (1.0 lit, 0.0 unlit).
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
    pub lit: f32,
}

impl GpuVertex {
    pub const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x4,
        3 => Float32
    ];

    #[inline]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<GpuVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

impl From<&SceneVertex> for GpuVertex {
    #[inline]
    fn from(v: &SceneVertex) -> Self {
        Self {
            position: v.position.to_array(),
            normal: v.normal.to_array(),
            color: v.color.to_array(),
            lit: if v.lit { 1.0 } else { 0.0 },
        }
    }
}

/// Per-frame uniforms.
///
/// Light positions are pre-transformed into eye space on the CPU.
/// - `key_*`: fixed light that rides with the camera
/// - `point_*`: shared dynamic light (`point_position.w == 0` disables it)
/// - `point_attenuation`: (constant, linear, quadratic, unused)
/// - `ambient.x`: global ambient term
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniforms {
    pub view: [[f32; 4]; 4],
    pub view_proj: [[f32; 4]; 4],
    pub ambient: [f32; 4],
    pub key_position: [f32; 4],
    pub key_ambient: [f32; 4],
    pub key_diffuse: [f32; 4],
    pub point_position: [f32; 4],
    pub point_diffuse: [f32; 4],
    pub point_attenuation: [f32; 4],
}

impl SceneUniforms {
    pub fn new(
        camera: &Camera3D,
        aspect: f32,
        lighting: &LightingConfig,
        point: Option<&PointLight>,
    ) -> Self {
        let view = camera.view();
        let view_proj = camera.view_proj(aspect);

        let splat = |v: f32| [v, v, v, 1.0];
        let [kx, ky, kz] = lighting.key_position_eye;

        let (point_position, point_diffuse, point_attenuation) = match point {
            Some(p) => {
                let eye = view.transform_point3(p.position);
                (
                    Vec4::from((eye, 1.0)).to_array(),
                    p.diffuse.to_array(),
                    [p.constant_attenuation, p.linear_attenuation, 0.0, 0.0],
                )
            }
            None => ([0.0; 4], [0.0; 4], [1.0, 0.0, 0.0, 0.0]),
        };

        Self {
            view: view.to_cols_array_2d(),
            view_proj: view_proj.to_cols_array_2d(),
            ambient: [lighting.global_ambient, 0.0, 0.0, 0.0],
            key_position: Vec4::from((Vec3::new(kx, ky, kz), 1.0)).to_array(),
            key_ambient: splat(lighting.key_ambient),
            key_diffuse: splat(lighting.key_diffuse),
            point_position,
            point_diffuse,
            point_attenuation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Rgba;

    #[test]
    fn vertex_stride_matches_attributes() {
        assert_eq!(mem::size_of::<GpuVertex>(), (3 + 3 + 4 + 1) * 4);
        assert_eq!(GpuVertex::ATTRS[3].offset, (3 + 3 + 4) * 4);
    }

    #[test]
    fn uniforms_are_vec4_aligned() {
        assert_eq!(mem::size_of::<SceneUniforms>() % 16, 0);
    }

    #[test]
    fn lit_flag_is_packed_as_float() {
        let v = SceneVertex::line(Vec3::ONE, Rgba::WHITE, false);
        assert_eq!(GpuVertex::from(&v).lit, 0.0);
        let v = SceneVertex { lit: true, ..v };
        assert_eq!(GpuVertex::from(&v).lit, 1.0);
    }

    #[test]
    fn point_light_is_moved_into_eye_space() {
        let camera = Camera3D::default();
        let light = PointLight {
            position: Vec3::ZERO,
            diffuse: Rgba::WHITE,
            constant_attenuation: 0.1,
            linear_attenuation: 0.3,
        };
        let u = SceneUniforms::new(&camera, 1.0, &LightingConfig::default(), Some(&light));
        // The origin sits straight ahead of the default camera.
        let [x, y, z, w] = u.point_position;
        let dist = camera.eye.length();
        assert!(x.abs() < 1e-4 && y.abs() < 1e-4);
        assert!((z + dist).abs() < 1e-4);
        assert_eq!(w, 1.0);
        assert_eq!(u.point_attenuation[..2], [0.1, 0.3]);
    }

    #[test]
    fn missing_point_light_is_disabled() {
        let u = SceneUniforms::new(&Camera3D::default(), 1.0, &LightingConfig::default(), None);
        assert_eq!(u.point_position[3], 0.0);
        assert_eq!(u.point_diffuse, [0.0; 4]);
    }
}
