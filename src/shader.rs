//! WGSL source and the uniform layouts it expects.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::body::{RenderHandle, Shading};
use crate::lighting::FrameLighting;

pub const BODY_SHADER: &str = include_str!("shaders/body.wgsl");

/// Per-frame uniforms, bound at group 0.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct Globals {
    pub view_proj: [[f32; 4]; 4],
    pub light_pos: [f32; 4],
    pub view_pos: [f32; 4],
    /// constant, linear, quadratic, ambient
    pub attenuation: [f32; 4],
    /// specular strength, shininess
    pub material: [f32; 4],
}

impl Globals {
    pub fn new(view_proj: Mat4, lighting: &FrameLighting) -> Self {
        let att = &lighting.attenuation;
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            light_pos: lighting.light_position.extend(1.0).to_array(),
            view_pos: lighting.view_position.extend(1.0).to_array(),
            attenuation: [att.constant, att.linear, att.quadratic, lighting.ambient],
            material: [lighting.specular, lighting.shininess, 0.0, 0.0],
        }
    }
}

/// Per-body uniforms, bound at group 1 with the body's texture.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct BodyUniforms {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub tint: [f32; 4],
    /// rgb emission, w = 1.0 for emissive bodies
    pub emission: [f32; 4],
}

impl BodyUniforms {
    pub fn new(model: Mat4, render: &RenderHandle, shading: Shading) -> Self {
        // Zero scale has no inverse; any finite matrix will do since
        // the body covers no pixels.
        let normal = Some(model)
            .filter(|m| m.determinant() != 0.0)
            .map(|m| m.inverse().transpose())
            .filter(Mat4::is_finite)
            .unwrap_or(Mat4::IDENTITY);
        let emission = match shading {
            Shading::Emissive(color) => color.extend(1.0),
            Shading::Lit => glam::Vec4::ZERO,
        };
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: normal.to_cols_array_2d(),
            tint: render.tint.extend(1.0).to_array(),
            emission: emission.to_array(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    /// Validates WGSL code using naga.
    fn validate_wgsl(code: &str) -> Result<(), String> {
        let module = naga::front::wgsl::parse_str(code)
            .map_err(|e| format!("WGSL parse error: {:?}", e))?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .map_err(|e| format!("WGSL validation error: {:?}", e))?;

        Ok(())
    }

    #[test]
    fn test_body_shader_is_valid() {
        validate_wgsl(BODY_SHADER).unwrap();
    }

    #[test]
    fn test_uniform_sizes_match_wgsl() {
        assert_eq!(std::mem::size_of::<Globals>(), 128);
        assert_eq!(std::mem::size_of::<BodyUniforms>(), 160);
    }

    #[test]
    fn test_emissive_flag() {
        let render = RenderHandle::default();
        let star = BodyUniforms::new(Mat4::IDENTITY, &render, Shading::Emissive(Vec3::new(1.0, 1.0, 0.0)));
        assert_eq!(star.emission, [1.0, 1.0, 0.0, 1.0]);

        let planet = BodyUniforms::new(Mat4::IDENTITY, &render, Shading::Lit);
        assert_eq!(planet.emission[3], 0.0);
    }

    #[test]
    fn test_zero_scale_normal_matrix_is_finite() {
        let model = Mat4::from_scale(Vec3::ZERO);
        let uniforms = BodyUniforms::new(model, &RenderHandle::default(), Shading::Lit);
        assert!(uniforms.normal_matrix.iter().flatten().all(|v| v.is_finite()));
    }
}
