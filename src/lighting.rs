//! Point-light parameters shared by every lit body.
//!
//! The star is the only light. Its intensity falls off with distance as
//! `1 / (constant + linear * d + quadratic * d²)`, where the quadratic term
//! is derived from a falloff radius: the distance at which the quadratic
//! term alone reaches one.

use glam::Vec3;

use crate::error::SceneError;

/// Distance attenuation constants for the star's light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Attenuation {
    /// Build attenuation constants from a falloff radius.
    ///
    /// The radius and the constant term must be finite and strictly
    /// positive, and the linear term finite and non-negative, so the
    /// shader never divides by zero, even at the light's own position.
    pub fn from_falloff_radius(constant: f32, linear: f32, radius: f32) -> Result<Self, SceneError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(SceneError::InvalidFalloffRadius(radius));
        }
        if !constant.is_finite() || constant <= 0.0 {
            return Err(SceneError::InvalidParameter {
                body: "lighting".into(),
                field: "attenuation constant",
                value: constant,
            });
        }
        if !linear.is_finite() || linear < 0.0 {
            return Err(SceneError::InvalidParameter {
                body: "lighting".into(),
                field: "attenuation linear",
                value: linear,
            });
        }
        Ok(Self {
            constant,
            linear,
            quadratic: 1.0 / (radius * radius),
        })
    }

    /// Light intensity factor at distance `d`.
    pub fn factor(&self, d: f32) -> f32 {
        1.0 / (self.constant + self.linear * d + self.quadratic * d * d)
    }
}

impl Default for Attenuation {
    fn default() -> Self {
        Self {
            constant: 1.0,
            linear: 0.00045,
            quadratic: 1.0 / (60.0 * 60.0),
        }
    }
}

/// Scene-wide lighting configuration, fixed after the scene is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub attenuation: Attenuation,
    /// Ambient term added to every lit body.
    pub ambient: f32,
    /// Strength of specular highlights.
    pub specular: f32,
    /// Phong exponent.
    pub shininess: f32,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            attenuation: Attenuation::default(),
            ambient: 0.05,
            specular: 0.3,
            shininess: 32.0,
        }
    }
}

/// Lighting state for one frame, handed to the renderer before any draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameLighting {
    /// World position of the star.
    pub light_position: Vec3,
    /// World position of the camera.
    pub view_position: Vec3,
    pub attenuation: Attenuation,
    pub ambient: f32,
    pub specular: f32,
    pub shininess: f32,
}

impl FrameLighting {
    pub fn new(lighting: &Lighting, light_position: Vec3, view_position: Vec3) -> Self {
        Self {
            light_position,
            view_position,
            attenuation: lighting.attenuation,
            ambient: lighting.ambient,
            specular: lighting.specular,
            shininess: lighting.shininess,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadratic_from_radius() {
        let att = Attenuation::from_falloff_radius(1.0, 0.00045, 60.0).unwrap();
        assert!((att.quadratic - 1.0 / 3600.0).abs() < 1e-9);
        assert_eq!(att, Attenuation::default());
    }

    #[test]
    fn test_rejects_zero_radius() {
        assert!(matches!(
            Attenuation::from_falloff_radius(1.0, 0.0, 0.0),
            Err(SceneError::InvalidFalloffRadius(_))
        ));
        assert!(Attenuation::from_falloff_radius(1.0, 0.0, -5.0).is_err());
        assert!(Attenuation::from_falloff_radius(1.0, 0.0, f32::INFINITY).is_err());
        assert!(Attenuation::from_falloff_radius(1.0, 0.0, f32::NAN).is_err());
    }

    #[test]
    fn test_rejects_negative_terms() {
        assert!(Attenuation::from_falloff_radius(-1.0, 0.0, 10.0).is_err());
        assert!(Attenuation::from_falloff_radius(1.0, f32::NAN, 10.0).is_err());
    }

    #[test]
    fn test_rejects_zero_constant() {
        for linear in [0.0, 0.5] {
            match Attenuation::from_falloff_radius(0.0, linear, 10.0) {
                Err(SceneError::InvalidParameter { field, value, .. }) => {
                    assert_eq!(field, "attenuation constant");
                    assert_eq!(value, 0.0);
                }
                other => panic!("expected InvalidParameter, got {:?}", other),
            }
        }
        let att = Attenuation::from_falloff_radius(0.1, 0.0, 10.0).unwrap();
        assert!(att.factor(0.0).is_finite());
    }

    #[test]
    fn test_factor_falls_off() {
        let att = Attenuation::default();
        assert_eq!(att.factor(0.0), 1.0);
        assert!(att.factor(60.0) < 0.51);
        assert!(att.factor(120.0) < att.factor(60.0));
    }
}
