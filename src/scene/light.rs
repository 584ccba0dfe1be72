use glam::Vec3;

use crate::math::Color;

/// Light source; lights live beside the node tree, not inside it
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient {
        color: Color,
        intensity: f32,
    },
    /// Parallel rays shining from `position` toward the origin
    Directional {
        color: Color,
        intensity: f32,
        position: Vec3,
    },
    /// `distance` of zero means unlimited range
    Point {
        color: Color,
        intensity: f32,
        position: Vec3,
        distance: f32,
        decay: f32,
    },
}

impl Light {
    pub fn ambient(color: Color, intensity: f32) -> Self {
        Light::Ambient {
            color,
            intensity,
        }
    }

    pub fn directional(color: Color, intensity: f32, position: Vec3) -> Self {
        Light::Directional {
            color,
            intensity,
            position,
        }
    }

    pub fn point(color: Color, intensity: f32, position: Vec3) -> Self {
        Light::Point {
            color,
            intensity,
            position,
            distance: 0.0,
            decay: 1.0,
        }
    }

    /// Limit a point light's range; no effect on other kinds
    pub fn with_range(self, range: f32, falloff: f32) -> Self {
        match self {
            Light::Point {
                color,
                intensity,
                position,
                ..
            } => Light::Point {
                color,
                intensity,
                position,
                distance: range,
                decay: falloff,
            },
            other => other,
        }
    }

    pub fn is_ambient(&self) -> bool {
        matches!(self, Light::Ambient { .. })
    }

    /// Colour premultiplied by intensity
    pub fn radiance(&self) -> Color {
        match *self {
            Light::Ambient { color, intensity }
            | Light::Directional { color, intensity, .. }
            | Light::Point { color, intensity, .. } => color.scaled(intensity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radiance_scales_color() {
        let light = Light::point(Color::from_hex(0xffffff), 2.0, Vec3::ZERO);
        assert_eq!(light.radiance().to_array(), [2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_with_range_only_affects_point_lights() {
        let point = Light::point(Color::from_hex(0xffffff), 1.0, Vec3::ZERO).with_range(10.0, 2.0);
        assert!(matches!(
            point,
            Light::Point { distance, decay, .. } if distance == 10.0 && decay == 2.0
        ));

        let ambient = Light::ambient(Color::from_hex(0x555555), 1.0);
        assert_eq!(ambient.with_range(10.0, 2.0), ambient);
        assert!(ambient.is_ambient());
    }
}
