use crate::math::{self as m, Angle};

/// Position, draw layer, rotation and scale of an entity.
///
/// Only `position` and `angle` matter for collision.
/// Rotation is applied about the collider's center, that is, `position` plus the collider offset.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-types", serde(default))]
pub struct Transform {
    pub position: m::Vec2,
    /// Z-order for drawing. Unrelated to the collision layer of a [`Collider`][crate::Collider].
    pub layer: f64,
    pub angle: Angle,
    pub scale: m::Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: m::Vec2::zero(),
            layer: 0.0,
            angle: Angle::default(),
            scale: m::Vec2::one(),
        }
    }
}

impl Transform {
    #[inline]
    pub fn from_position(pos: impl Into<[f64; 2]>) -> Self {
        let [x, y] = pos.into();
        Self {
            position: m::Vec2::new(x, y),
            ..Self::default()
        }
    }

    #[inline]
    pub fn with_angle(mut self, angle: impl Into<Angle>) -> Self {
        self.angle = angle.into();
        self
    }

    #[inline]
    pub fn with_layer(mut self, layer: f64) -> Self {
        self.layer = layer;
        self
    }

    #[inline]
    pub fn with_scale(mut self, scale: impl Into<[f64; 2]>) -> Self {
        let [x, y] = scale.into();
        self.scale = m::Vec2::new(x, y);
        self
    }
}

impl From<m::Vec2> for Transform {
    fn from(pos: m::Vec2) -> Self {
        Self {
            position: pos,
            ..Self::default()
        }
    }
}
