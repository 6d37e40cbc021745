use crate::math as m;

/// Linear velocity of an entity.
///
/// Entities with a velocity are moved by it every tick
/// and have it changed by collision impulses.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-types", serde(default))]
pub struct Velocity {
    pub linear: m::Vec2,
    /// A frozen velocity doesn't move its entity or receive gravity,
    /// but the entity still collides.
    pub freeze: bool,
}

impl Velocity {
    #[inline]
    pub fn new(linear: impl Into<[f64; 2]>) -> Self {
        let [x, y] = linear.into();
        Self {
            linear: m::Vec2::new(x, y),
            freeze: false,
        }
    }

    #[inline]
    pub fn frozen(mut self) -> Self {
        self.freeze = true;
        self
    }
}

/// Mass of an entity, stored together with its inverse.
///
/// Zero or negative mass means infinite mass, i.e. an inverse of zero.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
pub struct Mass {
    pub mass: f64,
    pub inverse: f64,
}

impl Mass {
    #[inline]
    pub fn new(mass: f64) -> Self {
        Self {
            mass,
            inverse: if mass > 0.0 { 1.0 / mass } else { 0.0 },
        }
    }

    #[inline]
    pub fn is_infinite(&self) -> bool {
        self.inverse == 0.0
    }
}

impl Default for Mass {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl From<f64> for Mass {
    #[inline]
    fn from(mass: f64) -> Self {
        Self::new(mass)
    }
}

/// Constant downward (+y) acceleration applied to an entity's [`Velocity`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-types", serde(default))]
pub struct Gravity {
    pub acceleration: f64,
    pub enabled: bool,
}

impl Default for Gravity {
    fn default() -> Self {
        Self {
            acceleration: 9.81,
            enabled: true,
        }
    }
}

impl Gravity {
    pub fn new(acceleration: f64) -> Self {
        Self {
            acceleration,
            enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonpositive_mass_is_infinite() {
        assert_eq!(Mass::new(4.0).inverse, 0.25);
        assert!(Mass::new(0.0).is_infinite());
        assert!(Mass::new(-2.0).is_infinite());
        assert!(!Mass::default().is_infinite());
    }

    #[test]
    fn gravity_defaults() {
        let g = Gravity::default();
        assert_eq!(g.acceleration, 9.81);
        assert!(g.enabled);
    }
}
