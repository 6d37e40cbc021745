use crate::math::{self as m, Angle};

/// Maximum number of vertices a polygonal collider shape can have.
pub const COLLIDER_MAX_VERTS: usize = 4;

/// A component that allows an entity to collide with others.
/// Note that a [`Transform`][crate::Transform] component must also be present.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
pub struct Collider {
    pub shape: ColliderShape,
    /// Static colliders without a [`Mass`][crate::Mass] component are immovable.
    pub is_static: bool,
    /// Triggers produce collision events but are never pushed apart.
    pub is_trigger: bool,
    /// Inactive colliders are ignored entirely.
    pub active: bool,
    /// Colliders only collide with others on the same layer.
    pub layer: i32,
    /// Offset of the shape's center from the entity's position.
    pub offset: m::Vec2,
}

/// The physical shape of a collider.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
pub enum ColliderShape {
    Circle {
        r: f64,
    },
    /// The rect collider stores its side lengths halved because this makes
    /// intersection tests easier.
    Rect {
        hw: f64,
        hh: f64,
    },
    /// An isosceles triangle with its apex pointing towards -y
    /// and its base at +y, bounded by a `2hw` by `2hh` box.
    Triangle {
        hw: f64,
        hh: f64,
    },
}

impl Default for Collider {
    fn default() -> Self {
        Self {
            shape: ColliderShape::Rect { hw: 0.0, hh: 0.0 },
            is_static: false,
            is_trigger: false,
            active: true,
            layer: 1,
            offset: m::Vec2::zero(),
        }
    }
}

impl Collider {
    fn with_shape(shape: ColliderShape) -> Self {
        Self {
            shape,
            ..Self::default()
        }
    }

    /// Create a circle collider from a radius.
    pub fn new_circle(radius: f64) -> Self {
        Self::with_shape(ColliderShape::Circle { r: radius })
    }

    /// Create a rect collider with both sides set to the same length.
    pub fn new_square(side_length: f64) -> Self {
        Self::new_rect(side_length, side_length)
    }

    /// Create a rect collider with two different side lengths.
    pub fn new_rect(width: f64, height: f64) -> Self {
        Self::with_shape(ColliderShape::Rect {
            hw: width / 2.0,
            hh: height / 2.0,
        })
    }

    /// Create a triangle collider fitting in a box of the given size.
    pub fn new_triangle(width: f64, height: f64) -> Self {
        Self::with_shape(ColliderShape::Triangle {
            hw: width / 2.0,
            hh: height / 2.0,
        })
    }

    /// Make this collider immovable unless it has an explicit [`Mass`][crate::Mass].
    pub fn make_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Make this collider a trigger that only reports overlaps.
    pub fn make_trigger(mut self) -> Self {
        self.is_trigger = true;
        self
    }

    pub fn with_layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_offset(mut self, offset: impl Into<[f64; 2]>) -> Self {
        let [x, y] = offset.into();
        self.offset = m::Vec2::new(x, y);
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn width(&self) -> f64 {
        self.shape.half_extents_local().x * 2.0
    }

    pub fn height(&self) -> f64 {
        self.shape.half_extents_local().y * 2.0
    }

    /// Radius of a circle collider, zero for other shapes.
    pub fn radius(&self) -> f64 {
        match self.shape {
            ColliderShape::Circle { r } => r,
            _ => 0.0,
        }
    }

    /// World-space center of the collider's shape.
    #[inline]
    pub fn center(&self, position: m::Vec2) -> m::Vec2 {
        position + self.offset
    }
}

impl ColliderShape {
    /// Radius of a circle centered on the shape that contains the whole shape.
    pub fn bounding_radius(&self) -> f64 {
        match *self {
            ColliderShape::Circle { r } => r,
            ColliderShape::Rect { hw, hh } | ColliderShape::Triangle { hw, hh } => {
                (hw * hw + hh * hh).sqrt()
            }
        }
    }

    /// Half extents of the shape's axis-aligned bounds before rotation.
    pub fn half_extents_local(&self) -> m::Vec2 {
        match *self {
            ColliderShape::Circle { r } => m::Vec2::new(r, r),
            ColliderShape::Rect { hw, hh } | ColliderShape::Triangle { hw, hh } => {
                m::Vec2::new(hw, hh)
            }
        }
    }

    /// Half extents of the shape's axis-aligned bounds after rotating by `angle`.
    ///
    /// Equal to [`half_extents_local`][Self::half_extents_local] when unrotated,
    /// otherwise the bounds of the rotated vertices.
    pub fn half_extents(&self, angle: Angle) -> m::Vec2 {
        if matches!(self, ColliderShape::Circle { .. }) || angle.rad() == 0.0 {
            return self.half_extents_local();
        }
        let verts = self.vertices(m::Vec2::zero(), angle);
        verts
            .iter()
            .fold(m::Vec2::zero(), |acc, v| {
                m::Vec2::new(acc.x.max(v.x.abs()), acc.y.max(v.y.abs()))
            })
    }

    /// Vertices of a polygonal shape centered at `center` and rotated by `angle`.
    /// Empty for circles.
    pub fn vertices(&self, center: m::Vec2, angle: Angle) -> PolyVerts {
        let (locals, count) = match *self {
            ColliderShape::Circle { .. } => ([[0.0; 2]; COLLIDER_MAX_VERTS], 0),
            ColliderShape::Rect { hw, hh } => ([[-hw, -hh], [hw, -hh], [hw, hh], [-hw, hh]], 4),
            ColliderShape::Triangle { hw, hh } => {
                ([[0.0, -hh], [-hw, hh], [hw, hh], [0.0, 0.0]], 3)
            }
        };
        let mut verts = PolyVerts::default();
        for &[x, y] in &locals[..count] {
            verts.push(center + m::rotate(m::Vec2::new(x, y), angle));
        }
        verts
    }
}

/// A fixed-capacity list of polygon vertices in winding order.
#[derive(Clone, Copy, Debug, Default)]
pub struct PolyVerts {
    data: [m::Vec2; COLLIDER_MAX_VERTS],
    count: usize,
}

impl PolyVerts {
    #[inline]
    fn push(&mut self, v: m::Vec2) {
        self.data[self.count] = v;
        self.count += 1;
    }

    #[inline]
    pub fn as_slice(&self) -> &[m::Vec2] {
        &self.data[..self.count]
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, m::Vec2> {
        self.as_slice().iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl std::ops::Deref for PolyVerts {
    type Target = [m::Vec2];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

/// Surface properties affecting collision response.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-types", serde(default))]
pub struct PhysicsMaterial {
    /// Coefficient of restitution, 0 for no bounce and 1 for a perfect bounce.
    pub restitution: f64,
    /// Not used by the resolver yet.
    pub friction: f64,
}

impl Default for PhysicsMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.3,
            friction: 0.3,
        }
    }
}

impl PhysicsMaterial {
    pub fn with_restitution(restitution: f64) -> Self {
        Self {
            restitution,
            ..Self::default()
        }
    }
}
