mod collider;
pub use collider::{Collider, ColliderShape, PhysicsMaterial, PolyVerts, COLLIDER_MAX_VERTS};

mod events;
pub use events::{CollisionEvent, EventBuffer};

pub mod grid;
pub use grid::{cell_key, Footprint, SpatialGrid};

pub mod narrowphase;
pub use narrowphase::PlacedCollider;

mod pairs;
pub use pairs::{pair_key, PairSet};

pub mod shape_shape;
pub use shape_shape::{intersection_check, PlacedShape, Tolerances};
