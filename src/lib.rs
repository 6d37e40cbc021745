//! Per-tick 2D collision detection and response for [`hecs`] worlds.
//!
//! Colliders are circles, rotated rectangles and triangles attached to entities
//! with a [`Transform`]. A [`CollisionPipeline`] finds candidate pairs with a uniform
//! spatial hash, tests them with the separating axis theorem,
//! pushes overlapping bodies apart with mass-weighted impulses
//! and reports every overlap as a [`CollisionEvent`] that lives for one tick.

/// Open a tracy profiler span that ends when the returned value is dropped.
/// Does nothing unless the `tracy` feature is enabled and a profiler is connected.
macro_rules! tracy_span {
    ($name:expr, $fn_name:expr) => {
        tracy_client::Client::running()
            .map(|client| client.span_alloc(Some($name), $fn_name, file!(), line!(), 0))
    };
}

pub mod math;
pub use math::{uv, Angle, Vec2};

pub mod transform;
pub use transform::Transform;

pub mod physics;
pub use physics::{
    body::{Gravity, Mass, Velocity},
    collision::{
        self, Collider, ColliderShape, CollisionEvent, EventBuffer, Footprint, PhysicsMaterial,
        SpatialGrid,
    },
    CollisionPipeline, ConfigError, PipelineConfig, TickStats,
};

// Re-exported to guarantee versions match
pub use hecs;
