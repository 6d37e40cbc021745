//! Precise intersection tests for pairs the broad phase found.

use super::{
    collider::Collider,
    shape_shape::{intersection_check, PlacedShape, Tolerances},
};
use crate::{
    math::{self as m, Angle},
    Transform,
};
use hecs::Entity;

/// A collider together with the world-space placement of its shape.
#[derive(Clone, Copy, Debug)]
pub struct PlacedCollider {
    pub entity: Entity,
    pub collider: Collider,
    pub center: m::Vec2,
    pub angle: Angle,
}

impl PlacedCollider {
    pub fn new(entity: Entity, tr: &Transform, collider: &Collider) -> Self {
        Self {
            entity,
            collider: *collider,
            center: collider.center(tr.position),
            angle: tr.angle,
        }
    }

    /// Half extents of the axis-aligned box containing the shape.
    #[inline]
    pub fn half_extents(&self) -> m::Vec2 {
        self.collider.shape.half_extents(self.angle)
    }

    fn placed_shape(&self) -> PlacedShape {
        PlacedShape {
            shape: self.collider.shape,
            center: self.center,
            angle: self.angle,
        }
    }
}

/// Check whether two colliders are allowed to touch at all.
#[inline]
pub fn can_collide(a: &PlacedCollider, b: &PlacedCollider) -> bool {
    a.collider.active
        && b.collider.active
        && a.collider.layer == b.collider.layer
        && !m::has_nan(a.center)
        && !m::has_nan(b.center)
}

/// Check whether the axis-aligned bounding boxes of two colliders overlap.
#[inline]
pub fn aabbs_overlap(a: &PlacedCollider, b: &PlacedCollider) -> bool {
    let d = b.center - a.center;
    let ha = a.half_extents();
    let hb = b.half_extents();
    d.x.abs() <= ha.x + hb.x && d.y.abs() <= ha.y + hb.y
}

/// Test a pair of colliders for intersection.
///
/// Returns the minimum translation vector pointing from `a` towards `b`
/// if they overlap, rejecting cheaply on mismatched layers and disjoint bounds first.
pub fn test_pair(a: &PlacedCollider, b: &PlacedCollider, tol: Tolerances) -> Option<m::Vec2> {
    if !can_collide(a, b) || !aabbs_overlap(a, b) {
        return None;
    }
    intersection_check(&a.placed_shape(), &b.placed_shape(), tol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    fn placed(entity: Entity, x: f64, y: f64, deg: f64, collider: Collider) -> PlacedCollider {
        let tr = Transform::from_position([x, y]).with_angle(deg);
        PlacedCollider::new(entity, &tr, &collider)
    }

    fn two_entities() -> (Entity, Entity) {
        let mut world = hecs::World::new();
        (world.spawn(()), world.spawn(()))
    }

    #[test]
    fn layers_and_activity_gate_the_test() {
        let (e1, e2) = two_entities();
        let a = placed(e1, 0.0, 0.0, 0.0, Collider::new_circle(10.0));
        let b = placed(e2, 5.0, 0.0, 0.0, Collider::new_circle(10.0));
        assert!(test_pair(&a, &b, Tolerances::default()).is_some());

        let other_layer = placed(e2, 5.0, 0.0, 0.0, Collider::new_circle(10.0).with_layer(2));
        assert!(test_pair(&a, &other_layer, Tolerances::default()).is_none());

        let inactive = placed(e2, 5.0, 0.0, 0.0, Collider::new_circle(10.0).with_active(false));
        assert!(test_pair(&a, &inactive, Tolerances::default()).is_none());
    }

    #[test]
    fn nan_centers_never_collide() {
        let (e1, e2) = two_entities();
        let a = placed(e1, f64::NAN, 0.0, 0.0, Collider::new_square(10.0));
        let b = placed(e2, 0.0, 0.0, 0.0, Collider::new_square(10.0));
        assert!(test_pair(&a, &b, Tolerances::default()).is_none());
        assert!(test_pair(&b, &a, Tolerances::default()).is_none());
    }

    #[test]
    fn offset_moves_the_shape() {
        let (e1, e2) = two_entities();
        let a = placed(e1, 0.0, 0.0, 0.0, Collider::new_circle(5.0));
        let b = placed(e2, 30.0, 0.0, 0.0, Collider::new_circle(5.0).with_offset([-22.0, 0.0]));
        let mtv = test_pair(&a, &b, Tolerances::default()).expect("offset should bring b close");
        assert!((mtv - m::Vec2::new(2.0, 0.0)).mag() < 1e-9);
    }

    /// The bounding box early-out must not reject anything the exact test accepts.
    #[test]
    fn aabb_rejection_has_no_false_negatives() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0x5eed);
        let (e1, e2) = two_entities();
        let random_collider = |rng: &mut rand::rngs::StdRng| match rng.gen_range(0..3) {
            0 => Collider::new_circle(rng.gen_range(1.0..20.0)),
            1 => Collider::new_rect(rng.gen_range(1.0..40.0), rng.gen_range(1.0..40.0)),
            _ => Collider::new_triangle(rng.gen_range(1.0..40.0), rng.gen_range(1.0..40.0)),
        };

        let mut overlaps = 0;
        for _ in 0..5000 {
            let a = placed(
                e1,
                0.0,
                0.0,
                rng.gen_range(0.0..360.0),
                random_collider(&mut rng),
            );
            let b = placed(
                e2,
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
                rng.gen_range(0.0..360.0),
                random_collider(&mut rng),
            );
            let exact = intersection_check(&a.placed_shape(), &b.placed_shape(), Tolerances::default());
            if exact.is_some() {
                overlaps += 1;
                assert!(
                    aabbs_overlap(&a, &b),
                    "bounds rejected an overlapping pair: {:?} {:?}",
                    a,
                    b
                );
            }
        }
        // make sure the test actually exercised overlapping pairs
        assert!(overlaps > 100);
    }
}
