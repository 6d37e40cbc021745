//! Collision response: pushing overlapping bodies apart and bouncing them off each other.

use super::{body::Mass, Velocity};
use crate::{
    math as m,
    physics::{collision::Collider, PhysicsMaterial, PipelineConfig},
    Transform,
};
use hecs::{Entity, World};

/// The parts of an entity the resolver reads, copied out of the world.
#[derive(Clone, Copy, Debug)]
struct BodyState {
    inv_mass: f64,
    velocity: Option<Velocity>,
    restitution: Option<f64>,
}

impl BodyState {
    fn read(world: &World, entity: Entity) -> Option<Self> {
        let is_static = world.get::<&Collider>(entity).ok()?.is_static;
        let inv_mass = match world.get::<&Mass>(entity) {
            Ok(mass) => mass.inverse,
            Err(_) if is_static => 0.0,
            Err(_) => 1.0,
        };
        Some(Self {
            inv_mass,
            velocity: world.get::<&Velocity>(entity).ok().map(|v| *v),
            restitution: world
                .get::<&PhysicsMaterial>(entity)
                .ok()
                .map(|mat| mat.restitution),
        })
    }
}

/// Separate two overlapping entities and apply a collision impulse to their velocities.
///
/// `mtv` is the minimum translation vector pointing from `a` towards `b`.
/// Returns false if neither entity could be moved, in which case nothing was changed.
pub fn resolve(
    world: &mut World,
    a: Entity,
    b: Entity,
    mtv: m::Vec2,
    cfg: &PipelineConfig,
) -> bool {
    let (state_a, state_b) = match (BodyState::read(world, a), BodyState::read(world, b)) {
        (Some(sa), Some(sb)) => (sa, sb),
        _ => {
            log::trace!("resolve: {:?} or {:?} has no collider anymore", a, b);
            return false;
        }
    };

    let inv_sum = state_a.inv_mass + state_b.inv_mass;
    if inv_sum == 0.0 {
        return false;
    }

    //
    // positional correction
    //

    let share_a = state_a.inv_mass / inv_sum;
    let share_b = state_b.inv_mass / inv_sum;
    if let Ok(mut tr) = world.get::<&mut Transform>(a) {
        tr.position -= mtv * share_a;
    }
    if let Ok(mut tr) = world.get::<&mut Transform>(b) {
        tr.position += mtv * share_b;
    }

    //
    // impulse
    //

    let normal = m::normalize_or_zero(mtv, cfg.degenerate_eps);
    if m::is_degenerate(normal, cfg.degenerate_eps) {
        return true;
    }

    let vel_a = state_a.velocity.map_or(m::Vec2::zero(), |v| v.linear);
    let vel_b = state_b.velocity.map_or(m::Vec2::zero(), |v| v.linear);
    let normal_vel = (vel_b - vel_a).dot(normal);
    // already separating
    if normal_vel > 0.0 {
        return true;
    }

    let restitution = match (state_a.restitution, state_b.restitution) {
        (Some(ra), Some(rb)) => (ra + rb) / 2.0,
        _ => cfg.default_restitution,
    };
    let impulse = normal * (-(1.0 + restitution) * normal_vel / inv_sum);

    if state_a.inv_mass > 0.0 {
        if let Ok(mut vel) = world.get::<&mut Velocity>(a) {
            vel.linear -= impulse * state_a.inv_mass;
        }
    }
    if state_b.inv_mass > 0.0 {
        if let Ok(mut vel) = world.get::<&mut Velocity>(b) {
            vel.linear += impulse * state_b.inv_mass;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: m::Vec2, b: m::Vec2) -> bool {
        (a - b).mag() < 1e-9
    }

    fn position(world: &World, e: Entity) -> m::Vec2 {
        world.get::<&Transform>(e).unwrap().position
    }

    fn velocity(world: &World, e: Entity) -> m::Vec2 {
        world.get::<&Velocity>(e).unwrap().linear
    }

    #[test]
    fn correction_is_split_by_inverse_mass() {
        let mut world = World::new();
        let a = world.spawn((
            Transform::default(),
            Collider::new_circle(1.0),
            Mass::new(1.0),
        ));
        let b = world.spawn((
            Transform::default(),
            Collider::new_circle(1.0),
            Mass::new(3.0),
        ));
        let cfg = PipelineConfig::default();
        assert!(resolve(&mut world, a, b, m::Vec2::new(4.0, 0.0), &cfg));
        // inverse masses 1 and 1/3 give shares of 3/4 and 1/4
        assert!(approx(position(&world, a), m::Vec2::new(-3.0, 0.0)));
        assert!(approx(position(&world, b), m::Vec2::new(1.0, 0.0)));
    }

    #[test]
    fn immovable_pair_is_untouched() {
        let mut world = World::new();
        let a = world.spawn((
            Transform::default(),
            Collider::new_square(1.0).make_static(),
            Velocity::new([1.0, 0.0]),
        ));
        let b = world.spawn((
            Transform::default(),
            Collider::new_square(1.0),
            Mass::new(0.0),
            Velocity::new([-1.0, 0.0]),
        ));
        let cfg = PipelineConfig::default();
        assert!(!resolve(&mut world, a, b, m::Vec2::new(0.5, 0.0), &cfg));
        assert_eq!(position(&world, a), m::Vec2::zero());
        assert_eq!(position(&world, b), m::Vec2::zero());
        assert_eq!(velocity(&world, a), m::Vec2::new(1.0, 0.0));
        assert_eq!(velocity(&world, b), m::Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn explicit_mass_overrides_static() {
        let mut world = World::new();
        let a = world.spawn((
            Transform::default(),
            Collider::new_square(1.0).make_static(),
            Mass::new(1.0),
        ));
        let b = world.spawn((Transform::default(), Collider::new_square(1.0).make_static()));
        let cfg = PipelineConfig::default();
        assert!(resolve(&mut world, a, b, m::Vec2::new(0.0, 2.0), &cfg));
        assert!(approx(position(&world, a), m::Vec2::new(0.0, -2.0)));
        assert_eq!(position(&world, b), m::Vec2::zero());
    }

    fn head_on(restitution: f64) -> (m::Vec2, m::Vec2) {
        let mut world = World::new();
        let mat = PhysicsMaterial::with_restitution(restitution);
        let a = world.spawn((
            Transform::default(),
            Collider::new_circle(1.0),
            Velocity::new([2.0, 0.0]),
            mat,
        ));
        let b = world.spawn((
            Transform::default(),
            Collider::new_circle(1.0),
            Velocity::new([-2.0, 0.0]),
            mat,
        ));
        let cfg = PipelineConfig::default();
        resolve(&mut world, a, b, m::Vec2::new(0.1, 0.0), &cfg);
        (velocity(&world, a), velocity(&world, b))
    }

    #[test]
    fn inelastic_collision_stops_relative_motion() {
        let (va, vb) = head_on(0.0);
        assert!(((vb - va).x).abs() < 1e-9);
        assert!(approx(va, m::Vec2::zero()));
    }

    #[test]
    fn elastic_collision_reverses_relative_motion() {
        let (va, vb) = head_on(1.0);
        assert!(approx(vb - va, m::Vec2::new(4.0, 0.0)));
        assert!(approx(va, m::Vec2::new(-2.0, 0.0)));
        assert!(approx(vb, m::Vec2::new(2.0, 0.0)));
    }

    #[test]
    fn separating_bodies_only_get_positional_correction() {
        let mut world = World::new();
        let a = world.spawn((
            Transform::default(),
            Collider::new_circle(1.0),
            Velocity::new([-1.0, 0.0]),
        ));
        let b = world.spawn((Transform::default(), Collider::new_circle(1.0)));
        let cfg = PipelineConfig::default();
        assert!(resolve(&mut world, a, b, m::Vec2::new(1.0, 0.0), &cfg));
        assert_eq!(velocity(&world, a), m::Vec2::new(-1.0, 0.0));
        assert!(approx(position(&world, a), m::Vec2::new(-0.5, 0.0)));
    }

    #[test]
    fn missing_material_uses_default_restitution() {
        let mut world = World::new();
        let a = world.spawn((
            Transform::default(),
            Collider::new_circle(1.0),
            Velocity::new([1.0, 0.0]),
            PhysicsMaterial::with_restitution(1.0),
        ));
        let b = world.spawn((
            Transform::default(),
            Collider::new_circle(1.0).make_static(),
        ));
        let cfg = PipelineConfig::default();
        resolve(&mut world, a, b, m::Vec2::new(0.1, 0.0), &cfg);
        assert!(approx(velocity(&world, a), m::Vec2::new(-0.3, 0.0)));
    }

    #[test]
    fn zero_mtv_skips_impulse() {
        let mut world = World::new();
        let a = world.spawn((
            Transform::default(),
            Collider::new_circle(1.0),
            Velocity::new([1.0, 0.0]),
        ));
        let b = world.spawn((Transform::default(), Collider::new_circle(1.0)));
        let cfg = PipelineConfig::default();
        assert!(resolve(&mut world, a, b, m::Vec2::zero(), &cfg));
        assert_eq!(velocity(&world, a), m::Vec2::new(1.0, 0.0));
    }

    #[test]
    fn despawned_entity_is_not_resolved() {
        let mut world = World::new();
        let a = world.spawn((
            Transform::default(),
            Collider::new_circle(1.0),
            Velocity::new([1.0, 0.0]),
        ));
        let b = world.spawn((Transform::default(), Collider::new_circle(1.0)));
        world.despawn(b).unwrap();

        let cfg = PipelineConfig::default();
        assert!(!resolve(&mut world, a, b, m::Vec2::new(1.0, 0.0), &cfg));
        assert!(!resolve(&mut world, b, a, m::Vec2::new(1.0, 0.0), &cfg));
        assert_eq!(position(&world, a), m::Vec2::zero());
        assert_eq!(velocity(&world, a), m::Vec2::new(1.0, 0.0));
    }
}
