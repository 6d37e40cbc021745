use super::{Gravity, Velocity};
use crate::Transform;
use hecs::World;

/// Move every entity with a non-frozen [`Velocity`] by one timestep,
/// then accelerate the ones that have [`Gravity`].
pub fn integrate(world: &mut World, dt: f64) {
    let _span = tracy_span!("integrate", "integrate");

    for (_, (tr, vel)) in world.query_mut::<(&mut Transform, &Velocity)>() {
        if !vel.freeze {
            tr.position += vel.linear * dt;
        }
    }

    for (_, (vel, gravity)) in world.query_mut::<(&mut Velocity, &Gravity)>() {
        if gravity.enabled && !vel.freeze {
            vel.linear.y += gravity.acceleration * dt;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math as m;

    #[test]
    fn moves_then_accelerates() {
        let mut world = World::new();
        let e = world.spawn((
            Transform::default(),
            Velocity::new([10.0, 0.0]),
            Gravity::new(10.0),
        ));
        integrate(&mut world, 0.5);
        // position uses the velocity from before gravity was applied
        assert_eq!(
            world.get::<&Transform>(e).unwrap().position,
            m::Vec2::new(5.0, 0.0)
        );
        assert_eq!(
            world.get::<&Velocity>(e).unwrap().linear,
            m::Vec2::new(10.0, 5.0)
        );
    }

    #[test]
    fn frozen_and_disabled_are_left_alone() {
        let mut world = World::new();
        let frozen = world.spawn((
            Transform::default(),
            Velocity::new([10.0, 0.0]).frozen(),
            Gravity::default(),
        ));
        let no_gravity = world.spawn((
            Transform::default(),
            Velocity::new([0.0, 1.0]),
            Gravity {
                enabled: false,
                ..Gravity::default()
            },
        ));
        integrate(&mut world, 0.1);

        assert_eq!(world.get::<&Transform>(frozen).unwrap().position, m::Vec2::zero());
        assert_eq!(
            world.get::<&Velocity>(frozen).unwrap().linear,
            m::Vec2::new(10.0, 0.0)
        );
        assert!((world.get::<&Transform>(no_gravity).unwrap().position.y - 0.1).abs() < 1e-12);
        assert_eq!(
            world.get::<&Velocity>(no_gravity).unwrap().linear,
            m::Vec2::new(0.0, 1.0)
        );
    }
}
