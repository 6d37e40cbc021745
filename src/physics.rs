use crate::{math as m, Transform};
use hecs::{Entity, World};

//

pub mod body;
pub use body::{Gravity, Mass, Velocity};

pub mod collision;
use collision::{
    grid::{GridEntry, InsertOutcome},
    narrowphase, PairSet, PlacedCollider, SpatialGrid, Tolerances,
};
pub use collision::{Collider, ColliderShape, CollisionEvent, EventBuffer, PhysicsMaterial};

mod config;
pub use config::{ConfigError, PipelineConfig};

mod integrator;
pub use integrator::integrate;

mod solver;
pub use solver::resolve;

//

/// Counters describing what happened during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Active colliders inserted into the broad phase grid.
    pub colliders: usize,
    /// Colliders left out because their position wasn't a number.
    pub skipped_nan: usize,
    /// Colliders inserted into a single cell because their bounds spanned too many.
    pub fallbacks: usize,
    pub big_bodies: usize,
    /// Occupied grid cells.
    pub cells: usize,
    /// Pairs that went through the narrow phase.
    pub pairs_tested: usize,
    /// Overlapping pairs found, triggers included.
    pub collisions: usize,
    pub triggers: usize,
    /// Collisions where at least one entity was moved.
    pub resolved: usize,
}

/// Per-tick collision detection and response for a [`hecs::World`].
///
/// Every tick the pipeline
/// 1. rebuilds a spatial grid from the colliders' current positions,
///    swept by their velocity over the tick,
/// 2. moves entities by their velocity and applies gravity,
/// 3. tests big bodies against everything and every other collider against its grid cells,
///    testing each pair at most once,
/// 4. records a [`CollisionEvent`] for every overlap and pushes non-trigger pairs apart.
///
/// Events stay readable until [`end_tick`][Self::end_tick] or the next step.
/// Use [`tick`][Self::tick] to run a step, handle its events and clean up in one call.
#[derive(Debug)]
pub struct CollisionPipeline {
    config: PipelineConfig,
    grid: SpatialGrid,
    pairs: PairSet,
    events: EventBuffer,
    // colliders inserted into the grid this tick, in query order
    colliders: Vec<Entity>,
    stats: TickStats,
}

impl Default for CollisionPipeline {
    fn default() -> Self {
        Self::from_valid_config(PipelineConfig::default())
    }
}

impl CollisionPipeline {
    /// Create a pipeline, checking the config for invalid values first.
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: PipelineConfig) -> Self {
        Self {
            config,
            grid: SpatialGrid::new(),
            pairs: PairSet::default(),
            events: EventBuffer::default(),
            colliders: Vec::new(),
            stats: TickStats::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The broad phase grid as it was built during the last step.
    #[inline]
    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    /// Collision events of the current tick.
    #[inline]
    pub fn events(&self) -> &EventBuffer {
        &self.events
    }

    #[inline]
    pub fn last_stats(&self) -> TickStats {
        self.stats
    }

    /// Run step, then let `consume` handle the events, then clean up.
    pub fn tick(
        &mut self,
        world: &mut World,
        dt: f64,
        consume: impl FnOnce(&[CollisionEvent], &mut World),
    ) -> TickStats {
        let stats = self.step(world, dt);
        consume(self.events.events(), world);
        self.end_tick();
        stats
    }

    /// Discard this tick's collision events.
    pub fn end_tick(&mut self) {
        self.events.clear();
    }

    /// Advance the world by `dt` seconds, clamped to `[0, max_dt]`.
    pub fn step(&mut self, world: &mut World, dt: f64) -> TickStats {
        let _span = tracy_span!("collision pipeline step", "step");

        // also catches NaN
        let dt = if dt > 0.0 {
            dt.min(self.config.max_dt)
        } else {
            0.0
        };

        self.grid.clear();
        self.pairs.clear();
        self.events.clear();
        self.colliders.clear();
        self.stats = TickStats::default();

        self.build_grid(world, dt);
        integrate(world, dt);
        self.collide(world);

        log::debug!("collision step done: {:?}", self.stats);
        self.stats
    }

    fn build_grid(&mut self, world: &World, dt: f64) {
        let _span = tracy_span!("build grid", "build_grid");

        for (entity, (tr, coll, vel)) in world
            .query::<(&Transform, &Collider, Option<&Velocity>)>()
            .iter()
        {
            if !coll.active {
                continue;
            }

            // frozen entities don't move this tick so there's nothing to sweep
            let velocity = match vel {
                Some(v) if !v.freeze => v.linear,
                _ => m::Vec2::zero(),
            };
            let entry = GridEntry {
                entity,
                center: coll.center(tr.position),
                radius: coll.shape.bounding_radius(),
                velocity,
            };
            match self.grid.insert(entry, dt, &self.config) {
                InsertOutcome::SkippedNan => {
                    log::trace!("{:?} has a NaN position, leaving it out of collision", entity);
                    self.stats.skipped_nan += 1;
                    continue;
                }
                InsertOutcome::Fallback => self.stats.fallbacks += 1,
                InsertOutcome::Inserted => (),
            }
            self.stats.colliders += 1;
            self.colliders.push(entity);
        }

        self.stats.big_bodies = self.grid.big_bodies().len();
        self.stats.cells = self.grid.cell_count();
    }

    fn collide(&mut self, world: &mut World) {
        let _span = tracy_span!("collide", "collide");

        let Self {
            config,
            grid,
            pairs,
            events,
            colliders,
            stats,
        } = self;
        let tol = Tolerances {
            degenerate: config.degenerate_eps,
            coincident: config.coincident_eps,
        };
        let mut pass = CollisionPass {
            config,
            tol,
            pairs,
            events,
            stats,
        };

        // big bodies against everything
        for &big in grid.big_bodies() {
            if !world.contains(big) {
                log::trace!("big body {:?} no longer exists", big);
                continue;
            }
            for &other in colliders.iter() {
                pass.visit(world, big, other);
            }
        }

        // everything else against whatever shares a cell with it
        for &entity in colliders.iter() {
            if grid.is_big_body(entity) {
                continue;
            }
            for other in grid.neighbors(entity) {
                pass.visit(world, entity, other);
            }
        }
    }
}

/// Borrowed pipeline state for the duration of one collision pass.
struct CollisionPass<'a> {
    config: &'a PipelineConfig,
    tol: Tolerances,
    pairs: &'a mut PairSet,
    events: &'a mut EventBuffer,
    stats: &'a mut TickStats,
}

impl<'a> CollisionPass<'a> {
    fn visit(&mut self, world: &mut World, a: Entity, b: Entity) {
        if !self.pairs.try_mark(a, b) {
            return;
        }
        let (placed_a, placed_b) = match (placed(world, a), placed(world, b)) {
            (Some(pa), Some(pb)) => (pa, pb),
            _ => {
                log::trace!("skipping pair {:?}, {:?} with a missing entity", a, b);
                return;
            }
        };

        self.stats.pairs_tested += 1;
        let mtv = match narrowphase::test_pair(&placed_a, &placed_b, self.tol) {
            Some(mtv) => mtv,
            None => return,
        };

        let is_trigger = placed_a.collider.is_trigger || placed_b.collider.is_trigger;
        self.events.push(CollisionEvent { a, b, is_trigger });
        self.stats.collisions += 1;
        if is_trigger {
            self.stats.triggers += 1;
            return;
        }

        if resolve(world, a, b, mtv, self.config) {
            self.stats.resolved += 1;
        }
    }
}

/// Read an entity's collider and its placement, if it still has both.
fn placed(world: &World, entity: Entity) -> Option<PlacedCollider> {
    if !world.contains(entity) {
        return None;
    }
    let tr = world.get::<&Transform>(entity).ok()?;
    let coll = world.get::<&Collider>(entity).ok()?;
    Some(PlacedCollider::new(entity, &tr, &coll))
}
