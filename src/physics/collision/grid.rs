//! The spatial grid is responsible for detecting pairs of possibly
//! intersecting objects for further, more accurate narrow phase inspection.

use crate::{math as m, physics::PipelineConfig};
use hecs::Entity;
use itertools::{iproduct, Either};
use std::collections::{HashMap, HashSet};

/// Pack a 2D cell coordinate into a single hash key.
#[inline]
pub fn cell_key(x: i32, y: i32) -> u64 {
    ((x as u32 as u64) << 32) | (y as u32 as u64)
}

/// The cells a collider was inserted into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Footprint {
    /// Every cell in an inclusive rectangle of cell coordinates.
    Cells { min: [i32; 2], max: [i32; 2] },
    /// A single cell, used when the swept bounds span too many cells.
    Single(u64),
}

impl Footprint {
    /// Keys of all cells in the footprint, column by column.
    pub fn keys(self) -> impl Iterator<Item = u64> {
        match self {
            Footprint::Cells { min, max } => Either::Left(
                iproduct!(min[0]..=max[0], min[1]..=max[1]).map(|(x, y)| cell_key(x, y)),
            ),
            Footprint::Single(key) => Either::Right(std::iter::once(key)),
        }
    }
}

/// What the grid needs to know about a collider to insert it.
#[derive(Clone, Copy, Debug)]
pub struct GridEntry {
    pub entity: Entity,
    /// World-space center of the collider's shape.
    pub center: m::Vec2,
    /// Bounding radius of the collider's shape.
    pub radius: f64,
    /// Velocity of the entity, zero if it has none.
    pub velocity: m::Vec2,
}

/// Why a collider wasn't inserted normally.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// The swept bounds were too large and the collider went into a single cell.
    Fallback,
    /// The collider's center wasn't a number.
    SkippedNan,
}

/// A uniform spatial hash grid, rebuilt from scratch every tick.
///
/// Colliders are inserted with their bounds swept by their velocity over the tick,
/// so fast objects are found by everything they might pass through.
/// Colliders much larger than a cell are additionally listed as big bodies,
/// which are tested against every other collider instead of relying on the grid.
#[derive(Debug, Default)]
pub struct SpatialGrid {
    cells: HashMap<u64, Vec<Entity>>,
    footprints: HashMap<Entity, Footprint>,
    big_bodies: Vec<Entity>,
    // same entities as `big_bodies`, for membership checks
    big_body_set: HashSet<Entity>,
}

impl SpatialGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything inserted so far, keeping allocations.
    pub fn clear(&mut self) {
        // cells used last tick are likely used again, keep their allocations.
        // cells that stayed empty are dropped so the map doesn't grow forever
        self.cells.retain(|_, cell| !cell.is_empty());
        for cell in self.cells.values_mut() {
            cell.clear();
        }
        self.footprints.clear();
        self.big_bodies.clear();
        self.big_body_set.clear();
    }

    /// Insert a collider with bounds swept over the timestep `dt`.
    pub fn insert(&mut self, entry: GridEntry, dt: f64, cfg: &PipelineConfig) -> InsertOutcome {
        if m::has_nan(entry.center) {
            return InsertOutcome::SkippedNan;
        }

        if entry.radius > cfg.big_body_radius() {
            self.big_bodies.push(entry.entity);
            self.big_body_set.insert(entry.entity);
        }

        let footprint = Self::swept_footprint(entry, dt, cfg);
        for key in footprint.keys() {
            self.cells.entry(key).or_default().push(entry.entity);
        }
        self.footprints.insert(entry.entity, footprint);

        match footprint {
            Footprint::Cells { .. } => InsertOutcome::Inserted,
            Footprint::Single(_) => InsertOutcome::Fallback,
        }
    }

    fn swept_footprint(entry: GridEntry, dt: f64, cfg: &PipelineConfig) -> Footprint {
        let sweep = entry.velocity * dt;
        let r = entry.radius;
        let min = m::Vec2::new(
            entry.center.x - r + sweep.x.min(0.0),
            entry.center.y - r + sweep.y.min(0.0),
        );
        let max = m::Vec2::new(
            entry.center.x + r + sweep.x.max(0.0),
            entry.center.y + r + sweep.y.max(0.0),
        );

        let to_cell = |coord: f64| (coord / cfg.cell_size).floor() as i32;
        let cell_min = [to_cell(min.x), to_cell(min.y)];
        let cell_max = [to_cell(max.x), to_cell(max.y)];

        let cutoff = i64::from(cfg.span_cutoff);
        let span_x = i64::from(cell_max[0]) - i64::from(cell_min[0]);
        let span_y = i64::from(cell_max[1]) - i64::from(cell_min[1]);
        if span_x > cutoff || span_y > cutoff {
            // Approximation: huge or very fast objects only occupy the cell of their
            // unswept center, truncated towards zero rather than floored.
            // Collisions with things in the other cells they cover can be missed.
            log::debug!(
                "{:?} spans {}x{} cells, inserting into a single cell",
                entry.entity,
                span_x + 1,
                span_y + 1
            );
            let cx = (entry.center.x / cfg.cell_size) as i32;
            let cy = (entry.center.y / cfg.cell_size) as i32;
            return Footprint::Single(cell_key(cx, cy));
        }

        Footprint::Cells {
            min: cell_min,
            max: cell_max,
        }
    }

    /// Entities inserted into the cell with the given key, in insertion order.
    pub fn cell(&self, key: u64) -> &[Entity] {
        self.cells.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of cells that contain at least one entity.
    pub fn cell_count(&self) -> usize {
        self.cells.values().filter(|c| !c.is_empty()).count()
    }

    /// Colliders too big for the grid to be useful, in insertion order.
    pub fn big_bodies(&self) -> &[Entity] {
        &self.big_bodies
    }

    #[inline]
    pub fn is_big_body(&self, entity: Entity) -> bool {
        self.big_body_set.contains(&entity)
    }

    /// The cells an entity was inserted into this tick, if it was inserted.
    pub fn footprint(&self, entity: Entity) -> Option<Footprint> {
        self.footprints.get(&entity).copied()
    }

    /// Every entity sharing a cell with the given one, including itself.
    ///
    /// Entities sharing several cells are repeated once per shared cell.
    pub fn neighbors(&self, entity: Entity) -> impl '_ + Iterator<Item = Entity> {
        self.footprint(entity)
            .into_iter()
            .flat_map(Footprint::keys)
            .flat_map(move |key| self.cell(key).iter().copied())
    }
}
