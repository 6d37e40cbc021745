use crate::math as m;

/// Tunable parameters of a [`CollisionPipeline`][super::CollisionPipeline].
///
/// The defaults are good for worlds measured in pixels,
/// with objects ranging from a few to a few hundred units across.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-types", serde(default))]
pub struct PipelineConfig {
    /// Side length of a broad phase grid cell in world units.
    ///
    /// A likely good value is a little larger than the typical object in your scene.
    pub cell_size: f64,
    /// Colliders whose bounding radius exceeds `big_body_factor * cell_size`
    /// skip grid queries and are instead tested against every other collider.
    pub big_body_factor: f64,
    /// If a collider's swept bounds cover more than this many cells on either axis,
    /// it's inserted into just the single cell containing its center.
    ///
    /// This is an approximation that can miss collisions for very large or fast objects
    /// in exchange for bounded insertion cost.
    pub span_cutoff: i32,
    /// Upper bound for the timestep given to [`step`][super::CollisionPipeline::step].
    pub max_dt: f64,
    /// Restitution used unless both colliding entities have a
    /// [`PhysicsMaterial`][crate::PhysicsMaterial].
    pub default_restitution: f64,
    /// Squared length under which axes and normals are considered degenerate.
    pub degenerate_eps: f64,
    /// Distance under which two circle centers are considered coincident.
    pub coincident_eps: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cell_size: 128.0,
            big_body_factor: 3.0,
            span_cutoff: 100,
            max_dt: 0.1,
            default_restitution: 0.3,
            degenerate_eps: m::DEGENERATE_EPS,
            coincident_eps: 1e-6,
        }
    }
}

/// An invalid value in a [`PipelineConfig`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("Cell size must be positive and finite, got {0}")]
    InvalidCellSize(f64),
    #[error("Big body factor must be positive, got {0}")]
    InvalidBigBodyFactor(f64),
    #[error("Span cutoff must be at least one cell, got {0}")]
    InvalidSpanCutoff(i32),
    #[error("Maximum timestep must be positive, got {0}")]
    InvalidMaxDt(f64),
    #[error("Default restitution must be in [0, 1], got {0}")]
    InvalidRestitution(f64),
    #[error("Epsilons must be positive, got {0}")]
    InvalidEpsilon(f64),
}

impl PipelineConfig {
    #[inline]
    pub fn with_cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = cell_size;
        self
    }

    #[inline]
    pub fn with_big_body_factor(mut self, factor: f64) -> Self {
        self.big_body_factor = factor;
        self
    }

    #[inline]
    pub fn with_span_cutoff(mut self, cutoff: i32) -> Self {
        self.span_cutoff = cutoff;
        self
    }

    #[inline]
    pub fn with_max_dt(mut self, max_dt: f64) -> Self {
        self.max_dt = max_dt;
        self
    }

    #[inline]
    pub fn with_default_restitution(mut self, restitution: f64) -> Self {
        self.default_restitution = restitution;
        self
    }

    /// Bounding radius above which a collider counts as a big body.
    #[inline]
    pub fn big_body_radius(&self) -> f64 {
        self.cell_size * self.big_body_factor
    }

    /// Check that every parameter is in its valid range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(ConfigError::InvalidCellSize(self.cell_size));
        }
        if !(self.big_body_factor > 0.0) {
            return Err(ConfigError::InvalidBigBodyFactor(self.big_body_factor));
        }
        if self.span_cutoff < 1 {
            return Err(ConfigError::InvalidSpanCutoff(self.span_cutoff));
        }
        if !(self.max_dt > 0.0) {
            return Err(ConfigError::InvalidMaxDt(self.max_dt));
        }
        if !(0.0..=1.0).contains(&self.default_restitution) {
            return Err(ConfigError::InvalidRestitution(self.default_restitution));
        }
        for eps in [self.degenerate_eps, self.coincident_eps] {
            if !(eps > 0.0) {
                return Err(ConfigError::InvalidEpsilon(eps));
            }
        }
        Ok(())
    }
}
