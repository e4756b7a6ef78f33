//! The bounding surface: the rectangular region objects are constrained to.

use crate::axis::{Axis, PerAxis};
use crate::config::SurfaceConfig;
use crate::error::MotionError;

/// Where a surface takes its bounds from.
///
/// The embedder reports either an extent (a viewport or element content
/// box, origin at zero) or explicit min/max corners.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SurfaceSource {
    /// A width/height extent with origin at zero.
    Extent { width: f64, height: f64 },
    /// Explicit min/max corners.
    Range {
        min: PerAxis<f64>,
        max: PerAxis<f64>,
    },
}

/// Authoritative min/max extents per axis, in px.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Edges {
    pub min: PerAxis<f64>,
    pub max: PerAxis<f64>,
}

impl Edges {
    /// The travel span of an axis, in px.
    pub fn span(&self, axis: Axis) -> f64 {
        self.max[axis] - self.min[axis]
    }
}

/// A movable region that one or more motion objects are constrained to.
pub struct Surface {
    source: SurfaceSource,
    config: SurfaceConfig,
    edges: Edges,
}

impl Surface {
    /// Create a surface and compute its initial edges.
    pub fn new(source: SurfaceSource, config: SurfaceConfig) -> Result<Surface, MotionError> {
        config.validate()?;
        let mut surface = Surface {
            source,
            config,
            edges: Edges::default(),
        };
        surface.set_edges();
        Ok(surface)
    }

    /// Recompute `{min, max}` per axis from the source and padding.
    ///
    /// Dynamic paddings are re-evaluated here, so calling this after an
    /// embedder layout change picks up the new values.
    pub fn set_edges(&mut self) {
        let (mut min, mut max) = match self.source {
            SurfaceSource::Extent { width, height } => {
                (PerAxis::splat(0.0), PerAxis::new(width, height))
            }
            SurfaceSource::Range { min, max } => (min, max),
        };

        for axis in Axis::BOTH {
            min[axis] += self.config.padding_min[axis].resolve();
            max[axis] -= self.config.padding_max[axis].resolve();
        }

        self.edges = Edges { min, max };
    }

    /// Replace the bounds source and recompute edges.
    ///
    /// Repositioning contained objects is the scheduler's job; see
    /// [`Scheduler::resize_surface`].
    ///
    /// [`Scheduler::resize_surface`]: crate::scheduler::Scheduler::resize_surface
    pub fn set_source(&mut self, source: SurfaceSource) {
        self.source = source;
        self.set_edges();
    }

    /// The current edges.
    pub fn edges(&self) -> Edges {
        self.edges
    }

    /// The surface configuration.
    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }
}
