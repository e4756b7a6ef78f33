//! Configuration for surfaces and motion objects.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::axis::{Axis, Boundary, PerAxis};
use crate::error::MotionError;

/// Padding applied to one edge of a surface when its bounds are recomputed.
///
/// A `Dynamic` padding is re-evaluated on every [`Surface::set_edges`]
/// call, so paddings that depend on embedder layout stay current.
///
/// [`Surface::set_edges`]: crate::surface::Surface::set_edges
pub enum Padding {
    /// A fixed pixel value.
    Fixed(f64),
    /// A closure evaluated at recompute time.
    Dynamic(Box<dyn Fn() -> f64>),
}

impl Padding {
    /// The current pixel value of this padding.
    pub fn resolve(&self) -> f64 {
        match self {
            Padding::Fixed(px) => *px,
            Padding::Dynamic(f) => f(),
        }
    }
}

impl Default for Padding {
    fn default() -> Padding {
        Padding::Fixed(0.0)
    }
}

/// Configuration for a bounding surface.
///
/// # Builder Pattern
/// ```
/// use skid::SurfaceConfig;
///
/// let config = SurfaceConfig::new()
///     .with_scale(500.0)
///     .with_boundary_spring(0.2)
///     .with_overshoot(10.0);
/// ```
pub struct SurfaceConfig {
    /// Pixels per meter. Default: 526.
    pub scale: f64,
    /// Boundary spring constant, N/m. Default: 0.16.
    pub boundary_spring: f64,
    /// Boundary damper coefficient, N/(m/s). Default: 5.0.
    pub boundary_spring_damping: f64,
    /// Spring constant felt while dragging past a boundary, N/m.
    /// Default: 0.08.
    pub boundary_pull_spring: f64,
    /// Percentage of overshoot for programmatic go-to motions. Default: 0.
    pub overshoot: f64,
    /// Padding subtracted inward from the min edge of each axis.
    pub padding_min: PerAxis<Padding>,
    /// Padding subtracted inward from the max edge of each axis.
    pub padding_max: PerAxis<Padding>,
}

impl SurfaceConfig {
    /// Create a config with default values.
    pub fn new() -> SurfaceConfig {
        SurfaceConfig {
            scale: 526.0,
            boundary_spring: 0.16,
            boundary_spring_damping: 5.0,
            boundary_pull_spring: 0.08,
            overshoot: 0.0,
            padding_min: PerAxis::new(Padding::Fixed(0.0), Padding::Fixed(0.0)),
            padding_max: PerAxis::new(Padding::Fixed(0.0), Padding::Fixed(0.0)),
        }
    }

    /// Set the pixels-per-meter scale.
    pub fn with_scale(mut self, scale: f64) -> SurfaceConfig {
        self.scale = scale;
        self
    }

    /// Set the boundary spring constant.
    pub fn with_boundary_spring(mut self, spring: f64) -> SurfaceConfig {
        self.boundary_spring = spring;
        self
    }

    /// Set the boundary damper coefficient.
    pub fn with_boundary_spring_damping(mut self, damping: f64) -> SurfaceConfig {
        self.boundary_spring_damping = damping;
        self
    }

    /// Set the spring constant felt while dragging past a boundary.
    pub fn with_boundary_pull_spring(mut self, spring: f64) -> SurfaceConfig {
        self.boundary_pull_spring = spring;
        self
    }

    /// Set the overshoot percentage for programmatic go-to motions.
    pub fn with_overshoot(mut self, overshoot: f64) -> SurfaceConfig {
        self.overshoot = overshoot;
        self
    }

    /// Set the padding for the min edge of an axis.
    pub fn with_padding_min(mut self, axis: Axis, padding: Padding) -> SurfaceConfig {
        self.padding_min[axis] = padding;
        self
    }

    /// Set the padding for the max edge of an axis.
    pub fn with_padding_max(mut self, axis: Axis, padding: Padding) -> SurfaceConfig {
        self.padding_max[axis] = padding;
        self
    }

    /// Reject degenerate physics inputs.
    pub fn validate(&self) -> Result<(), MotionError> {
        if !(self.scale > 0.0 && self.scale.is_finite()) {
            return Err(MotionError::InvalidScale);
        }
        if !(self.boundary_spring >= 0.0 && self.boundary_spring.is_finite())
            || !(self.boundary_pull_spring >= 0.0 && self.boundary_pull_spring.is_finite())
        {
            return Err(MotionError::InvalidSpring);
        }
        if !(self.boundary_spring_damping >= 0.0 && self.boundary_spring_damping.is_finite()) {
            return Err(MotionError::InvalidDamping);
        }
        Ok(())
    }
}

impl Default for SurfaceConfig {
    fn default() -> SurfaceConfig {
        SurfaceConfig::new()
    }
}

/// Configuration for a motion object.
///
/// # Builder Pattern
/// ```
/// use skid::{Axis, Boundary, ObjectConfig};
///
/// let config = ObjectConfig::new()
///     .with_mass(0.3)
///     .with_axes(&[Axis::X])
///     .with_nudge_threshold(25.0)
///     .with_initial_position(&[Boundary::XMax]);
/// ```
pub struct ObjectConfig {
    /// Mass in kg. Default: 0.17.
    pub mass: f64,
    /// Kinetic friction coefficient. Default: 0.15 (rubber on ice).
    pub friction: f64,
    /// Which axes the object moves along. Default: both.
    pub axes: PerAxis<bool>,
    /// Subtract the object's own size from its max travel edge.
    /// Default: true.
    pub contained: bool,
    /// Content-box size in px (width, height), reported by the embedder
    /// for containment math. Default: 0 x 0.
    pub size: PerAxis<f64>,
    /// Percentage-of-range threshold below which a released object near an
    /// edge is nudged onto it. Default: 0 (never nudge).
    pub nudge_threshold: f64,
    /// Edges the object is teleported to on registration.
    /// Default: x-min and y-min.
    pub initial_position: Vec<Boundary>,
}

impl ObjectConfig {
    /// Create a config with default values.
    pub fn new() -> ObjectConfig {
        ObjectConfig {
            mass: 0.17,
            friction: 0.15,
            axes: PerAxis::splat(true),
            contained: true,
            size: PerAxis::splat(0.0),
            nudge_threshold: 0.0,
            initial_position: alloc::vec![Boundary::XMin, Boundary::YMin],
        }
    }

    /// Set the mass in kg.
    pub fn with_mass(mut self, mass: f64) -> ObjectConfig {
        self.mass = mass;
        self
    }

    /// Set the kinetic friction coefficient.
    pub fn with_friction(mut self, friction: f64) -> ObjectConfig {
        self.friction = friction;
        self
    }

    /// Restrict motion to the given axes.
    pub fn with_axes(mut self, axes: &[Axis]) -> ObjectConfig {
        self.axes = PerAxis::splat(false);
        for &axis in axes {
            self.axes[axis] = true;
        }
        self
    }

    /// Set whether the object's size participates in containment math.
    pub fn with_contained(mut self, contained: bool) -> ObjectConfig {
        self.contained = contained;
        self
    }

    /// Set the object's content-box size in px.
    pub fn with_size(mut self, width: f64, height: f64) -> ObjectConfig {
        self.size = PerAxis::new(width, height);
        self
    }

    /// Set the nudge threshold as a percentage of the travel range.
    pub fn with_nudge_threshold(mut self, threshold: f64) -> ObjectConfig {
        self.nudge_threshold = threshold;
        self
    }

    /// Set the edges the object is teleported to on registration.
    pub fn with_initial_position(mut self, boundaries: &[Boundary]) -> ObjectConfig {
        self.initial_position = boundaries.to_vec();
        self
    }

    /// Reject degenerate physics inputs.
    pub fn validate(&self) -> Result<(), MotionError> {
        if !(self.mass > 0.0 && self.mass.is_finite()) {
            return Err(MotionError::InvalidMass);
        }
        if !(self.friction >= 0.0 && self.friction.is_finite()) {
            return Err(MotionError::InvalidFriction);
        }
        if !self.axes.x && !self.axes.y {
            return Err(MotionError::NoActiveAxes);
        }
        Ok(())
    }
}

impl Default for ObjectConfig {
    fn default() -> ObjectConfig {
        ObjectConfig::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_mass_rejected() {
        assert_eq!(
            ObjectConfig::new().with_mass(0.0).validate(),
            Err(MotionError::InvalidMass)
        );
    }

    #[test]
    fn negative_friction_rejected() {
        assert_eq!(
            ObjectConfig::new().with_friction(-0.1).validate(),
            Err(MotionError::InvalidFriction)
        );
    }

    #[test]
    fn empty_axis_set_rejected() {
        assert_eq!(
            ObjectConfig::new().with_axes(&[]).validate(),
            Err(MotionError::NoActiveAxes)
        );
    }

    #[test]
    fn zero_scale_rejected() {
        assert_eq!(
            SurfaceConfig::new().with_scale(0.0).validate(),
            Err(MotionError::InvalidScale)
        );
    }

    #[test]
    fn dynamic_padding_resolves_each_call() {
        let padding = Padding::Dynamic(Box::new(|| 12.5));
        assert_eq!(padding.resolve(), 12.5);
        assert_eq!(padding.resolve(), 12.5);
    }
}
