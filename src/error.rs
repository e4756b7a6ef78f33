//! Error types for engine configuration and control calls.

use core::fmt;

/// Errors that can occur when configuring or driving the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum MotionError {
    /// Mass must be positive and finite.
    InvalidMass,
    /// Friction coefficient must be non-negative and finite.
    InvalidFriction,
    /// Scale (pixels per meter) must be positive and finite.
    InvalidScale,
    /// Spring constants must be non-negative and finite.
    InvalidSpring,
    /// Damping coefficient must be non-negative and finite.
    InvalidDamping,
    /// An object must have at least one active axis.
    NoActiveAxes,
    /// Boundary name was not one of "x-min", "x-max", "y-min", "y-max".
    UnknownBoundary,
    /// Object id is not registered with this scheduler.
    ObjectOutOfBounds { index: usize, count: usize },
    /// Surface id is not registered with this scheduler.
    SurfaceOutOfBounds { index: usize, count: usize },
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionError::InvalidMass => write!(f, "mass must be positive and finite"),
            MotionError::InvalidFriction => {
                write!(f, "friction coefficient must be non-negative and finite")
            }
            MotionError::InvalidScale => write!(f, "scale must be positive and finite"),
            MotionError::InvalidSpring => {
                write!(f, "spring constants must be non-negative and finite")
            }
            MotionError::InvalidDamping => {
                write!(f, "damping coefficient must be non-negative and finite")
            }
            MotionError::NoActiveAxes => write!(f, "at least one axis must be active"),
            MotionError::UnknownBoundary => {
                write!(f, "boundary must be one of x-min, x-max, y-min, y-max")
            }
            MotionError::ObjectOutOfBounds { index, count } => {
                write!(f, "object id {} out of bounds (count: {})", index, count)
            }
            MotionError::SurfaceOutOfBounds { index, count } => {
                write!(f, "surface id {} out of bounds (count: {})", index, count)
            }
        }
    }
}
