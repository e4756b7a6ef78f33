//! Drag-and-release motion physics for on-screen draggable elements.
//!
//! `skid` turns a pointer drag into friction-decelerated free motion,
//! spring/damper boundary collisions, and exact settling. Each draggable
//! object is simulated as two independent 1D axes inside a rectangular
//! bounding surface; a shared scheduler drives every moving object from
//! one frame-synchronized loop.
//!
//! # Features
//!
//! - **Kinematic integrator**: per-axis friction with a cross-axis budget
//!   split for diagonal motion
//! - **Boundary response**: spring/damper forces at the surface edges,
//!   with oscillation-convergence detection that snaps exactly onto the edge
//! - **Drag coupling**: cursor-tracked positioning with overscroll
//!   attenuation and an embedder-supplied drag gate
//! - **Go-to targeting**: energy-balance launch velocities toward a named
//!   edge, with overshoot and instant-teleport variants
//! - **Rendering-agnostic**: position changes, boundary contacts, and taps
//!   are delivered through observer callbacks
//! - **`no_std` compatible**: works in embedded and WASM environments
//!
//! # Example
//!
//! ```
//! use skid::{Boundary, ObjectConfig, Scheduler, SurfaceConfig, SurfaceSource};
//!
//! let mut scheduler = Scheduler::new();
//! let surface = scheduler
//!     .add_surface(
//!         SurfaceSource::Extent { width: 800.0, height: 600.0 },
//!         SurfaceConfig::new(),
//!     )
//!     .unwrap();
//! let object = scheduler.add_object(surface, ObjectConfig::new()).unwrap();
//!
//! scheduler
//!     .on_position_change(object, |details| {
//!         // mirror details.x / details.y into the rendering surface
//!         let _ = (details.x, details.y);
//!     })
//!     .unwrap();
//!
//! // launch toward the right edge and drive the loop with frame timing
//! let mut token = scheduler
//!     .goto(object, &[Boundary::XMax], None, 0.0)
//!     .unwrap()
//!     .unwrap();
//! let mut now_ms = 0.0;
//! for _ in 0..600 {
//!     now_ms += 1000.0 / 60.0;
//!     match scheduler.tick(token, now_ms) {
//!         Some(next) => token = next,
//!         None => break,
//!     }
//! }
//! assert!(scheduler.object(object).unwrap().settled());
//! ```

#![no_std]

extern crate alloc;

pub mod axis;
pub mod config;
pub mod error;
pub mod object;
pub mod observer;
pub mod scheduler;
pub mod surface;
pub mod units;

// Re-export primary API
pub use axis::{Axis, Boundary, PerAxis, Side};
pub use config::{ObjectConfig, Padding, SurfaceConfig};
pub use error::MotionError;
pub use object::{AxisState, DragDisposition, DragGate, MotionObject};
pub use observer::PositionDetails;
pub use scheduler::{FrameToken, ObjectId, PointerKind, Scheduler, SurfaceId};
pub use surface::{Edges, Surface, SurfaceSource};
