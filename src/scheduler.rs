//! The shared motion scheduler.
//!
//! One scheduler owns a set of surfaces and the objects bound to them,
//! tracks the shared cursor, and drives a single frame-synchronized
//! update loop over whichever objects are currently in motion. Schedulers
//! are plain values: construct one per embedding context and as many as
//! tests need.
//!
//! The embedder supplies frame timing: `begin_motion`/`start_move` hand
//! back a [`FrameToken`], and the embedder calls [`Scheduler::tick`] with
//! that token from its animation-frame callback. Scheduling a new loop
//! invalidates outstanding tokens, so at most one scheduled tick can ever
//! fire per interval.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::axis::{Axis, Boundary, PerAxis};
use crate::config::{ObjectConfig, SurfaceConfig};
use crate::error::MotionError;
use crate::object::{DragDisposition, MotionObject};
use crate::observer::PositionDetails;
use crate::surface::{Surface, SurfaceSource};
use crate::units::to_seconds;

/// Handle to a surface registered with a scheduler.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SurfaceId(pub(crate) usize);

/// Handle to an object registered with a scheduler.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ObjectId(pub(crate) usize);

/// Token for one scheduled animation frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameToken(u64);

/// The kind of pointer driving a gesture.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

/// Gestures with fewer than this many pointer moves count as taps.
const TAP_MOVE_LIMIT: u32 = 5;

/// Drives every registered object from one cooperative frame loop.
pub struct Scheduler {
    surfaces: Vec<Surface>,
    objects: Vec<MotionObject>,
    cursor: PerAxis<Option<f64>>,
    cursor_last: PerAxis<Option<f64>>,
    active: Vec<ObjectId>,
    dragging: Vec<ObjectId>,
    move_count: u32,
    pending: Option<FrameToken>,
    next_token: u64,
    last_tick_ms: f64,
}

impl Scheduler {
    /// Create an empty scheduler.
    pub fn new() -> Scheduler {
        Scheduler {
            surfaces: Vec::new(),
            objects: Vec::new(),
            cursor: PerAxis::splat(None),
            cursor_last: PerAxis::splat(None),
            active: Vec::new(),
            dragging: Vec::new(),
            move_count: 0,
            pending: None,
            next_token: 0,
            last_tick_ms: 0.0,
        }
    }

    /// Register a surface.
    pub fn add_surface(
        &mut self,
        source: SurfaceSource,
        config: SurfaceConfig,
    ) -> Result<SurfaceId, MotionError> {
        let surface = Surface::new(source, config)?;
        let id = SurfaceId(self.surfaces.len());
        self.surfaces.push(surface);
        Ok(id)
    }

    /// Register an object on a surface and teleport it to its configured
    /// initial position.
    pub fn add_object(
        &mut self,
        surface: SurfaceId,
        config: ObjectConfig,
    ) -> Result<ObjectId, MotionError> {
        self.check_surface(surface)?;
        let mut object = MotionObject::new(surface, config)?;
        let boundaries = object.config().initial_position.clone();
        {
            let owner = &self.surfaces[surface.0];
            object.goto_instant(&boundaries, Some(0.0), owner.edges(), owner.config());
        }
        let id = ObjectId(self.objects.len());
        self.objects.push(object);
        Ok(id)
    }

    /// A registered surface.
    pub fn surface(&self, id: SurfaceId) -> Result<&Surface, MotionError> {
        self.check_surface(id)?;
        Ok(&self.surfaces[id.0])
    }

    /// A registered object.
    pub fn object(&self, id: ObjectId) -> Result<&MotionObject, MotionError> {
        self.check_object(id)?;
        Ok(&self.objects[id.0])
    }

    /// True while the object is in the scheduler's active set.
    pub fn is_active(&self, id: ObjectId) -> bool {
        self.active.contains(&id)
    }

    /// True while the object is in the scheduler's dragging set.
    pub fn is_dragging(&self, id: ObjectId) -> bool {
        self.dragging.contains(&id)
    }

    /// True while a scheduled frame is outstanding.
    pub fn frame_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Swap a surface's bounds source, recompute its edges, and snap each
    /// of its objects to the nearest settle point (never animated).
    pub fn resize_surface(
        &mut self,
        id: SurfaceId,
        source: SurfaceSource,
    ) -> Result<(), MotionError> {
        self.check_surface(id)?;
        self.surfaces[id.0].set_source(source);
        self.snap_surface_objects(id);
        Ok(())
    }

    /// Recompute a surface's edges from its existing source (picking up
    /// dynamic paddings) and snap its objects to the nearest settle point.
    pub fn refresh_surface(&mut self, id: SurfaceId) -> Result<(), MotionError> {
        self.check_surface(id)?;
        self.surfaces[id.0].set_edges();
        self.snap_surface_objects(id);
        Ok(())
    }

    fn snap_surface_objects(&mut self, id: SurfaceId) {
        let edges = self.surfaces[id.0].edges();
        for index in 0..self.objects.len() {
            if self.objects[index].surface() != id {
                continue;
            }
            let boundaries = self.objects[index].closest_settle_point(edges);
            let owner = &self.surfaces[id.0];
            self.objects[index].goto_instant(&boundaries, Some(0.0), edges, owner.config());
        }
    }

    /// Record a pointer/touch move. Coordinates are whatever space the
    /// embedder's events report; only inter-frame deltas are consumed.
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.move_count += 1;
        self.cursor = PerAxis::new(Some(x), Some(y));
    }

    /// The shared cursor position, if one has been observed.
    pub fn cursor(&self) -> PerAxis<Option<f64>> {
        self.cursor
    }

    /// Register `with` (if given) as active and (re)start the frame loop.
    ///
    /// Any previously scheduled frame is canceled: the returned token
    /// replaces all earlier ones, which become stale no-ops in [`tick`].
    ///
    /// [`tick`]: Scheduler::tick
    pub fn begin_motion(
        &mut self,
        with: Option<ObjectId>,
        now_ms: f64,
    ) -> Result<FrameToken, MotionError> {
        if let Some(id) = with {
            self.check_object(id)?;
            self.add_active(id);
        }
        self.last_tick_ms = now_ms;
        Ok(self.schedule_frame())
    }

    /// Start a drag gesture on an object.
    ///
    /// Registers the object as dragging and active, resets the cursor
    /// baseline (a fresh touch has no prior position; a mouse carries its
    /// last known one), and begins motion.
    pub fn start_move(
        &mut self,
        id: ObjectId,
        pointer: PointerKind,
        now_ms: f64,
    ) -> Result<FrameToken, MotionError> {
        self.check_object(id)?;
        self.add_dragging(id);
        self.add_active(id);

        match pointer {
            PointerKind::Touch => {
                self.cursor = PerAxis::splat(None);
                self.cursor_last = PerAxis::splat(None);
            }
            PointerKind::Mouse => {
                self.cursor_last = self.cursor;
            }
        }
        self.move_count = 0;

        self.objects[id.0].start_drag();
        self.begin_motion(None, now_ms)
    }

    /// Run one frame of the motion loop.
    ///
    /// A stale token is a no-op. An empty active set terminates the loop
    /// without rescheduling. Otherwise every active object is advanced
    /// with the same time delta and cursor snapshot, settled objects are
    /// dropped from the active set, and the next frame's token is
    /// returned.
    pub fn tick(&mut self, token: FrameToken, now_ms: f64) -> Option<FrameToken> {
        if self.pending != Some(token) {
            return None;
        }
        self.pending = None;

        if self.active.is_empty() {
            return None;
        }

        let dt = to_seconds(now_ms - self.last_tick_ms);
        let cursor_delta = PerAxis::new(
            delta_component(self.cursor.x, self.cursor_last.x),
            delta_component(self.cursor.y, self.cursor_last.y),
        );

        // Reverse iteration lets settled objects drop out mid-loop without
        // disturbing the positions of objects not yet visited.
        let mut index = self.active.len();
        while index > 0 {
            index -= 1;
            let id = self.active[index];
            let surface = self.objects[id.0].surface();
            let edges = self.surfaces[surface.0].edges();
            let cancel = self.objects[id.0].update_motion(
                dt,
                edges,
                self.surfaces[surface.0].config(),
                cursor_delta,
            );
            if cancel {
                self.end_move(true);
            }
            if self.objects[id.0].settled() {
                self.active.remove(index);
            }
        }

        self.cursor_last = self.cursor;
        self.last_tick_ms = now_ms;
        Some(self.schedule_frame())
    }

    /// End the current gesture for every dragging object.
    ///
    /// A gesture that saw fewer than 5 pointer moves, and was not ended in
    /// favor of a scroll, is reported to each object as a tap.
    pub fn end_move(&mut self, for_scrolling: bool) {
        let simulate_tap = !for_scrolling && self.move_count < TAP_MOVE_LIMIT;
        let mut index = self.dragging.len();
        while index > 0 {
            index -= 1;
            let id = self.dragging[index];
            let surface = self.objects[id.0].surface();
            let edges = self.surfaces[surface.0].edges();
            self.objects[id.0].end_drag(simulate_tap, edges, self.surfaces[surface.0].config());
        }
        self.dragging.clear();
        self.move_count = 0;
    }

    /// Launch an object toward the named edges and begin motion if any
    /// targeted axis came unsettled. Returns the frame token to tick with,
    /// or `None` when the object was already at every requested edge.
    pub fn goto(
        &mut self,
        id: ObjectId,
        boundaries: &[Boundary],
        overshoot: Option<f64>,
        now_ms: f64,
    ) -> Result<Option<FrameToken>, MotionError> {
        self.check_object(id)?;
        let surface = self.objects[id.0].surface();
        let edges = self.surfaces[surface.0].edges();
        self.objects[id.0].goto_launch(boundaries, overshoot, edges, self.surfaces[surface.0].config());
        if self.objects[id.0].settled() {
            Ok(None)
        } else {
            Ok(Some(self.begin_motion(Some(id), now_ms)?))
        }
    }

    /// Teleport an object to the named edges. No motion loop is scheduled;
    /// the moved axes are left settled.
    pub fn goto_instant(
        &mut self,
        id: ObjectId,
        boundaries: &[Boundary],
        overshoot: Option<f64>,
    ) -> Result<(), MotionError> {
        self.check_object(id)?;
        let surface = self.objects[id.0].surface();
        let edges = self.surfaces[surface.0].edges();
        self.objects[id.0].goto_instant(boundaries, overshoot, edges, self.surfaces[surface.0].config());
        Ok(())
    }

    /// The launch velocities `goto` would assign, without mutating state.
    pub fn goto_velocities(
        &self,
        id: ObjectId,
        boundaries: &[Boundary],
        overshoot: Option<f64>,
    ) -> Result<PerAxis<Option<f64>>, MotionError> {
        self.check_object(id)?;
        let surface = self.objects[id.0].surface();
        Ok(self.objects[id.0].goto_velocities(
            boundaries,
            overshoot,
            self.surfaces[surface.0].edges(),
            self.surfaces[surface.0].config(),
        ))
    }

    /// Register a position observer. It is invoked immediately with the
    /// current position, and again on every mutation.
    pub fn on_position_change(
        &mut self,
        id: ObjectId,
        callback: impl FnMut(&PositionDetails) + 'static,
    ) -> Result<(), MotionError> {
        self.check_object(id)?;
        self.objects[id.0].add_position_callback(Box::new(callback));
        let surface = self.objects[id.0].surface();
        let edges = self.surfaces[surface.0].edges();
        self.objects[id.0].notify_current_position(edges);
        Ok(())
    }

    /// Register a boundary-contact observer for one named edge. It fires
    /// once per contact episode, on the entering transition.
    pub fn on_boundary_contact(
        &mut self,
        id: ObjectId,
        boundary: Boundary,
        callback: impl FnMut() + 'static,
    ) -> Result<(), MotionError> {
        self.check_object(id)?;
        self.objects[id.0].add_boundary_callback(boundary, Box::new(callback));
        Ok(())
    }

    /// Register a tap observer, fired when a gesture ends as a tap rather
    /// than a drag.
    pub fn on_tap(
        &mut self,
        id: ObjectId,
        callback: impl FnMut() + 'static,
    ) -> Result<(), MotionError> {
        self.check_object(id)?;
        self.objects[id.0].add_tap_callback(Box::new(callback));
        Ok(())
    }

    /// Install the embedder's per-axis drag gate on an object.
    pub fn set_drag_gate(
        &mut self,
        id: ObjectId,
        gate: impl FnMut(Axis, f64) -> DragDisposition + 'static,
    ) -> Result<(), MotionError> {
        self.check_object(id)?;
        self.objects[id.0].set_drag_gate(Box::new(gate));
        Ok(())
    }

    fn add_active(&mut self, id: ObjectId) {
        if !self.active.contains(&id) {
            self.active.push(id);
        }
    }

    fn add_dragging(&mut self, id: ObjectId) {
        if !self.dragging.contains(&id) {
            self.dragging.push(id);
        }
    }

    fn schedule_frame(&mut self) -> FrameToken {
        self.next_token += 1;
        let token = FrameToken(self.next_token);
        self.pending = Some(token);
        token
    }

    fn check_surface(&self, id: SurfaceId) -> Result<(), MotionError> {
        if id.0 < self.surfaces.len() {
            Ok(())
        } else {
            Err(MotionError::SurfaceOutOfBounds {
                index: id.0,
                count: self.surfaces.len(),
            })
        }
    }

    fn check_object(&self, id: ObjectId) -> Result<(), MotionError> {
        if id.0 < self.objects.len() {
            Ok(())
        } else {
            Err(MotionError::ObjectOutOfBounds {
                index: id.0,
                count: self.objects.len(),
            })
        }
    }
}

impl Default for Scheduler {
    fn default() -> Scheduler {
        Scheduler::new()
    }
}

fn delta_component(current: Option<f64>, last: Option<f64>) -> Option<f64> {
    match (current, last) {
        (Some(current), Some(last)) => Some(current - last),
        _ => None,
    }
}
