//! The per-object motion state machine.
//!
//! Each axis of an object is in one of three states: settled, moving
//! freely under friction (possibly in boundary contact), or coupled to a
//! drag gesture. The integrator here advances one axis one tick at a
//! time; the scheduler decides when ticks happen.

use alloc::boxed::Box;
use alloc::vec::Vec;

use libm::{fabs, sqrt};

use crate::axis::{Axis, Boundary, PerAxis, Side};
use crate::config::{ObjectConfig, SurfaceConfig};
use crate::error::MotionError;
use crate::observer::{BoundaryCallback, Observers, PositionCallback, PositionDetails, TapCallback};
use crate::scheduler::SurfaceId;
use crate::surface::Edges;
use crate::units::{to_meters, to_pixels, GRAVITY};

/// Velocity injected to re-enter bounds after an out-of-bounds release, m/s.
const REENTRY_VELOCITY: f64 = 0.01;
/// Rebound samples inspected by the convergence check.
const SETTLE_WINDOW: usize = 6;
/// Samples required before the convergence check runs.
const SETTLE_MIN_SAMPLES: usize = 5;
/// Maximum px spread across the window for a bounce to count as converged.
const SETTLE_SPREAD: f64 = 1.0;

/// Ruling from the embedder's drag gate for one axis on one tick.
///
/// The gate generalizes the "an inner scrollable region may own this
/// gesture" interaction: the embedder inspects the proposed positional
/// delta and decides whether the drag proceeds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DragDisposition {
    /// Apply the delta normally.
    Move,
    /// Suppress movement this tick but stay in the drag.
    Hold,
    /// Abort the drag; the gesture belongs to someone else.
    Cancel,
}

/// Per-axis drag predicate supplied by the embedder.
pub type DragGate = Box<dyn FnMut(Axis, f64) -> DragDisposition>;

/// Kinematic state for one axis of one object.
#[derive(Clone, Debug)]
pub struct AxisState {
    /// Position in px, relative to the surface origin.
    pub position: f64,
    /// Velocity in m/s, signed.
    pub velocity: f64,
    /// Acceleration in m/s², derived each tick.
    pub acceleration: f64,
    /// True when velocity is exactly zero and no forces are pending.
    pub settled: bool,
    /// Latched while in contact with the min edge.
    pub hitting_min: bool,
    /// Latched while in contact with the max edge.
    pub hitting_max: bool,
    previous_displacements: Vec<f64>,
}

impl AxisState {
    fn new() -> AxisState {
        AxisState {
            position: 0.0,
            velocity: 0.0,
            acceleration: 0.0,
            settled: true,
            hitting_min: false,
            hitting_max: false,
            previous_displacements: Vec::new(),
        }
    }
}

impl Default for AxisState {
    fn default() -> AxisState {
        AxisState::new()
    }
}

struct GotoPart {
    /// Launch velocity toward the target edge, m/s.
    velocity: f64,
    /// Overshoot-scaled positional delta, px.
    pixel_delta: f64,
}

/// One draggable element's motion state.
pub struct MotionObject {
    surface: SurfaceId,
    config: ObjectConfig,
    axes: PerAxis<AxisState>,
    dragging: bool,
    observers: Observers,
    drag_gate: Option<DragGate>,
}

impl MotionObject {
    pub(crate) fn new(surface: SurfaceId, config: ObjectConfig) -> Result<MotionObject, MotionError> {
        config.validate()?;
        Ok(MotionObject {
            surface,
            config,
            axes: PerAxis::new(AxisState::new(), AxisState::new()),
            dragging: false,
            observers: Observers::new(),
            drag_gate: None,
        })
    }

    /// The surface this object is bound to.
    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    /// The object configuration.
    pub fn config(&self) -> &ObjectConfig {
        &self.config
    }

    /// The kinematic state of one axis.
    pub fn state(&self, axis: Axis) -> &AxisState {
        &self.axes[axis]
    }

    /// Current position in px per axis.
    pub fn position(&self) -> PerAxis<f64> {
        PerAxis::new(self.axes.x.position, self.axes.y.position)
    }

    /// True while coupled to a drag gesture.
    pub fn dragging(&self) -> bool {
        self.dragging
    }

    /// True when both axes are settled.
    pub fn settled(&self) -> bool {
        self.axes.x.settled && self.axes.y.settled
    }

    /// The edges this object can travel between: the surface edges, with
    /// the object's own size subtracted from the max when contained.
    pub fn travel_edges(&self, surface_edges: Edges) -> Edges {
        let mut edges = surface_edges;
        if self.config.contained {
            edges.max.x -= self.config.size.x;
            edges.max.y -= self.config.size.y;
        }
        edges
    }

    /// The nearest settle edge per active axis, judged by which half of
    /// the travel range the object currently occupies.
    pub fn closest_settle_point(&self, surface_edges: Edges) -> Vec<Boundary> {
        let edges = self.travel_edges(surface_edges);
        let mut points = Vec::new();
        for axis in Axis::BOTH {
            if !self.config.axes[axis] {
                continue;
            }
            let position = self.axes[axis].position;
            let span = edges.span(axis);
            let percentage = if span == 0.0 {
                0.0
            } else {
                (position - edges.min[axis]) / span
            };
            if position < edges.min[axis] || percentage <= 0.5 {
                points.push(Boundary::new(axis, Side::Min));
            }
            if position > edges.max[axis] || percentage > 0.5 {
                points.push(Boundary::new(axis, Side::Max));
            }
        }
        points
    }

    pub(crate) fn add_position_callback(&mut self, callback: PositionCallback) {
        self.observers.add_position(callback);
    }

    pub(crate) fn add_boundary_callback(&mut self, boundary: Boundary, callback: BoundaryCallback) {
        self.observers.add_boundary(boundary, callback);
    }

    pub(crate) fn add_tap_callback(&mut self, callback: TapCallback) {
        self.observers.add_tap(callback);
    }

    pub(crate) fn set_drag_gate(&mut self, gate: DragGate) {
        self.drag_gate = Some(gate);
    }

    pub(crate) fn notify_current_position(&mut self, surface_edges: Edges) {
        let edges = self.travel_edges(surface_edges);
        let details = self.position_details(&edges);
        self.observers.notify_position(&details);
    }

    fn reset_axis(&mut self, axis: Axis) {
        let state = &mut self.axes[axis];
        state.settled = false;
        state.hitting_min = false;
        state.hitting_max = false;
        state.previous_displacements.clear();
    }

    pub(crate) fn start_drag(&mut self) {
        for axis in Axis::BOTH {
            if self.config.axes[axis] {
                self.reset_axis(axis);
            }
        }
        self.dragging = true;
    }

    fn position_details(&self, edges: &Edges) -> PositionDetails {
        PositionDetails {
            x: self.axes.x.position,
            y: self.axes.y.position,
            x_percent: travel_percent(self.axes.x.position, edges, Axis::X),
            y_percent: travel_percent(self.axes.y.position, edges, Axis::Y),
        }
    }

    fn write_position(&mut self, axis: Axis, px: f64, edges: &Edges) {
        self.axes[axis].position = px;
        let details = self.position_details(edges);
        self.observers.notify_position(&details);
    }

    /// Advance this object by one tick. Returns true when the drag gate
    /// canceled the gesture and the scheduler should end the move.
    pub(crate) fn update_motion(
        &mut self,
        dt: f64,
        surface_edges: Edges,
        cfg: &SurfaceConfig,
        cursor_delta: PerAxis<Option<f64>>,
    ) -> bool {
        let edges = self.travel_edges(surface_edges);

        // Friction budget split: each axis carries its share of the total
        // speed, so diagonal motion doesn't get double friction. Weight is
        // 0 for both axes when neither is moving.
        let speed_sum = fabs(self.axes.x.velocity) + fabs(self.axes.y.velocity);
        let coefficients = if speed_sum == 0.0 {
            PerAxis::splat(0.0)
        } else {
            PerAxis::new(
                fabs(self.axes.x.velocity) / speed_sum,
                fabs(self.axes.y.velocity) / speed_sum,
            )
        };

        let mut cancel = false;
        for axis in Axis::BOTH {
            if !self.config.axes[axis] {
                continue;
            }
            if self.dragging {
                cancel |= self.drag_axis(axis, dt, &edges, cfg, cursor_delta[axis]);
            } else {
                self.integrate_axis(axis, dt, &edges, cfg, coefficients[axis]);
            }
        }
        cancel
    }

    fn drag_axis(
        &mut self,
        axis: Axis,
        dt: f64,
        edges: &Edges,
        cfg: &SurfaceConfig,
        cursor_delta: Option<f64>,
    ) -> bool {
        let state = &self.axes[axis];

        // Inside bounds the element tracks the cursor 1:1; past an edge
        // the pull spring attenuates the coupling for overscroll feel.
        let mut pull = 1.0;
        if state.position < edges.min[axis] || state.position > edges.max[axis] {
            pull = if cfg.boundary_pull_spring <= cfg.boundary_spring {
                if cfg.boundary_spring > 0.0 {
                    (cfg.boundary_pull_spring / cfg.boundary_spring) / 2.0
                } else {
                    1.0
                }
            } else {
                1.0 - (cfg.boundary_spring / cfg.boundary_pull_spring) / 2.0
            };
        }
        let delta = pull * cursor_delta.unwrap_or(0.0);

        let ruling = match self.drag_gate.as_mut() {
            Some(gate) => gate(axis, delta),
            None => DragDisposition::Move,
        };
        match ruling {
            DragDisposition::Cancel => return true,
            DragDisposition::Hold => return false,
            DragDisposition::Move => {}
        }

        let target = self.axes[axis].position + delta;
        self.write_position(axis, target, edges);

        // Velocity and acceleration are derived from the positional delta
        // so the release hand-off into free motion is continuous.
        if dt > 0.0 {
            let new_velocity = to_meters(delta, cfg.scale) / dt;
            let state = &mut self.axes[axis];
            let velocity_delta = new_velocity - state.velocity;
            state.velocity = new_velocity;
            state.acceleration = velocity_delta / dt;
        }
        false
    }

    fn integrate_axis(
        &mut self,
        axis: Axis,
        dt: f64,
        edges: &Edges,
        cfg: &SurfaceConfig,
        coefficient: f64,
    ) {
        let mass = self.config.mass;
        let friction = self.config.friction;

        let advanced =
            self.axes[axis].position + to_pixels(self.axes[axis].velocity * dt, cfg.scale);
        self.write_position(axis, advanced, edges);

        let velocity = self.axes[axis].velocity;
        let position = self.axes[axis].position;

        let mut force =
            friction * (mass * GRAVITY) * if velocity > 0.0 { -1.0 } else { 1.0 } * coefficient;

        let hitting_max =
            self.axes[axis].hitting_max || (velocity >= 0.0 && position > edges.max[axis]);
        if hitting_max {
            if !self.axes[axis].hitting_max {
                self.axes[axis].hitting_max = true;
                self.observers.notify_boundary(Boundary::new(axis, Side::Max));
            }
            force += cfg.boundary_spring * (edges.max[axis] - position);
        }

        let hitting_min =
            self.axes[axis].hitting_min || (velocity <= 0.0 && position < edges.min[axis]);
        if hitting_min {
            if !self.axes[axis].hitting_min {
                self.axes[axis].hitting_min = true;
                self.observers.notify_boundary(Boundary::new(axis, Side::Min));
            }
            force += cfg.boundary_spring * (edges.min[axis] - position);
        }

        let in_contact = hitting_min || hitting_max;
        if in_contact {
            force += cfg.boundary_spring_damping * -velocity;
        }

        let acceleration = force / mass;
        let new_velocity = velocity + acceleration * dt;

        {
            let state = &mut self.axes[axis];
            state.acceleration = acceleration;

            if in_contact {
                let displacement = if hitting_max {
                    position - edges.max[axis]
                } else {
                    edges.min[axis] - position
                };
                state.previous_displacements.push(fabs(displacement));
            }

            // Friction only decelerates: a sign flip outside boundary
            // contact snaps the axis to rest instead of reversing.
            state.velocity = if new_velocity * velocity <= 0.0 && !in_contact {
                0.0
            } else {
                new_velocity
            };
        }

        self.check_convergence(axis, edges);

        if self.axes[axis].velocity == 0.0 {
            self.axes[axis].settled = true;
        }
    }

    /// Once the rebound history stops shrinking, the spring/damper model
    /// would micro-oscillate forever; snap onto the edge instead.
    fn check_convergence(&mut self, axis: Axis, edges: &Edges) {
        let history = &self.axes[axis].previous_displacements;
        let len = history.len();
        if len < SETTLE_MIN_SAMPLES {
            return;
        }

        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for &displacement in &history[len.saturating_sub(SETTLE_WINDOW)..] {
            if displacement < lo {
                lo = displacement;
            }
            if displacement > hi {
                hi = displacement;
            }
        }

        if hi - lo < SETTLE_SPREAD {
            self.axes[axis].velocity = 0.0;
            let snap = if self.axes[axis].hitting_max {
                edges.max[axis]
            } else {
                edges.min[axis]
            };
            self.write_position(axis, snap, edges);
        }
    }

    fn goto_plan(
        &self,
        boundaries: &[Boundary],
        overshoot_override: Option<f64>,
        edges: &Edges,
        cfg: &SurfaceConfig,
    ) -> PerAxis<Option<GotoPart>> {
        let mut sides: PerAxis<Option<Side>> = PerAxis::splat(None);
        for boundary in boundaries {
            sides[boundary.axis()] = Some(boundary.side());
        }

        let overshoot = overshoot_override.unwrap_or(cfg.overshoot);
        let friction_force = self.config.friction * (self.config.mass * GRAVITY);

        // Raw deltas to the requested edges, px and meters.
        let mut pixel_parts: PerAxis<Option<f64>> = PerAxis::splat(None);
        let mut meter_parts: PerAxis<Option<f64>> = PerAxis::splat(None);
        for axis in Axis::BOTH {
            if !self.config.axes[axis] {
                continue;
            }
            if let Some(side) = sides[axis] {
                let edge = match side {
                    Side::Min => edges.min[axis],
                    Side::Max => edges.max[axis],
                };
                let px = edge - self.axes[axis].position;
                pixel_parts[axis] = Some(px);
                meter_parts[axis] = Some(to_meters(px, cfg.scale));
            }
        }

        let mut plan: PerAxis<Option<GotoPart>> = PerAxis::new(None, None);
        for axis in Axis::BOTH {
            let delta = match meter_parts[axis] {
                Some(delta) => delta,
                None => continue,
            };

            // A diagonal move apportions the friction budget between the
            // axes in proportion to their distances.
            let friction_multiplier = match meter_parts[axis.other()] {
                Some(other) if other != 0.0 => fabs(delta) / (fabs(other) + fabs(delta)),
                _ => 1.0,
            };

            if delta == 0.0 {
                continue;
            }

            let factor = 1.0 + overshoot / 100.0;
            let scaled = delta * factor;
            let speed = sqrt(
                2.0 * ((friction_force * friction_multiplier) / self.config.mass) * fabs(scaled),
            );
            plan[axis] = Some(GotoPart {
                velocity: if scaled >= 0.0 { speed } else { -speed },
                pixel_delta: pixel_parts[axis].unwrap_or(0.0) * factor,
            });
        }
        plan
    }

    /// The launch velocity `goto` would assign per requested axis, without
    /// mutating any state.
    pub(crate) fn goto_velocities(
        &self,
        boundaries: &[Boundary],
        overshoot_override: Option<f64>,
        surface_edges: Edges,
        cfg: &SurfaceConfig,
    ) -> PerAxis<Option<f64>> {
        let edges = self.travel_edges(surface_edges);
        let plan = self.goto_plan(boundaries, overshoot_override, &edges, cfg);
        PerAxis::new(
            plan.x.as_ref().map(|part| part.velocity),
            plan.y.as_ref().map(|part| part.velocity),
        )
    }

    /// Launch the object toward the requested edges.
    pub(crate) fn goto_launch(
        &mut self,
        boundaries: &[Boundary],
        overshoot_override: Option<f64>,
        surface_edges: Edges,
        cfg: &SurfaceConfig,
    ) {
        let edges = self.travel_edges(surface_edges);
        let plan = self.goto_plan(boundaries, overshoot_override, &edges, cfg);
        for axis in Axis::BOTH {
            if let Some(part) = &plan[axis] {
                let velocity = part.velocity;
                self.reset_axis(axis);
                self.axes[axis].velocity = velocity;
            }
        }
    }

    /// Teleport the object to the requested edges. The moved axes are left
    /// settled with zero velocity; no motion follows.
    pub(crate) fn goto_instant(
        &mut self,
        boundaries: &[Boundary],
        overshoot_override: Option<f64>,
        surface_edges: Edges,
        cfg: &SurfaceConfig,
    ) {
        let edges = self.travel_edges(surface_edges);
        let plan = self.goto_plan(boundaries, overshoot_override, &edges, cfg);
        for axis in Axis::BOTH {
            if let Some(part) = &plan[axis] {
                let target = self.axes[axis].position + part.pixel_delta;
                self.reset_axis(axis);
                self.write_position(axis, target, &edges);
                let state = &mut self.axes[axis];
                state.velocity = 0.0;
                state.settled = true;
            }
        }
    }

    /// Hand the object off from drag-coupled motion to free motion.
    pub(crate) fn end_drag(
        &mut self,
        simulate_tap: bool,
        surface_edges: Edges,
        cfg: &SurfaceConfig,
    ) {
        if simulate_tap {
            self.observers.notify_tap();
        }
        self.dragging = false;

        let edges = self.travel_edges(surface_edges);
        let nudge_threshold = self.config.nudge_threshold;

        for axis in Axis::BOTH {
            if !self.config.axes[axis] {
                continue;
            }
            let position = self.axes[axis].position;
            let velocity = self.axes[axis].velocity;
            let min_diff = position - edges.min[axis];
            let max_diff = edges.max[axis] - position;

            // Never leave an object parked out of bounds: a minimal
            // velocity toward the violated edge engages the boundary
            // contact response, which walks it back in.
            let mut out_of_bounds = false;
            if velocity == 0.0 && min_diff < 0.0 {
                self.axes[axis].velocity = -REENTRY_VELOCITY;
                out_of_bounds = true;
            }
            if velocity == 0.0 && max_diff < 0.0 {
                self.axes[axis].velocity = REENTRY_VELOCITY;
                out_of_bounds = true;
            }
            if nudge_threshold == 0.0 || out_of_bounds {
                continue;
            }

            let velocity = self.axes[axis].velocity;
            let heading = if velocity > 0.0 { Side::Max } else { Side::Min };
            let to_min =
                self.goto_velocities(&[Boundary::new(axis, Side::Min)], None, surface_edges, cfg);
            let to_max =
                self.goto_velocities(&[Boundary::new(axis, Side::Max)], None, surface_edges, cfg);
            let needed = match heading {
                Side::Min => to_min[axis],
                Side::Max => to_max[axis],
            }
            .unwrap_or(0.0);

            // Too slow to reach the edge it's heading to: nudge onto the
            // near edge when within the threshold, otherwise send it the
            // rest of the way to the far edge.
            if fabs(velocity) < fabs(needed) {
                let span = edges.span(axis);
                let mut percentage = if span == 0.0 {
                    0.0
                } else {
                    (position - edges.min[axis]) / span * 100.0
                };
                let closest = if percentage > 50.0 { Side::Max } else { Side::Min };
                let farthest = closest.opposite();
                if percentage > 50.0 {
                    percentage = 100.0 - percentage;
                }
                let target = if percentage < nudge_threshold {
                    closest
                } else {
                    farthest
                };
                let launch = match target {
                    Side::Min => to_min[axis],
                    Side::Max => to_max[axis],
                }
                .unwrap_or(0.0);
                self.axes[axis].velocity = launch;
            }
        }

        if self.axes.x.velocity == 0.0 {
            self.axes.x.settled = true;
        }
        if self.axes.y.velocity == 0.0 {
            self.axes.y.settled = true;
        }
    }
}

fn travel_percent(position: f64, edges: &Edges, axis: Axis) -> f64 {
    let span = edges.span(axis);
    if span == 0.0 {
        0.0
    } else {
        (position - edges.min[axis]) / span
    }
}
