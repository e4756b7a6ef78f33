use std::cell::Cell;
use std::rc::Rc;

use skid::{
    Axis, Boundary, FrameToken, ObjectConfig, ObjectId, PerAxis, PointerKind, Scheduler,
    SurfaceConfig, SurfaceId, SurfaceSource,
};

const FRAME_MS: f64 = 1000.0 / 60.0;

fn scheduler_with(max_x: f64, max_y: f64) -> (Scheduler, SurfaceId, ObjectId) {
    let mut scheduler = Scheduler::new();
    let surface = scheduler
        .add_surface(
            SurfaceSource::Range {
                min: PerAxis::new(0.0, 0.0),
                max: PerAxis::new(max_x, max_y),
            },
            SurfaceConfig::new(),
        )
        .unwrap();
    let id = scheduler.add_object(surface, ObjectConfig::new()).unwrap();
    (scheduler, surface, id)
}

fn run_until_settled(scheduler: &mut Scheduler, mut token: FrameToken, mut now: f64) -> f64 {
    for _ in 0..5000 {
        now += FRAME_MS;
        match scheduler.tick(token, now) {
            Some(next) => token = next,
            None => return now,
        }
    }
    panic!("simulation did not settle within 5000 frames");
}

#[test]
fn overshoot_bounce_converges_exactly_onto_edge() {
    let (mut scheduler, _, id) = scheduler_with(200.0, 200.0);

    let contacts = Rc::new(Cell::new(0u32));
    let seen = contacts.clone();
    scheduler
        .on_boundary_contact(id, Boundary::XMax, move || seen.set(seen.get() + 1))
        .unwrap();

    // 20% overshoot targets 240px, guaranteeing boundary contact at 200.
    let token = scheduler
        .goto(id, &[Boundary::XMax], Some(20.0), 0.0)
        .unwrap()
        .unwrap();
    run_until_settled(&mut scheduler, token, 0.0);

    let state = scheduler.object(id).unwrap().state(Axis::X);
    assert_eq!(state.position, 200.0, "convergence must snap exactly onto the edge");
    assert_eq!(state.velocity, 0.0);
    assert!(state.settled);
    assert!(state.hitting_max);
    assert_eq!(contacts.get(), 1, "one contact episode, one notification");
}

#[test]
fn bounce_never_escapes_the_energy_bound() {
    let (mut scheduler, _, id) = scheduler_with(200.0, 200.0);

    let mut token = scheduler
        .goto(id, &[Boundary::XMax], Some(20.0), 0.0)
        .unwrap()
        .unwrap();
    let mut now = 0.0;
    let mut peak = 0.0f64;
    for _ in 0..5000 {
        now += FRAME_MS;
        match scheduler.tick(token, now) {
            Some(next) => token = next,
            None => break,
        }
        let position = scheduler.object(id).unwrap().position().x;
        if position > peak {
            peak = position;
        }
    }

    // The launch energy covers 240px of friction; the spring only ever
    // pushes back toward the surface.
    assert!(peak < 250.0, "penetration exceeded the launch energy: {}", peak);
    assert!(peak > 200.0, "the overshoot target should penetrate the edge");
}

#[test]
fn settled_bounce_is_idempotent_under_further_ticks() {
    let (mut scheduler, _, id) = scheduler_with(200.0, 200.0);

    let token = scheduler
        .goto(id, &[Boundary::XMax], Some(20.0), 0.0)
        .unwrap()
        .unwrap();
    let now = run_until_settled(&mut scheduler, token, 0.0);

    // Force another frame over the settled object.
    let token = scheduler.begin_motion(Some(id), now).unwrap();
    scheduler.tick(token, now + FRAME_MS);

    let state = scheduler.object(id).unwrap().state(Axis::X);
    assert_eq!(state.position, 200.0);
    assert_eq!(state.velocity, 0.0);
    assert!(state.settled);
}

#[test]
fn release_out_of_bounds_snaps_back_to_edge() {
    let (mut scheduler, _, id) = scheduler_with(100.0, 100.0);

    // Drag far past the max edge, then hold still so release velocity is 0.
    scheduler.pointer_moved(0.0, 0.0);
    let token = scheduler.start_move(id, PointerKind::Mouse, 0.0).unwrap();
    scheduler.pointer_moved(150.0, 0.0);
    let token = scheduler.tick(token, FRAME_MS).unwrap();
    let token = scheduler.tick(token, 2.0 * FRAME_MS).unwrap();
    assert_eq!(scheduler.object(id).unwrap().position().x, 150.0);

    scheduler.end_move(false);
    // Released parked out of bounds: a minimal velocity re-engages the
    // boundary response rather than leaving it stranded.
    assert_eq!(scheduler.object(id).unwrap().state(Axis::X).velocity, 0.01);

    run_until_settled(&mut scheduler, token, 2.0 * FRAME_MS);
    let state = scheduler.object(id).unwrap().state(Axis::X);
    assert_eq!(state.position, 100.0);
    assert!(state.settled);
}

#[test]
fn dragging_past_an_edge_attenuates_the_pull() {
    let (mut scheduler, _, id) = scheduler_with(100.0, 100.0);

    scheduler.pointer_moved(0.0, 0.0);
    let token = scheduler.start_move(id, PointerKind::Mouse, 0.0).unwrap();

    // First frame carries the object out of bounds at full coupling.
    scheduler.pointer_moved(120.0, 0.0);
    let token = scheduler.tick(token, FRAME_MS).unwrap();
    assert_eq!(scheduler.object(id).unwrap().position().x, 120.0);

    // Out of bounds, the default pull spring ratio halves twice: 40 more
    // px of cursor travel move the object by 40 * (0.08 / 0.16) / 2 = 10.
    scheduler.pointer_moved(160.0, 0.0);
    scheduler.tick(token, 2.0 * FRAME_MS).unwrap();
    assert_eq!(scheduler.object(id).unwrap().position().x, 130.0);
}

#[test]
fn min_edge_contact_reports_the_min_boundary() {
    let (mut scheduler, _, id) = scheduler_with(100.0, 100.0);

    let contacts = Rc::new(Cell::new(0u32));
    let seen = contacts.clone();
    scheduler
        .on_boundary_contact(id, Boundary::YMin, move || seen.set(seen.get() + 1))
        .unwrap();

    // Start at y-max, then launch back down into the min edge with
    // overshoot so it collides.
    scheduler.goto_instant(id, &[Boundary::YMax], None).unwrap();
    let token = scheduler
        .goto(id, &[Boundary::YMin], Some(25.0), 0.0)
        .unwrap()
        .unwrap();
    run_until_settled(&mut scheduler, token, 0.0);

    let state = scheduler.object(id).unwrap().state(Axis::Y);
    assert_eq!(state.position, 0.0);
    assert!(state.hitting_min);
    assert_eq!(contacts.get(), 1);
}
