//! Benchmarks for the skid motion simulation.

use criterion::{criterion_group, criterion_main, Criterion};
use skid::{
    Boundary, ObjectConfig, PerAxis, PointerKind, Scheduler, SurfaceConfig, SurfaceSource,
};

const FRAME_MS: f64 = 1000.0 / 60.0;

fn surface_source() -> SurfaceSource {
    SurfaceSource::Range {
        min: PerAxis::new(0.0, 0.0),
        max: PerAxis::new(1000.0, 1000.0),
    }
}

fn bench_goto_coast(c: &mut Criterion) {
    c.bench_function("goto_coast_to_settle", |b| {
        b.iter(|| {
            let mut scheduler = Scheduler::new();
            let surface = scheduler
                .add_surface(surface_source(), SurfaceConfig::new())
                .unwrap();
            let id = scheduler.add_object(surface, ObjectConfig::new()).unwrap();

            let mut token = scheduler
                .goto(id, &[Boundary::XMax, Boundary::YMax], Some(10.0), 0.0)
                .unwrap()
                .unwrap();
            let mut now = 0.0;
            for _ in 0..10_000 {
                now += FRAME_MS;
                match scheduler.tick(token, now) {
                    Some(next) => token = next,
                    None => break,
                }
            }
            scheduler.object(id).unwrap().position()
        });
    });
}

fn bench_drag_ticks(c: &mut Criterion) {
    c.bench_function("drag_60_frames", |b| {
        b.iter(|| {
            let mut scheduler = Scheduler::new();
            let surface = scheduler
                .add_surface(surface_source(), SurfaceConfig::new())
                .unwrap();
            let id = scheduler.add_object(surface, ObjectConfig::new()).unwrap();

            scheduler.pointer_moved(0.0, 0.0);
            let mut token = scheduler.start_move(id, PointerKind::Mouse, 0.0).unwrap();
            let mut now = 0.0;
            for step in 1..=60 {
                scheduler.pointer_moved(5.0 * step as f64, 3.0 * step as f64);
                now += FRAME_MS;
                token = scheduler.tick(token, now).unwrap();
            }
            scheduler.end_move(false);
            scheduler.object(id).unwrap().position()
        });
    });
}

fn bench_many_objects(c: &mut Criterion) {
    c.bench_function("fifty_objects_60_frames", |b| {
        b.iter(|| {
            let mut scheduler = Scheduler::new();
            let surface = scheduler
                .add_surface(surface_source(), SurfaceConfig::new())
                .unwrap();
            let mut token = None;
            let mut ids = Vec::with_capacity(50);
            for index in 0..50 {
                let id = scheduler.add_object(surface, ObjectConfig::new()).unwrap();
                let overshoot = Some((index % 10) as f64);
                token = scheduler
                    .goto(id, &[Boundary::XMax, Boundary::YMax], overshoot, 0.0)
                    .unwrap();
                ids.push(id);
            }
            let mut token = token.unwrap();
            let mut now = 0.0;
            for _ in 0..60 {
                now += FRAME_MS;
                match scheduler.tick(token, now) {
                    Some(next) => token = next,
                    None => break,
                }
            }
            scheduler.object(ids[0]).unwrap().position()
        });
    });
}

criterion_group!(benches, bench_goto_coast, bench_drag_ticks, bench_many_objects);
criterion_main!(benches);
