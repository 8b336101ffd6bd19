//! End-to-end behaviour of the curve model driven by a headless clock

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;

use curve_tilt::consts::MAX_FRAME_DT;
use curve_tilt::curve::{CubicBezier, CurveModel, DriverPhase, FrameTimer, PhysicsConfig, SpringState};
use curve_tilt::input::{TiltMapping, bind_orientation};
use curve_tilt::platform::{HeadlessClock, Orientation, ScriptedOrientation};
use curve_tilt::render::{FrameGeometry, RenderSettings};

const DT: f32 = 1.0 / 60.0;

fn headless_model() -> (CurveModel, HeadlessClock) {
    let clock = HeadlessClock::new();
    (CurveModel::new(Box::new(clock.clone())), clock)
}

#[test]
fn endpoint_layout() {
    let (mut model, _) = headless_model();
    model.set_size(1000.0, 500.0);

    let c = model.control_points();
    assert_eq!(c.p0, Vec2::new(100.0, 250.0));
    assert_eq!(c.p3, Vec2::new(900.0, 250.0));
    assert_eq!(c.p1, Vec2::new(300.0, 125.0));
    assert_eq!(c.p2, Vec2::new(700.0, 375.0));
    assert_eq!(model.targets().target1, c.p1);
    assert_eq!(model.targets().target2, c.p2);
}

#[test]
fn resize_keeps_points_parked_at_origin() {
    let (mut model, _) = headless_model();
    model.set_size(1000.0, 500.0);
    model.set_targets(Vec2::ZERO, Vec2::ZERO);
    model.set_springs(SpringState::at(Vec2::ZERO), SpringState::at(Vec2::ZERO));

    model.set_size(800.0, 400.0);

    let c = model.control_points();
    assert_eq!(c.p0, Vec2::new(80.0, 200.0));
    assert_eq!(c.p3, Vec2::new(720.0, 200.0));
    assert_eq!(c.p1, Vec2::ZERO);
    assert_eq!(c.p2, Vec2::ZERO);
    assert_eq!(model.targets().target1, Vec2::ZERO);
    assert_eq!(model.targets().target2, Vec2::ZERO);
}

#[test]
fn midpoint_of_symmetric_curve() {
    let curve = CubicBezier::new(
        Vec2::new(0.0, 0.0),
        Vec2::new(0.0, 100.0),
        Vec2::new(100.0, 100.0),
        Vec2::new(100.0, 0.0),
    );
    assert_eq!(curve.position(0.5), Vec2::new(50.0, 75.0));
}

#[test]
fn spring_at_rest() {
    let (mut model, _) = headless_model();
    model.set_size(1000.0, 500.0);
    let rest = Vec2::new(300.0, 125.0);
    model.set_target1(rest);
    model.set_springs(SpringState::at(rest), model.springs().1);

    for _ in 0..60 {
        model.tick(DT);
    }

    let (p1, _) = model.springs();
    assert_eq!(p1.pos, rest);
    assert_eq!(p1.vel, Vec2::ZERO);
}

#[test]
fn spring_pull_single_tick() {
    let (mut model, _) = headless_model();
    model.set_size(1000.0, 500.0);
    model.set_k(0.12);
    model.set_damping(0.14);
    model.set_target1(Vec2::new(400.0, 125.0));

    model.tick(DT);

    let (p1, _) = model.springs();
    assert!(p1.vel.abs_diff_eq(Vec2::new(0.2, 0.0), 1e-6), "vel = {:?}", p1.vel);
    assert!((p1.pos.x - 300.0032).abs() < 1e-4, "pos = {:?}", p1.pos);
    assert_eq!(p1.pos.y, 125.0);
}

#[test]
fn dt_clamp_after_pause() {
    let mut timer = FrameTimer::new();
    timer.delta(0.0);
    assert_eq!(timer.delta(10.0), MAX_FRAME_DT);

    // Through the model: a long stall integrates a single 1/30 s step
    let (mut model, clock) = headless_model();
    model.set_size(1000.0, 500.0);
    model.set_target1(Vec2::new(400.0, 125.0));
    model.start().unwrap();
    clock.fire(0.0);
    clock.fire(10.0);

    let (p1, _) = model.springs();
    assert!((p1.vel.x - 12.0 * MAX_FRAME_DT).abs() < 1e-5);
}

#[test]
fn restart_idempotence() {
    let (mut model, clock) = headless_model();
    model.set_size(1000.0, 500.0);

    let frames = Rc::new(Cell::new(0u32));
    let f = Rc::clone(&frames);
    let _sub = model.subscribe(move |_| f.set(f.get() + 1));

    model.start().unwrap();
    model.start().unwrap();
    assert_eq!(clock.installs(), 2);
    clock.run_frames(5, 60.0);
    assert_eq!(frames.get(), 5, "a re-armed driver ticks once per frame");

    model.stop();
    assert_eq!(model.phase(), DriverPhase::Stopped);
    assert!(!clock.armed());
    assert_eq!(clock.run_frames(5, 60.0), 0);
    assert_eq!(frames.get(), 5);
}

#[test]
fn start_before_size_is_motionless() {
    let (mut model, clock) = headless_model();
    model.start().unwrap();
    clock.run_frames(30, 60.0);

    assert_eq!(model.control_points(), CubicBezier::default());
    assert!(model.sample_curve(100).is_empty());

    model.set_size(1000.0, 500.0);
    clock.run_frames(1, 60.0);
    assert_eq!(model.sample_curve(100).len(), 101);
}

#[test]
fn unavailable_clock_still_samples() {
    let mut model = CurveModel::new(Box::new(HeadlessClock::unavailable()));
    model.set_size(1000.0, 500.0);

    assert!(model.start().is_err());
    assert_eq!(model.phase(), DriverPhase::Stopped);
    assert_eq!(model.sample_curve(100).len(), 101);
    assert_eq!(model.sample_tangents(10, 30.0).len(), 11);
}

#[test]
fn converges_to_held_targets() {
    let clock = HeadlessClock::new();
    let mut model = CurveModel::with_physics(
        Box::new(clock.clone()),
        PhysicsConfig { k: 4.0, damping: 3.0 },
    );
    model.set_size(1000.0, 500.0);
    let target1 = Vec2::new(420.0, 80.0);
    let target2 = Vec2::new(580.0, 410.0);
    model.set_targets(target1, target2);

    model.start().unwrap();
    // One priming frame plus ten seconds at 60 Hz
    clock.run_frames(1 + 600, 60.0);

    let (p1, p2) = model.springs();
    assert!(p1.pos.abs_diff_eq(target1, 1e-3), "P1 = {:?}", p1.pos);
    assert!(p2.pos.abs_diff_eq(target2, 1e-3), "P2 = {:?}", p2.pos);
    assert!(p1.vel.abs_diff_eq(Vec2::ZERO, 1e-3));
    assert!(p2.vel.abs_diff_eq(Vec2::ZERO, 1e-3));
}

#[test]
fn observer_sees_frame_consistent_with_model() {
    let (mut model, clock) = headless_model();
    model.set_size(1000.0, 500.0);
    model.set_target2(Vec2::new(500.0, 500.0));

    let frames = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&frames);
    let render = RenderSettings::default();
    let _sub = model.subscribe(move |snap| {
        sink.borrow_mut().push(FrameGeometry::build(snap, &render));
    });

    model.start().unwrap();
    clock.run_frames(3, 60.0);

    let frames = frames.borrow();
    assert_eq!(frames.len(), 3);
    let last = frames.last().unwrap();
    assert_eq!(last.curve, model.sample_curve(100));
    assert_eq!(last.markers[2].pos, model.control_points().p2);
}

#[test]
fn tilt_moves_the_curve() {
    let clock = HeadlessClock::new();
    let model = Rc::new(RefCell::new(CurveModel::new(Box::new(clock.clone()))));
    model.borrow_mut().set_size(1000.0, 500.0);

    let mut tilt = ScriptedOrientation::new();
    bind_orientation(&mut tilt, &model, TiltMapping::default()).unwrap();
    model.borrow_mut().start().unwrap();

    // Roll right: target1 moves right, target2 moves left
    tilt.push(Orientation::new(0.0, 0.4, 0.0));
    clock.run_frames(120, 60.0);

    let (p1, p2) = model.borrow().springs();
    assert!(p1.vel.x > 0.0 && p1.pos.x > 300.0);
    assert!(p2.vel.x < 0.0 && p2.pos.x < 700.0);

    // Endpoints never move
    let c = model.borrow().control_points();
    assert_eq!(c.p0, Vec2::new(100.0, 250.0));
    assert_eq!(c.p3, Vec2::new(900.0, 250.0));
}
