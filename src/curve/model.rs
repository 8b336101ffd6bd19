//! Curve model: the public face of the engine
//!
//! Composes the curve state, the frame driver and a frame-ready observer
//! registry. Not thread-safe; every call belongs on the rendering context.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::Vec2;

use super::bezier::CubicBezier;
use super::driver::{DriverPhase, FrameDriver, FrameTimer};
use super::spring::{PhysicsConfig, SpringState};
use super::state::{CurveSnapshot, CurveState, Size, Targets};
use crate::error::Result;
use crate::platform::FrameClock;

type Observer = Rc<RefCell<dyn FnMut(&CurveSnapshot)>>;

#[derive(Default)]
struct Observers {
    next_id: u64,
    entries: Vec<(u64, Observer)>,
}

impl Observers {
    fn add(&mut self, observer: Observer) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((id, observer));
        id
    }

    fn remove(&mut self, id: u64) {
        self.entries.retain(|(i, _)| *i != id);
    }
}

/// Deliver `snapshot` to every observer registered when delivery begins
///
/// The registry is not borrowed while observers run, so they may subscribe,
/// unsubscribe or drive the model. A nested delivery skips observers that
/// are still running.
fn notify(observers: &RefCell<Observers>, snapshot: &CurveSnapshot) {
    let current: Vec<Observer> = observers
        .borrow()
        .entries
        .iter()
        .map(|(_, o)| Rc::clone(o))
        .collect();
    for observer in current {
        let Ok(mut observer) = observer.try_borrow_mut() else {
            continue;
        };
        (&mut *observer)(snapshot);
    }
}

/// Handle returned by [`CurveModel::subscribe`]; dropping it unsubscribes
#[must_use = "dropping a Subscription unsubscribes the observer"]
pub struct Subscription {
    observers: Weak<RefCell<Observers>>,
    id: Option<u64>,
}

impl Subscription {
    /// Unsubscribe now
    pub fn dispose(mut self) {
        self.release();
    }

    /// Keep the observer registered for the lifetime of the model
    pub fn detach(mut self) {
        self.id = None;
    }

    fn release(&mut self) {
        if let (Some(id), Some(observers)) = (self.id.take(), self.observers.upgrade()) {
            observers.borrow_mut().remove(id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

/// A spring-driven cubic Bézier bound to a frame clock
pub struct CurveModel {
    state: Rc<RefCell<CurveState>>,
    observers: Rc<RefCell<Observers>>,
    driver: FrameDriver,
}

impl CurveModel {
    pub fn new(clock: Box<dyn FrameClock>) -> Self {
        Self::with_physics(clock, PhysicsConfig::default())
    }

    pub fn with_physics(clock: Box<dyn FrameClock>, physics: PhysicsConfig) -> Self {
        Self {
            state: Rc::new(RefCell::new(CurveState::new(physics))),
            observers: Rc::new(RefCell::new(Observers::default())),
            driver: FrameDriver::new(clock),
        }
    }

    /// Set the drawing size and run the layout rule
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.state.borrow_mut().set_size(Size::new(width, height));
    }

    pub fn size(&self) -> Size {
        self.state.borrow().size
    }

    pub fn set_target1(&mut self, p: Vec2) {
        self.state.borrow_mut().targets.target1 = p;
    }

    pub fn set_target2(&mut self, p: Vec2) {
        self.state.borrow_mut().targets.target2 = p;
    }

    /// Overwrite both targets at once
    pub fn set_targets(&mut self, target1: Vec2, target2: Vec2) {
        self.state.borrow_mut().targets = Targets { target1, target2 };
    }

    pub fn targets(&self) -> Targets {
        self.state.borrow().targets
    }

    pub fn set_k(&mut self, k: f32) {
        self.state.borrow_mut().physics.k = k;
    }

    pub fn set_damping(&mut self, damping: f32) {
        self.state.borrow_mut().physics.damping = damping;
    }

    pub fn set_physics(&mut self, physics: PhysicsConfig) {
        self.state.borrow_mut().physics = physics;
    }

    pub fn physics(&self) -> PhysicsConfig {
        self.state.borrow().physics
    }

    /// Current state of the dynamic points `(P1, P2)`
    pub fn springs(&self) -> (SpringState, SpringState) {
        let state = self.state.borrow();
        (state.spring1, state.spring2)
    }

    /// Place the dynamic points directly, e.g. to snap them to a pose
    pub fn set_springs(&mut self, spring1: SpringState, spring2: SpringState) {
        let mut state = self.state.borrow_mut();
        state.spring1 = spring1;
        state.spring2 = spring2;
    }

    /// Arm the frame driver; re-arming replaces the previous ticker
    ///
    /// Fails only when the host has no display refresh. Sampling still works.
    pub fn start(&mut self) -> Result<()> {
        let state = Rc::clone(&self.state);
        let observers = Rc::clone(&self.observers);
        let mut timer = FrameTimer::new();

        self.driver.start(Box::new(move |timestamp| {
            let dt = timer.delta(timestamp);
            let snapshot = {
                let mut state = state.borrow_mut();
                state.step(dt);
                state.snapshot()
            };
            notify(&observers, &snapshot);
        }))
    }

    pub fn stop(&mut self) {
        self.driver.stop();
    }

    pub fn phase(&self) -> DriverPhase {
        self.driver.phase()
    }

    pub fn is_running(&self) -> bool {
        self.driver.is_running()
    }

    /// Advance one step by hand, bypassing the clock, and notify observers
    pub fn tick(&mut self, dt: f32) {
        let snapshot = {
            let mut state = self.state.borrow_mut();
            state.step(dt);
            state.snapshot()
        };
        notify(&self.observers, &snapshot);
    }

    /// `n + 1` points `B(i/n)`; empty until a positive size is set
    pub fn sample_curve(&self, n: usize) -> Vec<Vec2> {
        self.snapshot().sample_curve(n)
    }

    /// `n + 1` tangent segments; empty until a positive size is set
    pub fn sample_tangents(&self, n: usize, length: f32) -> Vec<(Vec2, Vec2)> {
        self.snapshot().sample_tangents(n, length)
    }

    pub fn control_points(&self) -> CubicBezier {
        self.state.borrow().control_points()
    }

    pub fn snapshot(&self) -> CurveSnapshot {
        self.state.borrow().snapshot()
    }

    /// Register a frame-ready observer
    pub fn subscribe(&mut self, observer: impl FnMut(&CurveSnapshot) + 'static) -> Subscription {
        let observer: Observer = Rc::new(RefCell::new(observer));
        let id = self.observers.borrow_mut().add(observer);
        Subscription {
            observers: Rc::downgrade(&self.observers),
            id: Some(id),
        }
    }

    pub fn observer_count(&self) -> usize {
        self.observers.borrow().entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::HeadlessClock;
    use std::cell::Cell;

    fn model() -> (CurveModel, HeadlessClock) {
        let clock = HeadlessClock::new();
        let model = CurveModel::new(Box::new(clock.clone()));
        (model, clock)
    }

    #[test]
    fn test_new_model_is_zeroed() {
        let (model, _) = model();
        assert_eq!(model.control_points(), CubicBezier::default());
        assert_eq!(model.targets(), Targets::default());
        assert!(model.sample_curve(100).is_empty());
        assert!(!model.is_running());
    }

    #[test]
    fn test_setters() {
        let (mut model, _) = model();
        model.set_k(0.5);
        model.set_damping(0.25);
        assert_eq!(model.physics(), PhysicsConfig { k: 0.5, damping: 0.25 });

        model.set_physics(PhysicsConfig { k: 2.0, damping: 1.5 });
        assert_eq!(model.physics(), PhysicsConfig { k: 2.0, damping: 1.5 });

        model.set_target1(Vec2::new(-50.0, 9000.0));
        model.set_target2(Vec2::new(1.0, 2.0));
        assert_eq!(model.targets().target1, Vec2::new(-50.0, 9000.0));
        assert_eq!(model.targets().target2, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_tick_notifies_after_both_advances() {
        let (mut model, clock) = model();
        model.set_size(1000.0, 500.0);
        model.set_target1(Vec2::new(400.0, 125.0));
        model.set_target2(Vec2::new(600.0, 375.0));

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _sub = model.subscribe(move |snap| sink.borrow_mut().push(*snap));

        model.start().unwrap();
        clock.fire(0.0);
        clock.fire(1.0 / 60.0);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        // First tick only primes the timer
        assert_eq!(seen[0].curve.p1, Vec2::new(300.0, 125.0));
        // Second tick moved both points
        assert!(seen[1].curve.p1.x > 300.0);
        assert!(seen[1].curve.p2.x < 700.0);
        assert_eq!(seen[1].curve, model.control_points());
    }

    #[test]
    fn test_physics_change_applies_next_tick() {
        let (mut model, clock) = model();
        model.set_size(1000.0, 500.0);
        model.set_target1(Vec2::new(400.0, 125.0));
        model.set_k(0.0);
        model.set_damping(0.0);
        model.start().unwrap();

        clock.fire(0.0);
        clock.fire(1.0 / 60.0);
        assert_eq!(model.springs().0.pos, Vec2::new(300.0, 125.0));

        model.set_k(0.12);
        clock.fire(2.0 / 60.0);
        assert!(model.springs().0.pos.x > 300.0);
    }

    #[test]
    fn test_dispose_and_drop_unsubscribe() {
        let (mut model, _) = model();
        let count = Rc::new(Cell::new(0));

        let c = Rc::clone(&count);
        let a = model.subscribe(move |_| c.set(c.get() + 1));
        let c = Rc::clone(&count);
        let b = model.subscribe(move |_| c.set(c.get() + 10));
        assert_eq!(model.observer_count(), 2);

        model.tick(0.0);
        assert_eq!(count.get(), 11);

        a.dispose();
        drop(b);
        assert_eq!(model.observer_count(), 0);
        model.tick(0.0);
        assert_eq!(count.get(), 11);
    }

    #[test]
    fn test_detached_observer_survives_handle() {
        let (mut model, _) = model();
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        model.subscribe(move |_| c.set(c.get() + 1)).detach();

        model.tick(0.0);
        assert_eq!(count.get(), 1);
        assert_eq!(model.observer_count(), 1);
    }

    #[test]
    fn test_subscription_outlives_model() {
        let (mut model, _) = model();
        let sub = model.subscribe(|_| {});
        drop(model);
        drop(sub);
    }

    #[test]
    fn test_observer_may_stop_model() {
        let clock = HeadlessClock::new();
        let model = Rc::new(RefCell::new(CurveModel::new(Box::new(clock.clone()))));
        model.borrow_mut().set_size(1000.0, 500.0);

        let handle = Rc::downgrade(&model);
        model
            .borrow_mut()
            .subscribe(move |_| {
                if let Some(m) = handle.upgrade() {
                    m.borrow_mut().stop();
                }
            })
            .detach();

        model.borrow_mut().start().unwrap();
        assert!(clock.fire(0.0));
        assert!(!model.borrow().is_running());
        assert!(!clock.fire(1.0));
    }

    #[test]
    fn test_observer_may_tick_model() {
        let clock = HeadlessClock::new();
        let model = Rc::new(RefCell::new(CurveModel::new(Box::new(clock.clone()))));
        model.borrow_mut().set_size(1000.0, 500.0);
        model.borrow_mut().set_target1(Vec2::new(400.0, 125.0));

        let calls = Rc::new(Cell::new(0));
        let c = Rc::clone(&calls);
        let handle = Rc::downgrade(&model);
        model
            .borrow_mut()
            .subscribe(move |_| {
                c.set(c.get() + 1);
                if let (1, Some(m)) = (c.get(), handle.upgrade()) {
                    m.borrow_mut().tick(1.0 / 60.0);
                }
            })
            .detach();

        let other = Rc::new(Cell::new(0));
        let o = Rc::clone(&other);
        model
            .borrow_mut()
            .subscribe(move |_| o.set(o.get() + 1))
            .detach();

        model.borrow_mut().start().unwrap();
        assert!(clock.fire(0.0));

        // The nested tick skipped the running observer but reached the other
        assert_eq!(calls.get(), 1);
        assert_eq!(other.get(), 2);
        assert!(model.borrow().springs().0.pos.x > 300.0);

        assert!(clock.fire(1.0 / 60.0));
        assert_eq!(calls.get(), 2);
        assert_eq!(other.get(), 3);
    }
}
