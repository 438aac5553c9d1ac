//! A single frame-driven value in `[0, 1]`.
//!
//! At most one motion is active at a time. Starting a motion, setting the
//! value directly, or stopping cancels the previous motion: its frame
//! registration is dropped and its [`MotionCompletion`] resolves to
//! [`MotionOutcome::Cancelled`] without running `when_finished` callbacks.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use slidepanel_core::{FrameCallbackRegistration, FrameClock};

use crate::animation::{AnimationSpec, SpringSpec};
use crate::simulation::{Simulation, SpringSimulation, TweenSimulation};

pub const LOWER_BOUND: f64 = 0.0;
pub const UPPER_BOUND: f64 = 1.0;

pub type ListenerId = u64;

/// Bound reached by a value change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Lower,
    Upper,
}

/// How a motion ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionOutcome {
    Finished,
    Cancelled,
}

struct CompletionState {
    outcome: Option<MotionOutcome>,
    waker: Option<Waker>,
    on_finished: Vec<Box<dyn FnOnce()>>,
}

/// Completion signal for one motion.
///
/// Awaiting it yields the [`MotionOutcome`]; clones share the same signal.
#[derive(Clone)]
pub struct MotionCompletion {
    state: Rc<RefCell<CompletionState>>,
}

impl MotionCompletion {
    fn with_outcome(outcome: Option<MotionOutcome>) -> Self {
        Self {
            state: Rc::new(RefCell::new(CompletionState {
                outcome,
                waker: None,
                on_finished: Vec::new(),
            })),
        }
    }

    fn pending() -> Self {
        Self::with_outcome(None)
    }

    /// A completion that already finished.
    pub fn finished() -> Self {
        Self::with_outcome(Some(MotionOutcome::Finished))
    }

    pub fn outcome(&self) -> Option<MotionOutcome> {
        self.state.borrow().outcome
    }

    pub fn is_pending(&self) -> bool {
        self.outcome().is_none()
    }

    pub fn is_finished(&self) -> bool {
        self.outcome() == Some(MotionOutcome::Finished)
    }

    pub fn is_cancelled(&self) -> bool {
        self.outcome() == Some(MotionOutcome::Cancelled)
    }

    /// Runs `callback` once the motion finishes naturally.
    ///
    /// Runs immediately if it already finished; never runs if it was cancelled.
    pub fn when_finished(&self, callback: impl FnOnce() + 'static) {
        let outcome = self.outcome();
        match outcome {
            Some(MotionOutcome::Finished) => callback(),
            Some(MotionOutcome::Cancelled) => {}
            None => self.state.borrow_mut().on_finished.push(Box::new(callback)),
        }
    }

    fn resolve(&self, outcome: MotionOutcome) {
        let (callbacks, waker) = {
            let mut state = self.state.borrow_mut();
            if state.outcome.is_some() {
                return;
            }
            state.outcome = Some(outcome);
            (std::mem::take(&mut state.on_finished), state.waker.take())
        };
        if outcome == MotionOutcome::Finished {
            for callback in callbacks {
                callback();
            }
        }
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

impl Future for MotionCompletion {
    type Output = MotionOutcome;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.state.borrow_mut();
        match state.outcome {
            Some(outcome) => Poll::Ready(outcome),
            None => {
                state.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

impl std::fmt::Debug for MotionCompletion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MotionCompletion")
            .field("outcome", &self.outcome())
            .finish()
    }
}

struct ActiveMotion {
    generation: u64,
    simulation: Box<dyn Simulation>,
    start_time_nanos: Option<u64>,
    registration: Option<FrameCallbackRegistration>,
    completion: MotionCompletion,
}

enum FrameStep {
    Running(f64),
    Finished(f64, MotionCompletion),
}

struct AnimationValueInner {
    value: Cell<f64>,
    clock: FrameClock,
    motion: RefCell<Option<ActiveMotion>>,
    next_generation: Cell<u64>,
    listeners: RefCell<Vec<(ListenerId, Rc<dyn Fn(f64)>)>>,
    bound_listeners: RefCell<Vec<(ListenerId, Rc<dyn Fn(Bound)>)>>,
    next_listener_id: Cell<ListenerId>,
}

impl Drop for AnimationValueInner {
    fn drop(&mut self) {
        if let Some(motion) = self.motion.get_mut().take() {
            drop(motion.registration);
            motion.completion.resolve(MotionOutcome::Cancelled);
        }
    }
}

/// Continuous value in `[0, 1]` driven directly, by tween, or by spring physics.
#[derive(Clone)]
pub struct AnimationValue {
    inner: Rc<AnimationValueInner>,
}

impl AnimationValue {
    pub fn new(initial: f64, clock: FrameClock) -> Self {
        Self {
            inner: Rc::new(AnimationValueInner {
                value: Cell::new(clamp_value(initial)),
                clock,
                motion: RefCell::new(None),
                next_generation: Cell::new(1),
                listeners: RefCell::new(Vec::new()),
                bound_listeners: RefCell::new(Vec::new()),
                next_listener_id: Cell::new(1),
            }),
        }
    }

    pub fn value(&self) -> f64 {
        self.inner.value.get()
    }

    pub fn is_animating(&self) -> bool {
        self.inner.motion.borrow().is_some()
    }

    /// Velocity of the active motion in units per second, zero at rest.
    pub fn velocity(&self) -> f64 {
        let Some(now) = self.inner.clock.runtime_handle().last_frame_nanos() else {
            return 0.0;
        };
        self.inner
            .motion
            .borrow()
            .as_ref()
            .map(|motion| {
                let start = motion.start_time_nanos.unwrap_or(now);
                motion
                    .simulation
                    .velocity_from_nanos(now.saturating_sub(start))
            })
            .unwrap_or(0.0)
    }

    /// Registers a listener called synchronously with every new value.
    pub fn add_listener(&self, listener: impl Fn(f64) + 'static) -> ListenerId {
        let id = self.next_listener_id();
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        id
    }

    /// Registers a listener called when the value arrives exactly at a bound.
    pub fn add_bound_listener(&self, listener: impl Fn(Bound) + 'static) -> ListenerId {
        let id = self.next_listener_id();
        self.inner
            .bound_listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        id
    }

    pub fn remove_listener(&self, id: ListenerId) {
        self.inner
            .listeners
            .borrow_mut()
            .retain(|(listener_id, _)| *listener_id != id);
        self.inner
            .bound_listeners
            .borrow_mut()
            .retain(|(listener_id, _)| *listener_id != id);
    }

    /// Cancels any motion and jumps to `value`, clamped to `[0, 1]`.
    pub fn set_immediate(&self, value: f64) {
        self.stop();
        Self::apply_value(&self.inner, value);
    }

    /// Cancels the active motion, leaving the value where it is.
    pub fn stop(&self) {
        let motion = self.inner.motion.borrow_mut().take();
        if let Some(motion) = motion {
            log::trace!("motion {} cancelled", motion.generation);
            drop(motion.registration);
            motion.completion.resolve(MotionOutcome::Cancelled);
        }
    }

    /// Cancels any motion and drops every listener.
    pub fn dispose(&self) {
        self.stop();
        self.inner.listeners.borrow_mut().clear();
        self.inner.bound_listeners.borrow_mut().clear();
    }

    /// Tweens to `target` (clamped to `[0, 1]`).
    pub fn animate_to(&self, target: f64, spec: AnimationSpec) -> MotionCompletion {
        let target = clamp_value(target);
        if spec.duration_millis == 0 || target == self.value() {
            self.set_immediate(target);
            return MotionCompletion::finished();
        }
        self.animate_with(Box::new(TweenSimulation::new(self.value(), target, spec)))
    }

    /// Flings with the default panel spring.
    pub fn fling(&self, velocity: f64) -> MotionCompletion {
        self.fling_with(SpringSpec::default(), velocity)
    }

    /// Springs toward the upper bound for non-negative velocity, else the lower bound.
    ///
    /// The spring aims just past the bound so the clamped value lands on it in finite time.
    pub fn fling_with(&self, spring: SpringSpec, velocity: f64) -> MotionCompletion {
        let velocity = if velocity.is_finite() { velocity } else { 0.0 };
        let overshoot = spring.position_threshold;
        let target = if velocity < 0.0 {
            LOWER_BOUND - overshoot
        } else {
            UPPER_BOUND + overshoot
        };
        self.animate_with(Box::new(SpringSimulation::new(
            spring,
            self.value(),
            target,
            velocity,
        )))
    }

    /// Springs from `from` to `to` seeded with `velocity`.
    pub fn run_spring(&self, spring: SpringSpec, from: f64, to: f64, velocity: f64) -> MotionCompletion {
        self.animate_with(Box::new(SpringSimulation::new(spring, from, to, velocity)))
    }

    /// Drives the value with an arbitrary simulation, replacing any active motion.
    pub fn animate_with(&self, simulation: Box<dyn Simulation>) -> MotionCompletion {
        self.stop();

        if let Some(rest) = settled_value(simulation.as_ref(), 0) {
            log::trace!("motion already at rest, snapping to {rest}");
            Self::apply_value(&self.inner, rest);
            return MotionCompletion::finished();
        }

        let generation = self.inner.next_generation.get();
        self.inner.next_generation.set(generation + 1);
        let completion = MotionCompletion::pending();
        *self.inner.motion.borrow_mut() = Some(ActiveMotion {
            generation,
            simulation,
            start_time_nanos: None,
            registration: None,
            completion: completion.clone(),
        });
        Self::schedule_frame(&self.inner, generation);
        completion
    }

    fn next_listener_id(&self) -> ListenerId {
        let id = self.inner.next_listener_id.get();
        self.inner.next_listener_id.set(id + 1);
        id
    }

    fn schedule_frame(inner: &Rc<AnimationValueInner>, generation: u64) {
        let weak = Rc::downgrade(inner);
        let registration = inner.clock.with_frame_nanos(move |time| {
            if let Some(strong) = weak.upgrade() {
                Self::on_frame(&strong, time, generation);
            }
        });
        let mut motion = inner.motion.borrow_mut();
        match motion.as_mut() {
            Some(active) if active.generation == generation => {
                active.registration = Some(registration);
            }
            _ => drop(registration),
        }
    }

    fn on_frame(inner: &Rc<AnimationValueInner>, frame_time_nanos: u64, generation: u64) {
        let step = {
            let mut slot = inner.motion.borrow_mut();
            let Some(motion) = slot.as_mut() else {
                return;
            };
            if motion.generation != generation {
                return;
            }
            motion.registration = None;
            let start = *motion.start_time_nanos.get_or_insert(frame_time_nanos);
            let play_time = frame_time_nanos.saturating_sub(start);

            let settled = settled_value(motion.simulation.as_ref(), play_time);
            let sampled = clamp_value(motion.simulation.value_from_nanos(play_time));

            match settled {
                Some(rest) => match slot.take() {
                    Some(done) => FrameStep::Finished(rest, done.completion),
                    None => return,
                },
                None => FrameStep::Running(sampled),
            }
        };

        match step {
            FrameStep::Finished(rest, completion) => {
                Self::apply_value(inner, rest);
                completion.resolve(MotionOutcome::Finished);
            }
            FrameStep::Running(value) => {
                Self::apply_value(inner, value);
                // A listener may have replaced or stopped this motion.
                let still_active = inner
                    .motion
                    .borrow()
                    .as_ref()
                    .is_some_and(|motion| motion.generation == generation);
                if still_active {
                    Self::schedule_frame(inner, generation);
                }
            }
        }
    }

    fn apply_value(inner: &Rc<AnimationValueInner>, value: f64) {
        let value = clamp_value(value);
        let previous = inner.value.replace(value);
        if previous == value {
            return;
        }

        let listeners: Vec<Rc<dyn Fn(f64)>> = inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(value);
        }

        let bound = if value == UPPER_BOUND {
            Some(Bound::Upper)
        } else if value == LOWER_BOUND {
            Some(Bound::Lower)
        } else {
            None
        };
        if let Some(bound) = bound {
            let listeners: Vec<Rc<dyn Fn(Bound)>> = inner
                .bound_listeners
                .borrow()
                .iter()
                .map(|(_, listener)| Rc::clone(listener))
                .collect();
            for listener in listeners {
                listener(bound);
            }
        }
    }
}

impl std::fmt::Debug for AnimationValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationValue")
            .field("value", &self.value())
            .field("is_animating", &self.is_animating())
            .finish()
    }
}

fn clamp_value(value: f64) -> f64 {
    if value.is_nan() {
        return LOWER_BOUND;
    }
    value.clamp(LOWER_BOUND, UPPER_BOUND)
}

/// Resting value if the simulation is done at `play_time`.
///
/// A simulation aimed past a bound is done as soon as its clamped value sits on that bound.
fn settled_value(simulation: &dyn Simulation, play_time: u64) -> Option<f64> {
    if simulation.is_finished(play_time) {
        return Some(clamp_value(simulation.end_value()));
    }
    let end = simulation.end_value();
    let current = clamp_value(simulation.value_from_nanos(play_time));
    if end > UPPER_BOUND && current >= UPPER_BOUND {
        Some(UPPER_BOUND)
    } else if end < LOWER_BOUND && current <= LOWER_BOUND {
        Some(LOWER_BOUND)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "tests/animation_value_tests.rs"]
mod tests;
