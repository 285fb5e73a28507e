//! Time-based animations with easing curves and spring physics.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use sheetpose_ui_graphics::Color;

use crate::frame_clock::{FrameCallbackRegistration, FrameClock};

/// Trait for types that can be linearly interpolated.
pub trait Lerp {
    fn lerp(&self, target: &Self, fraction: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        self + (target - self) * fraction
    }
}

impl Lerp for f64 {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        self + (target - self) * fraction as f64
    }
}

impl Lerp for Color {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        Color(
            self.0.lerp(&target.0, fraction),
            self.1.lerp(&target.1, fraction),
            self.2.lerp(&target.2, fraction),
            self.3.lerp(&target.3, fraction),
        )
    }
}

/// Trait for values that can participate in spring animations.
pub trait SpringScalar: Lerp + Clone {
    /// Convert the value to `f32` for physics calculations.
    fn to_f32(&self) -> f32;

    /// Compute the current progress between the start and target values.
    fn spring_progress(start: &Self, target: &Self, current: &Self) -> f32 {
        let start_val = start.to_f32();
        let target_val = target.to_f32();
        let current_val = current.to_f32();

        if (target_val - start_val).abs() < f32::EPSILON {
            1.0
        } else {
            (current_val - start_val) / (target_val - start_val)
        }
    }

    /// Determine whether the current value is close enough to the target to
    /// consider the spring finished.
    fn is_near_target(current: &Self, target: &Self, threshold: f32) -> bool {
        (current.to_f32() - target.to_f32()).abs() < threshold
    }
}

impl SpringScalar for f32 {
    fn to_f32(&self) -> f32 {
        *self
    }
}

impl SpringScalar for f64 {
    fn to_f32(&self) -> f32 {
        *self as f32
    }
}

/// Easing functions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    /// Linear interpolation (no easing).
    Linear,
    /// Ease in using cubic curve.
    EaseIn,
    /// Ease out using cubic curve.
    EaseOut,
    /// Ease in and out using cubic curve.
    EaseInOut,
    /// Fast out, slow in (material design standard).
    FastOutSlowIn,
}

impl Easing {
    /// Apply the easing function to a linear fraction [0, 1].
    pub fn transform(&self, fraction: f32) -> f32 {
        match self {
            Easing::Linear => fraction,
            Easing::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, fraction),
            Easing::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, fraction),
            Easing::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, fraction),
            Easing::FastOutSlowIn => cubic_bezier(0.4, 0.0, 0.2, 1.0, fraction),
        }
    }
}

/// Cubic bezier curve approximation for easing.
pub fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, fraction: f32) -> f32 {
    if fraction <= 0.0 {
        return 0.0;
    }
    if fraction >= 1.0 {
        return 1.0;
    }

    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;

    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;

    fn sample_curve(a: f32, b: f32, c: f32, t: f32) -> f32 {
        ((a * t + b) * t + c) * t
    }

    fn sample_derivative(a: f32, b: f32, c: f32, t: f32) -> f32 {
        (3.0 * a * t + 2.0 * b) * t + c
    }

    // Newton-Raphson for the parametric `t` matching the x fraction, clamped
    // to [0, 1].
    let mut t = fraction;
    let mut newton_success = false;
    for _ in 0..8 {
        let x = sample_curve(ax, bx, cx, t) - fraction;
        if x.abs() < 1e-6 {
            newton_success = true;
            break;
        }
        let dx = sample_derivative(ax, bx, cx, t);
        if dx.abs() < 1e-6 {
            break;
        }
        t = (t - x / dx).clamp(0.0, 1.0);
    }

    if !newton_success {
        let mut t0 = 0.0;
        let mut t1 = 1.0;
        t = fraction;
        for _ in 0..16 {
            let x = sample_curve(ax, bx, cx, t);
            let delta = x - fraction;
            if delta.abs() < 1e-6 {
                break;
            }
            if delta > 0.0 {
                t1 = t;
            } else {
                t0 = t;
            }
            t = 0.5 * (t0 + t1);
        }
    }

    sample_curve(ay, by, cy, t)
}

/// Animation specification combining duration and easing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSpec {
    /// Duration in milliseconds.
    pub duration_millis: u64,
    /// Easing function to apply.
    pub easing: Easing,
    /// Delay before starting animation in milliseconds.
    pub delay_millis: u64,
}

impl AnimationSpec {
    /// Create a tween animation with duration and easing.
    pub fn tween(duration_millis: u64, easing: Easing) -> Self {
        Self {
            duration_millis,
            easing,
            delay_millis: 0,
        }
    }

    /// Create a linear tween animation.
    pub fn linear(duration_millis: u64) -> Self {
        Self::tween(duration_millis, Easing::Linear)
    }

    /// Create a tween from a [`Duration`], rounded to whole milliseconds.
    pub fn from_duration(duration: Duration, easing: Easing) -> Self {
        Self::tween(duration.as_millis() as u64, easing)
    }

    /// Add a delay before the animation starts.
    pub fn with_delay(mut self, delay_millis: u64) -> Self {
        self.delay_millis = delay_millis;
        self
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_millis)
    }
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self::tween(300, Easing::FastOutSlowIn)
    }
}

/// Spring animation configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringSpec {
    /// Damping ratio. 1.0 = critically damped, < 1.0 = under-damped (bouncy), > 1.0 = over-damped.
    pub damping_ratio: f32,
    /// Stiffness constant. Higher values = faster animation.
    pub stiffness: f32,
    /// Velocity threshold to stop animation.
    pub velocity_threshold: f32,
    /// Position threshold to stop animation.
    pub position_threshold: f32,
}

impl SpringSpec {
    /// Critically damped spring.
    pub fn default_spring() -> Self {
        Self {
            damping_ratio: 1.0,
            stiffness: 1500.0,
            velocity_threshold: 0.01,
            position_threshold: 0.001,
        }
    }

    /// Create a bouncy spring.
    pub fn bouncy() -> Self {
        Self {
            damping_ratio: 0.5,
            ..Self::default_spring()
        }
    }

    /// Create a stiff spring (fast, no bounce).
    pub fn stiff() -> Self {
        Self {
            stiffness: 3000.0,
            ..Self::default_spring()
        }
    }

    /// Runs the spring `speed` times faster without changing its shape.
    pub fn sped_up(mut self, speed: f32) -> Self {
        self.stiffness *= speed * speed;
        self
    }
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self::default_spring()
    }
}

/// Animation type specification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationType {
    /// Time-based tween animation.
    Tween(AnimationSpec),
    /// Physics-based spring animation.
    Spring(SpringSpec),
}

impl Default for AnimationType {
    fn default() -> Self {
        AnimationType::Tween(AnimationSpec::default())
    }
}

/// Why an animation stopped delivering frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationEnd {
    /// The value reached its target.
    Finished,
    /// A new target, a snap, or a stop replaced the running animation.
    Interrupted,
}

type UpdateListener<T> = Rc<dyn Fn(&T)>;
type EndListener = Box<dyn FnOnce(AnimationEnd)>;

/// Generic animatable value holder driven by a [`FrameClock`].
///
/// Every frame the new value is pushed to the update listener. The end
/// listener passed to [`Animatable::animate_to`] fires exactly once, either
/// when the target is reached or when the animation is interrupted.
pub struct Animatable<T: SpringScalar + 'static> {
    inner: Rc<RefCell<AnimatableInner<T>>>,
}

struct AnimatableInner<T: SpringScalar + 'static> {
    clock: FrameClock,
    current: T,
    velocity: f32,
    start: T,
    target: T,
    animation_type: AnimationType,
    start_time_nanos: Option<u64>,
    last_frame_nanos: Option<u64>,
    registration: Option<FrameCallbackRegistration>,
    generation: u64,
    on_update: Option<UpdateListener<T>>,
    on_end: Option<EndListener>,
}

impl<T: SpringScalar + 'static> Animatable<T> {
    /// Create a new animatable with the given initial value.
    pub fn new(initial: T, clock: FrameClock) -> Self {
        let inner = AnimatableInner {
            clock,
            current: initial.clone(),
            velocity: 0.0,
            start: initial.clone(),
            target: initial,
            animation_type: AnimationType::default(),
            start_time_nanos: None,
            last_frame_nanos: None,
            registration: None,
            generation: 0,
            on_update: None,
            on_end: None,
        };
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    /// Install the listener that receives every animated value.
    pub fn set_on_update(&self, listener: impl Fn(&T) + 'static) {
        self.inner.borrow_mut().on_update = Some(Rc::new(listener));
    }

    /// Animate to the target value using the specified animation.
    pub fn animate_to(
        &self,
        target: T,
        animation: AnimationType,
        on_end: impl FnOnce(AnimationEnd) + 'static,
    ) {
        let interrupted = {
            let mut inner = self.inner.borrow_mut();
            let interrupted = inner.stop_frames();

            inner.start = inner.current.clone();
            inner.target = target;
            inner.animation_type = animation;
            inner.start_time_nanos = None;
            inner.last_frame_nanos = None;
            inner.velocity = 0.0;
            inner.on_end = Some(Box::new(on_end));
            interrupted
        };

        if let Some(on_end) = interrupted {
            on_end(AnimationEnd::Interrupted);
        }
        Self::schedule_frame(&self.inner);
    }

    /// Snap immediately to the target value without animating.
    pub fn snap_to(&self, target: T) {
        let (interrupted, listener) = {
            let mut inner = self.inner.borrow_mut();
            let interrupted = inner.stop_frames();
            inner.current = target.clone();
            inner.start = target.clone();
            inner.target = target.clone();
            inner.start_time_nanos = None;
            inner.velocity = 0.0;
            (interrupted, inner.on_update.clone())
        };
        if let Some(listener) = listener {
            listener(&target);
        }
        if let Some(on_end) = interrupted {
            on_end(AnimationEnd::Interrupted);
        }
    }

    /// Stop the running animation, leaving the value where it is.
    pub fn stop(&self) {
        let interrupted = self.inner.borrow_mut().stop_frames();
        if let Some(on_end) = interrupted {
            on_end(AnimationEnd::Interrupted);
        }
    }

    pub fn value(&self) -> T {
        self.inner.borrow().current.clone()
    }

    /// Return the current animation target.
    pub fn target(&self) -> T {
        self.inner.borrow().target.clone()
    }

    /// Return the animation spec currently driving this animatable.
    pub fn animation_type(&self) -> AnimationType {
        self.inner.borrow().animation_type
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().registration.is_some()
    }

    fn schedule_frame(this: &Rc<RefCell<AnimatableInner<T>>>) {
        let (clock, generation) = {
            let inner = this.borrow();
            if inner.registration.is_some() {
                return;
            }
            (inner.clock.clone(), inner.generation)
        };
        let weak = Rc::downgrade(this);
        let registration = clock.with_frame_nanos(move |time| {
            if let Some(strong) = weak.upgrade() {
                Self::on_frame(&strong, generation, time);
            }
        });
        this.borrow_mut().registration = Some(registration);
    }

    fn on_frame(this: &Rc<RefCell<AnimatableInner<T>>>, generation: u64, frame_time_nanos: u64) {
        let (value, listener, finished) = {
            let mut inner = this.borrow_mut();
            if inner.generation != generation {
                // Stale callback from an animation that was replaced mid-drain.
                return;
            }
            inner.registration = None;
            let finished = inner.advance(frame_time_nanos);
            let finished = if finished {
                inner.generation += 1;
                inner.on_end.take()
            } else {
                None
            };
            (inner.current.clone(), inner.on_update.clone(), finished)
        };

        if let Some(listener) = listener {
            listener(&value);
        }
        match finished {
            Some(on_end) => on_end(AnimationEnd::Finished),
            None => {
                let still_current = this.borrow().generation == generation;
                if still_current {
                    Self::schedule_frame(this);
                }
            }
        }
    }
}

impl<T: SpringScalar + 'static> AnimatableInner<T> {
    /// Cancels pending frames and hands back the end listener of the
    /// interrupted animation, if one was running.
    fn stop_frames(&mut self) -> Option<EndListener> {
        self.generation += 1;
        if let Some(registration) = self.registration.take() {
            registration.cancel();
        }
        self.on_end.take()
    }

    /// Moves `current` toward `target` for one frame. Returns `true` once the
    /// target has been reached.
    fn advance(&mut self, frame_time_nanos: u64) -> bool {
        match self.animation_type {
            AnimationType::Tween(spec) => {
                let start_time = *self.start_time_nanos.get_or_insert(frame_time_nanos);
                let elapsed_nanos = frame_time_nanos.saturating_sub(start_time);
                let delay_nanos = spec.delay_millis * 1_000_000;
                if elapsed_nanos < delay_nanos {
                    return false;
                }

                let animation_elapsed = elapsed_nanos - delay_nanos;
                let duration_nanos = spec.duration_millis * 1_000_000;
                let linear_progress = if duration_nanos == 0 {
                    1.0
                } else {
                    (animation_elapsed as f32 / duration_nanos as f32).clamp(0.0, 1.0)
                };
                let progress = spec.easing.transform(linear_progress);
                self.current = self.start.lerp(&self.target, progress);

                if linear_progress >= 1.0 {
                    self.settle();
                    return true;
                }
                false
            }
            AnimationType::Spring(spec) => {
                let last = *self.last_frame_nanos.get_or_insert(frame_time_nanos);
                self.last_frame_nanos = Some(frame_time_nanos);
                let dt = frame_time_nanos.saturating_sub(last) as f32 / 1_000_000_000.0;

                // Position is tracked as progress from start (0) to target (1).
                let stiffness = spec.stiffness;
                let damping = 2.0 * spec.damping_ratio * stiffness.sqrt();
                let timestep: f32 = 0.016;
                let mut simulated = 0.0f32;
                while simulated < dt {
                    let step = timestep.min(dt - simulated);
                    let current_progress =
                        T::spring_progress(&self.start, &self.target, &self.current);
                    let displacement = current_progress - 1.0;
                    let spring_force = -stiffness * displacement - damping * self.velocity;

                    // Semi-implicit Euler.
                    self.velocity += spring_force * step;
                    let new_progress = current_progress + self.velocity * step;
                    self.current = self.start.lerp(&self.target, new_progress.clamp(0.0, 2.0));
                    simulated += step;
                }

                let at_rest = self.velocity.abs() < spec.velocity_threshold;
                let near_target =
                    T::is_near_target(&self.current, &self.target, spec.position_threshold);
                if at_rest && near_target {
                    self.settle();
                    return true;
                }
                false
            }
        }
    }

    fn settle(&mut self) {
        self.current = self.target.clone();
        self.start = self.target.clone();
        self.start_time_nanos = None;
        self.last_frame_nanos = None;
        self.velocity = 0.0;
    }
}

impl<T: SpringScalar + 'static> Clone for Animatable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

#[cfg(test)]
#[path = "tests/animation_tests.rs"]
mod tests;
