//! A transition scrubbed by a gesture.
//!
//! The controller exists before the transition it drives: the host hands it
//! the captured [`SheetAnimation`] once the dismissal actually starts. Until
//! then, progress and finish/cancel requests are buffered.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use sheetpose_animation::{Animatable, AnimationEnd, AnimationSpec, AnimationType, FrameClock};

use crate::animator::SheetAnimation;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractivePhase {
    /// Not yet attached to a running transition.
    Waiting,
    /// Progress follows [`InteractiveTransition::update`].
    Scrubbing,
    Finishing,
    Cancelling,
    Done,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Resolution {
    Finish,
    Cancel,
}

struct InteractiveState {
    phase: InteractivePhase,
    percent: f32,
    pending: Option<Resolution>,
    animation: Option<Rc<SheetAnimation>>,
    motion: Option<Animatable<f32>>,
}

pub struct InteractiveTransition {
    clock: FrameClock,
    completion_speed: f32,
    completion_curve: AnimationType,
    state: RefCell<InteractiveState>,
    this: Weak<InteractiveTransition>,
}

impl InteractiveTransition {
    pub fn new(clock: FrameClock, completion_speed: f32, completion_curve: AnimationType) -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            clock,
            completion_speed,
            completion_curve,
            state: RefCell::new(InteractiveState {
                phase: InteractivePhase::Waiting,
                percent: 0.0,
                pending: None,
                animation: None,
                motion: None,
            }),
            this: this.clone(),
        })
    }

    pub fn phase(&self) -> InteractivePhase {
        self.state.borrow().phase
    }

    pub fn percent_complete(&self) -> f32 {
        self.state.borrow().percent
    }

    pub fn completion_speed(&self) -> f32 {
        self.completion_speed
    }

    /// Whether a finish or cancel motion is still running.
    pub fn is_settling(&self) -> bool {
        self.state
            .borrow()
            .motion
            .as_ref()
            .is_some_and(|motion| motion.is_running())
    }

    /// Attaches the transition to drive. Buffered progress is applied at once
    /// and a buffered finish or cancel starts its motion.
    pub fn start_interactive_transition(&self, animation: SheetAnimation) {
        let animation = Rc::new(animation);
        let (percent, pending) = {
            let mut state = self.state.borrow_mut();
            if state.phase != InteractivePhase::Waiting {
                log::warn!("interactive transition started twice");
                return;
            }
            state.phase = InteractivePhase::Scrubbing;
            state.animation = Some(Rc::clone(&animation));
            (state.percent, state.pending.take())
        };
        animation.apply(percent);
        match pending {
            Some(Resolution::Finish) => self.finish(),
            Some(Resolution::Cancel) => self.cancel(),
            None => {}
        }
    }

    /// Moves the transition to `percent`, clamped to `0.0..=1.0`.
    pub fn update(&self, percent: f32) {
        let percent = percent.clamp(0.0, 1.0);
        let animation = {
            let mut state = self.state.borrow_mut();
            match state.phase {
                InteractivePhase::Waiting if state.pending.is_none() => {
                    state.percent = percent;
                    return;
                }
                InteractivePhase::Scrubbing => {
                    state.percent = percent;
                    state.animation.clone()
                }
                _ => return,
            }
        };
        if let Some(animation) = animation {
            animation.apply(percent);
        }
    }

    /// Runs the remainder of the transition to completion.
    pub fn finish(&self) {
        self.resolve(Resolution::Finish);
    }

    /// Runs the transition back to its start and reports it as cancelled.
    pub fn cancel(&self) {
        self.resolve(Resolution::Cancel);
    }

    fn resolve(&self, resolution: Resolution) {
        let (animation, from) = {
            let mut state = self.state.borrow_mut();
            match state.phase {
                InteractivePhase::Waiting => {
                    state.pending.get_or_insert(resolution);
                    return;
                }
                InteractivePhase::Scrubbing => {}
                _ => return,
            }
            let Some(animation) = state.animation.clone() else {
                return;
            };
            state.phase = match resolution {
                Resolution::Finish => InteractivePhase::Finishing,
                Resolution::Cancel => InteractivePhase::Cancelling,
            };
            (animation, state.percent)
        };

        let target = match resolution {
            Resolution::Finish => 1.0,
            Resolution::Cancel => {
                animation.context().cancel_interactive_transition();
                0.0
            }
        };
        log::debug!("resolving interactive transition {resolution:?} from {from:.3}");

        let curve = self.completion_animation(&animation, from, target);
        let motion = Animatable::new(from, self.clock.clone());
        let scrubbed = Rc::clone(&animation);
        let this = self.this.clone();
        motion.set_on_update(move |percent| {
            let percent = percent.clamp(0.0, 1.0);
            scrubbed.apply(percent);
            if let Some(this) = this.upgrade() {
                this.state.borrow_mut().percent = percent;
            }
        });
        let this = self.this.clone();
        motion.animate_to(target, curve, move |end| {
            if end == AnimationEnd::Interrupted {
                return;
            }
            if let Some(this) = this.upgrade() {
                this.state.borrow_mut().phase = InteractivePhase::Done;
            }
            animation.complete();
        });
        self.state.borrow_mut().motion = Some(motion);
    }

    /// Spring completions are sped up as a whole; tweens cover only the
    /// remaining share of the transition's duration.
    fn completion_animation(&self, animation: &SheetAnimation, from: f32, to: f32) -> AnimationType {
        let speed = self.completion_speed;
        match self.completion_curve {
            AnimationType::Spring(spec) => AnimationType::Spring(spec.sped_up(speed)),
            AnimationType::Tween(spec) => {
                let remaining = (to - from).abs();
                let base = animation.spec().duration_millis as f32;
                let millis = (base * remaining / speed).round() as u64;
                AnimationType::Tween(AnimationSpec {
                    duration_millis: millis,
                    ..spec
                })
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/interactive_tests.rs"]
mod tests;
