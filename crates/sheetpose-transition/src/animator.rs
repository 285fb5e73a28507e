//! Presentation and dismissal motion of a sheet.
//!
//! [`PresentationAnimator::animate_transition`] captures the start and end
//! frames of one transition and hands back a [`SheetAnimation`]. The host
//! either runs it on the clock ([`SheetAnimation::run`]) or passes it to an
//! [`InteractiveTransition`](crate::InteractiveTransition) that scrubs it.

use std::rc::Rc;
use std::time::Duration;

use sheetpose_animation::{
    Animatable, AnimationEnd, AnimationSpec, AnimationType, Easing, FrameClock, Lerp,
};
use sheetpose_ui_graphics::Color;

use crate::config::{CONTENT_EXTENT_PROPORTION, DIMMED_BACKGROUND, TRANSITION_DURATION};
use crate::context::TransitionContext;

/// The animated properties of a sheet at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SheetFrame {
    pub content_translation_y: f32,
    pub content_alpha: f32,
    pub background: Color,
}

impl SheetFrame {
    pub fn lerp(&self, target: &SheetFrame, fraction: f32) -> SheetFrame {
        SheetFrame {
            content_translation_y: self
                .content_translation_y
                .lerp(&target.content_translation_y, fraction),
            content_alpha: self.content_alpha.lerp(&target.content_alpha, fraction),
            background: self.background.lerp(&target.background, fraction),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PresentationAnimator {
    is_presenting: bool,
    interactive: bool,
}

impl PresentationAnimator {
    pub fn new(is_presenting: bool, interactive: bool) -> Self {
        Self {
            is_presenting,
            interactive,
        }
    }

    pub fn is_presenting(&self) -> bool {
        self.is_presenting
    }

    /// Whether the dismissal will be scrubbed by a drag.
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn transition_duration(&self) -> Duration {
        TRANSITION_DURATION
    }

    fn easing(&self) -> Easing {
        if self.is_presenting {
            Easing::EaseInOut
        } else {
            Easing::EaseOut
        }
    }

    /// Captures the transition's frames and puts the sheet in its start frame.
    ///
    /// # Panics
    ///
    /// Panics if the surface has no content view.
    pub fn animate_transition(&self, context: &Rc<TransitionContext>) -> SheetAnimation {
        let (from, to) = {
            let mut surface = context.surface().borrow_mut();
            let name = surface.name().to_owned();
            let background = surface.container().background;
            let Some(content) = surface.content_view_mut() else {
                panic!("{name} is not a bottom sheet: it has no content view");
            };
            let extent = content.frame.height * CONTENT_EXTENT_PROPORTION;

            let (from, to) = if self.is_presenting {
                let from = SheetFrame {
                    content_translation_y: extent,
                    content_alpha: content.layer.alpha,
                    background: Color::TRANSPARENT,
                };
                let to = SheetFrame {
                    content_translation_y: 0.0,
                    background: DIMMED_BACKGROUND,
                    ..from
                };
                (from, to)
            } else {
                let from = SheetFrame {
                    content_translation_y: content.layer.translation_y,
                    content_alpha: 1.0,
                    background,
                };
                let to = SheetFrame {
                    content_translation_y: extent,
                    content_alpha: 1.0,
                    background: Color::TRANSPARENT,
                };
                (from, to)
            };
            log::debug!(
                "{} {} over {extent}pt",
                name,
                if self.is_presenting { "presenting" } else { "dismissing" }
            );
            (from, to)
        };

        let animation = SheetAnimation {
            context: Rc::clone(context),
            from,
            to,
            spec: AnimationSpec::from_duration(self.transition_duration(), self.easing()),
        };
        animation.apply(0.0);
        animation
    }
}

/// One captured transition, addressable by linear progress.
pub struct SheetAnimation {
    context: Rc<TransitionContext>,
    from: SheetFrame,
    to: SheetFrame,
    spec: AnimationSpec,
}

impl SheetAnimation {
    pub fn context(&self) -> &Rc<TransitionContext> {
        &self.context
    }

    pub fn spec(&self) -> AnimationSpec {
        self.spec
    }

    /// Progress outside `0.0..=1.0`, such as a bouncing spring, is pinned
    /// to the end frames.
    pub fn frame_at(&self, fraction: f32) -> SheetFrame {
        self.from.lerp(&self.to, fraction.clamp(0.0, 1.0))
    }

    /// Writes the frame at `fraction` into the surface.
    pub fn apply(&self, fraction: f32) {
        let frame = self.frame_at(fraction);
        let mut surface = self.context.surface().borrow_mut();
        surface.container_mut().background = frame.background;
        if let Some(content) = surface.content_view_mut() {
            content.layer.translation_y = frame.content_translation_y;
            content.layer.alpha = frame.content_alpha;
        }
    }

    /// Reports the outcome to the host. A cancelled transition completes
    /// with `false`.
    pub fn complete(&self) {
        let context = &self.context;
        context.complete_transition(!context.transition_was_cancelled());
    }

    /// Drives the animation over its duration on `clock`.
    pub fn run(self, clock: &FrameClock) -> TimedTransition {
        let animation = Rc::new(self);
        let progress = Animatable::new(0.0f32, clock.clone());

        let target = Rc::clone(&animation);
        progress.set_on_update(move |fraction| target.apply(*fraction));

        let target = Rc::clone(&animation);
        progress.animate_to(
            1.0,
            AnimationType::Tween(animation.spec),
            move |end| match end {
                AnimationEnd::Finished => target.complete(),
                AnimationEnd::Interrupted => {
                    log::debug!("timed transition interrupted before completing");
                }
            },
        );
        TimedTransition {
            animation,
            progress,
        }
    }
}

/// A transition running on the frame clock. Dropping it stops the motion.
pub struct TimedTransition {
    animation: Rc<SheetAnimation>,
    progress: Animatable<f32>,
}

impl TimedTransition {
    pub fn animation(&self) -> &SheetAnimation {
        &self.animation
    }

    pub fn progress(&self) -> f32 {
        self.progress.value()
    }

    pub fn is_running(&self) -> bool {
        self.progress.is_running()
    }
}

#[cfg(test)]
#[path = "tests/animator_tests.rs"]
mod tests;
