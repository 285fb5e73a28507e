use super::*;

use std::cell::Cell;

use sheetpose_animation::{Easing, SpringSpec};
use sheetpose_ui_graphics::{Rect, Size};

use crate::animator::PresentationAnimator;
use crate::config::{SheetConfig, DIMMED_BACKGROUND};
use crate::context::{TransitionContext, TransitionKind};
use crate::surface::{shared, SharedSurface, SheetSurface};

const FRAME: u64 = 16_000_000;

struct Fixture {
    clock: FrameClock,
    surface: SharedSurface,
    result: Rc<Cell<Option<bool>>>,
}

impl Fixture {
    fn presented(height: f32) -> Self {
        let surface = shared(SheetSurface::new("sheet", height));
        {
            let mut surface = surface.borrow_mut();
            surface.layout(Rect::from_size(Size::new(390.0, 844.0)), &SheetConfig::default());
            surface.container_mut().background = DIMMED_BACKGROUND;
        }
        Self {
            clock: FrameClock::new(),
            surface,
            result: Rc::new(Cell::new(None)),
        }
    }

    fn dismissal(&self) -> SheetAnimation {
        let result = Rc::clone(&self.result);
        let context = TransitionContext::new(
            TransitionKind::Dismissal,
            self.surface.clone(),
            Rect::default(),
            true,
            move |completed| result.set(Some(completed)),
        );
        PresentationAnimator::new(false, true).animate_transition(&context)
    }

    fn translation(&self) -> f32 {
        self.surface
            .borrow()
            .content_view()
            .map(|content| content.layer.translation_y)
            .unwrap_or_default()
    }

    fn run_frames(&self) {
        let mut time = 0;
        let mut frames = 0;
        while self.clock.has_frame_callbacks() {
            time += FRAME;
            frames += 1;
            self.clock.drain_frame_callbacks(time);
            assert!(frames < 1_000, "completion motion never settled");
        }
    }
}

fn spring_transition(clock: &FrameClock) -> Rc<InteractiveTransition> {
    InteractiveTransition::new(clock.clone(), 1.0, AnimationType::Spring(SpringSpec::default()))
}

fn bouncy_transition(clock: &FrameClock) -> Rc<InteractiveTransition> {
    InteractiveTransition::new(clock.clone(), 1.0, AnimationType::Spring(SpringSpec::bouncy()))
}

#[test]
fn update_scrubs_and_clamps() {
    let fixture = Fixture::presented(400.0);
    let transition = spring_transition(&fixture.clock);
    transition.start_interactive_transition(fixture.dismissal());

    transition.update(0.25);
    assert_eq!(fixture.translation(), 100.0);
    assert_eq!(transition.percent_complete(), 0.25);

    transition.update(3.0);
    assert_eq!(transition.percent_complete(), 1.0);
    transition.update(-1.0);
    assert_eq!(transition.percent_complete(), 0.0);
    assert_eq!(fixture.translation(), 0.0);
}

#[test]
fn progress_before_start_is_buffered() {
    let fixture = Fixture::presented(400.0);
    let transition = spring_transition(&fixture.clock);
    assert_eq!(transition.phase(), InteractivePhase::Waiting);

    transition.update(0.5);
    transition.start_interactive_transition(fixture.dismissal());

    assert_eq!(transition.phase(), InteractivePhase::Scrubbing);
    assert_eq!(fixture.translation(), 200.0);
}

#[test]
fn finish_runs_to_end_and_completes() {
    let fixture = Fixture::presented(400.0);
    let transition = spring_transition(&fixture.clock);
    transition.start_interactive_transition(fixture.dismissal());
    transition.update(0.625);

    transition.finish();
    assert_eq!(transition.phase(), InteractivePhase::Finishing);
    fixture.run_frames();

    assert_eq!(transition.phase(), InteractivePhase::Done);
    assert_eq!(fixture.result.get(), Some(true));
    assert_eq!(fixture.translation(), 400.0);
}

#[test]
fn cancel_returns_to_start_and_reports_cancelled() {
    let fixture = Fixture::presented(400.0);
    let transition = spring_transition(&fixture.clock);
    transition.start_interactive_transition(fixture.dismissal());
    transition.update(0.125);

    transition.cancel();
    fixture.run_frames();

    assert_eq!(fixture.result.get(), Some(false));
    assert_eq!(fixture.translation(), 0.0);
    assert_eq!(fixture.surface.borrow().container().background, DIMMED_BACKGROUND);
}

#[test]
fn resolution_is_final() {
    let fixture = Fixture::presented(400.0);
    let transition = spring_transition(&fixture.clock);
    transition.start_interactive_transition(fixture.dismissal());
    transition.update(0.8);

    transition.finish();
    transition.cancel();
    transition.update(0.1);
    fixture.run_frames();

    assert_eq!(fixture.result.get(), Some(true));
}

#[test]
fn resolution_before_start_runs_once_started() {
    let fixture = Fixture::presented(400.0);
    let transition = spring_transition(&fixture.clock);
    transition.cancel();
    transition.start_interactive_transition(fixture.dismissal());
    assert_eq!(transition.phase(), InteractivePhase::Cancelling);

    fixture.run_frames();
    assert_eq!(fixture.result.get(), Some(false));
}

#[test]
fn tween_completion_covers_remaining_share_at_speed() {
    let fixture = Fixture::presented(400.0);
    let curve = AnimationType::Tween(AnimationSpec::tween(0, Easing::Linear));
    let transition = InteractiveTransition::new(fixture.clock.clone(), 2.0, curve);
    let animation = fixture.dismissal();

    // 200ms base, half remaining, twice as fast.
    assert_eq!(
        transition.completion_animation(&animation, 0.5, 1.0),
        AnimationType::Tween(AnimationSpec::tween(50, Easing::Linear))
    );
}

#[test]
fn spring_completion_is_sped_up_as_a_whole() {
    let fixture = Fixture::presented(400.0);
    let curve = AnimationType::Spring(SpringSpec::stiff());
    let transition = InteractiveTransition::new(fixture.clock.clone(), 2.0, curve);
    let animation = fixture.dismissal();

    assert_eq!(
        transition.completion_animation(&animation, 0.5, 1.0),
        AnimationType::Spring(SpringSpec::stiff().sped_up(2.0))
    );
}

/// Steps the clock frame by frame, returning the observed range of the
/// completion percent and of the dim alpha.
fn observe_until_settled(
    fixture: &Fixture,
    transition: &InteractiveTransition,
) -> [(f32, f32); 2] {
    let mut percent = (f32::MAX, f32::MIN);
    let mut alpha = (f32::MAX, f32::MIN);
    let mut time = 0;
    while fixture.clock.has_frame_callbacks() {
        time += FRAME;
        fixture.clock.drain_frame_callbacks(time);
        let p = transition.percent_complete();
        let a = fixture.surface.borrow().container().background.a();
        percent = (percent.0.min(p), percent.1.max(p));
        alpha = (alpha.0.min(a), alpha.1.max(a));
        assert!(time < 1_000 * FRAME, "completion motion never settled");
    }
    [percent, alpha]
}

#[test]
fn bouncy_finish_stays_within_the_transition() {
    let fixture = Fixture::presented(400.0);
    let transition = bouncy_transition(&fixture.clock);
    transition.start_interactive_transition(fixture.dismissal());
    transition.update(0.5);

    transition.finish();
    let [percent, alpha] = observe_until_settled(&fixture, &transition);

    assert!(percent.0 >= 0.5 && percent.1 <= 1.0, "percent ranged over {percent:?}");
    assert!(alpha.0 >= 0.0 && alpha.1 <= DIMMED_BACKGROUND.a(), "alpha ranged over {alpha:?}");
    assert_eq!(fixture.result.get(), Some(true));
    assert_eq!(fixture.translation(), 400.0);
}

#[test]
fn bouncy_cancel_never_dims_past_presented() {
    let fixture = Fixture::presented(400.0);
    let transition = bouncy_transition(&fixture.clock);
    transition.start_interactive_transition(fixture.dismissal());
    transition.update(0.3);

    transition.cancel();
    let [percent, alpha] = observe_until_settled(&fixture, &transition);

    assert!(percent.0 >= 0.0 && percent.1 <= 0.3, "percent ranged over {percent:?}");
    assert!(alpha.0 >= 0.0 && alpha.1 <= DIMMED_BACKGROUND.a(), "alpha ranged over {alpha:?}");
    assert_eq!(fixture.result.get(), Some(false));
    assert_eq!(fixture.translation(), 0.0);
    assert_eq!(fixture.surface.borrow().container().background, DIMMED_BACKGROUND);
}
