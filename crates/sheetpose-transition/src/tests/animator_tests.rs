use super::*;

use std::cell::Cell;

use sheetpose_ui_graphics::{Rect, Size};

use crate::config::SheetConfig;
use crate::context::{TransitionContext, TransitionKind};
use crate::surface::{shared, PlainSurface, SharedSurface, SheetSurface};

const FRAME: u64 = 16_000_000;

fn laid_out_surface(height: f32) -> SharedSurface {
    let surface = shared(SheetSurface::new("sheet", height));
    surface.borrow_mut().layout(
        Rect::from_size(Size::new(390.0, 844.0)),
        &SheetConfig::default(),
    );
    surface
}

fn context(
    kind: TransitionKind,
    surface: SharedSurface,
    result: Rc<Cell<Option<bool>>>,
) -> Rc<TransitionContext> {
    TransitionContext::new(kind, surface, Rect::default(), false, move |completed| {
        result.set(Some(completed))
    })
}

fn content_translation(surface: &SharedSurface) -> f32 {
    surface
        .borrow()
        .content_view()
        .map(|content| content.layer.translation_y)
        .unwrap_or_default()
}

fn drain_until_idle(clock: &FrameClock, mut time: u64) -> u64 {
    while clock.has_frame_callbacks() {
        time += FRAME;
        clock.drain_frame_callbacks(time);
    }
    time
}

#[test]
fn presentation_starts_offscreen_and_transparent() {
    let surface = laid_out_surface(400.0);
    let result = Rc::new(Cell::new(None));
    let context = context(TransitionKind::Presentation, surface.clone(), result);

    let animation = PresentationAnimator::new(true, false).animate_transition(&context);

    assert_eq!(content_translation(&surface), 400.0);
    assert_eq!(surface.borrow().container().background, Color::TRANSPARENT);
    assert_eq!(animation.spec().duration(), TRANSITION_DURATION);
    assert_eq!(animation.spec().easing, Easing::EaseInOut);
}

#[test]
fn timed_presentation_reaches_dimmed_identity() {
    let surface = laid_out_surface(400.0);
    let result = Rc::new(Cell::new(None));
    let context = context(TransitionKind::Presentation, surface.clone(), result.clone());
    let clock = FrameClock::new();

    let animation = PresentationAnimator::new(true, false).animate_transition(&context);
    let running = animation.run(&clock);
    clock.drain_frame_callbacks(0);
    assert!(running.is_running());
    drain_until_idle(&clock, 0);

    assert_eq!(result.get(), Some(true));
    assert_eq!(content_translation(&surface), 0.0);
    assert_eq!(surface.borrow().container().background, DIMMED_BACKGROUND);
}

#[test]
fn dismissal_ends_offscreen_and_clear() {
    let surface = laid_out_surface(300.0);
    let clock = FrameClock::new();
    {
        let result = Rc::new(Cell::new(None));
        let context = context(TransitionKind::Presentation, surface.clone(), result);
        let _running = PresentationAnimator::new(true, false)
            .animate_transition(&context)
            .run(&clock);
        drain_until_idle(&clock, 0);
    }

    let result = Rc::new(Cell::new(None));
    let context = context(TransitionKind::Dismissal, surface.clone(), result.clone());
    let animation = PresentationAnimator::new(false, false).animate_transition(&context);
    assert_eq!(animation.spec().easing, Easing::EaseOut);
    let _running = animation.run(&clock);
    drain_until_idle(&clock, 1_000_000_000);

    assert_eq!(result.get(), Some(true));
    assert_eq!(content_translation(&surface), 300.0);
    assert!(surface.borrow().container().background.is_transparent());
    let alpha = surface
        .borrow()
        .content_view()
        .map(|content| content.layer.alpha);
    assert_eq!(alpha, Some(1.0));
}

#[test]
fn dismissal_forces_content_opaque_immediately() {
    let surface = laid_out_surface(300.0);
    if let Some(content) = surface.borrow_mut().content_view_mut() {
        content.layer.alpha = 0.3;
    }
    let context = context(
        TransitionKind::Dismissal,
        surface.clone(),
        Rc::new(Cell::new(None)),
    );

    PresentationAnimator::new(false, true).animate_transition(&context);

    let alpha = surface
        .borrow()
        .content_view()
        .map(|content| content.layer.alpha);
    assert_eq!(alpha, Some(1.0));
}

#[test]
fn frames_are_linear_in_progress() {
    let surface = laid_out_surface(400.0);
    surface.borrow_mut().container_mut().background = DIMMED_BACKGROUND;
    let context = context(
        TransitionKind::Dismissal,
        surface.clone(),
        Rc::new(Cell::new(None)),
    );
    let animation = PresentationAnimator::new(false, true).animate_transition(&context);

    let frame = animation.frame_at(0.625);
    assert_eq!(frame.content_translation_y, 250.0);
    assert!((frame.background.a() - 0.6 * 0.375).abs() < 1e-5);

    assert_eq!(animation.frame_at(1.05), animation.frame_at(1.0));
    assert_eq!(animation.frame_at(-0.03), animation.frame_at(0.0));
}

#[test]
fn cancelled_context_completes_with_false() {
    let surface = laid_out_surface(400.0);
    let result = Rc::new(Cell::new(None));
    let context = context(TransitionKind::Dismissal, surface, result.clone());
    let animation = PresentationAnimator::new(false, true).animate_transition(&context);

    context.cancel_interactive_transition();
    animation.complete();

    assert_eq!(result.get(), Some(false));
}

#[test]
#[should_panic(expected = "is not a bottom sheet")]
fn surface_without_content_view_is_fatal() {
    let context = context(
        TransitionKind::Presentation,
        shared(PlainSurface::new()),
        Rc::new(Cell::new(None)),
    );
    PresentationAnimator::new(true, false).animate_transition(&context);
}
