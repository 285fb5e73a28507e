//! The view tree a sheet is rendered into.
//!
//! A surface owns a full-screen container and, when it is a proper bottom
//! sheet, a content view that slides vertically. Transitions only touch the
//! container background and the content layer.

use std::cell::RefCell;
use std::rc::Rc;

use sheetpose_ui_graphics::{Color, EdgeInsets, GraphicsLayer, Rect};

use crate::config::SheetConfig;
use crate::layout::{bottom_inset_frame, content_frame};

#[derive(Clone, Debug, PartialEq)]
pub struct View {
    /// Layout frame in host coordinates.
    pub frame: Rect,
    pub layer: GraphicsLayer,
    pub background: Color,
}

impl View {
    pub fn new(frame: Rect) -> Self {
        Self {
            frame,
            layer: GraphicsLayer::IDENTITY,
            background: Color::TRANSPARENT,
        }
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    /// Frame as currently drawn, after the layer translation.
    pub fn presented_frame(&self) -> Rect {
        self.layer.apply_to(self.frame)
    }
}

/// Anything that can be presented as a bottom sheet.
pub trait BottomSheetSurface {
    fn container(&self) -> &View;

    fn container_mut(&mut self) -> &mut View;

    /// `None` when the surface has no slidable content. Animating such a
    /// surface is a programming error.
    fn content_view(&self) -> Option<&View>;

    fn content_view_mut(&mut self) -> Option<&mut View>;

    /// Lays the surface out inside the host before it is shown.
    fn layout(&mut self, host_bounds: Rect, config: &SheetConfig) {
        let _ = config;
        self.container_mut().frame = host_bounds;
    }

    fn set_inset_background(&mut self, color: Color) {
        let _ = color;
    }

    fn name(&self) -> &str {
        "surface"
    }
}

pub type SharedSurface = Rc<RefCell<dyn BottomSheetSurface>>;

pub fn shared(surface: impl BottomSheetSurface + 'static) -> SharedSurface {
    Rc::new(RefCell::new(surface))
}

/// Standard sheet: content pinned to the bottom safe-area edge with a filler
/// view covering whatever remains below it.
#[derive(Clone, Debug)]
pub struct SheetSurface {
    name: String,
    container: View,
    content: View,
    bottom_inset: View,
    preferred_height: f32,
    safe_area: EdgeInsets,
}

impl SheetSurface {
    pub fn new(name: impl Into<String>, preferred_height: f32) -> Self {
        Self {
            name: name.into(),
            container: View::new(Rect::default()),
            content: View::new(Rect::default()).with_background(Color::WHITE),
            bottom_inset: View::new(Rect::default()).with_background(Color::WHITE),
            preferred_height,
            safe_area: EdgeInsets::default(),
        }
    }

    pub fn with_safe_area(mut self, safe_area: EdgeInsets) -> Self {
        self.safe_area = safe_area;
        self
    }

    pub fn with_content_background(mut self, color: Color) -> Self {
        self.content.background = color;
        self
    }

    pub fn content(&self) -> &View {
        &self.content
    }

    pub fn bottom_inset(&self) -> &View {
        &self.bottom_inset
    }

    pub fn set_preferred_height(&mut self, height: f32) {
        self.preferred_height = height;
    }
}

impl BottomSheetSurface for SheetSurface {
    fn container(&self) -> &View {
        &self.container
    }

    fn container_mut(&mut self) -> &mut View {
        &mut self.container
    }

    fn content_view(&self) -> Option<&View> {
        Some(&self.content)
    }

    fn content_view_mut(&mut self) -> Option<&mut View> {
        Some(&mut self.content)
    }

    fn layout(&mut self, host_bounds: Rect, config: &SheetConfig) {
        self.container.frame = host_bounds;
        self.content.frame = content_frame(
            host_bounds,
            self.safe_area,
            self.preferred_height,
            config.effective_top_inset(),
        );
        self.bottom_inset.frame = bottom_inset_frame(host_bounds, self.content.frame);
        self.bottom_inset.background = config.inset_background_color;
        log::debug!(
            "{} laid out: content {:?}, inset {:?}",
            self.name,
            self.content.frame,
            self.bottom_inset.frame
        );
    }

    fn set_inset_background(&mut self, color: Color) {
        self.bottom_inset.background = color;
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A full-screen surface with no content view. Useful as a plain modal; it
/// cannot be animated as a sheet.
#[derive(Clone, Debug)]
pub struct PlainSurface {
    container: View,
}

impl PlainSurface {
    pub fn new() -> Self {
        Self {
            container: View::new(Rect::default()),
        }
    }
}

impl Default for PlainSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl BottomSheetSurface for PlainSurface {
    fn container(&self) -> &View {
        &self.container
    }

    fn container_mut(&mut self) -> &mut View {
        &mut self.container
    }

    fn content_view(&self) -> Option<&View> {
        None
    }

    fn content_view_mut(&mut self) -> Option<&mut View> {
        None
    }

    fn name(&self) -> &str {
        "plain surface"
    }
}
