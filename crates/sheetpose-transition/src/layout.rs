//! Frame computation for a sheet inside its host.

use sheetpose_ui_graphics::{EdgeInsets, Rect};

/// Frame of the content view: full width, pinned to the bottom safe-area
/// edge, as tall as preferred but never closer than `top_inset` to the top
/// safe-area edge.
pub fn content_frame(
    host_bounds: Rect,
    safe_area: EdgeInsets,
    preferred_height: f32,
    top_inset: f32,
) -> Rect {
    let bottom = host_bounds.max_y() - safe_area.bottom;
    let min_top = host_bounds.y + safe_area.top + top_inset;
    let height = preferred_height.min(bottom - min_top).max(0.0);
    Rect {
        x: host_bounds.x,
        y: bottom - height,
        width: host_bounds.width,
        height,
    }
}

/// Filler below the content, reaching the bottom of the host. Empty when the
/// content already touches the bottom edge.
pub fn bottom_inset_frame(host_bounds: Rect, content: Rect) -> Rect {
    Rect {
        x: host_bounds.x,
        y: content.max_y(),
        width: host_bounds.width,
        height: (host_bounds.max_y() - content.max_y()).max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 390.0,
        height: 844.0,
    };

    #[test]
    fn short_content_sits_on_the_bottom_safe_edge() {
        let safe_area = EdgeInsets::from_components(0.0, 47.0, 0.0, 34.0);
        let frame = content_frame(HOST, safe_area, 400.0, 80.0);
        assert_eq!(frame.height, 400.0);
        assert_eq!(frame.max_y(), 810.0);
        assert_eq!(frame.width, 390.0);
    }

    #[test]
    fn tall_content_is_capped_by_top_inset() {
        let safe_area = EdgeInsets::from_components(0.0, 47.0, 0.0, 34.0);
        let frame = content_frame(HOST, safe_area, 2000.0, 80.0);
        assert_eq!(frame.y, 47.0 + 80.0);
        assert_eq!(frame.max_y(), 810.0);
    }

    #[test]
    fn inset_fills_gap_below_content() {
        let safe_area = EdgeInsets::from_components(0.0, 0.0, 0.0, 34.0);
        let content = content_frame(HOST, safe_area, 300.0, 80.0);
        let inset = bottom_inset_frame(HOST, content);
        assert_eq!(inset.y, 810.0);
        assert_eq!(inset.height, 34.0);

        let flush = content_frame(HOST, EdgeInsets::default(), 300.0, 80.0);
        assert_eq!(bottom_inset_frame(HOST, flush).height, 0.0);
    }
}
