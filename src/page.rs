use winit::event::MouseScrollDelta;

/// Wheel line-delta to pixel conversion, ~40 px per line.
pub const PIXELS_PER_LINE: f32 = 40.0;

/// The scrollable page the tour runs over. A native window has no document,
/// so the page is modeled in-process: a scroll position in pixels (0 at the
/// top, negative further down), a main content region that can be removed
/// once, and a scroll handler that can be detached.
pub struct Page {
    scroll_top: f32,
    span: f32,
    main_attached: bool,
    handler_attached: bool,
}

impl Page {
    pub fn new(span: f32) -> Self {
        Page {
            scroll_top: 0.0,
            span,
            main_attached: true,
            handler_attached: true,
        }
    }

    /// Applies a wheel event to the scroll position. Returns whether the
    /// scroll handler should fire; a detached page ignores wheel events.
    pub fn on_wheel(&mut self, delta: MouseScrollDelta) -> bool {
        if !self.handler_attached {
            return false;
        }
        let pixels = match delta {
            MouseScrollDelta::LineDelta(_, y) => y * PIXELS_PER_LINE,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
        };
        self.scroll_top = (self.scroll_top + pixels).clamp(-self.span, 0.0);
        true
    }

    /// Position of the page top relative to the viewport, 0 or negative.
    pub fn scroll_top(&self) -> f32 {
        self.scroll_top
    }

    pub fn is_main_attached(&self) -> bool {
        self.main_attached
    }

    /// Removes the main content region. Returns whether anything was removed;
    /// a second call is a no-op.
    pub fn remove_main(&mut self) -> bool {
        let removed = self.main_attached;
        self.main_attached = false;
        removed
    }

    pub fn is_handler_attached(&self) -> bool {
        self.handler_attached
    }

    pub fn detach_scroll_handler(&mut self) {
        self.handler_attached = false;
    }
}

#[cfg(test)]
mod tests {
    use winit::dpi::PhysicalPosition;

    use super::*;

    #[test]
    fn line_deltas_convert_at_forty_pixels_per_line() {
        let mut page = Page::new(8000.0);
        page.on_wheel(MouseScrollDelta::LineDelta(0.0, -3.0));
        assert_eq!(page.scroll_top(), -120.0);
    }

    #[test]
    fn pixel_deltas_pass_through() {
        let mut page = Page::new(8000.0);
        page.on_wheel(MouseScrollDelta::PixelDelta(PhysicalPosition::new(
            0.0, -250.0,
        )));
        assert_eq!(page.scroll_top(), -250.0);
    }

    #[test]
    fn scroll_clamps_at_both_ends() {
        let mut page = Page::new(500.0);
        page.on_wheel(MouseScrollDelta::PixelDelta(PhysicalPosition::new(
            0.0, -9000.0,
        )));
        assert_eq!(page.scroll_top(), -500.0);
        page.on_wheel(MouseScrollDelta::PixelDelta(PhysicalPosition::new(
            0.0, 9000.0,
        )));
        assert_eq!(page.scroll_top(), 0.0);
    }

    #[test]
    fn detached_page_ignores_wheel_events() {
        let mut page = Page::new(8000.0);
        page.detach_scroll_handler();
        assert!(!page.on_wheel(MouseScrollDelta::LineDelta(0.0, -5.0)));
        assert_eq!(page.scroll_top(), 0.0);
    }

    #[test]
    fn remove_main_is_idempotent_and_reports() {
        let mut page = Page::new(8000.0);
        assert!(page.is_main_attached());
        assert!(page.remove_main());
        assert!(!page.is_main_attached());
        assert!(!page.remove_main());
    }
}
