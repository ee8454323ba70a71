// Pointer-driven brush: draws the cursor preview and stamps discs into the mask.
// Stamps overwrite, so a stroke is a solid region with no alpha buildup.

use crate::compositor::Compositor;
use crate::types::Point;

/// Fill alpha of the cursor preview disc (the outline is opaque).
pub const CURSOR_FILL_ALPHA: u8 = 0x88;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Buttons {
    pub primary: bool,
    pub secondary: bool,
    pub middle: bool,
}

impl Buttons {
    pub const NONE: Buttons = Buttons { primary: false, secondary: false, middle: false };
    pub const PRIMARY: Buttons = Buttons { primary: true, secondary: false, middle: false };
    pub const SECONDARY: Buttons = Buttons { primary: false, secondary: true, middle: false };

    pub fn any(self) -> bool {
        self.primary || self.secondary || self.middle
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub position: Point,
    pub buttons: Buttons,
    pub shift: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEvent {
    pub position: Point,
    /// Positive when scrolling down.
    pub delta_y: f32,
}

/// What a pointer move did to the mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stroke {
    None,
    Paint,
    Erase,
}

/// Whether the host should suppress default scrolling / propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelOutcome {
    Consumed,
    Ignored,
}

#[derive(Debug, Clone)]
pub struct BrushEngine {
    radius: f32,
    last_position: Option<Point>,
}

impl BrushEngine {
    pub fn new(radius: f32) -> Self {
        Self { radius: radius.max(0.0), last_position: None }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius.max(0.0);
    }

    pub fn last_position(&self) -> Option<Point> {
        self.last_position
    }

    /// Redraw the cursor and, with any button held, stamp the mask.
    /// Secondary button or shift erases. No-op stamp if no layers exist yet.
    pub fn pointer_move(&mut self, compositor: &mut Compositor, event: PointerEvent) -> Stroke {
        self.last_position = Some(event.position);
        self.draw_cursor(compositor, event.position);

        if !event.buttons.any() {
            return Stroke::None;
        }
        let erase = event.buttons.secondary || event.shift;
        let Some(mask) = compositor.mask_mut() else {
            return Stroke::None;
        };
        mask.stamp(event.position, self.radius, !erase);
        if erase { Stroke::Erase } else { Stroke::Paint }
    }

    /// One radius step per tick (down grows, up shrinks, never below 0).
    /// Without a size-change listener the wheel is left to the host.
    pub fn wheel(
        &mut self,
        compositor: &mut Compositor,
        event: WheelEvent,
        on_size_change: Option<&mut dyn FnMut(f32)>,
    ) -> WheelOutcome {
        let Some(notify) = on_size_change else {
            return WheelOutcome::Ignored;
        };
        if event.delta_y == 0.0 {
            return WheelOutcome::Ignored;
        }
        let step = if event.delta_y > 0.0 { 1.0 } else { -1.0 };
        self.set_radius(self.radius + step);
        notify(self.radius);

        self.last_position = Some(event.position);
        self.draw_cursor(compositor, event.position);
        WheelOutcome::Consumed
    }

    pub fn draw_cursor(&self, compositor: &mut Compositor, at: Point) {
        let color = compositor.mask_color();
        let Some(cursor) = compositor.cursor_mut() else {
            return;
        };
        cursor.clear();
        cursor.fill_circle(at, self.radius, color.with_alpha(CURSOR_FILL_ALPHA));
        cursor.stroke_circle(at, self.radius, color.opaque());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blend::BlendMode;
    use crate::color::Rgb;
    use crate::types::{Size, TRANSPARENT};

    const MASK: Rgb = Rgb(0x23, 0x27, 0x2d);

    fn ready() -> Compositor {
        let mut c = Compositor::new(MASK, 0.75, BlendMode::Normal).unwrap();
        c.resize(Size::new(100, 100));
        c
    }

    fn moved(x: f32, y: f32, buttons: Buttons, shift: bool) -> PointerEvent {
        PointerEvent { position: Point::new(x, y), buttons, shift }
    }

    #[test]
    fn hover_only_draws_cursor() {
        let mut c = ready();
        let mut brush = BrushEngine::new(10.0);
        assert_eq!(brush.pointer_move(&mut c, moved(50.0, 50.0, Buttons::NONE, false)), Stroke::None);
        assert_eq!(c.mask().unwrap().masked_count(), 0);
        assert_eq!(c.cursor().unwrap().pixel(50, 50), Some(MASK.with_alpha(CURSOR_FILL_ALPHA)));
        assert_eq!(c.cursor().unwrap().pixel(50, 40), Some(MASK.opaque()));
    }

    #[test]
    fn cursor_is_cleared_between_moves() {
        let mut c = ready();
        let mut brush = BrushEngine::new(5.0);
        brush.pointer_move(&mut c, moved(10.0, 10.0, Buttons::NONE, false));
        brush.pointer_move(&mut c, moved(80.0, 80.0, Buttons::NONE, false));
        assert_eq!(c.cursor().unwrap().pixel(10, 10), Some(TRANSPARENT));
    }

    #[test]
    fn primary_paints_secondary_and_shift_erase() {
        let mut c = ready();
        let mut brush = BrushEngine::new(10.0);
        assert_eq!(brush.pointer_move(&mut c, moved(50.0, 50.0, Buttons::PRIMARY, false)), Stroke::Paint);
        assert!(c.mask().unwrap().is_masked(50, 50));
        assert_eq!(c.mask().unwrap().surface().pixel(50, 50), Some(MASK.opaque()));

        brush.set_radius(3.0);
        assert_eq!(brush.pointer_move(&mut c, moved(50.0, 50.0, Buttons::SECONDARY, false)), Stroke::Erase);
        assert!(!c.mask().unwrap().is_masked(50, 50));

        assert_eq!(brush.pointer_move(&mut c, moved(45.0, 45.0, Buttons::PRIMARY, true)), Stroke::Erase);
        assert!(!c.mask().unwrap().is_masked(45, 45));
        assert_eq!(c.mask().unwrap().surface().pixel(45, 45), Some(Rgb::WHITE.opaque()));
    }

    #[test]
    fn painting_without_layers_is_a_noop() {
        let mut c = Compositor::new(MASK, 0.75, BlendMode::Normal).unwrap();
        let mut brush = BrushEngine::new(10.0);
        assert_eq!(brush.pointer_move(&mut c, moved(5.0, 5.0, Buttons::PRIMARY, false)), Stroke::None);
    }

    #[test]
    fn wheel_down_grows_radius_and_redraws_cursor() {
        let mut c = ready();
        let mut brush = BrushEngine::new(10.0);
        let mut reported = Vec::new();
        let mut notify = |r: f32| reported.push(r);
        let outcome = brush.wheel(
            &mut c,
            WheelEvent { position: Point::new(50.0, 50.0), delta_y: 120.0 },
            Some(&mut notify),
        );
        assert_eq!(outcome, WheelOutcome::Consumed);
        assert_eq!(brush.radius(), 11.0);
        assert_eq!(reported, vec![11.0]);
        // outline now sits on radius 11
        assert_eq!(c.cursor().unwrap().pixel(50, 39), Some(MASK.opaque()));
    }

    #[test]
    fn wheel_up_shrinks_radius_and_redraws_cursor() {
        let mut c = ready();
        let mut brush = BrushEngine::new(10.0);
        let mut reported = Vec::new();
        let mut notify = |r: f32| reported.push(r);
        let outcome = brush.wheel(
            &mut c,
            WheelEvent { position: Point::new(50.0, 50.0), delta_y: -120.0 },
            Some(&mut notify),
        );
        assert_eq!(outcome, WheelOutcome::Consumed);
        assert_eq!(brush.radius(), 9.0);
        assert_eq!(reported, vec![9.0]);
        // outline moved in to radius 9; the old radius-10 ring is gone
        assert_eq!(c.cursor().unwrap().pixel(50, 41), Some(MASK.opaque()));
        assert_eq!(c.cursor().unwrap().pixel(50, 40), Some(TRANSPARENT));
    }

    #[test]
    fn wheel_up_floors_at_zero() {
        let mut c = ready();
        let mut brush = BrushEngine::new(0.0);
        let mut notify = |_: f32| {};
        brush.wheel(&mut c, WheelEvent { position: Point::default(), delta_y: -1.0 }, Some(&mut notify));
        assert_eq!(brush.radius(), 0.0);
    }

    #[test]
    fn wheel_without_listener_is_ignored() {
        let mut c = ready();
        let mut brush = BrushEngine::new(10.0);
        let outcome = brush.wheel(&mut c, WheelEvent { position: Point::default(), delta_y: 1.0 }, None);
        assert_eq!(outcome, WheelOutcome::Ignored);
        assert_eq!(brush.radius(), 10.0);
    }
}
