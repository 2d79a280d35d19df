/// Viewport manages the pan/zoom transformation from map coordinates to screen coordinates.
/// `screen = map * scale + offset` on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale: f64,
}

pub const MIN_SCALE: f64 = 0.01;
pub const MAX_SCALE: f64 = 64.0;
pub const WHEEL_ZOOM_IN: f64 = 1.1;
pub const WHEEL_ZOOM_OUT: f64 = 0.9;

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 1.0,
        }
    }
}

/// Axis-aligned rectangle in map coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Direction-only zoom factor for one wheel tick. Magnitude of the delta is ignored.
pub fn wheel_zoom_factor(delta_y: f64) -> Option<f64> {
    if delta_y < 0.0 {
        Some(WHEEL_ZOOM_IN)
    } else if delta_y > 0.0 {
        Some(WHEEL_ZOOM_OUT)
    } else {
        None
    }
}

impl Viewport {
    /// Convert map coordinates to screen coordinates.
    pub fn map_to_screen(&self, mx: f64, my: f64) -> (f64, f64) {
        (
            mx * self.scale + self.offset_x,
            my * self.scale + self.offset_y,
        )
    }

    /// Convert screen coordinates to map coordinates.
    pub fn screen_to_map(&self, sx: f64, sy: f64) -> (f64, f64) {
        (
            (sx - self.offset_x) / self.scale,
            (sy - self.offset_y) / self.scale,
        )
    }

    /// Pan by screen-space delta. Tracks the cursor 1:1 at any zoom.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    pub fn set_offset(&mut self, x: f64, y: f64) {
        self.offset_x = x;
        self.offset_y = y;
    }

    /// Multiply the scale by `factor`, keeping the map point under `(screen_x, screen_y)` fixed.
    pub fn zoom_at(&mut self, screen_x: f64, screen_y: f64, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let (anchor_x, anchor_y) = self.screen_to_map(screen_x, screen_y);
        self.scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);

        self.offset_x = screen_x - anchor_x * self.scale;
        self.offset_y = screen_y - anchor_y * self.scale;
    }

    /// Canvas 2D transform `(a, b, c, d, e, f)` equivalent to this viewport.
    pub fn canvas_matrix(&self) -> [f64; 6] {
        [self.scale, 0.0, 0.0, self.scale, self.offset_x, self.offset_y]
    }

    /// Map-space rectangle covered by a `screen_w x screen_h` surface.
    pub fn visible_map_rect(&self, screen_w: f64, screen_h: f64) -> MapRect {
        let (x, y) = self.screen_to_map(0.0, 0.0);
        MapRect {
            x,
            y,
            width: screen_w / self.scale,
            height: screen_h / self.scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_close(a: (f64, f64), b: (f64, f64)) {
        assert!(
            (a.0 - b.0).abs() < EPS * (1.0 + b.0.abs()) && (a.1 - b.1).abs() < EPS * (1.0 + b.1.abs()),
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn screen_to_map_inverts_map_to_screen() {
        let vp = Viewport {
            offset_x: -213.5,
            offset_y: 87.25,
            scale: 2.7,
        };
        for &(sx, sy) in &[(0.0, 0.0), (1.0, 1.0), (640.5, -12.0), (-3000.0, 7777.7)] {
            let (mx, my) = vp.screen_to_map(sx, sy);
            assert_close(vp.map_to_screen(mx, my), (sx, sy));
        }
    }

    #[test]
    fn zoom_keeps_point_under_cursor() {
        let mut vp = Viewport::default();
        let cursor = (412.0, 233.0);
        let anchor = vp.screen_to_map(cursor.0, cursor.1);

        for factor in [1.1, 1.1, 0.9, 3.0, 0.25, 0.9, 1.1] {
            vp.zoom_at(cursor.0, cursor.1, factor);
            assert_close(vp.screen_to_map(cursor.0, cursor.1), anchor);
        }
    }

    #[test]
    fn zoom_clamps_scale_and_still_anchors() {
        let mut vp = Viewport::default();
        let anchor = vp.screen_to_map(50.0, 60.0);
        for _ in 0..200 {
            vp.zoom_at(50.0, 60.0, WHEEL_ZOOM_OUT);
        }
        assert_eq!(vp.scale, MIN_SCALE);
        assert_close(vp.screen_to_map(50.0, 60.0), anchor);

        for _ in 0..400 {
            vp.zoom_at(50.0, 60.0, WHEEL_ZOOM_IN);
        }
        assert_eq!(vp.scale, MAX_SCALE);
        assert_close(vp.screen_to_map(50.0, 60.0), anchor);
    }

    #[test]
    fn zoom_from_panned_view_anchors_off_origin_cursor() {
        let mut vp = Viewport {
            offset_x: -37.0,
            offset_y: 14.5,
            scale: 0.8,
        };
        let anchor = vp.screen_to_map(300.0, 120.0);
        vp.zoom_at(300.0, 120.0, WHEEL_ZOOM_IN);
        assert!((vp.scale - 0.88).abs() < 1e-12);
        assert_close(vp.screen_to_map(300.0, 120.0), anchor);
        assert_close(vp.map_to_screen(anchor.0, anchor.1), (300.0, 120.0));
    }

    #[test]
    fn zoom_ignores_non_positive_factor() {
        let mut vp = Viewport::default();
        vp.zoom_at(10.0, 10.0, 0.0);
        vp.zoom_at(10.0, 10.0, -2.0);
        vp.zoom_at(10.0, 10.0, f64::NAN);
        assert_eq!(vp, Viewport::default());
    }

    #[test]
    fn pan_moves_map_point_with_cursor() {
        let mut vp = Viewport {
            offset_x: 10.0,
            offset_y: 20.0,
            scale: 3.5,
        };
        let a = (100.0, 150.0);
        let b = (37.0, 402.0);
        let under_a = vp.screen_to_map(a.0, a.1);
        vp.pan_by(b.0 - a.0, b.1 - a.1);
        assert_close(vp.map_to_screen(under_a.0, under_a.1), b);
    }

    #[test]
    fn wheel_factor_uses_direction_only() {
        assert_eq!(wheel_zoom_factor(-1.0), Some(WHEEL_ZOOM_IN));
        assert_eq!(wheel_zoom_factor(-480.0), Some(WHEEL_ZOOM_IN));
        assert_eq!(wheel_zoom_factor(3.0), Some(WHEEL_ZOOM_OUT));
        assert_eq!(wheel_zoom_factor(0.0), None);
    }

    #[test]
    fn visible_rect_matches_inverse_corners() {
        let vp = Viewport {
            offset_x: -100.0,
            offset_y: 50.0,
            scale: 2.0,
        };
        let rect = vp.visible_map_rect(800.0, 600.0);
        assert_eq!(rect.x, 50.0);
        assert_eq!(rect.y, -25.0);
        assert_eq!(rect.width, 400.0);
        assert_eq!(rect.height, 300.0);
        assert_eq!(vp.canvas_matrix(), [2.0, 0.0, 0.0, 2.0, -100.0, 50.0]);
    }
}
