use std::sync::Arc;

use crate::raster::{ProvinceId, ProvinceRaster};
use crate::selection::SelectionSet;
use crate::viewport::{Viewport, wheel_zoom_factor};

/// Pointer travel (screen px) beyond which a press counts as a drag, not a click.
pub const CLICK_SLOP_PX: f64 = 4.0;
/// Hover label placement relative to the cursor.
pub const HOVER_LABEL_OFFSET_PX: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerState {
    Idle,
    Dragging {
        /// Cursor position minus viewport offset at press time.
        anchor_x: f64,
        anchor_y: f64,
        press_x: f64,
        press_y: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct HoverLabel {
    pub text: String,
    pub left: f64,
    pub top: f64,
}

/// All mutable map state for one page session.
///
/// Input handlers feed raw event coordinates in and get back whether the
/// map needs a repaint; rendering and hover queries only read from it.
/// "Client" coordinates are page-relative (used for dragging and the
/// hover label), "local" coordinates are relative to the canvas.
#[derive(Debug, Clone)]
pub struct MapSession {
    raster: Arc<ProvinceRaster>,
    viewport: Viewport,
    selection: SelectionSet,
    pointer: PointerState,
    dragged: bool,
}

impl MapSession {
    pub fn new(raster: impl Into<Arc<ProvinceRaster>>) -> Self {
        Self {
            raster: raster.into(),
            viewport: Viewport::default(),
            selection: SelectionSet::new(),
            pointer: PointerState::Idle,
            dragged: false,
        }
    }

    pub fn raster(&self) -> &ProvinceRaster {
        &self.raster
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.pointer, PointerState::Dragging { .. })
    }

    pub fn pointer_down(&mut self, client_x: f64, client_y: f64) {
        self.pointer = PointerState::Dragging {
            anchor_x: client_x - self.viewport.offset_x,
            anchor_y: client_y - self.viewport.offset_y,
            press_x: client_x,
            press_y: client_y,
        };
        self.dragged = false;
    }

    /// Reposition the map while dragging. Returns `true` if the viewport moved.
    pub fn pointer_move(&mut self, client_x: f64, client_y: f64) -> bool {
        let PointerState::Dragging {
            anchor_x,
            anchor_y,
            press_x,
            press_y,
        } = self.pointer
        else {
            return false;
        };

        if (client_x - press_x).abs() > CLICK_SLOP_PX || (client_y - press_y).abs() > CLICK_SLOP_PX {
            self.dragged = true;
        }
        self.viewport
            .set_offset(client_x - anchor_x, client_y - anchor_y);
        true
    }

    /// Pointer released or left the canvas.
    pub fn pointer_up(&mut self) {
        self.pointer = PointerState::Idle;
    }

    /// One wheel tick anchored at the cursor. Returns `true` if the map needs a repaint.
    pub fn wheel(&mut self, local_x: f64, local_y: f64, delta_y: f64) -> bool {
        let Some(factor) = wheel_zoom_factor(delta_y) else {
            return false;
        };
        self.viewport.zoom_at(local_x, local_y, factor);
        true
    }

    /// Plain click replaces the selection, additive (shift) click extends it.
    /// Clicks ending a drag and clicks off the map leave it unchanged.
    /// Returns `true` if a province was hit.
    pub fn click(&mut self, local_x: f64, local_y: f64, additive: bool) -> bool {
        if std::mem::take(&mut self.dragged) {
            return false;
        }
        let Some(pid) = self.province_at(local_x, local_y) else {
            return false;
        };
        if additive {
            self.selection.add(pid);
        } else {
            self.selection.replace_with(pid);
        }
        true
    }

    pub fn clear_selection(&mut self) -> bool {
        let had_any = !self.selection.is_empty();
        self.selection.clear();
        had_any
    }

    /// Canvas element size: the map extent at the current scale, at least 1x1.
    pub fn canvas_size(&self) -> (u32, u32) {
        let scale = self.viewport.scale;
        let width = (self.raster.width() as f64 * scale).ceil().max(1.0) as u32;
        let height = (self.raster.height() as f64 * scale).ceil().max(1.0) as u32;
        (width, height)
    }

    /// Province under a canvas-local screen point. Points past the canvas
    /// edge show nothing and hit nothing.
    pub fn province_at(&self, local_x: f64, local_y: f64) -> Option<ProvinceId> {
        let (canvas_w, canvas_h) = self.canvas_size();
        if !(0.0..canvas_w as f64).contains(&local_x) || !(0.0..canvas_h as f64).contains(&local_y) {
            return None;
        }
        let (mx, my) = self.viewport.screen_to_map(local_x, local_y);
        self.raster.hit_test(mx, my)
    }

    pub fn hover(&self, client_x: f64, client_y: f64, local_x: f64, local_y: f64) -> HoverLabel {
        HoverLabel {
            text: self
                .province_at(local_x, local_y)
                .map(|pid| pid.to_string())
                .unwrap_or_default(),
            left: client_x + HOVER_LABEL_OFFSET_PX,
            top: client_y + HOVER_LABEL_OFFSET_PX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 16x16 raster: ID 7 in the top-left 8x8 block, 12 elsewhere.
    fn session() -> MapSession {
        let rows = (0..16)
            .map(|y| (0..16).map(|x| if x < 8 && y < 8 { 7 } else { 12 }).collect())
            .collect();
        MapSession::new(ProvinceRaster::from_rows(rows, [0, 0]).expect("valid raster"))
    }

    fn selected(s: &MapSession) -> Vec<ProvinceId> {
        s.selection().iter().collect()
    }

    #[test]
    fn plain_click_replaces_and_shift_click_adds() {
        let mut s = session();
        assert!(s.click(5.0, 5.0, false));
        assert_eq!(selected(&s), vec![7]);

        assert!(s.click(9.0, 9.0, false));
        assert_eq!(selected(&s), vec![12]);

        assert!(s.click(5.0, 5.0, true));
        assert_eq!(selected(&s), vec![7, 12]);

        assert!(s.click(5.0, 5.0, true));
        assert_eq!(selected(&s), vec![7, 12]);
    }

    #[test]
    fn click_outside_map_keeps_selection() {
        let mut s = session();
        s.click(1.0, 1.0, false);
        assert!(!s.click(-3.0, 4.0, false));
        assert!(!s.click(16.0, 0.0, true));
        assert_eq!(selected(&s), vec![7]);
    }

    #[test]
    fn drag_moves_map_point_from_press_to_release() {
        let mut s = session();
        s.wheel(0.0, 0.0, -1.0);
        let a = (30.0, 40.0);
        let b = (75.5, 12.0);
        let under_a = s.viewport().screen_to_map(a.0, a.1);

        s.pointer_down(a.0, a.1);
        assert!(s.pointer_move(50.0, 50.0));
        assert!(s.pointer_move(b.0, b.1));
        s.pointer_up();

        let (sx, sy) = s.viewport().map_to_screen(under_a.0, under_a.1);
        assert!((sx - b.0).abs() < 1e-9 && (sy - b.1).abs() < 1e-9);
        assert!(!s.pointer_move(0.0, 0.0));
    }

    #[test]
    fn click_after_drag_does_not_select() {
        let mut s = session();
        s.pointer_down(2.0, 2.0);
        s.pointer_move(10.0, 2.0);
        s.pointer_up();
        assert!(!s.click(12.0, 2.0, false));
        assert!(s.selection().is_empty());

        // The suppression is consumed by that one click.
        assert!(s.click(12.0, 2.0, false));
        assert_eq!(selected(&s), vec![7]);
    }

    #[test]
    fn small_jitter_still_clicks() {
        let mut s = session();
        s.pointer_down(2.0, 2.0);
        s.pointer_move(4.0, 3.0);
        s.pointer_up();
        assert!(s.click(4.0, 3.0, false));
    }

    #[test]
    fn wheel_zooms_around_cursor() {
        let mut s = session();
        let before = s.viewport().screen_to_map(6.0, 3.0);
        assert!(s.wheel(6.0, 3.0, -120.0));
        assert!((s.viewport().scale - 1.1).abs() < 1e-12);
        let after = s.viewport().screen_to_map(6.0, 3.0);
        assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);
        assert!(!s.wheel(6.0, 3.0, 0.0));
    }

    #[test]
    fn hover_label_follows_cursor() {
        let s = session();
        let label = s.hover(105.0, 200.0, 3.0, 3.0);
        assert_eq!(
            label,
            HoverLabel {
                text: "7".into(),
                left: 115.0,
                top: 210.0
            }
        );
        assert_eq!(s.hover(0.0, 0.0, -1.0, 0.0).text, "");
    }

    #[test]
    fn clear_selection_reports_change() {
        let mut s = session();
        assert!(!s.clear_selection());
        s.click(1.0, 1.0, false);
        assert!(s.clear_selection());
        assert!(s.selection().is_empty());
    }

    #[test]
    fn points_past_the_canvas_edge_hit_nothing() {
        let rows = vec![vec![5; 100]; 10];
        let mut s = MapSession::new(ProvinceRaster::from_rows(rows, [0, 0]).expect("valid raster"));
        for _ in 0..7 {
            assert!(s.wheel(0.0, 0.0, 120.0));
        }
        s.pointer_down(100.0, 100.0);
        s.pointer_move(130.0, 100.0);
        s.pointer_up();
        assert_eq!(s.canvas_size().0, 48);

        // The map still extends under x = 53 in map space, but the canvas
        // ends at 48 so nothing is painted there.
        assert_eq!(s.province_at(53.0, 2.0), None);
        assert_eq!(s.hover(60.0, 9.0, 53.0, 2.0).text, "");
        assert_eq!(s.province_at(40.0, 2.0), Some(5));

        s.pointer_down(53.0, 2.0);
        s.pointer_up();
        assert!(!s.click(53.0, 2.0, false));
        assert!(s.selection().is_empty());
        assert!(s.click(40.0, 2.0, false));
        assert_eq!(selected(&s), vec![5]);
    }
}
