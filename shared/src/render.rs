use crate::border::{BoundaryIndex, Pixel};
use crate::session::MapSession;
use crate::tiles::{TileCoord, visible_tiles};
use crate::viewport::MapRect;

/// Everything one paint pass needs, derived from session state alone.
/// Two plans built from the same state compare equal.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    /// Physical canvas size: the map extent at the current scale.
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// `setTransform(a, b, c, d, e, f)` arguments.
    pub matrix: [f64; 6],
    /// Logical rectangle cleared before painting.
    pub clear: MapRect,
    /// Tiles to blit, row-major.
    pub tiles: Vec<TileCoord>,
    /// Keeps borders one screen pixel thick at any zoom.
    pub border_line_width: f64,
    pub border: Vec<Pixel>,
}

/// Build the plan for the current state. `surface_w`/`surface_h` is the on-screen
/// area the canvas is shown through; tiles outside it are skipped.
pub fn plan_frame(
    session: &MapSession,
    boundaries: &BoundaryIndex,
    surface_w: f64,
    surface_h: f64,
) -> FramePlan {
    let raster = session.raster();
    let vp = session.viewport();
    let width = raster.width() as f64;
    let height = raster.height() as f64;

    let (canvas_width, canvas_height) = session.canvas_size();

    let view_w = surface_w.min(canvas_width as f64).max(0.0);
    let view_h = surface_h.min(canvas_height as f64).max(0.0);
    let (cols, rows) = raster.tile_grid();
    let tiles = visible_tiles(vp.visible_map_rect(view_w, view_h), cols, rows);

    FramePlan {
        canvas_width,
        canvas_height,
        matrix: vp.canvas_matrix(),
        clear: MapRect {
            x: -vp.offset_x / vp.scale,
            y: -vp.offset_y / vp.scale,
            width,
            height,
        },
        tiles,
        border_line_width: 1.0 / vp.scale,
        border: boundaries.pixels_for(session.selection()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::ProvinceRaster;
    use crate::tiles::all_tiles;

    fn session(width: usize, height: usize) -> MapSession {
        let rows = (0..height)
            .map(|y| (0..width).map(|x| if x < width / 2 && y < height / 2 { 1 } else { 2 }).collect())
            .collect();
        MapSession::new(ProvinceRaster::from_rows(rows, [0, 0]).expect("valid raster"))
    }

    #[test]
    fn plan_is_idempotent() {
        let mut s = session(40, 30);
        s.click(3.0, 3.0, false);
        s.wheel(10.0, 10.0, -1.0);
        let index = BoundaryIndex::build(s.raster());

        let first = plan_frame(&s, &index, 800.0, 600.0);
        let second = plan_frame(&s, &index, 800.0, 600.0);
        assert_eq!(first, second);
        assert!(!first.border.is_empty());
    }

    #[test]
    fn canvas_size_and_line_width_follow_scale() {
        let mut s = session(101, 50);
        let index = BoundaryIndex::build(s.raster());
        s.wheel(0.0, 0.0, 1.0);
        let plan = plan_frame(&s, &index, 4000.0, 4000.0);

        assert_eq!((plan.canvas_width, plan.canvas_height), (91, 45));
        assert!((plan.border_line_width - 1.0 / 0.9).abs() < 1e-12);
        assert_eq!(plan.matrix, s.viewport().canvas_matrix());
        assert_eq!(plan.clear.width, 101.0);
    }

    #[test]
    fn whole_map_on_screen_plans_every_tile() {
        let s = session(1100, 600);
        let index = BoundaryIndex::build(s.raster());
        let plan = plan_frame(&s, &index, 5000.0, 5000.0);
        assert_eq!(plan.tiles, all_tiles(3, 2));
    }

    #[test]
    fn panned_view_skips_offscreen_tiles() {
        let mut s = session(1100, 600);
        let index = BoundaryIndex::build(s.raster());
        s.pointer_down(0.0, 0.0);
        s.pointer_move(-600.0, 0.0);
        s.pointer_up();
        let plan = plan_frame(&s, &index, 300.0, 300.0);
        assert_eq!(plan.tiles, vec![TileCoord::new(1, 0)]);
    }

    #[test]
    fn empty_selection_paints_no_border() {
        let s = session(20, 20);
        let index = BoundaryIndex::build(s.raster());
        assert!(plan_frame(&s, &index, 100.0, 100.0).border.is_empty());
    }
}
