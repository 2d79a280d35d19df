use province_map_shared::{FramePlan, TileCache, TileCoord, TileLookup};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

const BORDER_COLOR: &str = "red";

/// Counts from one paint pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PaintStats {
    pub tiles_drawn: usize,
    pub tiles_missing: usize,
    pub border_pixels: usize,
}

impl PaintStats {
    /// True when tile loading progressed since `previous` (or this is the first frame).
    pub fn loading_changed(&self, previous: Option<PaintStats>) -> bool {
        previous.is_none_or(|prev| prev.tiles_missing != self.tiles_missing)
    }
}

/// Resize the canvas to the plan, then paint tiles and the selection border.
///
/// `request` is invoked for each tile this pass needs that has never been seen;
/// tiles still in flight are skipped and show up on a later frame.
pub fn paint(
    canvas: &HtmlCanvasElement,
    ctx: &CanvasRenderingContext2d,
    plan: &FramePlan,
    tiles: &mut TileCache<HtmlImageElement>,
    mut request: impl FnMut(TileCoord, String),
) -> PaintStats {
    if canvas.width() != plan.canvas_width {
        canvas.set_width(plan.canvas_width);
    }
    if canvas.height() != plan.canvas_height {
        canvas.set_height(plan.canvas_height);
    }

    let mut stats = PaintStats::default();
    let [a, b, c, d, e, f] = plan.matrix;
    if ctx.set_transform(a, b, c, d, e, f).is_err() {
        return stats;
    }
    ctx.clear_rect(plan.clear.x, plan.clear.y, plan.clear.width, plan.clear.height);

    ctx.set_image_smoothing_enabled(false);
    for &coord in &plan.tiles {
        match tiles.get_or_request(coord, &mut request) {
            TileLookup::Ready(image) => {
                let (x, y) = coord.origin();
                if ctx
                    .draw_image_with_html_image_element(image, x, y)
                    .is_ok()
                {
                    stats.tiles_drawn += 1;
                }
            }
            TileLookup::Pending => stats.tiles_missing += 1,
        }
    }

    if !plan.border.is_empty() {
        ctx.save();
        ctx.set_line_width(plan.border_line_width);
        ctx.set_stroke_style_str(BORDER_COLOR);
        ctx.set_fill_style_str(BORDER_COLOR);
        for &(x, y) in &plan.border {
            ctx.fill_rect(x as f64, y as f64, 1.0, 1.0);
        }
        ctx.restore();
    }
    stats.border_pixels = plan.border.len();

    stats
}

#[cfg(test)]
mod tests {
    use super::PaintStats;

    fn stats(tiles_missing: usize) -> PaintStats {
        PaintStats {
            tiles_drawn: 3,
            tiles_missing,
            border_pixels: 40,
        }
    }

    #[test]
    fn loading_change_ignores_repeat_frames() {
        assert!(stats(2).loading_changed(None));
        assert!(!stats(2).loading_changed(Some(stats(2))));
        assert!(stats(0).loading_changed(Some(stats(2))));

        let mut panned = stats(2);
        panned.tiles_drawn = 9;
        panned.border_pixels = 0;
        assert!(!panned.loading_changed(Some(stats(2))));
    }
}
