/// Province ID raster, fetched once at startup.
pub const PROVINCES_JSON: &str = "./provinces.json";
/// Tile images live at `{TILE_URL}{x}_{y}.png`.
pub const TILE_URL: &str = "./tiles/";
/// How long the copy notice stays on screen.
pub const NOTICE_HIDE_MS: u32 = 2_500;
