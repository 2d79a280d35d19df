pub mod border;
pub mod raster;
pub mod render;
pub mod selection;
pub mod session;
pub mod tiles;
pub mod viewport;

pub use border::{BoundaryIndex, Pixel, border_pixels};
pub use raster::{ProvinceData, ProvinceId, ProvinceRaster, RasterError, UNMAPPED};
pub use render::{FramePlan, plan_frame};
pub use selection::SelectionSet;
pub use session::{HoverLabel, MapSession, PointerState};
pub use tiles::{TILE_SIZE, TileCache, TileCoord, TileEvent, TileLookup, tile_url};
pub use viewport::{MapRect, Viewport};
