use std::path::PathBuf;

pub const DEFAULT_SERVER_PORT: u16 = 3000;
pub const DEFAULT_STATIC_DIR: &str = "client/dist";
pub const DEFAULT_ASSET_MAX_AGE_SECS: u64 = 86_400; // 1 day

pub fn server_port() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|value| value.trim().parse::<u16>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_SERVER_PORT)
}

/// Directory holding the built client, `provinces.json` and `tiles/`.
pub fn static_dir() -> PathBuf {
    std::env::var("STATIC_DIR")
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR))
}

/// `max-age` for map data (tiles and the province raster).
pub fn asset_max_age_secs() -> u64 {
    std::env::var("TILE_CACHE_MAX_AGE_SECS")
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_ASSET_MAX_AGE_SECS)
}
