use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage, imageops};
use province_map_shared::{ProvinceData, TILE_SIZE, TileCoord, tiles::all_tiles};

use crate::error::GeneratorError;
use crate::mask::{CropRect, IdMap};

pub const PROVINCES_FILE: &str = "provinces.json";
pub const TILES_DIR: &str = "tiles";

/// Removes `provinces.json` and every `tiles/*.png` left by an earlier run.
pub fn clean_outputs(out_dir: &Path) -> Result<usize, GeneratorError> {
    let mut removed = 0;
    let json = out_dir.join(PROVINCES_FILE);
    if json.is_file() {
        remove(&json)?;
        removed += 1;
    }

    let tiles_dir = out_dir.join(TILES_DIR);
    if !tiles_dir.is_dir() {
        return Ok(removed);
    }
    let entries = std::fs::read_dir(&tiles_dir).map_err(|source| GeneratorError::Read {
        path: tiles_dir.clone(),
        source,
    })?;
    for entry in entries {
        let path = entry
            .map_err(|source| GeneratorError::Read {
                path: tiles_dir.clone(),
                source,
            })?
            .path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("png") {
            remove(&path)?;
            removed += 1;
        }
    }
    Ok(removed)
}

fn remove(path: &Path) -> Result<(), GeneratorError> {
    std::fs::remove_file(path).map_err(|source| GeneratorError::Write {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_province_json(
    out_dir: &Path,
    ids: &IdMap,
    bounds: [i64; 2],
) -> Result<PathBuf, GeneratorError> {
    let path = out_dir.join(PROVINCES_FILE);
    let data = ProvinceData {
        pid_map: ids.rows(),
        bounds,
    };
    let file = File::create(&path).map_err(|source| GeneratorError::Write {
        path: path.clone(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &data)?;
    writer.flush().map_err(|source| GeneratorError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Pixel region covered by `coord`, truncated at the right and bottom edges.
fn tile_region(coord: TileCoord, width: u32, height: u32) -> CropRect {
    let x = coord.x * TILE_SIZE;
    let y = coord.y * TILE_SIZE;
    CropRect {
        x,
        y,
        width: TILE_SIZE.min(width - x),
        height: TILE_SIZE.min(height - y),
    }
}

/// Writes `tiles/{x}_{y}.png` for every tile that contains a province.
/// Returns the coordinates written, row-major.
pub fn write_tiles(
    out_dir: &Path,
    image: &RgbImage,
    ids: &IdMap,
) -> Result<Vec<TileCoord>, GeneratorError> {
    let tiles_dir = out_dir.join(TILES_DIR);
    std::fs::create_dir_all(&tiles_dir).map_err(|source| GeneratorError::Write {
        path: tiles_dir.clone(),
        source,
    })?;

    let cols = ids.width().div_ceil(TILE_SIZE);
    let rows = ids.height().div_ceil(TILE_SIZE);
    let mut written = Vec::new();
    for coord in all_tiles(cols, rows) {
        let region = tile_region(coord, ids.width(), ids.height());
        if !ids.any_mapped(region) {
            continue;
        }
        let tile = imageops::crop_imm(image, region.x, region.y, region.width, region.height).to_image();
        let path = tiles_dir.join(format!("{}.png", coord.key()));
        tile.save_with_format(&path, ImageFormat::Png)
            .map_err(|source| GeneratorError::Encode { path, source })?;
        written.push(coord);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_tiles_are_truncated() {
        let region = tile_region(TileCoord::new(1, 0), TILE_SIZE + 10, 40);
        assert_eq!(
            region,
            CropRect { x: TILE_SIZE, y: 0, width: 10, height: 40 }
        );
    }
}
