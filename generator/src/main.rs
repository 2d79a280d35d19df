//! Offline province-map builder.
//! Reads a province bitmap with its colour definitions and state files,
//! crops to the playable area and writes `provinces.json` plus PNG tiles.
//!
//! Usage: province-map-generator [MAP_DIR] [OUT_DIR]
//! Defaults: PROVINCE_MAP_DIR from env or "map", PROVINCE_MAP_OUT from env or "public"

mod definition;
mod error;
mod mask;
mod output;
mod states;

use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use tracing_subscriber::EnvFilter;

use crate::error::GeneratorError;
use crate::mask::{DILATION_RADIUS, IdMap, Mask, SCALE_FACTOR};

#[derive(Debug)]
struct Summary {
    width: u32,
    height: u32,
    bounds: [i64; 2],
    tiles: usize,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut args = std::env::args().skip(1);
    let map_dir = args
        .next()
        .or_else(|| std::env::var("PROVINCE_MAP_DIR").ok())
        .unwrap_or_else(|| "map".into());
    let out_dir = args
        .next()
        .or_else(|| std::env::var("PROVINCE_MAP_OUT").ok())
        .unwrap_or_else(|| "public".into());

    let started = Instant::now();
    match run(Path::new(&map_dir), Path::new(&out_dir)) {
        Ok(summary) => {
            tracing::info!(
                width = summary.width,
                height = summary.height,
                bounds = ?summary.bounds,
                tiles = summary.tiles,
                elapsed_secs = started.elapsed().as_secs_f64(),
                "province map generated"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, %map_dir, %out_dir, "province map generation failed");
            ExitCode::FAILURE
        }
    }
}

fn run(map_dir: &Path, out_dir: &Path) -> Result<Summary, GeneratorError> {
    std::fs::create_dir_all(out_dir).map_err(|source| GeneratorError::Write {
        path: out_dir.to_path_buf(),
        source,
    })?;
    let removed = output::clean_outputs(out_dir)?;
    if removed > 0 {
        tracing::info!(removed, "removed previous outputs");
    }

    let bmp_path = map_dir.join("provinces.bmp");
    tracing::info!(path = %bmp_path.display(), "loading province bitmap");
    let image = image::open(&bmp_path)
        .map_err(|source| GeneratorError::Decode {
            path: bmp_path.clone(),
            source,
        })?
        .to_rgb8();

    let definition_path = map_dir.join("definition.csv");
    let definition_text = read_text(&definition_path)?;
    let colors = definition::parse_definitions(&definition_text)?;
    let state_ids = states::load_state_provinces(&map_dir.join("states"))?;
    tracing::info!(
        colors = colors.len(),
        state_provinces = state_ids.len(),
        "loaded definitions and states"
    );

    let ids = IdMap::from_image(&image, &colors);
    let mask = Mask::from_ids(&ids, &state_ids);
    tracing::debug!(pixels = mask.count(), "state mask built");
    let crop = mask
        .dilate(DILATION_RADIUS)
        .crop_rect()
        .ok_or(GeneratorError::EmptyMask)?;
    tracing::info!(?crop, "cropping to playable area");

    let cropped_ids = ids.crop(crop);
    let cropped_image = image::imageops::crop_imm(&image, crop.x, crop.y, crop.width, crop.height).to_image();
    let scaled_ids = cropped_ids.upscale(SCALE_FACTOR);
    let scaled_image = mask::upscale_image(&cropped_image, SCALE_FACTOR);

    let bounds = [i64::from(crop.x), i64::from(crop.y)];
    let json_path = output::write_province_json(out_dir, &scaled_ids, bounds)?;
    tracing::info!(path = %json_path.display(), "wrote province raster");

    let tiles = output::write_tiles(out_dir, &scaled_image, &scaled_ids)?;

    Ok(Summary {
        width: scaled_ids.width(),
        height: scaled_ids.height(),
        bounds,
        tiles: tiles.len(),
    })
}

fn read_text(path: &Path) -> Result<String, GeneratorError> {
    std::fs::read_to_string(path).map_err(|source| GeneratorError::Read {
        path: path.to_path_buf(),
        source,
    })
}
