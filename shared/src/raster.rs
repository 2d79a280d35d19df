use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tiles::TILE_SIZE;

pub type ProvinceId = u32;

/// Raster value the generator writes for pixels that belong to no province.
pub const UNMAPPED: ProvinceId = 0;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("province map is empty")]
    Empty,

    #[error("row {row} has {found} columns, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid province data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Wire format of `provinces.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvinceData {
    pub pid_map: Vec<Vec<ProvinceId>>,
    /// Crop origin of the raster inside the source bitmap.
    #[serde(default)]
    pub bounds: [i64; 2],
}

/// Immutable row-major grid of province IDs in map space.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvinceRaster {
    width: usize,
    height: usize,
    pids: Vec<ProvinceId>,
    bounds: [i64; 2],
}

impl ProvinceRaster {
    pub fn from_rows(rows: Vec<Vec<ProvinceId>>, bounds: [i64; 2]) -> Result<Self, RasterError> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(RasterError::Empty);
        }

        let mut pids = Vec::with_capacity(width * height);
        for (row, cells) in rows.into_iter().enumerate() {
            if cells.len() != width {
                return Err(RasterError::Ragged {
                    row,
                    expected: width,
                    found: cells.len(),
                });
            }
            pids.extend(cells);
        }

        Ok(Self {
            width,
            height,
            pids,
            bounds,
        })
    }

    pub fn from_data(data: ProvinceData) -> Result<Self, RasterError> {
        Self::from_rows(data.pid_map, data.bounds)
    }

    pub fn from_json(json: &str) -> Result<Self, RasterError> {
        let data: ProvinceData = serde_json::from_str(json)?;
        Self::from_data(data)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn bounds(&self) -> [i64; 2] {
        self.bounds
    }

    /// Raw raster value at an integer map coordinate.
    pub fn get(&self, x: usize, y: usize) -> Option<ProvinceId> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pids[y * self.width + x])
    }

    /// Province under a map-space point. `None` outside the raster and on unmapped pixels.
    pub fn hit_test(&self, mx: f64, my: f64) -> Option<ProvinceId> {
        let px = mx.floor();
        let py = my.floor();
        if !px.is_finite() || !py.is_finite() || px < 0.0 || py < 0.0 {
            return None;
        }
        self.get(px as usize, py as usize)
            .filter(|&pid| pid != UNMAPPED)
    }

    /// Number of tile columns and rows covering the raster.
    pub fn tile_grid(&self) -> (u32, u32) {
        (
            self.width.div_ceil(TILE_SIZE as usize) as u32,
            self.height.div_ceil(TILE_SIZE as usize) as u32,
        )
    }

    pub(crate) fn pids(&self) -> &[ProvinceId] {
        &self.pids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raster_3x2() -> ProvinceRaster {
        ProvinceRaster::from_rows(vec![vec![1, 2, 3], vec![4, 0, 6]], [0, 0]).expect("valid raster")
    }

    #[test]
    fn hit_test_floors_fractional_coordinates() {
        let raster = raster_3x2();
        assert_eq!(raster.hit_test(0.9, 0.1), Some(1));
        assert_eq!(raster.hit_test(2.99, 1.5), Some(6));
    }

    #[test]
    fn hit_test_outside_bounds_is_none() {
        let raster = raster_3x2();
        assert_eq!(raster.hit_test(-1.0, 0.0), None);
        assert_eq!(raster.hit_test(3.0, 0.0), None);
        assert_eq!(raster.hit_test(0.0, 2.0), None);
        assert_eq!(raster.hit_test(-0.5, 0.0), None);
        assert_eq!(raster.hit_test(f64::NAN, 0.0), None);
    }

    #[test]
    fn hit_test_unmapped_pixel_is_none() {
        let raster = raster_3x2();
        assert_eq!(raster.get(1, 1), Some(UNMAPPED));
        assert_eq!(raster.hit_test(1.5, 1.5), None);
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = ProvinceRaster::from_rows(vec![vec![1, 2], vec![3]], [0, 0])
            .expect_err("ragged raster must fail");
        assert!(matches!(
            err,
            RasterError::Ragged {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn rejects_empty_grid() {
        assert!(matches!(
            ProvinceRaster::from_rows(Vec::new(), [0, 0]),
            Err(RasterError::Empty)
        ));
        assert!(matches!(
            ProvinceRaster::from_rows(vec![Vec::new()], [0, 0]),
            Err(RasterError::Empty)
        ));
    }

    #[test]
    fn parses_payload_with_and_without_bounds() {
        let raster = ProvinceRaster::from_json(r#"{"pid_map":[[5,5],[5,7]],"bounds":[120,48]}"#)
            .expect("payload parses");
        assert_eq!((raster.width(), raster.height()), (2, 2));
        assert_eq!(raster.bounds(), [120, 48]);
        assert_eq!(raster.hit_test(1.0, 1.0), Some(7));

        let raster = ProvinceRaster::from_json(r#"{"pid_map":[[1]]}"#).expect("bounds optional");
        assert_eq!(raster.bounds(), [0, 0]);
    }

    #[test]
    fn malformed_payload_is_parse_error() {
        assert!(matches!(
            ProvinceRaster::from_json(r#"{"bounds":[0,0]}"#),
            Err(RasterError::Parse(_))
        ));
    }

    #[test]
    fn tile_grid_rounds_up() {
        let raster = ProvinceRaster::from_rows(vec![vec![1; 513]; 512], [0, 0]).expect("valid");
        assert_eq!(raster.tile_grid(), (2, 1));
    }
}
