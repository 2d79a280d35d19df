use std::collections::HashMap;

use crate::raster::{ProvinceId, ProvinceRaster};
use crate::selection::SelectionSet;

/// Map-space pixel `(x, y)`.
pub type Pixel = (u32, u32);

fn is_edge(pids: &[ProvinceId], width: usize, x: usize, y: usize) -> bool {
    let i = y * width + x;
    let pid = pids[i];
    pids[i + 1] != pid || pids[i - 1] != pid || pids[i + width] != pid || pids[i - width] != pid
}

/// Interior pixels of selected provinces with a 4-neighbour of a different ID, row-major.
/// The outermost ring of the raster is never reported.
pub fn border_pixels(raster: &ProvinceRaster, selection: &SelectionSet) -> Vec<Pixel> {
    let (width, height) = (raster.width(), raster.height());
    let pids = raster.pids();
    let mut out = Vec::new();
    if selection.is_empty() || width < 3 || height < 3 {
        return out;
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            if selection.contains(pids[y * width + x]) && is_edge(pids, width, x, y) {
                out.push((x as u32, y as u32));
            }
        }
    }
    out
}

/// Boundary pixels grouped by province, built once per raster.
/// `pixels_for` yields exactly what `border_pixels` would for the same selection.
#[derive(Debug, Clone, Default)]
pub struct BoundaryIndex {
    by_province: HashMap<ProvinceId, Vec<Pixel>>,
}

impl BoundaryIndex {
    pub fn build(raster: &ProvinceRaster) -> Self {
        let (width, height) = (raster.width(), raster.height());
        let pids = raster.pids();
        let mut by_province: HashMap<ProvinceId, Vec<Pixel>> = HashMap::new();
        if width < 3 || height < 3 {
            return Self { by_province };
        }

        for y in 1..height - 1 {
            for x in 1..width - 1 {
                if is_edge(pids, width, x, y) {
                    by_province
                        .entry(pids[y * width + x])
                        .or_default()
                        .push((x as u32, y as u32));
                }
            }
        }
        Self { by_province }
    }

    pub fn province_count(&self) -> usize {
        self.by_province.len()
    }

    pub fn pixels_for(&self, selection: &SelectionSet) -> Vec<Pixel> {
        let mut out: Vec<Pixel> = selection
            .iter()
            .filter_map(|pid| self.by_province.get(&pid))
            .flatten()
            .copied()
            .collect();
        out.sort_unstable_by_key(|&(x, y)| (y, x));
        out
    }
}
