use std::collections::HashSet;

use image::RgbImage;
use province_map_shared::{ProvinceId, UNMAPPED};

use crate::definition::ColorTable;

/// Radius of the 4-connected dilation around playable provinces.
pub const DILATION_RADIUS: u32 = 30;
/// Nearest-neighbour upscale applied to the cropped output.
pub const SCALE_FACTOR: u32 = 2;

/// Row-major province ID per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdMap {
    width: u32,
    height: u32,
    ids: Vec<ProvinceId>,
}

/// Pixel rectangle, `x`/`y` inclusive, `width`/`height` in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl IdMap {
    /// Colours missing from the table map to [`UNMAPPED`].
    pub fn from_image(image: &RgbImage, table: &ColorTable) -> Self {
        let ids = image
            .pixels()
            .map(|pixel| table.get(&pixel.0).copied().unwrap_or(UNMAPPED))
            .collect();
        Self {
            width: image.width(),
            height: image.height(),
            ids,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> ProvinceId {
        self.ids[(y * self.width + x) as usize]
    }

    pub fn rows(&self) -> Vec<Vec<ProvinceId>> {
        if self.width == 0 {
            return Vec::new();
        }
        self.ids
            .chunks(self.width as usize)
            .map(<[ProvinceId]>::to_vec)
            .collect()
    }

    pub fn crop(&self, rect: CropRect) -> Self {
        let mut ids = Vec::with_capacity((rect.width * rect.height) as usize);
        for y in rect.y..rect.y + rect.height {
            let start = (y * self.width + rect.x) as usize;
            ids.extend_from_slice(&self.ids[start..start + rect.width as usize]);
        }
        Self {
            width: rect.width,
            height: rect.height,
            ids,
        }
    }

    pub fn upscale(&self, factor: u32) -> Self {
        let width = self.width * factor;
        let height = self.height * factor;
        let mut ids = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                ids.push(self.get(x / factor, y / factor));
            }
        }
        Self { width, height, ids }
    }

    /// True if any pixel inside `rect` carries a province.
    pub fn any_mapped(&self, rect: CropRect) -> bool {
        (rect.y..rect.y + rect.height).any(|y| {
            let start = (y * self.width + rect.x) as usize;
            self.ids[start..start + rect.width as usize]
                .iter()
                .any(|id| *id != UNMAPPED)
        })
    }
}

/// Pixels whose province belongs to a playable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    pub fn from_ids(map: &IdMap, wanted: &HashSet<ProvinceId>) -> Self {
        Self {
            width: map.width,
            height: map.height,
            bits: map.ids.iter().map(|id| wanted.contains(id)).collect(),
        }
    }

    pub fn count(&self) -> usize {
        self.bits.iter().filter(|bit| **bit).count()
    }

    /// Equivalent to `radius` rounds of binary dilation with the 4-connected
    /// cross: a pixel is set when its Manhattan distance to the mask is at
    /// most `radius`. Computed with a two-pass distance transform.
    pub fn dilate(&self, radius: u32) -> Self {
        let (w, h) = (self.width as usize, self.height as usize);
        let far = u32::MAX / 2;
        let mut dist: Vec<u32> = self.bits.iter().map(|bit| if *bit { 0 } else { far }).collect();

        for y in 0..h {
            for x in 0..w {
                let i = y * w + x;
                if x > 0 {
                    dist[i] = dist[i].min(dist[i - 1] + 1);
                }
                if y > 0 {
                    dist[i] = dist[i].min(dist[i - w] + 1);
                }
            }
        }
        for y in (0..h).rev() {
            for x in (0..w).rev() {
                let i = y * w + x;
                if x + 1 < w {
                    dist[i] = dist[i].min(dist[i + 1] + 1);
                }
                if y + 1 < h {
                    dist[i] = dist[i].min(dist[i + w] + 1);
                }
            }
        }

        Self {
            width: self.width,
            height: self.height,
            bits: dist.into_iter().map(|d| d <= radius).collect(),
        }
    }

    /// Bounding box of the set pixels grown by one pixel on each side,
    /// clamped to the image. `None` for an empty mask.
    pub fn crop_rect(&self) -> Option<CropRect> {
        let w = self.width as usize;
        let mut bbox: Option<(u32, u32, u32, u32)> = None;
        for (i, _) in self.bits.iter().enumerate().filter(|(_, bit)| **bit) {
            let (x, y) = ((i % w) as u32, (i / w) as u32);
            bbox = Some(match bbox {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }

        let (x_min, y_min, x_max, y_max) = bbox?;
        let x = x_min.saturating_sub(1);
        let y = y_min.saturating_sub(1);
        let x_end = (x_max + 2).min(self.width);
        let y_end = (y_max + 2).min(self.height);
        Some(CropRect {
            x,
            y,
            width: x_end - x,
            height: y_end - y,
        })
    }

    #[cfg(test)]
    fn is_set(&self, x: u32, y: u32) -> bool {
        self.bits[(y * self.width + x) as usize]
    }
}

/// Nearest-neighbour upscale of the source bitmap, pixel-aligned with
/// [`IdMap::upscale`].
pub fn upscale_image(image: &RgbImage, factor: u32) -> RgbImage {
    RgbImage::from_fn(image.width() * factor, image.height() * factor, |x, y| {
        *image.get_pixel(x / factor, y / factor)
    })
}
