use std::collections::HashMap;

use crate::viewport::MapRect;

/// Edge length of one square tile image, in map pixels.
pub const TILE_SIZE: u32 = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Cache key and file stem, `"{x}_{y}"`.
    pub fn key(&self) -> String {
        format!("{}_{}", self.x, self.y)
    }

    /// Map-space position of the tile's top-left corner.
    pub fn origin(&self) -> (f64, f64) {
        (
            self.x as f64 * TILE_SIZE as f64,
            self.y as f64 * TILE_SIZE as f64,
        )
    }
}

pub fn tile_url(base: &str, coord: TileCoord) -> String {
    format!("{base}{}.png", coord.key())
}

/// Tiles of a `cols x rows` grid intersecting `rect`, row-major.
pub fn visible_tiles(rect: MapRect, cols: u32, rows: u32) -> Vec<TileCoord> {
    let size = TILE_SIZE as f64;
    let span = |start: f64, len: f64, count: u32| -> (u32, u32) {
        if !start.is_finite() || !len.is_finite() || len <= 0.0 {
            return (0, 0);
        }
        let first = (start / size).floor().max(0.0);
        let last = ((start + len) / size).ceil().min(count as f64);
        if last <= first {
            return (0, 0);
        }
        (first as u32, last as u32)
    };

    let (col_start, col_end) = span(rect.x, rect.width, cols);
    let (row_start, row_end) = span(rect.y, rect.height, rows);

    let mut out = Vec::with_capacity(((col_end - col_start) * (row_end - row_start)) as usize);
    for y in row_start..row_end {
        for x in col_start..col_end {
            out.push(TileCoord::new(x, y));
        }
    }
    out
}

/// Every tile of a `cols x rows` grid, row-major.
pub fn all_tiles(cols: u32, rows: u32) -> Vec<TileCoord> {
    (0..rows)
        .flat_map(|y| (0..cols).map(move |x| TileCoord::new(x, y)))
        .collect()
}

#[derive(Debug)]
enum TileSlot<T> {
    Pending,
    Ready(T),
    Failed,
}

#[derive(Debug, PartialEq)]
pub enum TileLookup<'a, T> {
    Ready(&'a T),
    Pending,
}

/// Completion notice emitted when a fetch settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileEvent {
    Ready(TileCoord),
    Failed(TileCoord),
}

/// Memoizing tile store. Each coordinate is fetched at most once and never evicted.
#[derive(Debug)]
pub struct TileCache<T> {
    base_url: String,
    slots: HashMap<TileCoord, TileSlot<T>>,
}

impl<T> TileCache<T> {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            slots: HashMap::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Return the tile if loaded. The first lookup of an unknown coordinate calls
    /// `request` with the tile's URL and marks it in flight.
    pub fn get_or_request(
        &mut self,
        coord: TileCoord,
        request: impl FnOnce(TileCoord, String),
    ) -> TileLookup<'_, T> {
        if !self.slots.contains_key(&coord) {
            self.slots.insert(coord, TileSlot::Pending);
            request(coord, tile_url(&self.base_url, coord));
        }
        match self.slots.get(&coord) {
            Some(TileSlot::Ready(image)) => TileLookup::Ready(image),
            _ => TileLookup::Pending,
        }
    }

    pub fn get(&self, coord: TileCoord) -> Option<&T> {
        match self.slots.get(&coord) {
            Some(TileSlot::Ready(image)) => Some(image),
            _ => None,
        }
    }

    pub fn finish_loaded(&mut self, coord: TileCoord, image: T) -> TileEvent {
        self.slots.insert(coord, TileSlot::Ready(image));
        TileEvent::Ready(coord)
    }

    /// Failed tiles stay failed: they are never re-requested and never paint.
    pub fn finish_failed(&mut self, coord: TileCoord) -> TileEvent {
        if !matches!(self.slots.get(&coord), Some(TileSlot::Ready(_))) {
            self.slots.insert(coord, TileSlot::Failed);
        }
        TileEvent::Failed(coord)
    }

    pub fn ready_count(&self) -> usize {
        self.count(|slot| matches!(slot, TileSlot::Ready(_)))
    }

    pub fn pending_count(&self) -> usize {
        self.count(|slot| matches!(slot, TileSlot::Pending))
    }

    pub fn failed_count(&self) -> usize {
        self.count(|slot| matches!(slot, TileSlot::Failed))
    }

    fn count(&self, pred: impl Fn(&TileSlot<T>) -> bool) -> usize {
        self.slots.values().filter(|slot| pred(slot)).count()
    }
}
