use std::collections::BTreeSet;

use crate::raster::ProvinceId;

/// Selected provinces. Iteration is ascending by ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<ProvinceId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, pid: ProvinceId) -> bool {
        self.ids.contains(&pid)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ProvinceId> + '_ {
        self.ids.iter().copied()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Returns `false` if `pid` was already selected.
    pub fn add(&mut self, pid: ProvinceId) -> bool {
        self.ids.insert(pid)
    }

    pub fn add_all(&mut self, ids: impl IntoIterator<Item = ProvinceId>) {
        self.ids.extend(ids);
    }

    pub fn replace_with(&mut self, pid: ProvinceId) {
        self.clear();
        self.add(pid);
    }

    /// Space-separated IDs for the clipboard.
    pub fn clipboard_text(&self) -> String {
        self.ids
            .iter()
            .map(ProvinceId::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl FromIterator<ProvinceId> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = ProvinceId>>(iter: I) -> Self {
        let mut set = Self::new();
        set.add_all(iter);
        set
    }
}
