use chandec_common::db::indices::TileId;
use std::collections::HashMap;

const INITIAL_CAPACITY: usize = 128;

/// Maps finalized channel tiles to whatever the caller builds for them.
///
/// A decomposition rebuilds the result plane and invalidates every tile id,
/// so each run starts with [`reset`](ChannelMap::reset), which drops (and so
/// releases) all handles from the previous run.
#[derive(Debug)]
pub struct ChannelMap<H> {
    entries: HashMap<TileId, H>,
}

impl<H> Default for ChannelMap<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> ChannelMap<H> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::with_capacity(INITIAL_CAPACITY),
        }
    }

    pub fn reset(&mut self) {
        if !self.entries.is_empty() {
            log::debug!("Releasing {} channel handles", self.entries.len());
        }
        self.entries = HashMap::with_capacity(INITIAL_CAPACITY);
    }

    pub fn insert(&mut self, tile: TileId, handle: H) -> Option<H> {
        self.entries.insert(tile, handle)
    }

    pub fn get(&self, tile: TileId) -> Option<&H> {
        self.entries.get(&tile)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TileId, &H)> {
        self.entries.iter().map(|(&k, v)| (k, v))
    }
}
