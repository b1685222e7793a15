//! Component areas remembered between render passes.

use std::collections::HashMap;
use std::sync::Arc;

use crate::area::ComponentArea;
use crate::component::{ComponentId, DrawState};

#[derive(Debug, Clone)]
struct CachedArea {
    area: Arc<ComponentArea>,
    state: DrawState,
}

/// Areas keyed by component, each tagged with the draw state it was recorded in.
///
/// An entry is reused only while the component keeps being drawn in the same
/// state. Anything that changes a component's geometry must call
/// [`invalidate`](AreaCache::invalidate).
#[derive(Debug, Default)]
pub struct AreaCache {
    entries: HashMap<ComponentId, CachedArea>,
}

impl AreaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached area of `id`, whatever state it was recorded in.
    pub fn get(&self, id: ComponentId) -> Option<Arc<ComponentArea>> {
        self.entries.get(&id).map(|e| Arc::clone(&e.area))
    }

    /// The cached area of `id` if it was recorded in `state`.
    pub fn get_valid(&self, id: ComponentId, state: DrawState) -> Option<Arc<ComponentArea>> {
        self.entries
            .get(&id)
            .filter(|e| e.state == state)
            .map(|e| Arc::clone(&e.area))
    }

    pub fn state_of(&self, id: ComponentId) -> Option<DrawState> {
        self.entries.get(&id).map(|e| e.state)
    }

    pub fn insert(
        &mut self,
        id: ComponentId,
        area: ComponentArea,
        state: DrawState,
    ) -> Arc<ComponentArea> {
        let area = Arc::new(area);
        self.entries.insert(
            id,
            CachedArea {
                area: Arc::clone(&area),
                state,
            },
        );
        area
    }

    /// Drop the entry for `id`. Returns whether there was one.
    pub fn invalidate(&mut self, id: ComponentId) -> bool {
        self.entries.remove(&id).is_some()
    }

    /// Drop every entry, returning how many there were.
    pub fn clear(&mut self) -> usize {
        let n = self.entries.len();
        self.entries.clear();
        n
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.entries.contains_key(&id)
    }
}
