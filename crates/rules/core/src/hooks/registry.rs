//! Registry mapping identifiers to hook sets, and the ordered stacks a
//! lookup produces.

use std::collections::HashMap;
use std::sync::Arc;

use super::{HookId, LifecycleHooks};

/// Process-wide map from identifier to hook set.
///
/// Built once during content loading, then only read. Resolution never
/// mutates the registry; it captures a [`HookStack`] and works from that.
#[derive(Default)]
pub struct HookRegistry {
    entries: HashMap<HookId, Arc<dyn LifecycleHooks>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a hook set under `id`.
    ///
    /// Last writer wins: re-registering an id replaces the previous entry,
    /// but stacks captured before the replacement keep the entry they saw.
    pub fn register(&mut self, id: impl Into<HookId>, hooks: Arc<dyn LifecycleHooks>) {
        self.entries.insert(id.into(), hooks);
    }

    /// Returns the hook set registered under `id`, if any.
    pub fn get(&self, id: &HookId) -> Option<&Arc<dyn LifecycleHooks>> {
        self.entries.get(id)
    }

    /// Captures an ordered stack for the given identifiers.
    ///
    /// Ids are visited in the order supplied; ids with no registration are
    /// skipped silently (an actor may carry a talent the loaded content
    /// does not define hooks for). The returned stack owns `Arc` clones,
    /// so later re-registration cannot affect it.
    pub fn capture<'a>(&self, ids: impl IntoIterator<Item = &'a HookId>) -> HookStack {
        let hooks = ids
            .into_iter()
            .filter_map(|id| {
                self.entries
                    .get(id)
                    .map(|entry| (id.clone(), Arc::clone(entry)))
            })
            .collect();
        HookStack { hooks }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates registered ids in arbitrary order (for diagnostics).
    pub fn ids(&self) -> impl Iterator<Item = &HookId> {
        self.entries.keys()
    }
}

/// An ordered snapshot of hook sets captured for one resolution.
///
/// The stack preserves lookup order; iterating yields `(id, hooks)` pairs
/// so the runner can attribute faults to the hook that raised them.
#[derive(Clone, Default)]
pub struct HookStack {
    hooks: Vec<(HookId, Arc<dyn LifecycleHooks>)>,
}

impl HookStack {
    pub fn iter(&self) -> impl Iterator<Item = (&HookId, &Arc<dyn LifecycleHooks>)> {
        self.hooks.iter().map(|(id, hooks)| (id, hooks))
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Appends another stack (used to add target-scoped hooks after the
    /// actor-scoped ones).
    pub fn extend(&mut self, other: HookStack) {
        self.hooks.extend(other.hooks);
    }
}
