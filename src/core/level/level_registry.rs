//=========================================================================
// Level Registry
//=========================================================================
//
// Manages level registration, load/unload requests, and lifecycle.
//
// Levels are stored in a HashMap by id and referenced by a list of loaded
// instances. Additive loads may stack several instances of the same level;
// an unload removes the oldest one. Registration order doubles as the
// build order used to answer "is there a next level?".
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::{Level, LevelContext, LevelId, LevelLoader, LevelRequest, LevelRequestQueue, LoadMode};

//=== LevelRegistry =======================================================

/// Concrete [`LevelLoader`] owning every registered level.
pub struct LevelRegistry {
    levels: HashMap<LevelId, Box<dyn Level>>,
    build_order: Vec<LevelId>,
    loaded: Vec<LevelId>,
    requests: LevelRequestQueue,
}

impl LevelRegistry {
    //--- Construction -----------------------------------------------------

    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            levels: HashMap::new(),
            build_order: Vec::new(),
            loaded: Vec::new(),
            requests: LevelRequestQueue::new(),
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a level. New ids are appended to the build order;
    /// re-registering an id replaces its content but keeps its position.
    pub fn register<T>(&mut self, id: impl Into<LevelId>, level: T)
    where
        T: Level + 'static,
    {
        let id = id.into();
        if self.levels.insert(id.clone(), Box::new(level)).is_some() {
            warn!(target: "level", "Level {} was already registered and has been replaced", id);
        } else {
            debug!(target: "level", "Registered level {} at build index {}", id, self.build_order.len());
            self.build_order.push(id);
        }
    }

    /// Registers a level and loads it immediately, bypassing the queue.
    ///
    /// Used for the level the host boots into.
    pub fn register_loaded<T>(&mut self, id: impl Into<LevelId>, level: T)
    where
        T: Level + 'static,
    {
        let id = id.into();
        self.register(id.clone(), level);
        self.load_internal(id);
    }

    //--- Request Processing -----------------------------------------------

    /// Applies all queued requests in FIFO order.
    ///
    /// Should be called at the tick boundary after the session has ticked.
    pub fn process_requests(&mut self) {
        for request in self.requests.take() {
            match request {
                LevelRequest::Load(id, LoadMode::Additive) => self.load_internal(id),
                LevelRequest::Load(id, LoadMode::Exclusive) => {
                    self.unload_all_internal();
                    self.load_internal(id);
                }
                LevelRequest::Unload(id) => self.unload_internal(&id),
            }
        }
    }

    //--- Update Loop ------------------------------------------------------

    /// Updates every loaded level once, oldest first.
    pub fn update(&mut self, context: &mut LevelContext<'_>) {
        let mut active: Vec<LevelId> = Vec::with_capacity(self.loaded.len());
        for id in &self.loaded {
            if !active.contains(id) {
                active.push(id.clone());
            }
        }

        for id in &active {
            if let Some(level) = self.levels.get_mut(id) {
                level.update(context);
            }
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn is_registered(&self, id: &LevelId) -> bool {
        self.levels.contains_key(id)
    }

    pub fn is_loaded(&self, id: &LevelId) -> bool {
        self.loaded.contains(id)
    }

    /// Number of loaded instances of `id`.
    pub fn instance_count(&self, id: &LevelId) -> usize {
        self.loaded.iter().filter(|loaded| *loaded == id).count()
    }

    /// Loaded instances, oldest first.
    pub fn loaded_levels(&self) -> &[LevelId] {
        &self.loaded
    }

    /// Most recently loaded instance.
    pub fn active_level(&self) -> Option<&LevelId> {
        self.loaded.last()
    }

    /// Registered ids in build order.
    pub fn build_order(&self) -> &[LevelId] {
        &self.build_order
    }

    /// Requests not yet applied.
    pub fn pending_requests(&self) -> usize {
        self.requests.len()
    }

    //--- Internal Helpers -------------------------------------------------

    fn load_internal(&mut self, id: LevelId) {
        let Some(level) = self.levels.get_mut(&id) else {
            warn!(target: "level", "Attempted to load unregistered level {}", id);
            return;
        };

        info!(target: "level", "Loading level {}", id);
        level.on_load();
        self.loaded.push(id);
    }

    fn unload_internal(&mut self, id: &LevelId) {
        let Some(pos) = self.loaded.iter().position(|loaded| loaded == id) else {
            debug!(target: "level", "Level {} not loaded, skipping unload", id);
            return;
        };

        info!(target: "level", "Unloading level {}", id);
        self.loaded.remove(pos);
        if let Some(level) = self.levels.get_mut(id) {
            level.on_unload();
        }
    }

    fn unload_all_internal(&mut self) {
        debug!(target: "level", "Unloading all {} level instances", self.loaded.len());
        for id in std::mem::take(&mut self.loaded) {
            if let Some(level) = self.levels.get_mut(&id) {
                level.on_unload();
            }
        }
    }
}

impl Default for LevelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

//=== LevelLoader Implementation ==========================================

impl LevelLoader for LevelRegistry {
    fn load(&mut self, level: &LevelId, mode: LoadMode) {
        debug!(target: "level", "Queued load of {} ({:?})", level, mode);
        self.requests.push(LevelRequest::Load(level.clone(), mode));
    }

    fn unload(&mut self, level: &LevelId) {
        debug!(target: "level", "Queued unload of {}", level);
        self.requests.push(LevelRequest::Unload(level.clone()));
    }

    fn next_level(&self, current: &LevelId) -> Option<LevelId> {
        let index = self.build_order.iter().position(|id| id == current)?;
        self.build_order.get(index + 1).cloned()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::StateTracker;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    //--- Test Helpers -----------------------------------------------------

    #[derive(Default, Clone)]
    struct Counters {
        loads: Arc<AtomicUsize>,
        unloads: Arc<AtomicUsize>,
        updates: Arc<AtomicUsize>,
    }

    struct CountingLevel(Counters);

    impl Level for CountingLevel {
        fn on_load(&mut self) {
            self.0.loads.fetch_add(1, Ordering::SeqCst);
        }

        fn on_unload(&mut self) {
            self.0.unloads.fetch_add(1, Ordering::SeqCst);
        }

        fn update(&mut self, context: &mut LevelContext<'_>) {
            self.0.updates.fetch_add(1, Ordering::SeqCst);
            context.award(1);
        }
    }

    struct EmptyLevel;
    impl Level for EmptyLevel {}

    fn id(name: &str) -> LevelId {
        LevelId::from(name)
    }

    //--- Request Tests ----------------------------------------------------

    #[test]
    fn requests_are_deferred_until_processed() {
        let mut registry = LevelRegistry::new();
        registry.register("Arena", EmptyLevel);

        registry.load(&id("Arena"), LoadMode::Additive);
        assert!(!registry.is_loaded(&id("Arena")));
        assert_eq!(registry.pending_requests(), 1);

        registry.process_requests();
        assert!(registry.is_loaded(&id("Arena")));
        assert_eq!(registry.pending_requests(), 0);
    }

    #[test]
    fn additive_load_stacks_instances_and_unload_removes_oldest() {
        let counters = Counters::default();
        let mut registry = LevelRegistry::new();
        registry.register_loaded("Menu", EmptyLevel);
        registry.register("Arena", CountingLevel(counters.clone()));

        registry.load(&id("Arena"), LoadMode::Additive);
        registry.process_requests();
        registry.load(&id("Arena"), LoadMode::Additive);
        registry.unload(&id("Arena"));
        registry.process_requests();

        assert_eq!(registry.instance_count(&id("Arena")), 1);
        assert_eq!(registry.loaded_levels(), &[id("Menu"), id("Arena")]);
        assert_eq!(counters.loads.load(Ordering::SeqCst), 2);
        assert_eq!(counters.unloads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn exclusive_load_replaces_everything() {
        let mut registry = LevelRegistry::new();
        registry.register_loaded("Menu", EmptyLevel);
        registry.register("Arena", EmptyLevel);

        registry.load(&id("Arena"), LoadMode::Exclusive);
        registry.process_requests();

        assert_eq!(registry.loaded_levels(), &[id("Arena")]);
        assert_eq!(registry.active_level(), Some(&id("Arena")));
    }

    #[test]
    fn unregistered_load_and_missing_unload_are_ignored() {
        let mut registry = LevelRegistry::new();

        registry.load(&id("Ghost"), LoadMode::Additive);
        registry.unload(&id("Ghost"));
        registry.process_requests();

        assert!(registry.loaded_levels().is_empty());
    }

    #[test]
    fn reregistering_keeps_build_position() {
        let mut registry = LevelRegistry::new();
        registry.register("Menu", EmptyLevel);
        registry.register("Arena", EmptyLevel);
        registry.register("Menu", EmptyLevel);

        assert_eq!(registry.build_order(), &[id("Menu"), id("Arena")]);
    }

    //--- Next Level Tests -------------------------------------------------

    #[test]
    fn has_next_level_follows_build_order() {
        let mut registry = LevelRegistry::new();
        registry.register("Menu", EmptyLevel);
        registry.register("Arena", EmptyLevel);
        registry.register("Bonus", EmptyLevel);

        assert!(registry.has_next_level(&id("Menu")));
        assert!(registry.has_next_level(&id("Arena")));
        assert!(!registry.has_next_level(&id("Bonus")));
        assert!(!registry.has_next_level(&id("Unknown")));
    }

    #[test]
    fn next_level_names_the_successor() {
        let mut registry = LevelRegistry::new();
        registry.register("Menu", EmptyLevel);
        registry.register("Arena", EmptyLevel);
        registry.register("Bonus", EmptyLevel);

        assert_eq!(registry.next_level(&id("Arena")), Some(id("Bonus")));
        assert_eq!(registry.next_level(&id("Bonus")), None);
        assert_eq!(registry.next_level(&id("Unknown")), None);
    }

    //--- Update Tests -----------------------------------------------------

    #[test]
    fn update_runs_each_loaded_level_once() {
        let counters = Counters::default();
        let mut registry = LevelRegistry::new();
        registry.register("Arena", CountingLevel(counters.clone()));
        registry.load(&id("Arena"), LoadMode::Additive);
        registry.load(&id("Arena"), LoadMode::Additive);
        registry.process_requests();

        let input = StateTracker::new();
        let mut ctx = LevelContext::new(&input, 0.016);
        registry.update(&mut ctx);

        assert_eq!(counters.updates.load(Ordering::SeqCst), 1);
        assert_eq!(ctx.report().score, 1);
    }
}
