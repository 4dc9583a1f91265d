//=========================================================================
// Input System
//
// High-level interface for input handling within the session runtime.
// Turns per-frame batches of keyboard events into edge-triggered
// `SessionAction`s, and exposes the raw key state to levels.
//
// Responsibilities:
// - Aggregate and process batches of input events once per tick
// - Detect presses (UP → DOWN transitions) via `StateTracker`
// - Resolve presses into actions through the `ActionMapper`
//
// Notes:
// This system is owned and updated by `GlobalSystems` on the logic thread.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod action;
pub(crate) mod action_mapper;
pub mod event;
pub mod state_tracker;

//=== Public API ==========================================================

pub use action::{ActionKind, SessionAction};
pub use event::{InputEvent, KeyCode, Modifiers};
pub use state_tracker::StateTracker;

//=== External Crates =====================================================

use log::debug;

//=== Internal Imports ====================================================

use action_mapper::ActionMapper;

//=== InputSystem =========================================================

/// Owns the key state and bindings; produces this frame's actions.
pub struct InputSystem {
    state: StateTracker,
    mapper: ActionMapper,
    actions: Vec<SessionAction>,
}

impl InputSystem {
    //--- Construction -----------------------------------------------------

    /// Creates an input system with the default session bindings.
    pub fn new() -> Self {
        Self {
            state: StateTracker::new(),
            mapper: ActionMapper::with_defaults(),
            actions: Vec::with_capacity(4),
        }
    }

    /// Creates an input system without any bindings.
    pub fn unbound() -> Self {
        Self {
            state: StateTracker::new(),
            mapper: ActionMapper::new(),
            actions: Vec::new(),
        }
    }

    //--- Bindings ---------------------------------------------------------

    /// Binds an unmodified key to an action.
    pub fn bind_key(&mut self, key: KeyCode, action: SessionAction) {
        self.mapper.bind_key(key, action);
    }

    /// Binds a key + modifier combination to an action.
    pub fn bind_key_with_mods(&mut self, key: KeyCode, modifiers: Modifiers, action: SessionAction) {
        self.mapper.bind_key_with_mods(key, modifiers, action);
    }

    /// Removes the unmodified binding for a key.
    pub fn unbind_key(&mut self, key: KeyCode) {
        self.mapper.unbind_key(key);
    }

    /// Removes every binding for an action.
    pub fn unbind_action(&mut self, action: SessionAction) {
        self.mapper.unbind_action(action);
    }

    //--- process_frame() --------------------------------------------------
    //
    // Clears last frame's deltas, digests every batch received this frame
    // and resolves fresh presses into actions. Actions are sorted so a
    // frame's outcome doesn't depend on key report order.
    //
    pub fn process_frame(&mut self, batches: &[Vec<InputEvent>]) {
        self.state.clear();
        for batch in batches {
            self.state.process_events(batch);
        }

        self.actions.clear();
        let modifiers = self.state.modifiers();
        for key in self.state.keys_pressed() {
            if let Some(action) = self.mapper.map_key(*key, modifiers) {
                self.actions.push(action);
            }
        }
        self.actions.sort();
        self.actions.dedup();

        if !self.actions.is_empty() {
            debug!(target: "input", "Actions this frame: {:?}", self.actions);
        }
    }

    //--- Query Methods ----------------------------------------------------

    /// Actions triggered this frame.
    pub fn actions(&self) -> &[SessionAction] {
        &self.actions
    }

    /// Raw key state, for levels that read keys directly.
    pub fn state(&self) -> &StateTracker {
        &self.state
    }
}

impl Default for InputSystem {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
