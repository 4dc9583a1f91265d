//=========================================================================
// Action Mapper
//=========================================================================
//
// Maps key presses to session actions based on configured bindings.
//
// Architecture:
//   (key, modifiers) → HashMap → SessionAction
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

//=== Internal Dependencies ===============================================

use super::action::SessionAction;
use super::event::{KeyCode, Modifiers};

//=== ActionMapper ========================================================

/// Maps key presses to actions via exact (key, modifiers) lookups.
pub(crate) struct ActionMapper {
    key_bindings: HashMap<(KeyCode, Modifiers), SessionAction>,
}

impl ActionMapper {
    /// Creates a mapper with no bindings.
    pub(crate) fn new() -> Self {
        Self { key_bindings: HashMap::new() }
    }

    /// Creates a mapper with the default session bindings.
    pub(crate) fn with_defaults() -> Self {
        let mut mapper = Self::new();
        mapper.bind_key(KeyCode::Escape, SessionAction::Quit);
        mapper.bind_key(KeyCode::End, SessionAction::ForceGameOver);
        mapper.bind_key(KeyCode::KeyY, SessionAction::DebugPrint);
        mapper.bind_key(KeyCode::KeyL, SessionAction::DebugLoseLife);
        mapper.bind_key(KeyCode::Enter, SessionAction::Play);
        mapper.bind_key(KeyCode::KeyM, SessionAction::Menu);
        mapper.bind_key(KeyCode::KeyR, SessionAction::Restart);
        mapper
    }

    //--- Binding API ------------------------------------------------------

    /// Binds a key (no modifiers) to an action, replacing any previous binding.
    pub(crate) fn bind_key(&mut self, key: KeyCode, action: SessionAction) {
        self.bind_key_with_mods(key, Modifiers::NONE, action);
    }

    /// Binds a key with modifiers to an action (exact match required).
    pub(crate) fn bind_key_with_mods(
        &mut self,
        key: KeyCode,
        modifiers: Modifiers,
        action: SessionAction,
    ) {
        self.key_bindings.insert((key, modifiers), action);
    }

    /// Removes the unmodified binding for a key.
    pub(crate) fn unbind_key(&mut self, key: KeyCode) {
        self.key_bindings.remove(&(key, Modifiers::NONE));
    }

    /// Removes every binding that resolves to `action`.
    pub(crate) fn unbind_action(&mut self, action: SessionAction) {
        self.key_bindings.retain(|_, bound| *bound != action);
    }

    //--- Mapping ----------------------------------------------------------

    /// Maps a key press to an action.
    pub(crate) fn map_key(&self, key: KeyCode, modifiers: Modifiers) -> Option<SessionAction> {
        self.key_bindings.get(&(key, modifiers)).copied()
    }

    /// Returns the number of bindings.
    pub(crate) fn len(&self) -> usize {
        self.key_bindings.len()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
