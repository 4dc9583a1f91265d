//=========================================================================
// Session Actions
//=========================================================================
//
// High-level commands the input layer hands to the session controller.
//
// Actions fall in three groups:
//   Normal      → Quit
//   Menu        → Play, Menu, Restart (stand-ins for UI buttons)
//   Diagnostic  → ForceGameOver, DebugPrint, DebugLoseLife
//
// Diagnostic actions are ignored unless the session config enables
// `debug_keys`.
//
//=========================================================================

/// A discrete, edge-triggered command sampled once per tick.
///
/// Ordering is stable so that a frame's actions are always applied in the
/// same sequence regardless of the order keys were reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SessionAction {
    /// Leave the menu and start (or replay) the play level.
    Play,

    /// Abort the play-through and return to the menu.
    Menu,

    /// Restart the play-through from defaults.
    Restart,

    /// Force the session into GameOver.
    ForceGameOver,

    /// Take one life away.
    DebugLoseLife,

    /// Dump session state to the log.
    DebugPrint,

    /// Terminate the application.
    Quit,
}

/// Category of a [`SessionAction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Normal,
    Menu,
    Diagnostic,
}

impl SessionAction {
    /// Returns which group the action belongs to.
    pub fn kind(self) -> ActionKind {
        match self {
            Self::Quit => ActionKind::Normal,
            Self::Play | Self::Menu | Self::Restart => ActionKind::Menu,
            Self::ForceGameOver | Self::DebugLoseLife | Self::DebugPrint => ActionKind::Diagnostic,
        }
    }

    /// Returns `true` for maintenance-only actions.
    pub fn is_diagnostic(self) -> bool {
        self.kind() == ActionKind::Diagnostic
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_actions_are_flagged() {
        assert!(SessionAction::ForceGameOver.is_diagnostic());
        assert!(SessionAction::DebugLoseLife.is_diagnostic());
        assert!(SessionAction::DebugPrint.is_diagnostic());
        assert!(!SessionAction::Quit.is_diagnostic());
        assert!(!SessionAction::Play.is_diagnostic());
    }

    #[test]
    fn menu_actions_sort_before_quit() {
        let mut actions = vec![SessionAction::Quit, SessionAction::Restart, SessionAction::Play];
        actions.sort();
        assert_eq!(
            actions,
            vec![SessionAction::Play, SessionAction::Restart, SessionAction::Quit]
        );
    }
}
