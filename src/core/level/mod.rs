//=========================================================================
// Level System
//=========================================================================
//
// Level identity, the level-loader contract consumed by the session, and
// the per-level lifecycle hooks.
//
// Architecture:
//   LevelRegistry
//     ├─ levels: HashMap<LevelId, Box<dyn Level>>
//     ├─ build_order: Vec<LevelId>
//     ├─ loaded: Vec<LevelId>            (instances, oldest first)
//     └─ requests: LevelRequestQueue     (applied at tick boundary)
//
// Flow:
//   SessionController → load()/unload() → queue
//   tick boundary     → process_requests() → on_load()/on_unload()
//   every tick        → update() → Level::update(LevelContext)
//
//=========================================================================

//=== Module Declarations =================================================

mod level_registry;
mod request_queue;

//=== Public API ==========================================================

pub use level_registry::LevelRegistry;
pub use request_queue::{LevelRequest, LevelRequestQueue};

//=== External Dependencies ===============================================

use std::fmt;

use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::core::input::StateTracker;
use crate::core::services::Position;

//=== LevelId =============================================================

/// Name of a level, unique within a registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelId(String);

impl LevelId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LevelId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for LevelId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

//=== LoadMode ============================================================

/// How a load request treats levels that are already loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadMode {
    /// Keep everything loaded and add the level on top.
    Additive,

    /// Unload everything, then load the level.
    Exclusive,
}

//=== LevelLoader =========================================================

/// Brings level content in and out.
///
/// Requests are fire-and-forget: callers must not assume a level is loaded
/// (or gone) when the call returns.
pub trait LevelLoader: Send {
    fn load(&mut self, level: &LevelId, mode: LoadMode);

    fn unload(&mut self, level: &LevelId);

    /// Level that follows `current` in the loader's ordering.
    fn next_level(&self, current: &LevelId) -> Option<LevelId>;

    /// `true` if a level follows `current` in the loader's ordering.
    fn has_next_level(&self, current: &LevelId) -> bool {
        self.next_level(current).is_some()
    }
}

//=== Level Trait =========================================================

/// Content of a level, with lifecycle hooks and per-tick update.
///
/// Only `update()` is worth overriding for most levels; the load hooks
/// default to no-ops.
pub trait Level: Send {
    /// Called each time an instance of the level is loaded.
    fn on_load(&mut self) {}

    /// Called each time an instance of the level is unloaded.
    fn on_unload(&mut self) {}

    /// Called once per tick while at least one instance is loaded.
    fn update(&mut self, _context: &mut LevelContext<'_>) {}
}

//=== GameplayReport ======================================================

/// What levels observed during one tick, applied to the session afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameplayReport {
    /// Points scored this tick.
    pub score: u32,

    /// The player took lethal damage.
    pub player_died: bool,

    /// Last known player position, if it moved.
    pub player_position: Option<Position>,
}

impl GameplayReport {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

//=== LevelContext ========================================================

/// Per-tick view handed to [`Level::update`].
pub struct LevelContext<'a> {
    /// Keyboard state for this tick.
    pub input: &'a StateTracker,

    /// Seconds since the previous tick.
    pub delta_time: f32,

    report: GameplayReport,
}

impl<'a> LevelContext<'a> {
    pub fn new(input: &'a StateTracker, delta_time: f32) -> Self {
        Self { input, delta_time, report: GameplayReport::default() }
    }

    /// Awards points to the player.
    pub fn award(&mut self, points: u32) {
        self.report.score = self.report.score.saturating_add(points);
    }

    /// Reports that the player died.
    pub fn player_died(&mut self) {
        self.report.player_died = true;
    }

    /// Reports the player's current position.
    pub fn player_moved(&mut self, position: Position) {
        self.report.player_position = Some(position);
    }

    pub fn report(&self) -> &GameplayReport {
        &self.report
    }

    pub fn into_report(self) -> GameplayReport {
        self.report
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_id_display_and_conversions() {
        let id = LevelId::from("Arena");
        assert_eq!(id.to_string(), "Arena");
        assert_eq!(id, LevelId::new(String::from("Arena")));
        assert!(LevelId::new("  ").is_empty());
    }

    #[test]
    fn context_accumulates_report() {
        let input = StateTracker::new();
        let mut ctx = LevelContext::new(&input, 0.016);

        ctx.award(5);
        ctx.award(10);
        ctx.player_moved(Position::new(3.0, 0.0, 1.0));

        let report = ctx.into_report();
        assert_eq!(report.score, 15);
        assert!(!report.player_died);
        assert_eq!(report.player_position, Some(Position::new(3.0, 0.0, 1.0)));
    }

    #[test]
    fn default_report_is_empty() {
        assert!(GameplayReport::default().is_empty());
    }
}
