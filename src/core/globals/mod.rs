//=========================================================================
// Global Engine State
//=========================================================================
//
// Systems owned by the logic thread for the whole engine run.
//
// Architecture:
//   GlobalSystems: InputSystem + EngineSession (owned by orchestrator)
//
//=========================================================================

//=== Module Declarations =================================================

mod global_systems;

//=== Public API ==========================================================

pub use global_systems::GlobalSystems;
