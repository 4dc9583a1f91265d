//=========================================================================
// Platform Bridge
//=========================================================================
//
// Contract between the windowing layer and the logic thread, so the
// platform backend can change without touching session code.
//
// Components:
// - `interface`: event and error types
// - `event_collector`: logic-thread draining of the channel
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub(crate) mod interface;

//=== Internal API ========================================================

pub(crate) use event_collector::{EventCollector, TickControl};
pub(crate) use interface::PlatformEvent;
pub use interface::PlatformError;
