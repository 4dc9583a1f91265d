//=========================================================================
// Aetheric Session — Library Root
//
// Per-session game-flow controller for the Aetheric Engine: score, lives,
// level timer and the Playing / Death / BeatLevel / GameOver state machine,
// plus the runtime that drives it from a window and a keyboard.
//
// Typical usage:
// ```no_run
// use aetheric_session::prelude::*;
//
// fn main() -> Result<(), Box<dyn std::error::Error>> {
//     let config = SessionConfig::load("session.ron")?;
//     EngineBuilder::new(config).build().run()?;
//     Ok(())
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the session, levels, input and collaborator traits. Hosts
// that drive the session from their own loop only need this module.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` is the Winit integration and stays private. `engine` is the
// threaded runtime facade.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder};
