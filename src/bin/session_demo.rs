//=========================================================================
// Session Demo
//=========================================================================
//
// Small windowed host for the session controller.
//
//   cargo run --bin session_demo [-- path/to/session.ron]
//
// Keys:
//   Enter   play            M       back to menu     R   restart
//   Space   score points    K       die              Arrows  move
//   Escape  quit            End/L/Y force game over / lose life / dump
//
// Run with RUST_LOG=debug to watch display and audio calls.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::env;
use std::process::ExitCode;

use aetheric_session::prelude::*;
use log::{error, info};

//=== Levels ==============================================================

struct Menu;

impl Level for Menu {
    fn on_load(&mut self) {
        info!(target: "demo", "Press Enter to play");
    }
}

/// Scores on Space, dies on K, moves with the arrow keys.
#[derive(Default)]
struct Arena {
    position: Position,
}

impl Arena {
    const POINTS: u32 = 5;
    const SPEED: f32 = 4.0;
}

impl Level for Arena {
    fn on_load(&mut self) {
        self.position = Position::ORIGIN;
    }

    fn update(&mut self, context: &mut LevelContext<'_>) {
        let input = context.input;

        if input.is_key_pressed(KeyCode::Space) {
            context.award(Self::POINTS);
        }
        if input.is_key_pressed(KeyCode::KeyK) {
            context.player_died();
        }

        let step = Self::SPEED * context.delta_time;
        let mut moved = false;
        for (key, dx, dz) in [
            (KeyCode::ArrowLeft, -step, 0.0),
            (KeyCode::ArrowRight, step, 0.0),
            (KeyCode::ArrowUp, 0.0, step),
            (KeyCode::ArrowDown, 0.0, -step),
        ] {
            if input.is_key_down(key) {
                self.position.x += dx;
                self.position.z += dz;
                moved = true;
            }
        }
        if moved {
            context.player_moved(self.position);
        }
    }
}

//=== Configuration =======================================================

fn demo_config() -> SessionConfig {
    SessionConfig {
        title: "Aetheric Dodge".to_owned(),
        can_beat_level: true,
        beat_level_score: 50,
        timed_level: true,
        play_level: LevelId::from("Arena"),
        sounds: SoundBank {
            lose: Some("sfx/lose.ogg".to_owned()),
            beat_level: Some("sfx/beat_level.ogg".to_owned()),
        },
        debug_keys: true,
        ..Default::default()
    }
}

//=== Entry Point =========================================================

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match env::args().nth(1) {
        Some(path) => match SessionConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                error!(target: "demo", "{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => demo_config(),
    };

    let menu = config.menu_level.clone();
    let play = config.play_level.clone();

    let result = EngineBuilder::new(config)
        .with_audio(MusicTrack::new("music/theme.ogg"))
        .build()
        .init(move |systems| {
            let levels = systems.session.loader_mut();
            levels.register_loaded(menu, Menu);
            levels.register(play, Arena::default());
            levels.register("Bonus", Arena::default());
        })
        .run();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(target: "demo", "{}", e);
            ExitCode::FAILURE
        }
    }
}
