//=========================================================================
// Music Track
//=========================================================================
//
// In-memory audio device: a background track with an optional clip and a
// volume, plus a log of one-shot clips played.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use super::{AudioDevice, Position};

//=== MusicTrack ==========================================================

/// Audio device that records what it was asked to do.
#[derive(Debug, Clone)]
pub struct MusicTrack {
    clip: Option<String>,
    volume: f32,
    played: Vec<(String, Position)>,
}

impl MusicTrack {
    /// Background track playing `clip` at full volume.
    pub fn new(clip: impl Into<String>) -> Self {
        Self { clip: Some(clip.into()), volume: 1.0, played: Vec::new() }
    }

    /// Background track with no clip assigned.
    pub fn silent() -> Self {
        Self { clip: None, volume: 1.0, played: Vec::new() }
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume.clamp(0.0, 1.0);
        self
    }

    /// Assigns or clears the background clip.
    pub fn set_clip(&mut self, clip: Option<String>) {
        self.clip = clip;
    }

    /// One-shot clips played so far, oldest first.
    pub fn played(&self) -> &[(String, Position)] {
        &self.played
    }
}

impl Default for MusicTrack {
    fn default() -> Self {
        Self::silent()
    }
}

impl AudioDevice for MusicTrack {
    fn play_clip_at(&mut self, clip: &str, position: Position) {
        debug!(target: "audio", "Playing {:?} at {:?}", clip, position);
        self.played.push((clip.to_owned(), position));
    }

    fn background_clip(&self) -> Option<&str> {
        self.clip.as_deref()
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
