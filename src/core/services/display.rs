//=========================================================================
// Text Board
//=========================================================================
//
// In-memory display sink. Keeps the latest value of every text slot and
// the visibility of every panel, and logs changes.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::{HashMap, HashSet};

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::{DisplaySink, Panel, TextSlot};

//=== TextBoard ===========================================================

/// Display sink backed by plain maps.
#[derive(Debug, Default)]
pub struct TextBoard {
    texts: HashMap<TextSlot, String>,
    visible: HashSet<Panel>,
    writes: usize,
}

impl TextBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest value written to `slot`.
    pub fn text(&self, slot: TextSlot) -> Option<&str> {
        self.texts.get(&slot).map(String::as_str)
    }

    pub fn is_visible(&self, panel: Panel) -> bool {
        self.visible.contains(&panel)
    }

    /// Visible panels in draw order.
    pub fn visible_panels(&self) -> Vec<Panel> {
        Panel::ALL.into_iter().filter(|p| self.visible.contains(p)).collect()
    }

    /// Number of text writes that changed a value.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl DisplaySink for TextBoard {
    fn set_text(&mut self, slot: TextSlot, value: &str) {
        if self.texts.get(&slot).map(String::as_str) == Some(value) {
            return;
        }
        trace!(target: "display", "{:?} = {:?}", slot, value);
        self.texts.insert(slot, value.to_owned());
        self.writes += 1;
    }

    fn set_panel_visible(&mut self, panel: Panel, visible: bool) {
        let changed = if visible {
            self.visible.insert(panel)
        } else {
            self.visible.remove(&panel)
        };
        if changed {
            debug!(target: "display", "Panel {:?} {}", panel, if visible { "shown" } else { "hidden" });
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
