//=========================================================================
// Level Request Queue
//=========================================================================
//
// Queue for level load/unload requests.
//
// The session pushes requests here whenever it likes; the registry
// applies them in FIFO order at the next tick boundary.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{LevelId, LoadMode};

//=== LevelRequest ========================================================

/// A pending level operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelRequest {
    /// Load a level instance.
    Load(LevelId, LoadMode),

    /// Unload the oldest loaded instance of a level.
    Unload(LevelId),
}

//=== LevelRequestQueue ===================================================

/// FIFO of level requests awaiting the tick boundary.
#[derive(Debug, Default)]
pub struct LevelRequestQueue {
    queue: Vec<LevelRequest>,
}

impl LevelRequestQueue {
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Queues a request to be processed at the next tick boundary.
    pub fn push(&mut self, request: LevelRequest) {
        self.queue.push(request);
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelRequest> {
        self.queue.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Takes all requests, leaving the queue empty.
    pub fn take(&mut self) -> Vec<LevelRequest> {
        std::mem::take(&mut self.queue)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
