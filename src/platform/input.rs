//! Input intents
//!
//! Input sources (key handlers, touch, UI buttons) may live on other threads.
//! They only ever send [`Intent`]s; a single consumer drains the queue and
//! applies them to the engine between frames.

use std::sync::mpsc::{self, Receiver, Sender};

use serde::{Deserialize, Serialize};

/// A command for the engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    Start,
    /// Jump key down
    Jump,
    /// Jump key up
    ReleaseJump,
    Restart,
    Resize { width: f32, height: f32 },
    SetDifficulty(usize),
    SetInvincible(bool),
    SetReducedEffects(bool),
}

/// Cloneable producer side
#[derive(Debug, Clone)]
pub struct IntentSender {
    tx: Sender<Intent>,
}

impl IntentSender {
    /// Queue an intent. Returns `false` once the consumer is gone.
    pub fn send(&self, intent: Intent) -> bool {
        self.tx.send(intent).is_ok()
    }
}

/// Consumer side, owned by whoever drives the engine
#[derive(Debug)]
pub struct IntentQueue {
    tx: Sender<Intent>,
    rx: Receiver<Intent>,
}

impl IntentQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    pub fn sender(&self) -> IntentSender {
        IntentSender {
            tx: self.tx.clone(),
        }
    }

    /// Everything queued so far, in send order
    pub fn drain(&self) -> Vec<Intent> {
        self.rx.try_iter().collect()
    }
}

impl Default for IntentQueue {
    fn default() -> Self {
        Self::new()
    }
}
