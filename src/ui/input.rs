/// Keyboard input.
///
/// Menus only need edge-triggered presses, so this keeps no held-key state.
/// Release events (reported by terminals with keyboard enhancement) are
/// dropped; Press and Repeat both count, so holding an arrow scrolls.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::controls::{intent_for_key, Intent};

pub struct InputState {
    /// Keys pressed during the most recent `drain_events()`.
    presses: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState { presses: Vec::with_capacity(8) }
    }

    /// Drain all pending terminal events. Call once per frame.
    pub fn drain_events(&mut self) {
        self.presses.clear();
        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                if key.kind != KeyEventKind::Release {
                    self.presses.push(key);
                }
            }
        }
    }

    /// Intents for this frame, in the order the keys arrived.
    pub fn intents(&self) -> Vec<Intent> {
        self.presses
            .iter()
            .filter(|k| !k.modifiers.contains(KeyModifiers::CONTROL))
            .filter_map(|k| intent_for_key(k.code))
            .collect()
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.presses.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }

    #[cfg(test)]
    fn push(&mut self, key: KeyEvent) {
        self.presses.push(key);
    }
}
