// Key press filtering
//
// Terminals report held keys as a stream of presses, and many never send a
// release. The handler decides which of those presses the app should act on:
// - action keys (Enter, Esc, q, r, ?) fire once per physical press
// - navigation keys fire on press, then repeat after a delay while held

use crossterm::event::KeyCode;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Presses of an action key closer together than this count as one hold
const ACTION_DEBOUNCE: Duration = Duration::from_millis(150);

/// How a key behaves while held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyBehavior {
    /// Fire once per press; repeats are debounced
    Action,

    /// Fire on press, then every `interval` once held for `delay`
    Repeat { delay: Duration, interval: Duration },
}

impl KeyBehavior {
    /// Arrow keys, vim keys, overlay scrolling
    pub const NAVIGATION: Self = Self::Repeat {
        delay: Duration::from_millis(500),
        interval: Duration::from_millis(50),
    };

    /// Page and Home/End jumps
    pub const PAGING: Self = Self::Repeat {
        delay: Duration::from_millis(300),
        interval: Duration::from_millis(30),
    };
}

/// A key currently held down
#[derive(Debug, Clone, Copy)]
struct Held {
    since: Instant,
    last_fired: Instant,
}

#[derive(Debug, Default)]
pub struct InputHandler {
    behaviors: HashMap<KeyCode, KeyBehavior>,
    held: HashMap<KeyCode, Held>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn configure(&mut self, keys: impl IntoIterator<Item = KeyCode>, behavior: KeyBehavior) {
        for key in keys {
            self.behaviors.insert(key, behavior);
        }
    }

    fn behavior(&self, key: KeyCode) -> KeyBehavior {
        self.behaviors.get(&key).copied().unwrap_or(KeyBehavior::Action)
    }

    /// Whether this press should reach the app
    pub fn handle_key_press(&mut self, key: KeyCode) -> bool {
        self.press_at(key, Instant::now())
    }

    fn press_at(&mut self, key: KeyCode, now: Instant) -> bool {
        let behavior = self.behavior(key);

        let Some(held) = self.held.get_mut(&key) else {
            self.held.insert(
                key,
                Held {
                    since: now,
                    last_fired: now,
                },
            );
            return true;
        };

        let fire = match behavior {
            // No release events: a press after a pause is a new press
            KeyBehavior::Action => now.duration_since(held.last_fired) >= ACTION_DEBOUNCE,
            KeyBehavior::Repeat { delay, interval } => {
                now.duration_since(held.since) >= delay
                    && now.duration_since(held.last_fired) >= interval
            }
        };
        if fire {
            held.last_fired = now;
        }
        fire
    }

    pub fn handle_key_release(&mut self, key: KeyCode) {
        self.held.remove(&key);
    }

    /// Forget every held key (focus lost, overlay swapped in)
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    /// Key map for blogdeck's views and overlays
    pub fn with_default_config() -> Self {
        let mut handler = Self::new();

        handler.configure(
            [
                KeyCode::Up,
                KeyCode::Down,
                KeyCode::Left,
                KeyCode::Right,
                KeyCode::Char('j'),
                KeyCode::Char('k'),
                KeyCode::Char('h'),
                KeyCode::Char('l'),
            ],
            KeyBehavior::NAVIGATION,
        );
        handler.configure(
            [KeyCode::PageUp, KeyCode::PageDown, KeyCode::Home, KeyCode::End],
            KeyBehavior::PAGING,
        );

        // Everything else (Enter, Esc, Tab, q, g, r, t, x, ?, 1-9) is an action
        handler
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn action_fires_once_per_press() {
        let mut handler = InputHandler::with_default_config();
        let t0 = Instant::now();

        assert!(handler.press_at(KeyCode::Enter, t0));
        assert!(!handler.press_at(KeyCode::Enter, t0 + ms(10)));
        assert!(!handler.press_at(KeyCode::Enter, t0 + ms(40)));

        handler.handle_key_release(KeyCode::Enter);
        assert!(handler.press_at(KeyCode::Enter, t0 + ms(50)));
    }

    #[test]
    fn action_without_release_fires_again_after_debounce() {
        let mut handler = InputHandler::with_default_config();
        let t0 = Instant::now();

        assert!(handler.press_at(KeyCode::Char('r'), t0));
        assert!(!handler.press_at(KeyCode::Char('r'), t0 + ms(100)));
        assert!(handler.press_at(KeyCode::Char('r'), t0 + ms(260)));
    }

    #[test]
    fn navigation_repeats_after_delay() {
        let mut handler = InputHandler::with_default_config();
        let t0 = Instant::now();

        assert!(handler.press_at(KeyCode::Down, t0));
        assert!(!handler.press_at(KeyCode::Down, t0 + ms(200)));
        assert!(handler.press_at(KeyCode::Down, t0 + ms(510)));
        assert!(!handler.press_at(KeyCode::Down, t0 + ms(530)));
        assert!(handler.press_at(KeyCode::Down, t0 + ms(570)));
    }

    #[test]
    fn paging_repeats_sooner() {
        let mut handler = InputHandler::with_default_config();
        let t0 = Instant::now();

        assert!(handler.press_at(KeyCode::PageDown, t0));
        assert!(handler.press_at(KeyCode::PageDown, t0 + ms(310)));
    }

    #[test]
    fn release_all_forgets_held_keys() {
        let mut handler = InputHandler::with_default_config();
        let t0 = Instant::now();

        assert!(handler.press_at(KeyCode::Char('?'), t0));
        handler.release_all();
        assert!(handler.press_at(KeyCode::Char('?'), t0 + ms(1)));
    }
}
