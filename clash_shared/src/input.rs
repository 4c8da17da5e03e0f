//! Input model.
//!
//! A frame of input is the list of discrete events that happened since the
//! previous frame plus the set of keys currently held. Movement and firing
//! read held keys; menus react to events.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Keys the game reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    A,
    D,
    W,
    S,
    Enter,
}

impl Key {
    pub const ALL: [Key; 9] = [
        Key::Left,
        Key::Right,
        Key::Up,
        Key::Down,
        Key::A,
        Key::D,
        Key::W,
        Key::S,
        Key::Enter,
    ];
}

bitflags::bitflags! {
    /// Keys held down during a frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct KeySet: u16 {
        const NONE = 0;
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const UP = 1 << 2;
        const DOWN = 1 << 3;
        const A = 1 << 4;
        const D = 1 << 5;
        const W = 1 << 6;
        const S = 1 << 7;
        const ENTER = 1 << 8;
    }
}

impl Default for KeySet {
    fn default() -> Self {
        Self::NONE
    }
}

impl From<Key> for KeySet {
    fn from(key: Key) -> Self {
        match key {
            Key::Left => Self::LEFT,
            Key::Right => Self::RIGHT,
            Key::Up => Self::UP,
            Key::Down => Self::DOWN,
            Key::A => Self::A,
            Key::D => Self::D,
            Key::W => Self::W,
            Key::S => Self::S,
            Key::Enter => Self::ENTER,
        }
    }
}

impl FromIterator<Key> for KeySet {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::NONE, |set, key| set | Self::from(key))
    }
}

/// Serialized as a list of key names, e.g. `["left", "enter"]`.
impl Serialize for KeySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.keys().collect::<Vec<_>>().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for KeySet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Vec::<Key>::deserialize(deserializer)?.into_iter().collect())
    }
}

impl KeySet {
    /// Held keys in `Key::ALL` order.
    pub fn keys(self) -> impl Iterator<Item = Key> {
        Key::ALL
            .into_iter()
            .filter(move |key| self.contains(KeySet::from(*key)))
    }

    pub fn contains_any(self, other: KeySet) -> bool {
        self.intersects(other)
    }

    /// Per-frame movement for the held keys. Right wins over left and down
    /// wins over up when both are held.
    pub fn movement(self, speed: i32) -> (i32, i32) {
        let mut vx = 0;
        let mut vy = 0;
        if self.contains_any(Self::LEFT | Self::A) {
            vx = -speed;
        }
        if self.contains_any(Self::RIGHT | Self::D) {
            vx = speed;
        }
        if self.contains_any(Self::UP | Self::W) {
            vy = -speed;
        }
        if self.contains_any(Self::DOWN | Self::S) {
            vy = speed;
        }
        (vx, vy)
    }

    pub fn fire(self) -> bool {
        self.contains(Self::ENTER)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// Discrete input event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    Quit,
    KeyDown { key: Key },
    MouseDown { x: i32, y: i32, button: MouseButton },
}

impl InputEvent {
    pub fn left_click(x: i32, y: i32) -> Self {
        Self::MouseDown {
            x,
            y,
            button: MouseButton::Left,
        }
    }
}

/// Everything the game reads from the player in one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameInput {
    pub events: Vec<InputEvent>,
    pub held: KeySet,
}

impl FrameInput {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn holding(held: KeySet) -> Self {
        Self {
            events: Vec::new(),
            held,
        }
    }

    pub fn with_event(mut self, event: InputEvent) -> Self {
        self.events.push(event);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_prefers_right_and_down() {
        let held: KeySet = [Key::Left, Key::D, Key::W, Key::Down].into_iter().collect();
        assert_eq!(held.movement(4), (4, 4));
        assert_eq!(KeySet::A.movement(4), (-4, 0));
        assert_eq!(KeySet::NONE.movement(4), (0, 0));
    }

    #[test]
    fn enter_fires() {
        assert!((KeySet::ENTER | KeySet::LEFT).fire());
        assert!(!KeySet::LEFT.fire());
    }

    #[test]
    fn events_use_tagged_json() {
        let ev: InputEvent =
            serde_json::from_str(r#"{ "type": "mouse_down", "x": 400, "y": 405, "button": "left" }"#)
                .unwrap();
        assert_eq!(ev, InputEvent::left_click(400, 405));
        let ev: InputEvent = serde_json::from_str(r#"{ "type": "key_down", "key": "a" }"#).unwrap();
        assert_eq!(ev, InputEvent::KeyDown { key: Key::A });
    }

    #[test]
    fn frame_input_json_lists_held_keys() {
        let input = FrameInput::holding(KeySet::ENTER | KeySet::LEFT)
            .with_event(InputEvent::KeyDown { key: Key::Right });
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "events": [{ "type": "key_down", "key": "right" }],
                "held": ["left", "enter"]
            })
        );
        let back: FrameInput = serde_json::from_value(json).unwrap();
        assert_eq!(back, input);

        let idle: FrameInput = serde_json::from_str("{}").unwrap();
        assert_eq!(idle, FrameInput::idle());
    }
}
