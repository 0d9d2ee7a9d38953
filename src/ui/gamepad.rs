/// Gamepad input tracker using gilrs.
///
/// Button mapping is loaded from config.toml via `load_button_config()`.
/// Default mapping:
///   D-pad / Left Stick    →  Cursor / difficulty
///   A / Start             →  Confirm
///   B / Select            →  Back
///   X / R1                →  Found
///   Y                     →  Reset progress

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};
#[cfg(feature = "gamepad")]
use tracing::info;

use super::controls::Intent;
use crate::config::GamepadConfig;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.5;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,
    R1,
    Start,
    Select,
}

const BTN_COUNT: usize = 8;

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.trim().to_uppercase().as_str() {
            "A" | "SOUTH" => Some(Btn::A),
            "B" | "EAST"  => Some(Btn::B),
            "X" | "WEST"  => Some(Btn::X),
            "Y" | "NORTH" => Some(Btn::Y),
            "L1" | "LB"   => Some(Btn::L1),
            "R1" | "RB"   => Some(Btn::R1),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South => Some(Btn::A),
            Button::East  => Some(Btn::B),
            Button::West  => Some(Btn::X),
            Button::North => Some(Btn::Y),
            Button::LeftTrigger  => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::Start  => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Action-to-button mapping (loaded from config).
#[derive(Debug, PartialEq)]
struct ActionMap {
    confirm: Vec<Btn>,
    cancel: Vec<Btn>,
    found: Vec<Btn>,
    reset: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            confirm: vec![Btn::A, Btn::Start],
            cancel:  vec![Btn::B, Btn::Select],
            found:   vec![Btn::X, Btn::R1],
            reset:   vec![Btn::Y],
        }
    }
}

/// Stick directions past the deadzone.
#[derive(Clone, Copy, Debug, Default)]
struct Dirs {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
}

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    just_pressed: [bool; BTN_COUNT],
    stick: Dirs,
    stick_x: f32,
    stick_y: f32,

    action_map: ActionMap,

    pub connected: bool,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = match Gilrs::new() {
            Ok(g) => {
                let has_pad = g.gamepads().next().is_some();
                (Some(g), has_pad)
            }
            Err(_) => (None, false),
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            just_pressed: [false; BTN_COUNT],
            stick: Dirs::default(),
            stick_x: 0.0,
            stick_y: 0.0,
            action_map: ActionMap::default(),
            connected,
        }
    }

    /// Load button mapping from config. Empty or unrecognised lists keep the default.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        fn parse_list(names: &[String], slot: &mut Vec<Btn>) {
            let parsed: Vec<Btn> = names.iter().filter_map(|s| Btn::from_name(s)).collect();
            if !parsed.is_empty() {
                *slot = parsed;
            }
        }
        let map = &mut self.action_map;
        parse_list(&cfg.confirm, &mut map.confirm);
        parse_list(&cfg.cancel, &mut map.cancel);
        parse_list(&cfg.found, &mut map.found);
        parse_list(&cfg.reset, &mut map.reset);
    }

    /// Poll the pad and return this frame's intents.
    pub fn update(&mut self) -> Vec<Intent> {
        self.just_pressed = [false; BTN_COUNT];
        let mut intents = vec![];

        #[cfg(feature = "gamepad")]
        self.poll_gilrs(&mut intents);

        let map = &self.action_map;
        let pressed = |btns: &[Btn]| btns.iter().any(|&b| self.just_pressed[b as usize]);
        if pressed(&map.confirm) { intents.push(Intent::Confirm); }
        if pressed(&map.cancel) { intents.push(Intent::Back); }
        if pressed(&map.found) { intents.push(Intent::Found); }
        if pressed(&map.reset) { intents.push(Intent::Reset); }
        intents
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self, intents: &mut Vec<Intent>) {
        let Some(gilrs) = &mut self.gilrs else {
            return;
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.press(btn, intents);
                }
                EventType::AxisChanged(Axis::LeftStickX, value, _) => self.stick_x = value,
                EventType::AxisChanged(Axis::LeftStickY, value, _) => self.stick_y = value,
                EventType::Connected => {
                    self.connected = true;
                    info!("gamepad connected");
                }
                EventType::Disconnected => {
                    self.connected = false;
                    self.stick = Dirs::default();
                    self.stick_x = 0.0;
                    self.stick_y = 0.0;
                    info!("gamepad disconnected");
                }
                _ => {}
            }
        }

        // Stick crossing the deadzone acts as one press.
        let prev = self.stick;
        self.stick = Dirs {
            up: self.stick_y > STICK_DEADZONE,
            down: self.stick_y < -STICK_DEADZONE,
            left: self.stick_x < -STICK_DEADZONE,
            right: self.stick_x > STICK_DEADZONE,
        };
        if self.stick.up && !prev.up { intents.push(Intent::Up); }
        if self.stick.down && !prev.down { intents.push(Intent::Down); }
        if self.stick.left && !prev.left { intents.push(Intent::Left); }
        if self.stick.right && !prev.right { intents.push(Intent::Right); }
    }

    #[cfg(feature = "gamepad")]
    fn press(&mut self, btn: Button, intents: &mut Vec<Intent>) {
        match btn {
            Button::DPadUp    => intents.push(Intent::Up),
            Button::DPadDown  => intents.push(Intent::Down),
            Button::DPadLeft  => intents.push(Intent::Left),
            Button::DPadRight => intents.push(Intent::Right),
            other => {
                if let Some(b) = Btn::from_gilrs(other) {
                    self.just_pressed[b as usize] = true;
                }
            }
        }
    }
}
