//! Keyboard state tracking and key bindings.
//!
//! The platform layer reports which [`Keys`] are down once per frame; [`InputState`] turns that
//! into held/pressed queries, and the [`KeyListener`] maps active bindings onto [`GameCommand`]s
//! published on the event bus.

use std::cell::Cell;
use std::rc::Rc;

use bitflags::bitflags;
use tracing::trace;

use crate::events::{Event, EventBus};

pub mod commands;

pub use commands::GameCommand;

bitflags! {
    /// The keys the game reacts to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Keys: u16 {
        const UP = 1 << 0;
        const DOWN = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
        const SPACE = 1 << 4;
        const Q = 1 << 5;
        const ESCAPE = 1 << 6;
        const BACKSPACE = 1 << 7;
        const M = 1 << 8;
        const P = 1 << 9;
        const TAB = 1 << 10;
    }
}

const KEY_COUNT: usize = 11;

fn slot(key: Keys) -> usize {
    key.bits().trailing_zeros() as usize
}

/// Per-frame keyboard state with hold counters for press/repeat detection.
#[derive(Debug, Default, Clone)]
pub struct InputState {
    down: Keys,
    held_frames: [u32; KEY_COUNT],
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the keys down this frame. Must be called exactly once per frame.
    pub fn update(&mut self, down: Keys) {
        for key in Keys::all().iter() {
            let frames = &mut self.held_frames[slot(key)];
            *frames = if down.contains(key) { frames.saturating_add(1) } else { 0 };
        }
        self.down = down;
    }

    pub fn down(&self) -> Keys {
        self.down
    }

    /// True while any of `keys` is held.
    pub fn btn(&self, keys: Keys) -> bool {
        self.down.intersects(keys)
    }

    /// True on the frame any of `keys` goes down, and then every `repeat` frames once it has
    /// been held for more than `hold` frames. A zero `hold` or `repeat` disables auto-repeat.
    pub fn btnp(&self, keys: Keys, hold: u32, repeat: u32) -> bool {
        keys.iter().any(|key| {
            let frames = self.held_frames[slot(key)];
            match frames {
                0 => false,
                1 => true,
                n => hold > 0 && repeat > 0 && n > hold && (n - 1 - hold) % repeat == 0,
            }
        })
    }
}

/// How a binding decides that its keys fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonMode {
    /// Every frame the key is down.
    Held,
    /// On the press frame, with optional auto-repeat.
    Pressed { hold: u32, repeat: u32 },
}

/// Shared on/off switch for a binding. Owners keep a clone to arm or disarm their bindings.
#[derive(Debug, Clone)]
pub struct BindingSwitch(Rc<Cell<bool>>);

impl BindingSwitch {
    pub fn new(active: bool) -> Self {
        Self(Rc::new(Cell::new(active)))
    }

    pub fn set(&self, active: bool) {
        self.0.set(active);
    }

    pub fn is_active(&self) -> bool {
        self.0.get()
    }
}

#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub name: &'static str,
    pub keys: Keys,
    pub mode: ButtonMode,
    pub command: GameCommand,
    pub switch: BindingSwitch,
}

impl KeyBinding {
    pub fn new(name: &'static str, keys: Keys, mode: ButtonMode, command: GameCommand) -> Self {
        Self {
            name,
            keys,
            mode,
            command,
            switch: BindingSwitch::new(true),
        }
    }

    /// Starts the binding disarmed.
    pub fn inactive(mut self) -> Self {
        self.switch = BindingSwitch::new(false);
        self
    }

    pub fn triggered(&self, input: &InputState) -> bool {
        match self.mode {
            ButtonMode::Held => input.btn(self.keys),
            ButtonMode::Pressed { hold, repeat } => input.btnp(self.keys, hold, repeat),
        }
    }
}

/// Polls bindings against the input state and publishes their commands.
#[derive(Debug, Default)]
pub struct KeyListener {
    bindings: Vec<KeyBinding>,
}

impl KeyListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, bindings: impl IntoIterator<Item = KeyBinding>) {
        self.bindings.extend(bindings);
    }

    pub fn bindings(&self) -> &[KeyBinding] {
        &self.bindings
    }

    /// Publishes one command per active, triggered binding, in binding order.
    pub fn check(&self, input: &InputState, bus: &EventBus) {
        for binding in &self.bindings {
            if !binding.switch.is_active() || !binding.triggered(input) {
                continue;
            }
            trace!(binding = binding.name, command = ?binding.command, "Binding triggered");
            bus.publish(Event::Command(binding.command));
        }
    }
}
