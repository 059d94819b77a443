//! This module handles sound effect playback for the game.
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use strum_macros::{EnumIter, IntoStaticStr};
use tracing::{debug, trace};

/// The sound effects the game plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Sound {
    Shoot,
    Explode,
    Hurt,
    Mineral,
    PowerUp,
    Popup,
    Typing,
}

impl Sound {
    /// Mixer channel the sound plays on. Sounds sharing a channel cut each other off.
    pub fn channel(self) -> u8 {
        match self {
            Sound::Shoot => 0,
            Sound::Explode | Sound::Hurt => 1,
            Sound::Mineral | Sound::PowerUp => 2,
            Sound::Popup | Sound::Typing => 3,
        }
    }
}

/// Something that can actually make noise.
pub trait SoundBackend {
    fn play(&mut self, channel: u8, sound: Sound);
    fn stop_all(&mut self);
}

/// A backend that discards everything.
#[derive(Debug, Default)]
pub struct NullBackend;

impl SoundBackend for NullBackend {
    fn play(&mut self, _channel: u8, _sound: Sound) {}
    fn stop_all(&mut self) {}
}

/// A backend that remembers what it was asked to play.
#[derive(Debug, Default, Clone)]
pub struct RecordingBackend {
    played: Rc<RefCell<Vec<Sound>>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sounds played so far, shared with every clone of this backend.
    pub fn played(&self) -> Vec<Sound> {
        self.played.borrow().clone()
    }
}

impl SoundBackend for RecordingBackend {
    fn play(&mut self, _channel: u8, sound: Sound) {
        self.played.borrow_mut().push(sound);
    }

    fn stop_all(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AudioState {
    Enabled,
    Muted,
    Disabled,
}

/// The audio system for the game.
///
/// Wraps a backend with mute handling. A disabled instance silently ignores every request.
pub struct Audio {
    backend: RefCell<Box<dyn SoundBackend>>,
    state: Cell<AudioState>,
}

impl Audio {
    pub fn new(backend: Box<dyn SoundBackend>) -> Self {
        Self {
            backend: RefCell::new(backend),
            state: Cell::new(AudioState::Enabled),
        }
    }

    /// An audio system that never plays anything and cannot be unmuted.
    pub fn disabled() -> Self {
        Self {
            backend: RefCell::new(Box::new(NullBackend)),
            state: Cell::new(AudioState::Disabled),
        }
    }

    pub fn play(&self, sound: Sound) {
        if self.state.get() != AudioState::Enabled {
            return;
        }
        trace!(sound = Into::<&'static str>::into(sound), "Playing sound");
        self.backend.borrow_mut().play(sound.channel(), sound);
    }

    pub fn set_mute(&self, mute: bool) {
        let next = match (self.state.get(), mute) {
            (AudioState::Disabled, _) => return,
            (_, true) => AudioState::Muted,
            (_, false) => AudioState::Enabled,
        };
        if next == AudioState::Muted {
            self.backend.borrow_mut().stop_all();
        }
        self.state.set(next);
        debug!(muted = mute, "Audio mute changed");
    }

    pub fn toggle_mute(&self) {
        self.set_mute(!self.is_muted());
    }

    pub fn is_muted(&self) -> bool {
        self.state.get() == AudioState::Muted
    }

    pub fn is_disabled(&self) -> bool {
        self.state.get() == AudioState::Disabled
    }
}
