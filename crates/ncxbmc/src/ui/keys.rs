//! Key bindings.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Command {
    NextTab,
    Quit,
    Up,
    Down,
    Enter,
    Back,
    Add,
    Help,
    Remove,
    Clear,
    FastForward,
    Rewind,
    Mute,
    Pause,
    VolumeUp,
    VolumeDown,
}

/// Letters bound to the rebindable commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct LetterBindings {
    pub(crate) help: char,
    pub(crate) remove: char,
    pub(crate) clear: char,
    pub(crate) fast_forward: char,
    pub(crate) rewind: char,
    pub(crate) mute: char,
    pub(crate) pause: char,
}

impl Default for LetterBindings {
    fn default() -> Self {
        Self {
            help: 'h',
            remove: 'd',
            clear: 'c',
            fast_forward: 'f',
            rewind: 'b',
            mute: 'm',
            pause: 'p',
        }
    }
}

impl LetterBindings {
    fn pairs(&self) -> [(&'static str, char, Command); 7] {
        [
            ("help", self.help, Command::Help),
            ("remove", self.remove, Command::Remove),
            ("clear", self.clear, Command::Clear),
            ("fast_forward", self.fast_forward, Command::FastForward),
            ("rewind", self.rewind, Command::Rewind),
            ("mute", self.mute, Command::Mute),
            ("pause", self.pause, Command::Pause),
        ]
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum KeyMapError {
    #[error("key '{key}' is bound to both {first} and {second}")]
    Duplicate {
        key: char,
        first: &'static str,
        second: &'static str,
    },
    #[error("key '{0}' is reserved")]
    Reserved(char),
}

#[derive(Clone, Debug)]
pub(crate) struct KeyMap {
    letters: HashMap<char, Command>,
    bindings: LetterBindings,
}

impl KeyMap {
    pub(crate) fn new(bindings: LetterBindings) -> Result<Self, KeyMapError> {
        let mut letters = HashMap::new();
        let mut owners: HashMap<char, &'static str> = HashMap::new();
        for (name, key, command) in bindings.pairs() {
            if key == ' ' || key.is_control() {
                return Err(KeyMapError::Reserved(key));
            }
            if let Some(first) = owners.insert(key, name) {
                return Err(KeyMapError::Duplicate {
                    key,
                    first,
                    second: name,
                });
            }
            letters.insert(key, command);
        }
        Ok(Self { letters, bindings })
    }

    /// Key name shown in the help overlay.
    pub(crate) fn label(&self, command: Command) -> String {
        let fixed = match command {
            Command::NextTab => "TAB",
            Command::Quit => "ESC",
            Command::Up => "UP",
            Command::Down => "DOWN",
            Command::Enter => "ENTER",
            Command::Back => "BACKSPACE",
            Command::Add => "SPACE",
            Command::VolumeUp => "RIGHT",
            Command::VolumeDown => "LEFT",
            letter => {
                return self
                    .bindings
                    .pairs()
                    .into_iter()
                    .find(|(_, _, c)| *c == letter)
                    .map(|(_, key, _)| key.to_string())
                    .unwrap_or_default();
            }
        };
        fixed.to_string()
    }

    pub(crate) fn resolve(&self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Tab => Some(Command::NextTab),
            KeyCode::Esc => Some(Command::Quit),
            KeyCode::Up => Some(Command::Up),
            KeyCode::Down => Some(Command::Down),
            KeyCode::Enter => Some(Command::Enter),
            KeyCode::Backspace => Some(Command::Back),
            KeyCode::Right => Some(Command::VolumeUp),
            KeyCode::Left => Some(Command::VolumeDown),
            KeyCode::Char(' ') => Some(Command::Add),
            KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                self.letters.get(&c).copied()
            }
            _ => None,
        }
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        let bindings = LetterBindings::default();
        let letters = bindings
            .pairs()
            .into_iter()
            .map(|(_, key, command)| (key, command))
            .collect();
        Self { letters, bindings }
    }
}
