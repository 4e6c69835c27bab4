use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use anyhow::{Context, Result};
use crossterm::event::{read, Event, KeyCode, KeyEvent, KeyModifiers};
use log::{debug, error};

use crate::snake::Direction;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Up,
    Down,
    Left,
    Right,
    Retry,
}

impl Input {
    pub fn direction(self) -> Option<Direction> {
        match self {
            Input::Up => Some(Direction::Up),
            Input::Down => Some(Direction::Down),
            Input::Left => Some(Direction::Left),
            Input::Right => Some(Direction::Right),
            Input::Retry => None,
        }
    }

    fn encode(self) -> u8 {
        match self {
            Input::Up => 1,
            Input::Down => 2,
            Input::Left => 3,
            Input::Right => 4,
            Input::Retry => 5,
        }
    }

    fn decode(raw: u8) -> Option<Input> {
        match raw {
            1 => Some(Input::Up),
            2 => Some(Input::Down),
            3 => Some(Input::Left),
            4 => Some(Input::Right),
            5 => Some(Input::Retry),
            _ => None,
        }
    }
}

/// What a key press means to the game.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Game(Input),
    Quit,
    Ignore,
}

pub fn map_key(ev: &KeyEvent) -> KeyAction {
    match ev {
        KeyEvent { code: KeyCode::Char('c'), modifiers }
            if modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyEvent { code, .. } => match code {
            KeyCode::Char('w') | KeyCode::Up => KeyAction::Game(Input::Up),
            KeyCode::Char('a') | KeyCode::Left => KeyAction::Game(Input::Left),
            KeyCode::Char('s') | KeyCode::Down => KeyAction::Game(Input::Down),
            KeyCode::Char('d') | KeyCode::Right => KeyAction::Game(Input::Right),
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Game(Input::Retry),
            KeyCode::Esc | KeyCode::Char('q') => KeyAction::Quit,
            _ => KeyAction::Ignore,
        }
    }
}

/// Single-slot, last-write-wins holder for the most recent key. Written by
/// the input thread, read once per tick by the game loop.
#[derive(Debug)]
pub struct InputLatch {
    slot: AtomicU8,
}

impl InputLatch {
    pub fn new() -> Self {
        InputLatch { slot: AtomicU8::new(Input::Right.encode()) }
    }

    pub fn latch(&self, input: Input) {
        self.slot.store(input.encode(), Ordering::Release);
    }

    pub fn latest(&self) -> Option<Input> {
        Input::decode(self.slot.load(Ordering::Acquire))
    }

    pub fn reset(&self) {
        self.latch(Input::Right);
    }
}

impl Default for InputLatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Blocks on terminal events until a quit key shows up, feeding game keys
/// into the latch. Meant to run on its own thread.
///
/// `quit` is raised on the way out either way; a failed read is returned so
/// the caller can tell it apart from a requested quit.
pub fn read_keys(latch: &InputLatch, quit: &AtomicBool) -> Result<()> {
    read_keys_from(read, latch, quit)
}

fn read_keys_from(
    mut next_event: impl FnMut() -> crossterm::Result<Event>,
    latch: &InputLatch,
    quit: &AtomicBool,
) -> Result<()> {
    let res = loop {
        let ev = match next_event() {
            Ok(Event::Key(ev)) => ev,
            Ok(_) => continue,
            Err(err) => {
                error!("reading terminal events failed: {}", err);
                break Err(err).context("Error reading terminal events");
            }
        };

        match map_key(&ev) {
            KeyAction::Game(input) => latch.latch(input),
            KeyAction::Quit => {
                debug!("quit requested");
                break Ok(());
            }
            KeyAction::Ignore => {},
        }
    };

    quit.store(true, Ordering::Release);
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::ErrorKind;
    use std::io;
    use std::sync::Arc;
    use std::thread;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn latch_starts_right_and_keeps_last_write() {
        let latch = InputLatch::new();
        assert_eq!(latch.latest(), Some(Input::Right));

        latch.latch(Input::Up);
        latch.latch(Input::Left);
        assert_eq!(latch.latest(), Some(Input::Left));
        // Reading does not consume.
        assert_eq!(latch.latest(), Some(Input::Left));

        latch.latch(Input::Retry);
        latch.reset();
        assert_eq!(latch.latest(), Some(Input::Right));
    }

    #[test]
    fn latch_is_shared_across_threads() {
        let latch = Arc::new(InputLatch::new());
        let writer = Arc::clone(&latch);

        thread::spawn(move || writer.latch(Input::Down)).join().unwrap();
        assert_eq!(latch.latest(), Some(Input::Down));
    }

    #[test]
    fn maps_arrows_and_wasd() {
        assert_eq!(map_key(&key(KeyCode::Up)), KeyAction::Game(Input::Up));
        assert_eq!(map_key(&key(KeyCode::Char('a'))), KeyAction::Game(Input::Left));
        assert_eq!(map_key(&key(KeyCode::Char('s'))), KeyAction::Game(Input::Down));
        assert_eq!(map_key(&key(KeyCode::Right)), KeyAction::Game(Input::Right));
        assert_eq!(map_key(&key(KeyCode::Char('r'))), KeyAction::Game(Input::Retry));
    }

    #[test]
    fn maps_quit_and_ignores_the_rest() {
        assert_eq!(map_key(&key(KeyCode::Esc)), KeyAction::Quit);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(&ctrl_c), KeyAction::Quit);
        assert_eq!(map_key(&key(KeyCode::Char('c'))), KeyAction::Ignore);
        assert_eq!(map_key(&key(KeyCode::Tab)), KeyAction::Ignore);
    }

    fn events(list: Vec<crossterm::Result<Event>>) -> impl FnMut() -> crossterm::Result<Event> {
        let mut it = list.into_iter();
        move || it.next().expect("reader asked past the scripted events")
    }

    #[test]
    fn reader_latches_keys_until_quit() {
        let latch = InputLatch::new();
        let quit = AtomicBool::new(false);
        let next = events(vec![
            Ok(Event::Key(key(KeyCode::Up))),
            Ok(Event::Resize(80, 40)),
            Ok(Event::Key(key(KeyCode::Tab))),
            Ok(Event::Key(key(KeyCode::Left))),
            Ok(Event::Key(key(KeyCode::Esc))),
        ]);

        assert!(read_keys_from(next, &latch, &quit).is_ok());
        assert!(quit.load(Ordering::Acquire));
        assert_eq!(latch.latest(), Some(Input::Left));
    }

    #[test]
    fn failed_read_is_reported_not_a_clean_quit() {
        let latch = InputLatch::new();
        let quit = AtomicBool::new(false);
        let next = events(vec![
            Ok(Event::Key(key(KeyCode::Down))),
            Err(ErrorKind::IoError(io::Error::new(io::ErrorKind::Other, "tty gone"))),
        ]);

        let err = read_keys_from(next, &latch, &quit).unwrap_err();
        assert!(err.to_string().contains("reading terminal events"), "{}", err);
        assert!(quit.load(Ordering::Acquire));
        assert_eq!(latch.latest(), Some(Input::Down));
    }

    #[test]
    fn retry_has_no_direction() {
        assert_eq!(Input::Retry.direction(), None);
        assert_eq!(Input::Up.direction(), Some(Direction::Up));
    }
}
