/// Terminal key polling.
///
/// The simulation consumes at most one key per tick, the most recent one,
/// so the tracker keeps a single pending key and each press overwrites it.
/// Release events are ignored. Quit keys (`q`, Ctrl+C) are tracked apart
/// from game keys and never reach the simulation.
///
/// ## Key map
///   arrows / WASD  move      space  squirt     tab  drop bribe
///   z              sonar     esc    give up    q    quit

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use frackfield::sim::event::Key;

pub struct InputState {
    pending: Option<Key>,
    quit: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState { pending: None, quit: false }
    }

    /// Drain all pending terminal events without blocking.
    pub fn drain_events(&mut self) {
        while poll(Duration::ZERO).unwrap_or(false) {
            let Ok(Event::Key(key)) = event::read() else { continue };
            if key.kind == KeyEventKind::Release { continue; }
            if is_quit(&key) {
                self.quit = true;
                continue;
            }
            if let Some(k) = map_key(key.code) {
                self.pending = Some(k);
            }
        }
    }

    /// The last game key since the previous call; reading clears it.
    pub fn take_key(&mut self) -> Option<Key> {
        self.pending.take()
    }

    /// Drop a key pressed while no tick was running to consume it.
    pub fn discard(&mut self) {
        self.pending = None;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => true,
        KeyCode::Char('c') | KeyCode::Char('C') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

pub fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Key::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Key::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Key::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Key::Right),
        KeyCode::Char(' ') => Some(Key::Fire),
        KeyCode::Tab => Some(Key::DropBribe),
        KeyCode::Char('z') | KeyCode::Char('Z') => Some(Key::UseSonar),
        KeyCode::Esc => Some(Key::GiveUp),
        _ => None,
    }
}
