/// Test doubles shared by the sim tests.

use std::collections::VecDeque;

use crate::domain::terrain::TerrainGrid;

use super::event::{Key, SoundId};
use super::world::{Host, Simulation};

/// Scripted keys in, recorded sounds and status lines out.
#[derive(Default)]
pub struct RecordingHost {
    pub keys: VecDeque<Key>,
    pub sounds: Vec<SoundId>,
    pub statuses: Vec<String>,
}

impl RecordingHost {
    pub fn new() -> Self {
        RecordingHost::default()
    }

    pub fn with_keys(keys: &[Key]) -> Self {
        RecordingHost { keys: keys.iter().copied().collect(), ..Default::default() }
    }

    pub fn played(&self, sound: SoundId) -> bool {
        self.sounds.contains(&sound)
    }

    pub fn count(&self, sound: SoundId) -> usize {
        self.sounds.iter().filter(|s| **s == sound).count()
    }
}

impl Host for RecordingHost {
    fn last_key(&mut self) -> Option<Key> {
        self.keys.pop_front()
    }

    fn play_sound(&mut self, sound: SoundId) {
        self.sounds.push(sound);
    }

    fn publish_status(&mut self, text: &str) {
        self.statuses.push(text.to_string());
    }
}

/// Dirt-free sandbox with the player parked at `(x, y)`.
pub fn open_sim(level: u32, player_at: (i32, i32)) -> Simulation {
    let mut sim = Simulation::sandbox(TerrainGrid::open(), level, 11);
    sim.player.x = player_at.0;
    sim.player.y = player_at.1;
    sim
}
