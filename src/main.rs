/// Entry point and game loop.
///
/// The binary is the simulation's host: it feeds the last key pressed,
/// plays sounds, shows the status line, and runs the lives / level state
/// machine around `step`.
///
/// ## Phases
///   Playing        one `step` per tick
///   Dying(n)       banner for n ticks, then lose a life (or game over)
///   LevelDone(n)   banner for n ticks, then the next level
///   GameOver       banner until quit

mod ui;

use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::info;

use frackfield::config::GameConfig;
use frackfield::sim::event::{Key, SoundId, TickStatus};
use frackfield::sim::level;
use frackfield::sim::status::status_line;
use frackfield::sim::step::step;
use frackfield::sim::world::{Host, Simulation};

use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);
const LOG_FILE: &str = "frackfield.log";
const BANNER_TICKS: u32 = 20;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Phase {
    Playing,
    Dying(u32),
    LevelDone(u32),
    GameOver,
}

impl Phase {
    fn banner(self) -> Option<&'static str> {
        match self {
            Phase::Playing => None,
            Phase::Dying(_) => Some("Ouch! You gave up."),
            Phase::LevelDone(_) => Some("All oil found. On to the next field!"),
            Phase::GameOver => Some("GAME OVER  (q to quit)"),
        }
    }
}

// ── Host adapter ──

struct TerminalHost<'a> {
    input: &'a mut InputState,
    sound: Option<&'a SoundEngine>,
    status: &'a mut String,
}

impl Host for TerminalHost<'_> {
    fn last_key(&mut self) -> Option<Key> {
        self.input.take_key()
    }

    fn play_sound(&mut self, sound: SoundId) {
        if let Some(sfx) = self.sound {
            sfx.play(sound);
        }
    }

    fn publish_status(&mut self, text: &str) {
        self.status.clear();
        self.status.push_str(text);
    }
}

fn main() {
    init_tracing();
    let config = GameConfig::load();

    let mut sim = Simulation::new(&config);
    level::start_level(&mut sim);

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();

    let result = game_loop(&mut sim, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Final Score: {} (level {})", sim.score, sim.level);
}

/// Log to a file so the terminal drawing stays clean. Filter with RUST_LOG.
fn init_tracing() {
    let Ok(file) = File::create(LOG_FILE) else { return };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn game_loop(
    sim: &mut Simulation,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut input = InputState::new();
    let tick_rate = Duration::from_millis(config.timing.tick_rate_ms);
    let mut last_tick = Instant::now();
    let mut phase = Phase::Playing;
    let mut status = status_line(sim);

    loop {
        input.drain_events();
        if input.quit_requested() {
            break;
        }

        if last_tick.elapsed() >= tick_rate {
            phase = advance(phase, sim, &mut input, sound, &mut status);
            last_tick = Instant::now();
        }

        renderer.render(sim, &status, phase.banner())?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

/// One shell tick.
fn advance(
    phase: Phase,
    sim: &mut Simulation,
    input: &mut InputState,
    sound: Option<&SoundEngine>,
    status: &mut String,
) -> Phase {
    match phase {
        Phase::Playing => {
            let mut host = TerminalHost { input, sound, status };
            match step(sim, &mut host) {
                TickStatus::Continue => Phase::Playing,
                TickStatus::PlayerDied => Phase::Dying(BANNER_TICKS),
                TickStatus::LevelComplete => Phase::LevelDone(BANNER_TICKS),
            }
        }
        Phase::Dying(0) => {
            input.discard();
            let next = if level::lose_life(sim) {
                Phase::Playing
            } else {
                info!(score = sim.score, level = sim.level, "game over");
                Phase::GameOver
            };
            *status = status_line(sim);
            next
        }
        Phase::Dying(n) => Phase::Dying(n - 1),
        Phase::LevelDone(0) => {
            input.discard();
            level::advance_level(sim);
            *status = status_line(sim);
            Phase::Playing
        }
        Phase::LevelDone(n) => Phase::LevelDone(n - 1),
        Phase::GameOver => Phase::GameOver,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Simulation {
        let cfg = GameConfig::from_toml_str("[general]\nrng_seed = 5\n").unwrap();
        let mut sim = Simulation::new(&cfg);
        level::start_level(&mut sim);
        sim
    }

    #[test]
    fn dying_waits_out_the_banner_then_restarts() {
        let mut sim = seeded();
        let mut input = InputState::new();
        let mut status = String::new();
        let mut phase = Phase::Dying(2);
        for _ in 0..2 {
            phase = advance(phase, &mut sim, &mut input, None, &mut status);
        }
        assert_eq!(phase, Phase::Dying(0));
        assert_eq!(sim.lives, 3);
        phase = advance(phase, &mut sim, &mut input, None, &mut status);
        assert_eq!(phase, Phase::Playing);
        assert_eq!(sim.lives, 2);
        assert!(status.contains("Lives: 2"));
    }

    #[test]
    fn last_life_ends_the_game() {
        let mut sim = seeded();
        sim.lives = 1;
        let mut input = InputState::new();
        let mut status = String::new();
        let phase = advance(Phase::Dying(0), &mut sim, &mut input, None, &mut status);
        assert_eq!(phase, Phase::GameOver);
        assert!(phase.banner().is_some());
    }

    #[test]
    fn finished_level_moves_on() {
        let mut sim = seeded();
        let mut input = InputState::new();
        let mut status = String::new();
        let phase = advance(Phase::LevelDone(0), &mut sim, &mut input, None, &mut status);
        assert_eq!(phase, Phase::Playing);
        assert_eq!(sim.level, 1);
        assert!(status.starts_with("Lvl:  1"));
    }

    #[test]
    fn playing_publishes_status() {
        let mut sim = seeded();
        let mut input = InputState::new();
        let mut status = String::new();
        let phase = advance(Phase::Playing, &mut sim, &mut input, None, &mut status);
        assert_eq!(phase, Phase::Playing);
        assert!(status.starts_with("Lvl:  0"));
    }
}
