/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to defaults if the file is missing or incomplete.
///
/// `[tuning]` carries every simulation constant; the level-scaled values
/// are derived from it by level-taking methods on `Tuning` (`protester_wait`,
/// `stun_ticks`, `boulder_count`, ...).

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("config.toml parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Public Config Struct ──

#[derive(Clone, Debug, Deserialize, Default)]
pub struct GameConfig {
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub tuning: Tuning,
    #[serde(default)]
    pub general: GeneralConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    #[serde(default = "default_start_lives")]
    pub start_lives: u32,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct GeneralConfig {
    /// Fixed seed for reproducible runs; entropy when absent.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Tuning {
    #[serde(default = "default_dislodge_ticks")]
    pub boulder_dislodge_ticks: u32,
    #[serde(default = "default_player_health")]
    pub player_health: i32,
    #[serde(default = "default_player_water")]
    pub player_water: u32,
    #[serde(default = "default_player_sonar")]
    pub player_sonar: u32,
    #[serde(default = "default_regular_health")]
    pub regular_health: i32,
    #[serde(default = "default_hardcore_health")]
    pub hardcore_health: i32,
    #[serde(default = "default_shout_radius")]
    pub shout_radius: i32,
    #[serde(default = "default_shout_damage")]
    pub shout_damage: i32,
    #[serde(default = "default_shout_cooldown")]
    pub shout_cooldown: u32,
    /// Least rest a protester takes after shouting, whatever the level.
    #[serde(default = "default_shout_rest")]
    pub shout_rest: u32,
    #[serde(default = "default_squirt_damage")]
    pub squirt_damage: i32,
    #[serde(default = "default_squirt_range")]
    pub squirt_range: u32,
    #[serde(default = "default_boulder_damage")]
    pub boulder_damage: i32,
    #[serde(default = "default_turn_cooldown")]
    pub turn_cooldown: u32,
    #[serde(default = "default_run_min")]
    pub run_length_min: i32,
    #[serde(default = "default_run_max")]
    pub run_length_max: i32,
    #[serde(default = "default_pickup_radius")]
    pub pickup_radius: i32,
    #[serde(default = "default_discover_radius")]
    pub discover_radius: i32,
    #[serde(default = "default_sonar_radius")]
    pub sonar_radius: i32,
    #[serde(default = "default_bribe_lifetime")]
    pub bribe_lifetime: u32,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 100 }
fn default_start_lives() -> u32 { 3 }
fn default_dislodge_ticks() -> u32 { 30 }
fn default_player_health() -> i32 { 10 }
fn default_player_water() -> u32 { 5 }
fn default_player_sonar() -> u32 { 1 }
fn default_regular_health() -> i32 { 5 }
fn default_hardcore_health() -> i32 { 20 }
fn default_shout_radius() -> i32 { 4 }
fn default_shout_damage() -> i32 { 2 }
fn default_shout_cooldown() -> u32 { 15 }
fn default_shout_rest() -> u32 { 2 }
fn default_squirt_damage() -> i32 { 2 }
fn default_squirt_range() -> u32 { 4 }
fn default_boulder_damage() -> i32 { 100 }
fn default_turn_cooldown() -> u32 { 200 }
fn default_run_min() -> i32 { 8 }
fn default_run_max() -> i32 { 60 }
fn default_pickup_radius() -> i32 { 3 }
fn default_discover_radius() -> i32 { 4 }
fn default_sonar_radius() -> i32 { 12 }
fn default_bribe_lifetime() -> u32 { 100 }

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            tick_rate_ms: default_tick_rate(),
            start_lives: default_start_lives(),
        }
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning {
            boulder_dislodge_ticks: default_dislodge_ticks(),
            player_health: default_player_health(),
            player_water: default_player_water(),
            player_sonar: default_player_sonar(),
            regular_health: default_regular_health(),
            hardcore_health: default_hardcore_health(),
            shout_radius: default_shout_radius(),
            shout_damage: default_shout_damage(),
            shout_cooldown: default_shout_cooldown(),
            shout_rest: default_shout_rest(),
            squirt_damage: default_squirt_damage(),
            squirt_range: default_squirt_range(),
            boulder_damage: default_boulder_damage(),
            turn_cooldown: default_turn_cooldown(),
            run_length_min: default_run_min(),
            run_length_max: default_run_max(),
            pickup_radius: default_pickup_radius(),
            discover_radius: default_discover_radius(),
            sonar_radius: default_sonar_radius(),
            bribe_lifetime: default_bribe_lifetime(),
        }
    }
}

// ── Level scaling ──

impl Tuning {
    /// Ticks a protester rests between active ticks.
    pub fn protester_wait(&self, level: u32) -> u32 {
        3u32.saturating_sub(level / 4)
    }

    /// Rest imposed by a stun or a hardcore protester staring at a bribe.
    pub fn stun_ticks(&self, level: u32) -> u32 {
        100u32.saturating_sub(level * 10).max(50)
    }

    /// Flood-field distance within which a hardcore protester homes in.
    pub fn pursuit_radius(&self, level: u32) -> i32 {
        16 + level as i32 * 2
    }

    /// Lifetime of sonar kits and water pools.
    pub fn goodie_lifetime(&self, level: u32) -> u32 {
        300u32.saturating_sub(10 * level).max(100)
    }

    /// One-in-`G` chance per tick of a transient goodie.
    pub fn goodie_chance(&self, level: u32) -> u32 {
        level * 25 + 300
    }

    /// Ticks between protester spawns.
    pub fn spawn_interval(&self, level: u32) -> u32 {
        200u32.saturating_sub(level).max(25)
    }

    /// Most protesters alive at once.
    pub fn protester_cap(&self, level: u32) -> usize {
        ((2.0 + level as f64 * 1.5) as usize).min(15)
    }

    /// Percent chance a spawn is hardcore.
    pub fn hardcore_percent(&self, level: u32) -> u32 {
        (level * 10 + 30).min(90)
    }

    pub fn boulder_count(&self, level: u32) -> usize {
        (level / 2 + 2).min(9) as usize
    }

    pub fn gold_count(&self, level: u32) -> usize {
        5u32.saturating_sub(level / 2).max(2) as usize
    }

    pub fn barrel_count(&self, level: u32) -> usize {
        (2 + level).min(21) as usize
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        for dir in candidate_dirs() {
            let path = dir.join("config.toml");
            if !path.exists() {
                continue;
            }
            match Self::read(&path) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    warn!("{e}; using default settings");
                    return GameConfig::default();
                }
            }
        }
        GameConfig::default()
    }

    fn read(path: &std::path::Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let mut cfg = toml::from_str::<GameConfig>(text)?;
        cfg.tuning.fix_run_lengths();
        Ok(cfg)
    }
}

impl Tuning {
    /// Patrol runs are drawn from `run_length_min..=run_length_max`; an
    /// inverted pair is swapped and a non-positive minimum raised to 1.
    fn fix_run_lengths(&mut self) {
        if self.run_length_min > self.run_length_max {
            warn!(
                min = self.run_length_min,
                max = self.run_length_max,
                "run_length_min above run_length_max; swapping"
            );
            std::mem::swap(&mut self.run_length_min, &mut self.run_length_max);
        }
        if self.run_length_min < 1 {
            warn!(min = self.run_length_min, "run_length_min below 1; raising");
            self.run_length_min = 1;
            self.run_length_max = self.run_length_max.max(1);
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}
