/// Simulation: the complete state of one running field.
///
/// ## Ownership
///
///   terrain                    dirt layer, reset at level start
///   registry                   every non-player actor
///   player                     owned directly, never purged mid-tick
///   exit_field / target_field  rebuilt every tick by `step`
///
/// There are no globals: independent simulations can coexist, which the
/// tests rely on. Collaborators (keys, sound, status text) are reached only
/// through the `Host` trait passed into `step`.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::config::{GameConfig, Tuning};
use crate::domain::entity::{Actor, ActorId, ActorKind, Direction, Player, EXIT_CELL};
use crate::domain::pathfind::DistanceField;
use crate::domain::rules::MoveView;
use crate::domain::spatial::BoulderMap;
use crate::domain::terrain::TerrainGrid;

use super::event::{Key, SoundId};
use super::registry::ActorRegistry;

/// The collaborator seam: everything the core needs from the outside.
pub trait Host {
    /// Last key pressed since the previous call; reading clears it.
    fn last_key(&mut self) -> Option<Key>;
    fn play_sound(&mut self, sound: SoundId);
    fn publish_status(&mut self, text: &str);
}

/// One drawable item for the rendering collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Drawable {
    pub kind: ActorKind,
    pub sprite_id: &'static str,
    pub x: i32,
    pub y: i32,
    pub facing: Direction,
}

pub struct Simulation {
    // ── Field ──
    pub terrain: TerrainGrid,
    pub registry: ActorRegistry,
    pub player: Player,

    // ── Navigation (rebuilt each tick) ──
    pub exit_field: DistanceField,
    pub target_field: DistanceField,

    // ── Counters exposed to the host ──
    pub level: u32,
    pub score: u32,
    pub lives: u32,
    pub barrels_left: usize,
    pub tick: u64,

    // ── Population control ──
    pub ticks_since_spawn: u32,
    /// Off in sandboxes so tests control every actor.
    pub spawning: bool,

    pub tuning: Tuning,
    pub rng: SmallRng,
}

// ── Construction ──

impl Simulation {
    /// A new game at level 0 with the configured lives. Call
    /// `level::start_level` before the first tick.
    pub fn new(config: &GameConfig) -> Self {
        let rng = match config.general.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let mut sim = Simulation::with_parts(TerrainGrid::new(), config.tuning.clone(), rng);
        sim.lives = config.timing.start_lives;
        sim
    }

    /// An empty field (no actors besides the player) on the given terrain,
    /// with population spawning switched off.
    pub fn sandbox(terrain: TerrainGrid, level: u32, seed: u64) -> Self {
        let mut sim = Simulation::with_parts(terrain, Tuning::default(), SmallRng::seed_from_u64(seed));
        sim.level = level;
        sim.spawning = false;
        sim.ticks_since_spawn = 0;
        sim
    }

    fn with_parts(terrain: TerrainGrid, tuning: Tuning, rng: SmallRng) -> Self {
        Simulation {
            terrain,
            registry: ActorRegistry::new(),
            player: Player::new(&tuning),
            exit_field: DistanceField::new(),
            target_field: DistanceField::new(),
            level: 0,
            score: 0,
            lives: 3,
            barrels_left: 0,
            tick: 0,
            ticks_since_spawn: tuning.spawn_interval(0),
            spawning: true,
            tuning,
            rng,
        }
    }
}

// ── Actor management ──

impl Simulation {
    /// Register an actor. Barrels count toward the level goal.
    pub fn add_actor(&mut self, actor: Actor) -> ActorId {
        if actor.kind == ActorKind::Barrel {
            self.barrels_left += 1;
        }
        self.registry.insert(actor)
    }

    pub fn boulder_map(&self) -> BoulderMap {
        BoulderMap::from_actors(self.registry.as_slice())
    }

    /// Rebuild both distance fields from the current terrain and boulders.
    pub fn recompute_fields(&mut self) {
        let boulders = self.boulder_map();
        let view = MoveView { terrain: &self.terrain, boulders: &boulders };
        self.exit_field.recompute(EXIT_CELL, &view);
        self.target_field.recompute((self.player.x, self.player.y), &view);
    }

    pub fn live_protesters(&self) -> usize {
        self.registry.count_live(ActorKind::is_protester)
    }
}

// ── Host-facing views ──

impl Simulation {
    pub fn terrain(&self) -> &TerrainGrid {
        &self.terrain
    }

    /// Player first, then every live visible actor in registration order.
    pub fn drawables(&self) -> Vec<Drawable> {
        let mut out = Vec::with_capacity(self.registry.len() + 1);
        if self.player.alive() {
            out.push(Drawable {
                kind: ActorKind::Player,
                sprite_id: ActorKind::Player.sprite_id(),
                x: self.player.x,
                y: self.player.y,
                facing: self.player.facing,
            });
        }
        out.extend(self.registry.iter().filter(|a| a.alive && a.visible).map(|a| Drawable {
            kind: a.kind,
            sprite_id: a.kind.sprite_id(),
            x: a.x,
            y: a.y,
            facing: a.facing,
        }));
        out
    }
}
