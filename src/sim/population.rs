/// Population controller: runs once per tick after the purge.
///
///   1. Transient goodie: one chance in `goodie_chance(level)`. One in five
///      of those is a sonar kit at the fixed spawn point, the rest are water
///      pools on a random dirt-free spot.
///   2. Protester: the spawn timer advances every tick; once it reaches
///      `spawn_interval(level)` and the live count is below the cap, a new
///      protester appears at the exit and the timer restarts. At the cap the
///      timer keeps running, so the next free slot is filled at once.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, trace};

use crate::domain::entity::{Actor, ActorKind, ProtesterBody, EXIT_CELL, SONAR_SPAWN};
use crate::domain::terrain::MAX_COORD;

use super::world::Simulation;

pub fn run_population(sim: &mut Simulation) {
    if !sim.spawning { return; }
    maybe_spawn_goodie(sim);
    spawn_protester_if_due(sim);
}

fn maybe_spawn_goodie(sim: &mut Simulation) {
    let chance = sim.tuning.goodie_chance(sim.level).max(1);
    if sim.rng.gen_range(0..chance) != 0 { return; }

    let lifetime = Some(sim.tuning.goodie_lifetime(sim.level));
    if sim.rng.gen_range(0..5) == 0 {
        let (x, y) = SONAR_SPAWN;
        sim.add_actor(Actor::goodie(ActorKind::Sonar, x, y, true, lifetime));
        debug!(tick = sim.tick, "sonar kit spawned");
    } else if let Some((x, y)) = random_open_spot(sim) {
        sim.add_actor(Actor::goodie(ActorKind::WaterPool, x, y, true, lifetime));
        debug!(tick = sim.tick, x, y, "water pool spawned");
    }
}

/// A uniformly chosen anchor whose whole footprint is dirt-free.
fn random_open_spot(sim: &mut Simulation) -> Option<(i32, i32)> {
    let spots: Vec<(i32, i32)> = (0..=MAX_COORD)
        .flat_map(|y| (0..=MAX_COORD).map(move |x| (x, y)))
        .filter(|&(x, y)| sim.terrain.is_footprint_clear(x, y))
        .collect();
    spots.choose(&mut sim.rng).copied()
}

/// Advance the spawn timer and add a protester if one is due and there
/// is room. Returns true when a protester was added.
pub fn spawn_protester_if_due(sim: &mut Simulation) -> bool {
    sim.ticks_since_spawn = sim.ticks_since_spawn.saturating_add(1);
    if sim.ticks_since_spawn < sim.tuning.spawn_interval(sim.level) { return false; }

    let live = sim.live_protesters();
    if live >= sim.tuning.protester_cap(sim.level) {
        trace!(live, "protester cap reached");
        return false;
    }

    let hardcore = sim.rng.gen_range(0..100) < sim.tuning.hardcore_percent(sim.level);
    let health = if hardcore { sim.tuning.hardcore_health } else { sim.tuning.regular_health };
    let run = sim.rng.gen_range(sim.tuning.run_length_min..=sim.tuning.run_length_max);
    let rest = sim.tuning.protester_wait(sim.level);
    let (x, y) = EXIT_CELL;
    let id = sim.add_actor(Actor::protester(hardcore, x, y, ProtesterBody::new(health, rest, run)));
    sim.ticks_since_spawn = 0;
    debug!(id = id.0, hardcore, live = live + 1, "protester spawned");
    true
}
