/// Level setup and the life/level transitions the shell drives.
///
/// ## Placement
///
///   Boulders  `boulder_count(level)`  y in 20..=56, dirt under them removed
///   Gold      `gold_count(level)`     y in 0..=56, hidden
///   Barrels   `barrel_count(level)`   y in 0..=56, hidden
///
/// Anchors are drawn at random with x in 0..=60. A candidate is rejected
/// when its footprint touches the shaft columns or when it lies within 6
/// of an item already placed.

use std::ops::RangeInclusive;

use rand::Rng;
use tracing::{debug, warn};

use crate::domain::entity::{Actor, ActorKind, Player};
use crate::domain::spatial::within_radius;
use crate::domain::terrain::{TerrainGrid, FOOTPRINT, MAX_COORD, SHAFT_LEFT, SHAFT_RIGHT};

use super::world::Simulation;

const MIN_SPACING: i32 = 6;
const MAX_ATTEMPTS: usize = 10_000;

/// Reset the field for `sim.level`: fresh terrain, fresh player, new items.
/// Score and lives carry over.
pub fn start_level(sim: &mut Simulation) {
    sim.terrain = TerrainGrid::new();
    sim.registry.clear();
    sim.player = Player::new(&sim.tuning);
    sim.barrels_left = 0;
    sim.tick = 0;
    sim.ticks_since_spawn = sim.tuning.spawn_interval(sim.level);

    let level = sim.level;
    let mut placed = Vec::new();

    let n = sim.tuning.boulder_count(level);
    let boulders = scatter(sim, n, 20..=56, &mut placed);
    for &(x, y) in &boulders {
        sim.terrain.carve_under_footprint(x, y);
        sim.add_actor(Actor::boulder(x, y));
    }

    let n = sim.tuning.gold_count(level);
    let gold = scatter(sim, n, 0..=56, &mut placed);
    for &(x, y) in &gold {
        sim.add_actor(Actor::goodie(ActorKind::Gold, x, y, false, None));
    }

    let n = sim.tuning.barrel_count(level);
    let barrels = scatter(sim, n, 0..=56, &mut placed);
    for &(x, y) in &barrels {
        sim.add_actor(Actor::goodie(ActorKind::Barrel, x, y, false, None));
    }

    debug!(
        level,
        boulders = boulders.len(),
        gold = gold.len(),
        barrels = barrels.len(),
        "level started"
    );
}

/// The player died: spend a life and restart the level if any remain.
/// Returns false on game over.
pub fn lose_life(sim: &mut Simulation) -> bool {
    sim.lives = sim.lives.saturating_sub(1);
    if sim.lives == 0 {
        debug!(score = sim.score, "game over");
        return false;
    }
    start_level(sim);
    true
}

pub fn advance_level(sim: &mut Simulation) {
    sim.level += 1;
    start_level(sim);
}

// ══════════════════════════════════════════════════════════════
// Random placement
// ══════════════════════════════════════════════════════════════

fn touches_shaft(x: i32) -> bool {
    x + FOOTPRINT - 1 >= SHAFT_LEFT && x <= SHAFT_RIGHT
}

fn scatter(
    sim: &mut Simulation,
    count: usize,
    ys: RangeInclusive<i32>,
    placed: &mut Vec<(i32, i32)>,
) -> Vec<(i32, i32)> {
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let mut spot = None;
        for _ in 0..MAX_ATTEMPTS {
            let x = sim.rng.gen_range(0..=MAX_COORD);
            let y = sim.rng.gen_range(ys.clone());
            if touches_shaft(x) { continue; }
            if placed.iter().any(|&(px, py)| within_radius(x, y, px, py, MIN_SPACING)) { continue; }
            spot = Some((x, y));
            break;
        }
        match spot {
            Some(p) => {
                placed.push(p);
                out.push(p);
            }
            None => {
                warn!(count, placed = placed.len(), "no room left for another item");
                break;
            }
        }
    }
    out
}
