/// The step function: advances the simulation by one tick.
///
/// Processing order:
///   1. Player (dig, key)
///   2. Distance fields (exit + player) rebuilt from the current terrain
///   3. Every registered actor, in registration order
///   4. Purge of the dead
///   5. Population controller
///   6. Status line, then win / lose check
///
/// Effects apply immediately: an actor visited later in the pass sees
/// whatever earlier actors did (a protester stunned by a squirt this tick
/// is already resting when its own turn comes). Fields rebuilt in (2) may
/// be stale by the time a protester reads them; `DistanceField::next_step`
/// re-checks legality, so the worst case is a wasted tick.

use tracing::{debug, trace};

use crate::domain::entity::ActorKind;

use super::event::{SoundId, TickStatus};
use super::world::{Host, Simulation};
use super::{boulder, goodie, player, population, protester, squirt, status};

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(sim: &mut Simulation, host: &mut dyn Host) -> TickStatus {
    sim.tick += 1;

    player::update_player(sim, host);
    sim.recompute_fields();
    resolve_actors(sim, host);
    let purged = sim.registry.purge_dead();
    population::run_population(sim);

    host.publish_status(&status::status_line(sim));
    trace!(tick = sim.tick, actors = sim.registry.len(), purged, "tick");

    if !sim.player.alive() {
        debug!(tick = sim.tick, level = sim.level, "player died");
        return TickStatus::PlayerDied;
    }
    if sim.barrels_left == 0 {
        host.play_sound(SoundId::FinishedLevel);
        debug!(tick = sim.tick, level = sim.level, score = sim.score, "level complete");
        return TickStatus::LevelComplete;
    }
    TickStatus::Continue
}

// ══════════════════════════════════════════════════════════════
// Actor dispatch
// ══════════════════════════════════════════════════════════════

fn resolve_actors(sim: &mut Simulation, host: &mut dyn Host) {
    // nothing registers actors during this pass, so the length is fixed
    for idx in 0..sim.registry.len() {
        let Some(kind) = sim.registry.get(idx).filter(|a| a.alive).map(|a| a.kind) else { continue };
        match kind {
            ActorKind::Boulder => boulder::update_boulder(sim, idx, host),
            ActorKind::RegularProtester | ActorKind::HardcoreProtester => {
                protester::update_protester(sim, idx, host);
            }
            ActorKind::Squirt => squirt::update_squirt(sim, idx, host),
            ActorKind::Barrel
            | ActorKind::Gold
            | ActorKind::Sonar
            | ActorKind::WaterPool
            | ActorKind::Bribe => goodie::update_goodie(sim, idx, host),
            ActorKind::Player => {}
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
