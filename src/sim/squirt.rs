/// Squirt: a short-lived water jet fired by the player.
///
/// Each tick: hit every active protester within reach and vanish, or
/// vanish after its full range, or vanish against dirt, a boulder or the
/// field edge, or otherwise advance one cell.

use crate::domain::entity::Body;
use crate::domain::rules::{MoveView, Mover};
use crate::domain::spatial::protesters_within;

use super::protester::{annoy, Annoyance};
use super::world::{Host, Simulation};

pub const SQUIRT_HIT_RADIUS: i32 = 3;

pub fn update_squirt(sim: &mut Simulation, idx: usize, host: &mut dyn Host) {
    let Some(actor) = sim.registry.get(idx).filter(|a| a.alive) else { return };
    let (x, y, facing) = (actor.x, actor.y, actor.facing);
    let Body::Squirt(body) = &actor.body else { return };
    let travelled = body.travelled;

    let hits = protesters_within(sim.registry.as_slice(), x, y, SQUIRT_HIT_RADIUS);
    if !hits.is_empty() {
        for i in hits {
            annoy(sim, i, host, Annoyance::Squirt);
        }
        vanish(sim, idx);
        return;
    }

    if travelled >= sim.tuning.squirt_range {
        vanish(sim, idx);
        return;
    }

    let open = {
        let boulders = sim.boulder_map();
        MoveView { terrain: &sim.terrain, boulders: &boulders }.can_step(x, y, facing, Mover::Walker)
    };
    if !open {
        vanish(sim, idx);
        return;
    }

    if let Some(a) = sim.registry.get_mut(idx) {
        (a.x, a.y) = facing.step(x, y);
        if let Body::Squirt(b) = &mut a.body {
            b.travelled += 1;
        }
    }
}

fn vanish(sim: &mut Simulation, idx: usize) {
    if let Some(a) = sim.registry.get_mut(idx) {
        a.alive = false;
    }
}
