/// Boulder state machine.
///
/// ## Transitions
///
///   Stable ──(no dirt below)──▶ Dislodged ──(countdown hits 0)──▶ Falling ──▶ dead
///
/// ## Falling: strip below, checked in order
///
/// ┌───────────────────────────┬─────────────────────────────────────────┐
/// │ Condition                  │ Result                                  │
/// ├───────────────────────────┼─────────────────────────────────────────┤
/// │ at the bottom edge         │ die                                     │
/// │ another boulder            │ die (the lower boulder stays put)       │
/// │ dirt                       │ die                                     │
/// │ player                     │ die, player takes heavy damage          │
/// │ protester(s)               │ die, each active protester is crushed   │
/// │ otherwise                  │ move down one cell; die if now at y = 0 │
/// └───────────────────────────┴─────────────────────────────────────────┘
///
/// Falling never carves dirt.

use tracing::debug;

use crate::domain::entity::{BoulderState, Direction};
use crate::domain::spatial::{is_boulder_occupying, player_in_strip, protesters_in_strip};
use crate::domain::terrain::leading_strip;

use super::event::SoundId;
use super::player::annoy_player;
use super::protester::{annoy, Annoyance};
use super::world::{Host, Simulation};

pub fn update_boulder(sim: &mut Simulation, idx: usize, host: &mut dyn Host) {
    let Some(actor) = sim.registry.get(idx).filter(|a| a.alive) else { return };
    let (x, y, id) = (actor.x, actor.y, actor.id);
    let Some(state) = actor.boulder_body().map(|b| b.state) else { return };

    match state {
        BoulderState::Stable => {
            if sim.terrain.has_dirt_adjacent(x, y, Direction::Down) { return; }
            let countdown = sim.tuning.boulder_dislodge_ticks;
            if let Some(b) = sim.registry.get_mut(idx).and_then(|a| a.boulder_body_mut()) {
                b.state = BoulderState::Dislodged;
                b.countdown = countdown;
            }
            debug!(id = id.0, x, y, "boulder dislodged");
        }
        BoulderState::Dislodged => {
            let Some(b) = sim.registry.get_mut(idx).and_then(|a| a.boulder_body_mut()) else { return };
            b.countdown = b.countdown.saturating_sub(1);
            if b.countdown == 0 {
                b.state = BoulderState::Falling;
                host.play_sound(SoundId::FallingRock);
                debug!(id = id.0, x, y, "boulder falling");
            }
        }
        BoulderState::Falling => fall(sim, idx, host, x, y),
    }
}

fn fall(sim: &mut Simulation, idx: usize, host: &mut dyn Host, x: i32, y: i32) {
    let actors = sim.registry.as_slice();
    let landed = y <= 0
        || leading_strip(x, y, Direction::Down)
            .iter()
            .any(|&(cx, cy)| is_boulder_occupying(actors, cx, cy) || sim.terrain.is_dirt(cx, cy));

    if landed {
        kill(sim, idx);
        return;
    }

    if sim.player.alive() && player_in_strip(&sim.player, x, y, Direction::Down) {
        let damage = sim.tuning.boulder_damage;
        annoy_player(sim, host, damage);
        kill(sim, idx);
        return;
    }

    // a leaving protester still stops the boulder; `annoy` skips it
    let hits = protesters_in_strip(sim.registry.as_slice(), x, y, Direction::Down);
    if !hits.is_empty() {
        for i in hits {
            annoy(sim, i, host, Annoyance::Boulder);
        }
        kill(sim, idx);
        return;
    }

    if let Some(a) = sim.registry.get_mut(idx) {
        a.y -= 1;
        if a.y == 0 {
            a.alive = false;
        }
    }
}

fn kill(sim: &mut Simulation, idx: usize) {
    if let Some(a) = sim.registry.get_mut(idx) {
        debug!(id = a.id.0, x = a.x, y = a.y, "boulder came to rest");
        a.alive = false;
    }
}
