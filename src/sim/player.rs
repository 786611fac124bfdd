/// Player update: the digger.
///
/// ## Key handling
///
/// ┌────────────┬──────────────────────────────────────────────────┐
/// │ Key        │ Effect                                           │
/// ├────────────┼──────────────────────────────────────────────────┤
/// │ direction  │ new facing → turn only; same facing → dig + move │
/// │ Fire       │ spend 1 water, squirt appears 4 cells ahead      │
/// │ DropBribe  │ spend 1 gold, bribe dropped at the player        │
/// │ UseSonar   │ spend 1 charge, reveal hidden goodies nearby     │
/// │ GiveUp     │ health → 0                                       │
/// └────────────┴──────────────────────────────────────────────────┘
///
/// The footprint is carved every tick before the key is read, so the
/// player never stands in dirt.

use tracing::debug;

use crate::domain::entity::{Actor, ActorKind, Direction};
use crate::domain::rules::{MoveView, Mover};
use crate::domain::spatial::within_radius;

use super::event::{Key, SoundId};
use super::world::{Host, Simulation};

pub fn update_player(sim: &mut Simulation, host: &mut dyn Host) {
    if !sim.player.alive() { return; }

    if sim.terrain.carve_under_footprint(sim.player.x, sim.player.y) {
        host.play_sound(SoundId::Dig);
    }

    let Some(key) = host.last_key() else { return };
    match key {
        Key::Up => walk(sim, host, Direction::Up),
        Key::Down => walk(sim, host, Direction::Down),
        Key::Left => walk(sim, host, Direction::Left),
        Key::Right => walk(sim, host, Direction::Right),
        Key::Fire => fire(sim, host),
        Key::DropBribe => drop_bribe(sim),
        Key::UseSonar => use_sonar(sim, host),
        Key::GiveUp => {
            debug!(tick = sim.tick, "player gave up");
            sim.player.health = 0;
            host.play_sound(SoundId::PlayerGiveUp);
        }
    }
}

/// Damage the player. Shouts and falling boulders both land here.
pub fn annoy_player(sim: &mut Simulation, host: &mut dyn Host, damage: i32) {
    if !sim.player.alive() { return; }
    sim.player.health -= damage;
    if sim.player.alive() {
        host.play_sound(SoundId::PlayerAnnoyed);
    } else {
        debug!(tick = sim.tick, damage, "player died");
        host.play_sound(SoundId::PlayerGiveUp);
    }
}

// ── Movement ──

fn walk(sim: &mut Simulation, host: &mut dyn Host, dir: Direction) {
    if sim.player.facing != dir {
        sim.player.facing = dir;
        return;
    }

    let (x, y) = (sim.player.x, sim.player.y);
    let legal = {
        let boulders = sim.boulder_map();
        MoveView { terrain: &sim.terrain, boulders: &boulders }.can_step(x, y, dir, Mover::Digger)
    };
    if !legal { return; }

    if sim.terrain.carve_in_direction(x, y, dir) {
        host.play_sound(SoundId::Dig);
    }
    (sim.player.x, sim.player.y) = dir.step(x, y);
}

// ── Inventory ──

fn fire(sim: &mut Simulation, host: &mut dyn Host) {
    if sim.player.water == 0 { return; }
    sim.player.water -= 1;
    host.play_sound(SoundId::PlayerSquirt);

    let facing = sim.player.facing;
    let (dx, dy) = facing.delta();
    let reach = sim.tuning.squirt_range as i32;
    let (sx, sy) = (sim.player.x + dx * reach, sim.player.y + dy * reach);

    let room = {
        let boulders = sim.boulder_map();
        MoveView { terrain: &sim.terrain, boulders: &boulders }.is_standable(sx, sy)
    };
    if room {
        sim.add_actor(Actor::squirt(sx, sy, facing));
    }
}

fn drop_bribe(sim: &mut Simulation) {
    if sim.player.gold == 0 { return; }
    sim.player.gold -= 1;
    let lifetime = Some(sim.tuning.bribe_lifetime);
    sim.add_actor(Actor::goodie(ActorKind::Bribe, sim.player.x, sim.player.y, true, lifetime));
}

fn use_sonar(sim: &mut Simulation, host: &mut dyn Host) {
    if sim.player.sonar == 0 { return; }
    sim.player.sonar -= 1;
    host.play_sound(SoundId::Sonar);

    let (px, py, r) = (sim.player.x, sim.player.y, sim.tuning.sonar_radius);
    for a in sim.registry.iter_mut() {
        if a.alive && !a.visible && a.kind.is_goodie() && within_radius(a.x, a.y, px, py, r) {
            a.visible = true;
        }
    }
}
