/// Protester behavior: one active tick per rest period.
///
/// ## Branch order (first match wins)
///
///   1. Resting   rest_ticks > 0: count down, nothing else
///   2. Leaving   at the exit, die; else one step down the exit field
///   3. Shout     player within shout radius, faced, cooldown elapsed;
///                rests at least `shout_rest` ticks afterwards
///   4. Pursue    hardcore only, player within the pursuit radius of
///                the target field and not already in shout range
///   5. Approach  clear orthogonal line of sight to the player
///   6. Patrol    straight runs with occasional perpendicular turns
///
/// Every active tick re-arms the rest counter with the per-level wait and
/// counts down the shout and turn cooldowns.
///
/// ## Effects
///
/// `annoy` and `bribe` are the effect half of the query-then-effect pair:
/// `spatial` finds the protester index, these apply damage, sound and
/// score. Leaving protesters are immune to both.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::domain::entity::{Actor, ActorKind, Direction, ProtesterBody, EXIT_CELL};
use crate::domain::pathfind::UNREACHED;
use crate::domain::rules::{MoveView, Mover};
use crate::domain::spatial::{within_radius, BoulderMap};

use super::event::SoundId;
use super::player::annoy_player;
use super::world::{Host, Simulation};

pub const SCORE_REGULAR_GIVE_UP: u32 = 100;
pub const SCORE_HARDCORE_GIVE_UP: u32 = 250;
pub const SCORE_CRUSHED: u32 = 500;
pub const SCORE_REGULAR_BRIBE: u32 = 25;
pub const SCORE_HARDCORE_BRIBE: u32 = 50;

/// What a protester did with its tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ProtesterAction {
    /// Dead or not a protester.
    Idle,
    Resting,
    Exited,
    StepToExit,
    Shouted,
    Pursued,
    Approached,
    Patrolled,
    Blocked,
}

/// Source of damage; decides the amount and the give-up bonus.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Annoyance {
    Squirt,
    Boulder,
}

// ══════════════════════════════════════════════════════════════
// Per-tick update
// ══════════════════════════════════════════════════════════════

pub fn update_protester(sim: &mut Simulation, idx: usize, host: &mut dyn Host) -> ProtesterAction {
    let Some(mut me) = sim.registry.get(idx).filter(|a| a.alive).cloned() else {
        return ProtesterAction::Idle;
    };
    let Some(mut body) = me.protester_body().cloned() else { return ProtesterAction::Idle };

    let action = act(sim, &mut me, &mut body, host);

    if let Some(slot) = sim.registry.get_mut(idx) {
        slot.x = me.x;
        slot.y = me.y;
        slot.facing = me.facing;
        slot.alive = me.alive;
        if let Some(b) = slot.protester_body_mut() {
            // health and leaving are owned by annoy/bribe
            b.rest_ticks = body.rest_ticks;
            b.shout_cooldown = body.shout_cooldown;
            b.steps_remaining = body.steps_remaining;
            b.turn_cooldown = body.turn_cooldown;
        }
    }
    action
}

fn act(sim: &mut Simulation, me: &mut Actor, body: &mut ProtesterBody, host: &mut dyn Host) -> ProtesterAction {
    if body.rest_ticks > 0 {
        body.rest_ticks -= 1;
        return ProtesterAction::Resting;
    }
    body.rest_ticks = sim.tuning.protester_wait(sim.level);
    body.shout_cooldown = body.shout_cooldown.saturating_sub(1);
    body.turn_cooldown = body.turn_cooldown.saturating_sub(1);

    let boulders = sim.boulder_map();

    // ── Leaving ──
    if body.leaving {
        if (me.x, me.y) == EXIT_CELL {
            debug!(id = me.id.0, "protester left the field");
            me.alive = false;
            return ProtesterAction::Exited;
        }
        let view = MoveView { terrain: &sim.terrain, boulders: &boulders };
        if let Some(dir) = sim.exit_field.next_step(me.x, me.y, &view) {
            advance(me, dir);
            return ProtesterAction::StepToExit;
        }
        // exit cut off for now; wander until the field heals
        return patrol(sim, &boulders, me, body);
    }

    // ── Shout ──
    let (px, py) = (sim.player.x, sim.player.y);
    let player_alive = sim.player.alive();
    let in_shout_range = player_alive && within_radius(me.x, me.y, px, py, sim.tuning.shout_radius);
    if in_shout_range && is_facing(me.x, me.y, me.facing, px, py) && body.shout_cooldown == 0 {
        host.play_sound(SoundId::ProtesterYell);
        let damage = sim.tuning.shout_damage;
        annoy_player(sim, host, damage);
        body.shout_cooldown = sim.tuning.shout_cooldown;
        body.rest_ticks = body.rest_ticks.max(sim.tuning.shout_rest);
        return ProtesterAction::Shouted;
    }

    if player_alive && !in_shout_range {
        let view = MoveView { terrain: &sim.terrain, boulders: &boulders };

        // ── Pursue ──
        if me.kind == ActorKind::HardcoreProtester {
            let d = sim.target_field.distance(me.x, me.y);
            if d != UNREACHED && d <= sim.tuning.pursuit_radius(sim.level) {
                if let Some(dir) = sim.target_field.next_step(me.x, me.y, &view) {
                    advance(me, dir);
                    body.steps_remaining = 0;
                    return ProtesterAction::Pursued;
                }
            }
        }

        // ── Approach ──
        if let Some(dir) = view.clear_line_of_sight(me.x, me.y, px, py) {
            advance(me, dir);
            body.steps_remaining = 0;
            return ProtesterAction::Approached;
        }
    }

    patrol(sim, &boulders, me, body)
}

fn patrol(sim: &mut Simulation, boulders: &BoulderMap, me: &mut Actor, body: &mut ProtesterBody) -> ProtesterAction {
    let view = MoveView { terrain: &sim.terrain, boulders };
    let (min, max) = (sim.tuning.run_length_min, sim.tuning.run_length_max);

    body.steps_remaining -= 1;
    if body.steps_remaining <= 0 {
        let mut dirs = Direction::ALL;
        dirs.shuffle(&mut sim.rng);
        if let Some(&d) = dirs.iter().find(|&&d| view.can_step(me.x, me.y, d, Mover::Walker)) {
            me.facing = d;
        }
        body.steps_remaining = sim.rng.gen_range(min..=max);
    } else if body.turn_cooldown == 0 {
        let options = view.perpendicular_options(me.x, me.y, me.facing);
        if let Some(&d) = options.choose(&mut sim.rng) {
            me.facing = d;
            body.steps_remaining = sim.rng.gen_range(min..=max);
            body.turn_cooldown = sim.tuning.turn_cooldown;
        }
    }

    if view.can_step(me.x, me.y, me.facing, Mover::Walker) {
        let dir = me.facing;
        advance(me, dir);
        ProtesterAction::Patrolled
    } else {
        body.steps_remaining = 0;
        ProtesterAction::Blocked
    }
}

fn advance(me: &mut Actor, dir: Direction) {
    me.facing = dir;
    (me.x, me.y) = dir.step(me.x, me.y);
}

/// Is `(px, py)` on the side of `(x, y)` the protester is looking at?
fn is_facing(x: i32, y: i32, facing: Direction, px: i32, py: i32) -> bool {
    match facing {
        Direction::Left => px <= x,
        Direction::Right => px >= x,
        Direction::Up => py >= y,
        Direction::Down => py <= y,
    }
}

// ══════════════════════════════════════════════════════════════
// Effects
// ══════════════════════════════════════════════════════════════

/// Apply damage to the protester at `idx`. A survivor is stunned; one
/// whose health reaches zero gives up and leaves.
pub fn annoy(sim: &mut Simulation, idx: usize, host: &mut dyn Host, cause: Annoyance) {
    let (damage, stun) = match cause {
        Annoyance::Squirt => (sim.tuning.squirt_damage, sim.tuning.stun_ticks(sim.level)),
        Annoyance::Boulder => (sim.tuning.boulder_damage, 0),
    };
    let Some(actor) = sim.registry.get_mut(idx) else { return };
    if !actor.is_active_protester() { return; }
    let hardcore = actor.kind == ActorKind::HardcoreProtester;
    let id = actor.id;
    let Some(body) = actor.protester_body_mut() else { return };

    body.health -= damage;
    if body.health > 0 {
        body.rest_ticks = stun;
        host.play_sound(SoundId::ProtesterAnnoyed);
        return;
    }

    body.leaving = true;
    body.rest_ticks = 0;
    host.play_sound(SoundId::ProtesterGiveUp);
    let bonus = match (cause, hardcore) {
        (Annoyance::Boulder, _) => SCORE_CRUSHED,
        (Annoyance::Squirt, true) => SCORE_HARDCORE_GIVE_UP,
        (Annoyance::Squirt, false) => SCORE_REGULAR_GIVE_UP,
    };
    sim.score += bonus;
    debug!(id = id.0, ?cause, bonus, "protester gave up");
}

/// The protester at `idx` picks up a bribe. Regular ones leave; hardcore
/// ones stare at the gold for a while.
pub fn bribe(sim: &mut Simulation, idx: usize, host: &mut dyn Host) {
    let stun = sim.tuning.stun_ticks(sim.level);
    let Some(actor) = sim.registry.get_mut(idx) else { return };
    if !actor.is_active_protester() { return; }
    let hardcore = actor.kind == ActorKind::HardcoreProtester;
    let Some(body) = actor.protester_body_mut() else { return };

    host.play_sound(SoundId::ProtesterFoundGold);
    if hardcore {
        body.rest_ticks = stun;
        sim.score += SCORE_HARDCORE_BRIBE;
    } else {
        body.leaving = true;
        sim.score += SCORE_REGULAR_BRIBE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::terrain::TerrainGrid;
    use crate::sim::testing::{open_sim, RecordingHost};

    /// Protester with no pending rest. At level 12 it acts every tick.
    fn place(sim: &mut Simulation, hardcore: bool, x: i32, y: i32, facing: Direction) -> usize {
        let mut a = Actor::protester(hardcore, x, y, ProtesterBody::new(if hardcore { 20 } else { 5 }, 0, 10));
        a.facing = facing;
        let id = sim.add_actor(a);
        sim.registry.index_of(id).unwrap()
    }

    fn body(sim: &Simulation, idx: usize) -> ProtesterBody {
        sim.registry.get(idx).unwrap().protester_body().unwrap().clone()
    }

    #[test]
    fn resting_protester_only_counts_down() {
        let mut sim = open_sim(0, (10, 10));
        let idx = place(&mut sim, false, 40, 40, Direction::Left);
        sim.registry.get_mut(idx).unwrap().protester_body_mut().unwrap().rest_ticks = 2;
        let mut host = RecordingHost::new();
        assert_eq!(update_protester(&mut sim, idx, &mut host), ProtesterAction::Resting);
        assert_eq!(update_protester(&mut sim, idx, &mut host), ProtesterAction::Resting);
        assert_ne!(update_protester(&mut sim, idx, &mut host), ProtesterAction::Resting);
        assert_eq!(body(&sim, idx).rest_ticks, 3); // re-armed with the level 0 wait
        assert_eq!(update_protester(&mut sim, idx, &mut host), ProtesterAction::Resting);
    }

    #[test]
    fn shout_damages_without_moving() {
        let mut sim = open_sim(12, (23, 40));
        let idx = place(&mut sim, false, 20, 40, Direction::Right);
        let mut host = RecordingHost::new();
        assert_eq!(update_protester(&mut sim, idx, &mut host), ProtesterAction::Shouted);
        let me = sim.registry.get(idx).unwrap();
        assert_eq!((me.x, me.y), (20, 40));
        assert_eq!(sim.player.health, 8);
        assert!(host.played(SoundId::ProtesterYell));
        assert_eq!(body(&sim, idx).shout_cooldown, 15);

        // cooldown running: no second shout
        assert_ne!(update_protester(&mut sim, idx, &mut host), ProtesterAction::Shouted);
        assert_eq!(sim.player.health, 8);
    }

    #[test]
    fn shouting_rests_even_when_the_level_has_no_wait() {
        let mut sim = open_sim(12, (23, 40));
        assert_eq!(sim.tuning.protester_wait(12), 0);
        let idx = place(&mut sim, false, 20, 40, Direction::Right);
        let mut host = RecordingHost::new();
        assert_eq!(update_protester(&mut sim, idx, &mut host), ProtesterAction::Shouted);
        assert_eq!(body(&sim, idx).rest_ticks, 2);
        assert_eq!(update_protester(&mut sim, idx, &mut host), ProtesterAction::Resting);
        assert_eq!(update_protester(&mut sim, idx, &mut host), ProtesterAction::Resting);
        assert_ne!(update_protester(&mut sim, idx, &mut host), ProtesterAction::Resting);
    }

    #[test]
    fn no_shout_with_back_turned() {
        let mut sim = open_sim(12, (23, 40));
        let idx = place(&mut sim, false, 20, 40, Direction::Left);
        let mut host = RecordingHost::new();
        assert_ne!(update_protester(&mut sim, idx, &mut host), ProtesterAction::Shouted);
        assert_eq!(sim.player.health, 10);
    }

    #[test]
    fn line_of_sight_approach() {
        let mut sim = open_sim(12, (40, 40));
        let idx = place(&mut sim, false, 20, 40, Direction::Up);
        let mut host = RecordingHost::new();
        assert_eq!(update_protester(&mut sim, idx, &mut host), ProtesterAction::Approached);
        let me = sim.registry.get(idx).unwrap();
        assert_eq!((me.x, me.y, me.facing), (21, 40, Direction::Right));
    }

    #[test]
    fn hardcore_pursues_along_the_target_field() {
        // L-shaped tunnel: protester can't see the player but can reach them
        let mut t = TerrainGrid::solid();
        for x in 10..=30 { t.carve_under_footprint(x, 10); }
        for y in 10..=30 { t.carve_under_footprint(30, y); }
        let mut sim = Simulation::sandbox(t, 12, 5);
        sim.player.x = 30;
        sim.player.y = 30;
        let idx = place(&mut sim, true, 10, 10, Direction::Left);
        sim.recompute_fields();
        assert_eq!(sim.target_field.distance(10, 10), 40);

        let mut host = RecordingHost::new();
        assert_eq!(update_protester(&mut sim, idx, &mut host), ProtesterAction::Pursued);
        assert_eq!(sim.registry.get(idx).unwrap().x, 11);

        // a regular protester in the same spot only patrols
        let reg = place(&mut sim, false, 10, 10, Direction::Left);
        assert_ne!(update_protester(&mut sim, reg, &mut host), ProtesterAction::Pursued);
    }

    #[test]
    fn leaving_protester_walks_to_exit_and_dies_there() {
        let mut sim = open_sim(12, (10, 10));
        let idx = place(&mut sim, false, 58, 60, Direction::Left);
        sim.registry.get_mut(idx).unwrap().protester_body_mut().unwrap().leaving = true;
        sim.recompute_fields();
        let mut host = RecordingHost::new();
        assert_eq!(update_protester(&mut sim, idx, &mut host), ProtesterAction::StepToExit);
        assert_eq!(update_protester(&mut sim, idx, &mut host), ProtesterAction::StepToExit);
        assert_eq!(update_protester(&mut sim, idx, &mut host), ProtesterAction::Exited);
        assert!(!sim.registry.get(idx).unwrap().alive);
        assert_eq!(update_protester(&mut sim, idx, &mut host), ProtesterAction::Idle);
    }

    #[test]
    fn leaving_with_the_exit_sealed_off_falls_back_to_patrol() {
        let mut t = TerrainGrid::solid();
        for x in 10..=40 { t.carve_under_footprint(x, 10); }
        let mut sim = Simulation::sandbox(t, 12, 9);
        sim.player.x = 60;
        sim.player.y = 60;
        let idx = place(&mut sim, false, 20, 10, Direction::Left);
        {
            let b = sim.registry.get_mut(idx).unwrap().protester_body_mut().unwrap();
            b.leaving = true;
            b.health = 0;
        }
        sim.recompute_fields();
        assert_eq!(sim.exit_field.distance(20, 10), UNREACHED);

        let mut host = RecordingHost::new();
        assert_eq!(update_protester(&mut sim, idx, &mut host), ProtesterAction::Patrolled);
        let me = sim.registry.get(idx).unwrap();
        assert!(me.alive);
        assert_eq!((me.x, me.y), (19, 10));
        assert!(body(&sim, idx).leaving);
    }

    /// Horizontal corridor along y = 10 with a shaft going up from x = 20.
    fn t_junction() -> Simulation {
        let mut t = TerrainGrid::solid();
        for x in 10..=40 { t.carve_under_footprint(x, 10); }
        for y in 10..=30 { t.carve_under_footprint(20, y); }
        let mut sim = Simulation::sandbox(t, 12, 9);
        sim.player.x = 60;
        sim.player.y = 60;
        sim
    }

    #[test]
    fn junction_turn_taken_once_the_cooldown_is_over() {
        let mut sim = t_junction();
        let idx = place(&mut sim, false, 20, 10, Direction::Left);
        let mut host = RecordingHost::new();
        assert_eq!(update_protester(&mut sim, idx, &mut host), ProtesterAction::Patrolled);
        let me = sim.registry.get(idx).unwrap();
        assert_eq!((me.x, me.y, me.facing), (20, 11, Direction::Up));
        let b = body(&sim, idx);
        assert_eq!(b.turn_cooldown, 200);
        assert!((8..=60).contains(&b.steps_remaining));
    }

    #[test]
    fn junction_ignored_while_the_turn_cooldown_runs() {
        let mut sim = t_junction();
        let idx = place(&mut sim, false, 20, 10, Direction::Left);
        sim.registry.get_mut(idx).unwrap().protester_body_mut().unwrap().turn_cooldown = 5;
        let mut host = RecordingHost::new();
        assert_eq!(update_protester(&mut sim, idx, &mut host), ProtesterAction::Patrolled);
        let me = sim.registry.get(idx).unwrap();
        assert_eq!((me.x, me.y, me.facing), (19, 10, Direction::Left));
        let b = body(&sim, idx);
        assert_eq!(b.turn_cooldown, 4);
        assert_eq!(b.steps_remaining, 9);
    }

    #[test]
    fn patrol_in_a_corridor_keeps_going_straight() {
        let mut t = TerrainGrid::solid();
        for x in 10..=40 { t.carve_under_footprint(x, 10); }
        let mut sim = Simulation::sandbox(t, 12, 9);
        sim.player.x = 60;
        sim.player.y = 60;
        let idx = place(&mut sim, false, 20, 10, Direction::Left);
        let mut host = RecordingHost::new();
        for _ in 0..5 {
            assert_eq!(update_protester(&mut sim, idx, &mut host), ProtesterAction::Patrolled);
        }
        assert_eq!(sim.registry.get(idx).unwrap().x, 15);
    }

    #[test]
    fn blocked_patrol_picks_a_new_run() {
        let mut t = TerrainGrid::solid();
        for x in 10..=40 { t.carve_under_footprint(x, 10); }
        let mut sim = Simulation::sandbox(t, 12, 9);
        sim.player.x = 60;
        sim.player.y = 60;
        let idx = place(&mut sim, false, 10, 10, Direction::Left);
        let mut host = RecordingHost::new();
        assert_eq!(update_protester(&mut sim, idx, &mut host), ProtesterAction::Blocked);
        assert_eq!(body(&sim, idx).steps_remaining, 0);
        assert_eq!(update_protester(&mut sim, idx, &mut host), ProtesterAction::Patrolled);
        let me = sim.registry.get(idx).unwrap();
        assert_eq!((me.x, me.facing), (11, Direction::Right));
        let steps = body(&sim, idx).steps_remaining;
        assert!((8..=60).contains(&steps));
    }

    #[test]
    fn squirts_stun_then_defeat() {
        let mut sim = open_sim(0, (10, 10));
        let idx = place(&mut sim, false, 40, 40, Direction::Left);
        let mut host = RecordingHost::new();
        annoy(&mut sim, idx, &mut host, Annoyance::Squirt);
        let b = body(&sim, idx);
        assert_eq!((b.health, b.rest_ticks, b.leaving), (3, 100, false));
        annoy(&mut sim, idx, &mut host, Annoyance::Squirt);
        annoy(&mut sim, idx, &mut host, Annoyance::Squirt);
        let b = body(&sim, idx);
        assert!(b.leaving && b.health <= 0);
        assert_eq!(b.rest_ticks, 0);
        assert_eq!(sim.score, SCORE_REGULAR_GIVE_UP);
        assert_eq!(host.count(SoundId::ProtesterAnnoyed), 2);
        assert_eq!(host.count(SoundId::ProtesterGiveUp), 1);

        // leaving protesters are immune
        annoy(&mut sim, idx, &mut host, Annoyance::Squirt);
        assert_eq!(body(&sim, idx).health, b.health);
        assert_eq!(sim.score, SCORE_REGULAR_GIVE_UP);
    }

    #[test]
    fn boulder_crush_scores_and_sends_home() {
        let mut sim = open_sim(0, (10, 10));
        let idx = place(&mut sim, true, 40, 40, Direction::Left);
        let mut host = RecordingHost::new();
        annoy(&mut sim, idx, &mut host, Annoyance::Boulder);
        assert!(body(&sim, idx).leaving);
        assert_eq!(sim.score, SCORE_CRUSHED);
    }

    #[test]
    fn bribes_differ_by_kind() {
        let mut sim = open_sim(0, (10, 10));
        let reg = place(&mut sim, false, 40, 40, Direction::Left);
        let hard = place(&mut sim, true, 20, 40, Direction::Left);
        let mut host = RecordingHost::new();
        bribe(&mut sim, reg, &mut host);
        bribe(&mut sim, hard, &mut host);
        assert!(body(&sim, reg).leaving);
        let h = body(&sim, hard);
        assert!(!h.leaving);
        assert_eq!(h.rest_ticks, 100);
        assert_eq!(sim.score, SCORE_REGULAR_BRIBE + SCORE_HARDCORE_BRIBE);
        assert_eq!(host.count(SoundId::ProtesterFoundGold), 2);
    }
}
