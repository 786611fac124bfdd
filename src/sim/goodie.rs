/// Goodies: barrels, gold, sonar kits, water pools and dropped bribes.
///
/// ┌───────────┬─────────┬──────────────────────┬──────────────────────────────┐
/// │ Kind      │ Starts  │ Collected by         │ Reward                       │
/// ├───────────┼─────────┼──────────────────────┼──────────────────────────────┤
/// │ Barrel    │ hidden  │ player within 3      │ +1000, one less barrel left  │
/// │ Gold      │ hidden  │ player within 3      │ +10, one gold nugget         │
/// │ Sonar     │ visible │ player within 3      │ +75, two sonar charges       │
/// │ WaterPool │ visible │ player within 3      │ +100, five water             │
/// │ Bribe     │ visible │ protester within 3   │ see `protester::bribe`       │
/// └───────────┴─────────┴──────────────────────┴──────────────────────────────┘
///
/// Hidden goodies turn visible once the player comes within 4. Goodies
/// with a lifetime vanish when it runs out.

use tracing::debug;

use crate::domain::entity::{ActorKind, Body};
use crate::domain::spatial::{any_within_radius, first_protester_within, KindFilter};

use super::event::SoundId;
use super::protester::bribe;
use super::world::{Host, Simulation};

pub const SCORE_BARREL: u32 = 1000;
pub const SCORE_GOLD: u32 = 10;
pub const SCORE_SONAR: u32 = 75;
pub const SCORE_WATER: u32 = 100;
pub const SONAR_CHARGES: u32 = 2;
pub const WATER_REFILL: u32 = 5;

pub fn update_goodie(sim: &mut Simulation, idx: usize, host: &mut dyn Host) {
    let Some(actor) = sim.registry.get(idx).filter(|a| a.alive) else { return };
    let (kind, x, y, visible) = (actor.kind, actor.x, actor.y, actor.visible);
    let player_alive = sim.player.alive();

    if kind == ActorKind::Bribe {
        if let Some(p) = first_protester_within(sim.registry.as_slice(), x, y, sim.tuning.pickup_radius) {
            bribe(sim, p, host);
            remove(sim, idx);
            return;
        }
    } else if player_alive {
        if !visible && player_within(sim, x, y, sim.tuning.discover_radius) {
            if let Some(a) = sim.registry.get_mut(idx) {
                a.visible = true;
            }
            return;
        }
        if player_within(sim, x, y, sim.tuning.pickup_radius) {
            collect(sim, kind, host);
            remove(sim, idx);
            return;
        }
    }

    if let Some(a) = sim.registry.get_mut(idx) {
        if let Body::Goodie(g) = &mut a.body {
            if let Some(left) = g.lifetime.as_mut() {
                *left = left.saturating_sub(1);
                if *left == 0 {
                    a.alive = false;
                }
            }
        }
    }
}

fn player_within(sim: &Simulation, x: i32, y: i32, radius: i32) -> bool {
    any_within_radius(sim.registry.as_slice(), &sim.player, x, y, radius, KindFilter::Player)
}

fn collect(sim: &mut Simulation, kind: ActorKind, host: &mut dyn Host) {
    match kind {
        ActorKind::Barrel => {
            sim.score += SCORE_BARREL;
            sim.barrels_left = sim.barrels_left.saturating_sub(1);
            host.play_sound(SoundId::FoundOil);
            debug!(left = sim.barrels_left, "barrel collected");
        }
        ActorKind::Gold => {
            sim.score += SCORE_GOLD;
            sim.player.gold += 1;
            host.play_sound(SoundId::GotGoodie);
        }
        ActorKind::Sonar => {
            sim.score += SCORE_SONAR;
            sim.player.sonar += SONAR_CHARGES;
            host.play_sound(SoundId::GotGoodie);
        }
        ActorKind::WaterPool => {
            sim.score += SCORE_WATER;
            sim.player.water += WATER_REFILL;
            host.play_sound(SoundId::GotGoodie);
        }
        _ => {}
    }
}

fn remove(sim: &mut Simulation, idx: usize) {
    if let Some(a) = sim.registry.get_mut(idx) {
        a.alive = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{Actor, ProtesterBody};
    use crate::sim::testing::{open_sim, RecordingHost};

    #[test]
    fn barrel_is_discovered_then_collected() {
        let mut sim = open_sim(0, (20, 40));
        sim.add_actor(Actor::goodie(ActorKind::Barrel, 24, 40, false, None));
        let mut host = RecordingHost::new();
        update_goodie(&mut sim, 0, &mut host);
        let b = sim.registry.get(0).unwrap();
        assert!(b.visible && b.alive);

        update_goodie(&mut sim, 0, &mut host);
        assert!(sim.registry.get(0).unwrap().alive); // 4 away: seen, not reached

        sim.player.x = 21;
        update_goodie(&mut sim, 0, &mut host);
        assert!(!sim.registry.get(0).unwrap().alive);
        assert_eq!(sim.barrels_left, 0);
        assert_eq!(sim.score, SCORE_BARREL);
        assert!(host.played(SoundId::FoundOil));
    }

    #[test]
    fn pickups_fill_the_inventory() {
        let mut sim = open_sim(0, (20, 40));
        sim.add_actor(Actor::goodie(ActorKind::Gold, 20, 41, true, None));
        sim.add_actor(Actor::goodie(ActorKind::Sonar, 21, 40, true, Some(100)));
        sim.add_actor(Actor::goodie(ActorKind::WaterPool, 22, 40, true, Some(100)));
        let mut host = RecordingHost::new();
        for i in 0..3 {
            update_goodie(&mut sim, i, &mut host);
        }
        assert_eq!(sim.player.gold, 1);
        assert_eq!(sim.player.sonar, 3);
        assert_eq!(sim.player.water, 10);
        assert_eq!(sim.score, SCORE_GOLD + SCORE_SONAR + SCORE_WATER);
        assert_eq!(host.count(SoundId::GotGoodie), 3);
    }

    #[test]
    fn lifetime_runs_out() {
        let mut sim = open_sim(0, (0, 0));
        sim.add_actor(Actor::goodie(ActorKind::WaterPool, 40, 40, true, Some(3)));
        let mut host = RecordingHost::new();
        update_goodie(&mut sim, 0, &mut host);
        update_goodie(&mut sim, 0, &mut host);
        assert!(sim.registry.get(0).unwrap().alive);
        update_goodie(&mut sim, 0, &mut host);
        assert!(!sim.registry.get(0).unwrap().alive);
    }

    #[test]
    fn bribe_goes_to_the_first_protester_only() {
        let mut sim = open_sim(0, (20, 40));
        sim.add_actor(Actor::protester(false, 41, 40, ProtesterBody::new(5, 0, 10)));
        sim.add_actor(Actor::protester(false, 40, 41, ProtesterBody::new(5, 0, 10)));
        sim.add_actor(Actor::goodie(ActorKind::Bribe, 40, 40, true, Some(100)));
        let mut host = RecordingHost::new();
        update_goodie(&mut sim, 2, &mut host);
        let leaving = |i: usize| sim.registry.get(i).unwrap().protester_body().unwrap().leaving;
        assert!(leaving(0));
        assert!(!leaving(1));
        assert!(!sim.registry.get(2).unwrap().alive);
    }

    #[test]
    fn player_ignores_bribes() {
        let mut sim = open_sim(0, (40, 40));
        sim.add_actor(Actor::goodie(ActorKind::Bribe, 40, 40, true, Some(100)));
        let mut host = RecordingHost::new();
        update_goodie(&mut sim, 0, &mut host);
        assert!(sim.registry.get(0).unwrap().alive);
        assert!(host.sounds.is_empty());
    }
}
