/// Spatial queries over the live actor list: pure lookups, no effects.
///
/// ## Architecture
///
/// Two distinct concepts, mirroring the terrain layer:
///   1. PROXIMITY: who is within a Euclidean radius of a point
///   2. OCCUPANCY: whose 4×4 footprint covers a cell
///
/// Callers that need "find it and act on it" take the indices returned
/// here and apply the effect themselves (see `sim::protester::annoy`),
/// so every query stays side-effect free.
///
/// Dead actors are skipped by every query, even before they are purged.

use super::entity::{Actor, ActorKind, Direction, Player};
use super::terrain::{leading_strip, FOOTPRINT, VIEW_SIZE};

/// Which actors a proximity query considers.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum KindFilter {
    /// Any live actor in the registry.
    Any,
    Boulder,
    /// Only the player's own position.
    Player,
    /// Live protesters that are not leaving.
    Protester,
}

/// Inclusive Euclidean distance test on anchors, done on squared values.
#[inline]
pub fn within_radius(ax: i32, ay: i32, bx: i32, by: i32, radius: i32) -> bool {
    let dx = ax - bx;
    let dy = ay - by;
    dx * dx + dy * dy <= radius * radius
}

fn matches(actor: &Actor, filter: KindFilter) -> bool {
    if !actor.alive { return false; }
    match filter {
        KindFilter::Any => true,
        KindFilter::Boulder => actor.kind == ActorKind::Boulder,
        KindFilter::Protester => actor.is_active_protester(),
        KindFilter::Player => false,
    }
}

/// Is anything matching `filter` within `radius` of `(x, y)`?
pub fn any_within_radius(
    actors: &[Actor],
    player: &Player,
    x: i32,
    y: i32,
    radius: i32,
    filter: KindFilter,
) -> bool {
    if filter == KindFilter::Player {
        return within_radius(player.x, player.y, x, y, radius);
    }
    actors.iter().any(|a| matches(a, filter) && within_radius(a.x, a.y, x, y, radius))
}

/// Indices of active protesters within `radius` of `(x, y)`, in registration order.
pub fn protesters_within(actors: &[Actor], x: i32, y: i32, radius: i32) -> Vec<usize> {
    actors.iter()
        .enumerate()
        .filter(|(_, a)| matches(a, KindFilter::Protester) && within_radius(a.x, a.y, x, y, radius))
        .map(|(i, _)| i)
        .collect()
}

/// First active protester within `radius` of `(x, y)`.
pub fn first_protester_within(actors: &[Actor], x: i32, y: i32, radius: i32) -> Option<usize> {
    actors.iter()
        .position(|a| matches(a, KindFilter::Protester) && within_radius(a.x, a.y, x, y, radius))
}

/// Does the footprint anchored at `(ax, ay)` cover cell `(cx, cy)`?
#[inline]
pub fn footprint_covers(ax: i32, ay: i32, cx: i32, cy: i32) -> bool {
    cx >= ax && cx < ax + FOOTPRINT && cy >= ay && cy < ay + FOOTPRINT
}

/// Is `(cx, cy)` under any live boulder?
pub fn is_boulder_occupying(actors: &[Actor], cx: i32, cy: i32) -> bool {
    actors.iter().any(|a| {
        a.alive && a.kind == ActorKind::Boulder && footprint_covers(a.x, a.y, cx, cy)
    })
}

/// Does the player's footprint cover any cell of the leading strip?
pub fn player_in_strip(player: &Player, x: i32, y: i32, dir: Direction) -> bool {
    leading_strip(x, y, dir).iter().any(|&(cx, cy)| footprint_covers(player.x, player.y, cx, cy))
}

/// Live protesters, leaving ones included, whose footprint covers a cell
/// of the leading strip.
pub fn protesters_in_strip(actors: &[Actor], x: i32, y: i32, dir: Direction) -> Vec<usize> {
    let strip = leading_strip(x, y, dir);
    actors.iter()
        .enumerate()
        .filter(|(_, a)| a.alive && a.kind.is_protester())
        .filter(|(_, a)| strip.iter().any(|&(cx, cy)| footprint_covers(a.x, a.y, cx, cy)))
        .map(|(i, _)| i)
        .collect()
}

// ══════════════════════════════════════════════════════════════
// Boulder occupancy grid (O(1) lookup)
// ══════════════════════════════════════════════════════════════

/// Snapshot of the cells covered by live boulders.
///
/// Built once per use site (the flood fill, a protester's turn) instead of
/// scanning the actor list for every probed cell.
#[derive(Clone, Debug)]
pub struct BoulderMap {
    cells: Vec<bool>,
}

impl BoulderMap {
    pub fn from_actors(actors: &[Actor]) -> Self {
        let mut cells = vec![false; (VIEW_SIZE * VIEW_SIZE) as usize];
        for a in actors.iter().filter(|a| a.alive && a.kind == ActorKind::Boulder) {
            for dy in 0..FOOTPRINT {
                for dx in 0..FOOTPRINT {
                    let (cx, cy) = (a.x + dx, a.y + dy);
                    if (0..VIEW_SIZE).contains(&cx) && (0..VIEW_SIZE).contains(&cy) {
                        cells[(cy * VIEW_SIZE + cx) as usize] = true;
                    }
                }
            }
        }
        BoulderMap { cells }
    }

    pub fn empty() -> Self {
        BoulderMap { cells: vec![false; (VIEW_SIZE * VIEW_SIZE) as usize] }
    }

    /// Out of range = no boulder.
    #[inline]
    pub fn occupied(&self, cx: i32, cy: i32) -> bool {
        if (0..VIEW_SIZE).contains(&cx) && (0..VIEW_SIZE).contains(&cy) {
            self.cells[(cy * VIEW_SIZE + cx) as usize]
        } else {
            false
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tuning;
    use crate::domain::entity::ProtesterBody;

    fn protester_at(x: i32, y: i32) -> Actor {
        Actor::protester(false, x, y, ProtesterBody::new(5, 0, 10))
    }

    fn player_at(x: i32, y: i32) -> Player {
        let mut p = Player::new(&Tuning::default());
        p.x = x;
        p.y = y;
        p
    }

    #[test]
    fn radius_is_inclusive_euclidean() {
        assert!(within_radius(0, 0, 3, 0, 3));
        assert!(!within_radius(0, 0, 3, 1, 3));
        assert!(within_radius(0, 0, 2, 2, 3)); // sqrt(8) < 3
        assert!(!within_radius(0, 0, 3, 3, 4)); // sqrt(18) > 4
    }

    #[test]
    fn player_filter_uses_player_position() {
        let actors = vec![Actor::boulder(0, 0)];
        let p = player_at(40, 40);
        assert!(any_within_radius(&actors, &p, 42, 41, 3, KindFilter::Player));
        assert!(!any_within_radius(&actors, &p, 0, 0, 3, KindFilter::Player));
        assert!(any_within_radius(&actors, &p, 0, 0, 3, KindFilter::Boulder));
        assert!(any_within_radius(&actors, &p, 0, 0, 3, KindFilter::Any));
        assert!(!any_within_radius(&actors, &p, 0, 0, 3, KindFilter::Protester));
    }

    #[test]
    fn dead_actors_are_invisible_to_queries() {
        let mut b = Actor::boulder(10, 10);
        b.alive = false;
        let mut pr = protester_at(10, 10);
        pr.alive = false;
        let actors = vec![b, pr];
        let p = player_at(0, 60);
        assert!(!any_within_radius(&actors, &p, 10, 10, 1, KindFilter::Any));
        assert!(!is_boulder_occupying(&actors, 11, 11));
        assert!(protesters_within(&actors, 10, 10, 3).is_empty());
        assert!(!BoulderMap::from_actors(&actors).occupied(11, 11));
    }

    #[test]
    fn leaving_protesters_are_not_targets() {
        let mut leaving = protester_at(5, 5);
        leaving.protester_body_mut().unwrap().leaving = true;
        let actors = vec![leaving, protester_at(6, 5), protester_at(30, 30)];
        assert_eq!(protesters_within(&actors, 5, 5, 3), vec![1]);
        assert_eq!(first_protester_within(&actors, 5, 5, 3), Some(1));
        assert_eq!(first_protester_within(&actors, 50, 50, 3), None);
    }

    #[test]
    fn boulder_occupancy_covers_footprint_only() {
        let actors = vec![Actor::boulder(10, 20)];
        assert!(is_boulder_occupying(&actors, 10, 20));
        assert!(is_boulder_occupying(&actors, 13, 23));
        assert!(!is_boulder_occupying(&actors, 14, 20));
        assert!(!is_boulder_occupying(&actors, 10, 19));
        let map = BoulderMap::from_actors(&actors);
        assert!(map.occupied(13, 23));
        assert!(!map.occupied(14, 23));
        assert!(!map.occupied(-1, 20));
        assert!(!BoulderMap::empty().occupied(10, 20));
    }

    #[test]
    fn strip_occupancy() {
        let p = player_at(12, 16);
        // boulder at (10, 20): strip below is row 19, x 10..14
        assert!(player_in_strip(&p, 10, 20, Direction::Down));
        let far = player_at(14, 16);
        assert!(!player_in_strip(&far, 10, 20, Direction::Down));
        let mut leaving = protester_at(12, 16);
        leaving.protester_body_mut().unwrap().leaving = true;
        let actors = vec![protester_at(7, 16), protester_at(20, 16), leaving];
        assert_eq!(protesters_in_strip(&actors, 10, 20, Direction::Down), vec![0, 2]);
    }
}
