/// Movement rules: truth-table driven.
///
/// Pure functions operating on terrain + boulder occupancy, with no side effects.
/// These encode "what is legal" without performing the action. The player,
/// protesters, squirts and the flood fill all go through `can_step`, so a
/// distance of N in a flood field always means N legal single-cell moves.
///
/// ## Step Truth Table
///
/// ┌───────────────────────────────────┬────────┬──────────┐
/// │ Condition                          │ Walker │ Digger   │
/// ├───────────────────────────────────┼────────┼──────────┤
/// │ Destination anchor off-field       │ DENY   │ DENY     │
/// │ Boulder covers a leading-strip cell│ DENY   │ DENY     │
/// │ Dirt in a leading-strip cell       │ DENY   │ ALLOW    │
/// │ Otherwise                          │ ALLOW  │ ALLOW    │
/// └───────────────────────────────────┴────────┴──────────┘
///
/// Walker = protesters and squirts. Digger = the player, who carves the
/// strip as it moves.
///
/// ### Standable
/// A position is standable for a walker when its whole footprint is inside
/// the field, dirt-free and boulder-free. Between two standable neighbours
/// `can_step` holds in both directions.

use super::entity::Direction;
use super::spatial::BoulderMap;
use super::terrain::{in_field, leading_strip, TerrainGrid, FOOTPRINT};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mover {
    Walker,
    Digger,
}

/// Immutable view of everything that blocks movement.
pub struct MoveView<'a> {
    pub terrain: &'a TerrainGrid,
    pub boulders: &'a BoulderMap,
}

impl<'a> MoveView<'a> {
    /// Can a mover anchored at `(x, y)` advance one cell in `dir`?
    pub fn can_step(&self, x: i32, y: i32, dir: Direction, mover: Mover) -> bool {
        let (nx, ny) = dir.step(x, y);
        if !in_field(nx, ny) { return false; }
        let strip = leading_strip(x, y, dir);
        if strip.iter().any(|&(cx, cy)| self.boulders.occupied(cx, cy)) { return false; }
        if mover == Mover::Walker && strip.iter().any(|&(cx, cy)| self.terrain.is_dirt(cx, cy)) {
            return false;
        }
        true
    }

    /// Can a walker occupy `(x, y)` at all?
    pub fn is_standable(&self, x: i32, y: i32) -> bool {
        if !in_field(x, y) { return false; }
        for dy in 0..FOOTPRINT {
            for dx in 0..FOOTPRINT {
                if self.terrain.is_dirt(x + dx, y + dy) || self.boulders.occupied(x + dx, y + dy) {
                    return false;
                }
            }
        }
        true
    }

    /// Perpendicular directions a walker facing `facing` could take from
    /// `(x, y)`. Non-empty at a T or cross junction.
    pub fn perpendicular_options(&self, x: i32, y: i32, facing: Direction) -> Vec<Direction> {
        facing.perpendicular()
            .into_iter()
            .filter(|&d| self.can_step(x, y, d, Mover::Walker))
            .collect()
    }

    /// Walk from `(x, y)` toward `(tx, ty)` along a shared row or column.
    /// Returns the direction if every intervening step is legal for a walker.
    pub fn clear_line_of_sight(&self, x: i32, y: i32, tx: i32, ty: i32) -> Option<Direction> {
        let dir = if x == tx && y == ty {
            return None;
        } else if x == tx {
            if ty > y { Direction::Up } else { Direction::Down }
        } else if y == ty {
            if tx > x { Direction::Right } else { Direction::Left }
        } else {
            return None;
        };

        let (mut cx, mut cy) = (x, y);
        while (cx, cy) != (tx, ty) {
            if !self.can_step(cx, cy, dir, Mover::Walker) { return None; }
            (cx, cy) = dir.step(cx, cy);
        }
        Some(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::Actor;

    fn view<'a>(t: &'a TerrainGrid, b: &'a BoulderMap) -> MoveView<'a> {
        MoveView { terrain: t, boulders: b }
    }

    // ── can_step ──

    #[test]
    fn open_field_allows_all_inner_moves() {
        let t = TerrainGrid::open();
        let b = BoulderMap::empty();
        let v = view(&t, &b);
        for d in Direction::ALL {
            assert!(v.can_step(30, 30, d, Mover::Walker));
        }
    }

    #[test]
    fn field_edges_deny() {
        let t = TerrainGrid::open();
        let b = BoulderMap::empty();
        let v = view(&t, &b);
        assert!(!v.can_step(0, 10, Direction::Left, Mover::Digger));
        assert!(!v.can_step(60, 10, Direction::Right, Mover::Digger));
        assert!(!v.can_step(10, 0, Direction::Down, Mover::Walker));
        assert!(!v.can_step(10, 60, Direction::Up, Mover::Walker));
    }

    #[test]
    fn dirt_blocks_walkers_not_diggers() {
        let mut t = TerrainGrid::solid();
        t.carve_under_footprint(10, 10);
        let b = BoulderMap::empty();
        let v = view(&t, &b);
        assert!(!v.can_step(10, 10, Direction::Right, Mover::Walker));
        assert!(v.can_step(10, 10, Direction::Right, Mover::Digger));
    }

    #[test]
    fn boulders_block_everyone() {
        let t = TerrainGrid::open();
        let b = BoulderMap::from_actors(&[Actor::boulder(14, 12)]);
        let v = view(&t, &b);
        assert!(!v.can_step(10, 10, Direction::Right, Mover::Walker));
        assert!(!v.can_step(10, 10, Direction::Right, Mover::Digger));
        assert!(v.can_step(10, 10, Direction::Left, Mover::Digger));
        assert!(!v.is_standable(12, 12));
        assert!(v.is_standable(10, 8));
    }

    // ── junctions / line of sight ──

    #[test]
    fn corridor_has_no_perpendicular_exits() {
        let mut t = TerrainGrid::solid();
        for x in 10..=20 { t.carve_under_footprint(x, 10); }
        let b = BoulderMap::empty();
        let v = view(&t, &b);
        assert!(v.perpendicular_options(15, 10, Direction::Right).is_empty());
        t.carve_under_footprint(15, 11);
        let v = view(&t, &b);
        assert_eq!(v.perpendicular_options(15, 10, Direction::Right), vec![Direction::Up]);
    }

    #[test]
    fn line_of_sight_needs_shared_axis_and_clear_path() {
        let mut t = TerrainGrid::solid();
        for x in 10..=30 { t.carve_under_footprint(x, 10); }
        let b = BoulderMap::empty();
        let v = view(&t, &b);
        assert_eq!(v.clear_line_of_sight(10, 10, 30, 10), Some(Direction::Right));
        assert_eq!(v.clear_line_of_sight(30, 10, 10, 10), Some(Direction::Left));
        assert_eq!(v.clear_line_of_sight(10, 10, 30, 11), None);
        assert_eq!(v.clear_line_of_sight(10, 10, 10, 10), None);

        let blocked = BoulderMap::from_actors(&[Actor::boulder(20, 10)]);
        let v = view(&t, &blocked);
        assert_eq!(v.clear_line_of_sight(10, 10, 30, 10), None);
    }
}
