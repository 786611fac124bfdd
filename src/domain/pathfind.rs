/// Protester navigation: breadth-first distance fields over anchor cells.
///
/// Two fields are rebuilt from scratch every tick:
///   1. **Exit field**: rooted at the exit; drives leaving protesters.
///   2. **Target field**: rooted at the player; drives hardcore pursuit.
///
/// Expansion uses the walker rule from `rules::MoveView::can_step`, so
/// `distance(c)` is exactly the number of single-cell walker moves from
/// `c` to the root. A full rebuild is cheap (61×61 cells) and always
/// matches the terrain and boulders at the moment it runs.
///
/// Any position a field cannot answer for (unreached, off-field, or a
/// stale value after later digging) yields `None`; callers fall back to
/// their patrol behavior.

use std::collections::VecDeque;

use super::entity::Direction;
use super::rules::{MoveView, Mover};
use super::terrain::{in_field, FIELD_SIZE};

pub const UNREACHED: i32 = -1;

#[derive(Clone, Debug)]
pub struct DistanceField {
    /// `dist[y * FIELD_SIZE + x]`, `UNREACHED` when no path exists.
    dist: Vec<i32>,
}

impl DistanceField {
    pub fn new() -> Self {
        DistanceField { dist: vec![UNREACHED; FIELD_SIZE * FIELD_SIZE] }
    }

    #[inline]
    fn index(x: i32, y: i32) -> Option<usize> {
        if in_field(x, y) { Some(y as usize * FIELD_SIZE + x as usize) } else { None }
    }

    /// Distance from `(x, y)` to the root, `UNREACHED` if none or off-field.
    #[inline]
    pub fn distance(&self, x: i32, y: i32) -> i32 {
        Self::index(x, y).map_or(UNREACHED, |i| self.dist[i])
    }

    /// Rebuild the whole field rooted at `root`.
    pub fn recompute(&mut self, root: (i32, i32), view: &MoveView) {
        self.dist.fill(UNREACHED);

        let Some(root_idx) = Self::index(root.0, root.1) else { return };
        self.dist[root_idx] = 0;

        let mut queue: VecDeque<(i32, i32)> = VecDeque::with_capacity(FIELD_SIZE * 4);
        queue.push_back(root);

        while let Some((cx, cy)) = queue.pop_front() {
            let here = self.dist[cy as usize * FIELD_SIZE + cx as usize];
            for dir in Direction::ALL {
                let (nx, ny) = dir.step(cx, cy);
                let Some(ni) = Self::index(nx, ny) else { continue };
                if self.dist[ni] != UNREACHED { continue; }
                // A walker at (nx, ny) must be able to stand there and step back toward us.
                if !view.is_standable(nx, ny) { continue; }
                if !view.can_step(nx, ny, dir.opposite(), Mover::Walker) { continue; }
                self.dist[ni] = here + 1;
                queue.push_back((nx, ny));
            }
        }
    }

    /// Pick the next move from `(x, y)` toward the root.
    ///
    /// The four neighbours are ranked by ascending distance; the first one
    /// that is strictly closer and legally reachable wins.
    pub fn next_step(&self, x: i32, y: i32, view: &MoveView) -> Option<Direction> {
        let here = self.distance(x, y);
        if here == UNREACHED || here == 0 { return None; }

        let mut ranked: Vec<(i32, Direction)> = Direction::ALL
            .iter()
            .filter_map(|&d| {
                let (nx, ny) = d.step(x, y);
                let nd = self.distance(nx, ny);
                (nd != UNREACHED).then_some((nd, d))
            })
            .collect();
        ranked.sort_by_key(|&(nd, _)| nd);

        ranked.into_iter()
            .find(|&(nd, d)| nd < here && view.can_step(x, y, d, Mover::Walker))
            .map(|(_, d)| d)
    }
}

impl Default for DistanceField {
    fn default() -> Self {
        DistanceField::new()
    }
}
