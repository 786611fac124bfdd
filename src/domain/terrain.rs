/// TerrainGrid: the destructible dirt layer.
///
/// ## Coordinates
///
/// `(x, y)` with `y` growing upward; `y = 0` is the bottom of the field.
/// Actor anchors live in `0..=MAX_COORD`; every actor covers a 4×4
/// footprint `x..x+4, y..y+4`, so the cell table is `VIEW_SIZE` wide to
/// hold the footprint of an actor anchored at the far edge.
///
/// ## Layout at level start
///
///   - rows `0..=DIRT_TOP` are dirt, the rows above are open sky
///   - the entry shaft (`SHAFT_LEFT..=SHAFT_RIGHT`, `SHAFT_BOTTOM..=DIRT_TOP`)
///     is open from creation
///
/// Dirt is only ever removed. All queries tolerate out-of-range cells and
/// report them as clear.

use super::entity::Direction;

/// Side of the cell table (anchors + footprint overhang).
pub const VIEW_SIZE: i32 = 64;
/// Largest legal anchor coordinate on either axis.
pub const MAX_COORD: i32 = 60;
/// Number of legal anchor positions per axis.
pub const FIELD_SIZE: usize = (MAX_COORD + 1) as usize;
/// Side of an actor footprint.
pub const FOOTPRINT: i32 = 4;
/// Topmost dirt row.
pub const DIRT_TOP: i32 = 59;
pub const SHAFT_LEFT: i32 = 30;
pub const SHAFT_RIGHT: i32 = 33;
pub const SHAFT_BOTTOM: i32 = 4;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerrainGrid {
    /// `dirt[y * VIEW_SIZE + x]`
    dirt: Vec<bool>,
}

impl TerrainGrid {
    /// A fresh level: dirt everywhere below the sky except the entry shaft.
    pub fn new() -> Self {
        let mut grid = TerrainGrid { dirt: vec![false; (VIEW_SIZE * VIEW_SIZE) as usize] };
        for y in 0..=DIRT_TOP {
            for x in 0..VIEW_SIZE {
                let in_shaft = (SHAFT_LEFT..=SHAFT_RIGHT).contains(&x) && y >= SHAFT_BOTTOM;
                if !in_shaft {
                    grid.dirt[(y * VIEW_SIZE + x) as usize] = true;
                }
            }
        }
        grid
    }

    /// No dirt at all. Handy for tests and sandbox levels.
    pub fn open() -> Self {
        TerrainGrid { dirt: vec![false; (VIEW_SIZE * VIEW_SIZE) as usize] }
    }

    /// Dirt everywhere in rows `0..=DIRT_TOP`, no shaft.
    pub fn solid() -> Self {
        let mut grid = Self::open();
        for y in 0..=DIRT_TOP {
            for x in 0..VIEW_SIZE {
                grid.dirt[(y * VIEW_SIZE + x) as usize] = true;
            }
        }
        grid
    }

    #[inline]
    fn index(x: i32, y: i32) -> Option<usize> {
        if (0..VIEW_SIZE).contains(&x) && (0..VIEW_SIZE).contains(&y) {
            Some((y * VIEW_SIZE + x) as usize)
        } else {
            None
        }
    }

    /// Is there dirt at `(x, y)`? Out of range = clear.
    #[inline]
    pub fn is_dirt(&self, x: i32, y: i32) -> bool {
        Self::index(x, y).map_or(false, |i| self.dirt[i])
    }

    /// Remove dirt at one cell. Returns true if it was there.
    #[inline]
    fn clear_cell(&mut self, x: i32, y: i32) -> bool {
        match Self::index(x, y) {
            Some(i) if self.dirt[i] => {
                self.dirt[i] = false;
                true
            }
            _ => false,
        }
    }

    /// Clear every dirt cell under the 4×4 footprint anchored at `(x, y)`.
    /// Returns true iff at least one cell changed.
    pub fn carve_under_footprint(&mut self, x: i32, y: i32) -> bool {
        let mut changed = false;
        for dy in 0..FOOTPRINT {
            for dx in 0..FOOTPRINT {
                changed |= self.clear_cell(x + dx, y + dy);
            }
        }
        changed
    }

    /// Clear the strip of cells immediately beyond the footprint at `(x, y)`
    /// in `dir` (the cells the leading edge enters on a one-cell move).
    pub fn carve_in_direction(&mut self, x: i32, y: i32, dir: Direction) -> bool {
        let mut changed = false;
        for (cx, cy) in leading_strip(x, y, dir) {
            changed |= self.clear_cell(cx, cy);
        }
        changed
    }

    /// Does any cell of the leading strip in `dir` still hold dirt?
    pub fn has_dirt_adjacent(&self, x: i32, y: i32, dir: Direction) -> bool {
        leading_strip(x, y, dir).into_iter().any(|(cx, cy)| self.is_dirt(cx, cy))
    }

    /// Is the whole footprint at `(x, y)` free of dirt?
    pub fn is_footprint_clear(&self, x: i32, y: i32) -> bool {
        (0..FOOTPRINT).all(|dy| (0..FOOTPRINT).all(|dx| !self.is_dirt(x + dx, y + dy)))
    }

    /// Number of dirt cells left.
    pub fn dirt_count(&self) -> usize {
        self.dirt.iter().filter(|d| **d).count()
    }
}

impl Default for TerrainGrid {
    fn default() -> Self {
        TerrainGrid::new()
    }
}

/// The four cells a 4×4 footprint at `(x, y)` would enter moving one cell
/// in `dir`.
pub fn leading_strip(x: i32, y: i32, dir: Direction) -> [(i32, i32); 4] {
    let mut cells = [(0, 0); 4];
    for (i, cell) in cells.iter_mut().enumerate() {
        let i = i as i32;
        *cell = match dir {
            Direction::Up => (x + i, y + FOOTPRINT),
            Direction::Down => (x + i, y - 1),
            Direction::Left => (x - 1, y + i),
            Direction::Right => (x + FOOTPRINT, y + i),
        };
    }
    cells
}

/// Is `(x, y)` a legal actor anchor?
#[inline]
pub fn in_field(x: i32, y: i32) -> bool {
    (0..=MAX_COORD).contains(&x) && (0..=MAX_COORD).contains(&y)
}
