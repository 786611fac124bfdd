/// Entities: the Player plus one Actor record for everything else.
///
/// Actors share position, facing, alive and visible flags and a kind tag.
/// Per-kind state lives in `Body`; per-kind behavior lives in `sim::*`
/// and is dispatched on the kind, not through an inheritance chain.

use crate::config::Tuning;

/// Anchor of the player at level start.
pub const PLAYER_START: (i32, i32) = (30, 60);
/// The single exit cell protesters spawn at and leave through.
pub const EXIT_CELL: (i32, i32) = (60, 60);
/// Where sonar kits appear.
pub const SONAR_SPAWN: (i32, i32) = (0, 60);

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Unit step. `Up` is `+y`.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn perpendicular(self) -> [Direction; 2] {
        match self {
            Direction::Up | Direction::Down => [Direction::Left, Direction::Right],
            Direction::Left | Direction::Right => [Direction::Up, Direction::Down],
        }
    }

    /// Position one step from `(x, y)`.
    pub fn step(self, x: i32, y: i32) -> (i32, i32) {
        let (dx, dy) = self.delta();
        (x + dx, y + dy)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum ActorKind {
    Player,
    Boulder,
    RegularProtester,
    HardcoreProtester,
    Squirt,
    Barrel,
    Gold,
    Sonar,
    WaterPool,
    Bribe,
}

impl ActorKind {
    pub fn is_protester(self) -> bool {
        matches!(self, ActorKind::RegularProtester | ActorKind::HardcoreProtester)
    }

    pub fn is_goodie(self) -> bool {
        matches!(
            self,
            ActorKind::Barrel | ActorKind::Gold | ActorKind::Sonar | ActorKind::WaterPool | ActorKind::Bribe
        )
    }

    /// Sprite name handed to the drawing collaborator.
    pub fn sprite_id(self) -> &'static str {
        match self {
            ActorKind::Player => "player",
            ActorKind::Boulder => "boulder",
            ActorKind::RegularProtester => "protester",
            ActorKind::HardcoreProtester => "hardcore_protester",
            ActorKind::Squirt => "water_spurt",
            ActorKind::Barrel => "barrel",
            ActorKind::Gold | ActorKind::Bribe => "gold",
            ActorKind::Sonar => "sonar",
            ActorKind::WaterPool => "water_pool",
        }
    }
}

/// Stable handle for an actor. Never reused within a simulation.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub struct ActorId(pub u32);

// ── Boulder ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BoulderState {
    Stable,
    Dislodged,
    Falling,
}

#[derive(Clone, Debug)]
pub struct BoulderBody {
    pub state: BoulderState,
    /// Ticks left in `Dislodged`.
    pub countdown: u32,
}

// ── Protester ──

#[derive(Clone, Debug)]
pub struct ProtesterBody {
    pub health: i32,
    pub leaving: bool,
    pub rest_ticks: u32,
    pub shout_cooldown: u32,
    pub steps_remaining: i32,
    pub turn_cooldown: u32,
}

impl ProtesterBody {
    pub fn new(health: i32, rest_ticks: u32, steps: i32) -> Self {
        ProtesterBody {
            health,
            leaving: false,
            rest_ticks,
            shout_cooldown: 0,
            steps_remaining: steps,
            turn_cooldown: 0,
        }
    }
}

// ── Squirt / goodies ──

#[derive(Clone, Debug)]
pub struct SquirtBody {
    pub travelled: u32,
}

#[derive(Clone, Debug)]
pub struct GoodieBody {
    /// `None` = stays until picked up.
    pub lifetime: Option<u32>,
}

#[derive(Clone, Debug)]
pub enum Body {
    Boulder(BoulderBody),
    Protester(ProtesterBody),
    Squirt(SquirtBody),
    Goodie(GoodieBody),
}

#[derive(Clone, Debug)]
pub struct Actor {
    pub id: ActorId,
    pub kind: ActorKind,
    pub x: i32,
    pub y: i32,
    pub facing: Direction,
    pub alive: bool,
    pub visible: bool,
    pub body: Body,
}

impl Actor {
    pub fn boulder(x: i32, y: i32) -> Self {
        Actor::with_body(
            ActorKind::Boulder, x, y, Direction::Down, true,
            Body::Boulder(BoulderBody { state: BoulderState::Stable, countdown: 0 }),
        )
    }

    pub fn protester(hardcore: bool, x: i32, y: i32, body: ProtesterBody) -> Self {
        let kind = if hardcore { ActorKind::HardcoreProtester } else { ActorKind::RegularProtester };
        Actor::with_body(kind, x, y, Direction::Left, true, Body::Protester(body))
    }

    pub fn squirt(x: i32, y: i32, facing: Direction) -> Self {
        Actor::with_body(ActorKind::Squirt, x, y, facing, true, Body::Squirt(SquirtBody { travelled: 0 }))
    }

    /// Goodies start hidden only when they must be discovered (barrels, level gold).
    pub fn goodie(kind: ActorKind, x: i32, y: i32, visible: bool, lifetime: Option<u32>) -> Self {
        Actor::with_body(kind, x, y, Direction::Right, visible, Body::Goodie(GoodieBody { lifetime }))
    }

    fn with_body(kind: ActorKind, x: i32, y: i32, facing: Direction, visible: bool, body: Body) -> Self {
        Actor { id: ActorId(0), kind, x, y, facing, alive: true, visible, body }
    }

    pub fn protester_body(&self) -> Option<&ProtesterBody> {
        match &self.body {
            Body::Protester(p) => Some(p),
            _ => None,
        }
    }

    pub fn protester_body_mut(&mut self) -> Option<&mut ProtesterBody> {
        match &mut self.body {
            Body::Protester(p) => Some(p),
            _ => None,
        }
    }

    pub fn boulder_body(&self) -> Option<&BoulderBody> {
        match &self.body {
            Body::Boulder(b) => Some(b),
            _ => None,
        }
    }

    pub fn boulder_body_mut(&mut self) -> Option<&mut BoulderBody> {
        match &mut self.body {
            Body::Boulder(b) => Some(b),
            _ => None,
        }
    }

    /// Live, not-leaving protester: the only kind that can be hit or bribed.
    pub fn is_active_protester(&self) -> bool {
        self.alive && self.protester_body().map_or(false, |p| !p.leaving)
    }
}

// ── Player ──

#[derive(Clone, Debug)]
pub struct Player {
    pub x: i32,
    pub y: i32,
    pub facing: Direction,
    pub health: i32,
    pub water: u32,
    pub sonar: u32,
    pub gold: u32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Player {
            x: PLAYER_START.0,
            y: PLAYER_START.1,
            facing: Direction::Right,
            health: tuning.player_health,
            water: tuning.player_water,
            sonar: tuning.player_sonar,
            gold: 0,
        }
    }

    pub fn alive(&self) -> bool {
        self.health > 0
    }

    /// Health as shown on the status line.
    pub fn health_percent(&self, max_health: i32) -> i32 {
        if max_health <= 0 { return 0; }
        (self.health.max(0) * 100) / max_health
    }
}
