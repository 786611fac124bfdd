/// Values crossing the boundary between the simulation and its host:
/// keys in, sounds and tick status out.

/// Last key the host saw. Consumed once per player update.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Fire,
    DropBribe,
    UseSonar,
    GiveUp,
}

/// Named sound clips. Playback is fire-and-forget on the host side.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum SoundId {
    Dig,
    FallingRock,
    PlayerSquirt,
    PlayerGiveUp,
    PlayerAnnoyed,
    ProtesterYell,
    ProtesterAnnoyed,
    ProtesterGiveUp,
    ProtesterFoundGold,
    FoundOil,
    GotGoodie,
    Sonar,
    FinishedLevel,
}

/// Outcome of one tick, interpreted by the surrounding game-state machine.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TickStatus {
    Continue,
    PlayerDied,
    LevelComplete,
}
