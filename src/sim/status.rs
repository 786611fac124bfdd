/// Fixed-width status line published once per tick.

use super::world::Simulation;

pub fn status_line(sim: &Simulation) -> String {
    let p = &sim.player;
    format!(
        "Lvl: {:2}  Lives: {:1}  Hlth: {:3}%  Wtr: {:2}  Gld: {:2}  Sonar: {:2}  Oil Left: {:2}  Scr: {:06}",
        sim.level,
        sim.lives,
        p.health_percent(sim.tuning.player_health),
        p.water,
        p.gold,
        p.sonar,
        sim.barrels_left,
        sim.score,
    )
}
