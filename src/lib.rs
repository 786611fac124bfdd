//! Tick-based simulation of a destructible dig field: a player who digs,
//! boulders that fall, protesters that patrol, chase and leave, and the
//! goodies scattered through the dirt.
//!
//! The host drives the game by calling [`sim::step::step`] once per tick
//! with something that implements [`sim::world::Host`].

pub mod config;
pub mod domain;
pub mod sim;
