pub mod boulder;
pub mod event;
pub mod goodie;
pub mod level;
pub mod player;
pub mod population;
pub mod protester;
pub mod registry;
pub mod squirt;
pub mod status;
pub mod step;
pub mod world;

#[cfg(test)]
pub(crate) mod testing;
