pub mod entity;
pub mod pathfind;
pub mod rules;
pub mod spatial;
pub mod terrain;
