//! hexsupply - hex-grid logistics and war simulation engine
//!
//! Factions move supply trucks across a hex map, upgrade roads with
//! engineers and trade attacks, one round at a time.

pub mod campaign;
pub mod core;
