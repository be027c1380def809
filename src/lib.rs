//! Wildmarch - Concurrent Creature Simulation

pub mod core;
pub mod creature;
pub mod engine;
pub mod observers;
pub mod persist;
pub mod spatial;
