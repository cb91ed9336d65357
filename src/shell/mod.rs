// Composition root for the super calendar.
//
// Responsibilities
// - Read config from environment.
// - Load the seed into the in memory adapters.
// - Spawn the regeneration worker.

pub mod config;
pub mod seed;
pub mod workers;
