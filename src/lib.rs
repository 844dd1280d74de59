#![forbid(unsafe_code)]

pub mod breeding;
pub mod care;
pub mod catalog;
pub mod clock;
pub mod environment;
pub mod lifecycle;
pub mod maintenance;
pub mod models;
pub mod mortality;
pub mod session;
pub mod store;
pub mod tank;

use rand::Rng;

pub use maintenance::{apply_maintenance, MaintenanceSummary};
pub use models::{Aquarium, AquariumFish};
pub use store::AquariumStore;

/// Succeeds with probability `chance`. Chances of 1 or more always succeed
/// and chances of 0 or less never touch the rng.
pub(crate) fn roll<R: Rng + ?Sized>(rng: &mut R, chance: f64) -> bool {
    chance > 0.0 && rng.gen::<f64>() < chance
}
