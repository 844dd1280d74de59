use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;

use crate::models::{AquariumFish, GrowthStage};

pub static BREEDING_COOLDOWN: Lazy<Duration> = Lazy::new(|| Duration::days(3));

pub const MIN_HAPPINESS: f64 = 70.0;
pub const MIN_HUNGER: f64 = 50.0;
/// Hunger each parent pays for breeding.
pub const HUNGER_COST: f64 = 20.0;

pub fn has_cooled_off(fish: &AquariumFish, now: DateTime<Utc>) -> bool {
    fish.last_bred
        .map_or(true, |last_bred| now - last_bred > *BREEDING_COOLDOWN)
}

/// Whether a fish is healthy, grown and rested enough to breed.
pub fn is_ready(fish: &AquariumFish, now: DateTime<Utc>) -> bool {
    fish.growth == GrowthStage::Adult
        && fish.happiness > MIN_HAPPINESS
        && fish.hunger > MIN_HUNGER
        && has_cooled_off(fish, now)
}

/// Index of the first fish that can breed with the fish at `candidate`.
pub fn find_mate(fish: &[AquariumFish], candidate: usize, now: DateTime<Utc>) -> Option<usize> {
    let species = &fish.get(candidate)?.name;

    fish.iter()
        .enumerate()
        .filter(|(index, _)| *index != candidate)
        .find(|(_, mate)| &mate.name == species && is_ready(mate, now))
        .map(|(index, _)| index)
}
