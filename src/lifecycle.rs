//! Per-fish part of a catch-up pass.
//!
//! Hunger and happiness decay for every fish first, so growth, breeding and
//! mortality only ever see this pass's stats, whichever fish they look at.
//! Then each fish in turn rolls for growth, breeding and death. The fish list
//! is not reshaped while it is walked: newborns and the dead are collected and
//! merged once every fish has been processed.

use chrono::{DateTime, Utc};
use log::debug;
use rand::Rng;

use crate::{
    breeding,
    catalog::{self, AquariumTypeConfig},
    environment::Conditions,
    maintenance::{GrowthTransition, MaintenanceSummary},
    models::{Aquarium, AquariumFish, GrowthStage},
    mortality,
};

/// Happiness lost per day in ideal conditions
pub const BASE_HAPPY_RATE: f64 = 10.0;
/// Growth chance per day for a perfectly happy fish
pub const GROWTH_BASE: f64 = 0.2;
/// Below this hunger fish lose happiness twice as fast
pub const STARVING: f64 = 30.0;
/// Fish do not grow at or below this hunger
pub const MIN_GROWTH_HUNGER: f64 = 50.0;

pub fn decay_hunger(fish: &mut AquariumFish, conditions: &Conditions) {
    fish.hunger = (fish.hunger - conditions.hunger_decrease).max(0.0);
}

/// Poor water and starvation each double the decay at worst.
pub fn decay_happiness(fish: &mut AquariumFish, conditions: &Conditions) {
    let starvation = if fish.hunger < STARVING { 2.0 } else { 1.0 };
    let decrease =
        BASE_HAPPY_RATE * conditions.elapsed_days * (2.0 - conditions.env_factor) * starvation;

    fish.happiness = (fish.happiness - decrease).max(0.0);
}

/// Roll for growth, advancing at most one stage.
pub fn grow<R: Rng + ?Sized>(
    fish: &mut AquariumFish,
    elapsed_days: f64,
    rng: &mut R,
) -> Option<(GrowthStage, GrowthStage)> {
    let next = fish.growth.next()?;

    if fish.hunger <= MIN_GROWTH_HUNGER {
        return None;
    }

    let chance = GROWTH_BASE * elapsed_days * (fish.happiness / 100.0);
    if !crate::roll(rng, chance) {
        return None;
    }

    let previous = fish.growth;
    fish.growth = next;

    if next == GrowthStage::Adult {
        fish.value = catalog::value_of(fish.base_value, fish.size, fish.rarity);
    }

    Some((previous, next))
}

/// Run every fish through one catch-up pass and record what happened.
pub fn run<R: Rng + ?Sized>(
    aquarium: &mut Aquarium,
    conditions: &Conditions,
    config: &AquariumTypeConfig,
    now: DateTime<Utc>,
    rng: &mut R,
    summary: &mut MaintenanceSummary,
) {
    let days = conditions.elapsed_days;
    let mut newborns = Vec::new();
    let mut dying = Vec::new();

    for fish in &mut aquarium.fish {
        decay_hunger(fish, conditions);
        decay_happiness(fish, conditions);
    }

    for index in 0..aquarium.fish.len() {
        {
            let fish = &mut aquarium.fish[index];

            if let Some((from, to)) = grow(fish, days, rng) {
                debug!("{} grew from {from} into {to}", fish.display_name());
                summary.grew.push(GrowthTransition {
                    fish: fish.display_name().to_string(),
                    from,
                    to,
                });
            }
        }

        // newborns of this pass already take up room
        let has_room = aquarium.fish.len() + newborns.len() < config.capacity;

        if breeding::is_ready(&aquarium.fish[index], now)
            && has_room
            && crate::roll(rng, config.breeding_chance * days)
        {
            if let Some(mate) = breeding::find_mate(&aquarium.fish, index, now) {
                debug!(
                    "{} bred with {}",
                    aquarium.fish[index].display_name(),
                    aquarium.fish[mate].display_name()
                );

                newborns.push(AquariumFish::offspring(&aquarium.fish[index]));

                for parent in [index, mate] {
                    let parent = &mut aquarium.fish[parent];
                    parent.last_bred = Some(now);
                    parent.hunger = (parent.hunger - breeding::HUNGER_COST).max(0.0);
                }
            }
        }

        let fish = &aquarium.fish[index];
        if mortality::should_die(fish.hunger, fish.happiness, days, rng) {
            dying.push(index);
        }
    }

    let mut died = Vec::with_capacity(dying.len());
    for index in dying.into_iter().rev() {
        let fish = aquarium.fish.remove(index);
        debug!("{} died of neglect", fish.display_name());
        died.push(fish.display_name().to_string());
    }
    died.reverse();
    summary.died.extend(died);

    let room = config.capacity.saturating_sub(aquarium.fish.len());
    for child in newborns.into_iter().take(room) {
        debug!("a baby {} was born", child.name);
        summary.born.push(child.name.clone());
        aquarium.fish.push(child);
    }
}
