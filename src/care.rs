//! Things players do to their aquarium.
//!
//! Positions are 1-based, the way they are shown in chat.

use crate::{
    catalog,
    models::{clamp_stat, Aquarium, AquariumFish, InventoryFish, MAX_STAT},
};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    #[error("your aquarium is full ({capacity} fish)")]
    AquariumFull { capacity: usize },

    #[error("there is no fish #{0} in your aquarium")]
    NoSuchFish(usize),

    #[error("there is no decoration called {0:?}")]
    UnknownDecoration(String),

    #[error("your aquarium already has a {0}")]
    AlreadyDecorated(&'static str),
}

fn index_of(aquarium: &Aquarium, position: usize) -> Result<usize, Error> {
    position
        .checked_sub(1)
        .filter(|index| *index < aquarium.fish.len())
        .ok_or(Error::NoSuchFish(position))
}

/// Move a fish from the inventory into the aquarium.
pub fn stock(aquarium: &mut Aquarium, fish: InventoryFish) -> Result<&AquariumFish, Error> {
    if aquarium.is_full() {
        return Err(Error::AquariumFull {
            capacity: aquarium.capacity,
        });
    }

    aquarium.fish.push(AquariumFish::stocked(fish));
    Ok(&aquarium.fish[aquarium.fish.len() - 1])
}

/// Take a fish out of the aquarium and hand it back to the inventory.
pub fn release(aquarium: &mut Aquarium, position: usize) -> Result<InventoryFish, Error> {
    let index = index_of(aquarium, position)?;

    Ok(aquarium.fish.remove(index).into())
}

/// Fill every fish up. Returns how many fish were fed.
pub fn feed(aquarium: &mut Aquarium) -> usize {
    for fish in &mut aquarium.fish {
        fish.hunger = MAX_STAT;
    }

    aquarium.fish.len()
}

pub fn clean(aquarium: &mut Aquarium) {
    aquarium.water_quality = MAX_STAT;
}

pub fn heat(aquarium: &mut Aquarium) {
    aquarium.temperature = MAX_STAT;
}

/// Place a decoration, cheering up every fish currently in the aquarium.
pub fn decorate(aquarium: &mut Aquarium, key: &str) -> Result<&'static str, Error> {
    let decoration =
        catalog::decoration(key).ok_or_else(|| Error::UnknownDecoration(key.to_string()))?;

    if !aquarium.decorations.insert(key.to_string()) {
        return Err(Error::AlreadyDecorated(decoration.name));
    }

    for fish in &mut aquarium.fish {
        fish.happiness = clamp_stat(fish.happiness + decoration.happiness_bonus);
    }

    Ok(decoration.name)
}

/// Give a fish a name. An empty name removes it.
pub fn rename<'a>(
    aquarium: &'a mut Aquarium,
    position: usize,
    name: &str,
) -> Result<&'a AquariumFish, Error> {
    let index = index_of(aquarium, position)?;
    let fish = &mut aquarium.fish[index];
    let name = name.trim();

    fish.custom_name = if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    };

    Ok(fish)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use test_case::test_case;

    use super::*;
    use crate::{
        catalog::AquariumTypeConfig,
        models::{GrowthStage, Rarity, Size},
    };

    fn aquarium(capacity: usize, fish: usize) -> Aquarium {
        let config = AquariumTypeConfig {
            key: "test_tank",
            name: "Test Tank",
            capacity,
            maintenance_rate: 1.0,
            breeding_chance: 0.05,
        };
        let mut aquarium = Aquarium::new("owner", "main", &config, Utc::now());

        for _ in 0..fish {
            stock(&mut aquarium, inventory_fish()).unwrap();
        }

        aquarium
    }

    fn inventory_fish() -> InventoryFish {
        InventoryFish {
            name: "🐠".to_string(),
            rarity: Rarity::Common,
            size: Size::Small,
            base_value: 30.0,
            value: 24.0,
        }
    }

    #[test]
    fn stocked_fish_enter_as_content_adults() {
        let mut aquarium = aquarium(3, 0);

        let fish = stock(&mut aquarium, inventory_fish()).unwrap();

        assert_eq!(fish.growth, GrowthStage::Adult);
        assert_eq!(fish.hunger, 100.0);
        assert_eq!(fish.happiness, 80.0);
        assert_eq!(fish.value, 24.0);
    }

    #[test]
    fn cannot_stock_a_full_aquarium() {
        let mut aquarium = aquarium(2, 2);

        assert_eq!(
            stock(&mut aquarium, inventory_fish()).unwrap_err(),
            Error::AquariumFull { capacity: 2 }
        );
        assert_eq!(aquarium.fish.len(), 2);
    }

    #[test]
    fn released_fish_returns_to_the_inventory() {
        let mut aquarium = aquarium(3, 2);
        aquarium.fish[1].name = "🐡".to_string();

        let fish = release(&mut aquarium, 2).unwrap();

        assert_eq!(fish.name, "🐡");
        assert_eq!(aquarium.fish.len(), 1);
    }

    #[test_case(0 ; "zero")]
    #[test_case(3 ; "past the end")]
    fn release_unknown_position(position: usize) {
        let mut aquarium = aquarium(3, 2);

        assert_eq!(
            release(&mut aquarium, position).unwrap_err(),
            Error::NoSuchFish(position)
        );
    }

    #[test]
    fn feeding_fills_everyone_up() {
        let mut aquarium = aquarium(3, 3);
        aquarium.fish[0].hunger = 3.0;
        aquarium.fish[2].hunger = 42.0;

        assert_eq!(feed(&mut aquarium), 3);
        assert!(aquarium.fish.iter().all(|fish| fish.hunger == 100.0));
    }

    #[test]
    fn cleaning_and_heating_restore_the_water() {
        let mut aquarium = aquarium(3, 0);
        aquarium.water_quality = 12.0;
        aquarium.temperature = 40.0;

        clean(&mut aquarium);
        heat(&mut aquarium);

        assert_eq!(aquarium.water_quality, 100.0);
        assert_eq!(aquarium.temperature, 100.0);
    }

    #[test]
    fn decorating_cheers_fish_up() {
        let mut aquarium = aquarium(3, 2);
        aquarium.fish[1].happiness = 95.0;

        assert_eq!(decorate(&mut aquarium, "castle").unwrap(), "🏰 castle");
        assert_eq!(aquarium.fish[0].happiness, 90.0);
        assert_eq!(aquarium.fish[1].happiness, 100.0);
        assert!(aquarium.decorations.contains("castle"));
    }

    #[test]
    fn decorations_are_placed_once() {
        let mut aquarium = aquarium(3, 1);
        decorate(&mut aquarium, "plant").unwrap();

        assert_eq!(
            decorate(&mut aquarium, "plant").unwrap_err(),
            Error::AlreadyDecorated("🌿 plant")
        );
        assert_eq!(aquarium.fish[0].happiness, 85.0);
    }

    #[test]
    fn unknown_decoration() {
        let mut aquarium = aquarium(3, 0);

        assert_eq!(
            decorate(&mut aquarium, "gnome").unwrap_err(),
            Error::UnknownDecoration("gnome".to_string())
        );
        assert!(aquarium.decorations.is_empty());
    }

    #[test_case("Bubbles", Some("Bubbles") ; "named")]
    #[test_case("  Sir Swims  ", Some("Sir Swims") ; "trimmed")]
    #[test_case("", None ; "name cleared")]
    fn renaming(name: &str, expected: Option<&str>) {
        let mut aquarium = aquarium(3, 1);
        aquarium.fish[0].custom_name = Some("Old Name".to_string());

        let fish = rename(&mut aquarium, 1, name).unwrap();

        assert_eq!(fish.custom_name.as_deref(), expected);
    }
}
