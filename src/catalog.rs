//! Static game data: aquarium types, species and decorations.

use phf::phf_map;
use rand::{distributions::WeightedError, seq::SliceRandom, Rng};

use crate::models::{InventoryFish, Rarity, Size};

/// Aquarium type new players start out with.
pub const DEFAULT_AQUARIUM_TYPE: &str = "starter_tank";

/// Per-type tuning of the ecosystem simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct AquariumTypeConfig {
    pub key: &'static str,
    pub name: &'static str,
    pub capacity: usize,
    /// Multiplier on every decay rate, 1.0 is the baseline
    pub maintenance_rate: f64,
    /// Breeding probability per day for an eligible fish
    pub breeding_chance: f64,
}

static AQUARIUM_TYPES: phf::Map<&'static str, AquariumTypeConfig> = phf_map! {
    "fish_bowl" => AquariumTypeConfig {
        key: "fish_bowl",
        name: "Fish Bowl",
        capacity: 3,
        maintenance_rate: 1.5,
        breeding_chance: 0.02,
    },
    "starter_tank" => AquariumTypeConfig {
        key: "starter_tank",
        name: "Starter Tank",
        capacity: 10,
        maintenance_rate: 1.0,
        breeding_chance: 0.05,
    },
    "community_tank" => AquariumTypeConfig {
        key: "community_tank",
        name: "Community Tank",
        capacity: 20,
        maintenance_rate: 0.8,
        breeding_chance: 0.07,
    },
    "reef_tank" => AquariumTypeConfig {
        key: "reef_tank",
        name: "Reef Tank",
        capacity: 30,
        maintenance_rate: 0.6,
        breeding_chance: 0.1,
    },
};

pub fn aquarium_type(key: &str) -> Option<&'static AquariumTypeConfig> {
    AQUARIUM_TYPES.get(key)
}

#[derive(Debug, Clone)]
pub struct Species {
    pub name: &'static str,
    pub base_value: f64,
    pub rarity: Rarity,
    /// Relative weight when catching
    pub count: u32,
}

impl Species {
    const fn new(name: &'static str, base_value: f64, rarity: Rarity, count: u32) -> Self {
        Self {
            name,
            base_value,
            rarity,
            count,
        }
    }

    pub fn catch(&self, size: Size) -> InventoryFish {
        InventoryFish {
            name: self.name.to_string(),
            rarity: self.rarity,
            size,
            base_value: self.base_value,
            value: value_of(self.base_value, size, self.rarity),
        }
    }
}

static SPECIES: [Species; 10] = [
    Species::new("🐟", 20.0, Rarity::Common, 150),
    Species::new("🐠", 30.0, Rarity::Common, 90),
    Species::new("🐡", 40.0, Rarity::Uncommon, 80),
    Species::new("🦐", 15.0, Rarity::Common, 60),
    Species::new("🦑", 50.0, Rarity::Uncommon, 50),
    Species::new("🐢", 30.0, Rarity::Rare, 50),
    Species::new("FishMoley", 100.0, Rarity::Rare, 30),
    Species::new("🦈", 150.0, Rarity::Epic, 20),
    Species::new("🦀", 400.0, Rarity::Epic, 10),
    Species::new("🐳", 800.0, Rarity::Legendary, 1),
];

pub fn species(name: &str) -> Option<&'static Species> {
    SPECIES.iter().find(|species| species.name == name)
}

/// Catch a random fish, species weighted by their count.
pub fn catch_fish<R: Rng + ?Sized>(rng: &mut R) -> Result<InventoryFish, WeightedError> {
    let species = SPECIES.choose_weighted(rng, |species| species.count)?;
    let size = Size::ALL[rng.gen_range(0..Size::ALL.len())];

    Ok(species.catch(size))
}

/// Value of a fish from its species value and its own traits.
pub fn value_of(base_value: f64, size: Size, rarity: Rarity) -> f64 {
    base_value * size.multiplier() * rarity.multiplier()
}

#[derive(Debug, Clone)]
pub struct Decoration {
    pub name: &'static str,
    pub happiness_bonus: f64,
}

static DECORATIONS: phf::Map<&'static str, Decoration> = phf_map! {
    "shell" => Decoration { name: "🐚 shell", happiness_bonus: 3.0 },
    "plant" => Decoration { name: "🌿 plant", happiness_bonus: 5.0 },
    "coral" => Decoration { name: "🪸 coral", happiness_bonus: 8.0 },
    "castle" => Decoration { name: "🏰 castle", happiness_bonus: 10.0 },
    "treasure" => Decoration { name: "💰 treasure chest", happiness_bonus: 15.0 },
};

pub fn decoration(key: &str) -> Option<&'static Decoration> {
    DECORATIONS.get(key)
}

pub fn decoration_keys() -> impl Iterator<Item = &'static str> {
    DECORATIONS.keys().copied()
}
