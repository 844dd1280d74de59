use std::{collections::BTreeSet, fmt::Display};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{self, AquariumTypeConfig};

/// Stats are kept in this range at all times.
pub const MAX_STAT: f64 = 100.0;

/// Clamp a stat to `0..=100`.
pub fn clamp_stat(value: f64) -> f64 {
    value.clamp(0.0, MAX_STAT)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrowthStage {
    Baby,
    Juvenile,
    Adult,
}

impl GrowthStage {
    /// The stage following this one, `None` for adults.
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Baby => Some(Self::Juvenile),
            Self::Juvenile => Some(Self::Adult),
            Self::Adult => None,
        }
    }
}

impl Display for GrowthStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Baby => "baby",
            Self::Juvenile => "juvenile",
            Self::Adult => "adult",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Common => 1.0,
            Self::Uncommon => 1.5,
            Self::Rare => 2.5,
            Self::Epic => 4.0,
            Self::Legendary => 8.0,
        }
    }
}

impl Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Common => "common",
            Self::Uncommon => "uncommon",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    Tiny,
    Small,
    Medium,
    Large,
    Huge,
}

impl Size {
    pub const ALL: [Size; 5] = [
        Self::Tiny,
        Self::Small,
        Self::Medium,
        Self::Large,
        Self::Huge,
    ];

    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Tiny => 0.5,
            Self::Small => 0.8,
            Self::Medium => 1.0,
            Self::Large => 1.5,
            Self::Huge => 2.0,
        }
    }
}

impl Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Tiny => "tiny",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Huge => "huge",
        })
    }
}

/// A fish living in an aquarium.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AquariumFish {
    /// Species name
    pub name: String,
    pub custom_name: Option<String>,
    pub rarity: Rarity,
    pub size: Size,
    /// Value before size and rarity multipliers
    pub base_value: f64,
    pub value: f64,
    pub hunger: f64,
    pub happiness: f64,
    pub growth: GrowthStage,
    pub last_bred: Option<DateTime<Utc>>,
}

impl AquariumFish {
    /// A fish transferred in from a player's inventory.
    pub fn stocked(fish: InventoryFish) -> Self {
        Self {
            name: fish.name,
            custom_name: None,
            rarity: fish.rarity,
            size: fish.size,
            base_value: fish.base_value,
            value: fish.value,
            hunger: MAX_STAT,
            happiness: 80.0,
            growth: GrowthStage::Adult,
            last_bred: None,
        }
    }

    /// A newborn of `parent`.
    pub fn offspring(parent: &AquariumFish) -> Self {
        Self {
            name: parent.name.clone(),
            custom_name: None,
            rarity: parent.rarity,
            size: parent.size,
            base_value: parent.base_value,
            value: parent.value * 0.1,
            hunger: 70.0,
            happiness: 90.0,
            growth: GrowthStage::Baby,
            last_bred: None,
        }
    }

    /// The name players see: the custom name if set, the species otherwise.
    pub fn display_name(&self) -> &str {
        self.custom_name.as_deref().unwrap_or(&self.name)
    }
}

impl Display for AquariumFish {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(custom_name) = &self.custom_name {
            write!(f, "{custom_name} the {}", self.name)?;
        } else {
            write!(f, "{}", self.name)?;
        }

        write!(
            f,
            " ({} {} {}) worth ${:.2}, hunger {:.0}%, happiness {:.0}%",
            self.size, self.rarity, self.growth, self.value, self.hunger, self.happiness
        )
    }
}

/// A fish outside of any aquarium.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryFish {
    pub name: String,
    pub rarity: Rarity,
    pub size: Size,
    pub base_value: f64,
    pub value: f64,
}

impl From<AquariumFish> for InventoryFish {
    fn from(fish: AquariumFish) -> Self {
        Self {
            name: fish.name,
            rarity: fish.rarity,
            size: fish.size,
            base_value: fish.base_value,
            value: fish.value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aquarium {
    pub owner: String,
    pub name: String,
    pub type_name: String,
    pub capacity: usize,
    pub water_quality: f64,
    pub temperature: f64,
    pub decorations: BTreeSet<String>,
    pub fish: Vec<AquariumFish>,
    pub last_maintenance: DateTime<Utc>,
}

impl Aquarium {
    /// An empty aquarium in optimal condition.
    pub fn new(
        owner: impl Into<String>,
        name: impl Into<String>,
        config: &AquariumTypeConfig,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            type_name: config.key.to_string(),
            capacity: config.capacity,
            water_quality: MAX_STAT,
            temperature: MAX_STAT,
            decorations: BTreeSet::new(),
            fish: Vec::new(),
            last_maintenance: now,
        }
    }

    pub fn is_full(&self) -> bool {
        self.fish.len() >= self.capacity
    }
}

impl Display for Aquarium {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let type_name = catalog::aquarium_type(&self.type_name)
            .map_or(self.type_name.as_str(), |config| config.name);

        write!(
            f,
            "{type_name} with {}/{} fish, water {:.0}%, temperature {:.0}%",
            self.fish.len(),
            self.capacity,
            self.water_quality,
            self.temperature
        )?;

        if !self.fish.is_empty() {
            write!(
                f,
                ": {}",
                self.fish
                    .iter()
                    .enumerate()
                    .map(|(index, fish)| format!("{}. {}", index + 1, fish.display_name()))
                    .collect::<Vec<_>>()
                    .join(" · ")
            )?;
        }

        Ok(())
    }
}
