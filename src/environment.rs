use crate::{catalog::AquariumTypeConfig, models::Aquarium};

/// Hunger lost per day at maintenance rate 1.0
pub const BASE_HUNGER_RATE: f64 = 15.0;
/// Water quality lost per day at maintenance rate 1.0
pub const BASE_WATER_RATE: f64 = 20.0;
/// Temperature lost per day at maintenance rate 1.0
pub const BASE_TEMP_RATE: f64 = 10.0;

/// Aquarium-wide conditions for one catch-up pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conditions {
    pub elapsed_days: f64,
    /// Hunger every fish loses during this pass
    pub hunger_decrease: f64,
    /// Combined water quality and temperature in `0..=1`, 1 being ideal
    pub env_factor: f64,
}

fn decrease(rate: f64, days: f64, maintenance_rate: f64) -> f64 {
    (rate * days * maintenance_rate).min(100.0)
}

/// Decay the aquarium's water and temperature and derive the conditions the
/// fish live in for the rest of the pass.
pub fn decay(aquarium: &mut Aquarium, days: f64, config: &AquariumTypeConfig) -> Conditions {
    let rate = config.maintenance_rate;

    aquarium.water_quality =
        (aquarium.water_quality - decrease(BASE_WATER_RATE, days, rate)).max(0.0);
    aquarium.temperature = (aquarium.temperature - decrease(BASE_TEMP_RATE, days, rate)).max(0.0);

    Conditions {
        elapsed_days: days,
        hunger_decrease: decrease(BASE_HUNGER_RATE, days, rate),
        env_factor: (aquarium.water_quality / 100.0) * (aquarium.temperature / 100.0),
    }
}
