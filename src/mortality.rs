use rand::Rng;

/// Fish below this hunger and happiness are considered neglected.
pub const NEGLECT_THRESHOLD: f64 = 10.0;
/// Chance per day that a neglected fish dies.
pub const DEATH_RATE: f64 = 0.2;

pub fn is_neglected(hunger: f64, happiness: f64) -> bool {
    hunger < NEGLECT_THRESHOLD && happiness < NEGLECT_THRESHOLD
}

/// Roll for death. Only neglected fish consume a roll.
pub fn should_die<R: Rng + ?Sized>(
    hunger: f64,
    happiness: f64,
    elapsed_days: f64,
    rng: &mut R,
) -> bool {
    is_neglected(hunger, happiness) && crate::roll(rng, DEATH_RATE * elapsed_days)
}
