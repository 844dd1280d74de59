use std::fmt::Display;

use chrono::{DateTime, Utc};
use log::{debug, trace};
use rand::Rng;

use crate::{
    catalog::AquariumTypeConfig,
    clock, environment, lifecycle,
    models::{Aquarium, GrowthStage},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrowthTransition {
    pub fish: String,
    pub from: GrowthStage,
    pub to: GrowthStage,
}

/// What a catch-up pass did, for reporting back to the player.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaintenanceSummary {
    /// Zero if the pass was skipped
    pub elapsed_days: f64,
    pub born: Vec<String>,
    pub died: Vec<String>,
    pub grew: Vec<GrowthTransition>,
}

impl MaintenanceSummary {
    pub fn is_empty(&self) -> bool {
        self.born.is_empty() && self.died.is_empty() && self.grew.is_empty()
    }
}

fn describe(names: &[String], verb: &str) -> String {
    match names {
        [name] => format!("{name} {verb}"),
        names => format!("{} fish {verb} ({})", names.len(), names.join(", ")),
    }
}

impl Display for MaintenanceSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "nothing happened");
        }

        let mut events = Vec::new();

        if !self.born.is_empty() {
            events.push(describe(&self.born, "hatched"));
        }
        if !self.died.is_empty() {
            events.push(describe(&self.died, "died"));
        }
        for transition in &self.grew {
            let article = match transition.to {
                GrowthStage::Adult => "an",
                GrowthStage::Baby | GrowthStage::Juvenile => "a",
            };
            events.push(format!(
                "{} grew into {article} {}",
                transition.fish, transition.to
            ));
        }

        write!(f, "{}", events.join(", "))
    }
}

/// Catch an aquarium up to `now`.
///
/// Passes less than [`clock::MIN_ELAPSED`] after the last one leave the
/// aquarium untouched and do not consume any randomness. Otherwise the
/// environment decays once, every fish is processed and `last_maintenance`
/// is set to `now`.
///
/// `config` must be the catalog entry for `aquarium.type_name`.
pub fn apply_maintenance<R: Rng + ?Sized>(
    aquarium: &mut Aquarium,
    now: DateTime<Utc>,
    config: &AquariumTypeConfig,
    rng: &mut R,
) -> MaintenanceSummary {
    debug_assert_eq!(aquarium.type_name, config.key);
    debug_assert!(aquarium.fish.len() <= config.capacity);

    if !clock::is_stale(aquarium.last_maintenance, now) {
        trace!(
            "Skipping maintenance of {}'s {}, last run at {}",
            aquarium.owner,
            aquarium.name,
            aquarium.last_maintenance
        );
        return MaintenanceSummary::default();
    }

    let days = clock::elapsed_days(aquarium.last_maintenance, now);
    let conditions = environment::decay(aquarium, days, config);

    let mut summary = MaintenanceSummary {
        elapsed_days: days,
        ..Default::default()
    };

    lifecycle::run(aquarium, &conditions, config, now, rng, &mut summary);

    aquarium.last_maintenance = now;

    debug!(
        "Maintained {}'s {} after {days:.2} days: {summary}",
        aquarium.owner, aquarium.name
    );

    summary
}
