//! A player looking at (and possibly tending to) their aquarium.

use chrono::{DateTime, Utc};
use log::info;
use rand::Rng;

use crate::{
    care,
    catalog::{self, DEFAULT_AQUARIUM_TYPE},
    maintenance::{apply_maintenance, MaintenanceSummary},
    models::Aquarium,
    store::{self, AquariumStore},
};

/// Name of the aquarium every player gets.
pub const DEFAULT_TANK: &str = "main";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown aquarium type {0:?}")]
    UnknownAquariumType(String),

    #[error("Could not access aquarium")]
    Store(#[from] store::Error),
}

#[derive(Debug)]
pub struct Visit<T> {
    /// The aquarium as it was saved
    pub aquarium: Aquarium,
    pub summary: MaintenanceSummary,
    pub outcome: Result<T, care::Error>,
}

fn config_for(type_name: &str) -> Result<&'static catalog::AquariumTypeConfig, Error> {
    catalog::aquarium_type(type_name).ok_or_else(|| Error::UnknownAquariumType(type_name.to_string()))
}

/// Catch `owner`'s aquarium up to `now`, then apply `action` to it.
///
/// Players without an aquarium get a new one. The caught up aquarium is saved
/// even if `action` fails; failed actions leave the aquarium as it was.
pub async fn visit<R, T, F>(
    store: &AquariumStore,
    owner: &str,
    now: DateTime<Utc>,
    rng: &mut R,
    action: F,
) -> Result<Visit<T>, Error>
where
    R: Rng + ?Sized,
    F: FnOnce(&mut Aquarium) -> Result<T, care::Error>,
{
    store
        .update(owner, DEFAULT_TANK, |existing| -> Result<_, Error> {
            let mut aquarium = match existing {
                Some(aquarium) => aquarium,
                None => {
                    info!("Creating aquarium for {owner}");
                    Aquarium::new(owner, DEFAULT_TANK, config_for(DEFAULT_AQUARIUM_TYPE)?, now)
                }
            };

            let config = config_for(&aquarium.type_name)?;
            aquarium.capacity = config.capacity;

            let summary = apply_maintenance(&mut aquarium, now, config, rng);
            let outcome = action(&mut aquarium);

            Ok((
                aquarium.clone(),
                Visit {
                    aquarium,
                    summary,
                    outcome,
                },
            ))
        })
        .await
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use rand::rngs::mock::StepRng;

    use super::*;
    use crate::models::Size;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 5, 25, 13, 51, 3).unwrap()
    }

    fn never() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    async fn store() -> AquariumStore {
        AquariumStore::connect("sqlite::memory:").await.unwrap()
    }

    fn stock_moley(aquarium: &mut Aquarium) -> Result<(), care::Error> {
        let fish = catalog::species("FishMoley").unwrap().catch(Size::Medium);
        care::stock(aquarium, fish).map(|_| ())
    }

    #[tokio::test]
    async fn first_visit_creates_an_aquarium() {
        let store = store().await;

        let visit = visit(&store, "chronophylos", now(), &mut never(), |_| Ok(()))
            .await
            .unwrap();

        assert_eq!(visit.aquarium.type_name, DEFAULT_AQUARIUM_TYPE);
        assert_eq!(visit.aquarium.name, DEFAULT_TANK);
        assert!(visit.summary.is_empty());
        assert!(store.load("chronophylos", DEFAULT_TANK).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn later_visits_catch_up() {
        let store = store().await;
        visit(&store, "chronophylos", now(), &mut never(), stock_moley)
            .await
            .unwrap();

        let later = now() + Duration::days(2);
        let visit = visit(&store, "chronophylos", later, &mut never(), |_| Ok(()))
            .await
            .unwrap();

        assert_eq!(visit.summary.elapsed_days, 2.0);
        assert_eq!(visit.aquarium.fish[0].hunger, 70.0);
        assert_eq!(visit.aquarium.last_maintenance, later);
    }

    #[tokio::test]
    async fn failed_actions_still_save_the_catch_up() {
        let store = store().await;
        visit(&store, "chronophylos", now(), &mut never(), stock_moley)
            .await
            .unwrap();

        let later = now() + Duration::days(1);
        let visit = visit(&store, "chronophylos", later, &mut never(), |aquarium| {
            care::release(aquarium, 7)
        })
        .await
        .unwrap();

        assert_eq!(visit.outcome.unwrap_err(), care::Error::NoSuchFish(7));
        let saved = store.load("chronophylos", DEFAULT_TANK).await.unwrap().unwrap();
        assert_eq!(saved.last_maintenance, later);
        assert_eq!(saved.fish.len(), 1);
    }

    #[tokio::test]
    async fn unknown_aquarium_types_are_rejected_before_maintenance() {
        let store = store().await;
        let config = catalog::aquarium_type(DEFAULT_AQUARIUM_TYPE).unwrap();
        let mut aquarium = Aquarium::new("chronophylos", DEFAULT_TANK, config, now());
        aquarium.type_name = "bathtub".to_string();
        store.save(&aquarium).await.unwrap();

        let result = visit(
            &store,
            "chronophylos",
            now() + Duration::days(1),
            &mut never(),
            |_| Ok(()),
        )
        .await;

        assert!(matches!(result, Err(Error::UnknownAquariumType(name)) if name == "bathtub"));
        let saved = store.load("chronophylos", DEFAULT_TANK).await.unwrap().unwrap();
        assert_eq!(saved.last_maintenance, now());
    }

    #[tokio::test]
    async fn capacity_follows_the_aquarium_type() {
        let store = store().await;
        let config = catalog::aquarium_type(DEFAULT_AQUARIUM_TYPE).unwrap();
        let mut aquarium = Aquarium::new("chronophylos", DEFAULT_TANK, config, now());
        aquarium.capacity = 1;
        stock_moley(&mut aquarium).unwrap();
        store.save(&aquarium).await.unwrap();

        let visit = visit(&store, "chronophylos", now(), &mut never(), stock_moley)
            .await
            .unwrap();

        assert_eq!(visit.aquarium.capacity, config.capacity);
        assert_eq!(visit.outcome, Ok(()));
        assert_eq!(visit.aquarium.fish.len(), 2);
    }
}
