use std::{env, str::FromStr};

use log::debug;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode},
    ConnectOptions, Connection, SqliteConnection,
};
use tokio::sync::Mutex;

use crate::models::Aquarium;

const DATABASE_URL: &str = "sqlite://aquarium.db";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Could not open database connection")]
    OpenDatabase(#[source] sqlx::Error),

    #[error("Could not migrate database")]
    MigrateDatabase(#[from] sqlx::migrate::MigrateError),

    #[error("Could not query aquarium")]
    QueryAquarium(#[source] sqlx::Error),

    #[error("Could not save aquarium")]
    SaveAquarium(#[source] sqlx::Error),

    #[error("Could not decode aquarium")]
    DecodeAquarium(#[source] serde_json::Error),

    #[error("Could not encode aquarium")]
    EncodeAquarium(#[source] serde_json::Error),
}

/// Aquariums stored in SQLite, one row per owner and tank name.
///
/// All access goes through a single connection, so every read-modify-write
/// done with [`AquariumStore::update`] sees the result of the previous one.
pub struct AquariumStore {
    conn: Mutex<SqliteConnection>,
}

impl AquariumStore {
    /// Open the database named by `DATABASE_URL`.
    pub async fn open() -> Result<Self, Error> {
        Self::connect(
            env::var("DATABASE_URL")
                .as_deref()
                .unwrap_or(DATABASE_URL),
        )
        .await
    }

    pub async fn connect(url: &str) -> Result<Self, Error> {
        debug!("Opening database connection");
        let mut conn = SqliteConnectOptions::from_str(url)
            .map_err(Error::OpenDatabase)?
            .journal_mode(SqliteJournalMode::Wal)
            .create_if_missing(true)
            .connect()
            .await
            .map_err(Error::OpenDatabase)?;

        debug!("Running migrations");
        sqlx::migrate!().run(&mut conn).await?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub async fn load(&self, owner: &str, name: &str) -> Result<Option<Aquarium>, Error> {
        let mut conn = self.conn.lock().await;
        fetch(&mut conn, owner, name).await
    }

    pub async fn save(&self, aquarium: &Aquarium) -> Result<(), Error> {
        let mut conn = self.conn.lock().await;
        upsert(&mut conn, aquarium).await
    }

    /// Every aquarium of `owner`, ordered by name.
    pub async fn list(&self, owner: &str) -> Result<Vec<Aquarium>, Error> {
        let mut conn = self.conn.lock().await;

        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT data FROM aquariums WHERE owner = ? ORDER BY name")
                .bind(owner)
                .fetch_all(&mut *conn)
                .await
                .map_err(Error::QueryAquarium)?;

        rows.into_iter()
            .map(|(data,)| serde_json::from_str(&data).map_err(Error::DecodeAquarium))
            .collect()
    }

    /// Load an aquarium, hand it to `f` and save what `f` returns.
    ///
    /// No other access to the store happens in between. Nothing is saved if
    /// `f` fails.
    pub async fn update<T, E, F>(&self, owner: &str, name: &str, f: F) -> Result<T, E>
    where
        F: FnOnce(Option<Aquarium>) -> Result<(Aquarium, T), E>,
        E: From<Error>,
    {
        let mut conn = self.conn.lock().await;
        let mut tx = conn.begin().await.map_err(Error::QueryAquarium)?;

        let existing = fetch(&mut tx, owner, name).await?;
        let (aquarium, output) = f(existing)?;
        upsert(&mut tx, &aquarium).await?;

        tx.commit().await.map_err(Error::SaveAquarium)?;

        Ok(output)
    }
}

async fn fetch(
    conn: &mut SqliteConnection,
    owner: &str,
    name: &str,
) -> Result<Option<Aquarium>, Error> {
    let row: Option<(String,)> =
        sqlx::query_as("SELECT data FROM aquariums WHERE owner = ? AND name = ?")
            .bind(owner)
            .bind(name)
            .fetch_optional(conn)
            .await
            .map_err(Error::QueryAquarium)?;

    row.map(|(data,)| serde_json::from_str(&data))
        .transpose()
        .map_err(Error::DecodeAquarium)
}

async fn upsert(conn: &mut SqliteConnection, aquarium: &Aquarium) -> Result<(), Error> {
    let data = serde_json::to_string(aquarium).map_err(Error::EncodeAquarium)?;

    sqlx::query(
        r#"
        INSERT INTO aquariums (owner, name, type_name, last_maintenance, data)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT (owner, name) DO UPDATE SET
            type_name = excluded.type_name,
            last_maintenance = excluded.last_maintenance,
            data = excluded.data
        "#,
    )
    .bind(aquarium.owner.as_str())
    .bind(aquarium.name.as_str())
    .bind(aquarium.type_name.as_str())
    .bind(aquarium.last_maintenance)
    .bind(data)
    .execute(conn)
    .await
    .map_err(Error::SaveAquarium)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::{
        catalog::{self, DEFAULT_AQUARIUM_TYPE},
        models::Size,
    };

    async fn store() -> AquariumStore {
        AquariumStore::connect("sqlite::memory:").await.unwrap()
    }

    fn aquarium(owner: &str, name: &str) -> Aquarium {
        let config = catalog::aquarium_type(DEFAULT_AQUARIUM_TYPE).unwrap();
        let now = Utc.with_ymd_and_hms(2022, 8, 29, 15, 0, 37).unwrap();
        let mut aquarium = Aquarium::new(owner, name, config, now);
        let fish = catalog::species("🐠").unwrap().catch(Size::Large);
        crate::care::stock(&mut aquarium, fish).unwrap();
        aquarium
    }

    #[tokio::test]
    async fn missing_aquarium() {
        let store = store().await;

        assert_eq!(store.load("chronophylos", "main").await.unwrap(), None);
    }

    #[tokio::test]
    async fn saved_aquarium_can_be_loaded() {
        let store = store().await;
        let aquarium = aquarium("chronophylos", "main");

        store.save(&aquarium).await.unwrap();

        assert_eq!(
            store.load("chronophylos", "main").await.unwrap(),
            Some(aquarium)
        );
    }

    #[tokio::test]
    async fn saving_twice_overwrites() {
        let store = store().await;
        let mut aquarium = aquarium("chronophylos", "main");
        store.save(&aquarium).await.unwrap();

        aquarium.water_quality = 12.5;
        store.save(&aquarium).await.unwrap();

        let loaded = store.load("chronophylos", "main").await.unwrap().unwrap();
        assert_eq!(loaded.water_quality, 12.5);
        assert_eq!(store.list("chronophylos").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn list_only_returns_the_owners_aquariums() {
        let store = store().await;
        store.save(&aquarium("chronophylos", "main")).await.unwrap();
        store.save(&aquarium("chronophylos", "backup")).await.unwrap();
        store.save(&aquarium("gargoyletec", "main")).await.unwrap();

        let names = store
            .list("chronophylos")
            .await
            .unwrap()
            .into_iter()
            .map(|aquarium| aquarium.name)
            .collect::<Vec<_>>();

        assert_eq!(names, vec!["backup", "main"]);
    }

    #[tokio::test]
    async fn update_creates_and_modifies() {
        let store = store().await;

        let created: Result<bool, Error> = store
            .update("chronophylos", "main", |existing| {
                Ok((aquarium("chronophylos", "main"), existing.is_none()))
            })
            .await;
        assert!(created.unwrap());

        let fish: Result<usize, Error> = store
            .update("chronophylos", "main", |existing| {
                let mut aquarium = existing.unwrap();
                aquarium.fish.clear();
                Ok((aquarium, 0))
            })
            .await;
        assert_eq!(fish.unwrap(), 0);

        let loaded = store.load("chronophylos", "main").await.unwrap().unwrap();
        assert!(loaded.fish.is_empty());
    }

    #[derive(Debug)]
    struct Refused;

    impl From<Error> for Refused {
        fn from(_: Error) -> Self {
            Self
        }
    }

    #[tokio::test]
    async fn failed_update_saves_nothing() {
        let store = store().await;
        store.save(&aquarium("chronophylos", "main")).await.unwrap();

        let result: Result<(), Refused> = store
            .update("chronophylos", "main", |_| Err(Refused))
            .await;

        assert!(result.is_err());
        assert_eq!(
            store.load("chronophylos", "main").await.unwrap().unwrap().fish.len(),
            1
        );
    }
}
