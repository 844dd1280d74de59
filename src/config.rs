use std::{
    collections::HashSet,
    fs,
    ops::{Deref, DerefMut},
    path::PathBuf,
};

use async_trait::async_trait;
use directories::ProjectDirs;
use log::debug;
use ron::ser::PrettyConfig;
use secrecy::{CloneableSecret, DebugSecret, ExposeSecret, Secret, SerializableSecret, Zeroize};
use serde::{Deserialize, Serialize};
use twitch_irc::{
    login::{RefreshingLoginCredentials, TokenStorage, UserAccessToken},
    ClientConfig,
};

const CONFIG_FILE: &str = "config.ron";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Could not find a config directory")]
    NoConfigDir,

    #[error("Could not read {0}")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Could not parse {0}")]
    Parse(PathBuf, #[source] ron::error::SpannedError),

    #[error("Could not serialize config")]
    Serialize(#[source] ron::Error),

    #[error("Could not write {0}")]
    Write(PathBuf, #[source] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
#[error("No token stored")]
pub struct NoTokenError;

/// Bot configuration, kept in `config.ron` in the platform's config directory.
///
/// The refreshed OAuth token is written back through [`TokenStorage`].
#[derive(Debug, Clone)]
pub struct Config {
    path: PathBuf,
    data: ConfigData,
}

impl Config {
    pub fn load() -> Result<Self, Error> {
        let dirs = ProjectDirs::from("com", "Chronophylos", "Fishinge").ok_or(Error::NoConfigDir)?;
        let path = dirs.config_dir().join(CONFIG_FILE);

        debug!("Loading config from {}", path.display());
        let text = fs::read_to_string(&path).map_err(|source| Error::Read(path.clone(), source))?;
        let data = ron::from_str(&text).map_err(|source| Error::Parse(path.clone(), source))?;

        Ok(Self { path, data })
    }

    pub fn save(&self) -> Result<(), Error> {
        let text = ron::ser::to_string_pretty(&self.data, PrettyConfig::default())
            .map_err(Error::Serialize)?;

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|source| Error::Write(dir.to_path_buf(), source))?;
        }
        fs::write(&self.path, text).map_err(|source| Error::Write(self.path.clone(), source))
    }

    pub fn client_config(&self) -> ClientConfig<RefreshingLoginCredentials<Config>> {
        let credentials = RefreshingLoginCredentials::init_with_username(
            self.username.clone(),
            self.client.id.clone(),
            self.client.secret.expose_secret().as_str().to_owned(),
            self.clone(),
        );
        ClientConfig::new_simple(credentials)
    }
}

impl Deref for Config {
    type Target = ConfigData;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl DerefMut for Config {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.data
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigData {
    pub username: Option<String>,
    pub token: Option<Secret<StoredToken>>,
    pub client: ClientSettings,
    pub channels: HashSet<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSettings {
    pub id: String,
    pub secret: Secret<ClientSecret>,
}

/// The app's client secret. Serialized as a plain string.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientSecret(String);

impl ClientSecret {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Zeroize for ClientSecret {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl CloneableSecret for ClientSecret {}
impl DebugSecret for ClientSecret {}
impl SerializableSecret for ClientSecret {}

/// Last OAuth token handed out by Twitch, refreshed by the client.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoredToken(UserAccessToken);

impl From<&UserAccessToken> for StoredToken {
    fn from(token: &UserAccessToken) -> Self {
        Self(token.clone())
    }
}

impl Zeroize for StoredToken {
    fn zeroize(&mut self) {
        let StoredToken(token) = self;
        token.access_token.zeroize();
        token.refresh_token.zeroize();
    }
}

impl CloneableSecret for StoredToken {}
impl DebugSecret for StoredToken {}
impl SerializableSecret for StoredToken {}

#[async_trait]
impl TokenStorage for Config {
    type LoadError = NoTokenError;
    type UpdateError = Error;

    async fn load_token(&mut self) -> Result<UserAccessToken, NoTokenError> {
        match &self.data.token {
            Some(token) => Ok(token.expose_secret().0.clone()),
            None => Err(NoTokenError),
        }
    }

    async fn update_token(&mut self, token: &UserAccessToken) -> Result<(), Error> {
        debug!("Storing refreshed token");
        self.data.token = Some(Secret::new(token.into()));
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_decode_config() {
        let data: ConfigData = ron::from_str(
            r#"(
                username: Some("fishinge"),
                token: None,
                client: (id: "client-id", secret: "client-secret"),
                channels: ["chronophylos"],
            )"#,
        )
        .unwrap();

        assert_eq!(data.username.as_deref(), Some("fishinge"));
        assert_eq!(data.client.secret.expose_secret().as_str(), "client-secret");
        assert!(data.channels.contains("chronophylos"));
    }

    #[test]
    fn client_secret_is_redacted() {
        let data: ConfigData = ron::from_str(
            r#"(username: None, token: None, client: (id: "id", secret: "hunter2"), channels: [])"#,
        )
        .unwrap();

        assert!(!format!("{data:?}").contains("hunter2"));
    }
}
