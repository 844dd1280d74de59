#![forbid(unsafe_code)]

mod config;

use std::{fmt::Display, sync::Arc, time::Duration as StdDuration};

use aquarium_fishinge::{
    care, catalog,
    session::SessionMap,
    store,
    tank::{self, Visit},
    AquariumStore,
};
use chrono::{Duration, Utc};
use dotenvy::dotenv;
use eyre::WrapErr;
use futures_lite::stream::StreamExt;
use log::{debug, error, info, trace, warn};
use once_cell::sync::Lazy;
use rand::{rngs::StdRng, SeedableRng};
use regex::Regex;
use signal_hook::consts::{SIGINT, SIGQUIT, SIGTERM};
use signal_hook_tokio::Signals;
use tokio::{select, sync::Notify};
use twitch_irc::{
    login::RefreshingLoginCredentials,
    message::{PrivmsgMessage, ServerMessage},
    SecureTCPTransport, TwitchIRCClient,
};

use crate::config::Config;

type Client = TwitchIRCClient<SecureTCPTransport, RefreshingLoginCredentials<Config>>;

#[derive(Debug, thiserror::Error)]
enum Error {
    #[error("Could not load config")]
    Config(#[from] config::Error),

    #[error("Could not validate channel name")]
    ValidateChannelName(#[from] twitch_irc::validate::Error),

    #[error("Could not open aquarium store")]
    OpenStore(#[from] store::Error),

    #[error("Could not visit aquarium")]
    Visit(#[from] tank::Error),

    #[error("Could not catch a fish")]
    Catch(#[from] rand::distributions::WeightedError),

    #[error("Could not reply to message")]
    ReplyToMessage(
        #[from] twitch_irc::Error<SecureTCPTransport, RefreshingLoginCredentials<Config>>,
    ),

    #[error("Could not join thread")]
    JoinThread(#[from] tokio::task::JoinError),

    #[error("Signal hooking error")]
    Signals(#[source] std::io::Error),
}

static COMMAND_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^((?P<emote>\S+)\s+)?Fishinge( (?P<args>.*))?$").unwrap());

static CATCH_COOLDOWN: Lazy<Duration> = Lazy::new(|| Duration::hours(4));

const HELP: &str = "Fishinge shows your aquarium · 🎣 Fishinge catches a fish for it · \
    🍤 feeds · 🧽 cleans the water · 🔥 heats the water · 🏰 <decoration> decorates · \
    👋 <number> releases a fish · ✏️ <number> <name> names a fish";

#[tokio::main]
async fn main() -> eyre::Result<()> {
    pretty_env_logger::init_timed();
    dotenv().ok();

    run().await.wrap_err("failed to run bot")
}

async fn handle_signals(mut signals: Signals, quit_signal: Arc<Notify>) {
    info!("Starting signal handler");
    while let Some(signal) = signals.next().await {
        match signal {
            SIGTERM | SIGINT | SIGQUIT => {
                // Shutdown the system
                quit_signal.notify_waiters();
                break;
            }
            _ => unreachable!(),
        }
    }
}

async fn run() -> Result<(), Error> {
    let signals = Signals::new(&[SIGTERM, SIGINT, SIGQUIT]).map_err(Error::Signals)?;
    let quit_signal = Arc::new(Notify::new());

    info!("Opening aquarium store");
    let store = AquariumStore::open().await?;

    let settings = Config::load()?;
    let config = settings.client_config();

    info!("Creating client");
    let (mut incoming_messages, client) = Client::new(config);

    let handle = signals.handle();
    let signals_task = tokio::spawn(handle_signals(signals, quit_signal.clone()));

    // consume the incoming messages stream
    let twitch_task = tokio::spawn({
        let mut bot = Bot {
            client: client.clone(),
            store,
            catches: SessionMap::new(*CATCH_COOLDOWN),
        };

        async move {
            loop {
                select! {
                    maybe_message = incoming_messages.recv() => {
                        if let Some(message) = maybe_message {
                            if let Err(err) = bot.handle_server_message(message).await {
                                error!("Error handling message: {err}");
                            }
                        } else {
                            break;
                        }
                    }
                    _ = quit_signal.notified() => {
                        debug!("Received quitting twitch task");
                        break;
                    }
                }
            }
        }
    });

    debug!(
        "Wanting to join channels {}",
        settings
            .channels
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    client.set_wanted_channels(settings.channels.clone())?;

    // keep the tokio executor alive.
    // If you return instead of waiting the background task will exit.
    twitch_task.await?;

    // Terminate the signal stream.
    handle.close();
    signals_task.await?;

    Ok(())
}

/// Prefix a reply with whatever happened in the aquarium since the last visit.
fn with_news<T>(visit: &Visit<T>, text: impl Display) -> String {
    if visit.summary.is_empty() {
        text.to_string()
    } else {
        format!("while you were away {}. {text}", visit.summary)
    }
}

fn position(args: Option<&str>) -> Option<usize> {
    args?.split_whitespace().next()?.parse().ok()
}

struct Bot {
    client: Client,
    store: AquariumStore,
    /// Players who recently caught a fish and what they caught
    catches: SessionMap<String, String>,
}

impl Bot {
    async fn handle_server_message(&mut self, message: ServerMessage) -> Result<(), Error> {
        trace!("Received message: {:?}", &message);

        match message {
            ServerMessage::Privmsg(msg) => {
                self.handle_privmsg(&msg).await?;
            }
            ServerMessage::Notice(msg) => {
                warn!(
                    "Notice: {} {}",
                    msg.channel_login.unwrap_or_else(|| "Server".to_string()),
                    msg.message_text
                );
            }
            ServerMessage::Reconnect(_) => {
                info!("Twitch Server requested a reconnect");
            }
            _ => {}
        }

        Ok(())
    }

    async fn reply(&self, msg: &PrivmsgMessage, text: String) -> Result<(), Error> {
        self.client
            .say_in_reply_to(msg, text)
            .await
            .map_err(Error::ReplyToMessage)
    }

    async fn handle_privmsg(&mut self, msg: &PrivmsgMessage) -> Result<(), Error> {
        let Some(captures) = COMMAND_REGEX.captures(&msg.message_text) else {
            return Ok(());
        };
        let args = captures.name("args").map(|m| m.as_str().trim());
        let owner = msg.sender.login.to_lowercase();
        let now = Utc::now();
        let mut rng = StdRng::from_entropy();

        let text = match captures.name("emote").map(|m| m.as_str()) {
            None | Some("🐠") => {
                let visit = tank::visit(&self.store, &owner, now, &mut rng, |_| Ok(())).await?;
                with_news(&visit, format!("your {}", visit.aquarium))
            }
            Some("🎣") => {
                self.catches.evict_expired(now);

                if let Some(remaining) = self.catches.remaining(&owner, now) {
                    let cooldown = humantime::format_duration(StdDuration::from_secs(
                        remaining.num_seconds() as u64,
                    ));
                    let caught = self.catches.get(&owner, now).map_or("fish", String::as_str);
                    self.reply(
                        msg,
                        format!("you just caught a {caught}! Try again in {cooldown}."),
                    )
                    .await?;
                    return Ok(());
                }

                let fish = catalog::catch_fish(&mut rng)?;
                info!("{} caught {} for their aquarium", msg.sender.name, fish.name);

                let visit = tank::visit(&self.store, &owner, now, &mut rng, |aquarium| {
                    care::stock(aquarium, fish).map(ToString::to_string)
                })
                .await?;

                match &visit.outcome {
                    Ok(fish) => {
                        let name = visit.aquarium.fish.last().map_or("fish", |f| f.name.as_str());
                        self.catches.insert(owner.clone(), name.to_string(), now);
                        with_news(&visit, format!("caught a {fish} and put it in your aquarium!"))
                    }
                    Err(err) => with_news(&visit, err),
                }
            }
            Some("🍤") => {
                let visit = tank::visit(&self.store, &owner, now, &mut rng, |aquarium| {
                    Ok(care::feed(aquarium))
                })
                .await?;
                match &visit.outcome {
                    Ok(0) => with_news(&visit, "there is nobody to feed"),
                    Ok(fed) => with_news(&visit, format!("you fed {fed} fish")),
                    Err(err) => with_news(&visit, err),
                }
            }
            Some("🧽") => {
                let visit = tank::visit(&self.store, &owner, now, &mut rng, |aquarium| {
                    care::clean(aquarium);
                    Ok(())
                })
                .await?;
                with_news(&visit, "the water is sparkling clean")
            }
            Some("🔥") => {
                let visit = tank::visit(&self.store, &owner, now, &mut rng, |aquarium| {
                    care::heat(aquarium);
                    Ok(())
                })
                .await?;
                with_news(&visit, "the water is nice and warm")
            }
            Some("🏰") => match args.and_then(|args| args.split_whitespace().next()) {
                Some(key) => {
                    let key = key.to_lowercase();
                    let visit = tank::visit(&self.store, &owner, now, &mut rng, |aquarium| {
                        care::decorate(aquarium, &key)
                    })
                    .await?;
                    match &visit.outcome {
                        Ok(name) => with_news(&visit, format!("you placed a {name}")),
                        Err(err) => with_news(&visit, err),
                    }
                }
                None => format!(
                    "you can decorate with: {}",
                    catalog::decoration_keys().collect::<Vec<_>>().join(", ")
                ),
            },
            Some("👋") => match position(args) {
                Some(position) => {
                    let visit = tank::visit(&self.store, &owner, now, &mut rng, |aquarium| {
                        care::release(aquarium, position)
                    })
                    .await?;
                    match &visit.outcome {
                        Ok(fish) => with_news(
                            &visit,
                            format!("you released a {} worth ${:.2}", fish.name, fish.value),
                        ),
                        Err(err) => with_news(&visit, err),
                    }
                }
                None => "which fish? Try 👋 Fishinge <number>".to_string(),
            },
            Some("✏️") | Some("✏") => {
                let name = args
                    .and_then(|args| args.split_once(char::is_whitespace))
                    .map_or("", |(_, name)| name);

                match position(args) {
                    Some(position) => {
                        let visit = tank::visit(&self.store, &owner, now, &mut rng, |aquarium| {
                            care::rename(aquarium, position, name).map(ToString::to_string)
                        })
                        .await?;
                        match &visit.outcome {
                            Ok(fish) => with_news(&visit, format!("meet {fish}")),
                            Err(err) => with_news(&visit, err),
                        }
                    }
                    None => "which fish? Try ✏️ Fishinge <number> <name>".to_string(),
                }
            }
            Some("❓") => HELP.to_string(),
            _ => return Ok(()),
        };

        self.reply(msg, text).await
    }
}
