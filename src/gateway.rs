//! HoYoLAB game-record client.
//!
//! Handlers only see [`GameDataGateway`]; [`HoyolabGateway`] is the HTTP
//! implementation wired in by `main`.

use std::{
    sync::Arc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use async_trait::async_trait;
use md5::{Digest, Md5};
use rand::{distributions::Alphanumeric, Rng};
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use serde::de::DeserializeOwned;
use teloxide::prelude::*;

use crate::{
    models::{Chronicle, DailyNote, Envelope, Game},
    store::UserCredential,
};

pub(crate) const DEFAULT_API_URL: &str = "https://bbs-api-os.hoyolab.com";

const DS_SALT: &str = "6s25p5ox5y14umn1p61aqyyvbvvl3lrt";
const APP_VERSION: &str = "1.5.0";
const CLIENT_TYPE: &str = "5";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub(crate) enum GatewayError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HoYoLAB returned retcode {retcode}: {message}")]
    Api { retcode: i64, message: String },
    #[error("invalid cookie value: {0}")]
    Cookie(#[from] reqwest::header::InvalidHeaderValue),
}

#[async_trait]
pub(crate) trait GameDataGateway: Send + Sync {
    /// Record cards of `game`. `None` when the service returned no payload.
    async fn chronicle(
        &self,
        credential: &UserCredential,
        game: Game,
    ) -> Result<Option<Chronicle>, GatewayError>;

    /// Daily note of the first `game` account bound to the HoYoLAB user.
    async fn daily_note(
        &self,
        credential: &UserCredential,
        game: Game,
    ) -> Result<Option<DailyNote>, GatewayError>;
}

pub(crate) type Gateway = Arc<dyn GameDataGateway>;

pub(crate) fn dependencies(gateway: Gateway) -> DependencyMap {
    dptree::deps![gateway]
}

pub(crate) struct HoyolabGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HoyolabGateway {
    pub(crate) fn new(base_url: impl Into<String>) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        credential: &UserCredential,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<T>, GatewayError> {
        let url = format!("{}/{}", self.base_url, path);

        let envelope: Envelope<T> = self
            .client
            .get(&url)
            .query(query)
            .headers(request_headers(credential)?)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if envelope.retcode != 0 {
            return Err(GatewayError::Api {
                retcode: envelope.retcode,
                message: envelope.message,
            });
        }

        Ok(envelope.data)
    }
}

#[async_trait]
impl GameDataGateway for HoyolabGateway {
    async fn chronicle(
        &self,
        credential: &UserCredential,
        game: Game,
    ) -> Result<Option<Chronicle>, GatewayError> {
        let chronicle: Option<Chronicle> = self
            .get(
                credential,
                "game_record/card/wapi/getGameRecordCard",
                &[("uid", credential.ltuid_v2.as_str())],
            )
            .await?;

        Ok(chronicle.map(|mut chronicle| {
            chronicle
                .list
                .retain(|entry| entry.game_id.map_or(true, |id| id == game.id()));
            chronicle
        }))
    }

    async fn daily_note(
        &self,
        credential: &UserCredential,
        game: Game,
    ) -> Result<Option<DailyNote>, GatewayError> {
        let Some(chronicle) = self.chronicle(credential, game).await? else {
            return Ok(None);
        };

        // Untagged entries stay in the chronicle but never address a note.
        let role = chronicle
            .list
            .into_iter()
            .filter(|entry| entry.game_id == Some(game.id()))
            .find_map(|entry| Some((entry.game_role_id?, entry.region?)));

        let Some((role_id, region)) = role else {
            log::debug!("ltuid {} has no {} account", credential.ltuid_v2, game);
            return Ok(None);
        };

        self.get(
            credential,
            game.note_path(),
            &[("server", region.as_str()), ("role_id", role_id.as_str())],
        )
        .await
    }
}

fn request_headers(credential: &UserCredential) -> Result<HeaderMap, GatewayError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        COOKIE,
        HeaderValue::from_str(&format!(
            "ltoken_v2={}; ltuid_v2={}",
            credential.ltoken_v2, credential.ltuid_v2
        ))?,
    );
    headers.insert("ds", HeaderValue::from_str(&dynamic_secret(now_unix()))?);
    headers.insert("x-rpc-app_version", HeaderValue::from_static(APP_VERSION));
    headers.insert("x-rpc-client_type", HeaderValue::from_static(CLIENT_TYPE));
    headers.insert("x-rpc-language", HeaderValue::from_static("en-us"));
    Ok(headers)
}

fn random_string() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect()
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// `DS` request signature: `t,r,md5("salt=..&t=..&r=..")`.
fn dynamic_secret(timestamp: u64) -> String {
    sign(timestamp, &random_string())
}

fn sign(timestamp: u64, nonce: &str) -> String {
    let digest = Md5::digest(format!("salt={}&t={}&r={}", DS_SALT, timestamp, nonce));
    format!("{},{},{:x}", timestamp, nonce, digest)
}
