use teloxide::types::UserId;

use crate::{
    gateway::GameDataGateway,
    models::Game,
    store::{SharedStore, UserCredential},
};

pub(crate) const SAVED: &str = "✅ Cookies saved.";
pub(crate) const REMOVED: &str = "✅ Cookies removed.";
pub(crate) const NOTHING_STORED: &str = "ℹ️ No cookies stored.";
pub(crate) const NOT_REGISTERED: &str =
    "⚠️ You are not registered yet. Use /setcookies <ltoken_v2> <ltuid_v2> first.";
pub(crate) const NO_RECORDS: &str = "ℹ️ No records found.";
pub(crate) const GATEWAY_FAILED: &str = "❌ Error fetching data, check your cookies.";

pub(crate) async fn set_credentials(
    store: &SharedStore,
    user: UserId,
    ltoken_v2: String,
    ltuid_v2: String,
) -> String {
    let mut store = store.lock().await;
    match store.set(user, ltoken_v2, ltuid_v2) {
        Ok(()) => log::info!("user {} stored cookies ({} users)", user.0, store.len()),
        Err(e) => log::error!("saving cookies of user {} failed: {}", user.0, e),
    }
    SAVED.to_owned()
}

pub(crate) async fn remove_credentials(store: &SharedStore, user: UserId) -> String {
    match store.lock().await.remove(user) {
        Ok(true) => REMOVED.to_owned(),
        Ok(false) => NOTHING_STORED.to_owned(),
        Err(e) => {
            log::error!("saving after removing cookies of user {} failed: {}", user.0, e);
            REMOVED.to_owned()
        }
    }
}

pub(crate) async fn whoami(store: &SharedStore, user: UserId) -> String {
    match store.lock().await.get(user) {
        Some(credential) => format!("🪪 Your ltuid_v2: {}", credential.ltuid_v2),
        None => NOT_REGISTERED.to_owned(),
    }
}

pub(crate) async fn chronicles(
    store: &SharedStore,
    gateway: &dyn GameDataGateway,
    user: UserId,
    game: Game,
) -> String {
    let Some(credential) = credential_of(store, user).await else {
        return NOT_REGISTERED.to_owned();
    };

    match gateway.chronicle(&credential, game).await {
        Ok(Some(chronicle)) if !chronicle.is_empty() => chronicle.summary_lines().join("\n"),
        Ok(_) => NO_RECORDS.to_owned(),
        Err(e) => {
            log::error!("{} chronicle of user {} failed: {}", game, user.0, e);
            GATEWAY_FAILED.to_owned()
        }
    }
}

/// Record card stats of the first account of `game` that has any.
pub(crate) async fn stats(
    store: &SharedStore,
    gateway: &dyn GameDataGateway,
    user: UserId,
    game: Game,
) -> String {
    let Some(credential) = credential_of(store, user).await else {
        return NOT_REGISTERED.to_owned();
    };

    match gateway.chronicle(&credential, game).await {
        Ok(Some(chronicle)) => match chronicle.list.iter().find(|entry| !entry.data.is_empty()) {
            Some(entry) => entry.stats_lines().join("\n"),
            None => NO_RECORDS.to_owned(),
        },
        Ok(None) => NO_RECORDS.to_owned(),
        Err(e) => {
            log::error!("{} stats of user {} failed: {}", game, user.0, e);
            GATEWAY_FAILED.to_owned()
        }
    }
}

pub(crate) async fn daily_note(
    store: &SharedStore,
    gateway: &dyn GameDataGateway,
    user: UserId,
    game: Game,
) -> String {
    let Some(credential) = credential_of(store, user).await else {
        return NOT_REGISTERED.to_owned();
    };

    match gateway.daily_note(&credential, game).await {
        Ok(Some(note)) => {
            let lines = note.lines();
            if lines.is_empty() {
                NO_RECORDS.to_owned()
            } else {
                lines.join("\n")
            }
        }
        Ok(None) => NO_RECORDS.to_owned(),
        Err(e) => {
            log::error!("{} daily note of user {} failed: {}", game, user.0, e);
            GATEWAY_FAILED.to_owned()
        }
    }
}

/// Copies the record out so the lock is not held across gateway calls.
async fn credential_of(store: &SharedStore, user: UserId) -> Option<UserCredential> {
    store.lock().await.get(user).cloned()
}
