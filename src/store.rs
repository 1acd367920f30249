use std::{
    collections::BTreeMap,
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{Deserialize, Serialize};
use teloxide::{prelude::*, types::UserId};
use tokio::sync::Mutex;

/// HoYoLAB session cookies of one chat user.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct UserCredential {
    pub ltoken_v2: String,
    pub ltuid_v2: String,
}

impl fmt::Debug for UserCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCredential")
            .field("ltoken_v2", &"<redacted>")
            .field("ltuid_v2", &self.ltuid_v2)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum StoreError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize credentials: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Credentials of every registered user, mirrored to a JSON file.
///
/// The whole mapping is read once by [`CredentialStore::load`] and written
/// back in full after each mutation. Keys are serialized as decimal strings.
#[derive(Debug)]
pub(crate) struct CredentialStore {
    path: PathBuf,
    users: BTreeMap<u64, UserCredential>,
}

pub(crate) type SharedStore = Arc<Mutex<CredentialStore>>;

pub(crate) fn dependencies(store: CredentialStore) -> DependencyMap {
    let shared: SharedStore = Arc::new(Mutex::new(store));
    dptree::deps![shared]
}

impl CredentialStore {
    /// Reads the backing file. A missing or unreadable file yields an empty
    /// store; startup never fails because of it.
    pub(crate) fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let users = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(users) => users,
                Err(e) => {
                    log::warn!("{} is not valid, starting empty: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                log::warn!("cannot read {}, starting empty: {}", path.display(), e);
                BTreeMap::new()
            }
        };

        Self { path, users }
    }

    pub(crate) fn save(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.users)?;
        std::fs::write(&self.path, json).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }

    /// Inserts or replaces the record of `user`, then saves. The in-memory
    /// record stays even when the save fails.
    pub(crate) fn set(
        &mut self,
        user: UserId,
        ltoken_v2: String,
        ltuid_v2: String,
    ) -> Result<(), StoreError> {
        self.users.insert(
            user.0,
            UserCredential {
                ltoken_v2,
                ltuid_v2,
            },
        );
        self.save()
    }

    /// Returns `Ok(false)` without touching the file when `user` has no
    /// record. An `Err` means the record was removed but the save failed.
    pub(crate) fn remove(&mut self, user: UserId) -> Result<bool, StoreError> {
        if self.users.remove(&user.0).is_none() {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    pub(crate) fn get(&self, user: UserId) -> Option<&UserCredential> {
        self.users.get(&user.0)
    }

    pub(crate) fn len(&self) -> usize {
        self.users.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}
