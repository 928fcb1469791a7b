//! User registry.
//!
//! Maps the provider-issued subject identifier to a minimal user record. Handlers only
//! see the [`UserStore`] trait so the in-memory map can be replaced by a persistent
//! backend without touching them.

use crate::auth::provider::ProfileClaims;
use crate::error::StoreError;
use async_trait::async_trait;
use dashmap::{DashMap, mapref::entry::Entry};

/// A user known to this service. Never updated once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Subject identifier issued by the provider.
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<ProfileClaims> for UserRecord {
    fn from(claims: ProfileClaims) -> Self {
        Self {
            id: claims.sub,
            name: claims.name,
            email: claims.email,
        }
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by subject identifier.
    async fn get(&self, id: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Store `user` unless a record with the same id exists.
    ///
    /// Returns the stored record, which is the pre-existing one if there was one, and
    /// whether this call inserted it.
    async fn create(&self, user: UserRecord) -> Result<(UserRecord, bool), StoreError>;

    /// Resolve the record for `user.id`, creating it from `user` on first sight.
    #[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
    async fn get_or_create(&self, user: UserRecord) -> Result<UserRecord, StoreError> {
        if let Some(existing) = self.get(&user.id).await? {
            return Ok(existing);
        }
        let (stored, inserted) = self.create(user).await?;
        if inserted {
            tracing::info!(user_id = %stored.id, "Registered new user");
        }
        Ok(stored)
    }
}

/// Process-local registry. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: DashMap<String, UserRecord>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn get(&self, id: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.get(id).map(|entry| entry.value().clone()))
    }

    async fn create(&self, user: UserRecord) -> Result<(UserRecord, bool), StoreError> {
        // The entry holds the shard lock, so racing first logins keep the first insert.
        match self.users.entry(user.id.clone()) {
            Entry::Occupied(existing) => Ok((existing.get().clone(), false)),
            Entry::Vacant(slot) => Ok((slot.insert(user).value().clone(), true)),
        }
    }
}
