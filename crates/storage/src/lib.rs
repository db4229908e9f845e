use std::sync::Arc;

use shared::domain::{User, UserId};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

mod allocator;
mod seed;

pub use allocator::IdAllocator;
pub use seed::seed_users;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("user {0} not found")]
    NotFound(UserId),
    #[error("user id space exhausted")]
    IdSpaceExhausted,
}

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug)]
struct Inner {
    users: Vec<User>,
    ids: IdAllocator,
}

/// In-memory, insertion-ordered user collection.
///
/// Clones share the same underlying collection. Every method takes the lock
/// exactly once, so lookups and the mutation that follows them cannot
/// interleave with another request.
#[derive(Debug, Clone)]
pub struct UserStore {
    inner: Arc<Mutex<Inner>>,
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore {
    pub fn new() -> Self {
        Self::with_users(Vec::new())
    }

    pub fn seeded() -> Self {
        Self::with_users(seed_users())
    }

    pub fn with_users(users: Vec<User>) -> Self {
        let ids = IdAllocator::for_users(&users);
        Self {
            inner: Arc::new(Mutex::new(Inner { users, ids })),
        }
    }

    pub async fn health_check(&self) -> Result<()> {
        let _guard = self.inner.lock().await;
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.users.len()
    }

    pub async fn list_users(&self) -> Vec<User> {
        self.inner.lock().await.users.clone()
    }

    pub async fn find_user(&self, user_id: UserId) -> Option<User> {
        self.inner
            .lock()
            .await
            .users
            .iter()
            .find(|user| user.id == user_id)
            .cloned()
    }

    pub async fn insert_user(&self, name: &str, email: &str) -> Result<User> {
        let mut inner = self.inner.lock().await;
        let Inner { users, ids } = &mut *inner;
        let user_id = ids.allocate(users)?;
        let user = User::new(user_id, name, email);
        users.push(user.clone());
        debug!(%user_id, "user inserted");
        Ok(user)
    }

    /// Overwrites name and email of an existing record, keeping its id,
    /// profile fields and list position.
    pub async fn replace_user(&self, user_id: UserId, name: &str, email: &str) -> Result<User> {
        let mut inner = self.inner.lock().await;
        let user = inner
            .users
            .iter_mut()
            .find(|user| user.id == user_id)
            .ok_or(StorageError::NotFound(user_id))?;
        user.name = name.to_string();
        user.email = email.to_string();
        debug!(%user_id, "user replaced");
        Ok(user.clone())
    }

    /// Removes the first record with `user_id`. Returns whether one was removed.
    pub async fn remove_user(&self, user_id: UserId) -> bool {
        let mut inner = self.inner.lock().await;
        let Some(index) = inner.users.iter().position(|user| user.id == user_id) else {
            return false;
        };
        inner.users.remove(index);
        debug!(%user_id, "user removed");
        true
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
