use shared::domain::{User, UserId};

use crate::{Result, StorageError};

/// Hands out user ids that are always above every id currently stored.
///
/// The counter is rechecked against the live collection on every allocation,
/// so records added behind its back can never cause a collision. Ids of
/// removed records are not reused. Once `i64::MAX` has been handed out the
/// allocator stays exhausted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    next: Option<i64>,
}

impl IdAllocator {
    pub fn starting_at(next: i64) -> Self {
        Self {
            next: Some(next.max(1)),
        }
    }

    pub fn for_users(users: &[User]) -> Self {
        match max_id(users) {
            Some(max) => Self {
                next: max.checked_add(1),
            },
            None => Self::starting_at(1),
        }
    }

    #[cfg(test)]
    fn peek(&self) -> Option<i64> {
        self.next
    }

    pub fn allocate(&mut self, users: &[User]) -> Result<UserId> {
        let mut next = self.next.ok_or(StorageError::IdSpaceExhausted)?;
        if let Some(max) = max_id(users) {
            if next <= max {
                next = max.checked_add(1).ok_or(StorageError::IdSpaceExhausted)?;
            }
        }
        self.next = next.checked_add(1);
        Ok(UserId(next))
    }
}

fn max_id(users: &[User]) -> Option<i64> {
    users.iter().map(|user| user.id.0).max()
}
