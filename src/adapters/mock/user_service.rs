use crate::domain::value_objects::UserId;
use crate::ports::user_service::{Result, UserService as UserServiceTrait, UserSnapshot};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Mock implementation of UserService
///
/// Supports stateful testing by storing registered users.
pub struct UserService {
    users: Mutex<HashMap<UserId, UserSnapshot>>,
}

impl UserService {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }

    /// Register a user for testing purposes
    pub fn add_user(&self, user_id: UserId, name: impl Into<String>) {
        self.users
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                user_id,
                UserSnapshot {
                    user_id,
                    name: name.into(),
                },
            );
    }
}

impl Default for UserService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserServiceTrait for UserService {
    async fn exists(&self, user_id: UserId) -> Result<bool> {
        let users = self.users.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(users.contains_key(&user_id))
    }

    async fn get(&self, user_id: UserId) -> Result<Option<UserSnapshot>> {
        let users = self.users.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(users.get(&user_id).cloned())
    }
}
