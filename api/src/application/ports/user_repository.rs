use async_trait::async_trait;

use crate::domain::accounts::account::{Account, Credentials, UserType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// The user id or nickname is already taken.
    Duplicate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    NotFound,
    /// The new nickname belongs to another account.
    NicknameTaken,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, account: &Account, password_hash: &str) -> anyhow::Result<InsertOutcome>;
    async fn find_credentials(&self, user_id: &str) -> anyhow::Result<Option<Credentials>>;
    async fn find(&self, user_id: &str) -> anyhow::Result<Option<Account>>;
    async fn list(&self) -> anyhow::Result<Vec<Account>>;
    async fn update_profile(
        &self,
        user_id: &str,
        nickname: &str,
        user_type: UserType,
    ) -> anyhow::Result<UpdateOutcome>;
    async fn update_password(&self, user_id: &str, password_hash: &str) -> anyhow::Result<bool>;
    /// Drops the account together with its group memberships and owned groups.
    async fn delete_with_memberships(&self, user_id: &str) -> anyhow::Result<bool>;
}
