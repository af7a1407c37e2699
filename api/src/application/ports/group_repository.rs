use async_trait::async_trait;

use crate::domain::groups::group::{Group, GroupDetail};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddMembersOutcome {
    Added(u64),
    /// At least one user is already a member; nothing was added.
    Duplicate,
    /// At least one user id does not exist; nothing was added.
    UnknownUser,
}

#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn create(&self, owner: &str, name: &str) -> anyhow::Result<i64>;
    async fn owner_of(&self, group_id: i64) -> anyhow::Result<Option<String>>;
    async fn is_member(&self, group_id: i64, user_id: &str) -> anyhow::Result<bool>;
    async fn add_members(&self, group_id: i64, user_ids: &[String])
    -> anyhow::Result<AddMembersOutcome>;
    async fn remove_members(&self, group_id: i64, user_ids: &[String]) -> anyhow::Result<u64>;
    async fn detail(&self, group_id: i64) -> anyhow::Result<Option<GroupDetail>>;
    async fn owned_by(&self, user_id: &str) -> anyhow::Result<Vec<Group>>;
    async fn joined_by(&self, user_id: &str) -> anyhow::Result<Vec<Group>>;
    async fn all(&self) -> anyhow::Result<Vec<Group>>;
    async fn rename(&self, group_id: i64, name: &str) -> anyhow::Result<bool>;
    /// Removes members first, then the group, in one transaction.
    async fn delete(&self, group_id: i64) -> anyhow::Result<bool>;
}
