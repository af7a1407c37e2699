use crate::application::access::Caller;
use crate::application::error::ServiceResult;
use crate::application::ports::group_repository::GroupRepository;
use crate::application::use_cases::groups::{ensure_owner, normalize_user_ids};

pub struct RemoveMembers<'a, R: GroupRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: GroupRepository + ?Sized> RemoveMembers<'a, R> {
    pub async fn execute(
        &self,
        caller: &Caller,
        group_id: i64,
        user_ids: &[String],
    ) -> ServiceResult<u64> {
        let ids = normalize_user_ids(user_ids)?;
        ensure_owner(self.repo, caller, group_id).await?;
        let removed = self.repo.remove_members(group_id, &ids).await?;
        tracing::info!(group_id, removed, "group_members_removed");
        Ok(removed)
    }
}
