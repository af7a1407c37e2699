use crate::application::access::Caller;
use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::group_repository::{AddMembersOutcome, GroupRepository};
use crate::application::use_cases::groups::{ensure_owner, normalize_user_ids};

pub struct AddMembers<'a, R: GroupRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: GroupRepository + ?Sized> AddMembers<'a, R> {
    pub async fn execute(
        &self,
        caller: &Caller,
        group_id: i64,
        user_ids: &[String],
    ) -> ServiceResult<u64> {
        let ids = normalize_user_ids(user_ids)?;
        ensure_owner(self.repo, caller, group_id).await?;
        match self.repo.add_members(group_id, &ids).await? {
            AddMembersOutcome::Added(n) => {
                tracing::info!(group_id, added = n, "group_members_added");
                Ok(n)
            }
            AddMembersOutcome::Duplicate => Err(ServiceError::Duplicate(
                "user is already a member of this group".into(),
            )),
            AddMembersOutcome::UnknownUser => Err(ServiceError::invalid("unknown user id")),
        }
    }
}
