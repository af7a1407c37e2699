use crate::application::access::Caller;
use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::group_repository::GroupRepository;
use crate::domain::groups::group::GroupDetail;

pub struct GetGroupDetail<'a, R: GroupRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: GroupRepository + ?Sized> GetGroupDetail<'a, R> {
    /// Visible to the owner and to members only.
    pub async fn execute(&self, caller: &Caller, group_id: i64) -> ServiceResult<GroupDetail> {
        let detail = self
            .repo
            .detail(group_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("group {group_id} not found")))?;
        let allowed = detail.owner.user_id == caller.user_id
            || self.repo.is_member(group_id, &caller.user_id).await?;
        if !allowed {
            return Err(ServiceError::forbidden("not a member of this group"));
        }
        Ok(detail)
    }
}
