use crate::application::access::Caller;
use crate::application::error::ServiceResult;
use crate::application::ports::group_repository::GroupRepository;
use crate::application::use_cases::groups::ensure_owner;

pub struct DeleteGroup<'a, R: GroupRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: GroupRepository + ?Sized> DeleteGroup<'a, R> {
    pub async fn execute(&self, caller: &Caller, group_id: i64) -> ServiceResult<()> {
        ensure_owner(self.repo, caller, group_id).await?;
        self.repo.delete(group_id).await?;
        tracing::info!(group_id, owner = %caller.user_id, "group_deleted");
        Ok(())
    }
}
