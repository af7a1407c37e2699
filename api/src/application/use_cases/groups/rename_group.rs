use crate::application::access::Caller;
use crate::application::error::ServiceResult;
use crate::application::ports::group_repository::GroupRepository;
use crate::application::use_cases::groups::ensure_owner;
use crate::domain::groups::group::normalize_group_name;

pub struct RenameGroup<'a, R: GroupRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: GroupRepository + ?Sized> RenameGroup<'a, R> {
    pub async fn execute(&self, caller: &Caller, group_id: i64, name: &str) -> ServiceResult<()> {
        let name = normalize_group_name(name)?;
        ensure_owner(self.repo, caller, group_id).await?;
        self.repo.rename(group_id, &name).await?;
        Ok(())
    }
}
