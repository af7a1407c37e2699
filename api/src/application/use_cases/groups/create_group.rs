use crate::application::access::Caller;
use crate::application::error::ServiceResult;
use crate::application::ports::group_repository::GroupRepository;
use crate::domain::accounts::account::UserType;
use crate::domain::groups::group::normalize_group_name;

pub struct CreateGroup<'a, R: GroupRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: GroupRepository + ?Sized> CreateGroup<'a, R> {
    pub async fn execute(&self, caller: &Caller, name: &str) -> ServiceResult<i64> {
        caller.require(UserType::Teacher)?;
        let name = normalize_group_name(name)?;
        let group_id = self.repo.create(&caller.user_id, &name).await?;
        tracing::info!(group_id, owner = %caller.user_id, "group_created");
        Ok(group_id)
    }
}
