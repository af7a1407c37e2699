use crate::application::access::Caller;
use crate::application::error::ServiceResult;
use crate::application::ports::group_repository::GroupRepository;
use crate::domain::accounts::account::UserType;
use crate::domain::groups::group::Group;

pub struct AllGroups<'a, R: GroupRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: GroupRepository + ?Sized> AllGroups<'a, R> {
    pub async fn execute(&self, caller: &Caller) -> ServiceResult<Vec<Group>> {
        caller.require(UserType::Admin)?;
        Ok(self.repo.all().await?)
    }
}
