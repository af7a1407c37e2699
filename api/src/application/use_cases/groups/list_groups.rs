use crate::application::access::Caller;
use crate::application::error::ServiceResult;
use crate::application::ports::group_repository::GroupRepository;
use crate::domain::groups::group::GroupOverview;

pub struct ListGroups<'a, R: GroupRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: GroupRepository + ?Sized> ListGroups<'a, R> {
    pub async fn execute(&self, caller: &Caller) -> ServiceResult<GroupOverview> {
        Ok(GroupOverview {
            owned: self.repo.owned_by(&caller.user_id).await?,
            joined: self.repo.joined_by(&caller.user_id).await?,
        })
    }
}
