use crate::application::access::Caller;
use crate::application::error::ServiceResult;
use crate::application::ports::user_repository::UserRepository;
use crate::domain::accounts::account::{Account, UserType};

pub struct ListUsers<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> ListUsers<'a, R> {
    pub async fn execute(&self, caller: &Caller) -> ServiceResult<Vec<Account>> {
        caller.require(UserType::Admin)?;
        Ok(self.repo.list().await?)
    }
}
