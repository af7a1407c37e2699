use crate::application::access::Caller;
use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::user_repository::UserRepository;
use crate::domain::accounts::account::UserType;
use crate::domain::validation::require;

pub struct DeleteUser<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> DeleteUser<'a, R> {
    pub async fn execute(&self, caller: &Caller, user_id: &str) -> ServiceResult<()> {
        caller.require(UserType::Admin)?;
        let user_id = require(user_id, "user_id")?;
        if user_id == caller.user_id {
            return Err(ServiceError::forbidden("cannot delete your own account"));
        }
        if !self.repo.delete_with_memberships(user_id).await? {
            return Err(ServiceError::not_found(format!("user {user_id} not found")));
        }
        tracing::info!(user_id = %user_id, by = %caller.user_id, "account_deleted");
        Ok(())
    }
}
