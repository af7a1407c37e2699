use crate::application::access::Caller;
use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::user_repository::{UpdateOutcome, UserRepository};
use crate::domain::accounts::account::{UserType, validate_nickname};
use crate::domain::validation::require;

pub struct UpdateUser<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct UpdateUserRequest {
    pub user_id: String,
    pub nickname: String,
    pub user_type: String,
}

impl<'a, R: UserRepository + ?Sized> UpdateUser<'a, R> {
    pub async fn execute(&self, caller: &Caller, req: &UpdateUserRequest) -> ServiceResult<()> {
        caller.require(UserType::Admin)?;
        let user_id = require(&req.user_id, "user_id")?;
        let nickname = require(&req.nickname, "nickname")?;
        validate_nickname(nickname)?;
        let user_type: UserType = require(&req.user_type, "user_type")?.parse()?;
        match self
            .repo
            .update_profile(user_id, nickname, user_type)
            .await?
        {
            UpdateOutcome::Updated => {}
            UpdateOutcome::NotFound => {
                return Err(ServiceError::not_found(format!("user {user_id} not found")));
            }
            UpdateOutcome::NicknameTaken => {
                return Err(ServiceError::Duplicate(format!(
                    "nickname {nickname} already in use"
                )));
            }
        }
        tracing::info!(user_id = %user_id, user_type = %user_type, by = %caller.user_id, "account_updated");
        Ok(())
    }
}
