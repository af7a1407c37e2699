use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::auth::password::verify_password;
use crate::domain::accounts::account::{Account, validate_password, validate_user_id};
use crate::domain::validation::require;

pub struct Login<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub user_id: String,
    pub password: String,
}

impl<'a, R: UserRepository + ?Sized> Login<'a, R> {
    pub async fn execute(&self, req: &LoginRequest) -> ServiceResult<Account> {
        let user_id = require(&req.user_id, "id")?;
        let password = require(&req.password, "password")?;
        validate_user_id(user_id)?;
        validate_password(password)?;
        let creds = self
            .repo
            .find_credentials(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("user does not exist"))?;
        if !verify_password(password, &creds.password_hash)? {
            tracing::info!(user_id = %user_id, "login_wrong_password");
            return Err(ServiceError::WrongPassword);
        }
        Ok(creds.account)
    }
}
