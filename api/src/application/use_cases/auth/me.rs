use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::user_repository::UserRepository;
use crate::domain::accounts::account::Account;

pub struct GetMe<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> GetMe<'a, R> {
    /// A valid token whose account was deleted since issuance is treated as unauthenticated.
    pub async fn execute(&self, user_id: &str) -> ServiceResult<Account> {
        self.repo
            .find(user_id)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("account no longer exists".into()))
    }
}
