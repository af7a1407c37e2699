use crate::application::access::Caller;
use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::auth::password::hash_password;
use crate::domain::accounts::account::validate_password;
use crate::domain::validation::require;

pub struct ChangePassword<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> ChangePassword<'a, R> {
    pub async fn execute(&self, caller: &Caller, new_password: &str) -> ServiceResult<()> {
        let new_password = require(new_password, "new_password")?;
        validate_password(new_password)?;
        let hash = hash_password(new_password)?;
        if !self.repo.update_password(&caller.user_id, &hash).await? {
            return Err(ServiceError::Unauthorized("account no longer exists".into()));
        }
        tracing::info!(user_id = %caller.user_id, "password_changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::auth::login::{Login, LoginRequest};
    use crate::application::use_cases::test_support::{MemoryUsers, account};
    use crate::domain::accounts::account::UserType;

    #[tokio::test]
    async fn new_password_takes_effect() {
        let repo = MemoryUsers::with(&[(account("stu1", UserType::Student), "abc12345")]).await;
        let caller = Caller::new("stu1", UserType::Student);
        ChangePassword { repo: &repo }
            .execute(&caller, "newpass99")
            .await
            .unwrap();
        let login = Login { repo: &repo };
        let ok = login
            .execute(&LoginRequest {
                user_id: "stu1".into(),
                password: "newpass99".into(),
            })
            .await;
        assert!(ok.is_ok());
    }

    #[tokio::test]
    async fn rejects_weak_password() {
        let repo = MemoryUsers::with(&[(account("stu1", UserType::Student), "abc12345")]).await;
        let caller = Caller::new("stu1", UserType::Student);
        let res = ChangePassword { repo: &repo }.execute(&caller, "123").await;
        assert!(matches!(res, Err(ServiceError::InvalidInput(_))));
    }
}
