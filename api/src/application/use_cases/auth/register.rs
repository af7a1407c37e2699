use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::user_repository::{InsertOutcome, UserRepository};
use crate::application::use_cases::auth::password::hash_password;
use crate::domain::accounts::account::{
    Account, UserType, validate_nickname, validate_password, validate_user_id,
};
use crate::domain::validation::require;

pub struct Register<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub user_id: String,
    pub nickname: String,
    pub password: String,
}

impl<'a, R: UserRepository + ?Sized> Register<'a, R> {
    /// Self-service sign-up always yields a student account.
    pub async fn execute(&self, req: &RegisterRequest) -> ServiceResult<Account> {
        create_account(self.repo, req, UserType::Student).await
    }
}

pub(crate) async fn create_account<R: UserRepository + ?Sized>(
    repo: &R,
    req: &RegisterRequest,
    user_type: UserType,
) -> ServiceResult<Account> {
    let user_id = require(&req.user_id, "id")?;
    let nickname = require(&req.nickname, "nickname")?;
    let password = require(&req.password, "password")?;
    validate_user_id(user_id)?;
    validate_nickname(nickname)?;
    validate_password(password)?;
    let account = Account {
        user_id: user_id.to_string(),
        nickname: nickname.to_string(),
        user_type,
    };
    let hash = hash_password(password)?;
    match repo.insert(&account, &hash).await? {
        InsertOutcome::Inserted => {
            tracing::info!(user_id = %account.user_id, user_type = %user_type, "account_created");
            Ok(account)
        }
        InsertOutcome::Duplicate => Err(ServiceError::Duplicate(
            "user id or nickname already in use".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::test_support::MemoryUsers;

    fn req(id: &str, nickname: &str) -> RegisterRequest {
        RegisterRequest {
            user_id: id.into(),
            nickname: nickname.into(),
            password: "abc12345".into(),
        }
    }

    #[tokio::test]
    async fn registers_students() {
        let repo = MemoryUsers::default();
        let uc = Register { repo: &repo };
        let acc = uc.execute(&req("stu1", "Ann")).await.unwrap();
        assert_eq!(acc.user_type, UserType::Student);
        assert!(repo.find("stu1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn duplicate_user_returns_duplicate() {
        let repo = MemoryUsers::default();
        let uc = Register { repo: &repo };
        uc.execute(&req("stu1", "Ann")).await.unwrap();
        let again = uc.execute(&req("stu1", "Bob")).await;
        assert!(matches!(again, Err(ServiceError::Duplicate(_))));
        let same_nick = uc.execute(&req("stu2", "Ann")).await;
        assert!(matches!(same_nick, Err(ServiceError::Duplicate(_))));
    }
}
