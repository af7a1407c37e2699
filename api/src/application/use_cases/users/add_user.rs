use crate::application::access::Caller;
use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::auth::register::{RegisterRequest, create_account};
use crate::domain::accounts::account::{Account, UserType};
use crate::domain::validation::require;

pub struct AddUser<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct AddUserRequest {
    pub user_id: String,
    pub nickname: String,
    pub password: String,
    pub user_type: String,
}

impl<'a, R: UserRepository + ?Sized> AddUser<'a, R> {
    /// Teachers may only enrol students; admins may create any role.
    pub async fn execute(&self, caller: &Caller, req: &AddUserRequest) -> ServiceResult<Account> {
        caller.require(UserType::Teacher)?;
        let user_type: UserType = require(&req.user_type, "user_type")?.parse()?;
        if caller.user_type != UserType::Admin && user_type != UserType::Student {
            return Err(ServiceError::forbidden("teachers can only add students"));
        }
        let dto = RegisterRequest {
            user_id: req.user_id.clone(),
            nickname: req.nickname.clone(),
            password: req.password.clone(),
        };
        create_account(self.repo, &dto, user_type).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::test_support::MemoryUsers;

    fn req(id: &str, user_type: &str) -> AddUserRequest {
        AddUserRequest {
            user_id: id.into(),
            nickname: format!("{id}-nick"),
            password: "abc12345".into(),
            user_type: user_type.into(),
        }
    }

    #[tokio::test]
    async fn teacher_adds_students_only() {
        let repo = MemoryUsers::default();
        let uc = AddUser { repo: &repo };
        let teacher = Caller::new("t1", UserType::Teacher);
        assert!(uc.execute(&teacher, &req("s1", "student")).await.is_ok());
        let res = uc.execute(&teacher, &req("t2", "teacher")).await;
        assert!(matches!(res, Err(ServiceError::Forbidden(_))));
    }

    #[tokio::test]
    async fn admin_adds_any_role() {
        let repo = MemoryUsers::default();
        let uc = AddUser { repo: &repo };
        let admin = Caller::new("root", UserType::Admin);
        let acc = uc.execute(&admin, &req("t2", "teacher")).await.unwrap();
        assert_eq!(acc.user_type, UserType::Teacher);
    }

    #[tokio::test]
    async fn students_cannot_add_users() {
        let repo = MemoryUsers::default();
        let uc = AddUser { repo: &repo };
        let student = Caller::new("s1", UserType::Student);
        let res = uc.execute(&student, &req("s2", "student")).await;
        assert!(matches!(res, Err(ServiceError::Forbidden(_))));
    }

    #[tokio::test]
    async fn duplicate_and_bad_role() {
        let repo = MemoryUsers::default();
        let uc = AddUser { repo: &repo };
        let admin = Caller::new("root", UserType::Admin);
        uc.execute(&admin, &req("s1", "student")).await.unwrap();
        let dup = uc.execute(&admin, &req("s1", "student")).await;
        assert!(matches!(dup, Err(ServiceError::Duplicate(_))));
        let bad = uc.execute(&admin, &req("s9", "guest")).await;
        assert!(matches!(bad, Err(ServiceError::InvalidInput(_))));
    }
}
