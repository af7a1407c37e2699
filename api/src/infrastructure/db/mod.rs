use sqlx::{Pool, Postgres};

use crate::application::ports::user_repository::{InsertOutcome, UserRepository};
use crate::application::use_cases::auth::password::hash_password;
use crate::domain::accounts::account::{Account, UserType, validate_password, validate_user_id};

pub mod repositories;

pub type PgPool = Pool<Postgres>;

pub async fn connect_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;
    Ok(pool)
}

pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    // Uses compile-time embedded migrations under ./migrations
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(e) if e.is_unique_violation())
}

pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(e) if e.is_foreign_key_violation())
}

/// Creates the bootstrap admin account if `user_id` is not taken yet.
pub async fn seed_admin(
    repo: &dyn UserRepository,
    user_id: &str,
    password: &str,
) -> anyhow::Result<bool> {
    validate_user_id(user_id)?;
    validate_password(password)?;
    if repo.find(user_id).await?.is_some() {
        return Ok(false);
    }
    let account = Account {
        user_id: user_id.to_string(),
        nickname: user_id.to_string(),
        user_type: UserType::Admin,
    };
    let hash = hash_password(password)?;
    match repo.insert(&account, &hash).await? {
        InsertOutcome::Inserted => {
            tracing::info!(user_id, "admin_account_seeded");
            Ok(true)
        }
        InsertOutcome::Duplicate => {
            tracing::warn!(user_id, "admin_seed_nickname_taken");
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::test_support::{MemoryUsers, account};

    #[tokio::test]
    async fn seeds_admin_once() {
        let repo = MemoryUsers::default();
        assert!(seed_admin(&repo, "root", "adminpass1").await.unwrap());
        assert!(!seed_admin(&repo, "root", "adminpass1").await.unwrap());
        let stored = repo.find("root").await.unwrap().unwrap();
        assert_eq!(stored.user_type, UserType::Admin);
    }

    #[tokio::test]
    async fn existing_account_is_left_alone() {
        let repo = MemoryUsers::with(&[(account("root", UserType::Student), "studentpw1")]).await;
        assert!(!seed_admin(&repo, "root", "adminpass1").await.unwrap());
        let stored = repo.find("root").await.unwrap().unwrap();
        assert_eq!(stored.user_type, UserType::Student);
    }

    #[tokio::test]
    async fn weak_password_is_rejected() {
        let repo = MemoryUsers::default();
        assert!(seed_admin(&repo, "root", "short").await.is_err());
    }
}
