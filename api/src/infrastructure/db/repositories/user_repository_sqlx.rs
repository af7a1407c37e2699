use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::application::ports::user_repository::{InsertOutcome, UpdateOutcome, UserRepository};
use crate::domain::accounts::account::{Account, Credentials, UserType};
use crate::infrastructure::db::{PgPool, is_unique_violation};

pub struct SqlxUserRepository {
    pub pool: PgPool,
}

impl SqlxUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn account_from_row(row: &PgRow) -> anyhow::Result<Account> {
    let user_type: String = row.get("user_type");
    Ok(Account {
        user_id: row.get("user_id"),
        nickname: row.get("nickname"),
        user_type: user_type.parse::<UserType>()?,
    })
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn insert(&self, account: &Account, password_hash: &str) -> anyhow::Result<InsertOutcome> {
        let res = sqlx::query(
            r#"INSERT INTO accounts (user_id, nickname, password_hash, user_type)
               VALUES ($1, $2, $3, $4)"#,
        )
        .bind(&account.user_id)
        .bind(&account.nickname)
        .bind(password_hash)
        .bind(account.user_type.as_str())
        .execute(&self.pool)
        .await;
        match res {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(e) if is_unique_violation(&e) => Ok(InsertOutcome::Duplicate),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_credentials(&self, user_id: &str) -> anyhow::Result<Option<Credentials>> {
        let row = sqlx::query(
            r#"SELECT user_id, nickname, user_type, password_hash FROM accounts WHERE user_id = $1"#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        match row {
            Some(r) => Ok(Some(Credentials {
                account: account_from_row(&r)?,
                password_hash: r.get("password_hash"),
            })),
            None => Ok(None),
        }
    }

    async fn find(&self, user_id: &str) -> anyhow::Result<Option<Account>> {
        let row =
            sqlx::query(r#"SELECT user_id, nickname, user_type FROM accounts WHERE user_id = $1"#)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        row.as_ref().map(account_from_row).transpose()
    }

    async fn list(&self) -> anyhow::Result<Vec<Account>> {
        let rows =
            sqlx::query(r#"SELECT user_id, nickname, user_type FROM accounts ORDER BY user_id"#)
                .fetch_all(&self.pool)
                .await?;
        rows.iter().map(account_from_row).collect()
    }

    async fn update_profile(
        &self,
        user_id: &str,
        nickname: &str,
        user_type: UserType,
    ) -> anyhow::Result<UpdateOutcome> {
        let res = sqlx::query(
            r#"UPDATE accounts SET nickname = $2, user_type = $3, updated_at = now()
               WHERE user_id = $1"#,
        )
        .bind(user_id)
        .bind(nickname)
        .bind(user_type.as_str())
        .execute(&self.pool)
        .await;
        match res {
            Ok(r) if r.rows_affected() > 0 => Ok(UpdateOutcome::Updated),
            Ok(_) => Ok(UpdateOutcome::NotFound),
            Err(e) if is_unique_violation(&e) => Ok(UpdateOutcome::NicknameTaken),
            Err(e) => Err(e.into()),
        }
    }

    async fn update_password(&self, user_id: &str, password_hash: &str) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"UPDATE accounts SET password_hash = $2, updated_at = now() WHERE user_id = $1"#,
        )
        .bind(user_id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete_with_memberships(&self, user_id: &str) -> anyhow::Result<bool> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM group_members WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        // owned groups and their member rows go with the account via ON DELETE CASCADE
        let res = sqlx::query("DELETE FROM accounts WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(res.rows_affected() > 0)
    }
}
