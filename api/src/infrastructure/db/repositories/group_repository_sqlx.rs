use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::application::ports::group_repository::{AddMembersOutcome, GroupRepository};
use crate::domain::groups::group::{Group, GroupDetail, GroupMember};
use crate::infrastructure::db::{PgPool, is_foreign_key_violation, is_unique_violation};

pub struct SqlxGroupRepository {
    pub pool: PgPool,
}

impl SqlxGroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn group_from_row(row: &PgRow) -> Group {
    Group {
        group_id: row.get("group_id"),
        owner: row.get("owner"),
        name: row.get("name"),
    }
}

#[async_trait]
impl GroupRepository for SqlxGroupRepository {
    async fn create(&self, owner: &str, name: &str) -> anyhow::Result<i64> {
        let id: i64 =
            sqlx::query_scalar("INSERT INTO groups (owner, name) VALUES ($1, $2) RETURNING group_id")
                .bind(owner)
                .bind(name)
                .fetch_one(&self.pool)
                .await?;
        Ok(id)
    }

    async fn owner_of(&self, group_id: i64) -> anyhow::Result<Option<String>> {
        let owner = sqlx::query_scalar("SELECT owner FROM groups WHERE group_id = $1")
            .bind(group_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(owner)
    }

    async fn is_member(&self, group_id: i64, user_id: &str) -> anyhow::Result<bool> {
        let found: Option<i32> =
            sqlx::query_scalar("SELECT 1 FROM group_members WHERE group_id = $1 AND user_id = $2")
                .bind(group_id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(found.is_some())
    }

    async fn add_members(
        &self,
        group_id: i64,
        user_ids: &[String],
    ) -> anyhow::Result<AddMembersOutcome> {
        let mut tx = self.pool.begin().await?;
        let mut added = 0u64;
        for user_id in user_ids {
            let res = sqlx::query("INSERT INTO group_members (group_id, user_id) VALUES ($1, $2)")
                .bind(group_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await;
            match res {
                Ok(r) => added += r.rows_affected(),
                Err(e) if is_unique_violation(&e) => {
                    tx.rollback().await?;
                    return Ok(AddMembersOutcome::Duplicate);
                }
                Err(e) if is_foreign_key_violation(&e) => {
                    tx.rollback().await?;
                    return Ok(AddMembersOutcome::UnknownUser);
                }
                Err(e) => return Err(e.into()),
            }
        }
        tx.commit().await?;
        Ok(AddMembersOutcome::Added(added))
    }

    async fn remove_members(&self, group_id: i64, user_ids: &[String]) -> anyhow::Result<u64> {
        let res = sqlx::query("DELETE FROM group_members WHERE group_id = $1 AND user_id = ANY($2)")
            .bind(group_id)
            .bind(user_ids)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }

    async fn detail(&self, group_id: i64) -> anyhow::Result<Option<GroupDetail>> {
        let head = sqlx::query(
            r#"SELECT g.group_id, g.name, g.owner, a.nickname AS owner_nickname
               FROM groups g JOIN accounts a ON a.user_id = g.owner
               WHERE g.group_id = $1"#,
        )
        .bind(group_id)
        .fetch_optional(&self.pool)
        .await?;
        let Some(head) = head else {
            return Ok(None);
        };
        let rows = sqlx::query(
            r#"SELECT a.user_id, a.nickname
               FROM group_members m JOIN accounts a ON a.user_id = m.user_id
               WHERE m.group_id = $1
               ORDER BY m.joined_at, a.user_id"#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(Some(GroupDetail {
            group_id: head.get("group_id"),
            name: head.get("name"),
            owner: GroupMember {
                user_id: head.get("owner"),
                nickname: head.get("owner_nickname"),
            },
            users: rows
                .into_iter()
                .map(|r| GroupMember {
                    user_id: r.get("user_id"),
                    nickname: r.get("nickname"),
                })
                .collect(),
        }))
    }

    async fn owned_by(&self, user_id: &str) -> anyhow::Result<Vec<Group>> {
        let rows = sqlx::query(
            "SELECT group_id, owner, name FROM groups WHERE owner = $1 ORDER BY group_id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(group_from_row).collect())
    }

    async fn joined_by(&self, user_id: &str) -> anyhow::Result<Vec<Group>> {
        let rows = sqlx::query(
            r#"SELECT g.group_id, g.owner, g.name
               FROM groups g JOIN group_members m ON m.group_id = g.group_id
               WHERE m.user_id = $1
               ORDER BY g.group_id"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(group_from_row).collect())
    }

    async fn all(&self) -> anyhow::Result<Vec<Group>> {
        let rows = sqlx::query("SELECT group_id, owner, name FROM groups ORDER BY group_id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(group_from_row).collect())
    }

    async fn rename(&self, group_id: i64, name: &str) -> anyhow::Result<bool> {
        let res = sqlx::query("UPDATE groups SET name = $2 WHERE group_id = $1")
            .bind(group_id)
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete(&self, group_id: i64) -> anyhow::Result<bool> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM group_members WHERE group_id = $1")
            .bind(group_id)
            .execute(&mut *tx)
            .await?;
        let res = sqlx::query("DELETE FROM groups WHERE group_id = $1")
            .bind(group_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(res.rows_affected() > 0)
    }
}
